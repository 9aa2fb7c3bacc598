//! End-to-end behaviour of the donation form core:
//! - registering the layout and collecting nested values
//! - the UF/city cascade with reordered responses
//! - all-or-nothing validation on submit

use std::collections::BTreeMap;

use donation::{
    DependentSelector, FieldPath, FieldRegistry, FormLayout, FormValueTree, ReportMode,
    SelectSource, StalePolicy, SubmitOutcome, TextField, Validator, initial_data, submit,
};
use geography::{DivisionName, RegionCode};
use pretty_assertions::assert_eq;

fn p(s: &str) -> FieldPath {
    FieldPath::parse(s).unwrap()
}

fn filled_form() -> FieldRegistry {
    let mut reg = FieldRegistry::with_initial_data(initial_data());
    let paths = FormLayout::donation().register_all(&mut reg).unwrap();
    for path in paths {
        if reg.value(&path).as_deref().is_some_and(str::is_empty) {
            reg.set_field_value(&path, "preenchido").unwrap();
        }
    }
    reg
}

#[test]
fn get_values_nests_scopes() {
    let mut reg = FieldRegistry::new();
    reg.register(p("user.name"), Box::new(TextField::new("A")));
    reg.register(p("address.city"), Box::new(TextField::new("B")));

    let expected: FormValueTree =
        serde_json::from_str(r#"{"user":{"name":"A"},"address":{"city":"B"}}"#).unwrap();
    assert_eq!(reg.get_values(), expected);
}

#[test]
fn defaults_before_any_interaction() {
    let reg = {
        let mut reg = FieldRegistry::with_initial_data(initial_data());
        FormLayout::donation().register_all(&mut reg).unwrap();
        reg
    };
    assert_eq!(reg.value(&p("address.city")).as_deref(), Some("Foz do Iguaçu"));
    assert_eq!(reg.default_value(&p("address.state")), Some("Paraná"));
}

#[test]
fn complete_submission_is_accepted_and_leaves_errors_alone() {
    let mut reg = filled_form();
    let validator = Validator::new(ReportMode::All);

    // earlier failed attempt still on screen
    reg.set_field_value(&p("user.email"), "").unwrap();
    assert!(!submit(&mut reg, &validator).is_accepted());
    assert!(reg.error(&p("user.name")).is_some());

    reg.set_field_value(&p("user.email"), "maria@example.com").unwrap();
    let outcome = submit(&mut reg, &validator);
    let SubmitOutcome::Accepted(tree) = outcome else {
        panic!("expected acceptance");
    };
    assert_eq!(tree.get_str(&p("user.email")), Some("maria@example.com"));
    assert!(tree.get(&p("transaction.destiny")).is_none());
    assert_eq!(reg.error(&p("user.name")), Some("O nome é obrigatório"));
}

#[test]
fn one_empty_field_reports_every_message() {
    let mut values: BTreeMap<FieldPath, String> = donation::REQUIRED_FIELDS
        .iter()
        .map(|r| (p(r.path), "x".to_string()))
        .collect();
    values.insert(p("user.email"), String::new());

    let errors = Validator::default().validate(&values);
    assert_eq!(errors.len(), 15);
    for row in donation::REQUIRED_FIELDS {
        assert_eq!(errors.get(&p(row.path)), Some(row.message));
    }
}

#[test]
fn missing_only_marks_just_the_empty_field() {
    let mut reg = filled_form();
    reg.edit_field(&p("user.cpf"), "").unwrap();

    let outcome = submit(&mut reg, &Validator::new(ReportMode::MissingOnly));
    assert!(matches!(outcome, SubmitOutcome::Rejected(ref e) if e.len() == 1));
    assert_eq!(reg.errors().count(), 1);
    assert_eq!(reg.error(&p("user.cpf")), Some("O CPF é obrigatório"));
}

#[test]
fn editing_clears_only_that_message() {
    let mut reg = filled_form();
    reg.edit_field(&p("user.phone"), "").unwrap();
    submit(&mut reg, &Validator::default());
    let before = reg.errors().count();

    reg.edit_field(&p("user.phone"), "45 99999-0000").unwrap();
    assert_eq!(reg.error(&p("user.phone")), None);
    assert_eq!(reg.errors().count(), before - 1);
}

#[test]
fn register_then_unregister_drops_the_value() {
    let mut reg = filled_form();
    assert!(reg.unregister(&p("transaction.country")));
    assert!(reg.get_values().get(&p("transaction.country")).is_none());
}

#[test]
fn selecting_pr_lists_divisions_in_response_order() {
    let mut sel = DependentSelector::default();
    sel.set_regions(vec!["PR".into(), "SP".into()]);

    let req = sel.select_region(RegionCode::from("PR"));
    sel.apply_divisions(
        &req,
        vec![
            DivisionName::from("Foz do Iguaçu"),
            DivisionName::from("Curitiba"),
        ],
    );
    let shown: Vec<&str> = sel.divisions().iter().map(DivisionName::as_str).collect();
    assert_eq!(shown, ["Foz do Iguaçu", "Curitiba"]);
}

#[test]
fn displayed_divisions_follow_the_last_resolved_fetch() {
    let mut sel = DependentSelector::new(StalePolicy::LastWriteWins);
    let requests: Vec<_> = ["SP", "RJ", "PR"]
        .into_iter()
        .map(|uf| sel.select_region(uf.into()))
        .collect();

    // resolve in reverse: PR, RJ, SP
    for req in requests.iter().rev() {
        sel.apply_divisions(req, vec![DivisionName::new(format!("capital de {}", req.region))]);
    }
    assert_eq!(sel.region().as_str(), "PR");
    assert_eq!(sel.divisions()[0].as_str(), "capital de SP");

    let mut sel = DependentSelector::new(StalePolicy::Discard);
    let requests: Vec<_> = ["SP", "RJ", "PR"]
        .into_iter()
        .map(|uf| sel.select_region(uf.into()))
        .collect();
    for req in requests.iter().rev() {
        sel.apply_divisions(req, vec![DivisionName::new(format!("capital de {}", req.region))]);
    }
    assert_eq!(sel.divisions()[0].as_str(), "capital de PR");
}

#[test]
fn selects_bind_to_address_scope() {
    let layout = FormLayout::donation();
    let uf = layout.select_path(SelectSource::Regions).unwrap();
    let city = layout.select_path(SelectSource::Divisions).unwrap();
    assert_eq!(uf.to_string(), "address.uf");
    assert_eq!(city.to_string(), "address.city");
}

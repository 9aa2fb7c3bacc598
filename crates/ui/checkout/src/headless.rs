//! Subcommands that run without the terminal UI.

use std::io::Write;
use std::path::Path;

use color_eyre::{Result, eyre::WrapErr};
use donation::{
    FieldRegistry, FormError, FormLayout, FormValueTree, ValidationErrorSet, Validator, flatten,
    initial_data,
};
use geography::{GeographySource, RegionCode};
use tracing::{info, warn};

use crate::cli::Cmd;

/// Run a non-interactive command. Returns `None` for [`Cmd::Run`], which
/// belongs to the terminal UI, otherwise whether the command succeeded.
///
/// `open` is only called once a command actually prints, so the interactive
/// form never holds the stdout lock a panicking worker needs to restore the
/// terminal.
pub async fn execute<W, F>(
    cmd: Cmd,
    source: &dyn GeographySource,
    validator: &Validator,
    open: F,
) -> Result<Option<bool>>
where
    W: Write,
    F: FnOnce() -> W,
{
    match cmd {
        Cmd::Run => Ok(None),
        Cmd::Regions => regions(source, &mut open()).await.map(|()| Some(true)),
        Cmd::Divisions { uf } => divisions(source, &uf, &mut open()).await.map(|()| Some(true)),
        Cmd::Validate { values } => validate(&values, validator, &mut open()).map(Some),
    }
}

pub async fn regions(source: &dyn GeographySource, out: &mut impl Write) -> Result<()> {
    let regions = source
        .list_regions()
        .await
        .wrap_err("failed to load federative units")?;
    info!("{} regions", regions.len());
    for region in regions {
        writeln!(out, "{region}")?;
    }
    Ok(())
}

pub async fn divisions(source: &dyn GeographySource, uf: &str, out: &mut impl Write) -> Result<()> {
    let region = RegionCode::new(uf.trim().to_uppercase());
    let divisions = source
        .list_divisions(&region)
        .await
        .wrap_err_with(|| format!("failed to load municipalities of {region}"))?;
    info!("{} divisions for {region}", divisions.len());
    for division in divisions {
        writeln!(out, "{division}")?;
    }
    Ok(())
}

/// Run the validator over `values` as if they had been typed into the form.
///
/// Values land in a registry laid out exactly like the interactive form, so a
/// field the form does not register is ignored and a registered field missing
/// from the document keeps its default.
pub fn check_values(values: &FormValueTree, validator: &Validator) -> Result<ValidationErrorSet> {
    let layout = FormLayout::donation();
    let mut registry = FieldRegistry::with_initial_data(initial_data());
    layout.register_all(&mut registry)?;

    for (path, value) in flatten(values) {
        match registry.set_field_value(&path, &value) {
            Ok(()) => {}
            Err(FormError::UnknownField(_)) => warn!("ignoring unregistered field {path}"),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(validator.validate(&registry.flat_values()))
}

/// Returns whether the file passed validation.
pub fn validate(path: &Path, validator: &Validator, out: &mut impl Write) -> Result<bool> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let values: FormValueTree = serde_json::from_str(&text)
        .wrap_err_with(|| format!("{} is not a JSON object of form values", path.display()))?;

    let errors = check_values(&values, validator)?;
    if errors.is_empty() {
        writeln!(out, "Formulário válido")?;
        return Ok(true);
    }
    writeln!(out, "{}", serde_json::to_string_pretty(&errors)?)?;
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use donation::{FieldPath, ReportMode};
    use geography::StaticGeography;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> FormValueTree {
        serde_json::from_value(value).unwrap()
    }

    fn complete() -> serde_json::Value {
        json!({
            "user": {
                "name": "Ana", "email": "ana@example.com", "cpf": "000.000.000-00",
                "phone": "45999990000"
            },
            "address": {
                "street": "Rua A", "neighborhood": "Centro", "uf": "PR", "number": "10",
                "zipcode": "85851000", "city": "Foz do Iguaçu"
            },
            "transaction": {
                "amount": "10.00", "number_card": "4111111111111111",
                "expiration-date_card": "12/30", "card_holder_name": "ANA",
                "security_code": "123", "country": "Brasil"
            }
        })
    }

    #[test]
    fn complete_document_passes() {
        let errors = check_values(&tree(complete()), &Validator::default()).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn one_blank_field_reports_every_message() {
        let mut doc = complete();
        doc["user"]["name"] = json!("");
        let errors = check_values(&tree(doc), &Validator::default()).unwrap();
        assert_eq!(errors.len(), 15);
    }

    #[test]
    fn missing_only_reports_the_blank_field() {
        let mut doc = complete();
        doc["user"]["name"] = json!("");
        let errors = check_values(&tree(doc), &Validator::new(ReportMode::MissingOnly)).unwrap();
        assert_eq!(
            errors.paths().cloned().collect::<Vec<_>>(),
            vec![FieldPath::parse("user.name").unwrap()]
        );
    }

    #[test]
    fn flat_keys_are_accepted() {
        let mut doc = complete();
        doc["user"] = json!({});
        let mut flat = doc.as_object().unwrap().clone();
        for (k, v) in [
            ("user.name", "Ana"),
            ("user.email", "a@b.c"),
            ("user.cpf", "1"),
            ("user.phone", "2"),
        ] {
            flat.insert(k.into(), json!(v));
        }
        let errors =
            check_values(&tree(serde_json::Value::Object(flat)), &Validator::default()).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn untouched_registered_fields_count_as_blank() {
        let errors = check_values(&tree(json!({})), &Validator::default()).unwrap();
        assert!(!errors.is_empty());
    }

    #[tokio::test]
    async fn prints_one_division_per_line() {
        let source = StaticGeography::new().with_divisions("PR", ["Curitiba", "Foz do Iguaçu"]);
        let mut out = Vec::new();
        divisions(&source, "pr", &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Curitiba\nFoz do Iguaçu\n");
    }

    #[tokio::test]
    async fn interactive_run_never_opens_the_output() {
        let source = StaticGeography::new().with_regions(["PR"]);
        let outcome = execute(Cmd::Run, &source, &Validator::default(), || -> Vec<u8> {
            panic!("output opened for the interactive form")
        })
        .await
        .unwrap();
        assert_eq!(outcome, None);
    }

    #[tokio::test]
    async fn headless_commands_open_the_output_once() {
        let source = StaticGeography::new().with_regions(["PR", "SP"]);
        let opened = std::cell::Cell::new(0);
        let outcome = execute(Cmd::Regions, &source, &Validator::default(), || {
            opened.set(opened.get() + 1);
            Vec::new()
        })
        .await
        .unwrap();
        assert_eq!(outcome, Some(true));
        assert_eq!(opened.get(), 1);
    }

    #[tokio::test]
    async fn region_failure_is_an_error() {
        let mut out = Vec::new();
        assert!(regions(&StaticGeography::new().failing_regions(), &mut out).await.is_err());
    }
}

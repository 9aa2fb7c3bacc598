//! Declarative description of the donation form.
//!
//! The view walks [`FormLayout::donation`] to draw the form and calls
//! [`FormLayout::register_all`] once to bind every collected field to the
//! registry.

use geography::types::NONE_SELECTED;

use crate::error::FormError;
use crate::path::FieldPath;
use crate::registry::{FieldRegistry, TextField};
use crate::tree::FormValueTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectSource {
    Regions,
    Divisions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Numeric,
    Decimal,
    Select(SelectSource),
    Destination,
}

impl FieldKind {
    pub fn is_select(&self) -> bool {
        matches!(self, FieldKind::Select(_) | FieldKind::Destination)
    }

    /// Whether a typed character is accepted by this kind of input.
    pub fn accepts(&self, c: char) -> bool {
        match self {
            FieldKind::Numeric => c.is_ascii_digit(),
            FieldKind::Decimal => c.is_ascii_digit() || c == ',' || c == '.',
            FieldKind::Tel => c.is_ascii_digit() || "+-() ".contains(c),
            FieldKind::Text | FieldKind::Email => !c.is_control(),
            FieldKind::Select(_) | FieldKind::Destination => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub placeholder: Option<&'static str>,
    /// Unregistered fields are drawn but never collected.
    pub registered: bool,
}

impl FieldSpec {
    const fn input(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            placeholder: None,
            registered: true,
        }
    }

    const fn select(
        name: &'static str,
        label: &'static str,
        source: SelectSource,
        placeholder: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Select(source),
            placeholder: Some(placeholder),
            registered: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSpec {
    pub name: &'static str,
    pub title: Option<&'static str>,
    pub fields: Vec<FieldSpec>,
}

impl ScopeSpec {
    pub fn path(&self, field: &FieldSpec) -> Result<FieldPath, FormError> {
        FieldPath::parse(self.name)?.join(field.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLayout {
    pub title: &'static str,
    pub scopes: Vec<ScopeSpec>,
    pub submit_label: &'static str,
}

impl FormLayout {
    pub fn donation() -> Self {
        use FieldKind::*;

        let user = ScopeSpec {
            name: "user",
            title: None,
            fields: vec![
                FieldSpec::input("name", "Nome completo", Text),
                FieldSpec::input("email", "E-mail", Email),
                FieldSpec::input("cpf", "CPF", Text),
                FieldSpec::input("phone", "Telefone", Tel),
            ],
        };
        let address = ScopeSpec {
            name: "address",
            title: Some("Endereço:"),
            fields: vec![
                FieldSpec::input("street", "Rua", Text),
                FieldSpec::input("neighborhood", "Bairro", Text),
                FieldSpec::select("uf", "Estado (UF)", SelectSource::Regions, "Selecione uma UF"),
                FieldSpec::input("number", "Número", Text),
                FieldSpec::input("zipcode", "CEP", Numeric),
                FieldSpec::select(
                    "city",
                    "Cidade",
                    SelectSource::Divisions,
                    "Selecione uma cidade",
                ),
            ],
        };
        let transaction = ScopeSpec {
            name: "transaction",
            title: Some("Cartão de crédito:"),
            fields: vec![
                FieldSpec::input("amount", "Valor", Decimal),
                FieldSpec::input("number_card", "Número do cartão", Text),
                FieldSpec::input("expiration-date_card", "Data de vencimento", Text),
                FieldSpec {
                    name: "destiny",
                    label: "Destino",
                    kind: Destination,
                    placeholder: Some(crate::destination::Destination::PLACEHOLDER),
                    registered: false,
                },
                FieldSpec::input("card_holder_name", "Nome impresso no cartão", Text),
                FieldSpec::input("security_code", "Código de segurança", Numeric),
                FieldSpec::input("country", "País", Text),
            ],
        };

        Self {
            title: "Assembleia de Deus - Foz do Iguaçu",
            scopes: vec![user, address, transaction],
            submit_label: "Enviar",
        }
    }

    /// Every field in display order together with its full path.
    pub fn fields(&self) -> Vec<(FieldPath, &FieldSpec)> {
        self.scopes
            .iter()
            .flat_map(|scope| {
                scope
                    .fields
                    .iter()
                    .filter_map(move |f| scope.path(f).ok().map(|p| (p, f)))
            })
            .collect()
    }

    pub fn field(&self, path: &FieldPath) -> Option<&FieldSpec> {
        self.fields()
            .into_iter()
            .find(|(p, _)| p == path)
            .map(|(_, f)| f)
    }

    /// Path of the select bound to `source`.
    pub fn select_path(&self, source: SelectSource) -> Option<FieldPath> {
        self.fields()
            .into_iter()
            .find(|(_, f)| f.kind == FieldKind::Select(source))
            .map(|(p, _)| p)
    }

    /// Register every collected field. Selects start at the "none selected"
    /// value, inputs at the empty string; initial data overrides both.
    pub fn register_all(&self, registry: &mut FieldRegistry) -> Result<Vec<FieldPath>, FormError> {
        let mut registered = Vec::new();
        for spec in &self.scopes {
            let mut scope = registry.scope(spec.name)?;
            for field in spec.fields.iter().filter(|f| f.registered) {
                let start = if field.kind.is_select() {
                    NONE_SELECTED
                } else {
                    ""
                };
                registered.push(scope.register(field.name, Box::new(TextField::new(start)))?);
            }
        }
        Ok(registered)
    }
}

/// Seed values applied when the form registers its fields.
pub fn initial_data() -> FormValueTree {
    let mut tree = FormValueTree::new();
    if let (Ok(city), Ok(state)) = (
        FieldPath::parse("address.city"),
        FieldPath::parse("address.state"),
    ) {
        tree.insert(&city, "Foz do Iguaçu");
        tree.insert(&state, "Paraná");
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    #[test]
    fn destiny_is_drawn_but_not_registered() {
        let layout = FormLayout::donation();
        let mut reg = FieldRegistry::new();
        let paths = layout.register_all(&mut reg).unwrap();

        assert!(layout.field(&p("transaction.destiny")).is_some());
        assert!(!reg.is_registered(&p("transaction.destiny")));
        assert_eq!(paths.len(), 16);
        assert_eq!(reg.len(), 16);
    }

    #[test]
    fn hyphenated_expiration_field_is_kept() {
        let mut reg = FieldRegistry::new();
        FormLayout::donation().register_all(&mut reg).unwrap();
        assert!(reg.is_registered(&p("transaction.expiration-date_card")));
        assert!(!reg.is_registered(&p("transaction.expiration_date_card")));
        assert!(reg.is_registered(&p("address.uf")));
        assert!(!reg.is_registered(&p("user.uf")));
    }

    #[test]
    fn selects_start_at_sentinel_unless_seeded() {
        let mut reg = FieldRegistry::with_initial_data(initial_data());
        FormLayout::donation().register_all(&mut reg).unwrap();
        assert_eq!(reg.value(&p("address.uf")).as_deref(), Some("0"));
        assert_eq!(reg.value(&p("address.city")).as_deref(), Some("Foz do Iguaçu"));
        assert_eq!(reg.value(&p("user.name")).as_deref(), Some(""));
    }

    #[test]
    fn select_paths() {
        let layout = FormLayout::donation();
        assert_eq!(layout.select_path(SelectSource::Regions), Some(p("address.uf")));
        assert_eq!(layout.select_path(SelectSource::Divisions), Some(p("address.city")));
    }

    #[test]
    fn input_kinds_filter_characters() {
        assert!(FieldKind::Numeric.accepts('7'));
        assert!(!FieldKind::Numeric.accepts('a'));
        assert!(FieldKind::Decimal.accepts(','));
        assert!(FieldKind::Tel.accepts('+'));
        assert!(FieldKind::Text.accepts('ç'));
        assert!(!FieldKind::Select(SelectSource::Regions).accepts('a'));
    }
}

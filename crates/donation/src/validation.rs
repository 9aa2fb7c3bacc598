//! Required-field validation run on submit.
//!
//! A single declarative table lists every required path with its pt-BR
//! message. A required path counts as missing only when it is present and
//! empty; a path the form never registered is absent and never fires. This is
//! why `transaction.expiration_date_card` (the form renders
//! `expiration-date_card`) and `user.uf` (rendered as `address.uf`) are never
//! actually checked.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::path::FieldPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredField {
    pub path: &'static str,
    pub message: &'static str,
}

pub const REQUIRED_FIELDS: [RequiredField; 15] = [
    RequiredField { path: "user.name", message: "O nome é obrigatório" },
    RequiredField { path: "user.email", message: "O e-mail é obrigatório" },
    RequiredField { path: "user.cpf", message: "O CPF é obrigatório" },
    RequiredField { path: "user.phone", message: "O telefone é obrigatório" },
    RequiredField { path: "address.city", message: "A cidade é obrigatória" },
    RequiredField { path: "address.neighborhood", message: "O bairro é obrigatório" },
    RequiredField { path: "address.number", message: "O número é obrigatório" },
    RequiredField { path: "address.street", message: "A rua é obrigatória" },
    RequiredField { path: "user.uf", message: "O estado obrigatório" },
    RequiredField { path: "user.zipcode", message: "O CEP é obrigatório" },
    RequiredField { path: "transaction.amount", message: "O valor que deseja enviar é obrigatório" },
    RequiredField { path: "transaction.card_holder_name", message: "O nome impresso no cartão é obrigatório" },
    RequiredField { path: "transaction.expiration_date_card", message: "A data de vencimento do cartão é obrigatória" },
    RequiredField { path: "transaction.number_card", message: "O número do cartão é obrigatório" },
    RequiredField { path: "transaction.security_code", message: "O código de segurança é obrigatório" },
];

/// Which messages a rejected submission shows.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportMode {
    /// Any missing field rejects the form and every required field gets its
    /// message.
    #[default]
    All,
    /// Only the missing fields get a message.
    MissingOnly,
}

/// Path -> message, rebuilt from scratch on every submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrorSet(BTreeMap<FieldPath, String>);

impl ValidationErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: FieldPath, message: impl Into<String>) {
        self.0.insert(path, message.into());
    }

    pub fn get(&self, path: &FieldPath) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &FieldPath) -> bool {
        self.0.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &str)> {
        self.0.iter().map(|(p, m)| (p, m.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Validator {
    rules: Vec<(FieldPath, String)>,
    mode: ReportMode,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ReportMode::default())
    }
}

impl Validator {
    /// Validator over [`REQUIRED_FIELDS`].
    pub fn new(mode: ReportMode) -> Self {
        let rules = REQUIRED_FIELDS
            .iter()
            .filter_map(|r| {
                FieldPath::parse(r.path)
                    .ok()
                    .map(|p| (p, r.message.to_string()))
            })
            .collect();
        Self { rules, mode }
    }

    pub fn with_rules(rules: Vec<(FieldPath, String)>, mode: ReportMode) -> Self {
        Self { rules, mode }
    }

    pub fn rules(&self) -> &[(FieldPath, String)] {
        &self.rules
    }

    pub fn mode(&self) -> ReportMode {
        self.mode
    }

    /// Required paths whose value is present and empty.
    pub fn missing<'a>(&'a self, values: &BTreeMap<FieldPath, String>) -> Vec<&'a FieldPath> {
        self.rules
            .iter()
            .filter(|(path, _)| values.get(path).is_some_and(|v| v.is_empty()))
            .map(|(path, _)| path)
            .collect()
    }

    pub fn validate(&self, values: &BTreeMap<FieldPath, String>) -> ValidationErrorSet {
        let missing = self.missing(values);
        let mut errors = ValidationErrorSet::new();
        if missing.is_empty() {
            return errors;
        }
        debug!(missing = missing.len(), mode = %self.mode, "required fields missing");

        for (path, message) in &self.rules {
            let report = match self.mode {
                ReportMode::All => true,
                ReportMode::MissingOnly => missing.contains(&path),
            };
            if report {
                errors.insert(path.clone(), message.clone());
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    fn complete() -> BTreeMap<FieldPath, String> {
        REQUIRED_FIELDS
            .iter()
            .map(|r| (p(r.path), "x".to_string()))
            .collect()
    }

    #[test]
    fn table_paths_are_valid() {
        assert_eq!(Validator::default().rules().len(), 15);
    }

    #[test]
    fn complete_values_produce_no_errors() {
        assert!(Validator::default().validate(&complete()).is_empty());
    }

    #[test]
    fn one_empty_field_reports_all_fifteen() {
        let mut values = complete();
        values.insert(p("user.email"), String::new());

        let errors = Validator::new(ReportMode::All).validate(&values);
        assert_eq!(errors.len(), 15);
        assert_eq!(errors.get(&p("user.email")), Some("O e-mail é obrigatório"));
        assert_eq!(errors.get(&p("user.name")), Some("O nome é obrigatório"));
    }

    #[test]
    fn missing_only_reports_just_the_empty_ones() {
        let mut values = complete();
        values.insert(p("user.email"), String::new());
        values.insert(p("transaction.amount"), String::new());

        let errors = Validator::new(ReportMode::MissingOnly).validate(&values);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&p("user.email")));
        assert!(errors.contains(&p("transaction.amount")));
    }

    #[test]
    fn absent_paths_are_not_missing() {
        let mut values = complete();
        values.remove(&p("user.uf"));
        values.remove(&p("transaction.expiration_date_card"));
        assert!(Validator::default().validate(&values).is_empty());
    }

    #[test]
    fn whitespace_is_not_empty() {
        let mut values = complete();
        values.insert(p("user.name"), " ".into());
        assert!(Validator::default().validate(&values).is_empty());
    }

    #[test]
    fn report_mode_parses_from_config_strings() {
        assert_eq!("all".parse::<ReportMode>().unwrap(), ReportMode::All);
        assert_eq!(
            "missing_only".parse::<ReportMode>().unwrap(),
            ReportMode::MissingOnly
        );
        assert_eq!(ReportMode::MissingOnly.to_string(), "missing_only");
    }
}

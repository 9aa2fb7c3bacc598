use tracing::{info, warn};

use crate::path::FieldPath;
use crate::registry::FieldRegistry;
use crate::tree::{FormValueTree, unflatten};
use crate::validation::{ValidationErrorSet, Validator};

/// Card fields whose value never reaches the log.
const REDACTED: [&str; 2] = ["transaction.number_card", "transaction.security_code"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(FormValueTree),
    Rejected(ValidationErrorSet),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }
}

/// Collect, log, validate. A rejection is written into the registry's error
/// slots; an acceptance leaves them untouched.
pub fn submit(registry: &mut FieldRegistry, validator: &Validator) -> SubmitOutcome {
    let values = registry.flat_values();

    let logged = unflatten(values.iter().map(|(path, value)| {
        let shown = if is_redacted(path) && !value.is_empty() {
            "[REDACTED]".to_string()
        } else {
            value.clone()
        };
        (path.clone(), shown)
    }));
    match serde_json::to_string(&logged) {
        Ok(json) => info!(target: "donation::submit", values = %json, "form submitted"),
        Err(e) => warn!("could not serialize submitted values: {e}"),
    }

    let errors = validator.validate(&values);
    if errors.is_empty() {
        SubmitOutcome::Accepted(unflatten(values))
    } else {
        info!(errors = errors.len(), "submission rejected");
        registry.set_errors(&errors);
        SubmitOutcome::Rejected(errors)
    }
}

fn is_redacted(path: &FieldPath) -> bool {
    REDACTED.iter().any(|r| path.to_string() == *r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FormLayout, initial_data};
    use crate::validation::ReportMode;

    fn p(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    fn form() -> FieldRegistry {
        let mut reg = FieldRegistry::with_initial_data(initial_data());
        FormLayout::donation().register_all(&mut reg).unwrap();
        reg
    }

    #[test]
    fn empty_form_is_rejected_with_registered_messages() {
        let mut reg = form();
        let outcome = submit(&mut reg, &Validator::new(ReportMode::All));

        let SubmitOutcome::Rejected(errors) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(errors.len(), 15);
        assert_eq!(reg.error(&p("user.name")), Some("O nome é obrigatório"));
        // address.city carries the seeded value but still shows its message
        assert_eq!(reg.error(&p("address.city")), Some("A cidade é obrigatória"));
        // no slot for paths the form never rendered
        assert_eq!(reg.error(&p("user.uf")), None);
    }

    #[test]
    fn redaction_only_touches_card_secrets() {
        assert!(is_redacted(&p("transaction.number_card")));
        assert!(is_redacted(&p("transaction.security_code")));
        assert!(!is_redacted(&p("transaction.card_holder_name")));
    }
}

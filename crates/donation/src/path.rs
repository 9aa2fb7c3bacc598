use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FormError;

/// Dotted path to one leaf value of the form (`user.name`,
/// `transaction.number_card`).
///
/// Stored as segments; never empty and never contains an empty segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub const DELIMITER: char = '.';

    pub fn parse(path: &str) -> Result<Self, FormError> {
        Self::from_segments(path.split(Self::DELIMITER)).map_err(|reason| FormError::InvalidPath {
            path: path.to_string(),
            reason,
        })
    }

    fn from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Result<Self, &'static str> {
        let parts: Vec<String> = segments.into_iter().map(str::to_string).collect();
        if parts.is_empty() || parts.iter().all(String::is_empty) {
            return Err("path is empty");
        }
        if parts.iter().any(String::is_empty) {
            return Err("path contains an empty segment");
        }
        Ok(FieldPath(parts))
    }

    /// Append `name` (itself possibly dotted) below this path.
    pub fn join(&self, name: &str) -> Result<Self, FormError> {
        let child = FieldPath::parse(name)?;
        let mut parts = self.0.clone();
        parts.extend(child.0);
        Ok(FieldPath(parts))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Last segment (the field's own name inside its scope).
    pub fn leaf(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// Every segment but the last.
    pub fn parents(&self) -> &[String] {
        &self.0[..self.0.len().saturating_sub(1)]
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        FieldPath::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let p = FieldPath::parse("transaction.number_card").unwrap();
        assert_eq!(p.segments(), ["transaction", "number_card"]);
        assert_eq!(p.to_string(), "transaction.number_card");
        assert_eq!(p.leaf(), "number_card");
        assert_eq!(p.parents(), ["transaction"]);
    }

    #[test]
    fn hyphens_are_plain_characters() {
        let p = FieldPath::parse("transaction.expiration-date_card").unwrap();
        assert_eq!(p.leaf(), "expiration-date_card");
    }

    #[test]
    fn rejects_empty_and_hollow_paths() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("user.").is_err());
        assert!(FieldPath::parse(".name").is_err());
        assert!(FieldPath::parse("user..name").is_err());
    }

    #[test]
    fn join_nests_scopes() {
        let scope = FieldPath::parse("transaction").unwrap();
        let p = scope.join("card.holder").unwrap();
        assert_eq!(p.to_string(), "transaction.card.holder");
        assert!(p.starts_with(&scope));
        assert!(!scope.starts_with(&p));
    }

    #[test]
    fn serde_uses_dotted_string() {
        let p = FieldPath::parse("user.email").unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"user.email\"");
        let back: FieldPath = serde_json::from_str("\"user.email\"").unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_str::<FieldPath>("\"user.\"").is_err());
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value used by the form selects for "nothing selected yet".
pub const NONE_SELECTED: &str = "0";

/// Short identifier of a federative unit (e.g. `PR`, `SP`).
///
/// Opaque on purpose: the set of valid codes is whatever the service returned
/// at startup. The sentinel [`RegionCode::none`] is a regular value and is sent
/// to the service like any other code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCode(String);

impl RegionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn none() -> Self {
        Self(NONE_SELECTED.to_string())
    }

    pub fn is_none(&self) -> bool {
        self.0 == NONE_SELECTED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RegionCode {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RegionCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Human readable municipality name (e.g. `Foz do Iguaçu`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DivisionName(String);

impl DivisionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn none() -> Self {
        Self(NONE_SELECTED.to_string())
    }

    pub fn is_none(&self) -> bool {
        self.0 == NONE_SELECTED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DivisionName {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for DivisionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DivisionName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DivisionName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// Wire records. The service returns many more fields; only the ones the form
// shows are decoded.

#[derive(Debug, Deserialize)]
pub(crate) struct RegionRecord {
    pub sigla: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DivisionRecord {
    pub nome: String,
}

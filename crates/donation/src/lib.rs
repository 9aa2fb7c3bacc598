//! Core of the donation form.
//!
//! The form is described declaratively ([`layout::FormLayout`]) and its values
//! live in a [`registry::FieldRegistry`] keyed by dotted [`path::FieldPath`]s.
//! The UF/city pair is driven by [`selection::DependentSelector`], and
//! [`validation::Validator`] checks the fixed table of required fields when the
//! form is submitted ([`submit::submit`]).
//!
//! Nothing in here performs I/O. Division fetches are described as
//! [`selection::DivisionRequest`]s and executed by the caller.

pub mod destination;
pub mod error;
pub mod layout;
pub mod path;
pub mod registry;
pub mod selection;
pub mod submit;
pub mod tree;
pub mod validation;

pub use destination::Destination;
pub use error::FormError;
pub use layout::{FieldKind, FieldSpec, FormLayout, ScopeSpec, SelectSource, initial_data};
pub use path::FieldPath;
pub use registry::{FieldAccessor, FieldRegistry, Scope, TextField};
pub use selection::{DependentSelector, DivisionRequest, StalePolicy};
pub use submit::{SubmitOutcome, submit};
pub use tree::{FormValueTree, flatten, unflatten};
pub use validation::{REQUIRED_FIELDS, ReportMode, RequiredField, ValidationErrorSet, Validator};

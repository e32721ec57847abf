//! Structural schema validation.
//!
//! This module checks the raw JSON tree field by field and produces the typed
//! [`crate::model::Specification`], plus the finding record shared by every layer.

pub(crate) mod finding;
pub(crate) mod path;
pub(crate) mod validate;

pub use finding::{Finding, FindingClass, FindingCode};
pub use path::{SchemaPathElem, format_path};
pub use validate::validate_schema;

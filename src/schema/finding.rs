use super::path::{SchemaPathElem, format_path};
use serde::Serialize;
use std::fmt;

/// Stable machine-readable finding code.
///
/// The serialized string is the contract downstream tooling keys on; message text may change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCode {
    // structural
    MissingField,
    InvalidType,
    OutOfRange,
    InvalidLiteral,
    InvalidLength,
    UnknownVariant,
    MalformedPosition,

    // semantic, fatal
    DuplicateId,
    BadPosition,
    BadChannel,
    UnknownStation,

    // semantic, advisory
    MissingPlaceholder,
    NonMonotonicTimeframe,
    BackendRoleMismatch,
    SuspiciousNoiseTh,

    // pipeline
    LoadError,
    InternalError,
}

/// Which layer produced a finding and whether it blocks canonicalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FindingClass {
    Structural,
    SemanticFatal,
    SemanticAdvisory,
    Load,
}

impl FindingClass {
    pub fn is_fatal(self) -> bool {
        !matches!(self, FindingClass::SemanticAdvisory)
    }
}

impl FindingCode {
    pub fn as_str(self) -> &'static str {
        match self {
            FindingCode::MissingField => "missing_field",
            FindingCode::InvalidType => "invalid_type",
            FindingCode::OutOfRange => "out_of_range",
            FindingCode::InvalidLiteral => "invalid_literal",
            FindingCode::InvalidLength => "invalid_length",
            FindingCode::UnknownVariant => "unknown_variant",
            FindingCode::MalformedPosition => "malformed_position",
            FindingCode::DuplicateId => "duplicate_id",
            FindingCode::BadPosition => "bad_position",
            FindingCode::BadChannel => "bad_channel",
            FindingCode::UnknownStation => "unknown_station",
            FindingCode::MissingPlaceholder => "missing_placeholder",
            FindingCode::NonMonotonicTimeframe => "non_monotonic_timeframe",
            FindingCode::BackendRoleMismatch => "backend_role_mismatch",
            FindingCode::SuspiciousNoiseTh => "suspicious_noise_th",
            FindingCode::LoadError => "load_error",
            FindingCode::InternalError => "internal_error",
        }
    }

    pub fn class(self) -> FindingClass {
        match self {
            FindingCode::MissingField
            | FindingCode::InvalidType
            | FindingCode::OutOfRange
            | FindingCode::InvalidLiteral
            | FindingCode::InvalidLength
            | FindingCode::UnknownVariant
            | FindingCode::MalformedPosition => FindingClass::Structural,
            FindingCode::DuplicateId
            | FindingCode::BadPosition
            | FindingCode::BadChannel
            | FindingCode::UnknownStation => FindingClass::SemanticFatal,
            FindingCode::MissingPlaceholder
            | FindingCode::NonMonotonicTimeframe
            | FindingCode::BackendRoleMismatch
            | FindingCode::SuspiciousNoiseTh => FindingClass::SemanticAdvisory,
            FindingCode::LoadError | FindingCode::InternalError => FindingClass::Load,
        }
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One error or warning record: `{ loc, code, msg }`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Finding {
    pub loc: String,
    pub code: FindingCode,
    pub msg: String,
}

impl Finding {
    pub fn at(path: &[SchemaPathElem], code: FindingCode, msg: impl Into<String>) -> Self {
        Self {
            loc: format_path(path),
            code,
            msg: msg.into(),
        }
    }

    /// A finding scoped to the whole document.
    pub fn root(code: FindingCode, msg: impl Into<String>) -> Self {
        Self::at(&[], code, msg)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.loc, self.code, self.msg)
    }
}

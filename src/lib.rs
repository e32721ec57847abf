//! omenspec validates and canonicalizes wireless-network test scenario specs.
//!
//! A spec describes a topology (access points, stations, propagation model) and a timed list of
//! test actions. Before an emulator driver consumes it, omenspec decides whether it is well-formed
//! and internally consistent, and produces a stable canonical form plus a short fingerprint.
//!
//! # Pipeline overview
//!
//! 1. **Schema**: raw JSON tree -> [`Specification`] or structural [`Finding`]s
//! 2. **Semantics**: [`Specification`] -> fatal errors and advisory warnings
//! 3. **Canonicalize**: only when there are no errors, sorted-key bytes + `meta.schema_hash`
//! 4. **Report**: [`ValidationReport`] / [`Report`] as the single output contract
//!
//! Every run is a pure function of its input tree: no I/O inside the core, no shared state.
#![forbid(unsafe_code)]

mod foundation;

pub mod fingerprint;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod semantic;

pub use crate::fingerprint::{CanonicalSpec, canonicalize, fingerprint};
pub use crate::foundation::error::{SpecError, SpecResult};
pub use crate::foundation::position::{Position, PositionError, parse_position};
pub use crate::model::{
    AccessPoint, Backend, CommandAction, Meta, MoveAction, Nets, PropagationKind, PropagationModel,
    RadioMode, Specification, Station, TestAction, Topology,
};
pub use crate::pipeline::{
    ValidationReport, ValidatorOpts, validate_many, validate_path, validate_str, validate_value,
};
pub use crate::report::{Report, render_stderr_summary};
pub use crate::schema::{Finding, FindingClass, FindingCode, validate_schema};
pub use crate::semantic::{SemanticFindings, validate_semantics};

//! Wire shape of a run's outcome and the human-readable failure summary.

use crate::pipeline::ValidationReport;
use crate::schema::{Finding, FindingClass};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write as _;

/// `{ ok, errors, warnings[, canonical_spec] }`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub ok: bool,
    pub errors: &'a [Finding],
    pub warnings: &'a [Finding],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_spec: Option<&'a Value>,
}

impl<'a> Report<'a> {
    /// Borrow a report. The canonical form is attached whenever the run succeeded.
    pub fn new(report: &'a ValidationReport) -> Self {
        Self {
            ok: report.ok,
            errors: &report.errors,
            warnings: &report.warnings,
            canonical_spec: report
                .canonical
                .as_ref()
                .filter(|_| report.ok)
                .map(|c| c.value()),
        }
    }

    /// Drop the canonical form, keeping only the verdict and findings.
    pub fn without_spec(mut self) -> Self {
        self.canonical_spec = None;
        self
    }
}

/// Human summary of a failed run, one ` - loc [code]: msg` line per error.
pub fn render_stderr_summary(errors: &[Finding]) -> String {
    let headline = match errors.first().map(|f| f.code.class()) {
        Some(FindingClass::Load) => "LOAD_ERROR: spec could not be loaded",
        Some(FindingClass::Structural) => "VALIDATION_ERROR: schema validation failed",
        _ => "VALIDATION_ERROR: semantic validation failed",
    };

    let mut out = String::from(headline);
    out.push('\n');
    for f in errors {
        let _ = writeln!(out, " - {f}");
    }
    out
}

#[cfg(test)]
#[path = "../tests/unit/report.rs"]
mod tests;

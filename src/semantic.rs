//! Cross-entity checks over a structurally valid specification.
//!
//! Every check runs regardless of what the others found. Fatal findings go to `errors`, advisory
//! ones to `warnings`.

use crate::foundation::position::parse_position;
use crate::model::{Specification, TestAction};
use crate::pipeline::ValidatorOpts;
use crate::schema::{Finding, FindingCode, SchemaPathElem};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Running maximum before any move has been seen for a station. Below every valid timeframe.
const TIMEFRAME_SENTINEL: i64 = -1;

/// Output of [`validate_semantics`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SemanticFindings {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl SemanticFindings {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

#[tracing::instrument(skip(spec, opts), fields(name = %spec.meta.name))]
pub fn validate_semantics(spec: &Specification, opts: &ValidatorOpts) -> SemanticFindings {
    let mut out = SemanticFindings::default();

    check_unique_ids(spec, &mut out.errors);
    check_positions(spec, &mut out.errors);
    check_channels(spec, &mut out.errors);
    check_references(spec, opts, &mut out.errors, &mut out.warnings);
    check_timeframes(spec, &mut out.warnings);
    check_backend_roles(spec, &mut out.warnings);
    check_noise_threshold(spec, opts, &mut out.warnings);

    tracing::debug!(
        errors = out.errors.len(),
        warnings = out.warnings.len(),
        "semantic validation finished"
    );
    out
}

/// Access point and station ids share one namespace.
fn check_unique_ids(spec: &Specification, errors: &mut Vec<Finding>) {
    let pool: Vec<&str> = spec
        .topo
        .aps
        .iter()
        .map(|a| a.id.as_str())
        .chain(spec.topo.stations.iter().map(|s| s.id.as_str()))
        .collect();

    let mut seen = HashSet::with_capacity(pool.len());
    let mut dups = BTreeSet::new();
    for id in &pool {
        if !seen.insert(*id) {
            dups.insert(*id);
        }
    }

    if pool.len() != seen.len() {
        let list: Vec<String> = dups.iter().map(|d| format!("{d:?}")).collect();
        errors.push(Finding::at(
            &[
                SchemaPathElem::Field("topo"),
                SchemaPathElem::Field("{aps,stations}"),
                SchemaPathElem::Each,
                SchemaPathElem::Field("id"),
            ],
            FindingCode::DuplicateId,
            format!("duplicate node IDs found: {}", list.join(", ")),
        ));
    }
}

fn check_positions(spec: &Specification, errors: &mut Vec<Finding>) {
    let aps = spec.topo.aps.iter().map(|a| a.position.as_str());
    check_group_positions("aps", aps, errors);
    let stations = spec.topo.stations.iter().map(|s| s.position.as_str());
    check_group_positions("stations", stations, errors);
}

fn check_group_positions<'a>(
    group: &'static str,
    positions: impl Iterator<Item = &'a str>,
    errors: &mut Vec<Finding>,
) {
    for (i, position) in positions.enumerate() {
        if let Err(e) = parse_position(position) {
            errors.push(Finding::at(
                &[
                    SchemaPathElem::Field("topo"),
                    SchemaPathElem::Field(group),
                    SchemaPathElem::Index(i),
                    SchemaPathElem::Field("position"),
                ],
                FindingCode::BadPosition,
                e.to_string(),
            ));
        }
    }
}

/// Mode-specific channel policy, kept apart from the generic schema bound.
fn check_channels(spec: &Specification, errors: &mut Vec<Finding>) {
    for (i, ap) in spec.topo.aps.iter().enumerate() {
        if ap.mode.is_legacy_5ghz() && ap.channel <= 0 {
            errors.push(Finding::at(
                &[
                    SchemaPathElem::Field("topo"),
                    SchemaPathElem::Field("aps"),
                    SchemaPathElem::Index(i),
                    SchemaPathElem::Field("channel"),
                ],
                FindingCode::BadChannel,
                format!(
                    "5GHz channel must be a positive integer (e.g., 36), got {}",
                    ap.channel
                ),
            ));
        }
    }
}

fn check_references(
    spec: &Specification,
    opts: &ValidatorOpts,
    errors: &mut Vec<Finding>,
    warnings: &mut Vec<Finding>,
) {
    let stations: HashSet<&str> = spec.topo.stations.iter().map(|s| s.id.as_str()).collect();

    for (i, action) in spec.tests.iter().enumerate() {
        match action {
            TestAction::Move(m) => {
                if !stations.contains(m.node.as_str()) {
                    errors.push(Finding::at(
                        &test_path(i, "node"),
                        FindingCode::UnknownStation,
                        format!("{:?} is not a known station id", m.node),
                    ));
                }
            }
            TestAction::Command(c) => {
                if !c.cmd.contains(opts.placeholder.as_str()) {
                    warnings.push(Finding::at(
                        &test_path(i, "cmd"),
                        FindingCode::MissingPlaceholder,
                        format!("cmd does not include {:?} placeholder", opts.placeholder),
                    ));
                }
            }
        }
    }
}

/// Per-station running maximum of move timeframes.
#[derive(Default)]
struct TimeframeTracker<'a> {
    latest: HashMap<&'a str, i64>,
}

impl<'a> TimeframeTracker<'a> {
    fn latest(&self, station: &str) -> i64 {
        self.latest
            .get(station)
            .copied()
            .unwrap_or(TIMEFRAME_SENTINEL)
    }

    /// Record a move; returns the previous maximum when `timeframe` goes backwards.
    fn observe(&mut self, station: &'a str, timeframe: i64) -> Option<i64> {
        let prev = self.latest(station);
        if timeframe < prev {
            return Some(prev);
        }
        self.latest.insert(station, prev.max(timeframe));
        None
    }
}

fn check_timeframes(spec: &Specification, warnings: &mut Vec<Finding>) {
    let mut tracker = TimeframeTracker::default();

    for (i, action) in spec.tests.iter().enumerate() {
        let TestAction::Move(m) = action else {
            continue;
        };
        if let Some(prev) = tracker.observe(&m.node, m.timeframe) {
            warnings.push(Finding::at(
                &test_path(i, "timeframe"),
                FindingCode::NonMonotonicTimeframe,
                format!(
                    "timeframe {} for station {:?} comes after timeframe {prev}",
                    m.timeframe, m.node
                ),
            ));
        }
    }
}

fn check_backend_roles(spec: &Specification, warnings: &mut Vec<Finding>) {
    let wireless_nodes = !spec.topo.aps.is_empty() || !spec.topo.stations.is_empty();
    if !spec.meta.backend.is_wireless() && wireless_nodes {
        warnings.push(Finding::at(
            &[
                SchemaPathElem::Field("meta"),
                SchemaPathElem::Field("backend"),
            ],
            FindingCode::BackendRoleMismatch,
            format!(
                "APs/stations present but backend={:?}. Use \"mininet-wifi\" for Wi-Fi behavior.",
                spec.meta.backend.as_str()
            ),
        ));
    }
}

fn check_noise_threshold(spec: &Specification, opts: &ValidatorOpts, warnings: &mut Vec<Finding>) {
    let noise_th = spec.topo.nets.noise_th;
    if noise_th > opts.noise_ceiling_dbm {
        warnings.push(Finding::at(
            &[
                SchemaPathElem::Field("topo"),
                SchemaPathElem::Field("nets"),
                SchemaPathElem::Field("noise_th"),
            ],
            FindingCode::SuspiciousNoiseTh,
            format!("noise_th {noise_th} dBm is unusually high (less negative)"),
        ));
    }
}

fn test_path(i: usize, field: &'static str) -> [SchemaPathElem; 3] {
    [
        SchemaPathElem::Field("tests"),
        SchemaPathElem::Index(i),
        SchemaPathElem::Field(field),
    ]
}

#[cfg(test)]
#[path = "../tests/unit/semantic.rs"]
mod tests;

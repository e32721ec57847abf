//! Typed scenario specification.
//!
//! Values of these types are only ever produced by [`crate::schema::validate_schema`], so every
//! local field constraint already holds. Serialization is the input of canonicalization: field
//! names here are the wire names.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Specification {
    #[serde(rename = "schemaVersion")]
    pub schema_version: String,
    pub meta: Meta,
    pub topo: Topology,
    pub tests: Vec<TestAction>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Meta {
    pub backend: Backend,
    pub name: String,
    pub duration_s: u64,
}

/// Emulator flavour the scenario targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Backend {
    #[serde(rename = "mininet")]
    Mininet,
    #[serde(rename = "mininet-wifi")]
    MininetWifi,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Mininet, Backend::MininetWifi];

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Mininet => "mininet",
            Backend::MininetWifi => "mininet-wifi",
        }
    }

    pub fn from_literal(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == s)
    }

    /// Whether the backend can emulate access points and stations.
    pub fn is_wireless(self) -> bool {
        matches!(self, Backend::MininetWifi)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Topology {
    pub nets: Nets,
    pub aps: Vec<AccessPoint>,
    pub stations: Vec<Station>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Nets {
    pub noise_th: f64, // dBm, <= 0
    pub propagation_model: PropagationModel,
}

/// Radio propagation model, discriminated by `model`.
///
/// Per-variant required fields live on the variant itself; [`PropagationKind`] carries the rules
/// the schema layer needs before a variant can be built.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "model")]
pub enum PropagationModel {
    #[serde(rename = "logDistance")]
    LogDistance { exp: f64 },
    #[serde(rename = "logNormalShadowing")]
    LogNormalShadowing { exp: f64, std_dev: f64 },
}

impl PropagationModel {
    pub fn kind(&self) -> PropagationKind {
        match self {
            PropagationModel::LogDistance { .. } => PropagationKind::LogDistance,
            PropagationModel::LogNormalShadowing { .. } => PropagationKind::LogNormalShadowing,
        }
    }

    pub fn exp(&self) -> f64 {
        match *self {
            PropagationModel::LogDistance { exp } => exp,
            PropagationModel::LogNormalShadowing { exp, .. } => exp,
        }
    }
}

/// Discriminant of [`PropagationModel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropagationKind {
    LogDistance,
    LogNormalShadowing,
}

impl PropagationKind {
    pub const ALL: [PropagationKind; 2] = [
        PropagationKind::LogDistance,
        PropagationKind::LogNormalShadowing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PropagationKind::LogDistance => "logDistance",
            PropagationKind::LogNormalShadowing => "logNormalShadowing",
        }
    }

    pub fn from_literal(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Whether this model needs a positive `std_dev`.
    pub fn requires_std_dev(self) -> bool {
        matches!(self, PropagationKind::LogNormalShadowing)
    }

    /// Assemble the variant. `std_dev` is ignored by variants that do not use it.
    pub fn build(self, exp: f64, std_dev: Option<f64>) -> Option<PropagationModel> {
        match self {
            PropagationKind::LogDistance => Some(PropagationModel::LogDistance { exp }),
            PropagationKind::LogNormalShadowing => {
                std_dev.map(|std_dev| PropagationModel::LogNormalShadowing { exp, std_dev })
            }
        }
    }
}

/// 802.11 radio mode letter code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RadioMode {
    A,
    B,
    G,
    N,
    Ac,
    Ax,
}

impl RadioMode {
    pub const ALL: [RadioMode; 6] = [
        RadioMode::A,
        RadioMode::B,
        RadioMode::G,
        RadioMode::N,
        RadioMode::Ac,
        RadioMode::Ax,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RadioMode::A => "a",
            RadioMode::B => "b",
            RadioMode::G => "g",
            RadioMode::N => "n",
            RadioMode::Ac => "ac",
            RadioMode::Ax => "ax",
        }
    }

    pub fn from_literal(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }

    /// 802.11a, the legacy 5 GHz mode.
    pub fn is_legacy_5ghz(self) -> bool {
        matches!(self, RadioMode::A)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccessPoint {
    pub id: String,
    pub mode: RadioMode,
    pub channel: i64,
    pub ssid: String,
    pub position: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Station {
    pub id: String,
    pub position: String,
}

/// One step of the test plan, discriminated by `type`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TestAction {
    #[serde(rename = "node movements")]
    Move(MoveAction),
    #[serde(rename = "iw")]
    Command(CommandAction),
}

impl TestAction {
    pub const MOVE_TAG: &'static str = "node movements";
    pub const COMMAND_TAG: &'static str = "iw";

    pub fn name(&self) -> &str {
        match self {
            TestAction::Move(m) => &m.name,
            TestAction::Command(c) => &c.name,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            TestAction::Move(_) => Self::MOVE_TAG,
            TestAction::Command(_) => Self::COMMAND_TAG,
        }
    }
}

/// Relocate a station at a given timeframe.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MoveAction {
    pub name: String,
    pub node: String, // station id
    pub position: String,
    pub timeframe: i64,
}

/// Run a diagnostic command against every station interface.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommandAction {
    pub name: String,
    pub cmd: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<i64>,
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;

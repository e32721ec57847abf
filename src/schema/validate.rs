//! Structural validation of the raw JSON tree.
//!
//! Every field constraint is checked and every violation recorded; a broken sub-object is reported
//! once and its children skipped. A typed [`Specification`] is only produced when nothing was
//! recorded.

use super::finding::{Finding, FindingCode};
use super::path::SchemaPathElem;
use crate::foundation::position::Position;
use crate::model::{
    AccessPoint, Backend, CommandAction, Meta, MoveAction, Nets, PropagationKind, PropagationModel,
    RadioMode, Specification, Station, TestAction, Topology,
};
use serde_json::{Map, Value};

const META_NAME_LEN: (usize, usize) = (1, 64);
const SSID_LEN: (usize, usize) = (1, 32);
const NON_EMPTY: (usize, usize) = (1, usize::MAX);

#[derive(Clone, Copy, Debug)]
enum Bound {
    GreaterThan(f64),
    AtLeast(f64),
    AtMost(f64),
}

impl Bound {
    fn admits(self, v: f64) -> bool {
        match self {
            Bound::GreaterThan(b) => v > b,
            Bound::AtLeast(b) => v >= b,
            Bound::AtMost(b) => v <= b,
        }
    }

    fn describe(self) -> String {
        match self {
            Bound::GreaterThan(b) => format!("greater than {b}"),
            Bound::AtLeast(b) => format!("greater than or equal to {b}"),
            Bound::AtMost(b) => format!("less than or equal to {b}"),
        }
    }
}

/// Validate the shape of a raw specification tree.
///
/// Returns the typed specification, or every structural violation in document order.
#[tracing::instrument(skip(root))]
pub fn validate_schema(root: &Value) -> Result<Specification, Vec<Finding>> {
    let mut cx = SchemaCx::default();
    let spec = cx.specification(root);

    match spec {
        Some(spec) if cx.errors.is_empty() => Ok(spec),
        _ => {
            tracing::debug!(errors = cx.errors.len(), "schema validation failed");
            Err(cx.errors)
        }
    }
}

#[derive(Default)]
struct SchemaCx {
    path: Vec<SchemaPathElem>,
    errors: Vec<Finding>,
}

impl SchemaCx {
    fn scoped<T>(&mut self, elem: SchemaPathElem, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(elem);
        let out = f(self);
        self.path.pop();
        out
    }

    fn error(&mut self, code: FindingCode, msg: impl Into<String>) {
        self.errors.push(Finding::at(&self.path, code, msg));
    }

    fn error_at(&mut self, key: &'static str, code: FindingCode, msg: impl Into<String>) {
        self.scoped(SchemaPathElem::Field(key), |cx| cx.error(code, msg));
    }

    fn object<'v>(&mut self, v: &'v Value) -> Option<&'v Map<String, Value>> {
        match v.as_object() {
            Some(m) => Some(m),
            None => {
                self.error(
                    FindingCode::InvalidType,
                    format!("expected an object, got {}", kind_of(v)),
                );
                None
            }
        }
    }

    fn array<'v>(&mut self, v: &'v Value) -> Option<&'v Vec<Value>> {
        match v.as_array() {
            Some(a) => Some(a),
            None => {
                self.error(
                    FindingCode::InvalidType,
                    format!("expected an array, got {}", kind_of(v)),
                );
                None
            }
        }
    }

    fn field<'v>(&mut self, map: &'v Map<String, Value>, key: &'static str) -> Option<&'v Value> {
        let v = map.get(key);
        if v.is_none() {
            self.error_at(key, FindingCode::MissingField, "field required");
        }
        v
    }

    fn string(
        &mut self,
        map: &Map<String, Value>,
        key: &'static str,
        (min, max): (usize, usize),
    ) -> Option<String> {
        let v = self.field(map, key)?;
        self.scoped(SchemaPathElem::Field(key), |cx| {
            let Some(s) = v.as_str() else {
                cx.error(
                    FindingCode::InvalidType,
                    format!("expected a string, got {}", kind_of(v)),
                );
                return None;
            };
            let len = s.chars().count();
            if len < min || len > max {
                let msg = if max == usize::MAX {
                    format!("string should have at least {min} character(s)")
                } else {
                    format!("string should have between {min} and {max} characters, got {len}")
                };
                cx.error(FindingCode::InvalidLength, msg);
                return None;
            }
            Some(s.to_owned())
        })
    }

    /// Any string, empty included.
    fn text(&mut self, map: &Map<String, Value>, key: &'static str) -> Option<String> {
        self.string(map, key, (0, usize::MAX))
    }

    fn integer_value(&mut self, v: &Value, bound: Bound) -> Option<i64> {
        let Some(n) = v.as_number() else {
            self.error(
                FindingCode::InvalidType,
                format!("expected an integer, got {}", kind_of(v)),
            );
            return None;
        };
        let Some(i) = n.as_i64() else {
            if n.is_u64() {
                self.error(FindingCode::OutOfRange, format!("integer {n} is too large"));
            } else {
                self.error(
                    FindingCode::InvalidType,
                    format!("expected an integer, got {n}"),
                );
            }
            return None;
        };
        if !bound.admits(i as f64) {
            self.error(
                FindingCode::OutOfRange,
                format!("value should be {}, got {i}", bound.describe()),
            );
            return None;
        }
        Some(i)
    }

    fn integer(
        &mut self,
        map: &Map<String, Value>,
        key: &'static str,
        bound: Bound,
    ) -> Option<i64> {
        let v = self.field(map, key)?;
        self.scoped(SchemaPathElem::Field(key), |cx| cx.integer_value(v, bound))
    }

    /// Absent and `null` both mean "not given". The outer `None` means the value was rejected.
    fn optional_integer(
        &mut self,
        map: &Map<String, Value>,
        key: &'static str,
        bound: Bound,
    ) -> Option<Option<i64>> {
        match map.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(v) => self
                .scoped(SchemaPathElem::Field(key), |cx| cx.integer_value(v, bound))
                .map(Some),
        }
    }

    fn number(&mut self, map: &Map<String, Value>, key: &'static str, bound: Bound) -> Option<f64> {
        let v = self.field(map, key)?;
        self.scoped(SchemaPathElem::Field(key), |cx| {
            let Some(x) = v.as_f64().filter(|x| x.is_finite()) else {
                cx.error(
                    FindingCode::InvalidType,
                    format!("expected a number, got {}", kind_of(v)),
                );
                return None;
            };
            if !bound.admits(x) {
                cx.error(
                    FindingCode::OutOfRange,
                    format!("value should be {}, got {x}", bound.describe()),
                );
                return None;
            }
            Some(x)
        })
    }

    fn literal<T: Copy>(
        &mut self,
        map: &Map<String, Value>,
        key: &'static str,
        allowed: &[T],
        as_str: fn(T) -> &'static str,
    ) -> Option<T> {
        let s = self.text(map, key)?;
        let found = allowed.iter().copied().find(|t| as_str(*t) == s);
        if found.is_none() {
            let names: Vec<String> = allowed
                .iter()
                .map(|t| format!("{:?}", as_str(*t)))
                .collect();
            self.error_at(
                key,
                FindingCode::InvalidLiteral,
                format!("expected one of {}, got {s:?}", names.join(", ")),
            );
        }
        found
    }

    fn position(&mut self, map: &Map<String, Value>, key: &'static str) -> Option<String> {
        let s = self.text(map, key)?;
        if !Position::is_position_shaped(&s) {
            self.error_at(
                key,
                FindingCode::MalformedPosition,
                format!("position must be 'x,y,z' with numeric components, got {s:?}"),
            );
            return None;
        }
        Some(s)
    }

    /// Validate each element of an optional array field (absent means empty).
    fn list<T>(
        &mut self,
        map: &Map<String, Value>,
        key: &'static str,
        required: bool,
        mut item: impl FnMut(&mut Self, &Value) -> Option<T>,
    ) -> Option<Vec<T>> {
        let v = match map.get(key) {
            Some(v) => v,
            None if required => {
                self.error_at(key, FindingCode::MissingField, "field required");
                return None;
            }
            None => return Some(Vec::new()),
        };

        self.scoped(SchemaPathElem::Field(key), |cx| {
            let items = cx.array(v)?;
            let mut out = Vec::with_capacity(items.len());
            let mut ok = true;
            for (i, it) in items.iter().enumerate() {
                match cx.scoped(SchemaPathElem::Index(i), |cx| item(cx, it)) {
                    Some(t) => out.push(t),
                    None => ok = false,
                }
            }
            ok.then_some(out)
        })
    }

    fn specification(&mut self, root: &Value) -> Option<Specification> {
        let map = self.object(root)?;

        let schema_version = self.string(map, "schemaVersion", NON_EMPTY);
        let meta = self
            .field(map, "meta")
            .and_then(|v| self.scoped(SchemaPathElem::Field("meta"), |cx| cx.meta(v)));
        let topo = self
            .field(map, "topo")
            .and_then(|v| self.scoped(SchemaPathElem::Field("topo"), |cx| cx.topology(v)));
        let tests = self.list(map, "tests", true, |cx, v| cx.test_action(v));

        Some(Specification {
            schema_version: schema_version?,
            meta: meta?,
            topo: topo?,
            tests: tests?,
        })
    }

    fn meta(&mut self, v: &Value) -> Option<Meta> {
        let map = self.object(v)?;
        let backend = self.literal(map, "backend", &Backend::ALL, Backend::as_str);
        let name = self.string(map, "name", META_NAME_LEN);
        let duration_s = self.integer(map, "duration_s", Bound::GreaterThan(0.0));
        // `schema_hash` from an earlier canonicalization is accepted and recomputed later.

        Some(Meta {
            backend: backend?,
            name: name?,
            duration_s: u64::try_from(duration_s?).ok()?,
        })
    }

    fn topology(&mut self, v: &Value) -> Option<Topology> {
        let map = self.object(v)?;
        let nets = self
            .field(map, "nets")
            .and_then(|v| self.scoped(SchemaPathElem::Field("nets"), |cx| cx.nets(v)));
        let aps = self.list(map, "aps", false, |cx, v| cx.access_point(v));
        let stations = self.list(map, "stations", false, |cx, v| cx.station(v));

        Some(Topology {
            nets: nets?,
            aps: aps?,
            stations: stations?,
        })
    }

    fn nets(&mut self, v: &Value) -> Option<Nets> {
        let map = self.object(v)?;
        let noise_th = self.number(map, "noise_th", Bound::AtMost(0.0));
        let propagation_model = self.field(map, "propagation_model").and_then(|v| {
            self.scoped(SchemaPathElem::Field("propagation_model"), |cx| {
                cx.propagation_model(v)
            })
        });

        Some(Nets {
            noise_th: noise_th?,
            propagation_model: propagation_model?,
        })
    }

    fn propagation_model(&mut self, v: &Value) -> Option<PropagationModel> {
        let map = self.object(v)?;
        let kind = self.literal(map, "model", &PropagationKind::ALL, PropagationKind::as_str);
        let exp = self.number(map, "exp", Bound::GreaterThan(0.0));

        // Without a recognized discriminant there is no rule to check `std_dev` against.
        let kind = kind?;
        let std_dev = if kind.requires_std_dev() {
            self.number(map, "std_dev", Bound::GreaterThan(0.0))
        } else {
            None
        };

        kind.build(exp?, std_dev)
    }

    fn access_point(&mut self, v: &Value) -> Option<AccessPoint> {
        let map = self.object(v)?;
        let id = self.string(map, "id", NON_EMPTY);
        let mode = self.literal(map, "mode", &RadioMode::ALL, RadioMode::as_str);
        let channel = self.integer(map, "channel", Bound::GreaterThan(0.0));
        let ssid = self.string(map, "ssid", SSID_LEN);
        let position = self.position(map, "position");

        Some(AccessPoint {
            id: id?,
            mode: mode?,
            channel: channel?,
            ssid: ssid?,
            position: position?,
        })
    }

    fn station(&mut self, v: &Value) -> Option<Station> {
        let map = self.object(v)?;
        let id = self.string(map, "id", NON_EMPTY);
        let position = self.position(map, "position");

        Some(Station {
            id: id?,
            position: position?,
        })
    }

    fn test_action(&mut self, v: &Value) -> Option<TestAction> {
        let map = self.object(v)?;
        let tag = self.text(map, "type")?;

        match tag.as_str() {
            TestAction::MOVE_TAG => self.move_action(map).map(TestAction::Move),
            TestAction::COMMAND_TAG => self.command_action(map).map(TestAction::Command),
            other => {
                self.error_at(
                    "type",
                    FindingCode::UnknownVariant,
                    format!(
                        "unknown test type {other:?}, expected {:?} or {:?}",
                        TestAction::MOVE_TAG,
                        TestAction::COMMAND_TAG
                    ),
                );
                None
            }
        }
    }

    fn move_action(&mut self, map: &Map<String, Value>) -> Option<MoveAction> {
        let name = self.text(map, "name");
        let node = self.text(map, "node");
        let position = self.position(map, "position");
        let timeframe = self.integer(map, "timeframe", Bound::AtLeast(0.0));

        Some(MoveAction {
            name: name?,
            node: node?,
            position: position?,
            timeframe: timeframe?,
        })
    }

    fn command_action(&mut self, map: &Map<String, Value>) -> Option<CommandAction> {
        let name = self.text(map, "name");
        let cmd = self.text(map, "cmd");
        let timeframe = self.optional_integer(map, "timeframe", Bound::AtLeast(0.0));

        Some(CommandAction {
            name: name?,
            cmd: cmd?,
            timeframe: timeframe?,
        })
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/validate.rs"]
mod tests;

//! `"x,y,z"` coordinate strings.
//!
//! Grammar: optional surrounding whitespace, three comma-separated decimals, each with an
//! optional leading `-` and an optional fractional part. Whitespace around commas is tolerated.
//! No exponents, no more or fewer than three components.
//!
//! The grammar check and the numeric decomposition are kept apart so a shape failure
//! ([`PositionError::Malformed`]) and a value failure ([`PositionError::NonFinite`]) stay
//! distinguishable. The schema layer only asks [`Position::is_position_shaped`]; the semantic layer
//! decomposes.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

// ASCII digits only: `\d` would accept other Unicode decimal digits that `f64` cannot parse.
static POSITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(-?[0-9]+(?:\.[0-9]+)?)\s*,\s*(-?[0-9]+(?:\.[0-9]+)?)\s*,\s*(-?[0-9]+(?:\.[0-9]+)?)\s*$",
    )
    .expect("position grammar is a valid regex")
});

/// A decoded 3-component coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

/// Why a coordinate string was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The string does not match the `x,y,z` grammar.
    #[error("position must be 'x,y,z' with numeric components, got {0:?}")]
    Malformed(String),

    /// The string matches the grammar but a component does not decode to a finite float.
    #[error("cannot parse {0:?} as three finite floats")]
    NonFinite(String),
}

impl Position {
    /// Whether `s` matches the coordinate grammar, without decoding it.
    pub fn is_position_shaped(s: &str) -> bool {
        POSITION_RE.is_match(s)
    }

    /// Components as an `[x, y, z]` array.
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// Parse an `"x,y,z"` string into three finite floats.
pub fn parse_position(s: &str) -> Result<Position, PositionError> {
    let Some(caps) = POSITION_RE.captures(s) else {
        return Err(PositionError::Malformed(s.to_owned()));
    };

    let mut out = [0.0f64; 3];
    for (slot, idx) in out.iter_mut().zip(1..=3) {
        let v = caps
            .get(idx)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or_else(|| PositionError::NonFinite(s.to_owned()))?;
        *slot = v;
    }

    Ok(Position {
        x: out[0],
        y: out[1],
        z: out[2],
    })
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/position.rs"]
mod tests;

//! Compounding conventions for zero rates.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CurveError;

/// How a zero rate turns into a discount factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Compounding {
    /// Continuous compounding: `df = exp(-z t)`.
    Continuous,
    /// Simple annual compounding: `df = 1 / (1 + z t)`.
    Simple,
    /// Street convention, compounded `m` times per year:
    /// `df = (1 + z/m)^(-m t)`.
    Street(u32),
}

impl Compounding {
    /// Discount factor for zero rate `z` (decimal) at time `t` (years).
    #[must_use]
    pub fn df(&self, z: f64, t: f64) -> f64 {
        match self {
            Compounding::Continuous => (-z * t).exp(),
            Compounding::Simple => 1.0 / (1.0 + z * t),
            Compounding::Street(m) => {
                let m = f64::from(*m);
                (1.0 + z / m).powf(-m * t)
            }
        }
    }

    /// Parses `cont`, `simple`, `street`, or `street:m`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::UnsupportedCompounding` for anything else or
    /// for a non-positive street frequency.
    pub fn parse(s: &str) -> Result<Self, CurveError> {
        let t = s.trim();
        match t.to_ascii_lowercase().as_str() {
            "cont" | "continuous" => return Ok(Compounding::Continuous),
            "simple" => return Ok(Compounding::Simple),
            "street" => return Ok(Compounding::Street(2)),
            _ => {}
        }
        if let Some(rest) = t.to_ascii_lowercase().strip_prefix("street:") {
            let spec = rest.strip_prefix("m=").unwrap_or(rest);
            if let Ok(m) = spec.parse::<u32>() {
                if m > 0 {
                    return Ok(Compounding::Street(m));
                }
            }
        }
        Err(CurveError::UnsupportedCompounding { name: s.into() })
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compounding::Continuous => write!(f, "continuous"),
            Compounding::Simple => write!(f, "simple"),
            Compounding::Street(m) => write!(f, "street:{m}"),
        }
    }
}

impl std::str::FromStr for Compounding {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Compounding {
    type Error = CurveError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Compounding> for String {
    fn from(c: Compounding) -> Self {
        c.to_string()
    }
}

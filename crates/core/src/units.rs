//! Lengths in English Metric Units (EMU), the integer unit of OOXML geometry.

use serde::{Deserialize, Serialize};
use std::fmt;

const EMUS_PER_INCH: f64 = 914_400.0;
const EMUS_PER_PT: f64 = 12_700.0;
const EMUS_PER_CM: f64 = 360_000.0;
const EMUS_PER_CENTIPOINT: i64 = 127;

/// A length in EMU. 914400 EMU make one inch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Emu(pub i64);

impl Emu {
    /// Length from inches, truncated toward zero.
    pub fn from_inches(inches: f64) -> Self {
        Self((inches * EMUS_PER_INCH) as i64)
    }

    /// Length from typographic points, truncated toward zero.
    pub fn from_pt(points: f64) -> Self {
        Self((points * EMUS_PER_PT) as i64)
    }

    /// Length from centimeters, truncated toward zero.
    pub fn from_cm(cm: f64) -> Self {
        Self((cm * EMUS_PER_CM) as i64)
    }

    /// Length from hundredths of a point, as stored in a run's `sz` attribute.
    pub fn from_centipoints(centipoints: i64) -> Self {
        Self(centipoints.saturating_mul(EMUS_PER_CENTIPOINT))
    }

    /// Hundredths of a point, the unit of a run's `sz` attribute.
    pub fn centipoints(self) -> i64 {
        self.0 / EMUS_PER_CENTIPOINT
    }

    pub fn inches(self) -> f64 {
        self.0 as f64 / EMUS_PER_INCH
    }

    pub fn pt(self) -> f64 {
        self.0 as f64 / EMUS_PER_PT
    }
}

impl fmt::Display for Emu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shorthand for [`Emu::from_inches`].
pub fn inches(value: f64) -> Emu {
    Emu::from_inches(value)
}

/// Shorthand for [`Emu::from_pt`].
pub fn pt(value: f64) -> Emu {
    Emu::from_pt(value)
}

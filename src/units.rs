//! Document length units.
//!
//! Presentation geometry is expressed in EMU (English Metric Units):
//! 914400 per inch, 12700 per point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// EMU per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// A length in English Metric Units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Emu(pub i64);

impl Emu {
    /// Convert a length in inches. Fractional EMU are truncated.
    pub fn from_inches(inches: f64) -> Self {
        Emu((inches * EMU_PER_INCH as f64) as i64)
    }

    /// The length in inches.
    pub fn inches(self) -> f64 {
        self.0 as f64 / EMU_PER_INCH as f64
    }
}

impl Add for Emu {
    type Output = Emu;

    fn add(self, rhs: Emu) -> Emu {
        Emu(self.0 + rhs.0)
    }
}

impl Mul<i64> for Emu {
    type Output = Emu;

    fn mul(self, rhs: i64) -> Emu {
        Emu(self.0 * rhs)
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

/// A placed rectangle on a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: Emu,
    pub top: Emu,
    pub width: Emu,
    pub height: Emu,
}

impl Rect {
    pub fn new(left: Emu, top: Emu, width: Emu, height: Emu) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

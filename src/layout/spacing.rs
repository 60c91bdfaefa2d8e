use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Distance between neighbouring slots (horizontal) and levels (vertical).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Spacing {
    pub fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.horizontal) && ok(self.vertical) {
            Ok(())
        } else {
            Err(LayoutError::InvalidSpacing {
                horizontal: self.horizontal,
                vertical: self.vertical,
            })
        }
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Density::default().spacing()
    }
}

/// Display density of the chart.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Compact,
    #[default]
    Comfortable,
}

impl Density {
    pub fn spacing(self) -> Spacing {
        match self {
            Density::Compact => Spacing::new(180.0, 120.0),
            Density::Comfortable => Spacing::new(280.0, 180.0),
        }
    }

    pub fn next(self) -> Self {
        match self {
            Density::Compact => Density::Comfortable,
            Density::Comfortable => Density::Compact,
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Density::Compact => write!(f, "compact"),
            Density::Comfortable => write!(f, "comfortable"),
        }
    }
}

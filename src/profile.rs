use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Density used wherever a reserve has no reported density.
pub const FALLBACK_DENSITY: f64 = 10.0;

const UNDETERMINED: &str = "Undetermined";

/// Reported predator count per 100 km², or a marker that no figure exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDensity", into = "RawDensity")]
pub enum DensityIndicator {
    Known(f64),
    Undetermined,
}

impl DensityIndicator {
    pub fn value(self) -> Option<f64> {
        match self {
            DensityIndicator::Known(value) => Some(value),
            DensityIndicator::Undetermined => None,
        }
    }

    /// Numeric density with the fallback applied.
    pub fn or_fallback(self) -> f64 {
        self.value().unwrap_or(FALLBACK_DENSITY)
    }
}

impl fmt::Display for DensityIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DensityIndicator::Known(value) => write!(f, "{value}"),
            DensityIndicator::Undetermined => f.write_str(UNDETERMINED),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawDensity {
    Number(f64),
    Marker(String),
}

impl TryFrom<RawDensity> for DensityIndicator {
    type Error = String;

    fn try_from(raw: RawDensity) -> Result<Self, Self::Error> {
        match raw {
            RawDensity::Number(value) => Ok(DensityIndicator::Known(value)),
            RawDensity::Marker(text) if text.eq_ignore_ascii_case(UNDETERMINED) => {
                Ok(DensityIndicator::Undetermined)
            }
            RawDensity::Marker(text) => Err(format!(
                "density must be a number or '{UNDETERMINED}', got '{text}'"
            )),
        }
    }
}

impl From<DensityIndicator> for RawDensity {
    fn from(value: DensityIndicator) -> Self {
        match value {
            DensityIndicator::Known(value) => RawDensity::Number(value),
            DensityIndicator::Undetermined => RawDensity::Marker(UNDETERMINED.to_string()),
        }
    }
}

/// Static attributes of one protected area, in km².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaProfile {
    pub total_area: f64,
    pub core_area: f64,
    pub buffer_area: f64,
    pub density: DensityIndicator,
}

impl AreaProfile {
    pub fn area_factor(&self) -> f64 {
        self.total_area / 1_000.0
    }

    /// Returns the area factor, rejecting profiles the engine cannot step.
    pub fn validate(&self) -> Result<f64, SimulationError> {
        let area_factor = self.area_factor();
        if !area_factor.is_finite() || area_factor <= 0.0 {
            return Err(SimulationError::InvalidProfile(format!(
                "total area must be a positive number of km², got {}",
                self.total_area
            )));
        }
        if !self.core_area.is_finite() || !self.buffer_area.is_finite() {
            return Err(SimulationError::InvalidProfile(
                "core and buffer areas must be finite".into(),
            ));
        }
        if let DensityIndicator::Known(value) = self.density {
            if !value.is_finite() {
                return Err(SimulationError::InvalidProfile(format!(
                    "density must be finite, got {value}"
                )));
            }
        }
        Ok(area_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(total_area: f64) -> AreaProfile {
        AreaProfile {
            total_area,
            core_area: 1.0,
            buffer_area: 1.0,
            density: DensityIndicator::Known(5.0),
        }
    }

    #[test]
    fn density_parses_numbers_and_marker() {
        let known: DensityIndicator = serde_yaml::from_str("16.5").unwrap();
        assert_eq!(known, DensityIndicator::Known(16.5));
        let marker: DensityIndicator = serde_yaml::from_str("Undetermined").unwrap();
        assert_eq!(marker, DensityIndicator::Undetermined);
        assert!(serde_yaml::from_str::<DensityIndicator>("lots").is_err());
    }

    #[test]
    fn undetermined_density_uses_fallback() {
        assert_eq!(DensityIndicator::Undetermined.or_fallback(), FALLBACK_DENSITY);
        assert_eq!(DensityIndicator::Known(46.0).or_fallback(), 46.0);
        assert_eq!(DensityIndicator::Undetermined.to_string(), "Undetermined");
        assert_eq!(DensityIndicator::Known(11.0).to_string(), "11");
    }

    #[test]
    fn non_positive_area_is_rejected() {
        assert!(matches!(
            profile(0.0).validate(),
            Err(SimulationError::InvalidProfile(_))
        ));
        assert!(profile(-12.0).validate().is_err());
        assert!(profile(f64::NAN).validate().is_err());
        assert_eq!(profile(2_500.0).validate().unwrap(), 2.5);
    }
}

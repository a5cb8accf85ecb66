use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_prey_growth() -> f64 {
    0.3
}

fn default_predation() -> f64 {
    0.01
}

fn default_predator_death() -> f64 {
    0.1
}

fn default_predator_growth() -> f64 {
    0.001
}

fn default_vegetation_growth() -> f64 {
    0.1
}

fn default_vegetation_capacity() -> f64 {
    0.8
}

fn default_vegetation_consumption() -> f64 {
    0.05
}

/// Global rates of the predator/prey/vegetation model. Immutable once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelCoefficients {
    /// α
    #[serde(default = "default_prey_growth")]
    pub prey_growth: f64,
    /// β
    #[serde(default = "default_predation")]
    pub predation: f64,
    /// δ
    #[serde(default = "default_predator_death")]
    pub predator_death: f64,
    /// γ
    #[serde(default = "default_predator_growth")]
    pub predator_growth: f64,
    /// r
    #[serde(default = "default_vegetation_growth")]
    pub vegetation_growth: f64,
    /// K
    #[serde(default = "default_vegetation_capacity")]
    pub vegetation_capacity: f64,
    /// c
    #[serde(default = "default_vegetation_consumption")]
    pub vegetation_consumption: f64,
}

impl Default for ModelCoefficients {
    fn default() -> Self {
        Self {
            prey_growth: default_prey_growth(),
            predation: default_predation(),
            predator_death: default_predator_death(),
            predator_growth: default_predator_growth(),
            vegetation_growth: default_vegetation_growth(),
            vegetation_capacity: default_vegetation_capacity(),
            vegetation_consumption: default_vegetation_consumption(),
        }
    }
}

impl ModelCoefficients {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("prey_growth", self.prey_growth),
            ("predation", self.predation),
            ("predator_death", self.predator_death),
            ("predator_growth", self.predator_growth),
            ("vegetation_growth", self.vegetation_growth),
            ("vegetation_capacity", self.vegetation_capacity),
            ("vegetation_consumption", self.vegetation_consumption),
        ];
        for (name, value) in named {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Coefficient { name, value });
            }
        }
        Ok(())
    }
}

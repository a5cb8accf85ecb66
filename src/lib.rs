pub mod catalogue;
pub mod coefficients;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod insights;
pub mod profile;
pub mod report;
pub mod rng;
pub mod spatial;
pub mod web;

pub use coefficients::ModelCoefficients;
pub use engine::{run, SimulationEngine, SimulationSample, SimulationState};
pub use error::SimulationError;
pub use profile::{AreaProfile, DensityIndicator};

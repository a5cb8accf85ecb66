use std::f64::consts::PI;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    coefficients::ModelCoefficients,
    error::SimulationError,
    profile::AreaProfile,
};

pub const DEFAULT_HORIZON: usize = 100;

const PREY_FLOOR: f64 = 100.0;
const PREDATOR_FLOOR: f64 = 1.0;
const VEGETATION_MIN: f64 = 0.2;
const VEGETATION_MAX: f64 = 1.0;

const PREY_NOISE: f64 = 0.1;
const PREDATOR_NOISE: f64 = 0.05;
const VEGETATION_NOISE: f64 = 0.02;

/// One simulated month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSample {
    pub time: usize,
    pub prey: i64,
    pub predator: i64,
    /// NDVI, rounded to two decimals.
    pub vegetation_index: f64,
}

/// Mutable state of a single run. Never outlives the run that created it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub prey: f64,
    pub predator: f64,
    pub vegetation: f64,
    area_factor: f64,
}

impl SimulationState {
    pub fn initial(profile: &AreaProfile) -> Result<Self, SimulationError> {
        let area_factor = profile.validate()?;
        let density = profile.density.or_fallback();

        let mut prey = (area_factor * 1_000.0).clamp(1_000.0, 5_000.0);
        let predator = (density * 2.0).clamp(10.0, 100.0);
        let vegetation = (density / 50.0).clamp(0.3, 0.8);

        if profile.core_area > 1_000.0 {
            prey *= 1.2;
        }
        if profile.buffer_area > 500.0 {
            prey *= 1.1;
        }

        Ok(Self {
            prey,
            predator,
            vegetation,
            area_factor,
        })
    }

    pub fn area_factor(&self) -> f64 {
        self.area_factor
    }

    /// Deterministic part of one step: rates, update and bounds.
    pub fn advance(&mut self, t: usize, k: &ModelCoefficients) {
        let prey_growth =
            k.prey_growth * self.prey * (1.0 - self.prey / (5_000.0 * self.area_factor));
        let prey_death = k.predation * self.prey * self.predator;
        let predator_growth = k.predator_growth * self.predator * self.prey;
        let predator_death = k.predator_death * self.predator;

        let vegetation_growth = k.vegetation_growth
            * self.vegetation
            * (1.0 - self.vegetation / k.vegetation_capacity)
            + seasonal_factor(t);
        let vegetation_consumption = k.vegetation_consumption * self.vegetation * self.prey;

        self.prey += prey_growth - prey_death;
        self.predator += predator_growth - predator_death;
        self.vegetation += vegetation_growth - vegetation_consumption;

        self.prey = self.prey.max(PREY_FLOOR);
        self.predator = self.predator.max(PREDATOR_FLOOR);
        self.vegetation = self.vegetation.clamp(VEGETATION_MIN, VEGETATION_MAX);
    }

    /// Multiplicative noise, applied after the bounds and never re-clamped.
    pub fn perturb<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.prey *= 1.0 + (rng.gen::<f64>() - 0.5) * PREY_NOISE;
        self.predator *= 1.0 + (rng.gen::<f64>() - 0.5) * PREDATOR_NOISE;
        self.vegetation *= 1.0 + (rng.gen::<f64>() - 0.5) * VEGETATION_NOISE;
    }

    pub fn sample(&self, t: usize) -> SimulationSample {
        SimulationSample {
            time: t,
            prey: self.prey.round() as i64,
            predator: self.predator.round() as i64,
            // Rounds the scaled binary value; may differ from a decimal
            // `.xx5` tie rule by one hundredth when v*100 lands on k + 0.5.
            vegetation_index: (self.vegetation * 100.0).round() / 100.0,
        }
    }
}

/// Annual oscillation added to vegetation growth at month `t`.
pub fn seasonal_factor(t: usize) -> f64 {
    0.1 * (2.0 * PI * t as f64 / 12.0).sin()
}

#[derive(Debug, Clone, Copy)]
pub struct SimulationEngine {
    coefficients: ModelCoefficients,
    horizon: usize,
}

impl SimulationEngine {
    pub fn new(coefficients: ModelCoefficients) -> Self {
        Self {
            coefficients,
            horizon: DEFAULT_HORIZON,
        }
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn run<R: Rng + ?Sized>(
        &self,
        profile: &AreaProfile,
        rng: &mut R,
    ) -> Result<Vec<SimulationSample>, SimulationError> {
        let mut samples = Vec::with_capacity(self.horizon);
        self.run_with_hook(profile, rng, |sample| samples.push(sample))?;
        Ok(samples)
    }

    /// Runs the whole horizon, handing each sample to `hook` as it is produced.
    /// Profile validation happens before the first step, so on error the hook
    /// is never called.
    pub fn run_with_hook<R, F>(
        &self,
        profile: &AreaProfile,
        rng: &mut R,
        mut hook: F,
    ) -> Result<(), SimulationError>
    where
        R: Rng + ?Sized,
        F: FnMut(SimulationSample),
    {
        let mut state = SimulationState::initial(profile)?;
        debug!(
            "simulation start: prey={:.2} predator={:.2} vegetation={:.2} horizon={}",
            state.prey, state.predator, state.vegetation, self.horizon
        );
        for t in 0..self.horizon {
            state.advance(t, &self.coefficients);
            state.perturb(rng);
            hook(state.sample(t));
        }
        debug!(
            "simulation finished: prey={:.2} predator={:.2} vegetation={:.2}",
            state.prey, state.predator, state.vegetation
        );
        Ok(())
    }
}

/// Single-call entry point for one run.
pub fn run<R: Rng + ?Sized>(
    profile: &AreaProfile,
    coefficients: &ModelCoefficients,
    horizon: usize,
    rng: &mut R,
) -> Result<Vec<SimulationSample>, SimulationError> {
    SimulationEngine::new(*coefficients)
        .with_horizon(horizon)
        .run(profile, rng)
}

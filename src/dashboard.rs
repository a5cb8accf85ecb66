//! Everything the presentation layer shows for one selected reserve.

use log::info;
use serde::Serialize;

use crate::{
    catalogue::Reserve,
    coefficients::ModelCoefficients,
    engine::{SimulationEngine, SimulationSample},
    error::SimulationError,
    insights::{recommendations, Recommendation, ReserveInsights},
    report::SimulationReport,
    rng::{FixedDraw, RngManager},
    spatial::SpatialSummary,
};

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub reserve: Reserve,
    pub center: [f64; 2],
    pub polygon: Vec<[f64; 2]>,
    pub insights: ReserveInsights,
    pub spatial: SpatialSummary,
    pub recommendations: Vec<Recommendation>,
}

impl Dashboard {
    pub fn for_reserve(reserve: &Reserve) -> Self {
        let spatial = SpatialSummary::for_reserve(reserve);
        Self {
            reserve: reserve.clone(),
            center: reserve.bounds.center(),
            polygon: reserve.bounds.polygon(),
            insights: ReserveInsights::for_reserve(reserve),
            recommendations: recommendations(reserve, &spatial),
            spatial,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRequest {
    pub seed: Option<u64>,
    pub horizon: usize,
    pub noise: bool,
}

impl RunRequest {
    /// Runs the simulation for `reserve`, streaming samples to `hook`, and
    /// returns the seed actually used (`None` with noise disabled).
    pub fn execute_with_hook<F>(
        &self,
        reserve: &Reserve,
        coefficients: &ModelCoefficients,
        hook: F,
    ) -> Result<Option<u64>, SimulationError>
    where
        F: FnMut(SimulationSample),
    {
        let engine = SimulationEngine::new(*coefficients).with_horizon(self.horizon);
        let profile = reserve.profile();
        if !self.noise {
            info!("simulating '{}' without noise", reserve.name);
            engine.run_with_hook(&profile, &mut FixedDraw::midpoint(), hook)?;
            return Ok(None);
        }
        let manager = self
            .seed
            .map(RngManager::new)
            .unwrap_or_else(RngManager::from_entropy);
        info!("simulating '{}' with seed {}", reserve.name, manager.seed());
        let mut rng = manager.stream(&reserve.name);
        engine.run_with_hook(&profile, &mut rng, hook)?;
        Ok(Some(manager.seed()))
    }

    pub fn execute(
        &self,
        reserve: &Reserve,
        coefficients: &ModelCoefficients,
    ) -> Result<SimulationReport, SimulationError> {
        let mut samples = Vec::with_capacity(self.horizon);
        let seed = self.execute_with_hook(reserve, coefficients, |sample| samples.push(sample))?;
        Ok(SimulationReport::new(
            &reserve.name,
            seed,
            *coefficients,
            samples,
        ))
    }
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{coefficients::ModelCoefficients, engine::SimulationSample};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl SeriesStats {
    fn from_values(values: impl Iterator<Item = f64>) -> Option<Self> {
        let mut count = 0_usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for value in values {
            count += 1;
            min = min.min(value);
            max = max.max(value);
            sum += value;
        }
        (count > 0).then(|| Self {
            min,
            max,
            mean: sum / count as f64,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub prey: SeriesStats,
    pub predator: SeriesStats,
    pub vegetation_index: SeriesStats,
    pub last: SimulationSample,
}

impl RunSummary {
    /// `None` for an empty run.
    pub fn from_samples(samples: &[SimulationSample]) -> Option<Self> {
        Some(Self {
            prey: SeriesStats::from_values(samples.iter().map(|s| s.prey as f64))?,
            predator: SeriesStats::from_values(samples.iter().map(|s| s.predator as f64))?,
            vegetation_index: SeriesStats::from_values(samples.iter().map(|s| s.vegetation_index))?,
            last: *samples.last()?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub reserve: String,
    pub generated_at: DateTime<Utc>,
    /// Absent when noise was disabled.
    pub seed: Option<u64>,
    pub noise: bool,
    pub horizon: usize,
    pub coefficients: ModelCoefficients,
    pub summary: Option<RunSummary>,
    pub samples: Vec<SimulationSample>,
}

impl SimulationReport {
    pub fn new(
        reserve: &str,
        seed: Option<u64>,
        coefficients: ModelCoefficients,
        samples: Vec<SimulationSample>,
    ) -> Self {
        Self {
            reserve: reserve.to_string(),
            generated_at: Utc::now(),
            seed,
            noise: seed.is_some(),
            horizon: samples.len(),
            coefficients,
            summary: RunSummary::from_samples(&samples),
            samples,
        }
    }
}

pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn write(&self, report: &SimulationReport) -> Result<PathBuf> {
        let dir = self.output_dir.join(slug(&report.reserve));
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create report dir {}", dir.display()))?;
        let file = format!(
            "run_{}.json",
            report.generated_at.format("%Y%m%dT%H%M%S%.3fZ")
        );
        let path = dir.join(file);
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        Ok(path)
    }
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

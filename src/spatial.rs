//! Banded spatial-distribution summary of a reserve.

use serde::{Deserialize, Serialize};

use crate::catalogue::Reserve;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialSummary {
    /// NDVI share on a 0-1 scale.
    pub ndvi: Bands,
    /// Prey animals per km².
    pub prey: Bands,
    /// Tigers per 100 km².
    pub predator: Bands,
}

impl SpatialSummary {
    pub fn for_reserve(reserve: &Reserve) -> Self {
        let density = reserve.tiger_density.or_fallback();
        let area_factor = reserve.total_area / 1_000.0;

        let ndvi = Bands {
            high: (density / 50.0).clamp(0.6, 0.8),
            medium: (density / 70.0).clamp(0.4, 0.6),
            low: (density / 100.0).clamp(0.2, 0.4),
        };

        let base_prey = (area_factor * 10.0).clamp(20.0, 50.0);
        let prey = Bands {
            high: (base_prey * 1.2).clamp(40.0, 60.0),
            medium: base_prey.clamp(20.0, 40.0),
            low: (base_prey * 0.8).clamp(10.0, 20.0),
        };

        let predator = Bands {
            high: (density * 1.2).clamp(20.0, 40.0),
            medium: density.clamp(10.0, 20.0),
            low: (density * 0.8).clamp(5.0, 10.0),
        };

        Self {
            ndvi,
            prey,
            predator,
        }
    }
}

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    error::CatalogueError,
    profile::{AreaProfile, DensityIndicator},
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lon_min: f64,
    pub lat_max: f64,
    pub lon_max: f64,
}

impl GeoBounds {
    /// (lat, lon) midpoint of the box.
    pub fn center(&self) -> [f64; 2] {
        [
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        ]
    }

    /// Closed (lat, lon) ring around the box, first point repeated last.
    pub fn polygon(&self) -> Vec<[f64; 2]> {
        vec![
            [self.lat_min, self.lon_min],
            [self.lat_max, self.lon_min],
            [self.lat_max, self.lon_max],
            [self.lat_min, self.lon_max],
            [self.lat_min, self.lon_min],
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reserve {
    pub id: u32,
    pub name: String,
    pub region: String,
    pub core_area: f64,
    pub buffer_area: f64,
    pub total_area: f64,
    pub tiger_density: DensityIndicator,
    #[serde(default)]
    pub notes: String,
    pub bounds: GeoBounds,
}

impl Reserve {
    pub fn profile(&self) -> AreaProfile {
        AreaProfile {
            total_area: self.total_area,
            core_area: self.core_area,
            buffer_area: self.buffer_area,
            density: self.tiger_density,
        }
    }

    /// Core area per km² of buffer, treating an empty buffer as 1 km².
    pub fn core_to_buffer_ratio(&self) -> f64 {
        let buffer = if self.buffer_area == 0.0 {
            1.0
        } else {
            self.buffer_area
        };
        self.core_area / buffer
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalogue {
    reserves: Vec<Reserve>,
}

impl Catalogue {
    pub fn new(reserves: Vec<Reserve>) -> Result<Self, CatalogueError> {
        let catalogue = Self { reserves };
        catalogue.validate()?;
        Ok(catalogue)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let catalogue: Catalogue = serde_yaml::from_str(text)?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    pub fn validate(&self) -> Result<(), CatalogueError> {
        if self.reserves.is_empty() {
            return Err(CatalogueError::Validation(
                "catalogue must define at least one reserve".into(),
            ));
        }
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for reserve in &self.reserves {
            if !ids.insert(reserve.id) {
                return Err(CatalogueError::Validation(format!(
                    "reserve id {} defined more than once",
                    reserve.id
                )));
            }
            if !names.insert(reserve.name.as_str()) {
                return Err(CatalogueError::Validation(format!(
                    "reserve '{}' defined more than once",
                    reserve.name
                )));
            }
        }
        Ok(())
    }

    pub fn reserves(&self) -> &[Reserve] {
        &self.reserves
    }

    pub fn len(&self) -> usize {
        self.reserves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reserves.is_empty()
    }

    pub fn find(&self, name: &str) -> Result<&Reserve, CatalogueError> {
        self.reserves
            .iter()
            .find(|reserve| reserve.name == name)
            .ok_or_else(|| CatalogueError::UnknownReserve(name.to_string()))
    }

    /// The reserve selected when nothing else is.
    pub fn default_reserve(&self) -> Option<&Reserve> {
        self.reserves.first()
    }
}

pub struct CatalogueLoader {
    base_dir: PathBuf,
}

impl CatalogueLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Catalogue> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalogue file {}", path.display()))?;
        Catalogue::from_yaml(&data).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

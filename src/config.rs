//! Generation configuration, validated once at construction.
//!
//! Validation failure is the only user-visible error in the crate;
//! generation itself always yields some terrain.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A settlement interior margin plus a 5x5 village footprint must fit
/// inside a chunk.
pub const MIN_CHUNK_SIZE: i32 = 16;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("chunk size must be at least {MIN_CHUNK_SIZE}, got {0}")]
    ChunkSizeTooSmall(i32),
    #[error("{name} must be positive, got {value}")]
    NonPositiveScale { name: &'static str, value: f64 },
    #[error("{name} must lie in (0, 1), got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
    #[error("ocean threshold {ocean} must sit below mountain threshold {mountain}")]
    BandOrdering { ocean: f64, mountain: f64 },
    #[error("village density must lie in [0, 1], got {0}")]
    DensityOutOfRange(f64),
    #[error("{name} must be non-negative, got {value}")]
    NegativeDistance { name: &'static str, value: f64 },
    #[error("minimum water cluster size must be at least 1")]
    ZeroWaterCluster,
}

/// All knobs of the generator. Immutable after construction; a
/// [`crate::world::WorldMap`] takes it by value and validates it once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub world_seed: u64,
    pub chunk_size: i32,
    pub height_scale: f64,
    pub detail_scale: f64,
    pub biome_scale: f64,
    pub river_scale: f64,
    pub cliff_scale: f64,
    pub building_scale: f64,
    pub village_density: f64,
    pub building_cluster_radius: f64,
    pub min_building_distance: f64,
    pub river_threshold: f64,
    pub ocean_height_threshold: f64,
    pub mountain_height_threshold: f64,
    pub cliff_height_threshold: f64,
    pub cliff_noise_threshold: f64,
    pub min_water_cluster_size: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            world_seed: 2137,
            chunk_size: 32,
            height_scale: 150.0,
            detail_scale: 50.0,
            biome_scale: 250.0,
            river_scale: 60.0,
            cliff_scale: 40.0,
            building_scale: 25.0,
            village_density: 0.03,
            building_cluster_radius: 10.0,
            min_building_distance: 5.0,
            river_threshold: 0.90,
            ocean_height_threshold: 0.30,
            mountain_height_threshold: 0.75,
            cliff_height_threshold: 0.80,
            cliff_noise_threshold: 0.55,
            min_water_cluster_size: 5,
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size < MIN_CHUNK_SIZE {
            return Err(ConfigError::ChunkSizeTooSmall(self.chunk_size));
        }
        for (name, value) in [
            ("height_scale", self.height_scale),
            ("detail_scale", self.detail_scale),
            ("biome_scale", self.biome_scale),
            ("river_scale", self.river_scale),
            ("cliff_scale", self.cliff_scale),
            ("building_scale", self.building_scale),
            ("building_cluster_radius", self.building_cluster_radius),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveScale { name, value });
            }
        }
        for (name, value) in [
            ("river_threshold", self.river_threshold),
            ("ocean_height_threshold", self.ocean_height_threshold),
            ("mountain_height_threshold", self.mountain_height_threshold),
            ("cliff_height_threshold", self.cliff_height_threshold),
            ("cliff_noise_threshold", self.cliff_noise_threshold),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if self.ocean_height_threshold >= self.mountain_height_threshold {
            return Err(ConfigError::BandOrdering {
                ocean: self.ocean_height_threshold,
                mountain: self.mountain_height_threshold,
            });
        }
        if !(0.0..=1.0).contains(&self.village_density) {
            return Err(ConfigError::DensityOutOfRange(self.village_density));
        }
        if !(self.min_building_distance >= 0.0) {
            return Err(ConfigError::NegativeDistance {
                name: "min_building_distance",
                value: self.min_building_distance,
            });
        }
        if self.min_water_cluster_size == 0 {
            return Err(ConfigError::ZeroWaterCluster);
        }
        Ok(())
    }
}

//! World generation: noise channels, elevation, climate, hydrology,
//! terrain synthesis, smoothing, settlements, and the chunk cache.

pub mod climate;
pub mod height;
pub mod hydrology;
pub mod loader;
pub mod map;
pub mod noise;
pub mod settlement;
pub mod smoothing;
pub mod synth;

pub use climate::{BiomeBlend, BiomeClassifier};
pub use height::{ElevationBand, HeightField};
pub use hydrology::{HydrologyGenerator, WaterClass};
pub use loader::{ChunkLoader, ChunkRequest, ReadyChunk};
pub use map::WorldMap;
pub use settlement::{BuildingRegistry, SettlementPlanner};
pub use synth::TerrainSynthesizer;

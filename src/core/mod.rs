//! Fundamental world types: terrain, biomes, chunks, settlement records.

pub mod biome;
pub mod chunk;
pub mod terrain;

pub use biome::{Biome, BuildingKind};
pub use chunk::{Building, Chunk, TileGrid, VillageRecord};
pub use terrain::{PassabilityTable, TerrainType};

//! Chunked procedural overworld generation for top-down tile games.
//!
//! A [`world::WorldMap`] owns the full pipeline: layered noise drives
//! elevation, climate, and hydrology; per-tile synthesis draws from
//! biome-weighted terrain tables; cellular smoothing cleans up stray
//! tiles; a deterministic settlement planner stamps villages under
//! world-wide spacing constraints. Everything is a pure function of the
//! world seed and coordinates, so any chunk can be regenerated bit-for-bit
//! in any order.

// Fundamental types: terrain, biomes, chunks
pub mod core;

// Generation pipeline and chunk cache
pub mod world;

pub mod config;
pub mod constants;

pub use crate::config::{ConfigError, GenerationConfig};
pub use crate::core::{Biome, Building, BuildingKind, Chunk, TerrainType, VillageRecord};
pub use crate::world::{ChunkLoader, WorldMap};

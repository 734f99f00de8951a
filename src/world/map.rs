//! The world facade: chunk cache, generation pipeline, and tile queries.
//!
//! Chunks are generated on demand, published exactly once as `Arc<Chunk>`,
//! and never mutated afterwards. Terrain synthesis is pure and runs
//! without any lock; settlement planning and chunk publication happen
//! together under the building-registry write lock so spacing decisions
//! and the tiles they stamped can never diverge.
//!
//! Lock order is registry before chunk cache, everywhere.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::{ConfigError, GenerationConfig};
use crate::constants::PATH_CONTINUITY_ITERATIONS;
use crate::constants::{
    LAVA_SMOOTH_MIN_NEIGHBORS, ROCK_SMOOTH_MIN_NEIGHBORS, SWAMP_SMOOTH_MIN_NEIGHBORS,
    WATER_SMOOTH_MIN_NEIGHBORS,
};
use crate::core::biome::Biome;
use crate::core::chunk::{Building, Chunk, TileGrid, VillageRecord};
use crate::core::terrain::{PassabilityTable, TerrainType};
use crate::world::climate::BiomeClassifier;
use crate::world::height::HeightField;
use crate::world::hydrology::HydrologyGenerator;
use crate::world::settlement::{BuildingRegistry, SettlementPlanner};
use crate::world::smoothing::{connect_paths, smooth, smooth_to_stable};
use crate::world::synth::TerrainSynthesizer;

pub struct WorldMap {
    config: GenerationConfig,
    height: HeightField,
    climate: BiomeClassifier,
    hydrology: HydrologyGenerator,
    synth: TerrainSynthesizer,
    settlements: SettlementPlanner,
    passability: PassabilityTable,
    registry: RwLock<BuildingRegistry>,
    chunks: RwLock<FxHashMap<(i32, i32), Arc<Chunk>>>,
}

impl WorldMap {
    /// Validates the configuration and builds all generation components.
    pub fn new(config: GenerationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(WorldMap {
            height: HeightField::new(&config),
            climate: BiomeClassifier::new(&config),
            hydrology: HydrologyGenerator::new(&config),
            synth: TerrainSynthesizer::new(&config),
            settlements: SettlementPlanner::new(&config),
            passability: PassabilityTable::new(),
            registry: RwLock::new(BuildingRegistry::new(config.chunk_size)),
            chunks: RwLock::new(FxHashMap::default()),
            config,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn chunk_size(&self) -> i32 {
        self.config.chunk_size
    }

    /// The chunk at chunk coordinates, generating and caching it on first
    /// access. Repeated calls return the same `Arc`.
    pub fn chunk(&self, cx: i32, cy: i32) -> Arc<Chunk> {
        if let Some(chunk) = self.chunks.read().get(&(cx, cy)) {
            return Arc::clone(chunk);
        }
        self.generate_chunk(cx, cy)
    }

    /// The chunk only if it is already cached; never generates.
    pub fn chunk_if_loaded(&self, cx: i32, cy: i32) -> Option<Arc<Chunk>> {
        self.chunks.read().get(&(cx, cy)).map(Arc::clone)
    }

    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.read().len()
    }

    /// Terrain at global tile coordinates, generating the owning chunk if
    /// needed.
    pub fn terrain_at(&self, x: i32, y: i32) -> TerrainType {
        let size = self.config.chunk_size;
        let chunk = self.chunk(x.div_euclid(size), y.div_euclid(size));
        chunk.get(x.rem_euclid(size), y.rem_euclid(size))
    }

    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        self.passability.is_passable(self.terrain_at(x, y))
    }

    /// Normalized elevation at global coordinates. Pure; touches no chunk.
    pub fn height_at(&self, x: i32, y: i32) -> f64 {
        self.height.height(x, y)
    }

    /// Dominant biome at global coordinates. Pure; touches no chunk.
    pub fn biome_at(&self, x: i32, y: i32) -> Biome {
        self.climate.determine(x, y, self.height.height(x, y))
    }

    pub fn village_at(&self, cx: i32, cy: i32) -> Option<VillageRecord> {
        self.registry.read().village((cx, cy)).copied()
    }

    pub fn buildings_in(&self, cx: i32, cy: i32) -> Vec<Building> {
        self.registry.read().buildings((cx, cy)).to_vec()
    }

    /// Drops cached chunks further than `radius` chunks (Chebyshev) from
    /// `center`. Settlement records are kept so spacing constraints keep
    /// holding when evicted chunks regenerate.
    pub fn retain_near(&self, center: (i32, i32), radius: i32) -> usize {
        let _registry = self.registry.write();
        let mut chunks = self.chunks.write();
        let before = chunks.len();
        chunks.retain(|&(cx, cy), _| {
            (cx - center.0).abs() <= radius && (cy - center.1).abs() <= radius
        });
        let dropped = before - chunks.len();
        if dropped > 0 {
            debug!(dropped, remaining = chunks.len(), "evicted distant chunks");
        }
        dropped
    }

    fn generate_chunk(&self, cx: i32, cy: i32) -> Arc<Chunk> {
        let size = self.config.chunk_size;
        let base_x = cx * size;
        let base_y = cy * size;

        // Pure terrain synthesis, no locks held
        let mut heights = vec![0.0; (size * size) as usize];
        for ly in 0..size {
            for lx in 0..size {
                heights[(ly * size + lx) as usize] =
                    self.height.height(base_x + lx, base_y + ly);
            }
        }
        let water = self.hydrology.classify_chunk(cx, cy, size, &heights);

        let mut grid = TileGrid::new(size);
        let mut biome_tally = [0usize; Biome::COUNT];
        for ly in 0..size {
            for lx in 0..size {
                let (x, y) = (base_x + lx, base_y + ly);
                let idx = (ly * size + lx) as usize;
                let blend = self.climate.blend(x, y, heights[idx]);
                biome_tally[blend.dominant().index()] += 1;
                grid.set(lx, ly, self.synth.tile(x, y, heights[idx], &blend, water[idx]));
            }
        }
        let dominant = dominant_biome(&biome_tally);

        self.smooth_grid(&mut grid, dominant);

        // Settlement planning and publication are atomic with respect to
        // other generators
        let mut registry = self.registry.write();
        if let Some(chunk) = self.chunks.read().get(&(cx, cy)) {
            // Another thread published while we were synthesizing
            return Arc::clone(chunk);
        }
        self.settlements.plan(&mut grid, cx, cy, dominant, &mut registry);
        connect_paths(&mut grid, PATH_CONTINUITY_ITERATIONS);

        let chunk = Arc::new(Chunk::from_grid(cx, cy, grid));
        self.chunks.write().insert((cx, cy), Arc::clone(&chunk));
        debug!(cx, cy, biome = ?dominant, "chunk generated");
        chunk
    }

    /// Four cleanup families, in fixed order: starved water, lava crusting,
    /// stray rock, stray swamp.
    fn smooth_grid(&self, grid: &mut TileGrid, dominant: Biome) {
        let filler = dominant.filler_terrain();
        smooth_to_stable(
            grid,
            &[TerrainType::Water, TerrainType::ShallowWater],
            TerrainType::Swamp,
            WATER_SMOOTH_MIN_NEIGHBORS,
        );
        smooth(
            grid,
            &[TerrainType::Lava],
            TerrainType::Basalt,
            LAVA_SMOOTH_MIN_NEIGHBORS,
            1,
        );
        smooth(
            grid,
            &[TerrainType::Rock],
            filler,
            ROCK_SMOOTH_MIN_NEIGHBORS,
            1,
        );
        smooth(
            grid,
            &[TerrainType::Swamp],
            filler,
            SWAMP_SMOOTH_MIN_NEIGHBORS,
            1,
        );
    }
}

fn dominant_biome(tally: &[usize; Biome::COUNT]) -> Biome {
    let mut best = Biome::Plains;
    let mut best_count = 0;
    for biome in Biome::ALL {
        let count = tally[biome.index()];
        if count > best_count {
            best = biome;
            best_count = count;
        }
    }
    best
}

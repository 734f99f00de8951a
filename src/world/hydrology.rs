//! River and lake classification with chunk-local connectivity cleanup.
//!
//! Water is recomputed per tile from coordinate + noise; there is no
//! world-spanning registry of water coordinates, so chunks stay independent
//! and memory stays bounded. The trade-off is that the flood-fill cluster
//! check is chunk-local: a large lake spanning a chunk border is validated
//! per chunk, not globally.

use crate::config::GenerationConfig;
use crate::constants::{
    LAKE_DEEP_MAX_HEIGHT, LAKE_SHORE_MAX_HEIGHT, RIVER_BANK_EPSILON,
};
use crate::world::noise::{Channel, NoiseField};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WaterClass {
    /// River core or deep lake.
    Deep,
    /// River bank halo or lake shore.
    Shallow,
    /// An isolated puddle reclassified to marsh by the cluster cleanup.
    Marsh,
}

pub struct HydrologyGenerator {
    river_noise: NoiseField,
    river_threshold: f64,
    min_cluster_size: usize,
}

impl HydrologyGenerator {
    pub fn new(cfg: &GenerationConfig) -> Self {
        HydrologyGenerator {
            river_noise: NoiseField::new(cfg.world_seed, Channel::River, cfg.river_scale),
            river_threshold: cfg.river_threshold,
            min_cluster_size: cfg.min_water_cluster_size,
        }
    }

    /// Raw per-tile water decision, no connectivity cleanup.
    pub fn classify_tile(&self, x: i32, y: i32, height: f64) -> Option<WaterClass> {
        let score = self.river_noise.sample(x, y).abs();
        classify_score(score, height, self.river_threshold)
    }

    /// Classify a whole chunk and cull clusters below the configured
    /// minimum size. `heights` is the chunk's row-major height map.
    pub fn classify_chunk(
        &self,
        cx: i32,
        cy: i32,
        size: i32,
        heights: &[f64],
    ) -> Vec<Option<WaterClass>> {
        let base_x = cx * size;
        let base_y = cy * size;
        let mut water = vec![None; (size * size) as usize];
        for ly in 0..size {
            for lx in 0..size {
                let idx = (ly * size + lx) as usize;
                water[idx] = self.classify_tile(base_x + lx, base_y + ly, heights[idx]);
            }
        }
        cull_small_clusters(&mut water, size, self.min_cluster_size);
        water
    }
}

/// Pure classification rule, separated from noise sampling so the band
/// boundaries are directly testable.
fn classify_score(score: f64, height: f64, river_threshold: f64) -> Option<WaterClass> {
    if score > river_threshold {
        return Some(WaterClass::Deep);
    }
    if score >= river_threshold - RIVER_BANK_EPSILON {
        return Some(WaterClass::Shallow);
    }
    if height < LAKE_DEEP_MAX_HEIGHT {
        return Some(WaterClass::Deep);
    }
    if height < LAKE_SHORE_MAX_HEIGHT {
        return Some(WaterClass::Shallow);
    }
    None
}

/// 4-connected flood fill over water tiles; clusters smaller than
/// `min_size` become marsh.
fn cull_small_clusters(water: &mut [Option<WaterClass>], size: i32, min_size: usize) {
    let idx = |x: i32, y: i32| (y * size + x) as usize;
    let is_wet = |water: &[Option<WaterClass>], x: i32, y: i32| {
        matches!(
            water[idx(x, y)],
            Some(WaterClass::Deep) | Some(WaterClass::Shallow)
        )
    };

    let mut visited = vec![false; water.len()];
    for start_y in 0..size {
        for start_x in 0..size {
            if visited[idx(start_x, start_y)] || !is_wet(water, start_x, start_y) {
                continue;
            }

            let mut cluster = Vec::new();
            let mut queue = vec![(start_x, start_y)];
            visited[idx(start_x, start_y)] = true;
            while let Some((x, y)) = queue.pop() {
                cluster.push((x, y));
                for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx >= 0
                        && nx < size
                        && ny >= 0
                        && ny < size
                        && !visited[idx(nx, ny)]
                        && is_wet(water, nx, ny)
                    {
                        visited[idx(nx, ny)] = true;
                        queue.push((nx, ny));
                    }
                }
            }

            if cluster.len() < min_size {
                for (x, y) in cluster {
                    water[idx(x, y)] = Some(WaterClass::Marsh);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn river_bands_around_threshold() {
        // riverThreshold = 0.92: 0.95 is core water, 0.90 is bank halo,
        // 0.10 is left to the biome table
        assert_eq!(classify_score(0.95, 0.5, 0.92), Some(WaterClass::Deep));
        assert_eq!(classify_score(0.90, 0.5, 0.92), Some(WaterClass::Shallow));
        assert_eq!(classify_score(0.10, 0.5, 0.92), None);
    }

    #[test]
    fn lake_bands_by_height() {
        assert_eq!(classify_score(0.0, 0.27, 0.9), Some(WaterClass::Deep));
        assert_eq!(classify_score(0.0, 0.28, 0.9), Some(WaterClass::Shallow));
        assert_eq!(classify_score(0.0, 0.30, 0.9), Some(WaterClass::Shallow));
        assert_eq!(classify_score(0.0, 0.31, 0.9), None);
        assert_eq!(classify_score(0.0, 0.50, 0.9), None);
    }

    #[test]
    fn small_clusters_become_marsh() {
        let size = 8;
        let mut water = vec![None; 64];
        // 3-tile strip: below the default minimum of 5
        for x in 0..3 {
            water[x] = Some(WaterClass::Deep);
        }
        // 2x3 block elsewhere: exactly 6, survives
        for y in 4..6 {
            for x in 4..7 {
                water[(y * size + x) as usize] = Some(WaterClass::Shallow);
            }
        }
        cull_small_clusters(&mut water, size as i32, 5);
        for x in 0..3 {
            assert_eq!(water[x], Some(WaterClass::Marsh));
        }
        for y in 4..6 {
            for x in 4..7 {
                assert_eq!(water[(y * size + x) as usize], Some(WaterClass::Shallow));
            }
        }
    }

    #[test]
    fn diagonal_tiles_are_separate_clusters() {
        let size = 4;
        let mut water = vec![None; 16];
        water[0] = Some(WaterClass::Deep); // (0,0)
        water[5] = Some(WaterClass::Deep); // (1,1) only diagonally adjacent
        cull_small_clusters(&mut water, size, 2);
        assert_eq!(water[0], Some(WaterClass::Marsh));
        assert_eq!(water[5], Some(WaterClass::Marsh));
    }

    #[test]
    fn chunk_classification_is_deterministic() {
        let cfg = GenerationConfig {
            world_seed: 42,
            ..Default::default()
        };
        let h = HydrologyGenerator::new(&cfg);
        let heights = vec![0.5; (cfg.chunk_size * cfg.chunk_size) as usize];
        let a = h.classify_chunk(0, 0, cfg.chunk_size, &heights);
        let b = h.classify_chunk(0, 0, cfg.chunk_size, &heights);
        assert_eq!(a, b);
    }
}

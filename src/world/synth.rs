//! Per-tile terrain decision.
//!
//! Priority: settlement reservations are stamped after this stage and are
//! never overwritten, water overrides the biome tables, cliffs override
//! open terrain, then a blend-weighted draw from the biome tables decides,
//! with highland substitution above the highland band. The draw is keyed
//! by a coordinate hash so results are independent of call order.

use crate::config::GenerationConfig;
use crate::constants::LOWLAND_BAND_MAX;
use crate::core::terrain::TerrainType;
use crate::world::climate::BiomeBlend;
use crate::world::hydrology::WaterClass;
use crate::world::noise::{Channel, NoiseField, coord_hash_unit};

// Keeps the terrain draw decorrelated from the raw coordinate hash users
const TERRAIN_DRAW_SALT: u64 = 0x7E22_41D5;

pub struct TerrainSynthesizer {
    cliff_noise: NoiseField,
    cliff_height_threshold: f64,
    cliff_noise_threshold: f64,
    seed: u64,
}

impl TerrainSynthesizer {
    pub fn new(cfg: &GenerationConfig) -> Self {
        TerrainSynthesizer {
            cliff_noise: NoiseField::new(cfg.world_seed, Channel::Cliff, cfg.cliff_scale),
            cliff_height_threshold: cfg.cliff_height_threshold,
            cliff_noise_threshold: cfg.cliff_noise_threshold,
            seed: cfg.world_seed,
        }
    }

    pub fn tile(
        &self,
        x: i32,
        y: i32,
        height: f64,
        blend: &BiomeBlend,
        water: Option<WaterClass>,
    ) -> TerrainType {
        match water {
            Some(WaterClass::Deep) => return TerrainType::Water,
            Some(WaterClass::Shallow) => return TerrainType::ShallowWater,
            Some(WaterClass::Marsh) => return TerrainType::Swamp,
            None => {}
        }

        if height > self.cliff_height_threshold
            && self.cliff_noise.sample(x, y) > self.cliff_noise_threshold
        {
            return TerrainType::Cliff;
        }

        let terrain = self.weighted_choice(x, y, blend);

        // High elevation hardens soft cover into the biome's rock variant
        if height >= LOWLAND_BAND_MAX && terrain.is_vegetation() {
            return blend.dominant().highland_terrain();
        }
        terrain
    }

    /// Discrete draw over the blend-combined biome tables, seeded purely
    /// from the coordinate.
    fn weighted_choice(&self, x: i32, y: i32, blend: &BiomeBlend) -> TerrainType {
        let mut total = 0.0;
        for (biome, weight) in blend_entries(blend) {
            for (_, w) in biome.terrain_table() {
                total += f64::from(*w) * weight;
            }
        }

        let mut roll = coord_hash_unit(self.seed ^ TERRAIN_DRAW_SALT, x, y) * total;
        let mut fallback = TerrainType::Grass;
        for (biome, weight) in blend_entries(blend) {
            for (terrain, w) in biome.terrain_table() {
                let slot = f64::from(*w) * weight;
                if roll < slot {
                    return *terrain;
                }
                roll -= slot;
                fallback = *terrain;
            }
        }
        // Floating-point remainder lands on the last slot
        fallback
    }
}

fn blend_entries(blend: &BiomeBlend) -> impl Iterator<Item = (crate::core::biome::Biome, f64)> {
    std::iter::once(blend.primary).chain(blend.secondary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::biome::Biome;

    fn synth(seed: u64) -> TerrainSynthesizer {
        TerrainSynthesizer::new(&GenerationConfig {
            world_seed: seed,
            ..Default::default()
        })
    }

    fn single(biome: Biome) -> BiomeBlend {
        BiomeBlend {
            primary: (biome, 1.0),
            secondary: None,
        }
    }

    #[test]
    fn water_classes_override_everything() {
        let s = synth(42);
        let blend = single(Biome::Plains);
        assert_eq!(
            s.tile(0, 0, 0.5, &blend, Some(WaterClass::Deep)),
            TerrainType::Water
        );
        assert_eq!(
            s.tile(0, 0, 0.5, &blend, Some(WaterClass::Shallow)),
            TerrainType::ShallowWater
        );
        assert_eq!(
            s.tile(0, 0, 0.5, &blend, Some(WaterClass::Marsh)),
            TerrainType::Swamp
        );
    }

    #[test]
    fn draws_come_from_the_biome_table() {
        let s = synth(42);
        let blend = single(Biome::Desert);
        let allowed: Vec<TerrainType> = Biome::Desert
            .terrain_table()
            .iter()
            .map(|(t, _)| *t)
            .collect();
        for x in (-200..200).step_by(7) {
            let t = s.tile(x, x * 3, 0.5, &blend, None);
            assert!(allowed.contains(&t), "{t:?} is not desert terrain");
        }
    }

    #[test]
    fn highland_substitutes_vegetation() {
        let s = synth(42);
        // Plains tables are all vegetation, so every highland draw hardens
        let blend = single(Biome::Plains);
        for x in (-100..100).step_by(11) {
            assert_eq!(s.tile(x, -x, 0.70, &blend, None), TerrainType::Rock);
        }
    }

    #[test]
    fn choice_is_deterministic_and_order_free() {
        let s = synth(99);
        let blend = single(Biome::Forest);
        let forward: Vec<_> = (0..50).map(|x| s.tile(x, 0, 0.5, &blend, None)).collect();
        let backward: Vec<_> = (0..50)
            .rev()
            .map(|x| s.tile(x, 0, 0.5, &blend, None))
            .collect();
        let backward: Vec<_> = backward.into_iter().rev().collect();
        assert_eq!(forward, backward);
    }

    #[test]
    fn blended_choice_uses_both_tables() {
        let s = synth(7);
        let blend = BiomeBlend {
            primary: (Biome::Desert, 0.5),
            secondary: Some((Biome::Tundra, 0.5)),
        };
        let mut allowed: Vec<TerrainType> = Vec::new();
        for biome in [Biome::Desert, Biome::Tundra] {
            allowed.extend(biome.terrain_table().iter().map(|(t, _)| *t));
        }
        for x in (-300..300).step_by(5) {
            let t = s.tile(x, 13 * x, 0.5, &blend, None);
            assert!(allowed.contains(&t));
        }
    }
}

//! Biome classification from coordinate, elevation, and biome noise.
//!
//! Lowland biomes map fixed sub-ranges of the normalized biome value in
//! the order Tundra, Forest, Plains, Desert. Mountain-band tiles override
//! with Mountains or Volcanic chosen by the *same* biome value, which keeps
//! mountain belts spatially coherent with the lowland biome around them.

use crate::config::GenerationConfig;
use crate::constants::{
    BLEND_MARGIN, FOREST_BAND_MAX, MOUNTAIN_VOLCANIC_SPLIT, PLAINS_BAND_MAX, SWAMP_BAND_MAX,
    TUNDRA_BAND_MAX,
};
use crate::core::biome::Biome;
use crate::world::noise::{Channel, NoiseField};

/// One or two weighted biomes; weights always sum to 1.
#[derive(Clone, Copy, Debug)]
pub struct BiomeBlend {
    pub primary: (Biome, f64),
    pub secondary: Option<(Biome, f64)>,
}

impl BiomeBlend {
    fn single(biome: Biome) -> Self {
        BiomeBlend {
            primary: (biome, 1.0),
            secondary: None,
        }
    }

    fn pair(a: (Biome, f64), b: (Biome, f64)) -> Self {
        if a.1 >= b.1 {
            BiomeBlend {
                primary: a,
                secondary: Some(b),
            }
        } else {
            BiomeBlend {
                primary: b,
                secondary: Some(a),
            }
        }
    }

    /// Biome with the larger weight.
    #[inline]
    pub fn dominant(&self) -> Biome {
        self.primary.0
    }

    pub fn total_weight(&self) -> f64 {
        self.primary.1 + self.secondary.map_or(0.0, |(_, w)| w)
    }
}

pub struct BiomeClassifier {
    biome_noise: NoiseField,
    ocean_threshold: f64,
    mountain_threshold: f64,
}

impl BiomeClassifier {
    pub fn new(cfg: &GenerationConfig) -> Self {
        BiomeClassifier {
            biome_noise: NoiseField::fbm(cfg.world_seed, Channel::Biome, cfg.biome_scale, 4),
            ocean_threshold: cfg.ocean_height_threshold,
            mountain_threshold: cfg.mountain_height_threshold,
        }
    }

    /// Single classification; the dominant biome of [`Self::blend`].
    pub fn determine(&self, x: i32, y: i32, height: f64) -> Biome {
        self.blend(x, y, height).dominant()
    }

    /// Blend weights for border softening. Away from every band boundary
    /// this is a single full-weight biome.
    pub fn blend(&self, x: i32, y: i32, height: f64) -> BiomeBlend {
        if height < self.ocean_threshold {
            return BiomeBlend::single(Biome::Ocean);
        }

        let value = self.biome_noise.sample_unit(x, y);

        if height >= self.mountain_threshold {
            return banded_blend(
                value,
                &[MOUNTAIN_VOLCANIC_SPLIT],
                &[Biome::Mountains, Biome::Volcanic],
            );
        }

        // Lowland wet belt just above the ocean band
        if height < SWAMP_BAND_MAX {
            return BiomeBlend::single(Biome::Swamp);
        }

        banded_blend(
            value,
            &[TUNDRA_BAND_MAX, FOREST_BAND_MAX, PLAINS_BAND_MAX],
            &[Biome::Tundra, Biome::Forest, Biome::Plains, Biome::Desert],
        )
    }
}

/// Maps `value` into `biomes` split at `bounds`; within `BLEND_MARGIN` of a
/// boundary the two neighbors share weight linearly.
fn banded_blend(value: f64, bounds: &[f64], biomes: &[Biome]) -> BiomeBlend {
    debug_assert_eq!(bounds.len() + 1, biomes.len());

    let band = bounds.iter().position(|b| value < *b).unwrap_or(bounds.len());

    // Nearest boundary decides whether we are inside a soft border
    let mut nearest: Option<(usize, f64)> = None;
    for (i, bound) in bounds.iter().enumerate() {
        let dist = (value - bound).abs();
        if nearest.is_none_or(|(_, d)| dist < d) {
            nearest = Some((i, dist));
        }
    }

    if let Some((i, dist)) = nearest {
        if dist < BLEND_MARGIN {
            let upper_weight = 0.5 + (value - bounds[i]) / (2.0 * BLEND_MARGIN);
            let upper_weight = upper_weight.clamp(0.0, 1.0);
            if upper_weight > 0.0 && upper_weight < 1.0 {
                return BiomeBlend::pair(
                    (biomes[i], 1.0 - upper_weight),
                    (biomes[i + 1], upper_weight),
                );
            }
        }
    }

    BiomeBlend::single(biomes[band])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(seed: u64) -> BiomeClassifier {
        BiomeClassifier::new(&GenerationConfig {
            world_seed: seed,
            ..Default::default()
        })
    }

    #[test]
    fn low_elevation_is_ocean() {
        let c = classifier(42);
        for x in (-300..300).step_by(71) {
            assert_eq!(c.determine(x, x / 2, 0.1), Biome::Ocean);
            assert_eq!(c.determine(x, x / 2, 0.29), Biome::Ocean);
        }
    }

    #[test]
    fn mountain_band_overrides_lowland_biomes() {
        let c = classifier(42);
        for x in (-300..300).step_by(53) {
            let biome = c.determine(x, -x, 0.9);
            assert!(
                matches!(biome, Biome::Mountains | Biome::Volcanic),
                "got {biome:?}"
            );
        }
    }

    #[test]
    fn wet_belt_is_swamp() {
        let c = classifier(7);
        assert_eq!(c.determine(10, 10, 0.32), Biome::Swamp);
    }

    #[test]
    fn blend_weights_sum_to_one() {
        let c = classifier(1234);
        for x in (-500..500).step_by(17) {
            for (y, h) in [(0, 0.45), (100, 0.62), (-50, 0.8), (3, 0.2)] {
                let blend = c.blend(x, y, h);
                assert!(
                    (blend.total_weight() - 1.0).abs() < 1e-6,
                    "weights sum to {}",
                    blend.total_weight()
                );
                assert!(blend.primary.1 > 0.0);
                if let Some((biome, w)) = blend.secondary {
                    assert!(w > 0.0);
                    assert_ne!(biome, blend.primary.0);
                    assert!(blend.primary.1 >= w);
                }
            }
        }
    }

    #[test]
    fn banded_blend_splits_at_boundaries() {
        let biomes = [Biome::Tundra, Biome::Forest];
        let exact = banded_blend(0.25, &[0.25], &biomes);
        assert!(exact.secondary.is_some());
        assert!((exact.total_weight() - 1.0).abs() < 1e-9);

        let deep = banded_blend(0.10, &[0.25], &biomes);
        assert!(deep.secondary.is_none());
        assert_eq!(deep.dominant(), Biome::Tundra);

        let above = banded_blend(0.40, &[0.25], &biomes);
        assert_eq!(above.dominant(), Biome::Forest);
    }
}

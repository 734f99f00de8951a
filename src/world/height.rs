//! Elevation sampling: low-frequency base shape plus high-frequency detail.

use crate::config::GenerationConfig;
use crate::constants::{HIGHLAND_BAND_MAX, LOWLAND_BAND_MAX, OCEAN_BAND_MAX};
use crate::world::noise::{Channel, NoiseField};

/// Named elevation bands; thresholds live in `constants`, never at call
/// sites.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ElevationBand {
    Ocean,
    Lowland,
    Highland,
    Mountain,
}

impl ElevationBand {
    pub fn of(height: f64) -> ElevationBand {
        if height < OCEAN_BAND_MAX {
            ElevationBand::Ocean
        } else if height < LOWLAND_BAND_MAX {
            ElevationBand::Lowland
        } else if height < HIGHLAND_BAND_MAX {
            ElevationBand::Highland
        } else {
            ElevationBand::Mountain
        }
    }
}

/// Normalized elevation in `[0, 1]` per coordinate.
pub struct HeightField {
    base: NoiseField,
    detail: NoiseField,
}

impl HeightField {
    pub fn new(cfg: &GenerationConfig) -> Self {
        HeightField {
            base: NoiseField::fbm(cfg.world_seed, Channel::Height, cfg.height_scale, 3),
            detail: NoiseField::fbm(cfg.world_seed, Channel::Detail, cfg.detail_scale, 5),
        }
    }

    /// 70% base shape, 30% detail, normalized to `[0, 1]`.
    pub fn height(&self, x: i32, y: i32) -> f64 {
        let blended = self.base.sample(x, y) * 0.7 + self.detail.sample(x, y) * 0.3;
        ((blended + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

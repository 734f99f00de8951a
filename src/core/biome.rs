//! Biome classification and the weighted terrain tables each biome owns.

use crate::core::terrain::TerrainType;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Biome {
    #[default]
    Plains,
    Forest,
    Mountains,
    Desert,
    Swamp,
    Tundra,
    Volcanic,
    Ocean,
}

/// Visual/type tag a building takes from the chunk's dominant biome.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BuildingKind {
    Cottage,
    LogCabin,
    StoneHouse,
    AdobeHut,
    StiltHut,
    IceLodge,
    ObsidianShelter,
    FishingHut,
}

const PLAINS_TABLE: &[(TerrainType, u32)] = &[
    (TerrainType::Grass, 70),
    (TerrainType::TallGrass, 20),
    (TerrainType::Forest, 10),
];

const FOREST_TABLE: &[(TerrainType, u32)] = &[
    (TerrainType::Forest, 60),
    (TerrainType::DeepForest, 20),
    (TerrainType::Grass, 15),
    (TerrainType::TallGrass, 5),
];

const MOUNTAINS_TABLE: &[(TerrainType, u32)] = &[
    (TerrainType::Rock, 40),
    (TerrainType::Mountain, 35),
    (TerrainType::Snow, 15),
    (TerrainType::Grass, 10),
];

const DESERT_TABLE: &[(TerrainType, u32)] = &[
    (TerrainType::Sand, 70),
    (TerrainType::Rock, 20),
    (TerrainType::TallGrass, 10),
];

const SWAMP_TABLE: &[(TerrainType, u32)] = &[
    (TerrainType::Swamp, 40),
    (TerrainType::Grass, 35),
    (TerrainType::TallGrass, 25),
];

const TUNDRA_TABLE: &[(TerrainType, u32)] = &[
    (TerrainType::Snow, 70),
    (TerrainType::Rock, 15),
    (TerrainType::Grass, 15),
];

const VOLCANIC_TABLE: &[(TerrainType, u32)] = &[
    (TerrainType::Basalt, 40),
    (TerrainType::Lava, 30),
    (TerrainType::Rock, 30),
];

const OCEAN_TABLE: &[(TerrainType, u32)] = &[
    (TerrainType::Water, 70),
    (TerrainType::ShallowWater, 25),
    (TerrainType::Sand, 5),
];

impl Biome {
    pub const ALL: [Biome; 8] = [
        Biome::Plains,
        Biome::Forest,
        Biome::Mountains,
        Biome::Desert,
        Biome::Swamp,
        Biome::Tundra,
        Biome::Volcanic,
        Biome::Ocean,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Weighted terrain table the synthesizer draws from.
    pub const fn terrain_table(self) -> &'static [(TerrainType, u32)] {
        match self {
            Biome::Plains => PLAINS_TABLE,
            Biome::Forest => FOREST_TABLE,
            Biome::Mountains => MOUNTAINS_TABLE,
            Biome::Desert => DESERT_TABLE,
            Biome::Swamp => SWAMP_TABLE,
            Biome::Tundra => TUNDRA_TABLE,
            Biome::Volcanic => VOLCANIC_TABLE,
            Biome::Ocean => OCEAN_TABLE,
        }
    }

    /// Substitute for vegetation above the highland elevation band.
    pub const fn highland_terrain(self) -> TerrainType {
        match self {
            Biome::Desert => TerrainType::Sand,
            Biome::Tundra => TerrainType::Snow,
            Biome::Volcanic => TerrainType::Basalt,
            Biome::Ocean => TerrainType::Sand,
            Biome::Plains | Biome::Forest | Biome::Mountains | Biome::Swamp => TerrainType::Rock,
        }
    }

    /// Replacement terrain when smoothing dissolves an artifact.
    pub const fn filler_terrain(self) -> TerrainType {
        match self {
            Biome::Desert => TerrainType::Sand,
            Biome::Tundra => TerrainType::Snow,
            Biome::Volcanic => TerrainType::Basalt,
            Biome::Ocean => TerrainType::Sand,
            Biome::Plains | Biome::Forest | Biome::Mountains | Biome::Swamp => TerrainType::Grass,
        }
    }

    pub const fn building_kind(self) -> BuildingKind {
        match self {
            Biome::Plains => BuildingKind::Cottage,
            Biome::Forest => BuildingKind::LogCabin,
            Biome::Mountains => BuildingKind::StoneHouse,
            Biome::Desert => BuildingKind::AdobeHut,
            Biome::Swamp => BuildingKind::StiltHut,
            Biome::Tundra => BuildingKind::IceLodge,
            Biome::Volcanic => BuildingKind::ObsidianShelter,
            Biome::Ocean => BuildingKind::FishingHut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_biome_owns_a_weighted_table() {
        for biome in Biome::ALL {
            let table = biome.terrain_table();
            assert!(!table.is_empty());
            for (_, weight) in table {
                assert!(*weight > 0, "{biome:?} carries a zero weight");
            }
        }
    }

    #[test]
    fn biome_indices_are_unique() {
        let mut seen = [false; Biome::COUNT];
        for biome in Biome::ALL {
            assert!(!seen[biome.index()]);
            seen[biome.index()] = true;
        }
    }

    #[test]
    fn highland_variants_are_never_vegetation() {
        for biome in Biome::ALL {
            assert!(!biome.highland_terrain().is_vegetation());
        }
    }
}

//! Tile terrain types and the passability lookup table.

/// Every tile in the world resolves to exactly one of these.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum TerrainType {
    #[default]
    Grass,
    TallGrass,
    Forest,
    DeepForest,
    Water,
    ShallowWater,
    Sand,
    Rock,
    Mountain,
    Snow,
    Lava,
    Basalt,
    Cliff,
    Swamp,
    Path,
    House,
    VillageCenter,
}

impl TerrainType {
    pub const ALL: [TerrainType; 17] = [
        TerrainType::Grass,
        TerrainType::TallGrass,
        TerrainType::Forest,
        TerrainType::DeepForest,
        TerrainType::Water,
        TerrainType::ShallowWater,
        TerrainType::Sand,
        TerrainType::Rock,
        TerrainType::Mountain,
        TerrainType::Snow,
        TerrainType::Lava,
        TerrainType::Basalt,
        TerrainType::Cliff,
        TerrainType::Swamp,
        TerrainType::Path,
        TerrainType::House,
        TerrainType::VillageCenter,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Exhaustive passability rule. The match is the completeness check:
    /// adding a variant without an entry is a compile error, never a
    /// runtime default.
    const fn walkable(self) -> bool {
        match self {
            TerrainType::Grass
            | TerrainType::TallGrass
            | TerrainType::Forest
            | TerrainType::ShallowWater
            | TerrainType::Sand
            | TerrainType::Rock
            | TerrainType::Snow
            | TerrainType::Basalt
            | TerrainType::Swamp
            | TerrainType::Path
            | TerrainType::VillageCenter => true,
            TerrainType::DeepForest
            | TerrainType::Water
            | TerrainType::Mountain
            | TerrainType::Lava
            | TerrainType::Cliff
            | TerrainType::House => false,
        }
    }

    #[inline]
    pub fn is_water(self) -> bool {
        matches!(self, TerrainType::Water | TerrainType::ShallowWater)
    }

    #[inline]
    pub fn is_rocklike(self) -> bool {
        matches!(
            self,
            TerrainType::Rock | TerrainType::Mountain | TerrainType::Basalt
        )
    }

    /// Soft ground cover that gets substituted by the biome's highland
    /// variant above the highland elevation band.
    #[inline]
    pub fn is_vegetation(self) -> bool {
        matches!(
            self,
            TerrainType::Grass
                | TerrainType::TallGrass
                | TerrainType::Forest
                | TerrainType::DeepForest
                | TerrainType::Swamp
        )
    }

    /// Terrain a settlement footprint must never intersect.
    #[inline]
    pub fn blocks_settlement(self) -> bool {
        matches!(
            self,
            TerrainType::Water
                | TerrainType::ShallowWater
                | TerrainType::Lava
                | TerrainType::Cliff
        )
    }

    /// Tiles the settlement planner has claimed; smoothing and path
    /// carving never touch these.
    #[inline]
    pub fn is_reserved(self) -> bool {
        matches!(self, TerrainType::House | TerrainType::VillageCenter)
    }
}

/// Terrain -> walkable lookup, built once at startup from the exhaustive
/// per-variant rule.
#[derive(Debug, Clone)]
pub struct PassabilityTable {
    entries: [bool; TerrainType::COUNT],
}

impl PassabilityTable {
    pub fn new() -> Self {
        let mut entries = [false; TerrainType::COUNT];
        for terrain in TerrainType::ALL {
            entries[terrain.index()] = terrain.walkable();
        }
        PassabilityTable { entries }
    }

    #[inline]
    pub fn is_passable(&self, terrain: TerrainType) -> bool {
        self.entries[terrain.index()]
    }
}

impl Default for PassabilityTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_a_table_entry() {
        let table = PassabilityTable::new();
        for (i, terrain) in TerrainType::ALL.iter().enumerate() {
            assert_eq!(terrain.index(), i, "ALL must list variants in order");
            // Querying must never panic and must agree with the rule
            assert_eq!(table.is_passable(*terrain), terrain.walkable());
        }
    }

    #[test]
    fn water_and_structures_block_movement() {
        let table = PassabilityTable::new();
        assert!(!table.is_passable(TerrainType::Water));
        assert!(!table.is_passable(TerrainType::Lava));
        assert!(!table.is_passable(TerrainType::House));
        assert!(table.is_passable(TerrainType::ShallowWater));
        assert!(table.is_passable(TerrainType::Path));
        assert!(table.is_passable(TerrainType::VillageCenter));
    }

    #[test]
    fn variant_indices_are_unique() {
        let mut seen = [false; TerrainType::COUNT];
        for terrain in TerrainType::ALL {
            assert!(!seen[terrain.index()]);
            seen[terrain.index()] = true;
        }
    }
}

//! Chunk storage and the settlement records attached to chunks.

use crate::core::biome::BuildingKind;
use crate::core::terrain::TerrainType;

/// Mutable tile grid used while a chunk is being built. Never leaves the
/// generation pipeline; once published the tiles live in an immutable
/// [`Chunk`].
#[derive(Clone, Debug)]
pub struct TileGrid {
    size: i32,
    tiles: Vec<TerrainType>,
}

impl TileGrid {
    pub fn new(size: i32) -> Self {
        assert!(size > 0);
        TileGrid {
            size,
            tiles: vec![TerrainType::Grass; (size * size) as usize],
        }
    }

    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.size && y >= 0 && y < self.size
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> TerrainType {
        debug_assert!(self.in_bounds(x, y));
        self.tiles[(y * self.size + x) as usize]
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, terrain: TerrainType) {
        debug_assert!(self.in_bounds(x, y));
        self.tiles[(y * self.size + x) as usize] = terrain;
    }

    pub fn tiles(&self) -> &[TerrainType] {
        &self.tiles
    }
}

/// An immutable `size`x`size` block of tiles. Published exactly once by the
/// chunk cache and never mutated afterwards.
#[derive(Debug, PartialEq, Eq)]
pub struct Chunk {
    cx: i32,
    cy: i32,
    size: i32,
    tiles: Box<[TerrainType]>,
}

impl Chunk {
    pub(crate) fn from_grid(cx: i32, cy: i32, grid: TileGrid) -> Self {
        Chunk {
            cx,
            cy,
            size: grid.size,
            tiles: grid.tiles.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn coords(&self) -> (i32, i32) {
        (self.cx, self.cy)
    }

    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Terrain at local coordinates. Callers resolve global -> local via
    /// floor division in the world map.
    #[inline]
    pub fn get(&self, lx: i32, ly: i32) -> TerrainType {
        debug_assert!(lx >= 0 && lx < self.size && ly >= 0 && ly < self.size);
        self.tiles[(ly * self.size + lx) as usize]
    }

    pub fn tiles(&self) -> &[TerrainType] {
        &self.tiles
    }
}

/// A stamped building. `x`/`y` are the global coordinates of the top-left
/// footprint tile; `size` is 3 or 4.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Building {
    pub x: i32,
    pub y: i32,
    pub size: i32,
    pub kind: BuildingKind,
    /// Village center this building clusters around, if any.
    pub village: Option<(i32, i32)>,
}

impl Building {
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        let half = (self.size - 1) as f64 / 2.0;
        (self.x as f64 + half, self.y as f64 + half)
    }

    pub fn center_distance(&self, other: &Building) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }
}

/// At most one per chunk coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct VillageRecord {
    pub chunk: (i32, i32),
    pub center: (i32, i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_set_then_get() {
        let mut grid = TileGrid::new(8);
        grid.set(3, 5, TerrainType::Lava);
        assert_eq!(grid.get(3, 5), TerrainType::Lava);
        assert_eq!(grid.get(5, 3), TerrainType::Grass);
    }

    #[test]
    fn chunk_preserves_grid_contents() {
        let mut grid = TileGrid::new(4);
        grid.set(0, 0, TerrainType::Water);
        grid.set(3, 3, TerrainType::Path);
        let chunk = Chunk::from_grid(-2, 7, grid);
        assert_eq!(chunk.coords(), (-2, 7));
        assert_eq!(chunk.get(0, 0), TerrainType::Water);
        assert_eq!(chunk.get(3, 3), TerrainType::Path);
    }

    #[test]
    fn building_center_distance() {
        let a = Building {
            x: 0,
            y: 0,
            size: 3,
            kind: BuildingKind::Cottage,
            village: None,
        };
        let b = Building {
            x: 6,
            y: 0,
            size: 3,
            kind: BuildingKind::Cottage,
            village: None,
        };
        assert!((a.center_distance(&b) - 6.0).abs() < 1e-9);
    }
}

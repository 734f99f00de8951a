//! Cellular-automaton smoothing passes over a chunk grid.
//!
//! Operates on interior tiles only (the 1-tile border is left alone, as
//! border tiles cannot see their full 8-neighborhood inside one chunk).

use crate::core::chunk::TileGrid;
use crate::core::terrain::TerrainType;

/// One smoothing family: tiles in `target` with fewer than `min_neighbors`
/// 8-neighbors also in `target` become `replacement`. Returns the number
/// of replaced tiles across all iterations.
pub fn smooth(
    grid: &mut TileGrid,
    target: &[TerrainType],
    replacement: TerrainType,
    min_neighbors: usize,
    iterations: usize,
) -> usize {
    let size = grid.size();
    let in_target = |t: TerrainType| target.contains(&t);
    let mut replaced = 0;

    for _ in 0..iterations {
        let snapshot = grid.clone();
        let mut changed = 0;
        for y in 1..size - 1 {
            for x in 1..size - 1 {
                if !in_target(snapshot.get(x, y)) {
                    continue;
                }
                let mut neighbors = 0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if (dx, dy) != (0, 0) && in_target(snapshot.get(x + dx, y + dy)) {
                            neighbors += 1;
                        }
                    }
                }
                if neighbors < min_neighbors {
                    grid.set(x, y, replacement);
                    changed += 1;
                }
            }
        }
        replaced += changed;
        if changed == 0 {
            break;
        }
    }
    replaced
}

/// Runs `smooth` until no tile changes, so no member of `target` survives
/// with a sub-threshold neighborhood. Bounded by the grid area.
pub fn smooth_to_stable(
    grid: &mut TileGrid,
    target: &[TerrainType],
    replacement: TerrainType,
    min_neighbors: usize,
) -> usize {
    let cap = (grid.size() * grid.size()) as usize;
    smooth(grid, target, replacement, min_neighbors, cap)
}

/// Path-continuity pass: an unreserved, open tile with at least two
/// orthogonal Path neighbors becomes Path, turning noisy path samples
/// into continuous roads.
pub fn connect_paths(grid: &mut TileGrid, iterations: usize) -> usize {
    let size = grid.size();
    let mut promoted = 0;

    for _ in 0..iterations {
        let snapshot = grid.clone();
        let mut changed = 0;
        for y in 1..size - 1 {
            for x in 1..size - 1 {
                let tile = snapshot.get(x, y);
                if tile == TerrainType::Path
                    || tile.is_reserved()
                    || tile.blocks_settlement()
                {
                    continue;
                }
                let orthogonal = [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
                    .iter()
                    .filter(|(nx, ny)| snapshot.get(*nx, *ny) == TerrainType::Path)
                    .count();
                if orthogonal >= 2 {
                    grid.set(x, y, TerrainType::Path);
                    changed += 1;
                }
            }
        }
        promoted += changed;
        if changed == 0 {
            break;
        }
    }
    promoted
}

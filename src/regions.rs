//! Connected-region extraction
//!
//! Partitions the grid into maximal 18-connected components of equal value
//! using breadth-first flood fill.

use std::collections::VecDeque;

use crate::grid::{Coord, VoxelGrid};

/// One connected component, tiles in flood-fill discovery order
pub type Region = Vec<Coord>;

/// Extract every region of cells equal to `value`
///
/// Seeds are scanned x outer, y middle, z inner, so region order and tile
/// order are deterministic. Every cell equal to `value` appears in exactly
/// one region.
///
/// # Example
///
/// ```
/// use rust_voxel_caves::{extract_regions, Coord, VoxelGrid};
///
/// let mut grid = VoxelGrid::new(5, 5, 5, true);
/// grid.set(Coord::new(1, 1, 1), false);
/// grid.set(Coord::new(3, 3, 3), false);
///
/// let open = extract_regions(&grid, false);
/// assert_eq!(open.len(), 2);
/// ```
pub fn extract_regions(grid: &VoxelGrid, value: bool) -> Vec<Region> {
    let (width, height, depth) = grid.dimensions();
    let mut visited = VoxelGrid::new(width, height, depth, false);
    let mut regions = Vec::new();

    for start in grid.coords() {
        if grid.get(start) != Some(value) || visited.get(start) == Some(true) {
            continue;
        }
        regions.push(flood_fill(grid, &mut visited, start, value));
    }

    regions
}

fn flood_fill(grid: &VoxelGrid, visited: &mut VoxelGrid, start: Coord, value: bool) -> Region {
    let mut tiles = Vec::new();
    let mut queue = VecDeque::new();

    visited.set(start, true);
    queue.push_back(start);

    while let Some(tile) = queue.pop_front() {
        tiles.push(tile);

        for neighbour in tile.neighbours_18() {
            if grid.get(neighbour) == Some(value) && visited.get(neighbour) == Some(false) {
                visited.set(neighbour, true);
                queue.push_back(neighbour);
            }
        }
    }

    tiles
}

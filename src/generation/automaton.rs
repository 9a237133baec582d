//! Cellular-Automaton Smoothing
//!
//! Relaxes a noisy grid into cave-like shapes. Each pass counts wall cells
//! in the 26-neighbourhood (outside the grid counts as wall): more than
//! `birth_threshold` makes a wall, fewer than `death_threshold` opens the
//! cell, anything in between is left alone.
//!
//! Every pass reads from a snapshot of the previous state, so a cell written
//! early in a pass never influences its neighbours in the same pass. The
//! outer shell gets no special treatment and may erode.

use crate::grid::VoxelGrid;

/// Apply one smoothing pass and return the resulting grid
pub fn smooth_step(grid: &VoxelGrid, death_threshold: u32, birth_threshold: u32) -> VoxelGrid {
    let mut next = grid.clone();

    for coord in grid.coords() {
        let walls = grid.wall_neighbour_count(coord);
        if walls > birth_threshold {
            next.set(coord, true);
        } else if walls < death_threshold {
            next.set(coord, false);
        }
    }

    next
}

/// Apply `iterations` smoothing passes in place
pub fn smooth(grid: &mut VoxelGrid, iterations: usize, death_threshold: u32, birth_threshold: u32) {
    for iteration in 0..iterations {
        *grid = smooth_step(grid, death_threshold, birth_threshold);
        log::debug!(
            "smoothing: pass {}/{}, {} open cells",
            iteration + 1,
            iterations,
            grid.open_count()
        );
    }
}

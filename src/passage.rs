//! Passageway carving
//!
//! Traces a 3D Bresenham line between two edge tiles and opens a sphere of
//! voxels around every point on it.

use crate::grid::{Coord, VoxelGrid};

/// One carved connection between two rooms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    /// Index of the room the passage was searched from
    pub room_a: usize,
    /// Index of the room it was connected to
    pub room_b: usize,
    /// Edge tile of `room_a` where the passage starts
    pub from: Coord,
    /// Edge tile of `room_b` where the passage ends
    pub to: Coord,
    /// Rasterized centre line, `from` to `to` inclusive
    pub line: Vec<Coord>,
}

/// Rasterize the line from `from` to `to`, both endpoints included
///
/// The driving axis is the one with the largest delta (ties resolve x, then
/// y, then z). The two other axes keep error terms starting at
/// `2 * d_other - d_drive`; whenever an error is non-negative that axis
/// steps and the error drops by `2 * d_drive`, and each iteration adds
/// `2 * d_other`.
///
/// The line is always traced from the lexicographically smaller endpoint,
/// so `rasterize_line(a, b)` is exactly `rasterize_line(b, a)` reversed.
///
/// # Example
///
/// ```
/// use rust_voxel_caves::{rasterize_line, Coord};
///
/// let line = rasterize_line(Coord::new(0, 0, 0), Coord::new(3, 1, 0));
/// assert_eq!(line.first(), Some(&Coord::new(0, 0, 0)));
/// assert_eq!(line.last(), Some(&Coord::new(3, 1, 0)));
/// assert_eq!(line.len(), 4);
/// ```
pub fn rasterize_line(from: Coord, to: Coord) -> Vec<Coord> {
    if to < from {
        let mut line = trace(to, from);
        line.reverse();
        line
    } else {
        trace(from, to)
    }
}

fn trace(from: Coord, to: Coord) -> Vec<Coord> {
    let delta = [
        (to.x - from.x).abs(),
        (to.y - from.y).abs(),
        (to.z - from.z).abs(),
    ];
    let step = [
        (to.x - from.x).signum(),
        (to.y - from.y).signum(),
        (to.z - from.z).signum(),
    ];
    let [dx, dy, dz] = delta;

    let drive = if dx >= dy && dx >= dz {
        0
    } else if dy >= dx && dy >= dz {
        1
    } else {
        2
    };
    let (a, b) = match drive {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };

    let mut point = [from.x, from.y, from.z];
    let mut error_a = 2 * delta[a] - delta[drive];
    let mut error_b = 2 * delta[b] - delta[drive];

    let mut line = Vec::with_capacity(delta[drive] as usize + 1);
    line.push(from);

    for _ in 0..delta[drive] {
        point[drive] += step[drive];
        if error_a >= 0 {
            point[a] += step[a];
            error_a -= 2 * delta[drive];
        }
        if error_b >= 0 {
            point[b] += step[b];
            error_b -= 2 * delta[drive];
        }
        error_a += 2 * delta[a];
        error_b += 2 * delta[b];

        line.push(Coord::new(point[0], point[1], point[2]));
    }

    line
}

/// Open every in-bounds cell within `radius` of `center`
///
/// Offsets with `dx² + dy² + dz² <= radius²` are cleared; the rest of the
/// cube is skipped, as is anything outside the grid. Returns the number of
/// cells that changed from wall to open.
///
/// Distances are computed in `i64` and the scan is clipped to the grid, so
/// the cost is bounded by the grid size rather than the radius.
pub fn stamp_sphere(grid: &mut VoxelGrid, center: Coord, radius: u32) -> usize {
    let r = i64::from(radius);
    let r_squared = u64::from(radius) * u64::from(radius);
    let (width, height, depth) = grid.dimensions();

    // Offsets along one axis that stay within [0, len)
    let clip = |c: i32, len: usize| {
        let c = i64::from(c);
        (-r).max(-c)..=r.min(len as i64 - 1 - c)
    };

    let mut opened = 0;
    for dx in clip(center.x, width) {
        for dy in clip(center.y, height) {
            for dz in clip(center.z, depth) {
                if (dx * dx + dy * dy + dz * dz) as u64 > r_squared {
                    continue;
                }
                let cell = Coord::new(
                    (i64::from(center.x) + dx) as i32,
                    (i64::from(center.y) + dy) as i32,
                    (i64::from(center.z) + dz) as i32,
                );
                if grid.get(cell) == Some(true) {
                    grid.set(cell, false);
                    opened += 1;
                }
            }
        }
    }

    opened
}

/// Carve a passage between two tiles and return the rasterized line
pub fn carve_passage(grid: &mut VoxelGrid, from: Coord, to: Coord, radius: u32) -> Vec<Coord> {
    let line = rasterize_line(from, to);
    let opened: usize = line
        .iter()
        .map(|&point| stamp_sphere(grid, point, radius))
        .sum();

    log::debug!(
        "passage: {:?} -> {:?}, {} points, {} cells opened",
        from,
        to,
        line.len(),
        opened
    );

    line
}

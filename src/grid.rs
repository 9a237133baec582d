//! Voxel Grid Structure
//!
//! Dense 3D occupancy field shared by every generation stage, plus the
//! integer coordinate type used to address it.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer voxel coordinate
///
/// Ordered lexicographically by `(x, y, z)`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coord {
    /// Position along the width axis
    pub x: i32,
    /// Position along the height axis
    pub y: i32,
    /// Position along the depth axis
    pub z: i32,
}

impl Coord {
    /// Create a new coordinate
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Coordinate shifted by the given offset
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Squared Euclidean distance, exact in integers
    #[inline]
    pub fn squared_distance(self, other: Coord) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        let dz = i64::from(self.z - other.z);
        dx * dx + dy * dy + dz * dz
    }

    /// Check whether two distinct coordinates are 18-connected neighbours
    ///
    /// Each axis differs by at most one and at least one axis is equal, so
    /// face and edge neighbours qualify but pure corner diagonals do not.
    pub fn is_18_adjacent(self, other: Coord) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        let dz = (self.z - other.z).abs();
        self != other && dx <= 1 && dy <= 1 && dz <= 1 && (dx == 0 || dy == 0 || dz == 0)
    }

    /// Iterate the 18-connected neighbours of this coordinate
    ///
    /// Neighbours are produced in x/y/z offset order; bounds are not checked.
    pub fn neighbours_18(self) -> impl Iterator<Item = Coord> {
        neighbour_offsets().filter_map(move |(dx, dy, dz)| {
            let is_corner = dx != 0 && dy != 0 && dz != 0;
            (!is_corner).then(|| self.offset(dx, dy, dz))
        })
    }

    /// Iterate the full 26-cell cube neighbourhood of this coordinate
    pub fn neighbours_26(self) -> impl Iterator<Item = Coord> {
        neighbour_offsets().map(move |(dx, dy, dz)| self.offset(dx, dy, dz))
    }
}

fn neighbour_offsets() -> impl Iterator<Item = (i32, i32, i32)> {
    (-1..=1)
        .flat_map(|dx| (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| (dx, dy, dz))))
        .filter(|&offset| offset != (0, 0, 0))
}

/// Dense 3D boolean occupancy field
///
/// `true` is wall (solid), `false` is open. Cells are stored with x varying
/// fastest: index `x + y * width + z * width * height`.
///
/// # Example
///
/// ```
/// use rust_voxel_caves::{Coord, VoxelGrid};
///
/// let mut grid = VoxelGrid::new(4, 4, 4, true);
/// grid.set(Coord::new(1, 2, 1), false);
///
/// assert_eq!(grid.get(Coord::new(1, 2, 1)), Some(false));
/// assert_eq!(grid.get(Coord::new(9, 0, 0)), None);
/// assert!(grid.is_wall(Coord::new(-1, 0, 0))); // outside counts as wall
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    width: usize,
    height: usize,
    depth: usize,
    cells: Vec<bool>,
}

impl VoxelGrid {
    /// Create a grid with every cell set to `value`
    pub fn new(width: usize, height: usize, depth: usize, value: bool) -> Self {
        Self {
            width,
            height,
            depth,
            cells: vec![value; width * height * depth],
        }
    }

    /// Voxels along x
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Voxels along y
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Voxels along z
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Grid dimensions as `(width, height, depth)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    /// Total number of voxels
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the grid has no voxels
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check whether a coordinate lies inside the grid
    #[inline]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
            && (coord.z as usize) < self.depth
    }

    /// Check whether a coordinate lies on the outer shell
    pub fn is_shell(&self, coord: Coord) -> bool {
        self.in_bounds(coord)
            && (coord.x == 0
                || coord.y == 0
                || coord.z == 0
                || coord.x as usize == self.width - 1
                || coord.y as usize == self.height - 1
                || coord.z as usize == self.depth - 1)
    }

    #[inline]
    fn index(&self, coord: Coord) -> Option<usize> {
        self.in_bounds(coord).then(|| {
            coord.x as usize + coord.y as usize * self.width + coord.z as usize * self.width * self.height
        })
    }

    /// Read a cell, `None` if out of bounds
    #[inline]
    pub fn get(&self, coord: Coord) -> Option<bool> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// Read a cell, treating everything outside the grid as wall
    #[inline]
    pub fn is_wall(&self, coord: Coord) -> bool {
        self.get(coord).unwrap_or(true)
    }

    /// Write a cell
    ///
    /// Returns `false` and leaves the grid untouched if out of bounds.
    #[inline]
    pub fn set(&mut self, coord: Coord, value: bool) -> bool {
        match self.index(coord) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    /// Count wall cells in the 26-neighbourhood, out-of-bounds counted as wall
    pub fn wall_neighbour_count(&self, coord: Coord) -> u32 {
        coord
            .neighbours_26()
            .filter(|&neighbour| self.is_wall(neighbour))
            .count() as u32
    }

    /// Check whether any 18-connected neighbour is wall (or outside the grid)
    pub fn touches_wall_18(&self, coord: Coord) -> bool {
        coord.neighbours_18().any(|neighbour| self.is_wall(neighbour))
    }

    /// Iterate every coordinate, x outer, y middle, z inner
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let (width, height, depth) = (self.width as i32, self.height as i32, self.depth as i32);
        (0..width).flat_map(move |x| {
            (0..height).flat_map(move |y| (0..depth).map(move |z| Coord::new(x, y, z)))
        })
    }

    /// Number of wall cells
    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|&&wall| wall).count()
    }

    /// Number of open cells
    pub fn open_count(&self) -> usize {
        self.len() - self.wall_count()
    }

    /// Export as a density field for a surface extractor
    ///
    /// Walls are `1.0` and open cells `0.0`, in the grid's linear layout
    /// (`x + y * width + z * width * height`).
    pub fn density_field(&self) -> Vec<f32> {
        self.cells
            .iter()
            .map(|&wall| if wall { 1.0 } else { 0.0 })
            .collect()
    }

    /// Convert a voxel coordinate to the centre of that voxel in world space
    ///
    /// The grid is centred on the origin with one unit per voxel:
    /// `coord - dimension / 2 + 0.5` per axis (integer halving of the dimension).
    pub fn world_position(&self, coord: Coord) -> Vec3 {
        Vec3::new(
            world_axis(coord.x, self.width),
            world_axis(coord.y, self.height),
            world_axis(coord.z, self.depth),
        )
    }
}

#[inline]
fn world_axis(value: i32, dimension: usize) -> f32 {
    (value - (dimension / 2) as i32) as f32 + 0.5
}

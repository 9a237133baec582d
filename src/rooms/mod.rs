//! Room graph construction
//!
//! Prunes small wall and open pockets, promotes the surviving open regions
//! to rooms and keeps the room graph as an index-based adjacency structure.
//! Connection and carving live in [`connector`].

pub mod connector;

pub use connector::connect_closest_rooms;

use std::collections::BTreeSet;

use crate::error::{CaveError, Result};
use crate::grid::{Coord, VoxelGrid};
use crate::regions::{extract_regions, Region};

/// An open region that survived pruning
///
/// Rooms are stored in a `Vec` sorted by size, largest first, and refer to
/// each other by index. Index 0 is always the main room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Every open tile of the room, in flood-fill order
    pub tiles: Vec<Coord>,

    /// Tiles with at least one 18-connected wall neighbour
    ///
    /// Tiles on the grid boundary count as edge tiles since outside the
    /// grid is treated as wall. Passages always start and end on edge tiles.
    pub edge_tiles: Vec<Coord>,

    /// Indices of rooms joined to this one by a passage (symmetric)
    pub connected_rooms: BTreeSet<usize>,

    /// The largest room, root of accessibility
    pub is_main_room: bool,

    /// Reachable from the main room through carved passages
    pub is_accessible_from_main_room: bool,
}

impl Room {
    /// Create a room from an open region, computing its edge tiles against `grid`
    pub fn new(tiles: Region, grid: &VoxelGrid) -> Self {
        let edge_tiles = tiles
            .iter()
            .copied()
            .filter(|&tile| grid.touches_wall_18(tile))
            .collect();

        Self {
            tiles,
            edge_tiles,
            connected_rooms: BTreeSet::new(),
            is_main_room: false,
            is_accessible_from_main_room: false,
        }
    }

    /// Number of tiles in the room
    #[inline]
    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    /// Check whether a passage already joins this room to `other`
    #[inline]
    pub fn is_connected(&self, other: usize) -> bool {
        self.connected_rooms.contains(&other)
    }
}

/// Flip wall regions below `wall_threshold_size` to open and open regions
/// below `room_threshold_size` to wall, returning the surviving open regions
pub fn prune_regions(
    grid: &mut VoxelGrid,
    wall_threshold_size: usize,
    room_threshold_size: usize,
) -> Vec<Region> {
    let wall_regions = extract_regions(grid, true);
    let mut walls_removed = 0;
    for region in wall_regions.iter().filter(|r| r.len() < wall_threshold_size) {
        for &tile in region {
            grid.set(tile, false);
        }
        walls_removed += 1;
    }

    let open_regions = extract_regions(grid, false);
    let total_open = open_regions.len();
    let mut surviving = Vec::new();
    for region in open_regions {
        if region.len() < room_threshold_size {
            for &tile in &region {
                grid.set(tile, true);
            }
        } else {
            surviving.push(region);
        }
    }

    log::debug!(
        "pruning: removed {} of {} wall regions, sealed {} of {} open regions",
        walls_removed,
        wall_regions.len(),
        total_open - surviving.len(),
        total_open
    );

    surviving
}

/// Promote open regions to rooms, largest first, and flag the main room
///
/// # Errors
///
/// Returns `NoSurvivingRoom` if `regions` is empty.
pub fn build_rooms(grid: &VoxelGrid, regions: Vec<Region>) -> Result<Vec<Room>> {
    let mut rooms: Vec<Room> = regions
        .into_iter()
        .map(|region| Room::new(region, grid))
        .collect();

    // Stable sort: equal sizes keep extraction order
    rooms.sort_by(|a, b| b.size().cmp(&a.size()));

    let main_room = rooms.first_mut().ok_or(CaveError::NoSurvivingRoom)?;
    main_room.is_main_room = true;
    main_room.is_accessible_from_main_room = true;

    Ok(rooms)
}

/// Prune the grid and build the room list
///
/// # Errors
///
/// Returns `NoSurvivingRoom` if pruning leaves no open region.
pub fn process_rooms(
    grid: &mut VoxelGrid,
    wall_threshold_size: usize,
    room_threshold_size: usize,
) -> Result<Vec<Room>> {
    let regions = prune_regions(grid, wall_threshold_size, room_threshold_size);
    build_rooms(grid, regions)
}

/// Join two rooms with a symmetric edge and propagate accessibility
pub fn connect_rooms(rooms: &mut [Room], a: usize, b: usize) {
    rooms[a].connected_rooms.insert(b);
    rooms[b].connected_rooms.insert(a);

    if rooms[a].is_accessible_from_main_room {
        set_accessible_from_main_room(rooms, b);
    } else if rooms[b].is_accessible_from_main_room {
        set_accessible_from_main_room(rooms, a);
    }
}

/// Mark a room and everything connected to it as accessible
///
/// Walks the room graph with an explicit stack.
pub fn set_accessible_from_main_room(rooms: &mut [Room], start: usize) {
    let mut pending = vec![start];

    while let Some(index) = pending.pop() {
        let room = &mut rooms[index];
        if room.is_accessible_from_main_room {
            continue;
        }
        room.is_accessible_from_main_room = true;
        pending.extend(room.connected_rooms.iter().copied());
    }
}

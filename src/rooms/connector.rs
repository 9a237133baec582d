//! Greedy room connection
//!
//! Two passes over the room list:
//!
//! 1. Every room without a connection is joined to its nearest room.
//! 2. While some room is not accessible from the main room, each such room
//!    is joined to its nearest accessible room.
//!
//! "Nearest" compares squared distances between edge tiles; a candidate
//! replaces the current best only when strictly closer, so the first pair
//! found wins ties. This is a nearest-neighbour heuristic, not a minimum
//! spanning tree.
//!
//! # Cost
//!
//! Each search is O(rooms² × edge_tiles²). Grids up to about 64³ with the
//! default pruning sizes connect in well under a second; larger grids should
//! raise `room_threshold_size` to keep the room and edge-tile counts down.
//! [`crate::config::MAX_DIMENSION`] only caps allocation; grids near it are
//! accepted but can take a long time to connect at default pruning.

use crate::error::{CaveError, Result};
use crate::grid::{Coord, VoxelGrid};
use crate::passage::{carve_passage, Passage};

use super::{connect_rooms, Room};

/// Best connection found for one room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    room_b: usize,
    tile_a: Coord,
    tile_b: Coord,
    distance: i64,
}

/// Closest edge-tile pair between two rooms, first found on ties
fn closest_tiles(room_a: &Room, room_b: &Room) -> Option<(i64, Coord, Coord)> {
    let mut best: Option<(i64, Coord, Coord)> = None;

    for &tile_a in &room_a.edge_tiles {
        for &tile_b in &room_b.edge_tiles {
            let distance = tile_a.squared_distance(tile_b);
            if best.map_or(true, |(best_distance, _, _)| distance < best_distance) {
                best = Some((distance, tile_a, tile_b));
            }
        }
    }

    best
}

/// Nearest room to `a` among `candidates`, scanned in the given order
fn nearest_room(
    rooms: &[Room],
    a: usize,
    candidates: impl IntoIterator<Item = usize>,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for b in candidates {
        if b == a || rooms[a].is_connected(b) {
            continue;
        }
        let Some((distance, tile_a, tile_b)) = closest_tiles(&rooms[a], &rooms[b]) else {
            continue;
        };
        if best.map_or(true, |current| distance < current.distance) {
            best = Some(Candidate {
                room_b: b,
                tile_a,
                tile_b,
                distance,
            });
        }
    }

    best
}

fn create_passage(
    grid: &mut VoxelGrid,
    rooms: &mut [Room],
    a: usize,
    candidate: Candidate,
    radius: u32,
) -> Passage {
    connect_rooms(rooms, a, candidate.room_b);
    let line = carve_passage(grid, candidate.tile_a, candidate.tile_b, radius);

    Passage {
        room_a: a,
        room_b: candidate.room_b,
        from: candidate.tile_a,
        to: candidate.tile_b,
        line,
    }
}

/// Connect every room to the main room and carve the passages into `grid`
///
/// # Arguments
///
/// * `grid` - Grid the rooms were extracted from; passages are carved into it
/// * `rooms` - Rooms sorted largest first, index 0 being the main room
/// * `radius` - Radius of the sphere stamped along each passage
///
/// # Returns
///
/// Passages in the order they were carved. On success every room has
/// `is_accessible_from_main_room` set.
///
/// # Errors
///
/// Returns `InternalInvariant` if a room that is not yet accessible has no
/// candidate to connect to, which only happens for rooms without edge tiles.
pub fn connect_closest_rooms(
    grid: &mut VoxelGrid,
    rooms: &mut [Room],
    radius: u32,
) -> Result<Vec<Passage>> {
    let mut passages = Vec::new();

    // Pass 1: give every isolated room its nearest neighbour
    for a in 0..rooms.len() {
        if !rooms[a].connected_rooms.is_empty() {
            continue;
        }
        if let Some(candidate) = nearest_room(rooms, a, 0..rooms.len()) {
            passages.push(create_passage(grid, rooms, a, candidate, radius));
        }
    }
    let free_passages = passages.len();

    // Pass 2: force everything to be reachable from the main room
    let mut rounds = 0;
    while rooms.iter().any(|room| !room.is_accessible_from_main_room) {
        rounds += 1;
        let (accessible, pending): (Vec<usize>, Vec<usize>) =
            (0..rooms.len()).partition(|&i| rooms[i].is_accessible_from_main_room);

        for a in pending {
            if rooms[a].is_accessible_from_main_room {
                continue;
            }
            let candidate =
                nearest_room(rooms, a, accessible.iter().copied()).ok_or_else(|| {
                    CaveError::InternalInvariant(format!(
                        "room {} ({} tiles, {} edge tiles) has no accessible room to connect to",
                        a,
                        rooms[a].size(),
                        rooms[a].edge_tiles.len()
                    ))
                })?;
            passages.push(create_passage(grid, rooms, a, candidate, radius));
        }
    }

    log::debug!(
        "connector: {} rooms, {} passages ({} nearest-neighbour, {} forced over {} rounds)",
        rooms.len(),
        passages.len(),
        free_passages,
        passages.len() - free_passages,
        rounds
    );

    Ok(passages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::extract_regions;
    use crate::rooms::process_rooms;
    use crate::rooms::tests::open_box;
    use std::collections::HashSet;

    fn assert_rooms_reachable(grid: &VoxelGrid, rooms: &[Room]) {
        let start = rooms[0].tiles[0];
        let region: HashSet<Coord> = extract_regions(grid, false)
            .into_iter()
            .find(|region| region.contains(&start))
            .unwrap()
            .into_iter()
            .collect();

        for room in rooms {
            assert!(room.is_accessible_from_main_room);
            for tile in &room.tiles {
                assert!(region.contains(tile), "{:?} not reachable from main room", tile);
            }
        }
    }

    #[test]
    fn test_two_rooms_get_connected() {
        let mut grid = VoxelGrid::new(15, 7, 7, true);
        open_box(&mut grid, Coord::new(1, 1, 1), Coord::new(3, 3, 3));
        open_box(&mut grid, Coord::new(8, 1, 1), Coord::new(9, 2, 2));

        let mut rooms = process_rooms(&mut grid, 0, 5).unwrap();
        let passages = connect_closest_rooms(&mut grid, &mut rooms, 1).unwrap();

        assert_eq!(passages.len(), 1);
        assert_eq!((passages[0].room_a, passages[0].room_b), (0, 1));
        assert_eq!(passages[0].from.squared_distance(passages[0].to), 25);
        assert_eq!(passages[0].line.len(), 6);
        assert!(rooms[0].is_connected(1) && rooms[1].is_connected(0));
        assert_rooms_reachable(&grid, &rooms);
    }

    #[test]
    fn test_forced_pass_links_isolated_cluster() {
        let mut grid = VoxelGrid::new(38, 6, 6, true);
        // Main room with a close neighbour, and a far pair close to each other
        open_box(&mut grid, Coord::new(1, 1, 1), Coord::new(4, 4, 4));
        open_box(&mut grid, Coord::new(8, 1, 1), Coord::new(9, 2, 2));
        open_box(&mut grid, Coord::new(30, 1, 1), Coord::new(31, 2, 2));
        open_box(&mut grid, Coord::new(34, 1, 1), Coord::new(35, 2, 2));

        let mut rooms = process_rooms(&mut grid, 0, 5).unwrap();
        assert_eq!(rooms.len(), 4);

        let passages = connect_closest_rooms(&mut grid, &mut rooms, 1).unwrap();
        let pairs: Vec<(usize, usize)> = passages.iter().map(|p| (p.room_a, p.room_b)).collect();

        // Free pass: main -> near room, far pair joined to each other.
        // Forced pass: the far pair is joined to the nearest accessible room.
        assert_eq!(pairs, vec![(0, 1), (2, 3), (2, 1)]);
        assert_rooms_reachable(&grid, &rooms);
    }

    #[test]
    fn test_single_room_needs_no_passage() {
        let mut grid = VoxelGrid::new(6, 6, 6, true);
        open_box(&mut grid, Coord::new(1, 1, 1), Coord::new(4, 4, 4));

        let mut rooms = process_rooms(&mut grid, 0, 1).unwrap();
        let before = grid.clone();
        let passages = connect_closest_rooms(&mut grid, &mut rooms, 2).unwrap();

        assert!(passages.is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_ties_keep_first_pair() {
        let grid = VoxelGrid::new(10, 10, 10, true);
        let mut a = Room::new(vec![Coord::new(5, 5, 5)], &grid);
        a.edge_tiles = vec![Coord::new(5, 5, 5)];
        let mut b = Room::new(vec![Coord::new(5, 5, 1)], &grid);
        b.edge_tiles = vec![Coord::new(5, 5, 1), Coord::new(5, 5, 9)];

        let (distance, _, tile_b) = closest_tiles(&a, &b).unwrap();
        assert_eq!(distance, 16);
        assert_eq!(tile_b, Coord::new(5, 5, 1));
    }

    #[test]
    fn test_room_without_edge_tiles_is_invariant_error() {
        let mut grid = VoxelGrid::new(10, 10, 10, true);
        let mut rooms = vec![
            Room::new(vec![Coord::new(2, 2, 2)], &grid),
            Room::new(vec![Coord::new(7, 7, 7)], &grid),
        ];
        rooms[0].is_main_room = true;
        rooms[0].is_accessible_from_main_room = true;
        rooms[1].edge_tiles.clear();

        let result = connect_closest_rooms(&mut grid, &mut rooms, 1);
        assert!(matches!(result, Err(CaveError::InternalInvariant(_))));
    }
}

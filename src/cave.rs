//! Cave main structure

use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::CaveConfig;
use crate::error::{CaveError, Result};
use crate::generation::{generate_raw_grid, seeded_rng, time_seed};
use crate::grid::{Coord, VoxelGrid};
use crate::passage::Passage;
use crate::regions::extract_regions;
use crate::rooms::{build_rooms, connect_closest_rooms, process_rooms, Room};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A generated, fully connected cave
///
/// Owns the final occupancy grid together with the rooms and passages that
/// produced it and the chosen spawn tile. Nothing is shared between two
/// generation runs; regenerating means calling [`Cave::generate`] again and
/// dropping the old value.
///
/// # Examples
///
/// ```
/// use rust_voxel_caves::*;
///
/// let config = CaveConfigBuilder::new()
///     .seed("limestone")
///     .size(CaveSize::Custom { width: 24, height: 16, depth: 24 })
///     .build()
///     .unwrap();
///
/// let cave = Cave::generate(config).unwrap();
/// println!("{} rooms, {} passages", cave.room_count(), cave.passages().len());
///
/// // The spawn point is an open voxel inside the main room
/// assert_eq!(cave.grid().get(cave.spawn_tile()), Some(false));
/// assert!(cave.main_room().tiles.contains(&cave.spawn_tile()));
/// ```
#[derive(Clone)]
pub struct Cave {
    /// Configuration used to generate this cave
    config: CaveConfig,

    /// Seed string actually hashed (time-derived when `use_random_seed` is set)
    seed: String,

    /// Final occupancy grid
    grid: VoxelGrid,

    /// Rooms sorted largest first, index 0 is the main room
    rooms: Vec<Room>,

    /// Passages in carving order
    passages: Vec<Passage>,

    /// Tile the player is placed on
    spawn_tile: Coord,

    /// Spatial index over room tiles (optional, requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl Cave {
    /// Run the whole pipeline for one configuration
    ///
    /// Synthesize, smooth, prune, connect, carve and pick a spawn tile. With
    /// `do_processing` disabled the pruning, connection and carving stages
    /// are skipped and every open region becomes a room.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the configuration fails validation (checked
    ///   before anything is allocated)
    /// - `NoSurvivingRoom` if no open region is left to spawn in
    /// - `InternalInvariant` if the connector cannot reach a room
    pub fn generate(config: CaveConfig) -> Result<Self> {
        config.validate()?;

        let seed = if config.use_random_seed {
            time_seed()
        } else {
            config.seed.clone()
        };
        let mut rng = seeded_rng(&seed);

        let mut grid = generate_raw_grid(&config, &mut rng);

        let processed = if config.do_processing {
            process_rooms(
                &mut grid,
                config.wall_threshold_size,
                config.room_threshold_size,
            )
            .and_then(|mut rooms| {
                let passages =
                    connect_closest_rooms(&mut grid, &mut rooms, config.passageway_radius)?;
                Ok((rooms, passages))
            })
        } else {
            let regions = extract_regions(&grid, false);
            build_rooms(&grid, regions).map(|rooms| (rooms, Vec::new()))
        };

        let (rooms, passages) = match processed {
            Ok(result) => result,
            Err(err) => {
                log::warn!("cave generation with seed {:?} failed: {}", seed, err);
                return Err(err);
            }
        };

        let spawn_tile = select_spawn(&rooms, &mut rng)?;

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let positions: Vec<Vec3> = rooms
                .iter()
                .flat_map(|room| room.tiles.iter().map(|&tile| grid.world_position(tile)))
                .collect();
            let owners: Vec<usize> = rooms
                .iter()
                .enumerate()
                .flat_map(|(index, room)| std::iter::repeat(index).take(room.size()))
                .collect();
            SpatialIndex::new(&positions, owners)
        };

        log::info!(
            "generated {}x{}x{} cave from seed {:?}: {} rooms, {} passages, {} open cells",
            config.width,
            config.height,
            config.depth,
            seed,
            rooms.len(),
            passages.len(),
            grid.open_count()
        );

        Ok(Self {
            config,
            seed,
            grid,
            rooms,
            passages,
            spawn_tile,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the configuration used to generate this cave
    #[inline]
    pub fn config(&self) -> &CaveConfig {
        &self.config
    }

    /// Get the seed string that was actually used
    ///
    /// Equal to `config().seed` unless `use_random_seed` was set; feeding
    /// it back with `use_random_seed` off reproduces this cave.
    #[inline]
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Get the final occupancy grid
    #[inline]
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Take ownership of the grid, dropping the rest
    pub fn into_grid(self) -> VoxelGrid {
        self.grid
    }

    /// Get all rooms, largest first
    #[inline]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Get the number of rooms
    #[inline]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Get the main (largest) room
    #[inline]
    pub fn main_room(&self) -> &Room {
        // generate() never builds a cave without rooms
        &self.rooms[0]
    }

    /// Get a room by index
    #[inline]
    pub fn get_room(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index)
    }

    /// Get the carved passages in carving order
    #[inline]
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// Get the spawn tile inside the main room
    #[inline]
    pub fn spawn_tile(&self) -> Coord {
        self.spawn_tile
    }

    /// Get the spawn point in world space (grid centred on the origin)
    pub fn spawn_position(&self) -> Vec3 {
        self.grid.world_position(self.spawn_tile)
    }

    /// Export the grid as a density field for a surface extractor
    ///
    /// See [`VoxelGrid::density_field`] for the layout.
    pub fn density_field(&self) -> Vec<f32> {
        self.grid.density_field()
    }

    /// Find the room owning the room tile nearest to a world position
    /// (requires spatial-index feature)
    ///
    /// Passage voxels belong to no room, so a position inside a passage
    /// resolves to whichever room tile is closest.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voxel_caves::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// # let config = CaveConfigBuilder::new().seed("slate")
    /// #     .size(CaveSize::Custom { width: 20, height: 14, depth: 20 }).build().unwrap();
    /// let cave = Cave::generate(config).unwrap();
    /// assert_eq!(cave.find_room_at(cave.spawn_position()), 0);
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_room_at(&self, position: Vec3) -> usize {
        self.spatial_index.find_nearest(position)
    }
}

/// Generate a cave from a configuration
///
/// Convenience wrapper around [`Cave::generate`] for callers holding a
/// borrowed configuration.
pub fn generate(config: &CaveConfig) -> Result<Cave> {
    Cave::generate(config.clone())
}

/// Pick a uniformly random tile of the main room
fn select_spawn(rooms: &[Room], rng: &mut ChaCha8Rng) -> Result<Coord> {
    let main_room = rooms.first().ok_or(CaveError::NoSurvivingRoom)?;
    if main_room.tiles.is_empty() {
        return Err(CaveError::InternalInvariant(
            "main room has no tiles".to_string(),
        ));
    }
    let index = rng.gen_range(0..main_room.tiles.len());
    Ok(main_room.tiles[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CaveConfigBuilder, CaveSize};
    use std::collections::HashSet;

    fn config(width: usize, height: usize, depth: usize) -> CaveConfigBuilder {
        CaveConfigBuilder::new()
            .seed("test")
            .size(CaveSize::Custom {
                width,
                height,
                depth,
            })
    }

    // Dense, lightly smoothed noise that splits into dozens of rooms, so the
    // connector and carver are exercised end to end
    fn multi_room_config() -> CaveConfigBuilder {
        config(24, 24, 24)
            .fill_percent(65)
            .unwrap()
            .thresholds(13, 13)
            .unwrap()
            .smoothing_iterations(1)
            .pruning(0, 3)
    }

    fn open_component(grid: &VoxelGrid, start: Coord) -> HashSet<Coord> {
        extract_regions(grid, false)
            .into_iter()
            .find(|region| region.contains(&start))
            .unwrap_or_default()
            .into_iter()
            .collect()
    }

    fn assert_fully_connected(cave: &Cave) {
        let reachable = open_component(cave.grid(), cave.spawn_tile());
        for room in cave.rooms() {
            assert!(room.is_accessible_from_main_room);
            for tile in &room.tiles {
                assert!(reachable.contains(tile), "{:?} unreachable from spawn", tile);
            }
        }
    }

    #[test]
    fn test_cave_generation() {
        let config = multi_room_config().build().unwrap();
        let cave = Cave::generate(config.clone()).unwrap();

        assert!(cave.room_count() > 1);
        assert!(!cave.passages().is_empty());
        assert_eq!(cave.seed(), "test");
        assert_eq!(cave.config(), &config);
        assert_eq!(cave.grid().dimensions(), (24, 24, 24));
        assert_eq!(cave.rooms().iter().filter(|r| r.is_main_room).count(), 1);
        assert!(cave.main_room().is_main_room);
        assert_fully_connected(&cave);
    }

    #[test]
    fn test_determinism() {
        let config = multi_room_config().build().unwrap();
        let cave1 = Cave::generate(config.clone()).unwrap();
        let cave2 = Cave::generate(config).unwrap();

        assert!(!cave1.passages().is_empty());
        assert_eq!(cave1.room_count(), cave2.room_count());
        assert_eq!(cave1.grid(), cave2.grid());
        assert_eq!(cave1.spawn_tile(), cave2.spawn_tile());
        assert_eq!(cave1.passages(), cave2.passages());
    }

    #[test]
    fn test_random_seed_is_recorded() {
        let config = config(16, 12, 16).use_random_seed(true).build().unwrap();
        let cave = Cave::generate(config.clone()).unwrap();
        assert!(!cave.seed().is_empty());

        // Replaying the recorded seed reproduces the cave
        let replay = CaveConfig {
            seed: cave.seed().to_string(),
            use_random_seed: false,
            ..config
        };
        assert_eq!(Cave::generate(replay).unwrap().grid(), cave.grid());
    }

    #[test]
    fn test_unsmoothed_noise_is_connected() {
        // Raw 45% noise percolates into a single open region
        let config = config(16, 16, 16)
            .smoothing_iterations(0)
            .pruning(2, 5)
            .build()
            .unwrap();
        let cave = Cave::generate(config).unwrap();
        assert_fully_connected(&cave);
    }

    #[test]
    fn test_wide_passages_stay_connected() {
        let config = multi_room_config()
            .passageway_radius(2)
            .unwrap()
            .build()
            .unwrap();
        let cave = Cave::generate(config).unwrap();

        assert!(cave.room_count() > 1);
        assert!(!cave.passages().is_empty());
        assert_fully_connected(&cave);
    }

    #[test]
    fn test_small_scenario() {
        let config = config(10, 10, 10)
            .fill_percent(45)
            .unwrap()
            .thresholds(3, 6)
            .unwrap()
            .smoothing_iterations(2)
            .pruning(2, 5)
            .passageway_radius(1)
            .unwrap()
            .build()
            .unwrap();

        // Birth at more than 6 wall neighbours seals a 45% grid in two passes
        assert_eq!(Cave::generate(config).err(), Some(CaveError::NoSurvivingRoom));
    }

    #[test]
    fn test_zero_fill_gives_single_interior_room() {
        let config = config(10, 10, 10)
            .fill_percent(0)
            .unwrap()
            .smoothing_iterations(0)
            .pruning(2, 5)
            .build()
            .unwrap();
        let cave = Cave::generate(config).unwrap();

        assert_eq!(cave.room_count(), 1);
        assert_eq!(cave.main_room().size(), 8 * 8 * 8);
        assert!(cave.passages().is_empty());
        assert!(!cave.grid().is_shell(cave.spawn_tile()));
    }

    #[test]
    fn test_full_fill_has_no_room() {
        let config = config(10, 10, 10)
            .fill_percent(100)
            .unwrap()
            .thresholds(3, 6)
            .unwrap()
            .smoothing_iterations(2)
            .pruning(2, 5)
            .build()
            .unwrap();

        assert_eq!(Cave::generate(config).err(), Some(CaveError::NoSurvivingRoom));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut config = CaveConfig::default();
        config.width = 0;
        assert!(matches!(
            Cave::generate(config),
            Err(CaveError::InvalidConfig(_))
        ));

        let mut config = CaveConfig::default();
        config.fill_percent = 150;
        assert!(matches!(generate(&config), Err(CaveError::InvalidConfig(_))));
    }

    #[test]
    fn test_processing_disabled_keeps_raw_regions() {
        let builder = config(16, 16, 16).smoothing_iterations(0);
        let raw = builder.clone().do_processing(false).build().unwrap();
        let processed = builder.build().unwrap();

        let raw_cave = Cave::generate(raw.clone()).unwrap();
        assert!(raw_cave.passages().is_empty());

        // Without processing the grid is exactly the smoothed noise
        let mut rng = seeded_rng("test");
        assert_eq!(raw_cave.grid(), &generate_raw_grid(&raw, &mut rng));
        assert_eq!(
            raw_cave.room_count(),
            extract_regions(raw_cave.grid(), false).len()
        );

        let processed_cave = Cave::generate(processed).unwrap();
        assert!(processed_cave.room_count() <= raw_cave.room_count());
    }

    #[test]
    fn test_spawn_position_matches_tile() {
        let config = config(20, 14, 20).build().unwrap();
        let cave = Cave::generate(config).unwrap();

        let tile = cave.spawn_tile();
        let expected = Vec3::new(
            tile.x as f32 - 10.0 + 0.5,
            tile.y as f32 - 7.0 + 0.5,
            tile.z as f32 - 10.0 + 0.5,
        );
        assert_eq!(cave.spawn_position(), expected);
        assert_eq!(cave.density_field().len(), 20 * 14 * 20);
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_find_room_at() {
        let config = multi_room_config().build().unwrap();
        let cave = Cave::generate(config).unwrap();
        assert!(cave.room_count() > 1);

        for (index, room) in cave.rooms().iter().enumerate() {
            let position = cave.grid().world_position(room.tiles[0]);
            assert_eq!(cave.find_room_at(position), index);
        }
    }
}

//! Seeded Density Synthesis
//!
//! Fills a fresh grid with random walls using a pinned, portable generator:
//! the seed string is hashed with 64-bit FNV-1a and the hash seeds a
//! `ChaCha8Rng`. Cells are visited x outer, y middle, z inner; shell cells
//! are forced to wall without consuming a draw, every interior cell draws
//! `gen_range(0..100)` and becomes wall when the draw is below `fill_percent`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::grid::VoxelGrid;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hash a seed string with 64-bit FNV-1a over its UTF-8 bytes
///
/// # Example
///
/// ```rust
/// use rust_voxel_caves::generation::hash_seed;
///
/// assert_eq!(hash_seed(""), 0xcbf29ce484222325);
/// assert_eq!(hash_seed("cave"), hash_seed("cave"));
/// ```
pub fn hash_seed(seed: &str) -> u64 {
    seed.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Create the generator used for one generation run
pub fn seeded_rng(seed: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(hash_seed(seed))
}

/// Seed string derived from the current time (nanoseconds since the UNIX epoch)
pub fn time_seed() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default()
        .to_string()
}

/// Fill a new grid with seeded random walls
///
/// # Arguments
///
/// * `width`, `height`, `depth` - Grid dimensions
/// * `fill_percent` - Wall probability for interior cells (0-100)
/// * `rng` - Generator; advanced by exactly one draw per interior cell
///
/// # Returns
///
/// A grid whose outer shell is entirely wall
pub fn synthesize_density(
    width: usize,
    height: usize,
    depth: usize,
    fill_percent: u32,
    rng: &mut ChaCha8Rng,
) -> VoxelGrid {
    let mut grid = VoxelGrid::new(width, height, depth, true);
    let mut walls = 0usize;

    // coords() walks x outer, y middle, z inner; the draw order depends on it
    let coords: Vec<_> = grid.coords().collect();
    for coord in coords {
        let wall = grid.is_shell(coord) || rng.gen_range(0..100u32) < fill_percent;
        grid.set(coord, wall);
        walls += usize::from(wall);
    }

    log::debug!(
        "density: {}x{}x{} grid, {} of {} cells wall ({}% fill)",
        width,
        height,
        depth,
        walls,
        grid.len(),
        fill_percent
    );

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(hash_seed(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(hash_seed("a"), 0xaf63_dc4c_8601_ec8c);
        assert_ne!(hash_seed("test"), hash_seed("tset"));
    }

    #[test]
    fn test_pinned_stream_reference() {
        use rand::RngCore;

        assert_eq!(hash_seed("test"), 0xf9e6_e6ef_197c_2b25);

        let mut rng = seeded_rng("test");
        let words: Vec<u32> = (0..4).map(|_| rng.next_u32()).collect();
        assert_eq!(words, [64_508_820, 684_035_623, 832_012_325, 347_679_991]);

        // gen_range rejects the second raw word, so the draws skip it
        let mut rng = seeded_rng("test");
        let draws: Vec<u32> = (0..8).map(|_| rng.gen_range(0..100u32)).collect();
        assert_eq!(draws, [1, 19, 8, 83, 27, 78, 62, 52]);
    }

    #[test]
    fn test_pinned_grid_reference() {
        let grid = synthesize_density(5, 5, 5, 50, &mut seeded_rng("test"));
        let interior_walls: Vec<Coord> = grid
            .coords()
            .filter(|&c| !grid.is_shell(c) && grid.is_wall(c))
            .collect();

        let expected = [
            (1, 1, 1),
            (1, 1, 2),
            (1, 1, 3),
            (1, 2, 2),
            (2, 3, 1),
            (2, 3, 2),
            (2, 3, 3),
            (3, 1, 1),
            (3, 1, 2),
            (3, 2, 1),
            (3, 2, 2),
            (3, 3, 2),
            (3, 3, 3),
        ]
        .map(|(x, y, z)| Coord::new(x, y, z));

        assert_eq!(interior_walls, expected);
        assert_eq!(grid.wall_count(), 98 + 13);
    }

    #[test]
    fn test_synthesis_determinism() {
        let grid1 = synthesize_density(12, 9, 14, 45, &mut seeded_rng("test"));
        let grid2 = synthesize_density(12, 9, 14, 45, &mut seeded_rng("test"));
        assert_eq!(grid1, grid2);
    }

    #[test]
    fn test_synthesis_different_seeds() {
        let grid1 = synthesize_density(12, 12, 12, 45, &mut seeded_rng("granite"));
        let grid2 = synthesize_density(12, 12, 12, 45, &mut seeded_rng("basalt"));
        assert_ne!(grid1, grid2, "Different seeds should produce different grids");
    }

    #[test]
    fn test_shell_is_wall_after_synthesis() {
        let grid = synthesize_density(10, 7, 9, 45, &mut seeded_rng("shell"));
        for coord in grid.coords() {
            if grid.is_shell(coord) {
                assert_eq!(grid.get(coord), Some(true), "shell cell {:?} must be wall", coord);
            }
        }
    }

    #[test]
    fn test_zero_fill_leaves_only_shell() {
        let grid = synthesize_density(10, 10, 10, 0, &mut seeded_rng("empty"));
        assert_eq!(grid.open_count(), 8 * 8 * 8);
        assert!(grid.coords().all(|c| grid.is_shell(c) == grid.is_wall(c)));
    }

    #[test]
    fn test_full_fill_is_solid() {
        let grid = synthesize_density(10, 10, 10, 100, &mut seeded_rng("solid"));
        assert_eq!(grid.open_count(), 0);
    }

    #[test]
    fn test_fill_ratio_is_plausible() {
        let grid = synthesize_density(32, 32, 32, 45, &mut seeded_rng("ratio"));
        let interior: Vec<Coord> = grid.coords().filter(|&c| !grid.is_shell(c)).collect();
        let walls = interior.iter().filter(|&&c| grid.is_wall(c)).count();
        let ratio = walls as f32 / interior.len() as f32;
        assert!((0.40..0.50).contains(&ratio), "wall ratio {} far from 0.45", ratio);
    }

    #[test]
    fn test_one_draw_per_interior_cell() {
        let mut rng = seeded_rng("draws");
        synthesize_density(5, 5, 5, 50, &mut rng);
        let after_fill: u32 = rng.gen_range(0..100u32);

        let mut reference = seeded_rng("draws");
        for _ in 0..27 {
            let _: u32 = reference.gen_range(0..100u32);
        }
        assert_eq!(after_fill, reference.gen_range(0..100u32));
    }
}

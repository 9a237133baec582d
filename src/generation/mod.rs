//! Raw cave grid generation
//!
//! Seeded density synthesis followed by cellular-automaton smoothing.
//! Region processing happens afterwards in [`crate::rooms`].

mod automaton;
mod density;

pub use automaton::{smooth, smooth_step};
pub use density::{hash_seed, seeded_rng, synthesize_density, time_seed};

use rand_chacha::ChaCha8Rng;

use crate::config::CaveConfig;
use crate::grid::VoxelGrid;

/// Generate the smoothed grid from configuration (without region processing)
///
/// `rng` must be the generator seeded for this run; it is left positioned
/// after the density draws so later stages can keep drawing from it.
pub fn generate_raw_grid(config: &CaveConfig, rng: &mut ChaCha8Rng) -> VoxelGrid {
    // Step 1: Random fill with a solid shell
    let mut grid = synthesize_density(
        config.width,
        config.height,
        config.depth,
        config.fill_percent,
        rng,
    );

    // Step 2: Cellular-automaton relaxation
    smooth(
        &mut grid,
        config.smoothing_iterations,
        config.death_threshold,
        config.birth_threshold,
    );

    grid
}

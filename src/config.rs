//! Cave Configuration and Builder
//!
//! This module provides configuration types for deterministic cave generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CaveError, Result};

/// Largest accepted grid dimension along any axis
///
/// This is an allocation and indexing cap that keeps every coordinate well
/// inside `i32`. It is not a performance promise: room connection is
/// quadratic in edge tiles, and the practical limits are documented on
/// [`crate::rooms::connector`].
pub const MAX_DIMENSION: usize = 512;

/// Largest accepted passage carving radius
///
/// A sphere wider than the largest grid carves nothing more.
pub const MAX_PASSAGEWAY_RADIUS: u32 = MAX_DIMENSION as u32;

/// Number of cells in a 26-neighbourhood, the upper bound for smoothing thresholds
pub const MAX_NEIGHBOUR_THRESHOLD: u32 = 26;

/// Grid size presets
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaveSize {
    /// 32 x 24 x 32 voxels
    Small,
    /// 48 x 32 x 48 voxels (default)
    Medium,
    /// 64 x 48 x 64 voxels
    Large,
    /// Custom grid dimensions
    Custom {
        /// Voxels along x
        width: usize,
        /// Voxels along y
        height: usize,
        /// Voxels along z
        depth: usize,
    },
}

impl CaveSize {
    /// Get the `(width, height, depth)` of this preset
    pub fn dimensions(self) -> (usize, usize, usize) {
        match self {
            CaveSize::Small => (32, 24, 32),
            CaveSize::Medium => (48, 32, 48),
            CaveSize::Large => (64, 48, 64),
            CaveSize::Custom {
                width,
                height,
                depth,
            } => (width, height, depth),
        }
    }

    /// Get a human-readable name for this size
    pub fn name(self) -> &'static str {
        match self {
            CaveSize::Small => "Small",
            CaveSize::Medium => "Medium",
            CaveSize::Large => "Large",
            CaveSize::Custom { .. } => "Custom",
        }
    }
}

impl Default for CaveSize {
    fn default() -> Self {
        CaveSize::Medium
    }
}

/// Configuration for deterministic cave generation
///
/// The same configuration (with `use_random_seed` off) always produces the
/// identical cave. Fields are public so a configuration can be loaded from
/// a file; [`CaveConfig::validate`] is run by the generator before any grid
/// is allocated.
///
/// # Example
///
/// ```rust
/// use rust_voxel_caves::*;
///
/// let config = CaveConfigBuilder::new()
///     .seed("granite")
///     .size(CaveSize::Small)
///     .fill_percent(45)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.width, 32);
/// assert!(!config.use_random_seed);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaveConfig {
    /// Voxels along x
    pub width: usize,
    /// Voxels along y
    pub height: usize,
    /// Voxels along z
    pub depth: usize,

    /// Seed string for the density synthesis
    ///
    /// Hashed with FNV-1a into a ChaCha8 seed, so the same string gives the
    /// same cave on every platform.
    pub seed: String,

    /// Ignore `seed` and derive one from the current time
    pub use_random_seed: bool,

    /// Probability (0-100) that an interior voxel starts as wall
    pub fill_percent: u32,

    /// A voxel with fewer wall neighbours than this becomes open
    pub death_threshold: u32,

    /// A voxel with more wall neighbours than this becomes wall
    pub birth_threshold: u32,

    /// Number of cellular-automaton passes
    pub smoothing_iterations: usize,

    /// Run region pruning, room connection and passage carving
    pub do_processing: bool,

    /// Wall regions smaller than this are opened up
    pub wall_threshold_size: usize,

    /// Open regions smaller than this are sealed
    pub room_threshold_size: usize,

    /// Radius of the sphere stamped along each passage
    pub passageway_radius: u32,
}

impl CaveConfig {
    /// Grid dimensions as `(width, height, depth)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    /// Total number of voxels
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Check every field against its allowed range
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        validate_dimension("width", self.width)?;
        validate_dimension("height", self.height)?;
        validate_dimension("depth", self.depth)?;
        validate_fill_percent(self.fill_percent)?;
        validate_threshold("death threshold", self.death_threshold)?;
        validate_threshold("birth threshold", self.birth_threshold)?;
        validate_passageway_radius(self.passageway_radius)?;
        Ok(())
    }
}

impl Default for CaveConfig {
    fn default() -> Self {
        CaveConfigBuilder::new().build_unchecked()
    }
}

fn validate_dimension(name: &str, value: usize) -> Result<()> {
    if value == 0 || value > MAX_DIMENSION {
        return Err(CaveError::InvalidConfig(format!(
            "{} must be in 1..={} (got {})",
            name, MAX_DIMENSION, value
        )));
    }
    Ok(())
}

fn validate_fill_percent(percent: u32) -> Result<()> {
    if percent > 100 {
        return Err(CaveError::InvalidConfig(format!(
            "fill percent must be <= 100 (got {})",
            percent
        )));
    }
    Ok(())
}

fn validate_threshold(name: &str, threshold: u32) -> Result<()> {
    if threshold > MAX_NEIGHBOUR_THRESHOLD {
        return Err(CaveError::InvalidConfig(format!(
            "{} must be <= {} (got {})",
            name, MAX_NEIGHBOUR_THRESHOLD, threshold
        )));
    }
    Ok(())
}

// A radius of 0 stamps single voxels, and a diagonal Bresenham step would
// then leave the passage disconnected under 18-connectivity.
fn validate_passageway_radius(radius: u32) -> Result<()> {
    if radius == 0 || radius > MAX_PASSAGEWAY_RADIUS {
        return Err(CaveError::InvalidConfig(format!(
            "passageway radius must be in 1..={} (got {})",
            MAX_PASSAGEWAY_RADIUS, radius
        )));
    }
    Ok(())
}

/// Builder for creating CaveConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_voxel_caves::*;
///
/// // Use defaults (random seed)
/// let config = CaveConfigBuilder::new().build().unwrap();
/// assert!(config.use_random_seed);
///
/// // Customize
/// let config = CaveConfigBuilder::new()
///     .seed("basalt")
///     .size(CaveSize::Custom { width: 20, height: 16, depth: 20 })
///     .smoothing_iterations(3)
///     .thresholds(12, 14)
///     .unwrap()
///     .passageway_radius(2)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.dimensions(), (20, 16, 20));
/// ```
#[derive(Debug, Clone)]
pub struct CaveConfigBuilder {
    size: CaveSize,
    seed: Option<String>,
    use_random_seed: bool,
    fill_percent: u32,
    death_threshold: u32,
    birth_threshold: u32,
    smoothing_iterations: usize,
    do_processing: bool,
    wall_threshold_size: usize,
    room_threshold_size: usize,
    passageway_radius: u32,
}

impl CaveConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - size: Medium (48 x 32 x 48)
    /// - seed: derived from the current time at generation
    /// - fill_percent: 45
    /// - death_threshold / birth_threshold: 13 / 13 (majority rule)
    /// - smoothing_iterations: 4
    /// - do_processing: true
    /// - wall_threshold_size / room_threshold_size: 20 / 20
    /// - passageway_radius: 1
    pub fn new() -> Self {
        Self {
            size: CaveSize::default(),
            seed: None,
            use_random_seed: false,
            fill_percent: 45,
            death_threshold: 13,
            birth_threshold: 13,
            smoothing_iterations: 4,
            do_processing: true,
            wall_threshold_size: 20,
            room_threshold_size: 20,
            passageway_radius: 1,
        }
    }

    /// Set the grid size
    pub fn size(mut self, size: CaveSize) -> Self {
        self.size = size;
        self
    }

    /// Set the seed string
    ///
    /// The same seed with the same other parameters produces an identical
    /// cave every time.
    pub fn seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Derive the seed from the current time instead of the seed string
    pub fn use_random_seed(mut self, enabled: bool) -> Self {
        self.use_random_seed = enabled;
        self
    }

    /// Set the initial wall probability in percent
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if percent > 100
    pub fn fill_percent(mut self, percent: u32) -> Result<Self> {
        validate_fill_percent(percent)?;
        self.fill_percent = percent;
        Ok(self)
    }

    /// Set the smoothing thresholds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either threshold is above 26
    pub fn thresholds(mut self, death: u32, birth: u32) -> Result<Self> {
        validate_threshold("death threshold", death)?;
        validate_threshold("birth threshold", birth)?;
        self.death_threshold = death;
        self.birth_threshold = birth;
        Ok(self)
    }

    /// Set the number of smoothing passes
    pub fn smoothing_iterations(mut self, iterations: usize) -> Self {
        self.smoothing_iterations = iterations;
        self
    }

    /// Enable or disable pruning, connection and carving
    pub fn do_processing(mut self, enabled: bool) -> Self {
        self.do_processing = enabled;
        self
    }

    /// Set the pruning sizes for wall pockets and open pockets
    pub fn pruning(mut self, wall_threshold_size: usize, room_threshold_size: usize) -> Self {
        self.wall_threshold_size = wall_threshold_size;
        self.room_threshold_size = room_threshold_size;
        self
    }

    /// Set the passage carving radius
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if radius is 0 or above [`MAX_PASSAGEWAY_RADIUS`]
    pub fn passageway_radius(mut self, radius: u32) -> Result<Self> {
        validate_passageway_radius(radius)?;
        self.passageway_radius = radius;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, the configuration uses a time-derived seed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the grid dimensions are out of range
    pub fn build(self) -> Result<CaveConfig> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    fn build_unchecked(self) -> CaveConfig {
        let (width, height, depth) = self.size.dimensions();
        let use_random_seed = self.use_random_seed || self.seed.is_none();

        CaveConfig {
            width,
            height,
            depth,
            seed: self.seed.unwrap_or_default(),
            use_random_seed,
            fill_percent: self.fill_percent,
            death_threshold: self.death_threshold,
            birth_threshold: self.birth_threshold,
            smoothing_iterations: self.smoothing_iterations,
            do_processing: self.do_processing,
            wall_threshold_size: self.wall_threshold_size,
            room_threshold_size: self.room_threshold_size,
            passageway_radius: self.passageway_radius,
        }
    }
}

impl Default for CaveConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

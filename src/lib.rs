//! Voxel cave generation with guaranteed connectivity
//!
//! A standalone library that grows a 3D cave out of seeded noise and a
//! cellular automaton, then repairs it so every room can be reached from the
//! main room. The result is a plain occupancy grid, ready for any surface
//! extractor or game engine.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rust_voxel_caves::*;
//!
//! // Generate a cave
//! let config = CaveConfigBuilder::new()
//!     .seed("granite")
//!     .size(CaveSize::Medium)
//!     .smoothing_iterations(4)
//!     .build().unwrap();
//!
//! let cave = Cave::generate(config).unwrap();
//!
//! // Build a mesh and place the player
//! let mesh = extract_cave_mesh(&cave, &BlockFaceExtractor::default());
//! println!("Generated {} triangles, spawn at {}", mesh.triangle_count(), cave.spawn_position());
//! ```
//!
//! # Pipeline
//!
//! 1. Seeded random fill with a solid shell ([`generation`])
//! 2. Cellular-automaton smoothing over the 26-neighbourhood
//! 3. 18-connected region extraction ([`regions`])
//! 4. Pruning of small wall and open pockets, room promotion ([`rooms`])
//! 5. Greedy nearest-room connection with forced accessibility
//! 6. Passage carving by 3D Bresenham lines and sphere stamps ([`passage`])
//! 7. Spawn selection inside the main room ([`Cave`])
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-room lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and coordinates

// Modules
pub mod error;
pub mod config;
pub mod grid;
pub mod generation;
pub mod regions;
pub mod rooms;
pub mod passage;
pub mod cave;
pub mod mesh;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{CaveError, Result};
pub use config::{CaveConfig, CaveConfigBuilder, CaveSize};
pub use grid::{Coord, VoxelGrid};
pub use regions::{extract_regions, Region};
pub use rooms::Room;
pub use passage::{carve_passage, rasterize_line, stamp_sphere, Passage};
pub use cave::{generate, Cave};
pub use mesh::{extract_cave_mesh, BlockFaceExtractor, MeshData, SurfaceExtractor};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::Vec3 for convenience
pub use glam::Vec3;

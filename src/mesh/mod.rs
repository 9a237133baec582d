//! Surface extraction seam
//!
//! The cave core hands a density field to a [`SurfaceExtractor`] and gets
//! engine-agnostic geometry back. Any isosurface algorithm (marching cubes,
//! surface nets, ...) can be plugged in; [`BlockFaceExtractor`] is a simple
//! blocky reference implementation.

use crate::cave::Cave;

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions (world space, grid centred on the origin)
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals (pointing out of the rock into open space)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Converts a density field into renderable geometry
///
/// `density` uses the grid layout `x + y * width + z * width * height`, with
/// `1.0` for wall and `0.0` for open space.
pub trait SurfaceExtractor {
    /// Extract the surface of the field
    fn extract(&self, density: &[f32], width: usize, height: usize, depth: usize) -> MeshData;
}

/// Blocky extractor emitting one quad per wall face that borders open space
///
/// Faces on the outside of the grid are never emitted; the cave is viewed
/// from within. Vertices are not shared between quads.
#[derive(Debug, Clone, Copy)]
pub struct BlockFaceExtractor {
    /// Density at or above which a voxel counts as solid
    pub iso_level: f32,
}

impl Default for BlockFaceExtractor {
    fn default() -> Self {
        Self { iso_level: 0.5 }
    }
}

/// Face directions with the four corner offsets of each unit face,
/// counter-clockwise when seen from the open side
const FACES: [([i32; 3], [[f32; 3]; 4]); 6] = [
    ([1, 0, 0], [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]]),
    ([-1, 0, 0], [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]]),
    ([0, 1, 0], [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]]),
    ([0, -1, 0], [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]]),
    ([0, 0, 1], [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]]),
    ([0, 0, -1], [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]]),
];

impl SurfaceExtractor for BlockFaceExtractor {
    fn extract(&self, density: &[f32], width: usize, height: usize, depth: usize) -> MeshData {
        let mut mesh = MeshData::default();
        if density.len() != width * height * depth {
            log::warn!(
                "density field has {} samples, expected {}x{}x{}",
                density.len(),
                width,
                height,
                depth
            );
            return mesh;
        }

        let dims = [width as i32, height as i32, depth as i32];
        let solid = |x: i32, y: i32, z: i32| -> Option<bool> {
            let inside = x >= 0 && y >= 0 && z >= 0 && x < dims[0] && y < dims[1] && z < dims[2];
            inside.then(|| {
                let index = x as usize + y as usize * width + z as usize * width * height;
                density[index] >= self.iso_level
            })
        };
        let origin = [
            -((width / 2) as f32),
            -((height / 2) as f32),
            -((depth / 2) as f32),
        ];

        for z in 0..dims[2] {
            for y in 0..dims[1] {
                for x in 0..dims[0] {
                    if solid(x, y, z) != Some(true) {
                        continue;
                    }
                    for (direction, corners) in &FACES {
                        let neighbour = solid(x + direction[0], y + direction[1], z + direction[2]);
                        if neighbour == Some(false) {
                            let base = [
                                origin[0] + x as f32,
                                origin[1] + y as f32,
                                origin[2] + z as f32,
                            ];
                            push_quad(&mut mesh, base, *direction, corners);
                        }
                    }
                }
            }
        }

        mesh
    }
}

fn push_quad(mesh: &mut MeshData, base: [f32; 3], direction: [i32; 3], corners: &[[f32; 3]; 4]) {
    let base_idx = mesh.positions.len() as u32;
    let normal = [direction[0] as f32, direction[1] as f32, direction[2] as f32];

    for corner in corners {
        mesh.positions
            .push([base[0] + corner[0], base[1] + corner[1], base[2] + corner[2]]);
        mesh.normals.push(normal);
    }

    mesh.indices
        .extend_from_slice(&[base_idx, base_idx + 1, base_idx + 2]);
    mesh.indices
        .extend_from_slice(&[base_idx, base_idx + 2, base_idx + 3]);
}

/// Extract the surface of a generated cave
pub fn extract_cave_mesh<E: SurfaceExtractor>(cave: &Cave, extractor: &E) -> MeshData {
    let (width, height, depth) = cave.grid().dimensions();
    extractor.extract(&cave.density_field(), width, height, depth)
}

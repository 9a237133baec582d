//! Spatial indexing for fast position-to-room lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;
#[cfg(feature = "spatial-index")]
use glam::Vec3;

/// Wrapper around KD-tree for spatial queries
///
/// Stores one point per voxel centre and maps each point to an owner id
/// (the room index when built by [`crate::Cave`]). Used by entity placement
/// to turn a world position into the room it lies in.
///
/// # Performance
///
/// - Construction: O(n log n) in the number of points
/// - Query: O(log n)
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f32, usize, 3, 32>,
    owners: Vec<usize>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build spatial index from voxel centres and their owners
    ///
    /// `owners[i]` is reported for `positions[i]`; both slices must have the
    /// same length.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voxel_caves::*;
    /// use glam::Vec3;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let positions = vec![
    ///     Vec3::new(0.5, 0.5, 0.5),
    ///     Vec3::new(1.5, 0.5, 0.5),
    ///     Vec3::new(8.5, 0.5, 0.5),
    /// ];
    ///
    /// let index = SpatialIndex::new(&positions, vec![0, 0, 1]);
    /// assert_eq!(index.find_nearest(Vec3::new(7.0, 0.0, 0.0)), 1);
    /// # }
    /// ```
    pub fn new(positions: &[Vec3], owners: Vec<usize>) -> Self {
        debug_assert_eq!(positions.len(), owners.len());

        // Convert Vec3 to [f32; 3] array format for kiddo
        let points: Vec<[f32; 3]> = positions.iter().map(|p| [p.x, p.y, p.z]).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
            owners,
        }
    }

    /// Find the owner of the point nearest to a position
    pub fn find_nearest(&self, position: Vec3) -> usize {
        let query = [position.x, position.y, position.z];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        self.owners[result.item as usize]
    }
}

#[cfg(test)]
#[cfg(feature = "spatial-index")]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_index_owners() {
        let positions = vec![
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(1.5, 0.5, 0.5),
            Vec3::new(0.5, 5.5, 0.5),
            Vec3::new(-4.5, 0.5, 0.5),
        ];

        let index = SpatialIndex::new(&positions, vec![7, 7, 3, 9]);

        assert_eq!(index.find_nearest(Vec3::new(1.2, 0.4, 0.5)), 7);
        assert_eq!(index.find_nearest(Vec3::new(0.0, 4.0, 0.0)), 3);
        assert_eq!(index.find_nearest(Vec3::new(-3.0, 0.0, 0.0)), 9);
    }

    #[test]
    fn test_spatial_index_exact_match() {
        let positions = vec![Vec3::new(2.5, 0.5, 0.5), Vec3::new(0.5, 2.5, 0.5)];
        let index = SpatialIndex::new(&positions, vec![0, 1]);

        assert_eq!(index.find_nearest(positions[0]), 0);
        assert_eq!(index.find_nearest(positions[1]), 1);
    }
}

//! Static collision world for the arena, built on Rapier3D.

use glam::DVec3;
use rapier3d::na::{Isometry3, Vector3};
use rapier3d::prelude::*;

use crate::collision::CollisionGroup;

/// Collision state for the arena. Only static colliders are stored; the
/// world is queried, never stepped.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Update query pipeline for raycasting. Call after adding or removing colliders.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Number of colliders in the world.
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Add an infinite ground plane (Y = `height` half-space) tagged with `groups`.
    pub fn add_ground_plane(&mut self, height: f64, groups: (Group, Group)) -> ColliderHandle {
        let collider = ColliderBuilder::halfspace(Vector::y_axis())
            .translation(vector![0.0, height as Real, 0.0])
            .collision_groups(CollisionGroup::interaction(groups))
            .build();
        self.collider_set.insert(collider)
    }

    /// Add a static cuboid collider (rocks, crates, rooftops). No parent body.
    /// `translation`: world position of center. `rotation_y_rad`: rotation around Y axis in radians.
    /// `half_extents`: half sizes in local X, Y, Z (after rotation).
    pub fn add_static_cuboid(
        &mut self,
        translation: DVec3,
        rotation_y_rad: f64,
        half_extents: DVec3,
        groups: (Group, Group),
    ) -> ColliderHandle {
        let tra = vector![translation.x as Real, translation.y as Real, translation.z as Real];
        let axisangle = Vector3::y_axis().into_inner() * (rotation_y_rad as Real);
        let position = Isometry3::new(tra, axisangle);
        let collider = ColliderBuilder::cuboid(
            half_extents.x as Real,
            half_extents.y as Real,
            half_extents.z as Real,
        )
        .position(position)
        .collision_groups(CollisionGroup::interaction(groups))
        .build();
        self.collider_set.insert(collider)
    }

    /// Add a heightfield collider matching a terrain heightmap.
    /// - `heights`: flat slice of height values in world Y, row-major order (index = z * ncols + x).
    /// - `nrows`, `ncols`: grid dimensions (must match terrain resolution).
    /// - `size_x`, `size_z`: total extent in world units (terrain spans -size/2 to +size/2 around the offset).
    /// Heights are used as-is (scale_y = 1), so they must already be in world space.
    #[allow(clippy::too_many_arguments)]
    pub fn add_terrain_heightfield(
        &mut self,
        heights: &[f32],
        nrows: usize,
        ncols: usize,
        size_x: f32,
        size_z: f32,
        offset_x: f32,
        offset_z: f32,
        groups: (Group, Group),
    ) -> Option<ColliderHandle> {
        if nrows < 2 || ncols < 2 || heights.len() < nrows * ncols {
            log::error!(
                "Heightfield rejected: {}x{} grid with {} heights",
                nrows,
                ncols,
                heights.len()
            );
            return None;
        }

        let heights_matrix = DMatrix::from_fn(nrows, ncols, |i, j| heights[i * ncols + j] as Real);
        let scale = vector![size_x, 1.0, size_z];

        let collider = ColliderBuilder::heightfield(heights_matrix, scale)
            .translation(vector![offset_x, 0.0, offset_z])
            .collision_groups(CollisionGroup::interaction(groups))
            .build();
        Some(self.collider_set.insert(collider))
    }
}

//! Raycasting for surface probes and queries.

use crate::PhysicsWorld;
use glam::DVec3;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point.
    pub distance: f64,
    /// World position of the hit.
    pub point: DVec3,
    /// Surface normal at the hit point.
    pub normal: DVec3,
}

impl PhysicsWorld {
    /// Cast a ray and return the first hit against any collider.
    pub fn raycast(&self, origin: DVec3, direction: DVec3, max_distance: f64) -> Option<RaycastHit> {
        self.raycast_filtered(origin, direction, max_distance, Group::ALL)
    }

    /// Cast a ray and return the first hit against colliders whose membership
    /// intersects `mask`.
    pub fn raycast_filtered(
        &self,
        origin: DVec3,
        direction: DVec3,
        max_distance: f64,
        mask: Group,
    ) -> Option<RaycastHit> {
        if mask.is_empty() || max_distance <= 0.0 {
            return None;
        }

        let ray = Ray::new(
            point![origin.x as Real, origin.y as Real, origin.z as Real],
            vector![direction.x as Real, direction.y as Real, direction.z as Real],
        );

        let filter = QueryFilter::default().groups(InteractionGroups::new(Group::ALL, mask));

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance as Real,
                true,
                filter,
            )
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                RaycastHit {
                    collider,
                    distance: intersection.time_of_impact as f64,
                    point: DVec3::new(point.x as f64, point.y as f64, point.z as f64),
                    normal: DVec3::new(
                        intersection.normal.x as f64,
                        intersection.normal.y as f64,
                        intersection.normal.z as f64,
                    ),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CollisionGroup;

    #[test]
    fn downward_ray_hits_ground_plane() {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane(2.0, CollisionGroup::walkable_ground());
        world.update_query_pipeline();

        let hit = world
            .raycast(DVec3::new(3.0, 50.0, -4.0), DVec3::NEG_Y, 100.0)
            .expect("ground below");
        assert!((hit.point.y - 2.0).abs() < 1e-3);
        assert!((hit.distance - 48.0).abs() < 1e-3);
        assert!(hit.normal.y > 0.99);
    }

    #[test]
    fn ray_shorter_than_gap_misses() {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane(0.0, CollisionGroup::walkable_ground());
        world.update_query_pipeline();

        assert!(world.raycast(DVec3::new(0.0, 50.0, 0.0), DVec3::NEG_Y, 10.0).is_none());
    }

    #[test]
    fn filtered_ray_skips_non_matching_colliders() {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane(0.0, CollisionGroup::walkable_ground());
        world.add_static_cuboid(
            DVec3::new(0.0, 5.0, 0.0),
            0.0,
            DVec3::new(2.0, 1.0, 2.0),
            CollisionGroup::solid_ground(),
        );
        world.update_query_pipeline();

        let origin = DVec3::new(0.0, 50.0, 0.0);
        let any = world.raycast(origin, DVec3::NEG_Y, 100.0).expect("rock");
        assert!((any.point.y - 6.0).abs() < 1e-3);

        let walkable = world
            .raycast_filtered(origin, DVec3::NEG_Y, 100.0, Group::from_bits_retain(CollisionGroup::Navigable as u32))
            .expect("plane under rock");
        assert!(walkable.point.y.abs() < 1e-3);
    }
}

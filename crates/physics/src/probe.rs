//! Downward-ray implementation of the surface placement contract.

use engine_core::{PlacementResult, SurfaceFilter, SurfaceProbe};
use glam::{DVec2, DVec3};

use crate::{CollisionGroup, PhysicsWorld};

/// Answers placement queries by casting a ray straight down through the
/// arena's static colliders.
pub struct RaycastProbe {
    world: PhysicsWorld,
    /// Height added above the hit point so spawned entities rest on the surface.
    clearance: f64,
}

impl RaycastProbe {
    /// Wrap a populated collision world. The query pipeline is refreshed here.
    pub fn new(mut world: PhysicsWorld, clearance: f64) -> Self {
        world.update_query_pipeline();
        Self { world, clearance }
    }

    pub fn clearance(&self) -> f64 {
        self.clearance
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }
}

impl SurfaceProbe for RaycastProbe {
    fn find_surface_point(
        &self,
        xz: DVec2,
        probe_height: f64,
        max_probe_distance: f64,
        filter: SurfaceFilter,
    ) -> PlacementResult {
        let origin = DVec3::new(xz.x, probe_height, xz.y);
        let mask = CollisionGroup::probe_mask(filter);
        match self.world.raycast_filtered(origin, DVec3::NEG_Y, max_probe_distance, mask) {
            Some(hit) => PlacementResult::Found(hit.point + DVec3::Y * self.clearance),
            None => PlacementResult::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> RaycastProbe {
        let mut world = PhysicsWorld::new();
        world.add_static_cuboid(
            DVec3::new(0.0, -1.0, 0.0),
            0.0,
            DVec3::new(50.0, 1.0, 50.0),
            CollisionGroup::walkable_ground(),
        );
        world.add_static_cuboid(
            DVec3::new(20.0, 3.0, 20.0),
            0.0,
            DVec3::new(2.0, 3.0, 2.0),
            CollisionGroup::solid_ground(),
        );
        RaycastProbe::new(world, 0.5)
    }

    #[test]
    fn hit_is_lifted_by_clearance() {
        let probe = arena();
        let result = probe.find_surface_point(DVec2::new(5.0, -5.0), 100.0, 200.0, SurfaceFilter::GROUND);
        let p = result.position().expect("terrain slab");
        assert!((p.y - 0.5).abs() < 1e-3);
        assert!((p.x - 5.0).abs() < 1e-9 && (p.z + 5.0).abs() < 1e-9);
    }

    #[test]
    fn outside_the_arena_is_not_found() {
        let probe = arena();
        let result = probe.find_surface_point(DVec2::new(80.0, 0.0), 100.0, 200.0, SurfaceFilter::GROUND);
        assert_eq!(result, PlacementResult::NotFound);
    }

    #[test]
    fn navigable_probe_sees_through_rocks() {
        let probe = arena();
        let on_rock = probe.find_surface_point(DVec2::new(20.0, 20.0), 100.0, 200.0, SurfaceFilter::GROUND);
        assert!((on_rock.position().unwrap().y - 6.5).abs() < 1e-3);

        let walkable = probe.find_surface_point(DVec2::new(20.0, 20.0), 100.0, 200.0, SurfaceFilter::NAVIGABLE);
        assert!((walkable.position().unwrap().y - 0.5).abs() < 1e-3);
    }

    #[test]
    fn short_probe_misses() {
        let probe = arena();
        let result = probe.find_surface_point(DVec2::ZERO, 100.0, 50.0, SurfaceFilter::GROUND);
        assert!(!result.is_found());
    }
}

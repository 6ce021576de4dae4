//! Static arena geometry and the placement backend built on it.

use engine_core::SurfaceProbe;
use glam::Vec2;
use physics::{CollisionGroup, PhysicsWorld, RaycastProbe};
use procgen::{NavGrid, NavGridProbe, TerrainConfig, TerrainData};

use crate::config::{vec3, ArenaConfig, PlacementBackend, PlacementConfig};

/// Generate the arena heightmap. Same config, same terrain.
pub fn generate_terrain(arena: &ArenaConfig) -> TerrainData {
    TerrainData::generate(TerrainConfig {
        size: arena.size,
        resolution: arena.resolution,
        height_scale: arena.height_scale,
        frequency: arena.frequency,
        octaves: arena.octaves,
        seed: arena.terrain_seed,
        ..Default::default()
    })
}

/// Build the configured surface probe over the arena.
pub fn build_probe(arena: &ArenaConfig, placement: &PlacementConfig) -> Box<dyn SurfaceProbe> {
    let terrain = generate_terrain(arena);
    match placement.backend {
        PlacementBackend::Raycast => Box::new(raycast_probe(&terrain, arena, placement.clearance)),
        PlacementBackend::NavGrid => Box::new(nav_grid_probe(&terrain, arena, placement)),
    }
}

/// Heightfield tagged walkable, obstacles tagged as plain ground.
pub fn raycast_probe(terrain: &TerrainData, arena: &ArenaConfig, clearance: f64) -> RaycastProbe {
    let mut world = PhysicsWorld::new();
    let res = terrain.resolution();
    let heightfield = world.add_terrain_heightfield(
        &terrain.heightmap,
        res,
        res,
        terrain.config.size,
        terrain.config.size,
        terrain.config.offset_x,
        terrain.config.offset_z,
        CollisionGroup::walkable_ground(),
    );
    if heightfield.is_none() {
        log::warn!("Arena has no terrain collider; only obstacles can be probed");
    }
    for obstacle in &arena.obstacles {
        world.add_static_cuboid(
            vec3(obstacle.center),
            0.0,
            vec3(obstacle.half_extents),
            CollisionGroup::solid_ground(),
        );
    }
    log::info!(
        "Raycast placement over {}x{} terrain, {} colliders",
        res,
        res,
        world.collider_count()
    );
    RaycastProbe::new(world, clearance)
}

/// Walkability grid with obstacle footprints blocked.
pub fn nav_grid_probe(terrain: &TerrainData, arena: &ArenaConfig, placement: &PlacementConfig) -> NavGridProbe {
    let mut grid = NavGrid::from_terrain(terrain, arena.max_slope_degrees);
    for obstacle in &arena.obstacles {
        let [cx, _, cz] = obstacle.center;
        let [hx, _, hz] = obstacle.half_extents;
        grid.block_rect(Vec2::new(cx as f32, cz as f32), Vec2::new(hx as f32, hz as f32).abs());
    }
    log::info!("Nav-grid placement over {}x{} cells", grid.width, grid.height);
    NavGridProbe::new(grid, placement.nav_snap_radius, placement.clearance)
}

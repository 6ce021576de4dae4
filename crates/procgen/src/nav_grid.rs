//! Walkability grid for pursuer placement.
//!
//! A coarse navmesh stand-in: each cell stores the terrain height and a cost
//! (255 = blocked). Cells steeper than the configured slope limit, or covered
//! by obstacles, are blocked. [`NavGridProbe`] samples it the way a navmesh
//! "sample position" query does: snap to the nearest walkable cell.

use engine_core::{DVec2, DVec3, PlacementResult, SurfaceFilter, SurfaceProbe};
use glam::{IVec2, Vec2};

use crate::terrain::TerrainData;

const BLOCKED: u8 = 255;

/// Height and walkability per terrain cell.
#[derive(Debug, Clone)]
pub struct NavGrid {
    /// Width of the grid.
    pub width: usize,
    /// Height of the grid.
    pub height: usize,
    /// Cell size in world units.
    pub cell_size: f32,
    /// World XZ of cell (0, 0)'s center.
    pub origin: Vec2,
    /// Cost field (1 = walkable, 255 = blocked).
    costs: Vec<u8>,
    /// Surface height per cell (world Y).
    heights: Vec<f32>,
}

impl NavGrid {
    /// Build a grid with one cell per terrain sample; cells steeper than
    /// `max_slope_degrees` are blocked.
    pub fn from_terrain(terrain: &TerrainData, max_slope_degrees: f32) -> Self {
        let res = terrain.resolution();
        let half = terrain.config.size / 2.0;
        let origin = Vec2::new(terrain.config.offset_x - half, terrain.config.offset_z - half);
        let mut costs = vec![1; res * res];
        let mut blocked = 0;
        for z in 0..res {
            for x in 0..res {
                if terrain.slope_degrees_at_sample(x, z) > max_slope_degrees {
                    costs[z * res + x] = BLOCKED;
                    blocked += 1;
                }
            }
        }
        log::debug!(
            "NavGrid {}x{}: {} of {} cells blocked by slope > {}°",
            res,
            res,
            blocked,
            res * res,
            max_slope_degrees
        );
        Self {
            width: res,
            height: res,
            cell_size: terrain.step(),
            origin,
            costs,
            heights: terrain.heightmap.clone(),
        }
    }

    /// A flat, fully walkable grid at `surface_y`.
    pub fn flat(width: usize, height: usize, cell_size: f32, origin: Vec2, surface_y: f32) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            cell_size,
            origin,
            costs: vec![1; size],
            heights: vec![surface_y; size],
        }
    }

    /// Set a cell as blocked (obstacle).
    pub fn set_blocked(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            self.costs[y * self.width + x] = BLOCKED;
        }
    }

    /// Block every cell whose center lies within the XZ rectangle.
    pub fn block_rect(&mut self, center: Vec2, half_extents: Vec2) {
        let min = self.world_to_grid_xz(center - half_extents);
        let max = self.world_to_grid_xz(center + half_extents);
        for y in min.y.max(0)..=max.y.min(self.height as i32 - 1) {
            for x in min.x.max(0)..=max.x.min(self.width as i32 - 1) {
                let c = self.grid_center(IVec2::new(x, y));
                if (c - center).abs().cmple(half_extents).all() {
                    self.set_blocked(x as usize, y as usize);
                }
            }
        }
    }

    /// Convert a world XZ position to (unclamped) grid coordinates.
    pub fn world_to_grid_xz(&self, xz: Vec2) -> IVec2 {
        let local = (xz - self.origin) / self.cell_size;
        IVec2::new(local.x.round() as i32, local.y.round() as i32)
    }

    /// World XZ of a cell center.
    pub fn grid_center(&self, cell: IVec2) -> Vec2 {
        self.origin + Vec2::new(cell.x as f32, cell.y as f32) * self.cell_size
    }

    fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height
    }

    /// Check if a grid cell is walkable.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(IVec2::new(x, y)) {
            return false;
        }
        self.costs[y as usize * self.width + x as usize] != BLOCKED
    }

    /// Surface height of a cell, if in bounds.
    pub fn surface_height(&self, cell: IVec2) -> Option<f32> {
        self.in_bounds(cell)
            .then(|| self.heights[cell.y as usize * self.width + cell.x as usize])
    }

    /// Nearest walkable cell to `xz` within `max_distance` (world units), searched
    /// in growing square rings around the containing cell.
    ///
    /// A ring-`r` cell is at least `(r - 0.5) * cell_size` from the query, so the
    /// search stops once no later ring can beat the best hit.
    pub fn nearest_walkable(&self, xz: Vec2, max_distance: f32) -> Option<IVec2> {
        if !(self.cell_size > 0.0 && max_distance >= 0.0 && max_distance.is_finite() && xz.is_finite()) {
            return None;
        }
        let center = self.world_to_grid_xz(xz);
        let (cx, cy) = (center.x as i64, center.y as i64);
        let (w, h) = (self.width as i64, self.height as i64);
        let gap = |c: i64, len: i64| if c < 0 { -c } else { (c - (len - 1)).max(0) };
        let first_ring = gap(cx, w).max(gap(cy, h));
        let last_cell_ring = cx.abs().max((cx - (w - 1)).abs()).max(cy.abs()).max((cy - (h - 1)).abs());
        let max_ring = ((max_distance / self.cell_size).ceil() as i64).min(last_cell_ring);

        let mut best: Option<(f32, IVec2)> = None;
        for ring in first_ring..=max_ring {
            for dy in -ring..=ring {
                for dx in -ring..=ring {
                    if dx.abs() != ring && dy.abs() != ring {
                        continue;
                    }
                    let (x, y) = (cx + dx, cy + dy);
                    if x < 0 || y < 0 || x >= w || y >= h {
                        continue;
                    }
                    let cell = IVec2::new(x as i32, y as i32);
                    if !self.is_walkable(cell.x, cell.y) {
                        continue;
                    }
                    let dist = self.grid_center(cell).distance(xz);
                    if dist <= max_distance && best.map_or(true, |(d, _)| dist < d) {
                        best = Some((dist, cell));
                    }
                }
            }
            if best.is_some_and(|(d, _)| d <= (ring as f32 + 0.5) * self.cell_size) {
                break;
            }
        }
        best.map(|(_, cell)| cell)
    }
}

/// Navmesh-style implementation of the surface placement contract.
pub struct NavGridProbe {
    grid: NavGrid,
    /// Horizontal search radius when snapping to a walkable cell.
    snap_radius: f64,
    /// Height added above the surface.
    clearance: f64,
}

impl NavGridProbe {
    pub fn new(grid: NavGrid, snap_radius: f64, clearance: f64) -> Self {
        Self {
            grid,
            snap_radius,
            clearance,
        }
    }

    pub fn grid(&self) -> &NavGrid {
        &self.grid
    }
}

impl SurfaceProbe for NavGridProbe {
    fn find_surface_point(
        &self,
        xz: DVec2,
        probe_height: f64,
        max_probe_distance: f64,
        filter: SurfaceFilter,
    ) -> PlacementResult {
        let query = xz.as_vec2();
        let cell = if filter.contains(SurfaceFilter::NAVIGABLE) {
            match self.grid.nearest_walkable(query, self.snap_radius as f32) {
                Some(cell) => cell,
                None => return PlacementResult::NotFound,
            }
        } else if filter.contains(SurfaceFilter::GROUND) {
            self.grid.world_to_grid_xz(query)
        } else {
            return PlacementResult::NotFound;
        };

        let Some(surface) = self.grid.surface_height(cell) else {
            return PlacementResult::NotFound;
        };
        let surface = surface as f64;
        let drop = probe_height - surface;
        if drop < 0.0 || drop > max_probe_distance {
            return PlacementResult::NotFound;
        }

        // Snapped cells report the cell center; direct ground hits keep the query XZ.
        let point_xz = if filter.contains(SurfaceFilter::NAVIGABLE) {
            self.grid.grid_center(cell).as_dvec2()
        } else {
            xz
        };
        PlacementResult::Found(DVec3::new(point_xz.x, surface + self.clearance, point_xz.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainConfig;

    fn flat_probe() -> NavGridProbe {
        // 21x21 cells of 1m centred on the origin.
        let grid = NavGrid::flat(21, 21, 1.0, Vec2::new(-10.0, -10.0), 2.0);
        NavGridProbe::new(grid, 3.0, 0.5)
    }

    #[test]
    fn ground_probe_keeps_query_position() {
        let probe = flat_probe();
        let p = probe
            .find_surface_point(DVec2::new(1.2, -3.4), 50.0, 100.0, SurfaceFilter::GROUND)
            .position()
            .unwrap();
        assert_eq!(p, DVec3::new(1.2, 2.5, -3.4));
    }

    #[test]
    fn out_of_bounds_is_not_found() {
        let probe = flat_probe();
        let r = probe.find_surface_point(DVec2::new(30.0, 0.0), 50.0, 100.0, SurfaceFilter::GROUND);
        assert_eq!(r, PlacementResult::NotFound);
    }

    #[test]
    fn probe_window_limits_reach() {
        let probe = flat_probe();
        let below = probe.find_surface_point(DVec2::ZERO, 1.0, 100.0, SurfaceFilter::GROUND);
        assert!(!below.is_found());
        let too_far = probe.find_surface_point(DVec2::ZERO, 50.0, 10.0, SurfaceFilter::GROUND);
        assert!(!too_far.is_found());
    }

    #[test]
    fn navigable_probe_snaps_around_blocked_cells() {
        let mut grid = NavGrid::flat(21, 21, 1.0, Vec2::new(-10.0, -10.0), 0.0);
        grid.block_rect(Vec2::ZERO, Vec2::splat(1.0));
        assert!(!grid.is_walkable(10, 10));
        assert!(!grid.is_walkable(11, 11));
        assert!(grid.is_walkable(12, 10));

        let probe = NavGridProbe::new(grid, 3.0, 0.0);
        let p = probe
            .find_surface_point(DVec2::ZERO, 50.0, 100.0, SurfaceFilter::NAVIGABLE)
            .position()
            .unwrap();
        let d = DVec2::new(p.x, p.z).length();
        assert!((d - 2.0).abs() < 1e-6, "snapped to first free ring, got {d}");
    }

    #[test]
    fn navigable_probe_fails_when_nothing_in_reach() {
        let mut grid = NavGrid::flat(21, 21, 1.0, Vec2::new(-10.0, -10.0), 0.0);
        grid.block_rect(Vec2::ZERO, Vec2::splat(5.0));
        let probe = NavGridProbe::new(grid, 3.0, 0.0);
        let r = probe.find_surface_point(DVec2::ZERO, 50.0, 100.0, SurfaceFilter::NAVIGABLE);
        assert_eq!(r, PlacementResult::NotFound);
    }

    #[test]
    fn nearest_walkable_prefers_euclidean_distance_over_ring() {
        let mut grid = NavGrid::flat(21, 21, 1.0, Vec2::new(-10.0, -10.0), 0.0);
        for y in 0..21 {
            for x in 0..21 {
                if (x, y) != (13, 13) && (x, y) != (14, 10) {
                    grid.set_blocked(x, y);
                }
            }
        }
        // (13, 13) is a ring-3 corner at ~4.24; (14, 10) is a ring-4 edge at 4.0.
        assert_eq!(grid.nearest_walkable(Vec2::ZERO, 5.0), Some(IVec2::new(14, 10)));
    }

    #[test]
    fn degenerate_cell_size_finds_nothing() {
        let grid = NavGrid::flat(4, 4, 0.0, Vec2::ZERO, 0.0);
        assert_eq!(grid.nearest_walkable(Vec2::new(1.0, 1.0), 4.0), None);
        let probe = NavGridProbe::new(grid, 4.0, 0.0);
        let r = probe.find_surface_point(DVec2::new(1.0, 1.0), 50.0, 100.0, SurfaceFilter::NAVIGABLE);
        assert_eq!(r, PlacementResult::NotFound);

        let grid = NavGrid::flat(4, 4, 1.0, Vec2::ZERO, 0.0);
        assert_eq!(grid.nearest_walkable(Vec2::ONE, f32::INFINITY), None);
    }

    #[test]
    fn steep_terrain_blocks_cells() {
        let terrain = TerrainData::generate(TerrainConfig {
            size: 64.0,
            resolution: 33,
            height_scale: 400.0,
            frequency: 0.2,
            seed: 3,
            ..Default::default()
        });
        let grid = NavGrid::from_terrain(&terrain, 10.0);
        let walkable = (0..33)
            .flat_map(|z| (0..33).map(move |x| (x, z)))
            .filter(|&(x, z)| grid.is_walkable(x, z))
            .count();
        assert!(walkable < 33 * 33);

        let flat = NavGrid::from_terrain(
            &TerrainData::generate(TerrainConfig {
                height_scale: 0.0,
                resolution: 9,
                size: 16.0,
                ..Default::default()
            }),
            10.0,
        );
        assert!(flat.is_walkable(4, 4));
        assert_eq!(flat.surface_height(IVec2::new(4, 4)), Some(0.0));
    }
}

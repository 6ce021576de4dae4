//! Surface placement contract.
//!
//! Spawners never talk to a physics engine or navigation mesh directly: they
//! ask a [`SurfaceProbe`] for a valid point on the ground at some XZ location.
//! The physics crate answers with a downward raycast, the procgen crate with
//! a navmesh-style grid sample.

use bitflags::bitflags;
use glam::{DVec2, DVec3};

bitflags! {
    /// Which surface categories a probe may land on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SurfaceFilter: u32 {
        /// Any solid ground (terrain, rocks, rooftops).
        const GROUND = 1 << 0;
        /// Ground that pursuers can walk on.
        const NAVIGABLE = 1 << 1;
    }
}

/// Outcome of a surface probe. Never partially valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementResult {
    /// Validated point, already lifted by the probe's clearance.
    Found(DVec3),
    /// No acceptable surface under the probe.
    NotFound,
}

impl PlacementResult {
    pub fn position(&self) -> Option<DVec3> {
        match self {
            PlacementResult::Found(p) => Some(*p),
            PlacementResult::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PlacementResult::Found(_))
    }
}

impl From<Option<DVec3>> for PlacementResult {
    fn from(value: Option<DVec3>) -> Self {
        match value {
            Some(p) => PlacementResult::Found(p),
            None => PlacementResult::NotFound,
        }
    }
}

/// Read-only query for a spawnable point on the ground.
///
/// Implementations do not retry; retry policy belongs to the caller.
pub trait SurfaceProbe {
    /// Probe downward from `probe_height` above `xz` for at most
    /// `max_probe_distance`, accepting only surfaces matching `filter`.
    fn find_surface_point(
        &self,
        xz: DVec2,
        probe_height: f64,
        max_probe_distance: f64,
        filter: SurfaceFilter,
    ) -> PlacementResult;
}

impl<T: SurfaceProbe + ?Sized> SurfaceProbe for Box<T> {
    fn find_surface_point(
        &self,
        xz: DVec2,
        probe_height: f64,
        max_probe_distance: f64,
        filter: SurfaceFilter,
    ) -> PlacementResult {
        (**self).find_surface_point(xz, probe_height, max_probe_distance, filter)
    }
}

impl<T: SurfaceProbe + ?Sized> SurfaceProbe for &T {
    fn find_surface_point(
        &self,
        xz: DVec2,
        probe_height: f64,
        max_probe_distance: f64,
        filter: SurfaceFilter,
    ) -> PlacementResult {
        (**self).find_surface_point(xz, probe_height, max_probe_distance, filter)
    }
}

//! Physics-backed collision queries using Rapier3D for Coin Chase.
//!
//! The arena's static geometry (terrain heightfield, ground planes, rocks)
//! lives in a [`PhysicsWorld`]; [`RaycastProbe`] answers surface placement
//! queries against it with filtered downward rays.

pub mod collision;
pub mod physics_world;
pub mod probe;
pub mod raycast;

pub use collision::*;
pub use physics_world::*;
pub use probe::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::{ColliderHandle, Group};

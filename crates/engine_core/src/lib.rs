//! Core engine types and utilities for Coin Chase.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform and spatial components
//! - Simulation time with a global time scale
//! - Common component types for ECS
//! - The surface placement contract shared by the probe backends
//! - Deferred single-shot tasks keyed by their owning entity

pub mod components;
pub mod placement;
pub mod schedule;
pub mod time;
pub mod transform;

pub use components::*;
pub use placement::*;
pub use schedule::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{DQuat, DVec2, DVec3};
pub use hecs::{Entity, World};

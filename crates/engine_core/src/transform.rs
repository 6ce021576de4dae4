//! Transform component and utilities for spatial positioning.

use glam::{DQuat, DVec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Rotate around the world Y axis (yaw).
    pub fn rotate_y(&mut self, angle: f64) {
        self.rotation = DQuat::from_rotation_y(angle) * self.rotation;
    }
}

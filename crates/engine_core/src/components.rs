//! Common ECS components used across the engine.

use glam::DVec3;

/// Velocity component for moving entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity {
    pub linear: DVec3,
    pub angular: DVec3,
}

impl Velocity {
    pub fn with_angular(linear: DVec3, angular: DVec3) -> Self {
        Self { linear, angular }
    }

    /// Stop all motion.
    pub fn clear(&mut self) {
        self.linear = DVec3::ZERO;
        self.angular = DVec3::ZERO;
    }

    pub fn is_at_rest(&self) -> bool {
        self.linear == DVec3::ZERO && self.angular == DVec3::ZERO
    }
}

/// Tag component for the player entity (the reference point for spawning).
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// Display name for spawned entities (e.g. "Enemy_1").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

/// Pursuit state for adversaries. Steering itself lives outside the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PursuitState {
    #[default]
    Idle,
    Chasing,
    Caught,
}

/// Component storing an adversary's bound pursuit target.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pursuer {
    pub state: PursuitState,
    pub target: Option<hecs::Entity>,
}

impl Pursuer {
    /// A pursuer already bound to its target.
    pub fn chasing(target: hecs::Entity) -> Self {
        Self {
            state: PursuitState::Chasing,
            target: Some(target),
        }
    }

    pub fn is_bound_to(&self, entity: hecs::Entity) -> bool {
        self.target == Some(entity)
    }
}

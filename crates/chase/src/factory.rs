//! Entity creation collaborator.
//!
//! The spawn policy decides *where* and *how many*; an [`EntityFactory`]
//! turns that decision into an entity. [`BundleFactory`] is the stock
//! implementation that builds hecs bundles.

use engine_core::{DVec3, Name, Pursuer, Transform, Velocity};
use hecs::{Entity, World};
use rand::prelude::*;

use crate::adversary::Adversary;
use crate::capture::CaptureDetector;
use crate::collectible::{Collectible, CollectibleBundle};
use crate::config::CoinConfig;

/// Opaque handle to a created entity. May be despawned at any time.
pub type SpawnedEntityRef = Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Collectible,
    Adversary,
}

/// Per-spawn configuration handed to the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnConfig {
    /// A pickup, optionally launched with an initial impulse.
    Collectible { apply_impulse: bool },
    /// A pursuer bound to `target`; `slot` is its deployment slot.
    Adversary { target: Entity, slot: u32 },
}

impl SpawnConfig {
    pub fn kind(&self) -> EntityKind {
        match self {
            SpawnConfig::Collectible { .. } => EntityKind::Collectible,
            SpawnConfig::Adversary { .. } => EntityKind::Adversary,
        }
    }
}

/// Creates entities at validated positions.
pub trait EntityFactory {
    fn spawn_entity(&mut self, world: &mut World, position: DVec3, config: SpawnConfig) -> SpawnedEntityRef;
}

/// Stock factory: coins with a random yaw, adversaries named `Enemy_N`.
pub struct BundleFactory {
    coin: CoinConfig,
    rng: StdRng,
}

impl BundleFactory {
    pub fn new(coin: CoinConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { coin, rng }
    }

    fn spawn_collectible(&mut self, world: &mut World, position: DVec3, apply_impulse: bool) -> Entity {
        let mut bundle = CollectibleBundle::new(
            position,
            Collectible {
                value: self.coin.value,
                exp_value: self.coin.exp_value,
                apply_spawn_force: apply_impulse,
            },
        );
        bundle
            .transform
            .rotate_y(self.rng.gen_range(0.0..360.0_f64).to_radians());

        if apply_impulse {
            // Upward-biased launch with a little spin.
            let direction = DVec3::new(self.rng.gen_range(-0.3..0.3), 1.0, self.rng.gen_range(-0.3..0.3));
            let spin = DVec3::new(
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
            ) * 2.0;
            bundle.velocity = Velocity::with_angular(direction.normalize() * self.coin.spawn_force, spin);
        }
        bundle.spawn(world)
    }
}

impl EntityFactory for BundleFactory {
    fn spawn_entity(&mut self, world: &mut World, position: DVec3, config: SpawnConfig) -> SpawnedEntityRef {
        match config {
            SpawnConfig::Collectible { apply_impulse } => self.spawn_collectible(world, position, apply_impulse),
            SpawnConfig::Adversary { target, slot } => world.spawn((
                Transform::from_position(position),
                Velocity::default(),
                Name(format!("Enemy_{}", slot + 1)),
                Adversary { slot },
                Pursuer::chasing(target),
                CaptureDetector::default(),
            )),
        }
    }
}

//! Coin collectibles: components, spawning bundle and pickup.

use engine_core::{DVec3, Scheduler, Transform, Velocity};
use hecs::{Entity, World};

/// A coin waiting to be picked up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collectible {
    /// Coins awarded on pickup.
    pub value: u32,
    /// Experience awarded on pickup.
    pub exp_value: u32,
    /// Whether the coin was launched with an initial impulse.
    pub apply_spawn_force: bool,
}

/// Deferred work owned by a collectible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectibleTask {
    /// Stop residual motion once the coin has come to rest.
    Settle,
}

/// What the player earned from one pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub entity: Entity,
    pub value: u32,
    pub exp_value: u32,
}

pub struct CollectibleBundle {
    pub transform: Transform,
    pub velocity: Velocity,
    pub collectible: Collectible,
}

impl CollectibleBundle {
    pub fn new(position: DVec3, collectible: Collectible) -> Self {
        Self {
            transform: Transform::from_position(position),
            velocity: Velocity::default(),
            collectible,
        }
    }

    /// Spawn into the ECS world.
    pub fn spawn(self, world: &mut World) -> Entity {
        world.spawn((self.transform, self.velocity, self.collectible))
    }
}

/// Despawn every collectible within `radius` of `player_pos` and cancel
/// its pending tasks.
pub fn collect_in_range(
    world: &mut World,
    scheduler: &mut Scheduler<CollectibleTask>,
    player_pos: DVec3,
    radius: f64,
) -> Vec<Pickup> {
    let picked: Vec<Pickup> = world
        .query::<(&Transform, &Collectible)>()
        .iter()
        .filter(|(_, (t, _))| t.position.distance(player_pos) <= radius)
        .map(|(entity, (_, c))| Pickup {
            entity,
            value: c.value,
            exp_value: c.exp_value,
        })
        .collect();

    for pickup in &picked {
        scheduler.cancel_owner(pickup.entity);
        if world.despawn(pickup.entity).is_err() {
            log::warn!("Collectible {:?} vanished during pickup", pickup.entity);
        }
        log::debug!(
            "Coin collected! +{} coins, +{} EXP",
            pickup.value,
            pickup.exp_value
        );
    }
    picked
}

/// Run a due task against its owner. Owners that no longer exist are skipped.
pub fn run_task(world: &mut World, owner: Entity, task: CollectibleTask) {
    match task {
        CollectibleTask::Settle => {
            if let Ok(mut velocity) = world.get::<&mut Velocity>(owner) {
                velocity.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(world: &mut World, position: DVec3, impulse: bool) -> Entity {
        CollectibleBundle::new(
            position,
            Collectible {
                value: 10,
                exp_value: 5,
                apply_spawn_force: impulse,
            },
        )
        .spawn(world)
    }

    #[test]
    fn pickup_despawns_and_cancels_tasks() {
        let mut world = World::new();
        let mut scheduler = Scheduler::new();
        let near = coin(&mut world, DVec3::new(1.0, 0.0, 0.0), true);
        let far = coin(&mut world, DVec3::new(10.0, 0.0, 0.0), true);
        scheduler.schedule(near, 1.0, CollectibleTask::Settle);
        scheduler.schedule(far, 1.0, CollectibleTask::Settle);

        let picked = collect_in_range(&mut world, &mut scheduler, DVec3::ZERO, 1.5);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].entity, near);
        assert_eq!(picked[0].value, 10);
        assert!(!world.contains(near));
        assert!(world.contains(far));
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn settle_clears_velocity() {
        let mut world = World::new();
        let e = coin(&mut world, DVec3::ZERO, true);
        world.get::<&mut Velocity>(e).unwrap().linear = DVec3::Y * 8.0;
        run_task(&mut world, e, CollectibleTask::Settle);
        assert!(world.get::<&Velocity>(e).unwrap().is_at_rest());
    }

    #[test]
    fn settle_on_missing_owner_is_ignored() {
        let mut world = World::new();
        let e = coin(&mut world, DVec3::ZERO, false);
        world.despawn(e).unwrap();
        run_task(&mut world, e, CollectibleTask::Settle);
    }
}

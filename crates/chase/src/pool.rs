//! Bounded bookkeeping of live spawned entities.
//!
//! The pool never owns entities (the hecs `World` does); it tracks handles,
//! prunes the ones that were despawned elsewhere (picked up, destroyed), and
//! hands out reservations so the population cap holds while a placement is
//! still being resolved.

use hecs::{Entity, World};

/// Upper bound on the up-front handle allocation; larger caps grow on demand.
const PREALLOCATED_HANDLES: u32 = 64;

/// Live handles for one entity category plus outstanding reservations.
///
/// Invariant: `live + reserved <= max_population` after every call.
#[derive(Debug, Clone)]
pub struct PopulationPool {
    live: Vec<Entity>,
    reserved: u32,
    max_population: u32,
}

impl PopulationPool {
    pub fn new(max_population: u32) -> Self {
        Self {
            live: Vec::with_capacity(max_population.min(PREALLOCATED_HANDLES) as usize),
            reserved: 0,
            max_population,
        }
    }

    /// Prune despawned handles, then reserve one slot if below the cap.
    ///
    /// Pruning always runs first so a reservation never sees a stale overcount.
    pub fn try_reserve(&mut self, world: &World) -> bool {
        self.prune(world);
        if self.live.len() as u32 + self.reserved < self.max_population {
            self.reserved += 1;
            true
        } else {
            false
        }
    }

    /// Turn one reservation into a live handle after a successful spawn.
    pub fn register(&mut self, entity: Entity) {
        if self.reserved == 0 {
            log::warn!("PopulationPool: register({:?}) without a reservation", entity);
        }
        self.reserved = self.reserved.saturating_sub(1);
        self.live.push(entity);
    }

    /// Give back a reservation whose placement failed.
    pub fn release(&mut self) {
        self.reserved = self.reserved.saturating_sub(1);
    }

    /// Pruned live count.
    pub fn count(&mut self, world: &World) -> u32 {
        self.prune(world);
        self.live.len() as u32
    }

    /// Drop handles whose entities no longer exist. Returns how many were removed.
    pub fn prune(&mut self, world: &World) -> usize {
        let before = self.live.len();
        self.live.retain(|&e| world.contains(e));
        before - self.live.len()
    }

    pub fn max_population(&self) -> u32 {
        self.max_population
    }

    pub fn reserved(&self) -> u32 {
        self.reserved
    }

    /// Handles as of the last prune.
    pub fn handles(&self) -> &[Entity] {
        &self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_at_capacity() {
        let mut world = World::new();
        let mut pool = PopulationPool::new(2);
        for _ in 0..2 {
            assert!(pool.try_reserve(&world));
            let e = world.spawn(());
            pool.register(e);
        }
        assert!(!pool.try_reserve(&world));
        assert_eq!(pool.count(&world), 2);
    }

    #[test]
    fn outstanding_reservations_count_against_the_cap() {
        let world = World::new();
        let mut pool = PopulationPool::new(2);
        assert!(pool.try_reserve(&world));
        assert!(pool.try_reserve(&world));
        assert!(!pool.try_reserve(&world));
        pool.release();
        assert!(pool.try_reserve(&world));
        assert_eq!(pool.reserved(), 2);
    }

    #[test]
    fn despawned_entities_free_their_slot_on_next_reservation() {
        let mut world = World::new();
        let mut pool = PopulationPool::new(1);
        assert!(pool.try_reserve(&world));
        let e = world.spawn(());
        pool.register(e);
        assert!(!pool.try_reserve(&world));

        world.despawn(e).unwrap();
        assert!(pool.try_reserve(&world));
        assert!(pool.handles().is_empty());
    }

    #[test]
    fn unbounded_cap_does_not_preallocate() {
        let mut world = World::new();
        let mut pool = PopulationPool::new(u32::MAX);
        assert!(pool.handles().is_empty());
        for _ in 0..100 {
            assert!(pool.try_reserve(&world));
            let e = world.spawn(());
            pool.register(e);
        }
        assert_eq!(pool.count(&world), 100);
        assert_eq!(pool.max_population(), u32::MAX);
    }

    #[test]
    fn release_without_reservation_is_harmless() {
        let mut world = World::new();
        let mut pool = PopulationPool::new(1);
        pool.release();
        assert_eq!(pool.reserved(), 0);
        assert!(pool.try_reserve(&world));
        let e = world.spawn(());
        pool.register(e);
        assert_eq!(pool.count(&world), 1);
    }
}

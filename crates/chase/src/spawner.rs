//! Collectible spawn policy.
//!
//! Four independent triggers feed one bounded population: the startup batch
//! on activation, zone bursts requested by [`crate::zone::ZoneTrigger`],
//! batches near the player after it has moved far enough, and a fixed-interval
//! respawn timer. They are evaluated once per tick in that order, so earlier
//! triggers consume pool capacity first.

use engine_core::{DVec2, DVec3, PlacementResult, SurfaceFilter, SurfaceProbe};
use hecs::{Entity, World};
use rand::prelude::*;

use crate::config::{vec3, CollectibleSpawnConfig};
use crate::error::SetupError;
use crate::factory::{EntityFactory, SpawnConfig};
use crate::pool::PopulationPool;
use crate::trigger::{DisplacementTracker, PeriodicTimer, TriggerState};

/// Attempts per requested success in the startup batch.
const STARTUP_ATTEMPT_FACTOR: u32 = 3;

/// One placement request: sample inside `search_radius` around `target_xz`,
/// probe down from `reference_y + raycast_height`, then lift the found
/// surface point by `vertical_offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub target_xz: DVec2,
    /// Height the probe window is anchored to.
    pub reference_y: f64,
    pub search_radius: f64,
    pub vertical_offset: f64,
}

/// Which trigger produced a spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnTrigger {
    Startup,
    ZoneBurst,
    Displacement,
    Periodic,
}

/// What one tick of the spawner did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnReport {
    /// Entities created this tick, tagged with their trigger.
    pub spawned: Vec<(SpawnTrigger, Entity)>,
    /// Placements where the probe found no surface.
    pub misses: u32,
    /// Placements refused because the pool was full.
    pub refused: u32,
}

impl SpawnReport {
    pub fn spawned_by(&self, trigger: SpawnTrigger) -> usize {
        self.spawned.iter().filter(|(t, _)| *t == trigger).count()
    }

    pub fn total_spawned(&self) -> usize {
        self.spawned.len()
    }

    /// Every entity created this tick.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.spawned.iter().map(|(_, e)| *e)
    }
}

/// Cumulative counters over the spawner's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnStats {
    pub spawned: u64,
    pub misses: u64,
    pub refused: u64,
    pub bursts_accepted: u64,
    pub bursts_dropped: u64,
    pub displacement_batches: u64,
    pub periodic_fires: u64,
}

enum Attempt {
    Spawned(Entity),
    Missed,
    Refused,
}

/// Manages the collectible population for one match.
pub struct CollectibleSpawner {
    config: CollectibleSpawnConfig,
    pool: PopulationPool,
    burst: TriggerState,
    periodic: PeriodicTimer,
    displacement: Option<DisplacementTracker>,
    pending_bursts: u32,
    /// Fixed after activation.
    center: DVec3,
    started: bool,
    halted: bool,
    factory: Option<Box<dyn EntityFactory>>,
    rng: StdRng,
    stats: SpawnStats,
}

impl CollectibleSpawner {
    /// Create an inactive spawner. It activates on its first tick.
    ///
    /// Without a factory nothing is ever spawned; the condition is logged once
    /// at activation.
    pub fn new(config: CollectibleSpawnConfig, factory: Option<Box<dyn EntityFactory>>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            pool: PopulationPool::new(config.max_population),
            burst: TriggerState::new(config.trigger_cooldown, config.trigger_spawning),
            periodic: PeriodicTimer::new(config.respawn_interval, 0.0, config.auto_respawn),
            displacement: None,
            pending_bursts: 0,
            center: DVec3::ZERO,
            started: false,
            halted: false,
            factory,
            rng,
            stats: SpawnStats::default(),
            config,
        }
    }

    /// Evaluate every trigger once, in precedence order.
    pub fn tick(
        &mut self,
        world: &mut World,
        probe: &dyn SurfaceProbe,
        reference: Option<DVec3>,
        now: f64,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();
        if self.halted {
            return report;
        }
        if !self.started {
            self.activate(reference);
            if self.factory.is_some() && self.config.spawn_on_start {
                self.run_startup(world, probe, &mut report);
            }
        }
        if self.factory.is_none() {
            return report;
        }

        self.run_zone_bursts(world, probe, reference, &mut report);
        self.run_displacement(world, probe, reference, &mut report);
        self.run_periodic(world, probe, reference, now, &mut report);

        self.stats.spawned += report.spawned.len() as u64;
        self.stats.misses += report.misses as u64;
        self.stats.refused += report.refused as u64;
        report
    }

    /// Ask for a burst near the reference point. Accepted requests are stamped
    /// now and run in the zone-burst slot of the next tick.
    pub fn request_burst(&mut self, now: f64) -> bool {
        if self.halted || !self.burst.try_fire(now) {
            return false;
        }
        self.pending_bursts += 1;
        self.stats.bursts_accepted += 1;
        log::debug!("Zone burst accepted at t={:.2}", now);
        true
    }

    /// Stop all further evaluation.
    pub fn halt(&mut self) {
        if !self.halted {
            log::info!("Collectible spawner halted");
        }
        self.halted = true;
        self.pending_bursts = 0;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Pruned number of live collectibles.
    pub fn active_count(&mut self, world: &World) -> u32 {
        self.pool.count(world)
    }

    pub fn max_population(&self) -> u32 {
        self.pool.max_population()
    }

    pub fn stats(&self) -> SpawnStats {
        self.stats
    }

    pub fn spawn_center(&self) -> DVec3 {
        self.center
    }

    pub fn next_periodic_fire_at(&self) -> f64 {
        self.periodic.next_fire_at
    }

    pub fn displacement_tracker(&self) -> Option<&DisplacementTracker> {
        self.displacement.as_ref()
    }

    pub fn pending_bursts(&self) -> u32 {
        self.pending_bursts
    }

    fn activate(&mut self, reference: Option<DVec3>) {
        self.started = true;
        self.center = self
            .config
            .center
            .map(vec3)
            .or(reference)
            .unwrap_or(DVec3::ZERO);

        if self.factory.is_none() {
            log::error!(
                "{}: collectible spawning disabled",
                SetupError::MissingCollaborator("entity factory")
            );
        }
        if self.config.spawn_near_player_movement {
            match reference {
                Some(start) => {
                    self.displacement = Some(DisplacementTracker::new(start, self.config.movement_threshold));
                }
                None => log::error!(
                    "{}: movement-triggered spawning disabled",
                    SetupError::MissingCollaborator("reference point")
                ),
            }
        }
        log::info!(
            "Collectible spawner active at ({:.1}, {:.1}, {:.1}), max {}",
            self.center.x,
            self.center.y,
            self.center.z,
            self.pool.max_population()
        );
    }

    fn run_startup(&mut self, world: &mut World, probe: &dyn SurfaceProbe, report: &mut SpawnReport) {
        let wanted = self.config.initial_count;
        let max_attempts = wanted.saturating_mul(STARTUP_ATTEMPT_FACTOR);
        let mut placed = 0;
        let mut attempts = 0;
        while placed < wanted && attempts < max_attempts {
            attempts += 1;
            let request = self.ring_request();
            match self.attempt(world, probe, request, self.config.impulse.startup) {
                Attempt::Spawned(e) => {
                    placed += 1;
                    report.spawned.push((SpawnTrigger::Startup, e));
                }
                Attempt::Missed => report.misses += 1,
                Attempt::Refused => {
                    report.refused += 1;
                    break;
                }
            }
        }
        log::info!("Startup batch: {}/{} coins in {} attempts", placed, wanted, attempts);
    }

    fn run_zone_bursts(
        &mut self,
        world: &mut World,
        probe: &dyn SurfaceProbe,
        reference: Option<DVec3>,
        report: &mut SpawnReport,
    ) {
        for _ in 0..std::mem::take(&mut self.pending_bursts) {
            let Some(at) = reference else {
                log::warn!("Zone burst dropped: no reference point");
                self.stats.bursts_dropped += 1;
                continue;
            };
            let request = self.near_request(at, self.config.trigger_radius);
            let impulse = self.config.impulse.zone_burst;
            self.run_batch(world, probe, request, self.config.coins_per_trigger, impulse, SpawnTrigger::ZoneBurst, report);
        }
    }

    fn run_displacement(
        &mut self,
        world: &mut World,
        probe: &dyn SurfaceProbe,
        reference: Option<DVec3>,
        report: &mut SpawnReport,
    ) {
        let (Some(tracker), Some(at)) = (self.displacement, reference) else {
            return;
        };
        if !tracker.exceeded(at) {
            return;
        }
        let count = self.rng.gen_range(3..6);
        log::debug!(
            "Player moved {:.1} units, spawning {} coins nearby",
            tracker.displacement(at),
            count
        );
        let request = self.near_request(at, self.config.movement_radius);
        let impulse = self.config.impulse.displacement;
        self.run_batch(world, probe, request, count, impulse, SpawnTrigger::Displacement, report);
        self.stats.displacement_batches += 1;
        if let Some(tracker) = self.displacement.as_mut() {
            tracker.record(at);
        }
    }

    fn run_periodic(
        &mut self,
        world: &mut World,
        probe: &dyn SurfaceProbe,
        reference: Option<DVec3>,
        now: f64,
        report: &mut SpawnReport,
    ) {
        if !self.periodic.try_fire(now) {
            return;
        }
        self.stats.periodic_fires += 1;
        let request = match reference {
            Some(at) => self.near_request(at, self.config.respawn_radius),
            None => self.ring_request(),
        };
        let impulse = self.config.impulse.periodic;
        self.run_batch(world, probe, request, 1, impulse, SpawnTrigger::Periodic, report);
    }

    fn run_batch(
        &mut self,
        world: &mut World,
        probe: &dyn SurfaceProbe,
        request: SpawnRequest,
        count: u32,
        apply_impulse: bool,
        trigger: SpawnTrigger,
        report: &mut SpawnReport,
    ) {
        for _ in 0..count {
            match self.attempt(world, probe, request, apply_impulse) {
                Attempt::Spawned(e) => report.spawned.push((trigger, e)),
                Attempt::Missed => report.misses += 1,
                Attempt::Refused => {
                    report.refused += 1;
                    break;
                }
            }
        }
    }

    /// Reserve, probe, spawn. A miss gives the reservation back.
    fn attempt(
        &mut self,
        world: &mut World,
        probe: &dyn SurfaceProbe,
        request: SpawnRequest,
        apply_impulse: bool,
    ) -> Attempt {
        let Some(factory) = self.factory.as_mut() else {
            return Attempt::Refused;
        };
        if !self.pool.try_reserve(world) {
            log::debug!(
                "Population full ({}/{}), skipping placement",
                self.pool.handles().len(),
                self.pool.max_population()
            );
            return Attempt::Refused;
        }

        let xz = request.target_xz + sample_in_disk(&mut self.rng, request.search_radius);
        let top = request.reference_y + self.config.raycast_height;
        match probe.find_surface_point(xz, top, self.config.raycast_height * 2.0, SurfaceFilter::GROUND) {
            PlacementResult::Found(point) => {
                let position = point + DVec3::Y * request.vertical_offset;
                let entity = factory.spawn_entity(world, position, SpawnConfig::Collectible { apply_impulse });
                self.pool.register(entity);
                Attempt::Spawned(entity)
            }
            PlacementResult::NotFound => {
                self.pool.release();
                log::warn!("No ground under ({:.1}, {:.1}), placement skipped", xz.x, xz.y);
                Attempt::Missed
            }
        }
    }

    /// A point on the startup ring around the spawn center.
    fn ring_request(&mut self) -> SpawnRequest {
        let angle = self.rng.gen_range(0.0..360.0_f64).to_radians();
        let radius = if self.config.max_radius > self.config.min_radius {
            self.rng.gen_range(self.config.min_radius..=self.config.max_radius)
        } else {
            self.config.min_radius
        };
        SpawnRequest {
            target_xz: DVec2::new(self.center.x, self.center.z) + DVec2::new(angle.cos(), angle.sin()) * radius,
            reference_y: self.center.y,
            search_radius: 0.0,
            vertical_offset: self.config.spawn_height_offset,
        }
    }

    fn near_request(&self, at: DVec3, radius: f64) -> SpawnRequest {
        SpawnRequest {
            target_xz: DVec2::new(at.x, at.z),
            reference_y: at.y,
            search_radius: radius,
            vertical_offset: self.config.spawn_height_offset,
        }
    }
}

/// Uniform sample inside a disk of `radius`.
fn sample_in_disk(rng: &mut StdRng, radius: f64) -> DVec2 {
    if radius <= 0.0 {
        return DVec2::ZERO;
    }
    let angle = rng.gen_range(0.0..std::f64::consts::TAU);
    let r = radius * rng.gen::<f64>().sqrt();
    DVec2::new(angle.cos(), angle.sin()) * r
}

//! One playable chase: world, clocks, spawning, zones and the match state.
//!
//! The session owns everything that a reset rebuilds ([`Scene`]) plus the
//! two collaborators that survive a reset: the read-only surface probe and
//! the presenter.

use engine_core::{DVec3, Name, Player, Scheduler, SurfaceProbe, Time, Transform};
use hecs::{Entity, World};

use crate::adversary::{deploy_adversaries, Adversary, DeploymentReport};
use crate::arena;
use crate::capture::detect_capture;
use crate::collectible::{collect_in_range, run_task, Collectible, CollectibleTask, Pickup};
use crate::config::{vec3, GameConfig};
use crate::error::SetupError;
use crate::factory::BundleFactory;
use crate::hud::{LogPresenter, MatchPresenter};
use crate::match_state::{MatchOutcome, MatchState, MatchStateMachine};
use crate::spawner::{CollectibleSpawner, SpawnReport};
use crate::zone::ZoneTrigger;

/// Seed offsets so the factories do not replay the spawner's draws.
const COIN_FACTORY_SEED: u64 = 0x9e37_79b9;
const ADVERSARY_FACTORY_SEED: u64 = 0x7f4a_7c15;

/// Everything one tick did.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Scaled delta applied this tick.
    pub dt: f64,
    /// Simulation time after the tick.
    pub now: f64,
    /// Burst requests accepted from zones.
    pub zone_requests: u32,
    pub spawn: SpawnReport,
    pub pickups: Vec<Pickup>,
    /// Deferred tasks run.
    pub tasks_run: usize,
    /// Adversary that caught the player this tick.
    pub caught_by: Option<Entity>,
    /// Set on the tick the match ended.
    pub outcome: Option<MatchOutcome>,
}

/// State rebuilt from configuration on every reset.
struct Scene {
    world: World,
    time: Time,
    player: Option<Entity>,
    spawner: CollectibleSpawner,
    zones: Vec<ZoneTrigger>,
    machine: MatchStateMachine,
    scheduler: Scheduler<CollectibleTask>,
    deployment: DeploymentReport,
}

impl Scene {
    fn build(config: &GameConfig, probe: &dyn SurfaceProbe, presenter: &mut dyn MatchPresenter) -> Self {
        let mut world = World::new();
        let player = config
            .player_start
            .map(|start| world.spawn((Player, Name("Player".into()), Transform::from_position(vec3(start)))));
        if player.is_none() {
            log::error!(
                "{}: no player_start configured, adversaries and movement spawns disabled",
                SetupError::MissingCollaborator("player")
            );
        }

        let coin_factory = BundleFactory::new(
            config.collectibles.coin.clone(),
            config.seed.map(|s| s.wrapping_add(COIN_FACTORY_SEED)),
        );
        let spawner = CollectibleSpawner::new(config.collectibles.clone(), Some(Box::new(coin_factory)), config.seed);
        let zones = config.zones.iter().map(ZoneTrigger::from_config).collect();

        let mut adversary_factory = BundleFactory::new(
            config.collectibles.coin.clone(),
            config.seed.map(|s| s.wrapping_add(ADVERSARY_FACTORY_SEED)),
        );
        let deployment = deploy_adversaries(&config.adversaries, &mut world, probe, Some(&mut adversary_factory), player);

        let mut time = Time::new();
        let mut machine = MatchStateMachine::new(&config.rules);
        machine.begin(&mut time, presenter);

        Self {
            world,
            time,
            player,
            spawner,
            zones,
            machine,
            scheduler: Scheduler::new(),
            deployment,
        }
    }
}

/// A running chase match.
pub struct ChaseSession<P: MatchPresenter = LogPresenter> {
    config: GameConfig,
    probe: Box<dyn SurfaceProbe>,
    presenter: P,
    scene: Scene,
    resets: u32,
}

impl<P: MatchPresenter> ChaseSession<P> {
    /// Start a match over an existing probe.
    pub fn new(config: GameConfig, probe: Box<dyn SurfaceProbe>, mut presenter: P) -> Self {
        let scene = Scene::build(&config, probe.as_ref(), &mut presenter);
        log::info!(
            "Chase started: {} adversaries, {} zones",
            scene.deployment.deployed_count(),
            scene.zones.len()
        );
        Self {
            config,
            probe,
            presenter,
            scene,
            resets: 0,
        }
    }

    /// Build the arena and its placement backend from `config`, then start.
    pub fn from_config(config: GameConfig, presenter: P) -> Self {
        let probe = arena::build_probe(&config.arena, &config.placement);
        Self::new(config, probe, presenter)
    }

    /// Advance one frame. `player_position` moves the player first, if given.
    pub fn tick(&mut self, real_dt: f64, player_position: Option<DVec3>) -> TickReport {
        let scene = &mut self.scene;
        let dt = scene.time.advance(real_dt);
        let now = scene.time.elapsed_seconds();
        let mut report = TickReport {
            dt,
            now,
            ..Default::default()
        };

        if let (Some(player), Some(position)) = (scene.player, player_position) {
            if let Ok(mut transform) = scene.world.get::<&mut Transform>(player) {
                transform.position = position;
            }
        }

        scene.machine.tick(dt, &mut self.presenter);
        if !scene.machine.is_active() {
            return report;
        }

        let reference = scene
            .player
            .and_then(|p| scene.world.get::<&Transform>(p).ok().map(|t| t.position));

        for zone in &mut scene.zones {
            if zone.update(reference, now, &mut scene.spawner) {
                report.zone_requests += 1;
            }
        }

        report.spawn = scene.spawner.tick(&mut scene.world, self.probe.as_ref(), reference, now);
        let settle_at = now + self.config.collectibles.coin.settle_delay;
        for entity in report.spawn.entities() {
            let launched = scene
                .world
                .get::<&Collectible>(entity)
                .map(|c| c.apply_spawn_force)
                .unwrap_or(false);
            if launched {
                scene.scheduler.schedule(entity, settle_at, CollectibleTask::Settle);
            }
        }

        if let Some(position) = reference {
            report.pickups = collect_in_range(
                &mut scene.world,
                &mut scene.scheduler,
                position,
                self.config.collectibles.coin.pickup_radius,
            );
            for pickup in &report.pickups {
                scene
                    .machine
                    .award_pickup(pickup.value, pickup.exp_value, &mut self.presenter);
            }
        }

        for (owner, task) in scene.scheduler.drain_due(now) {
            run_task(&mut scene.world, owner, task);
            report.tasks_run += 1;
        }

        if let Some(player) = scene.player {
            report.caught_by = detect_capture(&mut scene.world, player, self.config.adversaries.capture_radius);
            if report.caught_by.is_some() {
                report.outcome = self.on_player_contact();
            }
        }
        report
    }

    /// The player was caught. Ends the match and halts spawning; later calls
    /// return `None` and change nothing.
    pub fn on_player_contact(&mut self) -> Option<MatchOutcome> {
        let outcome = self
            .scene
            .machine
            .on_player_contact(&mut self.scene.time, &mut self.presenter)?;
        self.scene.spawner.halt();
        Some(outcome)
    }

    /// Discard the current match and rebuild it from configuration.
    pub fn reset(&mut self) {
        self.resets += 1;
        log::info!("Resetting chase (reset #{})", self.resets);
        self.scene = Scene::build(&self.config, self.probe.as_ref(), &mut self.presenter);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.scene.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.scene.world
    }

    pub fn time(&self) -> &Time {
        &self.scene.time
    }

    pub fn player(&self) -> Option<Entity> {
        self.scene.player
    }

    pub fn player_position(&self) -> Option<DVec3> {
        let player = self.scene.player?;
        self.scene.world.get::<&Transform>(player).ok().map(|t| t.position)
    }

    pub fn match_state(&self) -> MatchState {
        self.scene.machine.state()
    }

    pub fn machine(&self) -> &MatchStateMachine {
        &self.scene.machine
    }

    pub fn spawner(&self) -> &CollectibleSpawner {
        &self.scene.spawner
    }

    pub fn spawner_mut(&mut self) -> &mut CollectibleSpawner {
        &mut self.scene.spawner
    }

    pub fn zones(&self) -> &[ZoneTrigger] {
        &self.scene.zones
    }

    pub fn deployment(&self) -> &DeploymentReport {
        &self.scene.deployment
    }

    pub fn pending_tasks(&self) -> usize {
        self.scene.scheduler.len()
    }

    /// Live collectibles tracked by the spawner's pool.
    pub fn active_collectibles(&mut self) -> u32 {
        self.scene.spawner.active_count(&self.scene.world)
    }

    pub fn adversary_count(&self) -> usize {
        self.scene.world.query::<&Adversary>().iter().count()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn resets(&self) -> u32 {
        self.resets
    }
}

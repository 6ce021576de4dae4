//! Coin Chase gameplay core: collectible population, adversary deployment
//! and the match lifecycle.
//!
//! [`session::ChaseSession`] ties the pieces together; everything else can be
//! driven on its own against any [`engine_core::SurfaceProbe`].

pub mod adversary;
pub mod arena;
pub mod capture;
pub mod collectible;
pub mod config;
pub mod error;
pub mod factory;
pub mod hud;
pub mod match_state;
pub mod pool;
pub mod session;
pub mod spawner;
pub mod trigger;
pub mod zone;

pub use adversary::{deploy_adversaries, Adversary, DeploymentReport};
pub use config::GameConfig;
pub use error::{ConfigError, SetupError};
pub use factory::{BundleFactory, EntityFactory, EntityKind, SpawnConfig, SpawnedEntityRef};
pub use hud::{HudState, LogPresenter, MatchPresenter};
pub use match_state::{MatchOutcome, MatchState, MatchStateMachine, Scoreboard, SurvivalClock};
pub use session::{ChaseSession, TickReport};
pub use spawner::{CollectibleSpawner, SpawnReport, SpawnRequest, SpawnStats, SpawnTrigger};

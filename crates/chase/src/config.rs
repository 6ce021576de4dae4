//! Game configuration (arena, spawning, adversaries, zones). Loaded from config.ron at startup.

use std::path::{Path, PathBuf};

use engine_core::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// RNG seed for every spawn decision. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Where the player starts. `None` runs the session without a reference entity.
    #[serde(default = "default_player_start")]
    pub player_start: Option<[f64; 3]>,
    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
    #[serde(default)]
    pub collectibles: CollectibleSpawnConfig,
    #[serde(default)]
    pub adversaries: AdversarySpawnSpec,
    #[serde(default)]
    pub zones: Vec<ZoneConfig>,
    #[serde(default)]
    pub rules: MatchRules,
}

fn default_player_start() -> Option<[f64; 3]> {
    Some([0.0, 1.0, 0.0])
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            player_start: default_player_start(),
            arena: ArenaConfig::default(),
            placement: PlacementConfig::default(),
            collectibles: CollectibleSpawnConfig::default(),
            adversaries: AdversarySpawnSpec::default(),
            zones: Vec::new(),
            rules: MatchRules::default(),
        }
    }
}

/// Procedural arena terrain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Side length in world units (arena spans -size/2..size/2).
    pub size: f32,
    /// Height samples per side.
    pub resolution: u32,
    /// Maximum terrain height; 0 gives a flat arena.
    pub height_scale: f32,
    pub frequency: f64,
    pub octaves: u32,
    /// Terrain seed (independent from the spawn seed so resets replay the same arena).
    pub terrain_seed: u64,
    /// Cells steeper than this are not navigable.
    pub max_slope_degrees: f32,
    /// Static props. Pickups may land on them, pursuers may not.
    pub obstacles: Vec<ObstacleConfig>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            size: 200.0,
            resolution: 101,
            height_scale: 8.0,
            frequency: 0.015,
            octaves: 4,
            terrain_seed: 0,
            max_slope_degrees: 35.0,
            obstacles: Vec::new(),
        }
    }
}

/// Axis-aligned static box in the arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub center: [f64; 3],
    pub half_extents: [f64; 3],
}

/// Which surface probe implementation answers placement queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlacementBackend {
    /// Downward rays against rapier colliders.
    #[default]
    Raycast,
    /// Navmesh-style sampling of the walkability grid.
    NavGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub backend: PlacementBackend,
    /// Height the probe itself adds above any hit.
    pub clearance: f64,
    /// Horizontal snap radius for navigable grid samples.
    pub nav_snap_radius: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            backend: PlacementBackend::Raycast,
            clearance: 0.0,
            nav_snap_radius: 4.0,
        }
    }
}

/// Which triggers give freshly spawned collectibles an initial impulse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpulseFlags {
    pub startup: bool,
    pub zone_burst: bool,
    pub displacement: bool,
    pub periodic: bool,
}

/// Per-coin values and pickup behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinConfig {
    /// Coins awarded on pickup.
    pub value: u32,
    /// Experience awarded on pickup.
    pub exp_value: u32,
    /// Magnitude of the initial impulse when enabled.
    pub spawn_force: f64,
    /// Seconds after spawning before an impulsed coin settles.
    pub settle_delay: f64,
    /// Player distance at which a coin is collected.
    pub pickup_radius: f64,
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self {
            value: 10,
            exp_value: 5,
            spawn_force: 8.0,
            settle_delay: 1.0,
            pickup_radius: 1.5,
        }
    }
}

/// Collectible population policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleSpawnConfig {
    /// Run the startup batch on activation.
    pub spawn_on_start: bool,
    pub initial_count: u32,
    /// Fixed spawn center. `None` uses the player position at activation.
    pub center: Option<[f64; 3]>,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Probe start height above the reference Y; probes reach twice as far down.
    pub raycast_height: f64,
    /// Height above the found surface at which coins appear.
    pub spawn_height_offset: f64,
    pub max_population: u32,

    /// Zone bursts.
    pub trigger_spawning: bool,
    pub coins_per_trigger: u32,
    pub trigger_radius: f64,
    pub trigger_cooldown: f64,

    /// Periodic respawn.
    pub auto_respawn: bool,
    pub respawn_interval: f64,
    pub respawn_radius: f64,

    /// Player-displacement batches.
    pub spawn_near_player_movement: bool,
    pub movement_threshold: f64,
    pub movement_radius: f64,

    pub impulse: ImpulseFlags,
    pub coin: CoinConfig,
}

impl Default for CollectibleSpawnConfig {
    fn default() -> Self {
        Self {
            spawn_on_start: true,
            initial_count: 30,
            center: None,
            min_radius: 5.0,
            max_radius: 20.0,
            raycast_height: 100.0,
            spawn_height_offset: 0.5,
            max_population: 50,
            trigger_spawning: true,
            coins_per_trigger: 3,
            trigger_radius: 10.0,
            trigger_cooldown: 5.0,
            auto_respawn: true,
            respawn_interval: 10.0,
            respawn_radius: 20.0,
            spawn_near_player_movement: true,
            movement_threshold: 15.0,
            movement_radius: 15.0,
            impulse: ImpulseFlags::default(),
            coin: CoinConfig::default(),
        }
    }
}

/// One-shot adversary deployment around the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdversarySpawnSpec {
    pub count: u32,
    pub base_radius: f64,
    pub radius_growth_per_attempt: f64,
    pub angle_step_degrees: f64,
    pub max_attempts_per_slot: u32,
    /// Probe start height above the reference point.
    pub probe_height: f64,
    pub max_probe_distance: f64,
    /// Height above the navigable surface at which adversaries appear.
    pub spawn_height: f64,
    /// Distance at which an adversary catches the player.
    pub capture_radius: f64,
}

impl Default for AdversarySpawnSpec {
    fn default() -> Self {
        Self {
            count: 3,
            base_radius: 50.0,
            radius_growth_per_attempt: 5.0,
            angle_step_degrees: 36.0,
            max_attempts_per_slot: 10,
            probe_height: 100.0,
            max_probe_distance: 200.0,
            spawn_height: 1.0,
            capture_radius: 1.5,
        }
    }
}

/// Box volume that requests a collectible burst when the player walks in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub center: [f64; 3],
    pub half_extents: [f64; 3],
    /// Fire more than once (subject to cooldown).
    #[serde(default)]
    pub reusable: bool,
    #[serde(default = "default_zone_cooldown")]
    pub cooldown: f64,
}

fn default_zone_cooldown() -> f64 {
    10.0
}

/// Scoring rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// Experience needed per level.
    pub experience_per_level: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            experience_per_level: 100,
        }
    }
}

pub(crate) fn vec3(v: [f64; 3]) -> DVec3 {
    DVec3::from_array(v)
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&data)?;
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn from_ron(data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialize config: {}", e),
        }
    }

    /// Reject values the spawn policy cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.collectibles;
        if c.min_radius < 0.0 || c.min_radius > c.max_radius {
            return Err(ConfigError::Invalid(format!(
                "collectibles.min_radius ({}) must be within 0..=max_radius ({})",
                c.min_radius, c.max_radius
            )));
        }
        if c.auto_respawn && c.respawn_interval <= 0.0 {
            return Err(ConfigError::Invalid(
                "collectibles.respawn_interval must be positive".into(),
            ));
        }
        if c.spawn_near_player_movement && c.movement_threshold <= 0.0 {
            return Err(ConfigError::Invalid(
                "collectibles.movement_threshold must be positive".into(),
            ));
        }
        if c.raycast_height <= 0.0 {
            return Err(ConfigError::Invalid(
                "collectibles.raycast_height must be positive".into(),
            ));
        }
        let a = &self.adversaries;
        if a.count > 0 && a.max_attempts_per_slot == 0 {
            return Err(ConfigError::Invalid(
                "adversaries.max_attempts_per_slot must be at least 1".into(),
            ));
        }
        if self.zones.iter().any(|z| z.cooldown < 0.0) {
            return Err(ConfigError::Invalid("zone cooldown must not be negative".into()));
        }
        if !(self.arena.size.is_finite() && self.arena.size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "arena.size ({}) must be a positive number",
                self.arena.size
            )));
        }
        let snap = self.placement.nav_snap_radius;
        if !(snap.is_finite() && snap >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "placement.nav_snap_radius ({}) must be a non-negative number",
                snap
            )));
        }
        if self.arena.resolution < 2 {
            return Err(ConfigError::Invalid("arena.resolution must be at least 2".into()));
        }
        Ok(())
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

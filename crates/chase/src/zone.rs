//! Box volumes that request a collectible burst when the player walks in.

use engine_core::DVec3;

use crate::config::{vec3, ZoneConfig};
use crate::spawner::CollectibleSpawner;

/// Axis-aligned box volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneVolume {
    pub center: DVec3,
    pub half_extents: DVec3,
}

impl ZoneVolume {
    pub fn new(center: DVec3, half_extents: DVec3) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// Inclusive on the faces.
    pub fn contains_point(&self, point: DVec3) -> bool {
        let local = (point - self.center).abs();
        local.x <= self.half_extents.x && local.y <= self.half_extents.y && local.z <= self.half_extents.z
    }
}

/// One zone and its firing history.
#[derive(Debug, Clone)]
pub struct ZoneTrigger {
    pub volume: ZoneVolume,
    pub reusable: bool,
    pub cooldown: f64,
    has_fired_once: bool,
    last_fired_at: f64,
    player_inside: bool,
}

impl ZoneTrigger {
    pub fn new(volume: ZoneVolume, reusable: bool, cooldown: f64) -> Self {
        Self {
            volume,
            reusable,
            cooldown,
            has_fired_once: false,
            last_fired_at: f64::NEG_INFINITY,
            player_inside: false,
        }
    }

    pub fn from_config(config: &ZoneConfig) -> Self {
        Self::new(
            ZoneVolume::new(vec3(config.center), vec3(config.half_extents)),
            config.reusable,
            config.cooldown,
        )
    }

    /// Track the player against the volume and fire on the outside -> inside edge.
    ///
    /// Returns whether a burst was requested. A missing player counts as outside.
    pub fn update(&mut self, player: Option<DVec3>, now: f64, spawner: &mut CollectibleSpawner) -> bool {
        let inside = player.is_some_and(|p| self.volume.contains_point(p));
        let entered = inside && !self.player_inside;
        self.player_inside = inside;
        entered && self.on_player_enter(now, spawner)
    }

    /// Player entered the zone.
    pub fn on_player_enter(&mut self, now: f64, spawner: &mut CollectibleSpawner) -> bool {
        if !self.reusable && self.has_fired_once {
            return false;
        }
        if now - self.last_fired_at < self.cooldown {
            return false;
        }
        let accepted = spawner.request_burst(now);
        self.has_fired_once = true;
        self.last_fired_at = now;
        log::info!(
            "Coin trigger zone at ({:.1}, {:.1}, {:.1}) activated{}",
            self.volume.center.x,
            self.volume.center.y,
            self.volume.center.z,
            if accepted { "" } else { " (spawner busy)" }
        );
        accepted
    }

    pub fn has_fired_once(&self) -> bool {
        self.has_fired_once
    }

    pub fn last_fired_at(&self) -> f64 {
        self.last_fired_at
    }

    pub fn player_inside(&self) -> bool {
        self.player_inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectibleSpawnConfig;

    fn spawner() -> CollectibleSpawner {
        let config = CollectibleSpawnConfig {
            trigger_cooldown: 0.0,
            ..Default::default()
        };
        CollectibleSpawner::new(config, None, Some(1))
    }

    fn zone(reusable: bool, cooldown: f64) -> ZoneTrigger {
        ZoneTrigger::new(ZoneVolume::new(DVec3::ZERO, DVec3::splat(2.0)), reusable, cooldown)
    }

    #[test]
    fn box_contains_faces() {
        let v = ZoneVolume::new(DVec3::new(10.0, 0.0, 0.0), DVec3::new(1.0, 1.0, 1.0));
        assert!(v.contains_point(DVec3::new(11.0, 0.0, 0.0)));
        assert!(!v.contains_point(DVec3::new(11.01, 0.0, 0.0)));
        assert!(!v.contains_point(DVec3::ZERO));
    }

    #[test]
    fn single_use_zone_fires_once() {
        let mut s = spawner();
        let mut z = zone(false, 0.0);
        assert!(z.on_player_enter(0.0, &mut s));
        assert!(!z.on_player_enter(100.0, &mut s));
        assert!(z.has_fired_once());
    }

    #[test]
    fn reusable_zone_waits_for_cooldown() {
        let mut s = spawner();
        let mut z = zone(true, 10.0);
        assert!(z.on_player_enter(0.0, &mut s));
        assert!(!z.on_player_enter(9.99, &mut s));
        assert_eq!(z.last_fired_at(), 0.0);
        assert!(z.on_player_enter(10.0, &mut s));
        assert_eq!(z.last_fired_at(), 10.0);
    }

    #[test]
    fn only_the_entry_edge_fires() {
        let mut s = spawner();
        let mut z = zone(true, 0.0);
        let inside = Some(DVec3::new(1.0, 0.0, 1.0));
        let outside = Some(DVec3::new(5.0, 0.0, 0.0));

        assert!(!z.update(outside, 0.0, &mut s));
        assert!(z.update(inside, 1.0, &mut s));
        assert!(!z.update(inside, 2.0, &mut s));
        assert!(!z.update(outside, 3.0, &mut s));
        assert!(z.update(inside, 4.0, &mut s));
        assert!(!z.update(None, 5.0, &mut s));
        assert!(!z.player_inside());
    }

    #[test]
    fn refused_request_still_stamps_the_zone() {
        let mut s = spawner();
        s.halt();
        let mut z = zone(true, 10.0);
        assert!(!z.on_player_enter(0.0, &mut s));
        assert!(z.has_fired_once());
        assert_eq!(z.last_fired_at(), 0.0);
    }
}

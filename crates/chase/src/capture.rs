//! Adversary contact detection.
//!
//! Stands in for the collision plumbing: each adversary latches the first
//! time it reaches the player, is removed from the arena and raises the
//! contact signal the match state machine consumes.

use engine_core::{Pursuer, PursuitState, Transform};
use hecs::{Entity, World};

/// One-shot contact latch carried by every adversary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureDetector {
    pub has_collided: bool,
}

/// Find the first adversary within `capture_radius` of the player whose
/// detector has not latched yet, latch it and despawn it.
pub fn detect_capture(world: &mut World, player: Entity, capture_radius: f64) -> Option<Entity> {
    let player_pos = world.get::<&Transform>(player).ok()?.position;

    let catcher = world
        .query::<(&Transform, &CaptureDetector)>()
        .iter()
        .filter(|(e, (_, d))| *e != player && !d.has_collided)
        .find(|(_, (t, _))| t.position.distance(player_pos) <= capture_radius)
        .map(|(e, _)| e)?;

    if let Ok(mut detector) = world.get::<&mut CaptureDetector>(catcher) {
        detector.has_collided = true;
    }
    if let Ok(mut pursuer) = world.get::<&mut Pursuer>(catcher) {
        pursuer.state = PursuitState::Caught;
    }
    log::info!("Player caught by {:?}", catcher);
    if world.despawn(catcher).is_err() {
        log::warn!("Adversary {:?} vanished while latching capture", catcher);
    }
    Some(catcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{DVec3, Player};

    #[test]
    fn only_adversaries_in_range_capture() {
        let mut world = World::new();
        let player = world.spawn((Player, Transform::from_position(DVec3::ZERO)));
        let far = world.spawn((
            Transform::from_position(DVec3::new(10.0, 0.0, 0.0)),
            CaptureDetector::default(),
        ));
        assert_eq!(detect_capture(&mut world, player, 1.5), None);

        let near = world.spawn((
            Transform::from_position(DVec3::new(1.0, 0.0, 0.0)),
            CaptureDetector::default(),
        ));
        assert_eq!(detect_capture(&mut world, player, 1.5), Some(near));
        assert!(!world.contains(near));
        assert!(world.contains(far));
    }

    #[test]
    fn latched_detectors_are_ignored() {
        let mut world = World::new();
        let player = world.spawn((Player, Transform::from_position(DVec3::ZERO)));
        world.spawn((
            Transform::from_position(DVec3::ZERO),
            CaptureDetector { has_collided: true },
        ));
        assert_eq!(detect_capture(&mut world, player, 1.5), None);
    }

    #[test]
    fn missing_player_never_captures() {
        let mut world = World::new();
        let player = world.spawn(());
        world.despawn(player).unwrap();
        world.spawn((Transform::default(), CaptureDetector::default()));
        assert_eq!(detect_capture(&mut world, player, 1.5), None);
    }
}

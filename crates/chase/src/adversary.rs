//! Adversary deployment around the player at match start.

use engine_core::{DVec2, DVec3, PlacementResult, SurfaceFilter, SurfaceProbe, Transform};
use hecs::{Entity, World};

use crate::config::AdversarySpawnSpec;
use crate::error::SetupError;
use crate::factory::{EntityFactory, SpawnConfig};

/// Marks an adversary and remembers its deployment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adversary {
    pub slot: u32,
}

/// Result of a deployment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentReport {
    pub deployed: Vec<Entity>,
    /// Slots where every attempt missed.
    pub skipped_slots: Vec<u32>,
}

impl DeploymentReport {
    pub fn deployed_count(&self) -> usize {
        self.deployed.len()
    }
}

/// Candidate probe point for `slot` on attempt `attempt`.
///
/// Slots are spread evenly around the reference; each retry rotates by
/// `angle_step_degrees` and pushes out by `radius_growth_per_attempt`.
pub fn candidate_xz(spec: &AdversarySpawnSpec, reference: DVec3, slot: u32, attempt: u32) -> DVec2 {
    let count = spec.count.max(1) as f64;
    let azimuth = (360.0 / count * slot as f64 + spec.angle_step_degrees * attempt as f64).to_radians();
    let radius = spec.base_radius + spec.radius_growth_per_attempt * attempt as f64;
    DVec2::new(reference.x + azimuth.cos() * radius, reference.z + azimuth.sin() * radius)
}

/// Place up to `spec.count` adversaries on navigable ground around `target`.
///
/// Each slot gets `max_attempts_per_slot` probes; a slot that never finds
/// ground is logged and skipped. Deployed adversaries are bound to `target`.
pub fn deploy_adversaries(
    spec: &AdversarySpawnSpec,
    world: &mut World,
    probe: &dyn SurfaceProbe,
    factory: Option<&mut dyn EntityFactory>,
    target: Option<Entity>,
) -> DeploymentReport {
    let mut report = DeploymentReport::default();
    if spec.count == 0 {
        return report;
    }
    let Some(factory) = factory else {
        log::error!("{}: no adversaries deployed", SetupError::MissingCollaborator("entity factory"));
        return report;
    };
    let Some((target, reference)) = target.and_then(|e| {
        let position = world.get::<&Transform>(e).ok()?.position;
        Some((e, position))
    }) else {
        log::error!("{}: no adversaries deployed", SetupError::MissingCollaborator("reference point"));
        return report;
    };

    for slot in 0..spec.count {
        let found = (0..spec.max_attempts_per_slot).find_map(|attempt| {
            let xz = candidate_xz(spec, reference, slot, attempt);
            let top = reference.y + spec.probe_height;
            match probe.find_surface_point(xz, top, spec.max_probe_distance, SurfaceFilter::NAVIGABLE) {
                PlacementResult::Found(point) => Some(point),
                PlacementResult::NotFound => None,
            }
        });

        match found {
            Some(point) => {
                let position = point + DVec3::Y * spec.spawn_height;
                let entity = factory.spawn_entity(world, position, SpawnConfig::Adversary { target, slot });
                log::debug!(
                    "Enemy_{} deployed at ({:.1}, {:.1}, {:.1})",
                    slot + 1,
                    position.x,
                    position.y,
                    position.z
                );
                report.deployed.push(entity);
            }
            None => {
                log::warn!(
                    "Could not find navigable ground for Enemy_{} after {} attempts",
                    slot + 1,
                    spec.max_attempts_per_slot
                );
                report.skipped_slots.push(slot);
            }
        }
    }
    log::info!("Deployed {}/{} adversaries", report.deployed.len(), spec.count);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoinConfig;
    use crate::factory::BundleFactory;
    use engine_core::{Name, Player, Pursuer};

    /// Ground everywhere, but only navigable east of `x = min_x`.
    struct HalfNavigable {
        min_x: f64,
    }

    impl SurfaceProbe for HalfNavigable {
        fn find_surface_point(&self, xz: DVec2, _: f64, _: f64, filter: SurfaceFilter) -> PlacementResult {
            if filter.contains(SurfaceFilter::NAVIGABLE) && xz.x < self.min_x {
                PlacementResult::NotFound
            } else {
                PlacementResult::Found(DVec3::new(xz.x, 0.0, xz.y))
            }
        }
    }

    fn setup() -> (World, Entity, BundleFactory) {
        let mut world = World::new();
        let player = world.spawn((Player, Transform::from_position(DVec3::new(0.0, 1.0, 0.0))));
        (world, player, BundleFactory::new(CoinConfig::default(), Some(5)))
    }

    #[test]
    fn first_attempt_spreads_slots_evenly() {
        let spec = AdversarySpawnSpec {
            count: 4,
            ..Default::default()
        };
        let a = candidate_xz(&spec, DVec3::ZERO, 1, 0);
        assert!(a.x.abs() < 1e-9);
        assert!((a.y - 50.0).abs() < 1e-9);

        let retry = candidate_xz(&spec, DVec3::ZERO, 0, 2);
        assert!((retry.length() - 60.0).abs() < 1e-9);
        let angle = retry.y.atan2(retry.x).to_degrees();
        assert!((angle - 72.0).abs() < 1e-9);
    }

    #[test]
    fn every_slot_deploys_on_open_ground() {
        let (mut world, player, mut factory) = setup();
        let spec = AdversarySpawnSpec::default();
        let probe = HalfNavigable { min_x: f64::NEG_INFINITY };
        let report = deploy_adversaries(&spec, &mut world, &probe, Some(&mut factory), Some(player));

        assert_eq!(report.deployed_count(), 3);
        assert!(report.skipped_slots.is_empty());
        for (i, e) in report.deployed.iter().enumerate() {
            assert!(world.get::<&Pursuer>(*e).unwrap().is_bound_to(player));
            assert_eq!(world.get::<&Name>(*e).unwrap().0, format!("Enemy_{}", i + 1));
            let p = world.get::<&Transform>(*e).unwrap().position;
            assert!((p.y - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn probes_start_above_a_raised_player() {
        struct Mesa;
        impl SurfaceProbe for Mesa {
            fn find_surface_point(&self, xz: DVec2, top: f64, reach: f64, _: SurfaceFilter) -> PlacementResult {
                if top >= 300.0 && top - reach <= 300.0 {
                    PlacementResult::Found(DVec3::new(xz.x, 300.0, xz.y))
                } else {
                    PlacementResult::NotFound
                }
            }
        }
        let mut world = World::new();
        let player = world.spawn((Player, Transform::from_position(DVec3::new(0.0, 301.0, 0.0))));
        let mut factory = BundleFactory::new(CoinConfig::default(), Some(5));
        let report = deploy_adversaries(&AdversarySpawnSpec::default(), &mut world, &Mesa, Some(&mut factory), Some(player));

        assert_eq!(report.deployed_count(), 3);
        for e in &report.deployed {
            assert!((world.get::<&Transform>(*e).unwrap().position.y - 301.0).abs() < 1e-9);
        }
    }

    #[test]
    fn exhausted_slots_are_skipped() {
        let (mut world, player, mut factory) = setup();
        // One attempt per slot, no rotation: slots facing west never land.
        let spec = AdversarySpawnSpec {
            count: 4,
            max_attempts_per_slot: 1,
            ..Default::default()
        };
        let probe = HalfNavigable { min_x: 1.0 };
        let report = deploy_adversaries(&spec, &mut world, &probe, Some(&mut factory), Some(player));

        assert_eq!(report.deployed_count(), 1);
        assert_eq!(report.skipped_slots, vec![1, 2, 3]);
    }

    #[test]
    fn retries_rotate_into_valid_ground() {
        let (mut world, player, mut factory) = setup();
        let spec = AdversarySpawnSpec {
            count: 1,
            angle_step_degrees: 90.0,
            ..Default::default()
        };
        // Slot 0 starts facing east; block east so the retries have to rotate.
        struct WestOnly;
        impl SurfaceProbe for WestOnly {
            fn find_surface_point(&self, xz: DVec2, _: f64, _: f64, _: SurfaceFilter) -> PlacementResult {
                if xz.x < -1.0 {
                    PlacementResult::Found(DVec3::new(xz.x, 0.0, xz.y))
                } else {
                    PlacementResult::NotFound
                }
            }
        }
        let report = deploy_adversaries(&spec, &mut world, &WestOnly, Some(&mut factory), Some(player));
        assert_eq!(report.deployed_count(), 1);
        let p = world.get::<&Transform>(report.deployed[0]).unwrap().position;
        // Third attempt: 180 degrees, radius 60.
        assert!((p.x + 60.0).abs() < 1e-9);
    }

    #[test]
    fn zero_count_or_missing_collaborators_deploy_nothing() {
        let (mut world, player, mut factory) = setup();
        let probe = HalfNavigable { min_x: f64::NEG_INFINITY };
        let none = AdversarySpawnSpec {
            count: 0,
            ..Default::default()
        };
        assert_eq!(deploy_adversaries(&none, &mut world, &probe, Some(&mut factory), Some(player)).deployed_count(), 0);

        let spec = AdversarySpawnSpec::default();
        assert_eq!(deploy_adversaries(&spec, &mut world, &probe, None, Some(player)).deployed_count(), 0);
        assert_eq!(deploy_adversaries(&spec, &mut world, &probe, Some(&mut factory), None).deployed_count(), 0);
        assert_eq!(world.len(), 1);
    }
}

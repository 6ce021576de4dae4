//! Collision groups and filtering.

use engine_core::SurfaceFilter;
use rapier3d::prelude::*;

/// Collision groups for different collider categories.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Solid static ground (terrain, rocks, rooftops)
    Ground = 1 << 0,
    /// Ground pursuers can walk on
    Navigable = 1 << 1,
    /// Player character
    Player = 1 << 2,
    /// Pursuing adversaries
    Adversary = 1 << 3,
    /// Coins and other pickups
    Collectible = 1 << 4,
    /// Triggers and sensors
    Trigger = 1 << 5,
}

impl CollisionGroup {
    /// Create a collision group that collides with everything.
    pub fn all() -> Group {
        Group::ALL
    }

    /// Walkable terrain: ground that is also navigable.
    pub fn walkable_ground() -> (Group, Group) {
        let membership =
            Group::from_bits_retain(Self::Ground as u32 | Self::Navigable as u32);
        (membership, Group::ALL)
    }

    /// Ground that can hold a pickup but not a pursuer (steep rocks, props).
    pub fn solid_ground() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Ground as u32);
        (membership, Group::ALL)
    }

    /// Build interaction groups from a `(membership, filter)` pair.
    pub fn interaction((membership, filter): (Group, Group)) -> InteractionGroups {
        InteractionGroups::new(membership, filter)
    }

    /// Mask of collider memberships a probe with `filter` may hit.
    pub fn probe_mask(filter: SurfaceFilter) -> Group {
        let mut bits = 0;
        if filter.contains(SurfaceFilter::GROUND) {
            bits |= Self::Ground as u32;
        }
        if filter.contains(SurfaceFilter::NAVIGABLE) {
            bits |= Self::Navigable as u32;
        }
        Group::from_bits_retain(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigable_filter_excludes_plain_ground() {
        let mask = CollisionGroup::probe_mask(SurfaceFilter::NAVIGABLE);
        let (solid, _) = CollisionGroup::solid_ground();
        let (walkable, _) = CollisionGroup::walkable_ground();
        assert!(!mask.intersects(solid));
        assert!(mask.intersects(walkable));
    }

    #[test]
    fn ground_filter_hits_both_kinds() {
        let mask = CollisionGroup::probe_mask(SurfaceFilter::GROUND);
        let (solid, _) = CollisionGroup::solid_ground();
        let (walkable, _) = CollisionGroup::walkable_ground();
        assert!(mask.intersects(solid));
        assert!(mask.intersects(walkable));
    }
}

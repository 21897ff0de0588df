//! Collision detection between the player and slot contents
//!
//! Every hazard and pickup is boxed by the world-space AABB of its placed
//! shape. Hidden slots never collide; collected pickups never collide again
//! until the group recycles.

use glam::{Quat, Vec3};

use super::bounds::Aabb;
use super::patterns::{CoinLibrary, ObstacleLibrary, ShapeTemplate};
use super::slots::{CoinSlot, ObstacleSlots};

/// A hazard the player overlapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardHit {
    /// Obstacle slot (0 or 1)
    pub slot: usize,
    /// Shape index within the held pattern
    pub shape: usize,
}

/// World bounds of `shape` placed in a container at `origin` with `rotation`
pub fn shape_bounds(origin: Vec3, rotation: Quat, shape: &ShapeTemplate) -> Aabb {
    let center = origin + rotation * shape.offset;
    Aabb::from_transform(center, shape.half_extents(), rotation)
}

/// Every visible hazard overlapping `player`
pub fn hazard_hits(player: &Aabb, slots: &ObstacleSlots, library: &ObstacleLibrary) -> Vec<HazardHit> {
    let mut hits = Vec::new();
    for (index, slot) in slots.slots.iter().enumerate() {
        if !slot.visible {
            continue;
        }
        let Some(pattern) = library.get(slot.pattern) else {
            continue;
        };
        let rotation = slot.rotation();
        for (shape, template) in pattern.hazards.iter().enumerate() {
            if shape_bounds(slot.position, rotation, template).intersects(player) {
                hits.push(HazardHit { slot: index, shape });
            }
        }
    }
    hits
}

/// Hide every still-visible pickup overlapping `player`
///
/// Returns the indices collected this call; each pickup is reported at
/// most once per pass of the group.
pub fn collect_coins(player: &Aabb, slot: &mut CoinSlot, library: &CoinLibrary) -> Vec<usize> {
    if !slot.visible {
        return Vec::new();
    }
    let Some(pattern) = library.get(slot.pattern) else {
        return Vec::new();
    };

    let origin = slot.position;
    let mut collected = Vec::new();
    for (index, template) in pattern.pickups.iter().enumerate() {
        if !slot.pickup_visible(index) {
            continue;
        }
        if shape_bounds(origin, Quat::IDENTITY, template).intersects(player) && slot.mark_collected(index) {
            collected.push(index);
        }
    }
    collected
}

//! Obstacle and coin slots
//!
//! A slot is a reusable position/visibility holder bound to one pattern at
//! a time. Only the slot managers here reassign patterns; only the
//! collision resolver marks pickups collected.

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::patterns::{CoinLibrary, ObstacleLibrary};
use super::recycle::{Placeable, has_passed, relocate, scroll};
use crate::consts::*;

/// One live obstacle pattern instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSlot {
    /// Index into the obstacle library
    pub pattern: usize,
    /// Container position; X carries the drift of a moving pattern
    pub position: Vec3,
    /// Wobble about the X axis (radians)
    pub rotation_x: f32,
    pub visible: bool,
}

impl ObstacleSlot {
    fn hidden(pattern: usize, z: f32) -> Self {
        Self {
            pattern,
            position: Vec3::new(0.0, 0.0, z),
            rotation_x: 0.0,
            visible: false,
        }
    }

    /// Container rotation as a quaternion
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_x(self.rotation_x)
    }
}

impl Placeable for ObstacleSlot {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// The two staggered obstacle slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSlots {
    pub slots: [ObstacleSlot; 2],
}

impl ObstacleSlots {
    /// Two hidden slots far behind the scene holding different patterns
    pub fn new<R: Rng + ?Sized>(library: &ObstacleLibrary, rng: &mut R) -> Self {
        let first = library.pick(rng);
        let second = library.pick_excluding(rng, &[first]).unwrap_or(first);
        Self {
            slots: [
                ObstacleSlot::hidden(first, OBSTACLE_SPAWN_Z),
                ObstacleSlot::hidden(second, OBSTACLE_SPAWN_Z - OBSTACLE_SPACING),
            ],
        }
    }

    /// Pattern indices held by slot one and slot two
    pub fn patterns(&self) -> [usize; 2] {
        [self.slots[0].pattern, self.slots[1].pattern]
    }

    /// Reveal, scroll and recycle both slots
    ///
    /// Returns, per slot, the newly assigned pattern if the slot recycled.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        distance: f32,
        library: &ObstacleLibrary,
        rng: &mut R,
    ) -> [Option<usize>; 2] {
        if !self.slots[0].visible {
            self.slots[0].visible = true;
        }
        if !self.slots[1].visible {
            // Slot two always re-enters one spacing behind slot one
            self.slots[1].visible = true;
            self.slots[1].position.z = self.slots[0].position.z - OBSTACLE_SPACING;
        }

        for slot in &mut self.slots {
            scroll(slot, distance);
            if library.get(slot.pattern).is_some_and(|p| p.oscillates) {
                let phase = (slot.position.z / DRIFT_PERIOD).sin();
                slot.position.x = DRIFT_AMPLITUDE * phase;
                slot.rotation_x = WOBBLE_AMPLITUDE * phase;
            }
        }

        let mut recycled = [None, None];
        if has_passed(&self.slots[0], OBSTACLE_RECYCLE_Z) {
            relocate(&mut self.slots[0], OBSTACLE_SPAWN_Z);
            recycled[0] = Some(self.reassign(0, library, rng));
        }
        if has_passed(&self.slots[1], OBSTACLE_RECYCLE_Z) {
            let behind = self.slots[0].position.z - OBSTACLE_SPACING;
            relocate(&mut self.slots[1], behind);
            recycled[1] = Some(self.reassign(1, library, rng));
        }
        recycled
    }

    /// Bind slot `index` to a random pattern other than the one the other
    /// slot holds
    fn reassign<R: Rng + ?Sized>(&mut self, index: usize, library: &ObstacleLibrary, rng: &mut R) -> usize {
        let other = self.slots[1 - index].pattern;
        let slot = &mut self.slots[index];
        slot.pattern = library.pick_excluding(rng, &[other]).unwrap_or(slot.pattern);
        slot.position.x = 0.0;
        slot.rotation_x = 0.0;
        log::debug!(
            "Obstacle slot {} -> {}",
            index + 1,
            library.get(slot.pattern).map(|p| p.name.as_str()).unwrap_or("?")
        );
        slot.pattern
    }

    /// Shift both slots along the travel axis without recycling
    pub fn nudge(&mut self, dz: f32) {
        for slot in &mut self.slots {
            scroll(slot, dz);
        }
    }

    /// Hide both slots and park them at `zs`
    pub fn reset(&mut self, zs: [f32; 2]) {
        for (slot, z) in self.slots.iter_mut().zip(zs) {
            relocate(slot, z);
            slot.position.x = 0.0;
            slot.rotation_x = 0.0;
        }
    }
}

/// The live coin pattern instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSlot {
    /// Index into the coin library
    pub pattern: usize,
    pub position: Vec3,
    pub visible: bool,
    /// Slot-local collected flags, one per pickup of the held pattern
    collected: [bool; MAX_PICKUPS],
}

impl Placeable for CoinSlot {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl CoinSlot {
    pub fn new<R: Rng + ?Sized>(library: &CoinLibrary, rng: &mut R) -> Self {
        Self {
            pattern: library.pick(rng),
            position: Vec3::new(0.0, COIN_GROUP_Y, COIN_SPAWN_Z),
            visible: false,
            collected: [false; MAX_PICKUPS],
        }
    }

    /// Reveal, scroll (slower than obstacles) and recycle the group
    ///
    /// Returns the new pattern index if the group recycled. Repeats are
    /// allowed.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        distance: f32,
        library: &CoinLibrary,
        rng: &mut R,
    ) -> Option<usize> {
        if !self.visible {
            self.visible = true;
        }
        scroll(self, distance);
        if !has_passed(&*self, COIN_RECYCLE_Z) {
            return None;
        }
        self.restore_pickups();
        relocate(self, COIN_SPAWN_Z);
        self.pattern = library.pick(rng);
        log::debug!(
            "Coin group -> {}",
            library.get(self.pattern).map(|p| p.name.as_str()).unwrap_or("?")
        );
        Some(self.pattern)
    }

    /// Whether pickup `index` is still showing (and collectable)
    pub fn pickup_visible(&self, index: usize) -> bool {
        self.collected.get(index).is_some_and(|c| !c)
    }

    /// Hide pickup `index`; returns false if it was already collected
    pub(crate) fn mark_collected(&mut self, index: usize) -> bool {
        match self.collected.get_mut(index) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    pub fn collected_count(&self) -> usize {
        self.collected.iter().filter(|c| **c).count()
    }

    /// Make every pickup visible again
    pub fn restore_pickups(&mut self) {
        self.collected = [false; MAX_PICKUPS];
    }

    /// Hide the group, restore its pickups and park it at `z`
    pub fn reset(&mut self, z: f32) {
        self.restore_pickups();
        relocate(self, z);
    }
}

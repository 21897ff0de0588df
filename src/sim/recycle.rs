//! Scroll recycling
//!
//! Anything that scrolls toward the camera implements `Placeable`. The
//! recycler advances it along the travel axis and reports when it has
//! passed a threshold so the owner can relocate it behind the scene.
//! Terrain uses this directly: two segments leapfrog each other forever.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::advance_z;
use crate::consts::{TERRAIN_RECYCLE_Z, TERRAIN_SEAM, TERRAIN_START_Z};

/// Minimal capability set the core needs from a scene container
pub trait Placeable {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);
}

/// Advance `node` by `distance` along the travel axis
pub fn scroll<P: Placeable + ?Sized>(node: &mut P, distance: f32) {
    let pos = node.position();
    node.set_position(advance_z(pos, distance));
}

/// Whether `node` has moved past `threshold` on the travel axis
pub fn has_passed<P: Placeable + ?Sized>(node: &P, threshold: f32) -> bool {
    node.position().z > threshold
}

/// Hide `node` and put it back at `z`
pub fn relocate<P: Placeable + ?Sized>(node: &mut P, z: f32) {
    let pos = node.position();
    node.set_visible(false);
    node.set_position(Vec3::new(pos.x, pos.y, z));
}

/// One piece of scrolling ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSegment {
    pub position: Vec3,
    pub visible: bool,
}

impl Placeable for TerrainSegment {
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

/// Two equal segments placed back to back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    pub segments: [TerrainSegment; 2],
    /// Effective segment length (measured extent minus the seam correction)
    pub length: f32,
}

impl Terrain {
    /// Lay out two segments from the measured extent of one
    pub fn new(measured_extent: f32) -> Self {
        let length = measured_extent - TERRAIN_SEAM;
        let first = TerrainSegment {
            position: Vec3::new(0.0, 0.0, TERRAIN_START_Z),
            visible: true,
        };
        let second = TerrainSegment {
            position: Vec3::new(0.0, 0.0, TERRAIN_START_Z + length),
            visible: true,
        };
        Self {
            segments: [first, second],
            length,
        }
    }

    /// Scroll both segments; returns the index of a segment that wrapped
    pub fn advance(&mut self, distance: f32) -> Option<usize> {
        for segment in &mut self.segments {
            scroll(segment, distance);
        }

        let mut wrapped = None;
        for i in 0..2 {
            if has_passed(&self.segments[i], TERRAIN_RECYCLE_Z) {
                let sibling_z = self.segments[1 - i].position.z;
                let pos = self.segments[i].position;
                self.segments[i].position = Vec3::new(pos.x, pos.y, sibling_z - self.length);
                debug_assert!(self.seam_error() < 1e-2, "terrain segments out of step");
                wrapped = Some(i);
            }
        }
        wrapped
    }

    /// How far the segment spacing is from exactly one length
    pub fn seam_error(&self) -> f32 {
        let gap = (self.segments[0].position.z - self.segments[1].position.z).abs();
        (gap - self.length).abs()
    }
}

//! Axis-aligned bounding volumes
//!
//! Rebuilt every tick from the current world transform of the player
//! collider and every live hazard/pickup shape. Never cached across ticks.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box centered on `center` extending `half` along each axis
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        let half = half.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Tightest axis-aligned box around a rotated box
    ///
    /// Each world half-extent is the sum of the absolute rotated local axes,
    /// which is what a scene graph does when it fits a box to a rotated mesh.
    pub fn from_transform(center: Vec3, half: Vec3, rotation: Quat) -> Self {
        let m = Mat3::from_quat(rotation);
        let abs = Mat3::from_cols(m.x_axis.abs(), m.y_axis.abs(), m.z_axis.abs());
        Self::from_center_half_extents(center, abs * half.abs())
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Overlap test; touching faces count as intersecting
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_overlap_and_touch() {
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(1.0));
        let b = Aabb::from_center_half_extents(Vec3::new(1.5, 0.0, 0.0), Vec3::splat(1.0));
        let touching = Aabb::from_center_half_extents(Vec3::new(2.0, 0.0, 0.0), Vec3::splat(1.0));
        let apart = Aabb::from_center_half_extents(Vec3::new(0.0, 2.5, 0.0), Vec3::splat(1.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_separated_on_single_axis_misses() {
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(1.0));
        let b = Aabb::from_center_half_extents(Vec3::new(0.5, 0.5, 3.0), Vec3::splat(1.0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_rotated_box_grows() {
        let half = Vec3::new(1.0, 2.0, 1.0);
        let flat = Aabb::from_transform(Vec3::ZERO, half, Quat::IDENTITY);
        assert!((flat.size() - half * 2.0).length() < 1e-5);

        // Quarter turn about X swaps Y and Z extents
        let turned = Aabb::from_transform(
            Vec3::ZERO,
            half,
            Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
        );
        assert!((turned.size().y - 2.0).abs() < 1e-4);
        assert!((turned.size().z - 4.0).abs() < 1e-4);

        // Partial turn is never smaller than the unrotated box on the rotated axes
        let tilted = Aabb::from_transform(Vec3::ZERO, half, Quat::from_rotation_x(0.3));
        assert!(tilted.size().z > flat.size().z);
    }
}

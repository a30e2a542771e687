//! Camera pose: the interpolation subject of a transition

use crate::foundation::math::{utils, Point3};

/// Snapshot of the camera state a transition interpolates
///
/// Componentwise linear interpolation over position, look-at target, and
/// clip planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Camera position in world space
    pub position: Point3,
    /// Look-at target in world space
    pub look_at: Point3,
    /// Near clipping plane distance
    pub near: f32,
    /// Far clipping plane distance
    pub far: f32,
}

impl CameraPose {
    /// Componentwise linear interpolation between two poses at fraction `t`
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: Point3::from(self.position.coords.lerp(&other.position.coords, t)),
            look_at: Point3::from(self.look_at.coords.lerp(&other.look_at.coords, t)),
            near: utils::lerp(self.near, other.near, t),
            far: utils::lerp(self.far, other.far, t),
        }
    }
}

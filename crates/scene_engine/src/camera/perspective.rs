//! 3D perspective camera
//!
//! Represents a camera in 3D space with position, orientation, and projection
//! parameters. Matrix calculations are performed on demand rather than
//! cached; for performance-critical hosts with static cameras, consider
//! caching the computed matrices.

use nalgebra::Perspective3;

use crate::camera::pose::CameraPose;
use crate::foundation::math::{utils, Mat4, Point3, Vec3};

/// 3D camera for perspective projection
///
/// Uses a standard right-handed Y-up coordinate system: X+ right, Y+ up,
/// looking down -Z in view space.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Point3,

    /// Point the camera is looking at in world space
    pub target: Point3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view angle in radians
    pub fov: f32,

    /// Aspect ratio (width / height) for projection calculations
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a new perspective camera with standard Y-up orientation
    ///
    /// The default target is the origin and the up vector is +Y; both can be
    /// changed after creation.
    pub fn perspective(position: Point3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Point3::origin(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Point3) {
        self.position = position;
        log::trace!("Camera position updated to: {position:?}");
    }

    /// Point the camera at a target without moving it
    pub fn look_at(&mut self, target: Point3) {
        self.target = target;
        log::trace!("Camera target updated to: {target:?}");
    }

    /// Update camera aspect ratio for viewport changes
    ///
    /// Only logs when the change is significant to avoid spam during window
    /// resize events.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Update near and far clipping planes
    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        log::trace!("Camera clip planes updated to: [{near}, {far}]");
    }

    /// The camera's vertical field of view in degrees
    pub fn fov_degrees(&self) -> f32 {
        utils::rad_to_deg(self.fov)
    }

    /// Unit vector from the camera position toward its target
    ///
    /// Not meaningful when the position coincides with the target.
    pub fn view_direction(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Generate the view matrix (world to camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Generate the perspective projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Perspective3::new(self.aspect, self.fov, self.near, self.far).to_homogeneous()
    }

    /// Generate the combined view-projection matrix (P x V)
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The camera's current pose (position, look-at target, clip planes)
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            look_at: self.target,
            near: self.near,
            far: self.far,
        }
    }

    /// Apply an interpolated pose to the camera in place
    ///
    /// This is the sole observable effect of a frame-driver tick: position,
    /// look-at target, and clip planes are updated together.
    pub fn apply_pose(&mut self, pose: &CameraPose) {
        self.position = pose.position;
        self.target = pose.look_at;
        self.near = pose.near;
        self.far = pose.far;
        log::trace!("Camera pose applied: {pose:?}");
    }
}

impl Default for Camera {
    /// A 75-degree perspective camera two units back from the origin,
    /// matching a typical starting viewpoint for small scenes
    fn default() -> Self {
        Self::perspective(Point3::new(0.0, 0.0, 2.0), 75.0, 16.0 / 9.0, 0.1, 100.0)
    }
}

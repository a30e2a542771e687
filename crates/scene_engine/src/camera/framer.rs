//! Zoom-to-fit camera framing
//!
//! Computes the camera pose that exactly fits a target bounding box within
//! the camera's vertical field of view, optionally viewed from a rotated
//! direction. A pure function of its inputs.

use crate::camera::perspective::Camera;
use crate::camera::pose::CameraPose;
use crate::foundation::math::{utils, Point3, Quat, Unit, Vec3};
use crate::scene::Aabb;

/// Framing errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FramingError {
    /// The target bounding box is empty or has zero size
    #[error("cannot frame an empty or zero-size bounding box")]
    EmptyBounds,

    /// The camera field of view is outside the open interval (0, 180)
    #[error("camera field of view must lie strictly between 0 and 180 degrees, got {0} degrees")]
    InvalidFieldOfView(f32),

    /// The framing direction could not be normalized
    #[error("framing direction is too close to zero to normalize")]
    DegenerateDirection,
}

/// Target camera pose produced by [`frame`]
///
/// Produced once per framing request and consumed by the transition animator
/// as the interpolation endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFraming {
    /// Target camera position
    pub position: Point3,
    /// Target look-at point (the center of the framed bounds)
    pub look_at: Point3,
    /// Near clip plane scaled to the subject (size / 100)
    pub near: f32,
    /// Far clip plane scaled to the subject (size * 100)
    pub far: f32,
}

impl From<CameraFraming> for CameraPose {
    fn from(framing: CameraFraming) -> Self {
        Self {
            position: framing.position,
            look_at: framing.look_at,
            near: framing.near,
            far: framing.far,
        }
    }
}

/// Options controlling the framing direction
///
/// The base direction defaults to the camera's current offset from its
/// target, so an angle of zero means "fit without moving the viewpoint
/// sideways". Rotating the base direction about the axis serves the
/// "fit from an elevated angle" use case.
#[derive(Debug, Clone)]
pub struct FramingOptions {
    /// Rotation applied to the base direction, in degrees
    pub view_angle_degrees: f32,
    /// Base direction from the bounds center toward the new camera position;
    /// `None` uses the camera's current offset direction
    pub direction: Option<Vec3>,
    /// Rotation axis for the view angle (default: the negated horizontal X
    /// axis, so positive angles elevate a forward-facing camera)
    pub axis: Unit<Vec3>,
}

impl Default for FramingOptions {
    fn default() -> Self {
        Self {
            view_angle_degrees: 0.0,
            direction: None,
            axis: -Vec3::x_axis(),
        }
    }
}

impl FramingOptions {
    /// Builder pattern: set the view angle in degrees
    pub fn with_view_angle(mut self, degrees: f32) -> Self {
        self.view_angle_degrees = degrees;
        self
    }

    /// Builder pattern: set an explicit base direction
    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Builder pattern: set the rotation axis
    pub fn with_axis(mut self, axis: Unit<Vec3>) -> Self {
        self.axis = axis;
        self
    }
}

/// Compute the camera pose that frames `bounds`
///
/// `distance = (size / 2) / tan(fov / 2)` is the minimum distance at which a
/// sphere with the bounds diagonal as diameter exactly fills the camera's
/// vertical field of view. Clip planes spread proportionally to subject
/// scale, which avoids z-fighting for small subjects and premature clipping
/// for large ones.
pub fn frame(
    bounds: &Aabb,
    options: &FramingOptions,
    camera: &Camera,
) -> Result<CameraFraming, FramingError> {
    let size = bounds.diagonal();
    if bounds.is_empty() || size <= 0.0 {
        return Err(FramingError::EmptyBounds);
    }
    if !(camera.fov > 0.0 && camera.fov < std::f32::consts::PI) {
        return Err(FramingError::InvalidFieldOfView(camera.fov_degrees()));
    }

    let center = bounds.center();

    let base = match options.direction {
        Some(direction) => direction,
        None => camera.position - camera.target,
    };
    let base = Unit::try_new(base, 1.0e-6).ok_or(FramingError::DegenerateDirection)?;
    let rotation = Quat::from_axis_angle(&options.axis, utils::deg_to_rad(options.view_angle_degrees));
    let direction = rotation * base.into_inner();

    let distance = (size * 0.5) / (camera.fov * 0.5).tan();

    Ok(CameraFraming {
        position: center + direction * distance,
        look_at: center,
        near: size / 100.0,
        far: size * 100.0,
    })
}

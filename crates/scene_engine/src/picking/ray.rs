//! World-space rays and screen-coordinate unprojection

use crate::camera::Camera;
use crate::foundation::math::{Point3, Unit, Vec3, Vec4};

/// Picking errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PickError {
    /// A normalized device coordinate fell outside [-1, 1]
    #[error("normalized device coordinates ({0}, {1}) fall outside [-1, 1]")]
    NdcOutOfRange(f32, f32),

    /// The ray direction could not be normalized
    #[error("ray direction is too close to zero to normalize")]
    DegenerateDirection,

    /// The camera's view-projection matrix could not be inverted
    #[error("camera view-projection matrix is not invertible")]
    NonInvertibleProjection,

    /// The camera field of view is outside the open interval (0, 180)
    #[error("camera field of view must lie strictly between 0 and 180 degrees, got {0} degrees")]
    InvalidFieldOfView(f32),
}

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Point3,
    /// The direction of the ray (unit length)
    pub direction: Unit<Vec3>,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// Fails rather than normalizing a near-zero direction.
    pub fn new(origin: Point3, direction: Vec3) -> Result<Self, PickError> {
        let direction =
            Unit::try_new(direction, 1.0e-6).ok_or(PickError::DegenerateDirection)?;
        Ok(Self { origin, direction })
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Point3 {
        self.origin + self.direction.into_inner() * t
    }
}

/// Convert normalized device coordinates to a world-space ray
///
/// Unprojects the NDC pair through the camera's inverse view-projection
/// matrix at the near and far planes; the ray originates at the camera
/// position and points through the clicked point into the scene. NDC follow
/// the usual convention: x in [-1, 1] left to right, y in [-1, 1] bottom to
/// top.
pub fn pick_ray(ndc_x: f32, ndc_y: f32, camera: &Camera) -> Result<Ray, PickError> {
    if !((-1.0..=1.0).contains(&ndc_x) && (-1.0..=1.0).contains(&ndc_y)) {
        return Err(PickError::NdcOutOfRange(ndc_x, ndc_y));
    }
    if !(camera.fov > 0.0 && camera.fov < std::f32::consts::PI) {
        return Err(PickError::InvalidFieldOfView(camera.fov_degrees()));
    }

    let inv_view_proj = camera
        .view_projection_matrix()
        .try_inverse()
        .ok_or(PickError::NonInvertibleProjection)?;

    // Unproject the pixel at the near and far planes; both lie on the ray
    // through the clicked point.
    let near = unproject(&inv_view_proj, Vec4::new(ndc_x, ndc_y, -1.0, 1.0))?;
    let far = unproject(&inv_view_proj, Vec4::new(ndc_x, ndc_y, 1.0, 1.0))?;

    Ray::new(camera.position, far - near)
}

fn unproject(inv_view_proj: &crate::foundation::math::Mat4, ndc: Vec4) -> Result<Point3, PickError> {
    let h = inv_view_proj * ndc;
    if h.w.abs() < 1.0e-9 {
        return Err(PickError::NonInvertibleProjection);
    }
    Ok(Point3::new(h.x / h.w, h.y / h.w, h.z / h.w))
}

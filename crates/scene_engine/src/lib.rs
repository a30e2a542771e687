//! # Scene Engine
//!
//! A headless 3D scene-graph toolkit for pick-to-zoom camera interaction.
//!
//! ## Features
//!
//! - **Scene Graph**: Hierarchical transforms with lazy world-matrix caching
//! - **Bounding Volumes**: World-space AABB accumulation over subtrees
//! - **Ray Picking**: Nearest-hit selection among tagged candidate roots
//! - **Zoom-to-Fit Framing**: Camera poses that exactly fit a subject
//! - **Smooth Transitions**: Eased camera interpolation with override support
//! - **Frame Driver**: One-call-per-frame orchestration of the above
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = SceneGraph::new();
//!     let car = scene.spawn(
//!         scene.root(),
//!         Node::new().with_tag("car").with_extent(Aabb::from_center_extents(
//!             Point3::origin(),
//!             Vec3::new(1.0, 1.0, 1.0),
//!         )),
//!     )?;
//!     let _ = car;
//!
//!     let mut camera = Camera::perspective(Point3::new(0.0, 0.0, 5.0), 75.0, 16.0 / 9.0, 0.1, 100.0);
//!     let mut driver = FrameDriver::new(DriverConfig::default(), &camera);
//!
//!     // Click the center of the screen, then advance frames until settled.
//!     driver.submit_pick(PickEvent { ndc_x: 0.0, ndc_y: 0.0 });
//!     driver.tick(&mut scene, &mut camera, 1.0 / 60.0)?;
//!     while !driver.is_settled() {
//!         driver.tick(&mut scene, &mut camera, 1.0 / 60.0)?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod animation;
pub mod camera;
pub mod config;
pub mod driver;
pub mod foundation;
pub mod picking;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{Easing, Transition},
        camera::{frame, Camera, CameraFraming, CameraPose, FramingError, FramingOptions},
        config::{Config, ConfigError},
        driver::{DriverConfig, DriverError, FrameDriver, PickEvent},
        foundation::{
            math::{Mat4, Point3, Quat, Transform, Vec3},
            time::Timer,
        },
        picking::{pick, pick_ray, PickError, PickResult, Ray},
        scene::{Aabb, Node, NodeKey, SceneError, SceneGraph},
    };
}

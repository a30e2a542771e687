//! Perspective camera and zoom-to-fit framing

mod framer;
mod perspective;
mod pose;

pub use framer::{frame, CameraFraming, FramingError, FramingOptions};
pub use perspective::Camera;
pub use pose::CameraPose;

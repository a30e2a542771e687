//! Ray casting and scene picking

mod picker;
mod ray;

pub use picker::{pick, PickResult};
pub use ray::{pick_ray, PickError, Ray};

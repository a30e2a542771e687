//! Foundation utilities: math types and timing

pub mod math;
pub mod time;

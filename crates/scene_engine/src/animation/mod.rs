//! Time-driven camera transitions

mod transition;

pub use transition::{Easing, Transition};

//! Scene graph and bounding-volume computation
//!
//! A scene is a tree of transform nodes held in an arena. Each node carries a
//! local TRS transform, an optional local geometric extent, and optional
//! name/tag metadata used to select picking candidates.

pub mod bounds;
pub mod graph;

pub use bounds::Aabb;
pub use graph::{Node, NodeKey, SceneError, SceneGraph};

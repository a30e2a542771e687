//! Axis-aligned bounding boxes and world-space subtree bounds
//!
//! Boxes are plain value types: merges produce fresh boxes, and a box handed
//! to a caller is never mutated afterwards. The empty state uses inverted
//! infinity corners so that merging an empty box with any box yields that
//! box without special cases.

use crate::foundation::math::{Mat4, Point3, Vec3};
use crate::scene::graph::{NodeKey, SceneError, SceneGraph};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Point3,
    /// Maximum corner of the bounding box
    pub max: Point3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given half-extents
    pub fn from_center_extents(center: Point3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// The distinguished empty box
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// Whether the box contains no points at all
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Per-axis size (max minus min)
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Length of the box diagonal
    pub fn diagonal(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.size().magnitude()
        }
    }

    /// The tightest box containing both `self` and `other`
    pub fn merged(&self, other: &Self) -> Self {
        Self {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// The tightest box containing `self` and the given point
    pub fn merged_point(&self, point: Point3) -> Self {
        self.merged(&Self::new(point, point))
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Point3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// The eight corner points of the box
    pub fn corners(&self) -> [Point3; 8] {
        [
            Point3::new(self.min.x, self.min.y, self.min.z),
            Point3::new(self.max.x, self.min.y, self.min.z),
            Point3::new(self.min.x, self.max.y, self.min.z),
            Point3::new(self.max.x, self.max.y, self.min.z),
            Point3::new(self.min.x, self.min.y, self.max.z),
            Point3::new(self.max.x, self.min.y, self.max.z),
            Point3::new(self.min.x, self.max.y, self.max.z),
            Point3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// The axis-aligned box containing all eight corners transformed by
    /// `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        let mut result = Self::empty();
        for corner in self.corners() {
            result = result.merged_point(matrix.transform_point(&corner));
        }
        result
    }

    /// Test ray intersection with this AABB using the slab method
    ///
    /// Returns the distance to the entry point (in units of `dir`) if the
    /// ray intersects, `None` otherwise. Intersections entirely behind the
    /// origin are rejected; an origin inside the box reports distance zero.
    /// Axes with a zero direction component are tested by containment
    /// instead of division, so an origin exactly on a slab plane never
    /// produces a `0 * inf` NaN that the min/max folds would drop.
    pub fn intersect_ray(&self, origin: Point3, dir: Vec3) -> Option<f32> {
        if self.is_empty() {
            return None;
        }

        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            if d == 0.0 {
                // Parallel to this slab: either always inside it or never.
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t1 = (self.min[axis] - o) * inv;
            let mut t2 = (self.max[axis] - o) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            tmin = tmin.max(t1);
            tmax = tmax.min(t2);
            if tmin > tmax {
                return None;
            }
        }

        if tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}

impl SceneGraph {
    /// World-space bounds of the subtree rooted at `root`
    ///
    /// Depth-first accumulation: each node carrying a local extent
    /// contributes its eight world-transformed corners; nodes without
    /// geometry contribute nothing but their descendants are still visited.
    /// A subtree with no geometry anywhere yields the empty box, which
    /// callers must check before deriving sizes from it.
    pub fn world_bounds(&mut self, root: NodeKey) -> Result<Aabb, SceneError> {
        if !self.contains(root) {
            return Err(SceneError::UnknownNode);
        }

        let mut keys = Vec::new();
        self.traverse(root, &mut |key, node| {
            if node.extent().is_some() {
                keys.push(key);
            }
        });

        let mut bounds = Aabb::empty();
        for key in keys {
            let Some(extent) = self.node(key).and_then(crate::scene::Node::extent) else {
                continue;
            };
            let world = self.world_matrix(key)?;
            bounds = bounds.merged(&extent.transformed(&world));
        }
        Ok(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Transform};
    use crate::scene::graph::Node;
    use approx::assert_relative_eq;

    fn unit_box() -> Aabb {
        Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_empty_merge_identity() {
        let b = unit_box();
        assert_relative_eq!(Aabb::empty().merged(&b).min, b.min);
        assert_relative_eq!(Aabb::empty().merged(&b).max, b.max);
        assert!(Aabb::empty().is_empty());
        assert!(!b.is_empty());
    }

    #[test]
    fn test_merged_is_tightest() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point3::new(2.0, -1.0, 0.5), Point3::new(3.0, 0.5, 2.0));
        let m = a.merged(&b);
        assert_relative_eq!(m.min, Point3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(m.max, Point3::new(3.0, 1.0, 2.0));
    }

    #[test]
    fn test_contains_and_intersects() {
        let b = unit_box();
        assert!(b.contains_point(Point3::origin()));
        assert!(!b.contains_point(Point3::new(2.0, 0.0, 0.0)));

        let other = Aabb::new(Point3::new(0.5, 0.5, 0.5), Point3::new(3.0, 3.0, 3.0));
        let far = Aabb::new(Point3::new(5.0, 5.0, 5.0), Point3::new(7.0, 7.0, 7.0));
        assert!(b.intersects(&other));
        assert!(!b.intersects(&far));
    }

    #[test]
    fn test_ray_through_center() {
        let b = unit_box();
        let t = b
            .intersect_ray(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .unwrap();
        // Distance to center minus the half-extent along the ray.
        assert_relative_eq!(t, 4.0, epsilon = 1e-6);

        assert!(b
            .intersect_ray(Point3::new(0.0, 5.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .is_none());
        // Box entirely behind the origin.
        assert!(b
            .intersect_ray(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0))
            .is_none());
        // Origin inside the box clamps to zero.
        assert_relative_eq!(
            b.intersect_ray(Point3::origin(), Vec3::new(1.0, 0.0, 0.0)).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_ray_grazing_a_face() {
        let b = unit_box();
        // Origin exactly on the min-x plane with a zero x component: the ray
        // runs along the face and still enters the box.
        let t = b
            .intersect_ray(Point3::new(-1.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .unwrap();
        assert_relative_eq!(t, 4.0, epsilon = 1e-6);

        // Parallel but outside the slab misses.
        assert!(b
            .intersect_ray(Point3::new(-1.5, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .is_none());
    }

    #[test]
    fn test_transformed_rotated_box() {
        // A unit cube rotated 45 degrees around Y grows to sqrt(2) on X and Z.
        let rot = Transform::identity().with_rotation(Quat::from_axis_angle(
            &Vec3::y_axis(),
            std::f32::consts::FRAC_PI_4,
        ));
        let t = unit_box().transformed(&rot.to_matrix());
        let s = std::f32::consts::SQRT_2;
        assert_relative_eq!(t.max.x, s, epsilon = 1e-5);
        assert_relative_eq!(t.max.z, s, epsilon = 1e-5);
        assert_relative_eq!(t.max.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_world_bounds_accumulates_subtree() {
        let mut scene = SceneGraph::new();
        let group = scene
            .spawn(
                scene.root(),
                Node::new().with_transform(Transform::from_position(Vec3::new(10.0, 0.0, 0.0))),
            )
            .unwrap();
        // Geometry on two grandchildren, none on the group itself.
        let _a = scene
            .spawn(
                group,
                Node::new()
                    .with_extent(unit_box())
                    .with_transform(Transform::from_position(Vec3::new(-2.0, 0.0, 0.0))),
            )
            .unwrap();
        let _b = scene
            .spawn(
                group,
                Node::new()
                    .with_extent(unit_box())
                    .with_transform(Transform::from_position(Vec3::new(2.0, 0.0, 0.0))),
            )
            .unwrap();

        let bounds = scene.world_bounds(group).unwrap();
        assert_relative_eq!(bounds.min, Point3::new(7.0, -1.0, -1.0), epsilon = 1e-5);
        assert_relative_eq!(bounds.max, Point3::new(13.0, 1.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_world_bounds_sibling_merge_equals_parent() {
        let mut scene = SceneGraph::new();
        let parent = scene.spawn(scene.root(), Node::new()).unwrap();
        let s1 = scene
            .spawn(
                parent,
                Node::new()
                    .with_extent(unit_box())
                    .with_transform(Transform::from_position(Vec3::new(-3.0, 0.0, 0.0))),
            )
            .unwrap();
        let s2 = scene
            .spawn(
                parent,
                Node::new()
                    .with_extent(unit_box())
                    .with_transform(Transform::from_position(Vec3::new(4.0, 1.0, 0.0))),
            )
            .unwrap();

        let b1 = scene.world_bounds(s1).unwrap();
        let b2 = scene.world_bounds(s2).unwrap();
        let parent_bounds = scene.world_bounds(parent).unwrap();
        let merged = b1.merged(&b2);
        assert_relative_eq!(merged.min, parent_bounds.min, epsilon = 1e-6);
        assert_relative_eq!(merged.max, parent_bounds.max, epsilon = 1e-6);
    }

    #[test]
    fn test_world_bounds_no_geometry_is_empty() {
        let mut scene = SceneGraph::new();
        let bare = scene.spawn(scene.root(), Node::new()).unwrap();
        let _leaf = scene.spawn(bare, Node::new()).unwrap();
        assert!(scene.world_bounds(bare).unwrap().is_empty());
    }

    #[test]
    fn test_world_bounds_respects_scale() {
        let mut scene = SceneGraph::new();
        let scaled = scene
            .spawn(
                scene.root(),
                Node::new()
                    .with_extent(unit_box())
                    .with_transform(Transform::identity().with_uniform_scale(0.5)),
            )
            .unwrap();
        let bounds = scene.world_bounds(scaled).unwrap();
        assert_relative_eq!(bounds.min, Point3::new(-0.5, -0.5, -0.5), epsilon = 1e-6);
        assert_relative_eq!(bounds.max, Point3::new(0.5, 0.5, 0.5), epsilon = 1e-6);
    }
}

//! Nearest-hit picking against a candidate set
//!
//! Two-phase test per candidate: a coarse reject against the subtree's
//! world-space AABB, then a fine test against the actual local extent of
//! every geometry-bearing node in the subtree, with the ray transformed into
//! each node's local frame so rotation and non-uniform scale are handled
//! exactly.

use crate::foundation::math::Point3;
use crate::picking::ray::Ray;
use crate::scene::{NodeKey, SceneGraph};

/// Result of a successful pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    /// The candidate that was hit (the candidate root, not the individual
    /// geometry node inside it)
    pub node: NodeKey,
    /// World-space distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Point3,
}

/// Find the nearest candidate intersected by `ray`
///
/// Among all positive-distance hits the minimum-distance one wins;
/// intersections behind the ray origin are discarded. An empty candidate set
/// yields `None`. Candidates that are no longer present in the graph, or
/// whose world matrix cannot be inverted (zero scale), are skipped.
pub fn pick(scene: &mut SceneGraph, ray: &Ray, candidates: &[NodeKey]) -> Option<PickResult> {
    let dir = ray.direction.into_inner();
    let mut best: Option<PickResult> = None;

    for &candidate in candidates {
        // Coarse phase: the subtree's world AABB.
        let Ok(bounds) = scene.world_bounds(candidate) else {
            log::trace!("pick: skipping unknown candidate {candidate:?}");
            continue;
        };
        if bounds.intersect_ray(ray.origin, dir).is_none() {
            continue;
        }

        // Fine phase: every geometry-bearing node inside the candidate.
        let mut geometry = Vec::new();
        scene.traverse(candidate, &mut |key, node| {
            if let Some(extent) = node.extent() {
                geometry.push((key, extent));
            }
        });

        for (key, extent) in geometry {
            let Ok(world) = scene.world_matrix(key) else { continue };
            let Some(inv_world) = world.try_inverse() else {
                log::trace!("pick: singular world matrix on {key:?}, skipping");
                continue;
            };

            let local_origin = inv_world.transform_point(&ray.origin);
            let local_dir = inv_world.transform_vector(&dir);
            let Some(t) = extent.intersect_ray(local_origin, local_dir) else {
                continue;
            };

            // Measure the distance in world space so scale is respected.
            let local_point = local_origin + local_dir * t;
            let point = world.transform_point(&local_point);
            let distance = (point - ray.origin).magnitude();

            if best.map_or(true, |b| distance < b.distance) {
                best = Some(PickResult {
                    node: candidate,
                    distance,
                    point,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Transform, Vec3};
    use crate::scene::{Aabb, Node};
    use approx::assert_relative_eq;

    fn unit_box() -> Aabb {
        Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
    }

    fn forward_ray() -> Ray {
        Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0)).unwrap()
    }

    #[test]
    fn test_pick_hits_near_face() {
        let mut scene = SceneGraph::new();
        let target = scene
            .spawn(scene.root(), Node::new().with_extent(unit_box()))
            .unwrap();

        let hit = pick(&mut scene, &forward_ray(), &[target]).unwrap();
        assert_eq!(hit.node, target);
        // Distance to the box center minus the half-extent along the ray.
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-5);
        assert_relative_eq!(hit.point, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_pick_nearest_wins() {
        let mut scene = SceneGraph::new();
        let far = scene
            .spawn(
                scene.root(),
                Node::new()
                    .with_extent(unit_box())
                    .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, -10.0))),
            )
            .unwrap();
        let near = scene
            .spawn(scene.root(), Node::new().with_extent(unit_box()))
            .unwrap();

        let hit = pick(&mut scene, &forward_ray(), &[far, near]).unwrap();
        assert_eq!(hit.node, near);

        // Order of candidates does not matter.
        let hit = pick(&mut scene, &forward_ray(), &[near, far]).unwrap();
        assert_eq!(hit.node, near);
    }

    #[test]
    fn test_pick_ignores_objects_behind_origin() {
        let mut scene = SceneGraph::new();
        let behind = scene
            .spawn(
                scene.root(),
                Node::new()
                    .with_extent(unit_box())
                    .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, 20.0))),
            )
            .unwrap();

        assert!(pick(&mut scene, &forward_ray(), &[behind]).is_none());
    }

    #[test]
    fn test_pick_empty_candidate_set() {
        let mut scene = SceneGraph::new();
        assert!(pick(&mut scene, &forward_ray(), &[]).is_none());
    }

    #[test]
    fn test_pick_miss_returns_none() {
        let mut scene = SceneGraph::new();
        let target = scene
            .spawn(
                scene.root(),
                Node::new()
                    .with_extent(unit_box())
                    .with_transform(Transform::from_position(Vec3::new(50.0, 0.0, 0.0))),
            )
            .unwrap();
        assert!(pick(&mut scene, &forward_ray(), &[target]).is_none());
    }

    #[test]
    fn test_pick_reports_candidate_for_nested_geometry() {
        // Geometry lives on a grandchild; the hit reports the candidate root.
        let mut scene = SceneGraph::new();
        let car = scene.spawn(scene.root(), Node::new().with_tag("car")).unwrap();
        let _body = scene
            .spawn(car, Node::new().with_extent(unit_box()))
            .unwrap();

        let hit = pick(&mut scene, &forward_ray(), &[car]).unwrap();
        assert_eq!(hit.node, car);
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_pick_respects_scale_and_rotation() {
        let mut scene = SceneGraph::new();
        // Half-size box: near face at z = 0.5 from the +Z ray.
        let scaled = scene
            .spawn(
                scene.root(),
                Node::new()
                    .with_extent(unit_box())
                    .with_transform(Transform::identity().with_uniform_scale(0.5)),
            )
            .unwrap();

        let hit = pick(&mut scene, &forward_ray(), &[scaled]).unwrap();
        assert_relative_eq!(hit.distance, 4.5, epsilon = 1e-5);

        // A 45-degree rotation about Y presents an edge to the ray: the
        // nearest point is now sqrt(2) in front of the center.
        scene
            .set_local_transform(
                scaled,
                Transform::identity().with_rotation(Quat::from_axis_angle(
                    &Vec3::y_axis(),
                    std::f32::consts::FRAC_PI_4,
                )),
            )
            .unwrap();
        let hit = pick(&mut scene, &forward_ray(), &[scaled]).unwrap();
        assert_relative_eq!(hit.distance, 5.0 - std::f32::consts::SQRT_2, epsilon = 1e-4);
    }
}

//! Frame driver
//!
//! Orchestrates the per-frame loop for pick-to-zoom interaction: the host
//! submits pointer events in normalized device coordinates whenever they
//! occur, and calls [`FrameDriver::tick`] once per frame with the frame's
//! delta time. Each tick resolves at most one pending pick into a camera
//! framing request, then advances the active camera transition and applies
//! the interpolated pose.

use serde::{Deserialize, Serialize};

use crate::animation::Transition;
use crate::camera::{frame, Camera, FramingError, FramingOptions};
use crate::config::Config;
use crate::picking::{pick, pick_ray, PickError};
use crate::scene::{SceneError, SceneGraph};

/// Frame driver errors
#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    /// Ray construction from a pick event failed
    #[error("pick ray construction failed: {0}")]
    Pick(#[from] PickError),

    /// Camera framing failed
    #[error("camera framing failed: {0}")]
    Framing(#[from] FramingError),

    /// Scene graph lookup failed
    #[error("scene graph error: {0}")]
    Scene(#[from] SceneError),
}

/// A pointer event in normalized device coordinates, both axes in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickEvent {
    /// Horizontal NDC coordinate, +1 at the right edge
    pub ndc_x: f32,
    /// Vertical NDC coordinate, +1 at the top edge
    pub ndc_y: f32,
}

/// Frame driver settings
///
/// Loadable from TOML or RON through the [`Config`] trait; the defaults
/// reproduce the stock showroom interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Camera transition duration in seconds
    pub transition_duration: f32,
    /// View angle when zooming onto a picked candidate, in degrees
    pub pick_view_angle_degrees: f32,
    /// View angle when resetting onto the fallback subject, in degrees
    pub reset_view_angle_degrees: f32,
    /// Tag identifying pickable candidate roots
    pub candidate_tag: String,
    /// Tag identifying the fallback subject framed when a pick misses
    pub fallback_tag: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            transition_duration: 0.5,
            pick_view_angle_degrees: 70.0,
            reset_view_angle_degrees: 45.0,
            candidate_tag: "car".to_string(),
            fallback_tag: "ground".to_string(),
        }
    }
}

impl Config for DriverConfig {}

/// Per-frame orchestrator for pick-to-zoom interaction
///
/// Holds a single-slot pick queue: submitting a second pick before the next
/// tick supersedes the first, so at most one framing request is resolved per
/// frame.
#[derive(Debug)]
pub struct FrameDriver {
    config: DriverConfig,
    transition: Transition,
    pending_pick: Option<PickEvent>,
}

impl FrameDriver {
    /// Create a driver resting at the camera's current pose
    pub fn new(config: DriverConfig, camera: &Camera) -> Self {
        Self {
            config,
            transition: Transition::new(camera.pose()),
            pending_pick: None,
        }
    }

    /// The driver's configuration
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Queue a pointer event for the next tick
    ///
    /// Only the most recent un-ticked event is kept.
    pub fn submit_pick(&mut self, event: PickEvent) {
        if let Some(superseded) = self.pending_pick.replace(event) {
            log::debug!("Pick event superseded before tick: {superseded:?}");
        }
    }

    /// True when no camera transition is in flight
    pub fn is_settled(&self) -> bool {
        self.transition.is_settled()
    }

    /// Advance one frame
    ///
    /// Resolves the pending pick event (if any) into a transition toward the
    /// framing of either the hit candidate or the fallback subject, then
    /// advances the transition by `dt` seconds and applies the interpolated
    /// pose to the camera. An in-flight transition is advanced even when the
    /// pick event turns out to be invalid, so a bad input never freezes the
    /// camera for a frame.
    pub fn tick(
        &mut self,
        scene: &mut SceneGraph,
        camera: &mut Camera,
        dt: f32,
    ) -> Result<(), DriverError> {
        let resolved = match self.pending_pick.take() {
            Some(event) => self.resolve_pick(event, scene, camera),
            None => Ok(()),
        };

        if !self.transition.is_settled() {
            let pose = self.transition.tick(dt);
            camera.apply_pose(&pose);
        }
        resolved
    }

    fn resolve_pick(
        &mut self,
        event: PickEvent,
        scene: &mut SceneGraph,
        camera: &Camera,
    ) -> Result<(), DriverError> {
        let ray = pick_ray(event.ndc_x, event.ndc_y, camera)?;
        let candidates = scene.collect_tagged(scene.root(), &self.config.candidate_tag);

        if let Some(hit) = pick(scene, &ray, &candidates) {
            log::info!(
                "Pick hit {:?} at distance {:.3}, zooming in",
                hit.node,
                hit.distance
            );
            let bounds = scene.world_bounds(hit.node)?;
            let options =
                FramingOptions::default().with_view_angle(self.config.pick_view_angle_degrees);
            let framing = frame(&bounds, &options, camera)?;
            self.transition
                .start(camera.pose(), framing.into(), self.config.transition_duration);
            return Ok(());
        }

        // Miss: frame the fallback subject instead, so a stray click reads
        // as "show me everything" rather than doing nothing.
        let fallback = scene.collect_tagged(scene.root(), &self.config.fallback_tag);
        let Some(&subject) = fallback.first() else {
            log::warn!(
                "Pick missed and no node is tagged '{}', ignoring",
                self.config.fallback_tag
            );
            return Ok(());
        };

        let bounds = scene.world_bounds(subject)?;
        let options =
            FramingOptions::default().with_view_angle(self.config.reset_view_angle_degrees);
        match frame(&bounds, &options, camera) {
            Ok(framing) => {
                log::info!("Pick missed, resetting onto {subject:?}");
                self.transition
                    .start(camera.pose(), framing.into(), self.config.transition_duration);
            }
            Err(FramingError::EmptyBounds) => {
                log::warn!("Fallback node {subject:?} has no geometry to frame, ignoring");
            }
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }
}

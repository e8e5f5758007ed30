//! AR session collaborator
//!
//! World tracking, plane detection and scene reconstruction belong to the
//! platform. This module only describes how a session is configured and
//! what the placement flow needs to ask it.

use crate::{DetectedPlane, PlaneAlignment, PlaneFilter, PlaneId, TrackingState};
use perch_core::math::{Pose, Vec2};

/// What the device can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    pub supports_vertical_planes: bool,
    pub supports_scene_reconstruction: bool,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            supports_vertical_planes: true,
            supports_scene_reconstruction: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneDetection {
    pub horizontal: bool,
    pub vertical: bool,
}

impl PlaneDetection {
    pub fn detects(&self, alignment: PlaneAlignment) -> bool {
        match alignment {
            PlaneAlignment::Horizontal => self.horizontal,
            PlaneAlignment::Vertical => self.vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneReconstruction {
    Disabled,
    Mesh,
}

/// World-tracking configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub plane_detection: PlaneDetection,
    pub environment_texturing: bool,
    pub scene_reconstruction: SceneReconstruction,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            plane_detection: PlaneDetection {
                horizontal: true,
                vertical: true,
            },
            environment_texturing: true,
            scene_reconstruction: SceneReconstruction::Disabled,
        }
    }
}

impl SessionConfig {
    /// Horizontal and vertical plane detection, plus mesh reconstruction
    /// where the device supports it.
    pub fn world_tracking(capabilities: &DeviceCapabilities) -> Self {
        Self::default().with_mesh_if_supported(capabilities)
    }

    pub fn with_mesh_if_supported(mut self, capabilities: &DeviceCapabilities) -> Self {
        if capabilities.supports_scene_reconstruction {
            self.scene_reconstruction = SceneReconstruction::Mesh;
        }
        self
    }

    /// Drop options the device cannot honor
    pub fn restricted_to(mut self, capabilities: &DeviceCapabilities) -> Self {
        if !capabilities.supports_vertical_planes {
            self.plane_detection.vertical = false;
        }
        if !capabilities.supports_scene_reconstruction {
            self.scene_reconstruction = SceneReconstruction::Disabled;
        }
        self
    }
}

/// The AR session as seen by the placement flow
pub trait ArSession {
    fn capabilities(&self) -> DeviceCapabilities;

    /// Start (or restart) tracking with `config`
    fn run(&mut self, config: &SessionConfig);

    fn tracking_state(&self) -> TrackingState;

    fn detected_planes(&self) -> &[DetectedPlane];

    /// First detected plane matching `filter`. No ranking is applied.
    fn anchor_plane(&self, filter: PlaneFilter) -> Option<&DetectedPlane> {
        self.detected_planes()
            .iter()
            .find(|plane| filter.accepts(plane.alignment))
    }
}

/// Session whose planes are fed in by the caller.
///
/// Used by the terminal front-end and by tests in place of a camera.
pub struct SimulatedSession {
    capabilities: DeviceCapabilities,
    config: Option<SessionConfig>,
    planes: Vec<DetectedPlane>,
    next_plane_id: u64,
    tracking: TrackingState,
}

impl SimulatedSession {
    pub fn new(capabilities: DeviceCapabilities) -> Self {
        Self {
            capabilities,
            config: None,
            planes: Vec::new(),
            next_plane_id: 1,
            tracking: TrackingState::Initializing,
        }
    }

    /// Configuration of the running session, if any
    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    /// Report a new plane.
    ///
    /// Returns `None` when the session is not running or the plane's
    /// alignment is not being detected.
    pub fn detect_plane(
        &mut self,
        alignment: PlaneAlignment,
        pose: Pose,
        extent: Vec2,
    ) -> Option<PlaneId> {
        let config = self.config.as_ref()?;
        if !config.plane_detection.detects(alignment) {
            tracing::debug!(?alignment, "ignoring plane: alignment not detected");
            return None;
        }

        let id = PlaneId(self.next_plane_id);
        self.next_plane_id += 1;
        self.planes.push(DetectedPlane {
            id,
            alignment,
            pose,
            extent,
        });
        tracing::debug!(plane = %id, ?alignment, "plane detected");

        self.set_tracking(TrackingState::Tracking);
        Some(id)
    }

    fn set_tracking(&mut self, state: TrackingState) {
        if self.tracking != state {
            self.tracking = state;
            match state {
                TrackingState::Initializing => tracing::info!("initializing"),
                TrackingState::Tracking => tracing::info!("tracking"),
            }
        }
    }
}

impl Default for SimulatedSession {
    fn default() -> Self {
        Self::new(DeviceCapabilities::default())
    }
}

impl ArSession for SimulatedSession {
    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    fn run(&mut self, config: &SessionConfig) {
        let config = config.clone().restricted_to(&self.capabilities);
        tracing::info!(
            horizontal = config.plane_detection.horizontal,
            vertical = config.plane_detection.vertical,
            mesh = config.scene_reconstruction == SceneReconstruction::Mesh,
            "session running"
        );

        self.planes
            .retain(|plane| config.plane_detection.detects(plane.alignment));
        if self.planes.is_empty() {
            self.set_tracking(TrackingState::Initializing);
        }
        self.config = Some(config);
    }

    fn tracking_state(&self) -> TrackingState {
        self.tracking
    }

    fn detected_planes(&self) -> &[DetectedPlane] {
        &self.planes
    }
}

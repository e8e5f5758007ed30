//! Perch Scene System
//!
//! The AR session collaborator, the scene graph it renders, and the host
//! that turns confirmed placements into anchored model instances.

pub mod host;
pub mod scene;
pub mod session;

pub use host::{PlacementOutcome, SceneHost};
pub use scene::{Anchor, AnchorId, SceneGraph};
pub use session::{
    ArSession, DeviceCapabilities, PlaneDetection, SceneReconstruction, SessionConfig,
    SimulatedSession,
};

use perch_core::math::{Pose, Vec2};
use std::fmt;

/// Orientation of a detected surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneAlignment {
    Horizontal,
    Vertical,
}

/// Which planes an anchor query accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneFilter {
    Any,
    Horizontal,
    Vertical,
}

impl PlaneFilter {
    pub fn accepts(&self, alignment: PlaneAlignment) -> bool {
        match self {
            PlaneFilter::Any => true,
            PlaneFilter::Horizontal => alignment == PlaneAlignment::Horizontal,
            PlaneFilter::Vertical => alignment == PlaneAlignment::Vertical,
        }
    }
}

/// Plane identifier assigned by the session
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PlaneId(pub u64);

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plane-{}", self.0)
    }
}

/// Surface reported by plane detection
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedPlane {
    pub id: PlaneId,
    pub alignment: PlaneAlignment,
    pub pose: Pose,
    /// Width and length in meters
    pub extent: Vec2,
}

/// World-tracking state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    /// No surface found yet
    Initializing,
    /// At least one surface is being tracked
    Tracking,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_filter() {
        assert!(PlaneFilter::Any.accepts(PlaneAlignment::Vertical));
        assert!(PlaneFilter::Any.accepts(PlaneAlignment::Horizontal));
        assert!(PlaneFilter::Vertical.accepts(PlaneAlignment::Vertical));
        assert!(!PlaneFilter::Horizontal.accepts(PlaneAlignment::Vertical));
    }
}

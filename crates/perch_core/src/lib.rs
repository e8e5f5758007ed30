//! Perch Core
//!
//! Shared building blocks for the placement runtime:
//! - Asset identifiers
//! - Poses and math
//! - UI refresh clock
//! - Placement-confirmation state machine

pub mod id;
pub mod math;
pub mod placement;
pub mod time;

pub use glam;

pub use id::AssetId;
pub use placement::{ConfirmedPlacement, PlacementController, PlacementError, PlacementState};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

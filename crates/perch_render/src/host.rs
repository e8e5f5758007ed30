//! Scene host
//!
//! Owns the AR session and the scene graph. Once per refresh it is shown the
//! confirmed placement (if any) and, when the model is ready and a plane is
//! known, anchors a fresh clone of it.

use crate::{AnchorId, ArSession, PlaneFilter, SceneGraph, SessionConfig};
use perch_asset::AssetEntity;

/// What a confirmed placement turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// No confirmed placement this refresh
    Idle,
    /// A clone was anchored
    Placed(AnchorId),
    /// The model is still loading or failed to load
    NotReady,
    /// No plane has been detected yet; the placement is dropped
    NoPlane,
}

pub struct SceneHost<S: ArSession> {
    session: S,
    scene: SceneGraph,
}

impl<S: ArSession> SceneHost<S> {
    /// Start `session` with `config` and host an empty scene
    pub fn new(mut session: S, config: &SessionConfig) -> Self {
        session.run(config);
        Self {
            session,
            scene: SceneGraph::new(),
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// React to the confirmed-placement signal.
    ///
    /// Never fails: anything that prevents placement is logged and reported
    /// in the outcome. Clearing the signal is the caller's job.
    pub fn on_confirmed_placement_changed(
        &mut self,
        entity: Option<&AssetEntity>,
    ) -> PlacementOutcome {
        let Some(entity) = entity else {
            return PlacementOutcome::Idle;
        };

        let Some(handle) = entity.handle() else {
            tracing::warn!(model = entity.name(), "model not loaded, skipping placement");
            return PlacementOutcome::NotReady;
        };

        let Some(plane) = self.session.anchor_plane(PlaneFilter::Any) else {
            tracing::warn!(model = entity.name(), "no plane detected, skipping placement");
            return PlacementOutcome::NoPlane;
        };

        tracing::info!(model = entity.name(), plane = %plane.id, "adding model to scene");

        let anchor = self.scene.add_anchor(plane);
        anchor.add_child(handle.clone_recursive());
        PlacementOutcome::Placed(anchor.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlaneAlignment, SimulatedSession};
    use perch_asset::{AssetDescriptor, LoadError, ModelHandle, ModelLoader, ModelNode};
    use perch_core::math::{Pose, Vec2, Vec3};
    use perch_core::AssetId;
    use std::path::Path;
    use std::sync::{mpsc, Arc, Mutex};
    use tokio::runtime::Handle;

    struct InstantLoader;

    impl ModelLoader for InstantLoader {
        fn load(&self, path: &Path) -> Result<ModelHandle, LoadError> {
            let root = ModelNode::new("root").with_child(ModelNode::new("mesh"));
            Ok(ModelHandle::new(path, vec![9u8; 16], root))
        }
    }

    struct StalledLoader {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl ModelLoader for StalledLoader {
        fn load(&self, path: &Path) -> Result<ModelHandle, LoadError> {
            let _ = self.gate.lock().unwrap().recv();
            Err(LoadError::NotFound {
                path: path.to_path_buf(),
            })
        }
    }

    fn host_with_floor() -> SceneHost<SimulatedSession> {
        let mut host = SceneHost::new(SimulatedSession::default(), &SessionConfig::default());
        host.session_mut()
            .detect_plane(PlaneAlignment::Horizontal, Pose::IDENTITY, Vec2::ONE);
        host
    }

    async fn ready_chair() -> AssetEntity {
        let mut entity = AssetEntity::load(
            AssetId::from_raw(0),
            AssetDescriptor::new("chair", "chair.usdz", None),
            Arc::new(InstantLoader),
            &Handle::current(),
        );
        entity.wait().await;
        entity
    }

    #[test]
    fn test_no_signal_is_idle() {
        let mut host = host_with_floor();
        assert_eq!(host.on_confirmed_placement_changed(None), PlacementOutcome::Idle);
        assert_eq!(host.scene().anchor_count(), 0);
    }

    #[tokio::test]
    async fn test_ready_model_is_anchored() {
        let mut host = host_with_floor();
        let chair = ready_chair().await;

        let outcome = host.on_confirmed_placement_changed(Some(&chair));

        let PlacementOutcome::Placed(anchor) = outcome else {
            panic!("expected placement, got {outcome:?}");
        };
        assert_eq!(host.scene().anchor_count(), 1);
        assert_eq!(host.scene().anchor(anchor).unwrap().children().len(), 1);
    }

    #[tokio::test]
    async fn test_same_model_twice_gives_independent_instances() {
        let mut host = host_with_floor();
        let chair = ready_chair().await;

        let PlacementOutcome::Placed(first) = host.on_confirmed_placement_changed(Some(&chair))
        else {
            panic!("first placement failed");
        };
        let PlacementOutcome::Placed(second) = host.on_confirmed_placement_changed(Some(&chair))
        else {
            panic!("second placement failed");
        };
        assert_ne!(first, second);
        assert_eq!(host.scene().instance_count(), 2);

        let moved = Pose::from_translation(Vec3::X);
        host.scene.anchor_mut(first).unwrap().children_mut()[0]
            .root
            .children[0]
            .transform = moved;

        let first_root = &host.scene().anchor(first).unwrap().children()[0].root;
        let second_root = &host.scene().anchor(second).unwrap().children()[0].root;
        assert_eq!(first_root.children[0].transform, moved);
        assert_eq!(second_root.children[0].transform, Pose::IDENTITY);
        assert_eq!(chair.handle().unwrap().root().children[0].transform, Pose::IDENTITY);
    }

    #[tokio::test]
    async fn test_pending_model_leaves_scene_untouched() {
        let (release, gate) = mpsc::channel();
        let loader = StalledLoader {
            gate: Mutex::new(gate),
        };
        let lamp = AssetEntity::load(
            AssetId::from_raw(1),
            AssetDescriptor::new("lamp", "lamp.usdz", None),
            Arc::new(loader),
            &Handle::current(),
        );
        let mut host = host_with_floor();

        assert_eq!(host.on_confirmed_placement_changed(Some(&lamp)), PlacementOutcome::NotReady);
        assert_eq!(host.scene().anchor_count(), 0);

        drop(release);
    }

    #[tokio::test]
    async fn test_no_plane_drops_placement() {
        let mut host = SceneHost::new(SimulatedSession::default(), &SessionConfig::default());
        let chair = ready_chair().await;

        assert_eq!(host.on_confirmed_placement_changed(Some(&chair)), PlacementOutcome::NoPlane);
        assert_eq!(host.scene().anchor_count(), 0);
    }
}

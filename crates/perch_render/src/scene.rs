//! Scene graph of anchored model instances

use crate::{DetectedPlane, PlaneId};
use perch_asset::ModelInstance;
use perch_core::math::Pose;
use std::fmt;

/// Anchor handle (opaque ID)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AnchorId(u64);

impl AnchorId {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anchor-{}", self.0)
    }
}

/// Node fixed to a detected plane
#[derive(Debug)]
pub struct Anchor {
    id: AnchorId,
    plane: PlaneId,
    pose: Pose,
    children: Vec<ModelInstance>,
}

impl Anchor {
    pub fn id(&self) -> AnchorId {
        self.id
    }

    pub fn plane(&self) -> PlaneId {
        self.plane
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn children(&self) -> &[ModelInstance] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [ModelInstance] {
        &mut self.children
    }

    pub fn add_child(&mut self, instance: ModelInstance) {
        self.children.push(instance);
    }
}

/// The live scene. Anchors are only ever added.
pub struct SceneGraph {
    next_anchor_id: u64,
    anchors: Vec<Anchor>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            next_anchor_id: 1,
            anchors: Vec::new(),
        }
    }

    /// Create an empty anchor at `plane`'s pose
    pub fn add_anchor(&mut self, plane: &DetectedPlane) -> &mut Anchor {
        let id = AnchorId(self.next_anchor_id);
        self.next_anchor_id += 1;

        self.anchors.push(Anchor {
            id,
            plane: plane.id,
            pose: plane.pose,
            children: Vec::new(),
        });
        let index = self.anchors.len() - 1;
        &mut self.anchors[index]
    }

    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.iter().find(|anchor| anchor.id == id)
    }

    pub fn anchor_mut(&mut self, id: AnchorId) -> Option<&mut Anchor> {
        self.anchors.iter_mut().find(|anchor| anchor.id == id)
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Model instances across all anchors
    pub fn instance_count(&self) -> usize {
        self.anchors.iter().map(|anchor| anchor.children.len()).sum()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlaneAlignment;
    use perch_asset::{ModelHandle, ModelNode};
    use perch_core::math::{Vec2, Vec3};

    #[test]
    fn test_anchor_ids_are_unique() {
        let plane = DetectedPlane {
            id: PlaneId(7),
            alignment: PlaneAlignment::Horizontal,
            pose: Pose::from_translation(Vec3::new(0.0, -1.0, -2.0)),
            extent: Vec2::ONE,
        };
        let handle = ModelHandle::new("chair.usdz", vec![1u8], ModelNode::new("chair"));

        let mut scene = SceneGraph::new();
        let first = scene.add_anchor(&plane).id();
        let second = {
            let anchor = scene.add_anchor(&plane);
            anchor.add_child(handle.clone_recursive());
            anchor.id()
        };

        assert_ne!(first, second);
        assert_eq!(scene.anchor_count(), 2);
        assert_eq!(scene.instance_count(), 1);
        assert_eq!(scene.anchor(second).unwrap().plane(), PlaneId(7));
        assert_eq!(scene.anchor(second).unwrap().pose(), plane.pose);
    }
}

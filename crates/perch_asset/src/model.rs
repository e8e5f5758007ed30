//! Loaded models and their placed instances

use perch_core::math::Pose;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Node in a model's hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    pub name: String,
    pub transform: Pose,
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Pose::IDENTITY,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: ModelNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ModelNode::node_count).sum::<usize>()
    }
}

#[derive(Debug)]
struct ModelData {
    source: PathBuf,
    geometry: Arc<[u8]>,
    root: ModelNode,
}

/// Loaded model, shareable between the catalog and the scene.
///
/// Cloning the handle shares the same model. Use [`ModelHandle::clone_recursive`]
/// to get an independent instance for placement.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    data: Arc<ModelData>,
}

impl ModelHandle {
    pub fn new(
        source: impl Into<PathBuf>,
        geometry: impl Into<Arc<[u8]>>,
        root: ModelNode,
    ) -> Self {
        Self {
            data: Arc::new(ModelData {
                source: source.into(),
                geometry: geometry.into(),
                root,
            }),
        }
    }

    pub fn source(&self) -> &Path {
        &self.data.source
    }

    pub fn root(&self) -> &ModelNode {
        &self.data.root
    }

    pub fn geometry_len(&self) -> usize {
        self.data.geometry.len()
    }

    /// Structural clone: the node hierarchy is copied, the immutable
    /// geometry payload stays shared.
    pub fn clone_recursive(&self) -> ModelInstance {
        ModelInstance {
            source: self.data.source.clone(),
            geometry: Arc::clone(&self.data.geometry),
            root: self.data.root.clone(),
        }
    }

    /// Whether two handles refer to the same loaded model
    pub fn ptr_eq(&self, other: &ModelHandle) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

/// Independent copy of a model, owned by the scene graph.
#[derive(Debug)]
pub struct ModelInstance {
    source: PathBuf,
    geometry: Arc<[u8]>,
    pub root: ModelNode,
}

impl ModelInstance {
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn shares_geometry_with(&self, other: &ModelInstance) -> bool {
        Arc::ptr_eq(&self.geometry, &other.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_core::math::Vec3;

    fn chair() -> ModelHandle {
        let root = ModelNode::new("chair")
            .with_child(ModelNode::new("seat"))
            .with_child(ModelNode::new("back"));
        ModelHandle::new("chair.usdz", vec![1u8, 2, 3], root)
    }

    #[test]
    fn test_clone_recursive_is_independent() {
        let handle = chair();
        let mut first = handle.clone_recursive();
        let second = handle.clone_recursive();

        first.root.children[0].transform = Pose::from_translation(Vec3::Y);

        assert_eq!(second.root.children[0].transform, Pose::IDENTITY);
        assert_eq!(handle.root().children[0].transform, Pose::IDENTITY);
        assert!(first.shares_geometry_with(&second));
    }

    #[test]
    fn test_node_count() {
        assert_eq!(chair().root().node_count(), 3);
    }
}

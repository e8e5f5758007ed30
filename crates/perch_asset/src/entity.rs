//! Loadable model entries
//!
//! An [`AssetEntity`] starts loading the moment it is constructed. The load
//! runs on a blocking worker and reports back exactly once through a oneshot
//! channel, which the UI thread polls during its refresh cycle. Dropping the
//! entity drops the receiver: the result is discarded, the load itself is
//! not interrupted.

use std::path::Path;
use std::sync::Arc;

use perch_core::AssetId;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::{AssetDescriptor, LoadError, ModelHandle, ModelLoader};

type LoadResult = Result<ModelHandle, LoadError>;

/// Loaded-handle slot. Leaves `Pending` once and never changes again.
#[derive(Debug, Clone)]
pub enum LoadSlot {
    Pending,
    Ready(ModelHandle),
    Failed,
}

/// A catalog entry and its asynchronously loaded model
#[derive(Debug)]
pub struct AssetEntity {
    id: AssetId,
    descriptor: AssetDescriptor,
    slot: LoadSlot,
    completion: Option<oneshot::Receiver<LoadResult>>,
}

impl AssetEntity {
    /// Create the entity and start loading its model on `runtime`'s blocking pool.
    pub fn load(
        id: AssetId,
        descriptor: AssetDescriptor,
        loader: Arc<dyn ModelLoader>,
        runtime: &Handle,
    ) -> Self {
        let (tx, rx) = oneshot::channel();
        let path = descriptor.model_path().to_path_buf();

        runtime.spawn_blocking(move || {
            let result = loader.load(&path);
            // Err here only means the entity is gone
            let _ = tx.send(result);
        });

        tracing::trace!(model = descriptor.name(), "model load started");

        Self {
            id,
            descriptor,
            slot: LoadSlot::Pending,
            completion: Some(rx),
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &AssetDescriptor {
        &self.descriptor
    }

    pub fn slot(&self) -> &LoadSlot {
        &self.slot
    }

    /// The loaded model, only once the slot is `Ready`
    pub fn handle(&self) -> Option<&ModelHandle> {
        match &self.slot {
            LoadSlot::Ready(handle) => Some(handle),
            LoadSlot::Pending | LoadSlot::Failed => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.slot, LoadSlot::Ready(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.slot, LoadSlot::Pending)
    }

    /// Check for a load result without blocking.
    ///
    /// Returns `true` if the slot settled during this call.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = self.completion.as_mut() else {
            return false;
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => Err(abandoned(self.descriptor.model_path())),
        };

        self.completion = None;
        self.settle(result);
        true
    }

    /// Wait for the load to settle. Returns immediately if it already has.
    pub async fn wait(&mut self) {
        let Some(rx) = self.completion.take() else {
            return;
        };

        let result = rx
            .await
            .unwrap_or_else(|_| Err(abandoned(self.descriptor.model_path())));
        self.settle(result);
    }

    fn settle(&mut self, result: LoadResult) {
        debug_assert!(self.is_pending(), "load slot settled twice");

        self.slot = match result {
            Ok(handle) => {
                tracing::info!(model = self.name(), "model loaded");
                LoadSlot::Ready(handle)
            }
            Err(e) => {
                tracing::warn!(model = self.name(), error = %e, "unable to load model");
                LoadSlot::Failed
            }
        };
    }
}

fn abandoned(path: &Path) -> LoadError {
    LoadError::Abandoned {
        path: path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelNode;
    use std::sync::{mpsc, Mutex};

    /// Holds every load until the test releases it
    struct GatedLoader {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl ModelLoader for GatedLoader {
        fn load(&self, path: &Path) -> Result<ModelHandle, LoadError> {
            self.gate
                .lock()
                .unwrap()
                .recv()
                .map_err(|_| LoadError::NotFound {
                    path: path.to_path_buf(),
                })?;
            Ok(ModelHandle::new(path, vec![0u8; 4], ModelNode::new("gated")))
        }
    }

    struct PanickingLoader;

    impl ModelLoader for PanickingLoader {
        fn load(&self, _path: &Path) -> Result<ModelHandle, LoadError> {
            panic!("loader blew up");
        }
    }

    fn gated() -> (mpsc::Sender<()>, Arc<dyn ModelLoader>) {
        let (tx, rx) = mpsc::channel();
        let loader = GatedLoader {
            gate: Mutex::new(rx),
        };
        (tx, Arc::new(loader))
    }

    fn chair() -> AssetDescriptor {
        AssetDescriptor::new("chair", "chair.usdz", None)
    }

    #[tokio::test]
    async fn test_pending_until_released() {
        let (release, loader) = gated();
        let mut entity =
            AssetEntity::load(AssetId::from_raw(0), chair(), loader, &Handle::current());

        assert!(!entity.poll());
        assert!(entity.is_pending());
        assert!(entity.handle().is_none());

        release.send(()).unwrap();
        entity.wait().await;

        assert!(entity.is_ready());
        assert_eq!(entity.handle().unwrap().root().name, "gated");
    }

    #[tokio::test]
    async fn test_settles_exactly_once() {
        let (release, loader) = gated();
        let mut entity =
            AssetEntity::load(AssetId::from_raw(0), chair(), loader, &Handle::current());
        release.send(()).unwrap();
        entity.wait().await;

        let first = entity.handle().cloned().unwrap();
        assert!(!entity.poll());
        entity.wait().await;

        assert!(entity.handle().unwrap().ptr_eq(&first));
    }

    #[tokio::test]
    async fn test_failed_load_has_no_handle() {
        let (release, loader) = gated();
        drop(release);

        let mut entity =
            AssetEntity::load(AssetId::from_raw(3), chair(), loader, &Handle::current());
        entity.wait().await;

        assert!(matches!(entity.slot(), LoadSlot::Failed));
        assert!(entity.handle().is_none());
        assert!(!entity.poll());
    }

    #[tokio::test]
    async fn test_panicking_loader_settles_failed() {
        let mut entity = AssetEntity::load(
            AssetId::from_raw(0),
            chair(),
            Arc::new(PanickingLoader),
            &Handle::current(),
        );
        entity.wait().await;

        assert!(matches!(entity.slot(), LoadSlot::Failed));
    }

    #[tokio::test]
    async fn test_dropping_entity_discards_result() {
        let (release, loader) = gated();
        let entity = AssetEntity::load(AssetId::from_raw(0), chair(), loader, &Handle::current());
        drop(entity);

        // The blocking load still runs to completion with nobody listening
        release.send(()).unwrap();
    }
}

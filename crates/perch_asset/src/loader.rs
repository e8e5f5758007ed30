//! Model loading collaborator
//!
//! Loading is synchronous from the loader's point of view; [`AssetEntity`]
//! moves it onto a blocking worker and reports back once.
//!
//! [`AssetEntity`]: crate::AssetEntity

use crate::{LoadError, ModelHandle, ModelNode};
use std::io::ErrorKind;
use std::path::Path;

/// Anything that can turn a packaged model file into a handle.
pub trait ModelLoader: Send + Sync + 'static {
    fn load(&self, path: &Path) -> Result<ModelHandle, LoadError>;
}

/// Loads model files from disk.
///
/// The file format itself is not interpreted; the bytes become the shared
/// geometry payload under a single root node named after the file stem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsModelLoader;

impl ModelLoader for FsModelLoader {
    fn load(&self, path: &Path) -> Result<ModelHandle, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => LoadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        if bytes.is_empty() {
            return Err(LoadError::Malformed {
                path: path.to_path_buf(),
                reason: "file is empty".to_string(),
            });
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        Ok(ModelHandle::new(path, bytes, ModelNode::new(name)))
    }
}

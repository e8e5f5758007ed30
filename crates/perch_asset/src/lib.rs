//! Perch Asset Pipeline
//!
//! Discovery of packaged models, asynchronous loading, and the loaded
//! model handles the scene clones from.

pub mod catalog;
pub mod entity;
pub mod error;
pub mod loader;
pub mod model;

pub use catalog::{discover, try_discover, AssetCatalog, AssetDescriptor, CatalogConfig};
pub use entity::{AssetEntity, LoadSlot};
pub use error::{CatalogError, LoadError};
pub use loader::{FsModelLoader, ModelLoader};
pub use model::{ModelHandle, ModelInstance, ModelNode};

//! Asset Catalog - Discovery of packaged models
//!
//! Scans the bundled resource directory once at startup. Every file with the
//! model extension becomes a descriptor keyed by its file stem, paired with a
//! companion thumbnail image when one exists.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use perch_core::AssetId;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use crate::{AssetEntity, CatalogError, ModelLoader};

/// Default directory where packaged models live
pub const RESOURCE_DIR: &str = "assets/models";

/// Where and what to scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub resource_dir: PathBuf,
    /// Model file extension, without the dot
    pub model_extension: String,
    /// Thumbnail extensions tried in order, without the dot
    pub thumbnail_extensions: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            resource_dir: PathBuf::from(RESOURCE_DIR),
            model_extension: "usdz".to_string(),
            thumbnail_extensions: vec!["png".to_string(), "jpg".to_string()],
        }
    }
}

/// One packaged model: identifier and thumbnail reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    name: String,
    model_path: PathBuf,
    thumbnail: Option<PathBuf>,
}

impl AssetDescriptor {
    pub fn new(
        name: impl Into<String>,
        model_path: impl Into<PathBuf>,
        thumbnail: Option<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            model_path: model_path.into(),
            thumbnail,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn thumbnail(&self) -> Option<&Path> {
        self.thumbnail.as_deref()
    }
}

/// Enumerate descriptors, failing if the directory cannot be read.
///
/// Order is whatever the directory listing yields.
pub fn try_discover(config: &CatalogConfig) -> Result<Vec<AssetDescriptor>, CatalogError> {
    let entries =
        std::fs::read_dir(&config.resource_dir).map_err(|source| CatalogError::Unreadable {
            path: config.resource_dir.clone(),
            source,
        })?;

    let mut descriptors = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        if !path.is_file() || !has_extension(&path, &config.model_extension) {
            continue;
        }

        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            tracing::warn!(path = ?path, "skipping model with non UTF-8 name");
            continue;
        };

        let thumbnail = find_thumbnail(&config.resource_dir, name, &config.thumbnail_extensions);
        if thumbnail.is_none() {
            tracing::warn!(model = name, "no thumbnail found");
        }

        descriptors.push(AssetDescriptor::new(name, path.clone(), thumbnail));
    }

    tracing::debug!(
        dir = ?config.resource_dir,
        count = descriptors.len(),
        "discovered models"
    );
    Ok(descriptors)
}

/// Enumerate descriptors; an unreadable directory yields an empty list.
pub fn discover(config: &CatalogConfig) -> Vec<AssetDescriptor> {
    try_discover(config).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "model catalog is empty");
        Vec::new()
    })
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

fn find_thumbnail(dir: &Path, name: &str, extensions: &[String]) -> Option<PathBuf> {
    extensions
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|candidate| candidate.is_file())
}

/// The catalog owns one [`AssetEntity`] per descriptor.
///
/// Entities are addressed by [`AssetId`], their position in the catalog.
pub struct AssetCatalog {
    entities: Vec<AssetEntity>,
}

impl AssetCatalog {
    /// Discover models and start loading every one of them.
    pub fn open(config: &CatalogConfig, loader: Arc<dyn ModelLoader>, runtime: &Handle) -> Self {
        Self::from_descriptors(discover(config), loader, runtime)
    }

    pub fn from_descriptors(
        descriptors: Vec<AssetDescriptor>,
        loader: Arc<dyn ModelLoader>,
        runtime: &Handle,
    ) -> Self {
        let entities = descriptors
            .into_iter()
            .enumerate()
            .map(|(index, descriptor)| {
                AssetEntity::load(
                    AssetId::from_raw(index as u32),
                    descriptor,
                    Arc::clone(&loader),
                    runtime,
                )
            })
            .collect();

        Self { entities }
    }

    /// Descriptors in catalog order
    pub fn list(&self) -> Vec<&AssetDescriptor> {
        self.entities.iter().map(AssetEntity::descriptor).collect()
    }

    pub fn get(&self, id: AssetId) -> Option<&AssetEntity> {
        self.entities.get(id.index())
    }

    pub fn find(&self, name: &str) -> Option<&AssetEntity> {
        self.entities.iter().find(|entity| entity.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetEntity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_pending()).count()
    }

    /// Deliver finished loads. Returns how many entities settled in this call.
    pub fn poll_loads(&mut self) -> usize {
        self.entities
            .iter_mut()
            .map(|entity| entity.poll())
            .filter(|settled| *settled)
            .count()
    }

    /// Wait until every entity has settled.
    pub async fn wait_for_loads(&mut self) {
        for entity in &mut self.entities {
            entity.wait().await;
        }
    }
}

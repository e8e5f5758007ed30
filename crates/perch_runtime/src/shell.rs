//! UI shell
//!
//! Glues the catalog, the placement controller and the scene host together
//! and decides which of the two views is on screen. All state lives on the
//! thread that calls [`Shell::refresh`]; anything that has to happen "on the
//! next tick" goes through the shell's message queue.

use std::fmt;
use std::path::Path;

use anyhow::{anyhow, Result};
use perch_asset::AssetCatalog;
use perch_core::time::RefreshClock;
use perch_core::{AssetId, PlacementController, PlacementState};
use perch_render::{ArSession, PlacementOutcome, SceneHost};
use perch_services::ModelRef;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Work deferred to the start of the next refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMessage {
    /// Reset the confirmed placement with this serial, if it is still current
    ClearConfirmed { serial: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Picker,
    ConfirmBar,
}

/// One entry of the model picker strip
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail<'a> {
    pub id: AssetId,
    pub name: &'a str,
    pub image: Option<&'a Path>,
}

/// What is on screen
#[derive(Debug, Clone, PartialEq)]
pub enum View<'a> {
    Picker(Vec<Thumbnail<'a>>),
    ConfirmBar { model: &'a str },
}

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Picker(thumbnails) if thumbnails.is_empty() => write!(f, "[picker] no models"),
            View::Picker(thumbnails) => {
                write!(f, "[picker]")?;
                for thumbnail in thumbnails {
                    match thumbnail.image {
                        Some(image) => write!(
                            f,
                            "  {}: {} ({})",
                            thumbnail.id.raw(),
                            thumbnail.name,
                            image.display()
                        )?,
                        None => write!(f, "  {}: {}", thumbnail.id.raw(), thumbnail.name)?,
                    }
                }
                Ok(())
            }
            View::ConfirmBar { model } => write!(f, "[placing {model}]  (x) cancel  (ok) confirm"),
        }
    }
}

pub struct Shell<S: ArSession> {
    catalog: AssetCatalog,
    controller: PlacementController,
    host: SceneHost<S>,
    clock: RefreshClock,
    tx: UnboundedSender<ShellMessage>,
    rx: UnboundedReceiver<ShellMessage>,
}

impl<S: ArSession> Shell<S> {
    pub fn new(catalog: AssetCatalog, host: SceneHost<S>, clock: RefreshClock) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            catalog,
            controller: PlacementController::new(),
            host,
            clock,
            tx,
            rx,
        }
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn controller(&self) -> &PlacementController {
        &self.controller
    }

    pub fn host(&self) -> &SceneHost<S> {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut SceneHost<S> {
        &mut self.host
    }

    pub fn clock(&self) -> &RefreshClock {
        &self.clock
    }

    pub fn view_mode(&self) -> ViewMode {
        if self.controller.is_placement_enabled() {
            ViewMode::ConfirmBar
        } else {
            ViewMode::Picker
        }
    }

    pub fn view(&self) -> View<'_> {
        match self.controller.state() {
            PlacementState::Selecting(id) => View::ConfirmBar {
                model: self.catalog.get(id).map(|e| e.name()).unwrap_or("?"),
            },
            PlacementState::Idle => View::Picker(
                self.catalog
                    .iter()
                    .map(|entity| Thumbnail {
                        id: entity.id(),
                        name: entity.name(),
                        image: entity.descriptor().thumbnail(),
                    })
                    .collect(),
            ),
        }
    }

    /// Resolve a picker reference to a catalog id
    pub fn resolve(&self, model: &ModelRef) -> Result<AssetId> {
        let entity = match model {
            ModelRef::Index(index) => u32::try_from(*index)
                .ok()
                .and_then(|raw| self.catalog.get(AssetId::from_raw(raw))),
            ModelRef::Name(name) => self.catalog.find(name),
        };
        entity
            .map(|e| e.id())
            .ok_or_else(|| anyhow!("no model {model:?} in the catalog"))
    }

    /// Picker tap
    pub fn select(&mut self, model: &ModelRef) -> Result<AssetId> {
        let id = self.resolve(model)?;
        self.controller.select(id)?;
        tracing::info!(model = self.name_of(id), "selected model");
        Ok(id)
    }

    /// Cancel button
    pub fn cancel(&mut self) -> Result<()> {
        let id = self.controller.cancel()?;
        tracing::info!(model = self.name_of(id), "cancel model placement");
        Ok(())
    }

    /// Confirm button. Readiness is checked by the scene host, not here.
    pub fn confirm(&mut self) -> Result<()> {
        let placement = self.controller.confirm()?;
        tracing::info!(model = self.name_of(placement.asset), "confirm model placement");
        Ok(())
    }

    /// One UI refresh cycle.
    pub fn refresh(&mut self) -> PlacementOutcome {
        while let Ok(message) = self.rx.try_recv() {
            match message {
                ShellMessage::ClearConfirmed { serial } => {
                    self.controller.clear_confirmed_if(serial);
                }
            }
        }

        self.catalog.poll_loads();

        let outcome = match self.controller.confirmed() {
            Some(placement) => {
                let entity = self.catalog.get(placement.asset);
                let outcome = self.host.on_confirmed_placement_changed(entity);
                self.controller.mark_consumed(placement.serial);
                // The receiver lives in `self`, so this cannot fail
                let _ = self.tx.send(ShellMessage::ClearConfirmed {
                    serial: placement.serial,
                });
                outcome
            }
            None => PlacementOutcome::Idle,
        };

        let tick = self.clock.advance_tick();
        tracing::trace!(tick, ?outcome, "refresh");
        outcome
    }

    /// Block the UI until every model has settled
    pub async fn wait_for_loads(&mut self) {
        self.catalog.wait_for_loads().await;
    }

    fn name_of(&self, id: AssetId) -> &str {
        self.catalog.get(id).map(|e| e.name()).unwrap_or("?")
    }
}

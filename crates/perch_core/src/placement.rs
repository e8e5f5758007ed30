//! Placement-confirmation workflow
//!
//! The controller tracks which catalog entry the user picked and hands a
//! confirmed pick to the scene as a one-shot signal. It never owns assets,
//! only their ids, and it never checks whether a model finished loading:
//! the scene host re-checks readiness when it consumes the signal.
//!
//! ```text
//!           select(id)
//!   Idle ---------------> Selecting(id)
//!    ^                        |
//!    |   cancel()             |
//!    +------------------------+
//!    |   confirm()            |  (id copied into the confirmed slot)
//!    +------------------------+
//! ```
//!
//! All transitions run on the UI thread, so there is no locking here.

use crate::AssetId;
use thiserror::Error;

/// Visible state of the placement UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementState {
    /// No selection, model picker visible
    Idle,
    /// A model is tentatively chosen, confirm/cancel bar visible
    Selecting(AssetId),
}

/// Rejected transitions. None of them change state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("model {current} is already selected for placement")]
    AlreadySelecting { current: AssetId },

    #[error("no model is selected for placement")]
    NothingSelected,
}

/// One-shot signal handing a confirmed pick to the scene.
///
/// `serial` tells apart two confirmations of the same asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedPlacement {
    pub asset: AssetId,
    pub serial: u64,
}

/// Placement state machine plus the confirmed-placement signal.
#[derive(Debug, Default)]
pub struct PlacementController {
    selection: Option<AssetId>,
    confirmed: Option<ConfirmedPlacement>,
    /// The scene host has seen `confirmed`; only its deferred clear is pending
    consumed: bool,
    next_serial: u64,
}

impl PlacementController {
    pub fn new() -> Self {
        Self {
            selection: None,
            confirmed: None,
            consumed: false,
            next_serial: 0,
        }
    }

    pub fn state(&self) -> PlacementState {
        match self.selection {
            Some(id) => PlacementState::Selecting(id),
            None => PlacementState::Idle,
        }
    }

    /// Whether the confirm/cancel bar should be shown instead of the picker.
    pub fn is_placement_enabled(&self) -> bool {
        self.selection.is_some()
    }

    pub fn selection(&self) -> Option<AssetId> {
        self.selection
    }

    /// `Idle -> Selecting(asset)`
    pub fn select(&mut self, asset: AssetId) -> Result<(), PlacementError> {
        if let Some(current) = self.selection {
            return Err(PlacementError::AlreadySelecting { current });
        }

        tracing::debug!(asset = %asset, "model selected for placement");
        self.selection = Some(asset);
        Ok(())
    }

    /// `Selecting -> Idle` without touching the scene.
    pub fn cancel(&mut self) -> Result<AssetId, PlacementError> {
        let asset = self.selection.take().ok_or(PlacementError::NothingSelected)?;
        tracing::debug!(asset = %asset, "placement cancelled");
        Ok(asset)
    }

    /// `Selecting -> Idle`, publishing the selection as the confirmed placement.
    ///
    /// The selection is cleared whether or not the model has loaded.
    pub fn confirm(&mut self) -> Result<ConfirmedPlacement, PlacementError> {
        let asset = self.selection.take().ok_or(PlacementError::NothingSelected)?;

        let placement = ConfirmedPlacement {
            asset,
            serial: self.next_serial,
        };
        self.next_serial += 1;

        let previous = self.confirmed.replace(placement);
        let previous_consumed = std::mem::replace(&mut self.consumed, false);
        match previous {
            Some(previous) if !previous_consumed => tracing::warn!(
                previous = %previous.asset,
                asset = %asset,
                "unconsumed placement superseded by a newer confirmation"
            ),
            Some(previous) => tracing::debug!(
                previous = %previous.asset,
                asset = %asset,
                "consumed placement replaced before its clear"
            ),
            None => {}
        }

        tracing::debug!(asset = %asset, serial = placement.serial, "placement confirmed");
        Ok(placement)
    }

    /// Peek at the confirmed-placement signal.
    pub fn confirmed(&self) -> Option<ConfirmedPlacement> {
        self.confirmed
    }

    /// Record that the scene host has acted on confirmation `serial`.
    pub fn mark_consumed(&mut self, serial: u64) -> bool {
        match self.confirmed {
            Some(placement) if placement.serial == serial => {
                self.consumed = true;
                true
            }
            _ => false,
        }
    }

    /// Whether the current signal has already been acted on
    pub fn is_consumed(&self) -> bool {
        self.confirmed.is_some() && self.consumed
    }

    /// Reset the confirmed-placement signal. Returns what was cleared.
    pub fn clear_confirmed(&mut self) -> Option<ConfirmedPlacement> {
        self.consumed = false;
        self.confirmed.take()
    }

    /// Reset the signal only if it still holds confirmation `serial`.
    pub fn clear_confirmed_if(&mut self, serial: u64) -> bool {
        match self.confirmed {
            Some(placement) if placement.serial == serial => {
                self.confirmed = None;
                self.consumed = false;
                true
            }
            _ => false,
        }
    }
}

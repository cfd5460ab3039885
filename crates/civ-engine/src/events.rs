//! UI refresh notifications
//!
//! The display redraws from the live [`crate::SharedRadio`] state, so the
//! protocol side only has to tell it that something changed. Delivery is
//! fire-and-forget: no acknowledgement, and a full channel drops the event
//! rather than stalling the protocol task.

use civ_wire::{RadioMode, Vfo};
use tokio::sync::mpsc;
use tracing::debug;

/// State changes the protocol engine reports to the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    /// A VFO was tuned to a new frequency
    FrequencyChanged { vfo: Vfo, hz: u64 },
    /// A VFO's operating mode changed
    ModeChanged { vfo: Vfo, mode: RadioMode },
    /// The active VFO changed
    VfoChanged { vfo: Vfo },
    /// Tuning crossed into another configured band
    BandChanged { band: String },
}

/// Fire-and-forget sender for [`StateEvent`]s
#[derive(Debug, Clone)]
pub struct UiNotifier {
    tx: mpsc::Sender<StateEvent>,
}

impl UiNotifier {
    pub fn new(tx: mpsc::Sender<StateEvent>) -> Self {
        Self { tx }
    }

    /// Send without waiting. The UI repaints from live state, so a dropped
    /// event only costs one repaint.
    pub fn notify(&self, event: StateEvent) {
        if let Err(e) = self.tx.try_send(event) {
            debug!("dropping UI event: {}", e);
        }
    }
}

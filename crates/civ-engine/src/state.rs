//! Shared radio state
//!
//! The UI/input side and the protocol task both read and mutate the same
//! live state: current VFO, per-VFO frequency and mode, PTT. [`SharedRadio`]
//! is the single synchronization point between them — a mutex-guarded
//! owner instead of bare shared globals. Critical sections are short field
//! reads and writes; the lock is never held across I/O, so contention with
//! the UI stays in the microsecond range and a momentarily stale reading
//! on either side is acceptable.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use civ_wire::{RadioMode, Vfo};

use crate::bands::{Band, BandPlan};

/// Per-VFO tuning state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VfoSettings {
    /// Frequency in Hz
    pub frequency_hz: u64,
    /// Operating mode
    pub mode: RadioMode,
}

/// Live state of the transceiver as both the UI and the protocol see it
#[derive(Debug)]
pub struct RadioState {
    current: Vfo,
    vfo_a: VfoSettings,
    vfo_b: VfoSettings,
    tx: bool,
    bands: BandPlan,
    active_band: Option<usize>,
}

impl RadioState {
    /// Create the state with both VFOs on the given frequency and mode
    pub fn new(bands: BandPlan, frequency_hz: u64, mode: RadioMode) -> Self {
        let settings = VfoSettings { frequency_hz, mode };
        let active_band = bands.find(frequency_hz);

        Self {
            current: Vfo::A,
            vfo_a: settings,
            vfo_b: settings,
            tx: false,
            bands,
            active_band,
        }
    }

    fn vfo(&self, vfo: Vfo) -> &VfoSettings {
        match vfo {
            Vfo::A => &self.vfo_a,
            Vfo::B => &self.vfo_b,
        }
    }

    fn vfo_mut(&mut self, vfo: Vfo) -> &mut VfoSettings {
        match vfo {
            Vfo::A => &mut self.vfo_a,
            Vfo::B => &mut self.vfo_b,
        }
    }

    /// The active VFO
    pub fn current_vfo(&self) -> Vfo {
        self.current
    }

    pub fn set_current_vfo(&mut self, vfo: Vfo) {
        self.current = vfo;
    }

    pub fn frequency(&self, vfo: Vfo) -> u64 {
        self.vfo(vfo).frequency_hz
    }

    pub fn set_frequency(&mut self, vfo: Vfo, hz: u64) {
        self.vfo_mut(vfo).frequency_hz = hz;
    }

    pub fn mode(&self, vfo: Vfo) -> RadioMode {
        self.vfo(vfo).mode
    }

    pub fn set_mode(&mut self, vfo: Vfo, mode: RadioMode) {
        self.vfo_mut(vfo).mode = mode;
    }

    /// Frequency of the active VFO
    pub fn selected_frequency(&self) -> u64 {
        self.frequency(self.current)
    }

    /// Mode of the active VFO
    pub fn selected_mode(&self) -> RadioMode {
        self.mode(self.current)
    }

    /// PTT/transmit state
    pub fn ptt(&self) -> bool {
        self.tx
    }

    pub fn set_ptt(&mut self, tx: bool) {
        self.tx = tx;
    }

    /// The currently active band, if the frequency sits inside the plan
    pub fn active_band(&self) -> Option<&Band> {
        self.active_band.and_then(|idx| self.bands.get(idx))
    }

    /// Full set-frequency path: activate the band containing `hz` (if it
    /// differs from the active one) and apply the frequency to the active
    /// VFO. Returns the name of a newly activated band so the caller can
    /// notify the UI.
    pub fn tune(&mut self, hz: u64) -> Option<String> {
        let activated = match self.bands.find(hz) {
            Some(idx) if self.active_band != Some(idx) => {
                self.active_band = Some(idx);
                self.bands.get(idx).map(|b| b.name.clone())
            }
            _ => None,
        };

        let vfo = self.current;
        self.set_frequency(vfo, hz);
        activated
    }
}

/// Handle to the mutex-guarded radio state.
///
/// Clone freely; all clones lock the same state.
#[derive(Debug, Clone)]
pub struct SharedRadio {
    inner: Arc<Mutex<RadioState>>,
}

impl SharedRadio {
    pub fn new(state: RadioState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Lock the state. Keep the section short and never hold the guard
    /// across an await point or I/O call.
    pub fn lock(&self) -> MutexGuard<'_, RadioState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> RadioState {
        RadioState::new(BandPlan::hf_default(), 14_250_000, RadioMode::Usb)
    }

    #[test]
    fn test_initial_state() {
        let state = state();
        assert_eq!(state.current_vfo(), Vfo::A);
        assert_eq!(state.selected_frequency(), 14_250_000);
        assert_eq!(state.selected_mode(), RadioMode::Usb);
        assert!(!state.ptt());
        assert_eq!(state.active_band().unwrap().name, "20m");
    }

    #[test]
    fn test_per_vfo_settings_independent() {
        let mut state = state();
        state.set_frequency(Vfo::B, 7_030_000);
        state.set_mode(Vfo::B, RadioMode::Cw);

        assert_eq!(state.frequency(Vfo::A), 14_250_000);
        assert_eq!(state.frequency(Vfo::B), 7_030_000);
        assert_eq!(state.mode(Vfo::A), RadioMode::Usb);
        assert_eq!(state.mode(Vfo::B), RadioMode::Cw);
    }

    #[test]
    fn test_tune_activates_band() {
        let mut state = state();

        // Within the same band: no activation
        assert_eq!(state.tune(14_074_000), None);
        assert_eq!(state.selected_frequency(), 14_074_000);

        // Into another band
        assert_eq!(state.tune(7_074_000).as_deref(), Some("40m"));
        assert_eq!(state.active_band().unwrap().name, "40m");
    }

    #[test]
    fn test_tune_outside_plan_keeps_band() {
        let mut state = state();
        assert_eq!(state.tune(13_500_000), None);
        assert_eq!(state.selected_frequency(), 13_500_000);
        // The previously active band remains
        assert_eq!(state.active_band().unwrap().name, "20m");
    }

    #[test]
    fn test_shared_handle_clones_share_state() {
        let radio = SharedRadio::new(state());
        let other = radio.clone();

        radio.lock().set_ptt(true);
        assert!(other.lock().ptt());
    }
}

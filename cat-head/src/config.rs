//! Daemon configuration
//!
//! A single JSON file describes the serial link, the band plan, and the
//! power-on state. Every field has a default, so a missing or partial
//! file degrades gracefully instead of keeping the device from booting.

use civ_engine::{Band, BandPlan, LinkConfig};
use civ_wire::RadioMode;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadConfig {
    /// Serial link settings
    pub link: LinkConfig,
    /// Band plan; empty means "no band activation side effects"
    pub bands: Vec<Band>,
    /// Power-on frequency for both VFOs
    pub initial_frequency_hz: u64,
    /// Power-on mode for both VFOs
    pub initial_mode: RadioMode,
}

impl Default for HeadConfig {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            bands: BandPlan::hf_default().bands().to_vec(),
            initial_frequency_hz: 14_250_000,
            initial_mode: RadioMode::Usb,
        }
    }
}

/// Load the configuration, falling back to defaults if the file is
/// missing or unreadable.
pub fn load_or_default(path: Option<&str>) -> HeadConfig {
    let Some(path) = path else {
        return HeadConfig::default();
    };

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!("invalid config {}: {}, using defaults", path, e);
                HeadConfig::default()
            }
        },
        Err(e) => {
            warn!("cannot read config {}: {}, using defaults", path, e);
            HeadConfig::default()
        }
    }
}

//! Band plan lookup
//!
//! Tuning into a frequency that falls inside a configured band activates
//! that band. The plan normally comes from the device configuration; a
//! built-in amateur HF plan is available as a fallback.

use serde::{Deserialize, Serialize};

/// One entry of the band plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    /// Display name ("20m", "40m", ...)
    pub name: String,
    /// Lower band edge in Hz, inclusive
    pub start_hz: u64,
    /// Upper band edge in Hz, inclusive
    pub stop_hz: u64,
}

impl Band {
    pub fn contains(&self, hz: u64) -> bool {
        (self.start_hz..=self.stop_hz).contains(&hz)
    }
}

/// Ordered list of bands the device knows about
#[derive(Debug, Clone, Default)]
pub struct BandPlan {
    bands: Vec<Band>,
}

impl BandPlan {
    pub fn new(bands: Vec<Band>) -> Self {
        Self { bands }
    }

    /// Index of the band containing `hz`, if any
    pub fn find(&self, hz: u64) -> Option<usize> {
        self.bands.iter().position(|b| b.contains(hz))
    }

    pub fn get(&self, index: usize) -> Option<&Band> {
        self.bands.get(index)
    }

    /// Default amateur HF band plan
    pub fn hf_default() -> Self {
        let band = |name: &str, start_hz: u64, stop_hz: u64| Band {
            name: name.to_string(),
            start_hz,
            stop_hz,
        };

        Self::new(vec![
            band("160m", 1_800_000, 2_000_000),
            band("80m", 3_500_000, 4_000_000),
            band("40m", 7_000_000, 7_300_000),
            band("30m", 10_100_000, 10_150_000),
            band("20m", 14_000_000, 14_350_000),
            band("17m", 18_068_000, 18_168_000),
            band("15m", 21_000_000, 21_450_000),
            band("12m", 24_890_000, 24_990_000),
            band("10m", 28_000_000, 29_700_000),
        ])
    }

    /// The plan's bands, in order
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }
}

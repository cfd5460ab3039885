//! Command codes served by the device, and VFO selectors
//!
//! The full CI-V command space is much larger; this table lists the
//! commands the device answers. Anything else gets a negative
//! acknowledgement from the dispatcher.

use crate::error::WireError;

/// Commands implemented by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCode {
    /// Read display frequency (0x03)
    ReadFrequency = 0x03,
    /// Read display mode (0x04)
    ReadMode = 0x04,
    /// Set frequency (0x05)
    SetFrequency = 0x05,
    /// Set mode (0x06)
    SetMode = 0x06,
    /// Select VFO (0x07)
    SelectVfo = 0x07,
    /// Transmit on/off and PTT state query (0x1C)
    Ptt = 0x1C,
    /// Read/write frequency of an explicitly addressed VFO (0x25)
    SelectedFrequency = 0x25,
    /// Read/write mode of the selected or unselected VFO (0x26)
    SelectedMode = 0x26,
}

impl TryFrom<u8> for CommandCode {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x03 => Ok(Self::ReadFrequency),
            0x04 => Ok(Self::ReadMode),
            0x05 => Ok(Self::SetFrequency),
            0x06 => Ok(Self::SetMode),
            0x07 => Ok(Self::SelectVfo),
            0x1C => Ok(Self::Ptt),
            0x25 => Ok(Self::SelectedFrequency),
            0x26 => Ok(Self::SelectedMode),
            _ => Err(WireError::UnknownCommand(value)),
        }
    }
}

/// VFO selector for Select VFO (0x07): VFO A
pub const SEL_VFO_A: u8 = 0x00;
/// VFO selector for Select VFO (0x07): VFO B
pub const SEL_VFO_B: u8 = 0x01;

/// The two tunable channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Vfo {
    A,
    B,
}

impl Vfo {
    /// The other channel
    pub fn other(&self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Map a Select VFO selector byte to a channel.
    ///
    /// Selectors for swap, A=B, dual watch etc. are accepted by the wire
    /// format but not by this device.
    pub fn from_selector(selector: u8) -> Result<Self, WireError> {
        match selector {
            SEL_VFO_A => Ok(Self::A),
            SEL_VFO_B => Ok(Self::B),
            other => Err(WireError::UnsupportedVfo(other)),
        }
    }
}

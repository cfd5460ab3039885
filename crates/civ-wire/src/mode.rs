//! Operating modes and their protocol codes
//!
//! The device distinguishes data variants of LSB/USB internally, but the
//! protocol mode byte collapses them: LSB-DATA encodes as plain LSB on the
//! wire. The reverse direction takes an explicit data flag, so
//! protocol→internal→protocol is the identity on mode codes while
//! internal→protocol→internal may drop the data variant.

use crate::error::WireError;

/// Protocol code for LSB
pub const MODE_LSB: u8 = 0x00;
/// Protocol code for USB
pub const MODE_USB: u8 = 0x01;
/// Protocol code for AM
pub const MODE_AM: u8 = 0x02;
/// Protocol code for CW
pub const MODE_CW: u8 = 0x03;
/// Protocol code for narrow FM
pub const MODE_NFM: u8 = 0x05;
/// Protocol code for CW reverse
pub const MODE_CWR: u8 = 0x07;

/// Operating modes of the transceiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RadioMode {
    /// Lower Sideband
    Lsb,
    /// Lower Sideband, data variant
    LsbData,
    /// Upper Sideband
    Usb,
    /// Upper Sideband, data variant
    UsbData,
    /// Amplitude Modulation
    Am,
    /// Continuous Wave
    Cw,
    /// CW Reverse
    CwR,
    /// Narrow FM
    NFm,
}

impl RadioMode {
    /// Whether this is a data variant
    pub fn is_data(&self) -> bool {
        matches!(self, Self::LsbData | Self::UsbData)
    }

    /// Map a protocol mode byte (plus the companion data flag) to the
    /// internal mode.
    ///
    /// Mode codes the device does not implement (RTTY, wide FM, ...) are
    /// rejected so the handler can answer NG without touching state.
    pub fn from_wire(code: u8, data: bool) -> Result<Self, WireError> {
        match code {
            MODE_LSB => Ok(if data { Self::LsbData } else { Self::Lsb }),
            MODE_USB => Ok(if data { Self::UsbData } else { Self::Usb }),
            MODE_AM => Ok(Self::Am),
            MODE_CW => Ok(Self::Cw),
            MODE_NFM => Ok(Self::NFm),
            MODE_CWR => Ok(Self::CwR),
            _ => Err(WireError::UnsupportedMode(code)),
        }
    }

    /// Map the internal mode to its protocol mode byte.
    ///
    /// Lossy: the data variant collapses into the base sideband code.
    pub fn to_wire(&self) -> u8 {
        match self {
            Self::Lsb | Self::LsbData => MODE_LSB,
            Self::Usb | Self::UsbData => MODE_USB,
            Self::Am => MODE_AM,
            Self::Cw => MODE_CW,
            Self::CwR => MODE_CWR,
            Self::NFm => MODE_NFM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WIRE_CODES: [u8; 6] = [MODE_LSB, MODE_USB, MODE_AM, MODE_CW, MODE_NFM, MODE_CWR];

    const ALL_MODES: [RadioMode; 8] = [
        RadioMode::Lsb,
        RadioMode::LsbData,
        RadioMode::Usb,
        RadioMode::UsbData,
        RadioMode::Am,
        RadioMode::Cw,
        RadioMode::CwR,
        RadioMode::NFm,
    ];

    #[test]
    fn test_wire_roundtrip_is_identity_on_codes() {
        for code in WIRE_CODES {
            let mode = RadioMode::from_wire(code, false).unwrap();
            assert_eq!(mode.to_wire(), code);
        }
    }

    #[test]
    fn test_data_variant_collapses_on_encode() {
        assert_eq!(RadioMode::LsbData.to_wire(), MODE_LSB);
        assert_eq!(RadioMode::UsbData.to_wire(), MODE_USB);

        // Without the flag the variant does not come back
        let decoded = RadioMode::from_wire(RadioMode::UsbData.to_wire(), false).unwrap();
        assert_eq!(decoded, RadioMode::Usb);

        // With the flag it does
        let decoded = RadioMode::from_wire(RadioMode::UsbData.to_wire(), true).unwrap();
        assert_eq!(decoded, RadioMode::UsbData);
    }

    #[test]
    fn test_unsupported_codes_rejected() {
        for code in [0x04u8, 0x06, 0x08, 0x12, 0xFF] {
            assert_eq!(
                RadioMode::from_wire(code, false),
                Err(WireError::UnsupportedMode(code))
            );
        }
    }

    proptest! {
        // protocol_mode(internal_mode(protocol_mode(m))) == protocol_mode(m)
        #[test]
        fn lossy_roundtrip_stable(idx in 0usize..8, data: bool) {
            let mode = ALL_MODES[idx];
            let code = mode.to_wire();
            let back = RadioMode::from_wire(code, data).unwrap();
            prop_assert_eq!(back.to_wire(), code);
        }
    }
}

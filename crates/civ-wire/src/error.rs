//! Error types for CI-V wire format handling

use thiserror::Error;

/// Errors raised while decoding frame fields
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    /// A nibble outside 0-9 in a BCD field.
    ///
    /// The protocol leaves this case unspecified; this implementation
    /// reports it instead of producing a silently wrong value.
    #[error("invalid BCD digit in byte 0x{0:02X}")]
    InvalidBcd(u8),

    /// Command byte with no entry in the dispatch table
    #[error("unknown command: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Protocol mode byte this device does not support
    #[error("unsupported mode code: 0x{0:02X}")]
    UnsupportedMode(u8),

    /// VFO selector other than the two supported channels
    /// (swap, dual watch and friends are valid on the wire but rejected here)
    #[error("unsupported VFO selector: 0x{0:02X}")]
    UnsupportedVfo(u8),
}

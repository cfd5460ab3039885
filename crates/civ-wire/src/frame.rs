//! CI-V frame layout and the reusable frame buffer
//!
//! # Frame Format
//! ```text
//! FE FE [dst] [src] [cmd] ([subcmd]) [data...] FD
//! ```
//!
//! - `FE FE`: Preamble (two bytes)
//! - `dst`: Destination address (device address or 0xE0 for controller)
//! - `src`: Source address
//! - `cmd`: Command code
//! - `subcmd`: Sub-command code (optional, depends on command)
//! - `data`: Variable length payload (BCD encoded for frequencies)
//! - `FD`: Terminator
//!
//! All field offsets are relative to the start of the frame, never to the
//! command byte, so every handler indexes the buffer the same way.
//!
//! Replies are built in place: the received frame is rewritten into its
//! own answer (address swap, payload substitution, terminator forced at
//! the reply length) and transmitted from the buffer origin.

use crate::bcd;
use crate::error::WireError;

/// CI-V frame preamble byte
pub const PREAMBLE: u8 = 0xFE;
/// CI-V frame terminator byte
pub const TERMINATOR: u8 = 0xFD;

/// Positive acknowledge code (carried in the command slot of a short reply)
pub const CODE_OK: u8 = 0xFB;
/// Negative acknowledge code
pub const CODE_NG: u8 = 0xFA;

/// Default CI-V address of this device
pub const DEFAULT_ADDRESS: u8 = 0xA4;
/// Address conventionally used by controllers
pub const CONTROLLER_ADDRESS: u8 = 0xE0;

/// Maximum total frame length
pub const MAX_FRAME_LEN: usize = 256;
/// Minimum well-formed frame: pre, pre, dst, src, cmd, end
pub const MIN_FRAME_LEN: usize = 6;

/// Byte offset of the destination address
pub const POS_DST: usize = 2;
/// Byte offset of the source address
pub const POS_SRC: usize = 3;
/// Byte offset of the command byte
pub const POS_CMD: usize = 4;
/// Byte offset of the sub-command (first payload byte)
pub const POS_SUB: usize = 5;

/// Fixed-capacity frame buffer, reused for one read-dispatch-reply cycle.
///
/// One logical frame lives in the buffer at a time; a new frame overwrites
/// the previous one. The buffer is owned by the protocol task, not static.
#[derive(Debug)]
pub struct FrameBuffer {
    buf: [u8; MAX_FRAME_LEN],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            buf: [0; MAX_FRAME_LEN],
        }
    }

    /// Capacity of the buffer (the protocol's maximum frame length)
    pub fn capacity(&self) -> usize {
        MAX_FRAME_LEN
    }

    pub fn byte(&self, index: usize) -> u8 {
        self.buf[index]
    }

    pub fn set_byte(&mut self, index: usize, value: u8) {
        self.buf[index] = value;
    }

    /// Destination address field
    pub fn dst(&self) -> u8 {
        self.buf[POS_DST]
    }

    /// Source address field
    pub fn src(&self) -> u8 {
        self.buf[POS_SRC]
    }

    /// Command byte
    pub fn cmd(&self) -> u8 {
        self.buf[POS_CMD]
    }

    /// Sub-command byte (first payload byte)
    pub fn subcmd(&self) -> u8 {
        self.buf[POS_SUB]
    }

    /// First `len` bytes of the buffer
    pub fn bytes(&self, len: usize) -> &[u8] {
        &self.buf[..len]
    }

    /// Check that a received frame starts with the double preamble.
    ///
    /// Frames failing this check are dropped by the caller without any
    /// reply.
    pub fn has_preamble(&self, len: usize) -> bool {
        len >= MIN_FRAME_LEN && self.buf[0] == PREAMBLE && self.buf[1] == PREAMBLE
    }

    /// Rewrite the address fields so the frame answers its sender:
    /// destination becomes the original source, source becomes `self_addr`.
    pub fn prepare_answer(&mut self, self_addr: u8) {
        self.buf[POS_DST] = self.buf[POS_SRC];
        self.buf[POS_SRC] = self_addr;
    }

    /// Force the terminator into the last byte of a reply of `len` bytes.
    ///
    /// Returns `len` so handlers can produce the reply length in one
    /// expression.
    pub fn seal(&mut self, len: usize) -> usize {
        self.buf[len - 1] = TERMINATOR;
        len
    }

    /// Turn the buffer into the short 6-byte OK/NG acknowledgement.
    ///
    /// The code sits in the command slot: `FE FE [dst] [src] [code] FD`.
    pub fn set_ack(&mut self, code: u8) -> usize {
        self.buf[POS_CMD] = code;
        self.seal(MIN_FRAME_LEN)
    }

    /// Decode a BCD frequency field starting at `index`
    pub fn read_bcd(&self, index: usize, digits: usize) -> Result<u64, WireError> {
        bcd::from_bcd(&self.buf[index..index + digits / 2], digits)
    }

    /// Encode a BCD frequency field starting at `index`
    pub fn write_bcd(&mut self, index: usize, value: u64, digits: usize) {
        bcd::to_bcd(&mut self.buf[index..index + digits / 2], value, digits);
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

//! CI-V wire format library
//!
//! This crate provides the byte-level pieces of the CI-V remote control
//! protocol as spoken by the device:
//!
//! - Frame layout constants and the fixed-capacity [`FrameBuffer`] with
//!   in-place reply rewriting
//! - The BCD frequency codec ([`bcd`])
//! - Operating mode codes and their lossy internal mapping ([`mode`])
//! - The command table and VFO selectors ([`command`])
//!
//! It is pure: no I/O, no shared state. The protocol engine in
//! `civ-engine` drives these types from its serial task.
//!
//! # Example
//!
//! ```rust
//! use civ_wire::{FrameBuffer, CODE_OK};
//!
//! // Rewrite a received Set Frequency frame into its acknowledgement
//! let mut frame = FrameBuffer::new();
//! for (i, b) in [0xFE, 0xFE, 0xA4, 0xE0, 0x05].iter().enumerate() {
//!     frame.set_byte(i, *b);
//! }
//! frame.write_bcd(5, 14_074_000, 10);
//! frame.seal(11);
//!
//! frame.prepare_answer(0xA4);
//! let len = frame.set_ack(CODE_OK);
//! assert_eq!(frame.bytes(len), &[0xFE, 0xFE, 0xE0, 0xA4, 0xFB, 0xFD]);
//! ```

pub mod bcd;
pub mod command;
pub mod error;
pub mod frame;
pub mod mode;

pub use command::{CommandCode, Vfo, SEL_VFO_A, SEL_VFO_B};
pub use error::WireError;
pub use frame::{
    FrameBuffer, CODE_NG, CODE_OK, CONTROLLER_ADDRESS, DEFAULT_ADDRESS, MAX_FRAME_LEN,
    MIN_FRAME_LEN, POS_CMD, POS_DST, POS_SRC, POS_SUB, PREAMBLE, TERMINATOR,
};
pub use mode::RadioMode;

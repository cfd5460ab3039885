//! CI-V protocol engine
//!
//! The device-side engine behind the serial remote-control port: it owns
//! the read-dispatch-reply loop, the command handlers, and the contract
//! with the rest of the device.
//!
//! # Architecture
//!
//! ```text
//! serial bytes -> reader -> FrameBuffer -> dispatch -> reply bytes
//!                                |             |
//!                                |        SharedRadio (mutex-guarded,
//!                                |        also mutated by the UI side)
//!                                |             |
//!                                +--------- UiNotifier (fire-and-forget)
//! ```
//!
//! - [`reader`] accumulates one frame at a time with cooperative polling
//! - [`dispatch`] routes by command byte and rewrites the frame into its
//!   reply in place
//! - [`state`] is the single synchronization point shared with the UI
//! - [`link`] owns serial bring-up, the forever-running task, and the
//!   health signal that replaces silent degradation
//!
//! The engine serializes all command processing on its single task; load
//! is bounded by one peer at human command rates, so there is no queueing
//! or admission control.

pub mod bands;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod link;
pub mod reader;
pub mod state;

pub use bands::{Band, BandPlan};
pub use dispatch::dispatch;
pub use error::LinkError;
pub use events::{StateEvent, UiNotifier};
pub use link::{open_port, run_link, CatLink, LinkConfig, LinkHealth};
pub use reader::{read_frame, ReadOutcome, POLL_INTERVAL};
pub use state::{RadioState, SharedRadio, VfoSettings};

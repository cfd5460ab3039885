//! Frame reader
//!
//! Accumulates serial bytes into a [`FrameBuffer`] one at a time until the
//! terminator arrives. The serial port is opened non-blocking; when no
//! byte is available the reader sleeps for a fixed interval and retries,
//! which bounds worst-case reply latency to roughly that interval plus
//! processing time — fine for a human-speed control protocol.
//!
//! Leading bytes are discarded until the double preamble is seen, so a
//! burst of line noise (or an oversize frame that had to be thrown away)
//! cannot shift the framing of whatever follows.
//!
//! There is no timeout on an in-progress frame: a peer that starts a
//! frame and never terminates it stalls the reader until more bytes
//! arrive. Bounding this would change observable behavior for slow
//! controllers and needs a protocol-level decision first.

use std::io::ErrorKind;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::sleep;
use tracing::warn;

use civ_wire::{FrameBuffer, PREAMBLE, TERMINATOR};

/// How long to wait when the channel has no byte for us
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Result of one read cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete frame of this many bytes, terminator included
    Frame(usize),
    /// The buffer filled up without a terminator; contents were discarded
    /// and the caller must not dispatch
    Oversize,
}

/// Read one frame into `frame`, blocking cooperatively until it completes.
///
/// Read errors never propagate out of here: transient ones (no data yet)
/// sleep and retry, hard ones are logged and degrade to the same retry
/// path. The protocol task must keep running no matter what the port does.
pub async fn read_frame<R>(io: &mut R, frame: &mut FrameBuffer) -> ReadOutcome
where
    R: AsyncRead + Unpin,
{
    let mut len = 0usize;
    let mut byte = [0u8; 1];

    loop {
        match io.read(&mut byte).await {
            Ok(0) => sleep(POLL_INTERVAL).await,
            Ok(_) => {
                let value = byte[0];

                // Hunt for the frame start before committing bytes
                if len < 2 && value != PREAMBLE {
                    len = 0;
                    continue;
                }

                frame.set_byte(len, value);
                len += 1;

                if value == TERMINATOR {
                    return ReadOutcome::Frame(len);
                }

                if len >= frame.capacity() {
                    return ReadOutcome::Oversize;
                }
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => sleep(POLL_INTERVAL).await,
            Err(e) => {
                warn!("serial read error: {}", e);
                sleep(POLL_INTERVAL).await;
            }
        }
    }
}

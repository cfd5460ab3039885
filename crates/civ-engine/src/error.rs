//! Error types for the protocol engine

use thiserror::Error;

/// Errors raised while bringing up the serial link.
///
/// Runtime I/O failures never surface here: the link task logs them and
/// keeps running, per the never-crash contract.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Serial port error
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),
}

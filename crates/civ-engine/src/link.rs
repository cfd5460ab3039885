//! Protocol task lifecycle and serial bring-up
//!
//! The link is started once at device bring-up and runs for the lifetime
//! of the process: an unbounded read / validate / echo / dispatch / reply
//! loop with no exit condition. Nothing that happens on the wire may take
//! the device down — a port that fails to open leaves the task parked in a
//! degraded state, and write failures are logged and survived.
//!
//! The degraded state is published through a [`watch`] channel so the rest
//! of the device can show "CAT unavailable" instead of burying the fact in
//! a log line.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tokio::time::sleep;
use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::{error, info, warn};

use civ_wire::{FrameBuffer, DEFAULT_ADDRESS};

use crate::dispatch::dispatch;
use crate::error::LinkError;
use crate::events::UiNotifier;
use crate::reader::{read_frame, ReadOutcome};
use crate::state::SharedRadio;

/// Serial link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Serial device path
    pub port: String,
    /// Baud rate
    pub baud: u32,
    /// CI-V address of this device
    pub address: u8,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyS2".to_string(),
            baud: 19_200,
            address: DEFAULT_ADDRESS,
        }
    }
}

/// Health of the serial link, for operator-visible status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkHealth {
    /// The link is up and serving commands
    Online,
    /// The link is inert; CAT control is unavailable but the device runs on
    Degraded { reason: String },
}

/// Open the configured serial port: raw 8N1, no flow control.
///
/// Reads are non-blocking by construction; the reader's poll interval does
/// the pacing.
pub fn open_port(config: &LinkConfig) -> Result<SerialStream, LinkError> {
    let stream = tokio_serial::new(&config.port, config.baud)
        .data_bits(DataBits::Eight)
        .stop_bits(StopBits::One)
        .parity(Parity::None)
        .flow_control(FlowControl::None)
        .open_native_async()?;

    Ok(stream)
}

fn set_health(tx: &watch::Sender<LinkHealth>, value: LinkHealth) {
    tx.send_if_modified(|current| {
        if *current == value {
            false
        } else {
            *current = value;
            true
        }
    });
}

/// Run the read-dispatch-reply loop forever.
///
/// Generic over the byte stream so tests can drive it through
/// `tokio::io::duplex` instead of a serial port.
pub async fn run_link<T>(
    mut io: T,
    self_addr: u8,
    radio: SharedRadio,
    notifier: UiNotifier,
    health: watch::Sender<LinkHealth>,
) where
    T: AsyncRead + AsyncWrite + Unpin,
{
    let mut frame = FrameBuffer::new();

    loop {
        let len = match read_frame(&mut io, &mut frame).await {
            ReadOutcome::Frame(len) => len,
            ReadOutcome::Oversize => {
                warn!("frame exceeded {} bytes, discarding", frame.capacity());
                continue;
            }
        };

        if !frame.has_preamble(len) {
            warn!("malformed frame (len {}), dropping", len);
            continue;
        }

        // Echo the raw frame before any reply; the bus expects it
        if !write_out(&mut io, frame.bytes(len), &health).await {
            continue;
        }

        if let Some(reply_len) = dispatch(&mut frame, len, &radio, &notifier, self_addr) {
            write_out(&mut io, frame.bytes(reply_len), &health).await;
        }
    }
}

async fn write_all_flush<T>(io: &mut T, bytes: &[u8]) -> std::io::Result<()>
where
    T: AsyncWrite + Unpin,
{
    io.write_all(bytes).await?;
    io.flush().await
}

/// Write one frame, tracking link health. Returns false on failure.
async fn write_out<T>(io: &mut T, bytes: &[u8], health: &watch::Sender<LinkHealth>) -> bool
where
    T: AsyncWrite + Unpin,
{
    match write_all_flush(io, bytes).await {
        Ok(()) => {
            set_health(health, LinkHealth::Online);
            true
        }
        Err(e) => {
            error!("serial write failed: {}", e);
            set_health(
                health,
                LinkHealth::Degraded {
                    reason: format!("write failed: {}", e),
                },
            );
            false
        }
    }
}

/// Handle to the running protocol task
#[derive(Debug)]
pub struct CatLink {
    health: watch::Receiver<LinkHealth>,
}

impl CatLink {
    /// Open the port and start the protocol task.
    ///
    /// The task is never joined and never exits. If the port cannot be
    /// opened the task still starts, parks itself, and reports
    /// [`LinkHealth::Degraded`] — CAT goes silent but the device stays up.
    pub fn spawn(config: LinkConfig, radio: SharedRadio, notifier: UiNotifier) -> Self {
        let (health_tx, health_rx) = watch::channel(LinkHealth::Online);

        tokio::spawn(async move {
            match open_port(&config) {
                Ok(stream) => {
                    info!("CAT link up on {} at {} baud", config.port, config.baud);
                    run_link(stream, config.address, radio, notifier, health_tx).await;
                }
                Err(e) => {
                    error!("failed to open {}: {}", config.port, e);
                    set_health(
                        &health_tx,
                        LinkHealth::Degraded {
                            reason: format!("{}: {}", config.port, e),
                        },
                    );

                    // Keep the task (and the health signal) alive
                    loop {
                        sleep(Duration::from_secs(60)).await;
                    }
                }
            }
        });

        Self { health: health_rx }
    }

    /// Watch the link's health
    pub fn health(&self) -> watch::Receiver<LinkHealth> {
        self.health.clone()
    }
}

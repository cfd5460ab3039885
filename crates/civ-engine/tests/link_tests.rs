//! Integration tests for the protocol engine
//!
//! These drive the full link task over an in-memory duplex stream, the way
//! a controller drives the real serial port: raw bytes in, echo and reply
//! bytes out. They verify:
//! - Echo-then-reply ordering for accepted commands
//! - The byte-exact acknowledge and query reply formats
//! - Rejection paths (bad preamble, oversize, unsupported selectors)
//! - State round-trips through the wire (set then read back)

use std::time::Duration;

use civ_engine::{
    dispatch, BandPlan, LinkHealth, RadioState, SharedRadio, StateEvent, UiNotifier,
};
use civ_wire::{FrameBuffer, RadioMode, Vfo};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::sync::{mpsc, watch};

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    pub const SELF: u8 = 0xA4;
    pub const CONTROLLER: u8 = 0xE0;

    pub struct Harness {
        /// The controller's end of the serial link
        pub wire: DuplexStream,
        pub radio: SharedRadio,
        pub events: mpsc::Receiver<StateEvent>,
    }

    /// Spawn the link task over a duplex stream and hand back the
    /// controller side.
    pub fn spawn_link() -> Harness {
        let (wire, device) = tokio::io::duplex(4096);

        let state = RadioState::new(BandPlan::hf_default(), 14_250_000, RadioMode::Usb);
        let radio = SharedRadio::new(state);
        let (event_tx, events) = mpsc::channel(64);
        let (health_tx, _health_rx) = watch::channel(LinkHealth::Online);

        tokio::spawn(civ_engine::run_link(
            device,
            SELF,
            radio.clone(),
            UiNotifier::new(event_tx),
            health_tx,
        ));

        Harness {
            wire,
            radio,
            events,
        }
    }

    /// Read exactly `n` bytes, failing the test if they do not arrive
    pub async fn read_n(wire: &mut DuplexStream, n: usize) -> Vec<u8> {
        let mut buf = vec![0u8; n];
        tokio::time::timeout(Duration::from_secs(2), wire.read_exact(&mut buf))
            .await
            .expect("timed out waiting for bytes")
            .expect("read failed");
        buf
    }

    /// Build a Set Frequency frame for `hz`
    pub fn set_freq_frame(hz: u64) -> Vec<u8> {
        let mut frame = FrameBuffer::new();
        for (i, b) in [0xFE, 0xFE, SELF, CONTROLLER, 0x05].iter().enumerate() {
            frame.set_byte(i, *b);
        }
        frame.write_bcd(5, hz, 10);
        let len = frame.seal(11);
        frame.bytes(len).to_vec()
    }

    pub fn read_freq_frame() -> Vec<u8> {
        vec![0xFE, 0xFE, SELF, CONTROLLER, 0x03, 0xFD]
    }

    pub fn ok_ack() -> Vec<u8> {
        vec![0xFE, 0xFE, CONTROLLER, SELF, 0xFB, 0xFD]
    }

    pub fn ng_ack() -> Vec<u8> {
        vec![0xFE, 0xFE, CONTROLLER, SELF, 0xFA, 0xFD]
    }
}

use helpers::*;

// ============================================================================
// Echo and Acknowledge
// ============================================================================

#[tokio::test]
async fn set_frequency_echoes_then_acks() {
    let mut h = spawn_link();

    // FE FE A4 E0 05 <BCD 14074000> FD
    let request = set_freq_frame(14_074_000);
    h.wire.write_all(&request).await.unwrap();

    // The exact echo comes first, then the 6-byte OK
    let echo = read_n(&mut h.wire, request.len()).await;
    assert_eq!(echo, request);

    let ack = read_n(&mut h.wire, 6).await;
    assert_eq!(ack, ok_ack());

    assert_eq!(h.radio.lock().selected_frequency(), 14_074_000);
}

#[tokio::test]
async fn read_back_after_set() {
    let mut h = spawn_link();

    h.wire.write_all(&set_freq_frame(14_074_000)).await.unwrap();
    read_n(&mut h.wire, 11).await; // echo
    read_n(&mut h.wire, 6).await; // ack

    let query = read_freq_frame();
    h.wire.write_all(&query).await.unwrap();

    let echo = read_n(&mut h.wire, 6).await;
    assert_eq!(echo, query);

    let reply = read_n(&mut h.wire, 11).await;
    assert_eq!(&reply[..5], &[0xFE, 0xFE, CONTROLLER, SELF, 0x03]);
    assert_eq!(&reply[5..10], &[0x00, 0x40, 0x07, 0x14, 0x00]);
    assert_eq!(reply[10], 0xFD);
}

#[tokio::test]
async fn queries_are_idempotent() {
    let mut h = spawn_link();

    let query = read_freq_frame();

    h.wire.write_all(&query).await.unwrap();
    read_n(&mut h.wire, 6).await;
    let first = read_n(&mut h.wire, 11).await;

    h.wire.write_all(&query).await.unwrap();
    read_n(&mut h.wire, 6).await;
    let second = read_n(&mut h.wire, 11).await;

    assert_eq!(first, second);
}

// ============================================================================
// Rejection Paths
// ============================================================================

#[tokio::test]
async fn bad_preamble_produces_no_output() {
    let mut h = spawn_link();

    // Garbage "frame" terminated like a real one
    h.wire
        .write_all(&[0x01, 0x02, 0x03, 0xFD])
        .await
        .unwrap();

    // The next well-formed query must be the first thing answered
    let query = read_freq_frame();
    h.wire.write_all(&query).await.unwrap();

    let echo = read_n(&mut h.wire, 6).await;
    assert_eq!(echo, query);
}

#[tokio::test]
async fn oversize_burst_does_not_corrupt_next_frame() {
    let mut h = spawn_link();

    // 300 bytes with no terminator anywhere
    let burst = vec![0x55u8; 300];
    h.wire.write_all(&burst).await.unwrap();

    let query = read_freq_frame();
    h.wire.write_all(&query).await.unwrap();

    let echo = read_n(&mut h.wire, 6).await;
    assert_eq!(echo, query);

    let reply = read_n(&mut h.wire, 11).await;
    assert_eq!(&reply[..5], &[0xFE, 0xFE, CONTROLLER, SELF, 0x03]);
}

#[tokio::test]
async fn unsupported_vfo_selector_naks_and_leaves_state() {
    let mut h = spawn_link();

    // 0xB0 = exchange A/B: valid on the wire, rejected by this device
    let request = vec![0xFE, 0xFE, SELF, CONTROLLER, 0x07, 0xB0, 0xFD];
    h.wire.write_all(&request).await.unwrap();

    let echo = read_n(&mut h.wire, request.len()).await;
    assert_eq!(echo, request);

    let ack = read_n(&mut h.wire, 6).await;
    assert_eq!(ack, ng_ack());

    assert_eq!(h.radio.lock().current_vfo(), Vfo::A);
}

#[tokio::test]
async fn unknown_command_naks() {
    let mut h = spawn_link();

    let request = vec![0xFE, 0xFE, SELF, CONTROLLER, 0x19, 0x00, 0xFD];
    h.wire.write_all(&request).await.unwrap();

    read_n(&mut h.wire, request.len()).await;
    let ack = read_n(&mut h.wire, 6).await;
    assert_eq!(ack, ng_ack());
}

// ============================================================================
// State Round-Trips
// ============================================================================

#[tokio::test]
async fn ptt_write_then_query_round_trip() {
    let mut h = spawn_link();

    let key_down = vec![0xFE, 0xFE, SELF, CONTROLLER, 0x1C, 0x00, 0x01, 0xFD];
    h.wire.write_all(&key_down).await.unwrap();
    read_n(&mut h.wire, key_down.len()).await;
    let ack = read_n(&mut h.wire, 8).await;
    assert_eq!(
        ack,
        vec![0xFE, 0xFE, CONTROLLER, SELF, 0x1C, 0x00, 0xFB, 0xFD]
    );
    assert!(h.radio.lock().ptt());

    let query = vec![0xFE, 0xFE, SELF, CONTROLLER, 0x1C, 0x00, 0xFD];
    h.wire.write_all(&query).await.unwrap();
    read_n(&mut h.wire, query.len()).await;
    let reply = read_n(&mut h.wire, 8).await;
    assert_eq!(
        reply,
        vec![0xFE, 0xFE, CONTROLLER, SELF, 0x1C, 0x00, 0x01, 0xFD]
    );
}

#[tokio::test]
async fn tuning_into_another_band_activates_it() {
    let mut h = spawn_link();

    h.wire.write_all(&set_freq_frame(7_074_000)).await.unwrap();
    read_n(&mut h.wire, 11).await;
    read_n(&mut h.wire, 6).await;

    assert_eq!(h.radio.lock().active_band().unwrap().name, "40m");

    let mut saw_band_change = false;
    while let Ok(event) = h.events.try_recv() {
        if matches!(&event, StateEvent::BandChanged { band } if band == "40m") {
            saw_band_change = true;
        }
    }
    assert!(saw_band_change, "expected a band change notification");
}

#[tokio::test]
async fn ui_notified_on_frequency_change() {
    let mut h = spawn_link();

    h.wire.write_all(&set_freq_frame(14_100_000)).await.unwrap();
    read_n(&mut h.wire, 11).await;
    read_n(&mut h.wire, 6).await;

    let event = tokio::time::timeout(Duration::from_secs(2), h.events.recv())
        .await
        .expect("timed out waiting for UI event")
        .expect("event channel closed");
    assert_eq!(
        event,
        StateEvent::FrequencyChanged {
            vfo: Vfo::A,
            hz: 14_100_000
        }
    );
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    // Strategy for generating valid amateur radio frequencies (in Hz)
    fn amateur_frequency() -> impl Strategy<Value = u64> {
        prop_oneof![
            // 160m band
            1_800_000u64..2_000_000u64,
            // 80m band
            3_500_000u64..4_000_000u64,
            // 40m band
            7_000_000u64..7_300_000u64,
            // 20m band
            14_000_000u64..14_350_000u64,
            // 15m band
            21_000_000u64..21_450_000u64,
            // 10m band
            28_000_000u64..29_700_000u64,
        ]
    }

    fn setup() -> (SharedRadio, UiNotifier) {
        let state = RadioState::new(BandPlan::hf_default(), 14_250_000, RadioMode::Usb);
        let (tx, _rx) = mpsc::channel(64);
        (SharedRadio::new(state), UiNotifier::new(tx))
    }

    fn run_frame(bytes: &[u8], radio: &SharedRadio, notifier: &UiNotifier) -> Option<Vec<u8>> {
        let mut frame = FrameBuffer::new();
        for (i, b) in bytes.iter().enumerate() {
            frame.set_byte(i, *b);
        }
        dispatch(&mut frame, bytes.len(), radio, notifier, SELF)
            .map(|len| frame.bytes(len).to_vec())
    }

    proptest! {
        #[test]
        fn set_then_read_returns_the_same_frequency(hz in amateur_frequency()) {
            let (radio, notifier) = setup();

            let ack = run_frame(&set_freq_frame(hz), &radio, &notifier).unwrap();
            prop_assert_eq!(ack, ok_ack());

            let reply = run_frame(&read_freq_frame(), &radio, &notifier).unwrap();
            prop_assert_eq!(reply.len(), 11);

            let mut frame = FrameBuffer::new();
            for (i, b) in reply.iter().enumerate() {
                frame.set_byte(i, *b);
            }
            prop_assert_eq!(frame.read_bcd(5, 10).unwrap(), hz);
        }

        #[test]
        fn every_accepted_set_is_acked(hz in amateur_frequency()) {
            let (radio, notifier) = setup();
            let reply = run_frame(&set_freq_frame(hz), &radio, &notifier).unwrap();
            prop_assert_eq!(reply, ok_ack());
            prop_assert_eq!(radio.lock().selected_frequency(), hz);
        }
    }
}

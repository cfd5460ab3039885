//! Command dispatch and reply construction
//!
//! The protocol is stateless across frames: each complete frame is routed
//! by its command byte, the handler reads or mutates the shared radio
//! state, and the reply is rewritten in place into the same buffer the
//! frame arrived in. The caller (the link task) has already transmitted
//! the echo of the raw frame before dispatch runs; the bus expects every
//! frame to be echoed ahead of its reply.
//!
//! Reply lengths and payload bytes are fixed per command and must stay
//! byte-exact; existing controllers parse them by offset.

use civ_wire::{
    CommandCode, FrameBuffer, RadioMode, Vfo, WireError, CODE_NG, CODE_OK, POS_SUB, SEL_VFO_A,
    TERMINATOR,
};
use tracing::warn;

use crate::events::{StateEvent, UiNotifier};
use crate::state::SharedRadio;

/// Width of a frequency field in decimal digits
const FREQ_DIGITS: usize = 10;

/// Handle one validated frame and build its reply in place.
///
/// Returns the reply length to transmit, or `None` when the command
/// produces no reply beyond the echo.
pub fn dispatch(
    frame: &mut FrameBuffer,
    len: usize,
    radio: &SharedRadio,
    notifier: &UiNotifier,
    self_addr: u8,
) -> Option<usize> {
    frame.prepare_answer(self_addr);

    let cmd = match CommandCode::try_from(frame.cmd()) {
        Ok(cmd) => cmd,
        Err(e) => {
            warn!("{} (len {})", e, len);
            return Some(frame.set_ack(CODE_NG));
        }
    };

    match cmd {
        CommandCode::ReadFrequency => read_frequency(frame, radio),
        CommandCode::ReadMode => read_mode(frame, radio),
        CommandCode::SetFrequency => set_frequency(frame, radio, notifier),
        CommandCode::SetMode => set_mode(frame, radio, notifier),
        CommandCode::SelectVfo => select_vfo(frame, radio, notifier),
        CommandCode::Ptt => ptt(frame, radio),
        CommandCode::SelectedFrequency => selected_frequency(frame, radio, notifier),
        CommandCode::SelectedMode => selected_mode(frame, radio, notifier),
    }
}

/// Tune the active VFO through the full set-frequency path (band
/// activation included) and notify the UI.
fn apply_tune(radio: &SharedRadio, notifier: &UiNotifier, hz: u64) {
    let (vfo, band) = {
        let mut state = radio.lock();
        let band = state.tune(hz);
        (state.current_vfo(), band)
    };

    if let Some(band) = band {
        notifier.notify(StateEvent::BandChanged { band });
    }
    notifier.notify(StateEvent::FrequencyChanged { vfo, hz });
}

fn nak(frame: &mut FrameBuffer, error: WireError) -> Option<usize> {
    warn!("{}", error);
    Some(frame.set_ack(CODE_NG))
}

fn read_frequency(frame: &mut FrameBuffer, radio: &SharedRadio) -> Option<usize> {
    let hz = radio.lock().selected_frequency();
    frame.write_bcd(POS_SUB, hz, FREQ_DIGITS);
    Some(frame.seal(11))
}

fn read_mode(frame: &mut FrameBuffer, radio: &SharedRadio) -> Option<usize> {
    let code = radio.lock().selected_mode().to_wire();

    // The filter slot is not implemented; it mirrors the mode byte
    frame.set_byte(5, code);
    frame.set_byte(6, code);
    Some(frame.seal(8))
}

fn set_frequency(frame: &mut FrameBuffer, radio: &SharedRadio, notifier: &UiNotifier) -> Option<usize> {
    let hz = match frame.read_bcd(POS_SUB, FREQ_DIGITS) {
        Ok(hz) => hz,
        Err(e) => return nak(frame, e),
    };

    apply_tune(radio, notifier, hz);
    Some(frame.set_ack(CODE_OK))
}

fn set_mode(frame: &mut FrameBuffer, radio: &SharedRadio, notifier: &UiNotifier) -> Option<usize> {
    // The data variant is not settable through this command
    let mode = match RadioMode::from_wire(frame.subcmd(), false) {
        Ok(mode) => mode,
        Err(e) => return nak(frame, e),
    };

    let vfo = {
        let mut state = radio.lock();
        let vfo = state.current_vfo();
        state.set_mode(vfo, mode);
        vfo
    };

    notifier.notify(StateEvent::ModeChanged { vfo, mode });
    Some(frame.set_ack(CODE_OK))
}

fn select_vfo(frame: &mut FrameBuffer, radio: &SharedRadio, notifier: &UiNotifier) -> Option<usize> {
    let vfo = match Vfo::from_selector(frame.subcmd()) {
        Ok(vfo) => vfo,
        Err(e) => return nak(frame, e),
    };

    radio.lock().set_current_vfo(vfo);
    notifier.notify(StateEvent::VfoChanged { vfo });
    Some(frame.set_ack(CODE_OK))
}

fn ptt(frame: &mut FrameBuffer, radio: &SharedRadio) -> Option<usize> {
    // Only sub-command 0x00 (transmit control) is served; other PTT
    // sub-commands get the echo and nothing else
    if frame.subcmd() != 0x00 {
        return None;
    }

    if frame.byte(6) == TERMINATOR {
        // Query: answer 0 for receive, 1 for transmit
        let tx = radio.lock().ptt();
        frame.set_byte(6, u8::from(tx));
    } else {
        match frame.byte(6) {
            0 => radio.lock().set_ptt(false),
            1 => radio.lock().set_ptt(true),
            _ => {}
        }
        frame.set_byte(6, CODE_OK);
    }
    Some(frame.seal(8))
}

fn selected_frequency(
    frame: &mut FrameBuffer,
    radio: &SharedRadio,
    notifier: &UiNotifier,
) -> Option<usize> {
    // The selector addresses VFO A or B absolutely, independent of which
    // one is active
    let vfo = if frame.subcmd() == SEL_VFO_A {
        Vfo::A
    } else {
        Vfo::B
    };

    if frame.byte(6) == TERMINATOR {
        let hz = radio.lock().frequency(vfo);
        frame.write_bcd(6, hz, FREQ_DIGITS);
        return Some(frame.seal(12));
    }

    let hz = match frame.read_bcd(6, FREQ_DIGITS) {
        Ok(hz) => hz,
        Err(e) => return nak(frame, e),
    };

    // Writing to the active VFO applies live, with the same side effects
    // as Set Frequency; the other VFO is just stored
    let is_current = radio.lock().current_vfo() == vfo;
    if is_current {
        apply_tune(radio, notifier, hz);
    } else {
        radio.lock().set_frequency(vfo, hz);
    }
    Some(frame.set_ack(CODE_OK))
}

fn selected_mode(
    frame: &mut FrameBuffer,
    radio: &SharedRadio,
    notifier: &UiNotifier,
) -> Option<usize> {
    if frame.byte(6) == TERMINATOR {
        // Query: selector 0 reads the active VFO, anything else the other
        let mode = {
            let state = radio.lock();
            let vfo = if frame.subcmd() == 0 {
                state.current_vfo()
            } else {
                state.current_vfo().other()
            };
            state.mode(vfo)
        };

        frame.set_byte(6, mode.to_wire());
        frame.set_byte(7, u8::from(mode.is_data()));
        frame.set_byte(8, CODE_OK);
        return Some(frame.seal(10));
    }

    // Write: mode byte plus a companion data-mode flag. A terminator in
    // the flag position means the controller omitted the byte.
    let flag = frame.byte(7);
    let data = flag != TERMINATOR && flag != 0;

    let mode = match RadioMode::from_wire(frame.byte(6), data) {
        Ok(mode) => mode,
        Err(e) => return nak(frame, e),
    };

    let vfo = {
        let mut state = radio.lock();
        let vfo = if frame.subcmd() == 0 {
            state.current_vfo()
        } else {
            state.current_vfo().other()
        };
        state.set_mode(vfo, mode);
        vfo
    };

    notifier.notify(StateEvent::ModeChanged { vfo, mode });
    Some(frame.set_ack(CODE_OK))
}

//! Bus message layer.
//!
//! Frames on the shared multi-drop bus are short byte strings whose payload
//! bytes keep bit 7 clear for framing integrity; only opcode bytes carry it
//! set. The final byte of every frame is the checksum slot, owned by the
//! transport adapter — the core builds frames with that slot zeroed.
//!
//! Submodules:
//! - [`recognizer`] — classifies the standard switch/sensor opcodes into a
//!   tagged [`BusEvent`](recognizer::BusEvent).
//! - [`peer`] — the SV peer-transfer codec used for remote configuration.

pub mod peer;
pub mod recognizer;

/// Longest frame this module handles (the 16-byte peer transfer).
pub const MAX_FRAME_LEN: usize = 16;

/// A raw bus frame, checksum slot included.
pub type RawFrame = heapless::Vec<u8, MAX_FRAME_LEN>;

// ── Opcodes ───────────────────────────────────────────────────

/// Switch request: command an accessory to a direction, on or off.
pub const OPC_SWITCH_REQUEST: u8 = 0xB0;
/// Switch report: an accessory reporting its own state.
pub const OPC_SWITCH_REPORT: u8 = 0xB1;
/// Input report: a sensor announcing an electrical level change.
pub const OPC_INPUT_REPORT: u8 = 0xB2;
/// Switch state: answer to a switch state query.
pub const OPC_SWITCH_STATE: u8 = 0xBC;
/// Peer transfer: point-to-point payload carrier (SV protocol).
pub const OPC_PEER_TRANSFER: u8 = 0xE5;

/// Length of the 4-byte short frames (opcode, two payload bytes, checksum).
pub const SHORT_FRAME_LEN: usize = 4;

// ── Frame builders ────────────────────────────────────────────

fn short_frame(opcode: u8, b1: u8, b2: u8) -> RawFrame {
    let mut frame = RawFrame::new();
    // Infallible: 4 bytes into a 16-byte buffer.
    let _ = frame.extend_from_slice(&[opcode, b1 & 0x7F, b2 & 0x7F, 0]);
    frame
}

/// Build an input report announcing a sensor edge.
///
/// `in1`/`in2` are the channel record's bound-address bytes, passed through
/// as-is (minus bit 7) — the polarity and level bits ride inside `in2`.
pub fn input_report(in1: u8, in2: u8) -> RawFrame {
    short_frame(OPC_INPUT_REPORT, in1, in2)
}

/// Build a switch request for accessory `address` (1-based).
pub fn switch_request(address: u16, output: bool, direction: bool) -> RawFrame {
    let a = address.saturating_sub(1);
    let b1 = (a & 0x7F) as u8;
    let mut b2 = ((a >> 7) & 0x0F) as u8;
    if output {
        b2 |= 0x10;
    }
    if direction {
        b2 |= 0x20;
    }
    short_frame(OPC_SWITCH_REQUEST, b1, b2)
}

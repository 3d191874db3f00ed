//! Generic switch/sensor message recognition.
//!
//! Classifies the standard 4-byte bus opcodes into a tagged [`BusEvent`].
//! The dispatch loop matches on the event exhaustively: switch requests
//! drive the channel engine, the observation variants are surfaced through
//! the event sink, and [`BusEvent::Unrecognized`] falls through to the SV
//! peer-transfer path.

use super::{
    OPC_INPUT_REPORT, OPC_SWITCH_REPORT, OPC_SWITCH_REQUEST, OPC_SWITCH_STATE, RawFrame,
    SHORT_FRAME_LEN,
};

/// Outcome of offering a frame to the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    /// A sensor elsewhere on the bus reported a level change.
    SensorChanged { address: u16, active: bool },
    /// Somebody commanded an accessory; the engine may own that address.
    SwitchRequested { address: u16, output: bool, direction: bool },
    /// An accessory reported its own state.
    SwitchReport { address: u16, output: bool, direction: bool },
    /// An accessory answered a state query.
    SwitchState { address: u16, output: bool, direction: bool },
    /// Not a standard switch/sensor frame.
    Unrecognized,
}

/// 1-based accessory address from the two payload bytes of a switch frame.
fn switch_address(b1: u8, b2: u8) -> u16 {
    (u16::from(b1) | (u16::from(b2 & 0x0F) << 7)) + 1
}

/// 1-based sensor address; sensors interleave an extra low bit from b2.
fn sensor_address(b1: u8, b2: u8) -> u16 {
    ((u16::from(b1) | (u16::from(b2 & 0x0F) << 7)) << 1) + u16::from((b2 >> 5) & 1) + 1
}

/// Classify a raw frame into a [`BusEvent`].
pub fn recognize(frame: &RawFrame) -> BusEvent {
    if frame.len() < SHORT_FRAME_LEN {
        return BusEvent::Unrecognized;
    }
    let (b1, b2) = (frame[1], frame[2]);
    let output = b2 & 0x10 != 0;
    let direction = b2 & 0x20 != 0;

    match frame[0] {
        OPC_SWITCH_REQUEST => BusEvent::SwitchRequested {
            address: switch_address(b1, b2),
            output,
            direction,
        },
        OPC_SWITCH_REPORT => BusEvent::SwitchReport {
            address: switch_address(b1, b2),
            output,
            direction,
        },
        OPC_SWITCH_STATE => BusEvent::SwitchState {
            address: switch_address(b1, b2),
            output,
            direction,
        },
        OPC_INPUT_REPORT => BusEvent::SensorChanged {
            address: sensor_address(b1, b2),
            active: output,
        },
        _ => BusEvent::Unrecognized,
    }
}

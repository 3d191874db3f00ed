//! SV peer-transfer codec.
//!
//! Peer transfers carry the SV configuration protocol in a fixed 16-byte
//! frame. The transport keeps bit 7 of every payload byte clear, so the
//! frame dedicates two control bytes to the stripped high bits of its
//! eight data bytes:
//!
//! ```text
//! ┌────┬────┬─────┬──────┬──────┬───────┬─────────┬───────┬─────────┬─────┐
//! │ E5 │ 10 │ src │ dstL │ dstH │ pxct1 │ d1..d4  │ pxct2 │ d5..d8  │ chk │
//! └────┴────┴─────┴──────┴──────┴───────┴─────────┴───────┴─────────┴─────┘
//! ```
//!
//! `pxct1` bits 0–3 hold bit 7 of d1–d4; `pxct2` bits 0–3 hold bit 7 of
//! d5–d8. Restoration and stripping are exact mirrors, so any 8-byte data
//! vector survives the trip.
//!
//! Within the SV protocol, d1 is the command (1 = write, 2 = read), d2 the
//! register index, d4 the value to write. The d5 slot doubles as the
//! destination high byte on requests and the responder's high address on
//! replies.

use crate::bus::{MAX_FRAME_LEN, OPC_PEER_TRANSFER, RawFrame};
use crate::sv::ModuleIdentity;

/// On-wire length of a peer transfer, checksum included.
pub const PEER_FRAME_LEN: usize = 16;

/// Value of the in-frame message-size byte.
const MSG_SIZE: u8 = 0x10;

/// Destination-low wildcard matching any module that shares the high byte.
const DST_LOW_WILDCARD: u8 = 0x7F;

// Byte offsets within the frame.
const IDX_OPCODE: usize = 0;
const IDX_SRC: usize = 2;
const IDX_DST_L: usize = 3;
const IDX_DST_H: usize = 4;
const IDX_PXCT1: usize = 5;
const IDX_D1: usize = 6;
const IDX_PXCT2: usize = 10;
const IDX_D5: usize = 11;

// ───────────────────────────────────────────────────────────────
// Parsed frame
// ───────────────────────────────────────────────────────────────

/// A peer transfer with its fields exactly as received (bit 7 clear).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerTransfer {
    pub src: u8,
    pub dst_l: u8,
    pub dst_h: u8,
    pxct1: u8,
    pxct2: u8,
    /// d1..d8 as received, high bits still parked in the control bytes.
    raw: [u8; 8],
}

impl PeerTransfer {
    /// Parse a raw frame. `None` if it is not a peer transfer.
    pub fn parse(frame: &RawFrame) -> Option<Self> {
        if frame.len() != PEER_FRAME_LEN || frame[IDX_OPCODE] != OPC_PEER_TRANSFER {
            return None;
        }
        let mut raw = [0u8; 8];
        raw[..4].copy_from_slice(&frame[IDX_D1..IDX_D1 + 4]);
        raw[4..].copy_from_slice(&frame[IDX_D5..IDX_D5 + 4]);
        Some(Self {
            src: frame[IDX_SRC],
            dst_l: frame[IDX_DST_L],
            dst_h: frame[IDX_DST_H],
            pxct1: frame[IDX_PXCT1],
            pxct2: frame[IDX_PXCT2],
            raw,
        })
    }

    /// Destination filter: does this transfer target the given module?
    ///
    /// Exactly three patterns are accepted, checked against the raw
    /// destination-low byte and the raw d5 slot (the high destination
    /// field), before any bit restoration:
    /// 1. broadcast: both zero;
    /// 2. wildcard low + matching high address;
    /// 3. exact low and high match.
    pub fn addressed_to(&self, id: &ModuleIdentity) -> bool {
        let dst_h_field = self.raw[4];
        (self.dst_l == 0 && dst_h_field == 0)
            || (self.dst_l == DST_LOW_WILDCARD && dst_h_field == id.addr_high)
            || (self.dst_l == id.addr_low && dst_h_field == id.addr_high)
    }

    /// d1..d8 with bit 7 restored from the control bytes.
    pub fn data(&self) -> [u8; 8] {
        let mut d = self.raw;
        for i in 0..4 {
            d[i] |= (self.pxct1 >> i & 1) << 7;
            d[i + 4] |= (self.pxct2 >> i & 1) << 7;
        }
        d
    }
}

// ───────────────────────────────────────────────────────────────
// SV command decoding
// ───────────────────────────────────────────────────────────────

/// An SV operation decoded from a restored data vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvCommand {
    /// Read three consecutive table bytes starting at `register`.
    Read { register: u8 },
    /// Write `value` to `register` (register 0 is reserved, ack-only).
    Write { register: u8, value: u8 },
}

impl SvCommand {
    /// Decode from restored d1..d8. `None` for unrecognized commands.
    pub fn from_data(d: &[u8; 8]) -> Option<Self> {
        match d[0] {
            2 => Some(Self::Read { register: d[1] }),
            1 => Some(Self::Write {
                register: d[1],
                value: d[3],
            }),
            _ => None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Encoding
// ───────────────────────────────────────────────────────────────

/// Assemble a peer-transfer frame, stripping bit 7 of each data byte into
/// the mirrored control-byte positions. Header bytes are masked to 7 bits;
/// the checksum slot is left at 0 for the transport.
pub fn encode(src: u8, dst_l: u8, dst_h: u8, data: [u8; 8]) -> RawFrame {
    let mut pxct1 = 0u8;
    let mut pxct2 = 0u8;
    let mut d = data;
    for i in 0..4 {
        pxct1 |= (d[i] >> 7) << i;
        d[i] &= 0x7F;
        pxct2 |= (d[i + 4] >> 7) << i;
        d[i + 4] &= 0x7F;
    }

    let mut frame = RawFrame::new();
    // Infallible: PEER_FRAME_LEN == MAX_FRAME_LEN.
    let _ = frame.extend_from_slice(&[
        OPC_PEER_TRANSFER,
        MSG_SIZE,
        src & 0x7F,
        dst_l & 0x7F,
        dst_h & 0x7F,
        pxct1,
        d[0],
        d[1],
        d[2],
        d[3],
        pxct2,
        d[4],
        d[5],
        d[6],
        d[7],
        0,
    ]);
    debug_assert_eq!(frame.len(), MAX_FRAME_LEN);
    frame
}

/// Build the response to an inbound SV command.
///
/// The reply goes back to the requester (their source becomes our
/// destination-low; their destination-high byte is echoed), identifies this
/// module via its low address and the d5 high-address slot, echoes the
/// command and register, carries the firmware version in d3, and ships the
/// 3-byte payload in d6..d8.
pub fn encode_response(
    inbound: &PeerTransfer,
    id: &ModuleIdentity,
    payload: [u8; 3],
) -> RawFrame {
    let d = inbound.data();
    encode(
        id.addr_low,
        inbound.src,
        inbound.dst_h,
        [
            d[0],
            d[1],
            id.version,
            0x00,
            id.addr_high,
            payload[0],
            payload[1],
            payload[2],
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> ModuleIdentity {
        ModuleIdentity {
            version: 101,
            addr_low: 81,
            addr_high: 1,
        }
    }

    #[test]
    fn encode_parse_round_trip_restores_high_bits() {
        let data = [0x81, 0x02, 0xFF, 0x00, 0x80, 0x7F, 0xAA, 0x55];
        let frame = encode(81, 5, 1, data);

        // Everything after the opcode stays 7-bit on the wire.
        assert!(frame[1..].iter().all(|b| b & 0x80 == 0));

        let pt = PeerTransfer::parse(&frame).expect("peer frame");
        assert_eq!(pt.data(), data);
        assert_eq!((pt.src, pt.dst_l, pt.dst_h), (81, 5, 1));
    }

    #[test]
    fn parse_rejects_foreign_opcodes_and_lengths() {
        let mut frame = RawFrame::new();
        let _ = frame.extend_from_slice(&[OPC_PEER_TRANSFER, 0x10, 0, 0]);
        assert!(PeerTransfer::parse(&frame).is_none());

        let mut frame = encode(1, 2, 3, [0; 8]);
        frame[0] = 0xB0;
        assert!(PeerTransfer::parse(&frame).is_none());
    }

    #[test]
    fn destination_filter_accepts_exactly_three_patterns() {
        let id = id();
        let accept = |dst_l: u8, d5: u8| {
            let frame = encode(10, dst_l, 0, [1, 5, 0, 0x2A, d5, 0, 0, 0]);
            PeerTransfer::parse(&frame).unwrap().addressed_to(&id)
        };

        assert!(accept(0, 0), "broadcast");
        assert!(accept(0x7F, 1), "wildcard low, matching high");
        assert!(accept(81, 1), "exact match");

        assert!(!accept(0, 1));
        assert!(!accept(81, 0));
        assert!(!accept(0x7F, 2));
        assert!(!accept(82, 1));
        assert!(!accept(81, 2));
    }

    #[test]
    fn sv_command_decoding() {
        assert_eq!(
            SvCommand::from_data(&[2, 7, 0, 0, 0, 0, 0, 0]),
            Some(SvCommand::Read { register: 7 })
        );
        assert_eq!(
            SvCommand::from_data(&[1, 5, 0, 0x2A, 0, 0, 0, 0]),
            Some(SvCommand::Write {
                register: 5,
                value: 0x2A
            })
        );
        for cmd in [0u8, 3, 4, 0x7F] {
            assert_eq!(SvCommand::from_data(&[cmd, 1, 2, 3, 4, 5, 6, 7]), None);
        }
    }

    #[test]
    fn response_echoes_requester_and_command() {
        let inbound_frame = encode(0x23, 81, 0x42, [2, 9, 0, 0, 1, 0, 0, 0]);
        let inbound = PeerTransfer::parse(&inbound_frame).unwrap();
        assert!(inbound.addressed_to(&id()));

        let reply = encode_response(&inbound, &id(), [0xAA, 0xBB, 0xCC]);
        let parsed = PeerTransfer::parse(&reply).unwrap();

        assert_eq!(parsed.src, 81, "source is the module's low address");
        assert_eq!(parsed.dst_l, 0x23, "destination is the requester");
        assert_eq!(parsed.dst_h, 0x42, "high destination byte echoed");

        let d = parsed.data();
        assert_eq!(&d[..2], &[2, 9], "command and register echoed");
        assert_eq!(d[2], 101, "firmware version in d3");
        assert_eq!(d[3], 0);
        assert_eq!(d[4], 1, "module high address in d5");
        assert_eq!(&d[5..], &[0xAA, 0xBB, 0xCC]);
    }
}

//! Property tests for the bus codec layer.
//!
//! The peer-transfer control-byte scheme must be lossless for every
//! possible data vector, the destination filter must accept exactly its
//! three documented patterns, and no byte soup may ever panic the decode
//! paths.

use proptest::prelude::*;

use svio::bus::peer::{self, PeerTransfer, SvCommand};
use svio::bus::recognizer::{BusEvent, recognize};
use svio::bus::{RawFrame, switch_request};
use svio::sv::ModuleIdentity;

fn module_id() -> ModuleIdentity {
    ModuleIdentity {
        version: 101,
        addr_low: 81,
        addr_high: 1,
    }
}

proptest! {
    /// Bit 7 of every data byte survives the trip through the control
    /// bytes, whatever the payload.
    #[test]
    fn peer_data_round_trip(data in proptest::array::uniform8(0u8..=255)) {
        let frame = peer::encode(81, 5, 1, data);

        // Framing integrity: nothing after the opcode carries bit 7.
        prop_assert!(frame[1..].iter().all(|b| b & 0x80 == 0));

        let parsed = PeerTransfer::parse(&frame).expect("peer frame");
        prop_assert_eq!(parsed.data(), data);
    }

    /// The destination filter accepts exactly the three documented
    /// (dst_l, dst_h_field) patterns and rejects every other combination.
    #[test]
    fn destination_filter_is_exact(dst_l in 0u8..=0x7F, dst_h_field in 0u8..=0x7F) {
        let id = module_id();
        let frame = peer::encode(0x23, dst_l, 0, [2, 0, 0, 0, dst_h_field, 0, 0, 0]);
        let parsed = PeerTransfer::parse(&frame).unwrap();

        let expected = (dst_l == 0 && dst_h_field == 0)
            || (dst_l == 0x7F && dst_h_field == id.addr_high)
            || (dst_l == id.addr_low && dst_h_field == id.addr_high);
        prop_assert_eq!(parsed.addressed_to(&id), expected);
    }

    /// Only command bytes 1 and 2 decode to an SV operation.
    #[test]
    fn sv_command_space(d in proptest::array::uniform8(0u8..=255)) {
        match (d[0], SvCommand::from_data(&d)) {
            (2, Some(SvCommand::Read { register })) => prop_assert_eq!(register, d[1]),
            (1, Some(SvCommand::Write { register, value })) => {
                prop_assert_eq!(register, d[1]);
                prop_assert_eq!(value, d[3]);
            }
            (cmd, decoded) => {
                prop_assert!(cmd != 1 && cmd != 2);
                prop_assert_eq!(decoded, None);
            }
        }
    }

    /// Switch requests survive encode → recognize for the whole
    /// 11-bit accessory address space.
    #[test]
    fn switch_request_address_round_trip(
        address in 1u16..=2048,
        output in any::<bool>(),
        direction in any::<bool>(),
    ) {
        let event = recognize(&switch_request(address, output, direction));
        prop_assert_eq!(event, BusEvent::SwitchRequested { address, output, direction });
    }

    /// Arbitrary byte soup never panics the decode paths.
    #[test]
    fn decode_paths_tolerate_any_bytes(bytes in proptest::collection::vec(0u8..=255, 0..=16)) {
        let mut frame = RawFrame::new();
        frame.extend_from_slice(&bytes).unwrap();

        let _ = recognize(&frame);
        if let Some(parsed) = PeerTransfer::parse(&frame) {
            let _ = SvCommand::from_data(&parsed.data());
            let _ = parsed.addressed_to(&module_id());
        }
    }
}

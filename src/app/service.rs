//! Module service — the hexagonal core.
//!
//! [`IoModule`] owns the SV table and orchestrates one dispatch-loop
//! iteration at a time:
//!
//! ```text
//!  TransportPort ──▶ ┌───────────────────────────┐ ──▶ EventSink
//!                    │         IoModule          │
//!     PinPort    ◀──▶│  recognizer · SV codec ·  │
//!   StoragePort  ◀──▶│      channel engine       │
//!                    └───────────────────────────┘
//! ```
//!
//! The loop is single-threaded and cooperative: at most one inbound frame
//! per iteration, then one full input sweep. The only blocking operation
//! is the pulse dwell inside the channel engine, which stalls the whole
//! loop; the transport adapter decides what happens to frames arriving in
//! that window.

use embedded_hal::delay::DelayNs;
use log::{debug, info, trace};

use crate::bus::peer::{self, PeerTransfer, SvCommand};
use crate::bus::recognizer::{BusEvent, recognize};
use crate::bus::RawFrame;
use crate::channels;
use crate::sv::{ModuleIdentity, SvTable};

use super::events::AppEvent;
use super::ports::{EventSink, PinPort, StoragePort, TransportPort};

/// The module core: SV table plus dispatch logic.
pub struct IoModule {
    sv: SvTable,
}

impl IoModule {
    /// Boot sequence: load the table, check the version byte, and on a
    /// valid configuration bring the channel pins up.
    ///
    /// After an identity reset the pins deliberately stay unconfigured
    /// until the next power cycle, mirroring the factory-reset behavior of
    /// the board this module replaces: a half-valid table never drives
    /// hardware.
    pub fn boot(
        storage: &mut impl StoragePort,
        pins: &mut impl PinPort,
        sink: &mut impl EventSink,
    ) -> Self {
        let mut sv = SvTable::load(storage);
        match sv.validate(storage) {
            Some(stored_version) => {
                sink.emit(&AppEvent::IdentityReset { stored_version });
            }
            None => {
                channels::init_pins(&mut sv, pins);
                let id = sv.identity();
                info!(
                    "module up: version {}, bus address {}/{}",
                    id.version, id.addr_low, id.addr_high
                );
                sink.emit(&AppEvent::Started {
                    version: id.version,
                    addr_low: id.addr_low,
                    addr_high: id.addr_high,
                });
            }
        }
        Self { sv }
    }

    /// The module's current bus identity.
    pub fn identity(&self) -> ModuleIdentity {
        self.sv.identity()
    }

    /// One dispatch-loop iteration: poll the transport for at most one
    /// frame, route it (generic switch/sensor path first, SV peer path as
    /// fallback), then run the full input sweep unconditionally.
    pub fn poll(
        &mut self,
        bus: &mut impl TransportPort,
        pins: &mut impl PinPort,
        delay: &mut impl DelayNs,
        storage: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) {
        if let Some(frame) = bus.poll_receive() {
            trace!("RX {:02X?}", frame.as_slice());
            match recognize(&frame) {
                BusEvent::SwitchRequested {
                    address,
                    output,
                    direction,
                } => {
                    sink.emit(&AppEvent::SwitchRequested {
                        address,
                        output,
                        direction,
                    });
                    channels::actuate(&self.sv, pins, delay, address, output, direction);
                }
                BusEvent::SensorChanged { address, active } => {
                    sink.emit(&AppEvent::SensorObserved { address, active });
                }
                BusEvent::SwitchReport {
                    address,
                    output,
                    direction,
                } => {
                    sink.emit(&AppEvent::SwitchReported {
                        address,
                        output,
                        direction,
                    });
                }
                BusEvent::SwitchState {
                    address,
                    output,
                    direction,
                } => {
                    sink.emit(&AppEvent::SwitchStateObserved {
                        address,
                        output,
                        direction,
                    });
                }
                BusEvent::Unrecognized => {
                    if !self.handle_peer(&frame, bus, storage, sink) {
                        trace!("frame not handled, dropped");
                    }
                }
            }
        }

        channels::poll_inputs(&mut self.sv, pins, bus, sink);
    }

    /// SV peer-transfer path. Returns whether the frame was handled;
    /// foreign-addressed or malformed transfers are silently dropped.
    fn handle_peer(
        &mut self,
        frame: &RawFrame,
        bus: &mut impl TransportPort,
        storage: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) -> bool {
        let Some(transfer) = PeerTransfer::parse(frame) else {
            return false;
        };
        if !transfer.addressed_to(&self.sv.identity()) {
            return false;
        }

        match SvCommand::from_data(&transfer.data()) {
            Some(SvCommand::Read { register }) => {
                let payload = self.sv.read3(register as usize);
                debug!("SV read {} -> {:02X?}", register, payload);
                bus.send(&peer::encode_response(&transfer, &self.sv.identity(), payload));
                sink.emit(&AppEvent::SvRead { register });
                true
            }
            Some(SvCommand::Write { register, value }) => {
                // Register 0 holds the firmware version: reserved, ack-only.
                if register > 0 {
                    self.sv.write_byte(register as usize, value, storage);
                    debug!("SV write {} <- {:#04X}", register, value);
                    sink.emit(&AppEvent::SvWritten { register, value });
                }
                // Identity is re-read after the write so an address change
                // is already reflected in the acknowledgement's source.
                bus.send(&peer::encode_response(
                    &transfer,
                    &self.sv.identity(),
                    [0x00, 0x00, value],
                ));
                true
            }
            None => false,
        }
    }
}

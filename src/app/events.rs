//! Outbound application events.
//!
//! The [`IoModule`](super::service::IoModule) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them — log to the console, mirror to a monitor
//! port, feed a test recorder.

/// Structured events emitted by the module core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The module finished booting with a valid configuration.
    Started { version: u8, addr_low: u8, addr_high: u8 },

    /// The stored table carried a foreign version byte; the identity
    /// fields were reset to factory defaults and persisted.
    IdentityReset { stored_version: u8 },

    /// An input channel observed an electrical edge and reported it.
    InputChanged { channel: usize, address: u16, level: bool },

    /// A sensor report from elsewhere on the bus (observation only).
    SensorObserved { address: u16, active: bool },

    /// A switch command addressed to the bus (drives output actuation).
    SwitchRequested { address: u16, output: bool, direction: bool },

    /// A switch report from elsewhere on the bus (observation only).
    SwitchReported { address: u16, output: bool, direction: bool },

    /// A switch state answer from elsewhere on the bus (observation only).
    SwitchStateObserved { address: u16, output: bool, direction: bool },

    /// An SV read was answered.
    SvRead { register: u8 },

    /// An SV write was applied (register 0 writes are acknowledged but
    /// never applied, and never produce this event).
    SvWritten { register: u8, value: u8 },
}

//! SVIO — simulation harness entry point.
//!
//! Boots the module core against the host adapters (file-backed storage,
//! simulated pin bank, in-memory bus) and plays a short scripted session:
//! first-boot identity reset, remote channel configuration over SV writes,
//! a power cycle to bring the pins up, then a switch command and an input
//! edge. On target hardware the same core runs with the board's GPIO bank
//! and bus driver behind the identical port traits.

use anyhow::Result;
use embedded_hal::digital::PinState;
use log::info;

use svio::adapters::hardware::{SimDelay, SimPinBank};
use svio::adapters::log_sink::LogEventSink;
use svio::adapters::storage::FileStorage;
use svio::adapters::transport::QueueTransport;
use svio::app::service::IoModule;
use svio::bus::{peer, switch_request};
use svio::channels::ChannelConfig;
use svio::sv::{DEFAULT_ADDR_HIGH, DEFAULT_ADDR_LOW};

/// Source address the scripted "configuration tool" claims on the bus.
const TOOL_ADDR: u8 = 0x23;

/// Build an SV write request addressed to the module's factory identity.
fn sv_write(register: u8, value: u8) -> svio::bus::RawFrame {
    peer::encode(
        TOOL_ADDR,
        DEFAULT_ADDR_LOW,
        0x00,
        [1, register, 0, value, DEFAULT_ADDR_HIGH, 0, 0, 0],
    )
}

/// Build an SV read request addressed to the module's factory identity.
fn sv_read(register: u8) -> svio::bus::RawFrame {
    peer::encode(
        TOOL_ADDR,
        DEFAULT_ADDR_LOW,
        0x00,
        [2, register, 0, 0, DEFAULT_ADDR_HIGH, 0, 0, 0],
    )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    info!("SVIO v{} simulation harness", env!("CARGO_PKG_VERSION"));

    let table_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "svio-table.bin".to_string());
    let mut storage = FileStorage::open(&table_path);
    let mut pins = SimPinBank::new();
    let mut delay = SimDelay::new();
    let mut bus = QueueTransport::new();
    let mut sink = LogEventSink::new();

    // ── First boot ────────────────────────────────────────────
    // Erased storage carries no valid version byte, so this resets the
    // identity fields; channel pins stay unconfigured until the next boot.
    let mut module = IoModule::boot(&mut storage, &mut pins, &mut sink);

    // ── Remote configuration over SV writes ───────────────────
    // Channel 1: pulsed output on switch address 10, closed polarity.
    // Channel 2: continuous software-reset output on switch address 11.
    // Channel 3: sensor input on value1 = 5, closed polarity.
    let records: [(u8, [u8; 3]); 3] = [
        (3, [ChannelConfig::DIRECTION_MASK | ChannelConfig::PULSE_MASK, 9, 0x20]),
        (6, [ChannelConfig::DIRECTION_MASK, 10, 0x00]),
        (9, [0x00, 5, 0x20]),
    ];
    for (base, record) in records {
        for (offset, &value) in record.iter().enumerate() {
            bus.push_inbound(sv_write(base + offset as u8, value));
            module.poll(&mut bus, &mut pins, &mut delay, &mut storage, &mut sink);
        }
    }
    info!("configuration written, {} frames queued for transmit", bus.outbound_len());

    // ── Power cycle ───────────────────────────────────────────
    let mut module = IoModule::boot(&mut storage, &mut pins, &mut sink);
    let id = module.identity();
    info!("rebooted as {}/{}", id.addr_low, id.addr_high);

    // Read channel 1's record back.
    bus.push_inbound(sv_read(3));
    module.poll(&mut bus, &mut pins, &mut delay, &mut storage, &mut sink);

    // ── Switch commands ───────────────────────────────────────
    // Pulse channel 1 (address 10, closed, on), then toggle channel 2.
    bus.push_inbound(switch_request(10, true, true));
    module.poll(&mut bus, &mut pins, &mut delay, &mut storage, &mut sink);
    bus.push_inbound(switch_request(11, true, false));
    module.poll(&mut bus, &mut pins, &mut delay, &mut storage, &mut sink);

    // ── Input edge ────────────────────────────────────────────
    pins.set_level(2, PinState::Low);
    module.poll(&mut bus, &mut pins, &mut delay, &mut storage, &mut sink);

    info!(
        "session done: {} frames transmitted, {} ms spent in pulse dwells",
        bus.outbound_len(),
        delay.elapsed_ms()
    );
    while let Some(frame) = bus.take_outbound() {
        info!("bus out: {:02X?}", frame.as_slice());
    }

    Ok(())
}

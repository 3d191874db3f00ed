//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the console log. A bus-monitor or telemetry adapter would implement
//! the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

fn onoff(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn dir(flag: bool) -> &'static str {
    if flag { "closed" } else { "thrown" }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                version,
                addr_low,
                addr_high,
            } => {
                info!("START | v{} @ {}/{}", version, addr_low, addr_high);
            }
            AppEvent::IdentityReset { stored_version } => {
                info!("RESET | stored v{} rejected, identity set to defaults", stored_version);
            }
            AppEvent::InputChanged {
                channel,
                address,
                level,
            } => {
                info!("INPUT | channel {} -> {}, reported as sensor {}", channel, u8::from(*level), address);
            }
            AppEvent::SensorObserved { address, active } => {
                info!("SENSE | sensor {} {}", address, if *active { "active" } else { "inactive" });
            }
            AppEvent::SwitchRequested {
                address,
                output,
                direction,
            } => {
                info!("SWREQ | switch {}:{} - {}", address, dir(*direction), onoff(*output));
            }
            AppEvent::SwitchReported {
                address,
                output,
                direction,
            } => {
                info!("SWREP | switch {}:{} - {}", address, dir(*direction), onoff(*output));
            }
            AppEvent::SwitchStateObserved {
                address,
                output,
                direction,
            } => {
                info!("SWST  | switch {}:{} - {}", address, dir(*direction), onoff(*output));
            }
            AppEvent::SvRead { register } => {
                info!("SVRD  | register {}", register);
            }
            AppEvent::SvWritten { register, value } => {
                info!("SVWR  | register {} <- {:#04X}", register, value);
            }
        }
    }
}

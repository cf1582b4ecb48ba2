// src/core/info/mod.rs

//! Builds the status snapshot returned for every valid request.
//!
//! The producer never fails: each telemetry collaborator that errors is
//! replaced by its sentinel string, and the clock cannot fail.

pub mod art;
pub mod clock;
pub mod sources;

pub use art::Character;
pub use clock::{Clock, FixedClock, SystemClock};
pub use sources::{DeviceIdentifierSource, SysfsMacAddress, SystemUptime, UptimeSource};

use chrono::{SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Substituted for the device identifier when it cannot be read.
pub const MAC_NOT_FOUND: &str = "MAC_NOT_FOUND";
/// Substituted for the uptime when it cannot be read.
pub const UPTIME_NOT_FOUND: &str = "UPTIME_NOT_FOUND";

/// One immutable reading of the host, serialized once per valid request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Local wall-clock time as `HH:MM:SS`.
    pub message: String,
    pub character_art: String,
    pub character_message: String,
    /// Always in `0..=59`.
    pub current_minute: u32,
    pub device_mac_address: String,
    /// RFC 3339 in UTC, microsecond precision.
    pub timestamp_utc: String,
    pub system_uptime: String,
}

/// Produces `StatusSnapshot`s from a clock and two telemetry sources.
pub struct InfoProducer {
    clock: Box<dyn Clock>,
    device: Box<dyn DeviceIdentifierSource>,
    uptime: Box<dyn UptimeSource>,
}

impl InfoProducer {
    pub fn new(
        clock: impl Clock + 'static,
        device: impl DeviceIdentifierSource + 'static,
        uptime: impl UptimeSource + 'static,
    ) -> Self {
        Self {
            clock: Box::new(clock),
            device: Box::new(device),
            uptime: Box::new(uptime),
        }
    }

    /// The producer backed by the local clock, sysfs and the OS uptime.
    pub fn system(device_interface: &str) -> Self {
        Self::new(
            SystemClock,
            SysfsMacAddress::new(device_interface),
            SystemUptime,
        )
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let now = self.clock.now();
        let current_minute = now.minute() % 60;
        let character = Character::for_minute(current_minute);

        let device_mac_address = self.device.device_id().unwrap_or_else(|e| {
            debug!("Device identifier lookup failed: {}", e);
            MAC_NOT_FOUND.to_string()
        });
        let system_uptime = self.uptime.uptime().unwrap_or_else(|e| {
            debug!("Uptime lookup failed: {}", e);
            UPTIME_NOT_FOUND.to_string()
        });

        StatusSnapshot {
            message: now.format("%H:%M:%S").to_string(),
            character_art: character.art().to_string(),
            character_message: character.message().to_string(),
            current_minute,
            device_mac_address,
            timestamp_utc: now
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Micros, true),
            system_uptime,
        }
    }
}

impl std::fmt::Debug for InfoProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfoProducer").finish_non_exhaustive()
    }
}

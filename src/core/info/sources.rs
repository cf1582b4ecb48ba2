// src/core/info/sources.rs

//! Host telemetry collaborators: the device identifier and the uptime text.

use crate::core::StatusError;
use std::fs;
use std::path::PathBuf;
use sysinfo::System;

/// Supplies a string that identifies this device, normally a MAC address.
pub trait DeviceIdentifierSource: Send + Sync {
    fn device_id(&self) -> Result<String, StatusError>;
}

/// Supplies a human-readable description of how long the host has been up.
pub trait UptimeSource: Send + Sync {
    fn uptime(&self) -> Result<String, StatusError>;
}

/// Reads the MAC address of a network interface from sysfs.
#[derive(Debug, Clone)]
pub struct SysfsMacAddress {
    path: PathBuf,
}

impl SysfsMacAddress {
    pub fn new(interface: &str) -> Self {
        Self {
            path: PathBuf::from(format!("/sys/class/net/{interface}/address")),
        }
    }

    /// Reads from an arbitrary file instead of sysfs.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DeviceIdentifierSource for SysfsMacAddress {
    fn device_id(&self) -> Result<String, StatusError> {
        let address = fs::read_to_string(&self.path)?;
        let address = address.trim();
        if address.is_empty() {
            return Err(StatusError::Internal(format!(
                "{} is empty",
                self.path.display()
            )));
        }
        Ok(address.to_string())
    }
}

/// Host uptime from the operating system, rendered like `uptime -p`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUptime;

impl UptimeSource for SystemUptime {
    fn uptime(&self) -> Result<String, StatusError> {
        match System::uptime() {
            0 => Err(StatusError::Internal(
                "uptime is not available on this platform".into(),
            )),
            secs => Ok(format_uptime(secs)),
        }
    }
}

/// Formats seconds as `up 1 week, 2 days, 3 hours, 4 minutes`, skipping zero
/// units. Anything under a minute is `up 0 minutes`.
pub fn format_uptime(total_secs: u64) -> String {
    const UNITS: [(u64, &str); 5] = [
        (365 * 24 * 60, "year"),
        (7 * 24 * 60, "week"),
        (24 * 60, "day"),
        (60, "hour"),
        (1, "minute"),
    ];

    let mut minutes = total_secs / 60;
    let mut parts = Vec::new();
    for (size, name) in UNITS {
        let count = minutes / size;
        minutes %= size;
        if count > 0 {
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{count} {name}{plural}"));
        }
    }

    if parts.is_empty() {
        "up 0 minutes".to_string()
    } else {
        format!("up {}", parts.join(", "))
    }
}

// src/poller/render.rs

//! Turns a raw reply into the operator-facing summary.

use serde_json::Value;

/// Shown for any field the reply does not carry.
pub const MISSING_FIELD: &str = "N/A";

/// The result of rendering one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// The reply parsed as JSON; holds the labelled summary.
    Status(String),
    /// The reply was not JSON; holds the raw text with a label.
    NonJson(String),
}

impl Rendered {
    pub fn text(&self) -> &str {
        match self {
            Rendered::Status(text) | Rendered::NonJson(text) => text,
        }
    }
}

/// Parses `raw` as JSON and renders the fixed set of fields. Never fails:
/// missing fields become `N/A` and unparseable input is shown verbatim.
pub fn render_response(raw: &str) -> Rendered {
    match serde_json::from_str::<Value>(raw) {
        Ok(data) => Rendered::Status(render_status(&data)),
        Err(_) => Rendered::NonJson(format!("Received non-JSON response: {raw}")),
    }
}

fn render_status(data: &Value) -> String {
    let lines = [
        "=== SYSTEM INFORMATION ===".to_string(),
        format!("Current Server Time: {}", field(data, "message")),
        format!("Current Minute: {}", field(data, "current_minute")),
        String::new(),
        field(data, "character_message"),
        String::new(),
        field(data, "character_art"),
        String::new(),
        format!("Device MAC Address: {}", field(data, "device_mac_address")),
        format!("Timestamp (UTC): {}", field(data, "timestamp_utc")),
        format!("System Uptime: {}", field(data, "system_uptime")),
        "=========================".to_string(),
    ];
    lines.join("\n")
}

/// Strings are shown without quotes; other JSON values in their JSON form.
fn field(data: &Value, name: &str) -> String {
    match data.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => MISSING_FIELD.to_string(),
    }
}

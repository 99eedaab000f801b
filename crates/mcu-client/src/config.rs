//! Client configuration.

use std::time::Duration;

use crate::error::Error;

/// Default serial port name.
pub const DEFAULT_PORT: &str = "COM6";

/// Default baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default target address.
pub const DEFAULT_TARGET_ID: u8 = 0x01;

/// Configuration for talking to one target.
///
/// `port` and `baud_rate` describe the serial link for whoever opens it;
/// the client itself only uses `target_id` and `response_timeout`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Config {
    /// Serial port name (default: `COM6`).
    pub port: String,
    /// Baud rate (default: 115200).
    pub baud_rate: u32,
    /// Target address placed in every request (default: `0x01`).
    pub target_id: u8,
    /// How long to wait for a response (default: wait indefinitely).
    pub response_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            target_id: DEFAULT_TARGET_ID,
            response_timeout: None,
        }
    }
}

impl Config {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a connection string.
    ///
    /// Format: `Port=COM3;Baud=9600;Target=0x02;Timeout=5`. Keys are
    /// case-insensitive. `Target` accepts decimal or `0x`-prefixed hex and
    /// `Timeout` is in seconds, where `0` disables the timeout. Unknown
    /// keys are ignored.
    pub fn from_connection_string(conn_str: &str) -> Result<Self, Error> {
        let mut config = Self::default();

        for part in conn_str.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| Error::Config(format!("invalid key-value: {part}")))?;

            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "port" => {
                    if value.is_empty() {
                        return Err(Error::Config("port must not be empty".into()));
                    }
                    config.port = value.to_string();
                }
                "baud" | "baudrate" | "baud rate" => {
                    config.baud_rate = value
                        .parse()
                        .ok()
                        .filter(|&baud| baud > 0)
                        .ok_or_else(|| Error::Config(format!("invalid baud rate: {value}")))?;
                }
                "target" | "targetid" | "target id" => {
                    config.target_id = parse_u8(value)
                        .ok_or_else(|| Error::Config(format!("invalid target id: {value}")))?;
                }
                "timeout" | "response timeout" => {
                    let secs: u64 = value
                        .parse()
                        .map_err(|_| Error::Config(format!("invalid timeout: {value}")))?;
                    config.response_timeout = (secs > 0).then(|| Duration::from_secs(secs));
                }
                _ => {
                    tracing::debug!(
                        key = key,
                        value = value,
                        "ignoring unknown connection string option"
                    );
                }
            }
        }

        Ok(config)
    }

    /// Set the serial port name.
    #[must_use]
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = port.into();
        self
    }

    /// Set the baud rate.
    #[must_use]
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the target address.
    #[must_use]
    pub fn target_id(mut self, target_id: u8) -> Self {
        self.target_id = target_id;
        self
    }

    /// Bound the wait for each response.
    #[must_use]
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = Some(timeout);
        self
    }

    /// Wait for responses indefinitely.
    #[must_use]
    pub fn no_response_timeout(mut self) -> Self {
        self.response_timeout = None;
        self
    }
}

fn parse_u8(value: &str) -> Option<u8> {
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

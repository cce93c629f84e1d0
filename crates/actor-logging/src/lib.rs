//! Logging capability contract.
//!
//! [`Logging`] writes log lines through the host. [`enable_macros`] installs
//! a [`HostLogger`] so the standard `log` macros reach the host as well.

use std::sync::Arc;

use actor_core::{Field, HandlerResult, HostClient, HostTransport, Record};

mod logger;

pub use logger::{enable_macros, HostLogger};

/// Contract namespace of logging providers.
pub const NAMESPACE: &str = "wasmcloud:logging";

/// Outbound operation writing one log line.
pub const OP_LOG: &str = "WriteLog";

/// Levels a provider understands, most severe first.
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteLogArgs {
    /// Free-form filter key, typically the guest or module name. May be empty.
    pub target: String,
    pub level: String,
    pub text: String,
}

impl Record for WriteLogArgs {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "target",
            decode: |r, d| {
                r.target = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.target),
        },
        Field {
            name: "level",
            decode: |r, d| {
                r.level = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.level),
        },
        Field {
            name: "text",
            decode: |r, d| {
                r.text = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.text),
        },
    ];
}

/// Lowercases `level` if it names a known level, otherwise returns `info`.
pub fn normalize_level(level: &str) -> &'static str {
    let lowered = level.trim().to_ascii_lowercase();
    LOG_LEVELS
        .iter()
        .copied()
        .find(|known| *known == lowered)
        .unwrap_or("info")
}

/// Outbound client for a logging provider.
#[derive(Debug, Clone)]
pub struct Logging {
    client: HostClient,
}

impl Logging {
    pub fn new(transport: Arc<dyn HostTransport>) -> Self {
        Self::from_client(HostClient::new(transport, NAMESPACE))
    }

    pub fn with_binding(transport: Arc<dyn HostTransport>, binding: impl Into<String>) -> Self {
        Self::from_client(HostClient::new(transport, NAMESPACE).with_binding(binding))
    }

    pub fn from_client(client: HostClient) -> Self {
        Self { client }
    }

    /// Writes `text` at `level` under `target`. Unknown levels are logged as
    /// `info`.
    pub fn write_log(&self, target: &str, level: &str, text: &str) -> HandlerResult<()> {
        let args = WriteLogArgs {
            target: target.to_string(),
            level: normalize_level(level).to_string(),
            text: text.to_string(),
        };
        self.client.call_no_reply(OP_LOG, &args)
    }
}

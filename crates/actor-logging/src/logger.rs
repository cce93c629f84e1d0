use std::cell::Cell;
use std::sync::Arc;

use actor_core::{to_bytes, ActorError, ErrorInfo, HostTransport, DEFAULT_BINDING};
use log::{Level, LevelFilter, Log, Metadata};

use crate::{WriteLogArgs, NAMESPACE, OP_LOG};

thread_local! {
    static FORWARDING: Cell<bool> = const { Cell::new(false) };
}

/// `log` backend that forwards every enabled record to the host as a
/// `WriteLog` call.
///
/// Records emitted while a record is being forwarded (for instance by the
/// transport itself) are dropped instead of recursing.
pub struct HostLogger {
    transport: Arc<dyn HostTransport>,
    binding: String,
    level: LevelFilter,
}

impl HostLogger {
    pub fn new(transport: Arc<dyn HostTransport>, level: LevelFilter) -> Self {
        Self {
            transport,
            binding: DEFAULT_BINDING.to_string(),
            level,
        }
    }

    pub fn with_binding(mut self, binding: impl Into<String>) -> Self {
        self.binding = binding.into();
        self
    }

    fn forward(&self, args: &WriteLogArgs) {
        if let Ok(payload) = to_bytes(args) {
            let _ = self
                .transport
                .host_call(&self.binding, NAMESPACE, OP_LOG, payload);
        }
    }
}

impl Log for HostLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if FORWARDING.with(|flag| flag.replace(true)) {
            return;
        }
        let args = WriteLogArgs {
            target: record.target().to_string(),
            level: level_name(record.level()).to_string(),
            text: record.args().to_string(),
        };
        self.forward(&args);
        FORWARDING.with(|flag| flag.set(false));
    }

    fn flush(&self) {}
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "error",
        Level::Warn => "warn",
        Level::Info => "info",
        Level::Debug => "debug",
        Level::Trace => "trace",
    }
}

/// Installs a [`HostLogger`] as the process-wide `log` backend.
///
/// Fails if another logger is already installed.
pub fn enable_macros(transport: Arc<dyn HostTransport>, level: LevelFilter) -> Result<(), ActorError> {
    log::set_boxed_logger(Box::new(HostLogger::new(transport, level))).map_err(|err| {
        ActorError::Config(
            ErrorInfo::new("actor_logging.logger_installed", err.to_string())
                .with_hint("enable_macros may only be called once per guest"),
        )
    })?;
    log::set_max_level(level);
    Ok(())
}

//! Reporter configuration
//!
//! Environment defaults with a builder for programmatic overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Builder calls on `ReporterConfig`
//! 2. Environment variables (`ReporterConfig::from_env`)
//! 3. Library defaults
//!
//! Nothing here takes effect until `init()` is called. Before that the
//! reporter runs on library defaults and logging reads its own variables
//! lazily. The reporter flags only change through `init`: `set` must not
//! touch the environment, since reading it allocates.
//!
//! # Example
//!
//! ```rust,ignore
//! use lasterr_runtime::config::{init, ReporterConfig};
//!
//! init(&ReporterConfig::from_env().trace_records(true));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use lasterr_core::env::{env_get, env_get_bool};
use lasterr_core::kprint::{self, LogLevel};

pub mod defaults {
    use lasterr_core::kprint::{LogLevel, DEFAULT_LOG_LEVEL};

    pub const LOG_LEVEL: LogLevel = DEFAULT_LOG_LEVEL;
    pub const FLUSH_EPRINT: bool = false;
    pub const TRACE_RECORDS: bool = false;
    pub const OS_AUGMENT: bool = true;
}

static TRACE_RECORDS: AtomicBool = AtomicBool::new(defaults::TRACE_RECORDS);
static OS_AUGMENT: AtomicBool = AtomicBool::new(defaults::OS_AUGMENT);

/// Reporter configuration with builder pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    /// Diagnostic log level for lasterr's own output
    pub log_level: LogLevel,
    /// Flush stderr after every log line
    pub flush_eprint: bool,
    /// Log every stored record at debug level
    pub trace_records: bool,
    /// Append the platform's last OS error to `ErrorClass::Os` records
    pub os_augment: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ReporterConfig {
    /// Library defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `LASTERR_LOG_LEVEL` - off, error, warn, info, debug, trace
    /// - `LASTERR_FLUSH_EPRINT` - Flush stderr after each line (0/1)
    /// - `LASTERR_TRACE_RECORDS` - Log each stored record (0/1)
    /// - `LASTERR_OS_AUGMENT` - Append OS error text to Os records (0/1)
    pub fn from_env() -> Self {
        Self {
            log_level: env_get("LASTERR_LOG_LEVEL", defaults::LOG_LEVEL),
            flush_eprint: env_get_bool("LASTERR_FLUSH_EPRINT", defaults::FLUSH_EPRINT),
            trace_records: env_get_bool("LASTERR_TRACE_RECORDS", defaults::TRACE_RECORDS),
            os_augment: env_get_bool("LASTERR_OS_AUGMENT", defaults::OS_AUGMENT),
        }
    }

    /// Library defaults, ignoring the environment.
    pub fn new() -> Self {
        Self {
            log_level: defaults::LOG_LEVEL,
            flush_eprint: defaults::FLUSH_EPRINT,
            trace_records: defaults::TRACE_RECORDS,
            os_augment: defaults::OS_AUGMENT,
        }
    }

    // Builder methods

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn flush_eprint(mut self, enable: bool) -> Self {
        self.flush_eprint = enable;
        self
    }

    pub fn trace_records(mut self, enable: bool) -> Self {
        self.trace_records = enable;
        self
    }

    pub fn os_augment(mut self, enable: bool) -> Self {
        self.os_augment = enable;
        self
    }
}

/// Apply `config` process-wide.
pub fn init(config: &ReporterConfig) {
    kprint::set_log_level(config.log_level);
    kprint::set_flush_enabled(config.flush_eprint);
    TRACE_RECORDS.store(config.trace_records, Ordering::Relaxed);
    OS_AUGMENT.store(config.os_augment, Ordering::Relaxed);
}

#[inline]
pub(crate) fn trace_records() -> bool {
    TRACE_RECORDS.load(Ordering::Relaxed)
}

#[inline]
pub(crate) fn os_augment() -> bool {
    OS_AUGMENT.load(Ordering::Relaxed)
}

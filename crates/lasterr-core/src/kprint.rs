//! Kernel-style print macros for lasterr
//!
//! Leveled, stderr-locked diagnostic output. Library code logs through
//! these macros and nothing else.
//!
//! # Environment Variables
//!
//! - `LASTERR_FLUSH_EPRINT=1` - Flush stderr after each line
//! - `LASTERR_LOG_LEVEL=<level>` - off, error, warn, info, debug, trace (or 0-5).
//!   Defaults to `warn`.
//!
//! # Usage
//!
//! ```ignore
//! use lasterr_core::{kdebug, kwarn};
//!
//! kwarn!("slot for thread {:?} already torn down", id);
//! kdebug!("recorded [{}] {}", class, message);
//! ```
//!
//! Logging may allocate (the first call reads the environment). Paths that
//! run while allocation is failing must not log.

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Log levels (matches common conventions)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Parse a level name or digit. Unknown input yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let level = match s.trim().to_ascii_lowercase().as_str() {
            "off" | "0" => LogLevel::Off,
            "error" | "1" => LogLevel::Error,
            "warn" | "2" => LogLevel::Warn,
            "info" | "3" => LogLevel::Info,
            "debug" | "4" => LogLevel::Debug,
            "trace" | "5" => LogLevel::Trace,
            _ => return None,
        };
        Some(level)
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[lasterr ERROR]",
            LogLevel::Warn => "[lasterr WARN] ",
            LogLevel::Info => "[lasterr INFO] ",
            LogLevel::Debug => "[lasterr DEBUG]",
            LogLevel::Trace => "[lasterr TRACE]",
        }
    }
}

impl core::str::FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::parse(s).ok_or(())
    }
}

/// Level used when `LASTERR_LOG_LEVEL` is unset or unparsable.
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Warn;

cfg_if::cfg_if! {
    if #[cfg(feature = "no-trace")] {
        const MAX_LEVEL: LogLevel = LogLevel::Debug;
    } else {
        const MAX_LEVEL: LogLevel = LogLevel::Trace;
    }
}

static FLUSH_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(DEFAULT_LOG_LEVEL as u8);
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize logging from environment variables.
///
/// Called automatically on first log. Explicit `set_*` calls made before the
/// first log are overridden by the environment only if `init` has not run.
pub fn init() {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    FLUSH_ENABLED.store(
        crate::env::env_get_bool("LASTERR_FLUSH_EPRINT", false),
        Ordering::Relaxed,
    );

    let level = crate::env::env_get("LASTERR_LOG_LEVEL", DEFAULT_LOG_LEVEL);
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

#[inline]
pub fn flush_enabled() -> bool {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    FLUSH_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn log_level() -> LogLevel {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Set log level programmatically. Suppresses the lazy environment read.
pub fn set_log_level(level: LogLevel) {
    INITIALIZED.store(true, Ordering::SeqCst);
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Set flush mode programmatically. Suppresses the lazy environment read.
pub fn set_flush_enabled(enabled: bool) {
    INITIALIZED.store(true, Ordering::SeqCst);
    FLUSH_ENABLED.store(enabled, Ordering::Relaxed);
}

#[inline]
pub fn level_enabled(level: LogLevel) -> bool {
    level != LogLevel::Off && level <= MAX_LEVEL && level <= log_level()
}

/// Run `f` against locked stderr, flushing afterwards when enabled.
fn with_stderr(f: impl FnOnce(&mut std::io::StderrLock<'static>)) {
    let mut handle = std::io::stderr().lock();
    f(&mut handle);
    if flush_enabled() {
        let _ = handle.flush();
    }
}

#[doc(hidden)]
pub fn _kprint_impl(args: std::fmt::Arguments<'_>) {
    with_stderr(|h| {
        let _ = h.write_fmt(args);
    });
}

#[doc(hidden)]
pub fn _kprintln_impl(args: std::fmt::Arguments<'_>) {
    with_stderr(|h| {
        let _ = writeln!(h, "{}", args);
    });
}

#[doc(hidden)]
pub fn _klog_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }
    with_stderr(|h| {
        let _ = writeln!(h, "{} {}", level.prefix(), args);
    });
}

// ============================================================================
// Public Macros
// ============================================================================

/// Print to stderr (no newline)
#[macro_export]
macro_rules! kprint {
    ($($arg:tt)*) => {{
        $crate::kprint::_kprint_impl(format_args!($($arg)*));
    }};
}

/// Print to stderr with newline
#[macro_export]
macro_rules! kprintln {
    () => {{
        $crate::kprint::_kprintln_impl(format_args!(""));
    }};
    ($($arg:tt)*) => {{
        $crate::kprint::_kprintln_impl(format_args!($($arg)*));
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __klog {
    ($level:ident, $($arg:tt)*) => {{
        $crate::kprint::_klog_impl(
            $crate::kprint::LogLevel::$level,
            format_args!($($arg)*)
        );
    }};
}

#[macro_export]
macro_rules! kerror {
    ($($arg:tt)*) => { $crate::__klog!(Error, $($arg)*) };
}

#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => { $crate::__klog!(Warn, $($arg)*) };
}

#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => { $crate::__klog!(Info, $($arg)*) };
}

#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => { $crate::__klog!(Debug, $($arg)*) };
}

/// Most verbose level. Never printed with the `no-trace` feature.
#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)*) => { $crate::__klog!(Trace, $($arg)*) };
}

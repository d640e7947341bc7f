//! # lasterr-runtime
//!
//! Platform-specific side of the lasterr error channel.
//!
//! This crate provides:
//! - Slot storage: one `ErrorSlot` per OS thread, or a locked global
//! - The OS last-error query-then-clear used by `ErrorClass::Os`
//! - The reporter protocol: set, set_out_of_memory, read, clear, detach
//! - `ErrorState` capture/restore around cleanup code
//! - `ResultExt` for recording `Result` failures
//! - `ReporterConfig` and `init`

pub mod config;
pub mod convert;
pub mod os;
pub mod reporter;
pub mod state;
pub mod tls;

// Re-exports
pub use config::{init, ReporterConfig};
pub use convert::{IoResultExt, ResultExt};
pub use os::OsError;
pub use reporter::{
    clear, detach, detach_into, last, last_class, report, set, set_out_of_memory, set_str,
    with_last,
};
pub use state::ErrorState;
pub use tls::THREAD_SCOPED;

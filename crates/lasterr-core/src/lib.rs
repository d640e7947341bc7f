//! # lasterr-core
//!
//! Core types for the lasterr thread-scoped error channel.
//!
//! This crate is platform-agnostic and contains no OS-specific code or
//! thread-local state. Where slots live, and the OS-error query, are in
//! `lasterr-runtime`.
//!
//! ## Modules
//!
//! - `class` - `ErrorClass`, the subsystem classification tag
//! - `code` - `ReturnCode`, generic return codes and sentinels
//! - `record` - `ErrorRecord` and the static out-of-memory record
//! - `slot` - `ErrorSlot`, the zero-or-one record cell
//! - `format` - fallible message formatting
//! - `spinlock` - lock for the global fallback slot
//! - `kprint` - kernel-style debug printing macros
//! - `env` - environment variable utilities

pub mod class;
pub mod code;
pub mod record;
pub mod slot;
pub mod format;
pub mod spinlock;
pub mod kprint;
pub mod env;

// Re-exports for convenience
pub use class::ErrorClass;
pub use code::{CodeResult, ReturnCode};
pub use record::{ErrorRecord, OUT_OF_MEMORY, OUT_OF_MEMORY_MESSAGE};
pub use slot::ErrorSlot;
pub use format::{AllocError, MessageBuf};
pub use spinlock::SpinLock;
pub use kprint::{set_log_level, LogLevel};
pub use env::{env_get, env_get_bool, env_get_opt};

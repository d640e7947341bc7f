//! # lasterr - thread-scoped last-error channel
//!
//! A fallible call returns a `ReturnCode`; the details of *why* it failed
//! are left in a per-thread slot as an `ErrorRecord` (class + message) that
//! the caller can read, clear, or take ownership of.
//!
//! ## Features
//!
//! - **Thread-scoped**: each OS thread has its own slot, no locking
//! - **Never fails**: recording survives allocation failure by falling back
//!   to a static out-of-memory record
//! - **OS-aware**: `ErrorClass::Os` records append the pending errno
//!   description and clear it
//! - **Sentinels**: `User`, `Passthrough` and `IterOver` codes that are
//!   control flow, not failures
//!
//! ## Quick Start
//!
//! ```ignore
//! use lasterr::{set_error, ErrorClass, ReturnCode, CodeResult};
//!
//! fn read_index(path: &str) -> CodeResult<()> {
//!     if path.is_empty() {
//!         set_error!(ErrorClass::Index, "invalid index path");
//!         return Err(ReturnCode::Error);
//!     }
//!     Ok(())
//! }
//!
//! fn main() {
//!     if let Err(code) = read_index("") {
//!         let rec = lasterr::last().unwrap();
//!         eprintln!("{} [{}]: {}", code, rec.class(), rec.message());
//!         lasterr::clear();
//!     }
//! }
//! ```
//!
//! ## Updating from inside `with_last`
//!
//! `with_last` lends out the record in place, without copying it. The two
//! builds treat updates made from inside that closure differently:
//!
//! | Build | `set` / `clear` / `detach` inside `with_last` |
//! |---|---|
//! | `threads` (default) | dropped, with a `kwarn!` line; the slot keeps its record |
//! | no `threads` | take effect; the closure sees a copy made beforehand |
//!
//! Read what you need, return from the closure, then update.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Library code                           │
//! │     set_error!(), set_out_of_memory(), ResultExt            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Reporter                              │
//! │     fallible formatting, OS query-then-clear, OOM fallback  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Error slot                             │
//! │      thread_local (threads)  |  SpinLock global (no threads)│
//! └─────────────────────────────────────────────────────────────┘
//! ```

// Re-export core types
pub use lasterr_core::{
    ErrorClass,
    ErrorRecord,
    ReturnCode,
    CodeResult,
    OUT_OF_MEMORY,
    OUT_OF_MEMORY_MESSAGE,
};

// Re-export kprint macros for debug logging
pub use lasterr_core::{kprint, kprintln, kerror, kwarn, kinfo, kdebug, ktrace};
pub use lasterr_core::kprint::{LogLevel, init as init_logging, set_log_level, set_flush_enabled};

// Re-export env utilities
pub use lasterr_core::{env_get, env_get_bool, env_get_opt};

// Re-export runtime API
pub use lasterr_runtime::{
    init,
    ReporterConfig,
    ErrorState,
    ResultExt,
    IoResultExt,
    OsError,
    THREAD_SCOPED,
    set,
    set_str,
    set_out_of_memory,
    last,
    last_class,
    with_last,
    clear,
    detach,
    detach_into,
    report,
};
pub use lasterr_runtime::set_error;

/// Record a failure and return early with `code`.
///
/// ```ignore
/// use lasterr::{bail, ErrorClass, ReturnCode};
///
/// if refname.is_empty() {
///     bail!(ReturnCode::InvalidSpec, ErrorClass::Reference, "empty reference name");
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($code:expr, $class:expr, $($arg:tt)+) => {{
        $crate::set_error!($class, $($arg)+);
        return ::core::result::Result::Err($code);
    }};
}

/// Run `f` with the current error saved, then put it back.
///
/// Errors recorded by `f` are discarded; whatever was in the slot before the
/// call is there again afterwards.
pub fn preserving<R>(f: impl FnOnce() -> R) -> R {
    let state = ErrorState::capture();
    let result = f();
    state.restore();
    result
}

#[cfg(all(test, feature = "threads"))]
mod tests {
    use super::*;

    fn lookup(name: &str) -> CodeResult<u32> {
        if name != "HEAD" {
            bail!(ReturnCode::NotFound, ErrorClass::Reference, "reference '{}' not found", name);
        }
        Ok(1)
    }

    #[test]
    fn bail_records_and_returns_code() {
        clear();
        assert_eq!(lookup("HEAD"), Ok(1));
        assert!(last().is_none());

        assert_eq!(lookup("refs/heads/topic"), Err(ReturnCode::NotFound));
        let rec = last().unwrap();
        assert_eq!(rec.class(), ErrorClass::Reference);
        assert_eq!(rec.message(), "reference 'refs/heads/topic' not found");
    }

    #[test]
    fn preserving_discards_cleanup_errors() {
        clear();
        set_error!(ErrorClass::Checkout, "checkout conflict");
        let n = preserving(|| {
            set_error!(ErrorClass::Os, "failed to remove lock file");
            7
        });
        assert_eq!(n, 7);
        assert_eq!(last().unwrap().message(), "checkout conflict");
    }

    #[test]
    fn preserving_keeps_empty_slot_empty() {
        clear();
        preserving(|| set_error!(ErrorClass::Filter, "filter crashed"));
        assert!(last().is_none());
    }
}

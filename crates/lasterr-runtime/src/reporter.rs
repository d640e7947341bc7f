//! Error reporter
//!
//! The public protocol over the current slot:
//!
//! ```text
//!            set / set_str / set_out_of_memory
//!   EMPTY ─────────────────────────────────────▶ POPULATED ◀─┐ set (replace)
//!     ▲  ◀──────────── clear / detach ──────────────┘ ───────┘
//!     └─ clear (no-op), detach (fails, output untouched)
//! ```
//!
//! Recording never fails and never panics on allocation failure: a message
//! that cannot be allocated is replaced by the static out-of-memory record.

use core::fmt;

use lasterr_core::format::{self, AllocError, MessageBuf};
use lasterr_core::{kdebug, CodeResult, ErrorClass, ErrorRecord, ReturnCode};

use crate::config;
use crate::os::{self, OsError};
use crate::tls;

/// Separator between the caller's text and the OS description.
const OS_SEPARATOR: &str = ": ";

/// Record a formatted error for the calling thread.
///
/// Prefer the `set_error!` macro, which builds the `fmt::Arguments`.
///
/// With `ErrorClass::Os` the platform's last OS error is read first, before
/// formatting can disturb it, appended as `"<text>: <description>"`, and
/// then cleared. If there is no pending OS error the text is stored as is.
pub fn set(class: ErrorClass, args: fmt::Arguments<'_>) {
    let os_error = if class.is_os() && config::os_augment() {
        os::take_last_os_error()
    } else {
        None
    };
    record(class, args, os_error.as_ref());
}

/// Record an unformatted message. Same semantics as `set`.
pub fn set_str(class: ErrorClass, message: &str) {
    set(class, format_args!("{}", message))
}

/// Store `args` verbatim, skipping OS augmentation even for `Os` records.
pub(crate) fn set_verbatim(class: ErrorClass, args: fmt::Arguments<'_>) {
    record(class, args, None);
}

fn record(class: ErrorClass, args: fmt::Arguments<'_>, os_error: Option<&OsError>) {
    match build_message(args, os_error) {
        Ok(message) => {
            if config::trace_records() {
                kdebug!("recorded [{}] {}", class, message);
            }
            tls::store(ErrorRecord::new(class, message));
        }
        Err(AllocError) => set_out_of_memory(),
    }
}

fn build_message(args: fmt::Arguments<'_>, os_error: Option<&OsError>) -> Result<String, AllocError> {
    let Some(os_error) = os_error else {
        return format::try_format(args);
    };
    let text_len = format::measure(args);
    let desc = os_error.description();
    let suffix_len = if text_len > 0 {
        OS_SEPARATOR.len() + desc.len()
    } else {
        desc.len()
    };

    let mut buf = MessageBuf::try_with_capacity(text_len.saturating_add(suffix_len))?;
    buf.try_push_fmt(args)?;
    if !buf.is_empty() {
        buf.try_push_str(OS_SEPARATOR)?;
    }
    buf.try_push_str(desc)?;
    Ok(buf.into_string())
}

/// Record the static out-of-memory error.
///
/// Never allocates and never fails, including on a thread that has not
/// recorded anything before.
pub fn set_out_of_memory() {
    tls::store_out_of_memory();
}

/// Inspect the current record without consuming it.
///
/// The view is only valid inside `f`. Updates made from within `f` (`set`,
/// `clear`, `detach`) are dropped with a warning while the view is open on
/// a thread's own slot. In the global build they take effect instead.
#[cfg(feature = "threads")]
pub fn with_last<R>(f: impl FnOnce(Option<&ErrorRecord>) -> R) -> R {
    tls::with_current(f)
}

/// Inspect a copy of the current record.
///
/// The global slot is copied out first so that `f` runs without holding
/// the lock, and updates made from within `f` take effect.
#[cfg(not(feature = "threads"))]
pub fn with_last<R>(f: impl FnOnce(Option<&ErrorRecord>) -> R) -> R {
    let copy = last();
    f(copy.as_ref())
}

/// Copy of the current record. Non-destructive.
pub fn last() -> Option<ErrorRecord> {
    tls::with_current(|rec| rec.cloned())
}

/// Class of the current record, if any. Never allocates.
pub fn last_class() -> Option<ErrorClass> {
    tls::with_current(|rec| rec.map(ErrorRecord::class))
}

/// Release the current record. Idempotent.
pub fn clear() {
    tls::erase();
}

/// Move the current record out, leaving the slot empty.
///
/// The caller owns the returned record; the slot keeps no reference to it.
pub fn detach() -> Option<ErrorRecord> {
    tls::take()
}

/// Move the current record into `out`.
///
/// On an empty slot returns `Err(ReturnCode::Error)` and leaves `out`
/// untouched.
pub fn detach_into(out: &mut ErrorRecord) -> CodeResult<()> {
    match detach() {
        Some(record) => {
            *out = record;
            Ok(())
        }
        None => Err(ReturnCode::Error),
    }
}

/// Render a return code plus the current record for display.
///
/// - `Ok`, `Passthrough` and `IterOver` are not errors: `None`.
/// - `User` came from the embedder's own callback; the library message is
///   not attached.
/// - Anything else is the code, then the current record if there is one.
pub fn report(code: ReturnCode) -> Option<String> {
    if code.is_ok() || code.is_internal() {
        return None;
    }
    if code == ReturnCode::User {
        return Some(code.to_string());
    }
    let text = with_last(|rec| match rec {
        Some(rec) => format!("{} [{}]: {}", code, rec.class(), rec.message()),
        None => code.to_string(),
    });
    Some(text)
}

/// Record a formatted error for the calling thread.
///
/// ```ignore
/// use lasterr::{set_error, ErrorClass};
///
/// set_error!(ErrorClass::Index, "invalid entry at offset {}", offset);
/// set_error!(ErrorClass::Os, "failed to open '{}'", path.display());
/// ```
#[macro_export]
macro_rules! set_error {
    ($class:expr, $($arg:tt)+) => {{
        $crate::reporter::set($class, format_args!($($arg)+));
    }};
}

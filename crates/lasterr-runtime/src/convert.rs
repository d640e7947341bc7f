use std::fmt;
use std::io;

use lasterr_core::{CodeResult, ErrorClass, ReturnCode};

use crate::reporter;

// ── io::ErrorKind → ReturnCode ────────────────────────────────────

/// Maps `io::ErrorKind` to the closest generic return code.
fn io_return_code(kind: io::ErrorKind) -> ReturnCode {
    match kind {
        io::ErrorKind::NotFound      => ReturnCode::NotFound,
        io::ErrorKind::AlreadyExists => ReturnCode::Exists,
        io::ErrorKind::WouldBlock    => ReturnCode::Locked,
        _                            => ReturnCode::Error,
    }
}

// ── ResultExt: record a failure into the slot ─────────────────────

/// Extension trait for turning any `Result` into a `CodeResult` while
/// recording the failure in the calling thread's slot.
///
/// The error value itself is the diagnostic, so no OS augmentation takes
/// place even for `ErrorClass::Os`.
///
/// ```ignore
/// use lasterr::{ErrorClass, ResultExt};
///
/// let cfg = parse_config(&text).or_set_last(ErrorClass::Config, "parsing .gitconfig")?;
/// ```
pub trait ResultExt<T> {
    /// Record `"<context>: <error>"` (or just the error when `context` is
    /// empty) and map the failure to `ReturnCode::Error`.
    fn or_set_last(self, class: ErrorClass, context: &str) -> CodeResult<T>;

    /// Same as `or_set_last`, but fail with `code`.
    fn or_set_last_code(self, class: ErrorClass, code: ReturnCode, context: &str) -> CodeResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: fmt::Display,
{
    fn or_set_last(self, class: ErrorClass, context: &str) -> CodeResult<T> {
        self.or_set_last_code(class, ReturnCode::Error, context)
    }

    fn or_set_last_code(self, class: ErrorClass, code: ReturnCode, context: &str) -> CodeResult<T> {
        self.map_err(|e| {
            record_with_context(class, context, &e);
            code
        })
    }
}

/// `io::Result` specialisation.
pub trait IoResultExt<T> {
    /// Record the io error as `ErrorClass::Os` and map its kind to a code.
    fn or_set_last_os(self, context: &str) -> CodeResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn or_set_last_os(self, context: &str) -> CodeResult<T> {
        self.map_err(|e| {
            record_with_context(ErrorClass::Os, context, &e);
            io_return_code(e.kind())
        })
    }
}

fn record_with_context(class: ErrorClass, context: &str, err: &dyn fmt::Display) {
    if context.is_empty() {
        reporter::set_verbatim(class, format_args!("{}", err));
    } else {
        reporter::set_verbatim(class, format_args!("{}: {}", context, err));
    }
}

//! Allocation-aware message formatting.
//!
//! `String`'s `fmt::Write` impl aborts the process when growing fails. The
//! reporter must instead notice the failure and fall back to the static
//! out-of-memory record, so messages are built through `MessageBuf`, which
//! only grows through `try_reserve`.
//!
//! The usual pattern is measure-then-fill: `measure()` walks the format
//! arguments without allocating, the buffer reserves exactly that many
//! bytes once, and the fill pass normally never needs to grow.

use core::fmt::{self, Write};

/// Allocation of a message buffer failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "message allocation failed")
    }
}

impl std::error::Error for AllocError {}

struct Measure(usize);

impl Write for Measure {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 = self.0.saturating_add(s.len());
        Ok(())
    }
}

/// Number of bytes `args` renders to. Never allocates.
///
/// A `Display` impl that reports an error stops the count early; the
/// partial length is returned.
pub fn measure(args: fmt::Arguments<'_>) -> usize {
    if let Some(s) = args.as_str() {
        return s.len();
    }
    let mut m = Measure(0);
    let _ = m.write_fmt(args);
    m.0
}

/// Growable text buffer whose every allocation is fallible.
#[derive(Debug, Default)]
pub struct MessageBuf {
    buf: String,
    failed: bool,
}

impl MessageBuf {
    /// Empty buffer with exactly `capacity` bytes reserved.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        let mut buf = String::new();
        buf.try_reserve_exact(capacity).map_err(|_| AllocError)?;
        Ok(Self { buf, failed: false })
    }

    pub fn try_push_str(&mut self, s: &str) -> Result<(), AllocError> {
        self.buf.try_reserve(s.len()).map_err(|_| AllocError)?;
        self.buf.push_str(s);
        Ok(())
    }

    /// Append formatted text.
    ///
    /// Only allocation failure is an error. If a `Display` impl fails on its
    /// own, whatever was rendered before the failure is kept.
    pub fn try_push_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), AllocError> {
        self.failed = false;
        let _ = self.write_fmt(args);
        if self.failed {
            Err(AllocError)
        } else {
            Ok(())
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl Write for MessageBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.try_push_str(s).is_err() {
            self.failed = true;
            return Err(fmt::Error);
        }
        Ok(())
    }
}

/// Render `args` into a freshly allocated string, or report allocation failure.
pub fn try_format(args: fmt::Arguments<'_>) -> Result<String, AllocError> {
    let mut buf = MessageBuf::try_with_capacity(measure(args))?;
    buf.try_push_fmt(args)?;
    Ok(buf.into_string())
}

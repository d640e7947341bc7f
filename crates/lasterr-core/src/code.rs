//! Generic return codes.
//!
//! Library calls return a small signed integer alongside (but independent
//! of) the error record. `0` is success, negative values are failures, and
//! three reserved values are control sentinels rather than errors:
//!
//! - `User` (-7) is never produced by library code. A callback returns it to
//!   say "I stopped this", so the embedder can tell its own early exit apart
//!   from a library failure.
//! - `Passthrough` (-30) means "this step declined to act, try the next".
//! - `IterOver` (-31) marks the end of an iteration.
//!
//! A negative code does not imply a populated error record, and a populated
//! record does not imply a negative code.

use core::fmt;

/// Generic return code.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnCode {
    /// No error
    Ok = 0,
    /// Generic error
    Error = -1,
    /// Requested object could not be found
    NotFound = -3,
    /// Object exists preventing operation
    Exists = -4,
    /// More than one object matches
    Ambiguous = -5,
    /// Output buffer too short to hold data
    BufferTooShort = -6,
    /// Returned by user callbacks, never by the library
    User = -7,
    /// Operation not allowed on bare repository
    BareRepo = -8,
    /// HEAD refers to branch with no commits
    UnbornBranch = -9,
    /// Merge in progress prevented operation
    Unmerged = -10,
    /// Reference was not fast-forwardable
    NonFastForward = -11,
    /// Name/ref spec was not in a valid format
    InvalidSpec = -12,
    /// Merge conflicts prevented operation
    MergeConflict = -13,
    /// Lock file prevented operation
    Locked = -14,
    /// Reference value does not match expected
    Modified = -15,
    /// Server certificate is invalid
    Certificate = -16,
    /// Internal only
    Passthrough = -30,
    /// Signals end of iteration with iterator
    IterOver = -31,
}

impl ReturnCode {
    pub const ALL: [ReturnCode; 18] = [
        ReturnCode::Ok,
        ReturnCode::Error,
        ReturnCode::NotFound,
        ReturnCode::Exists,
        ReturnCode::Ambiguous,
        ReturnCode::BufferTooShort,
        ReturnCode::User,
        ReturnCode::BareRepo,
        ReturnCode::UnbornBranch,
        ReturnCode::Unmerged,
        ReturnCode::NonFastForward,
        ReturnCode::InvalidSpec,
        ReturnCode::MergeConflict,
        ReturnCode::Locked,
        ReturnCode::Modified,
        ReturnCode::Certificate,
        ReturnCode::Passthrough,
        ReturnCode::IterOver,
    ];

    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Map a raw integer to a known code.
    ///
    /// `-2` and `-17..=-29` are unassigned and yield `None`.
    pub const fn from_raw(raw: i32) -> Option<ReturnCode> {
        let code = match raw {
            0 => ReturnCode::Ok,
            -1 => ReturnCode::Error,
            -3 => ReturnCode::NotFound,
            -4 => ReturnCode::Exists,
            -5 => ReturnCode::Ambiguous,
            -6 => ReturnCode::BufferTooShort,
            -7 => ReturnCode::User,
            -8 => ReturnCode::BareRepo,
            -9 => ReturnCode::UnbornBranch,
            -10 => ReturnCode::Unmerged,
            -11 => ReturnCode::NonFastForward,
            -12 => ReturnCode::InvalidSpec,
            -13 => ReturnCode::MergeConflict,
            -14 => ReturnCode::Locked,
            -15 => ReturnCode::Modified,
            -16 => ReturnCode::Certificate,
            -30 => ReturnCode::Passthrough,
            -31 => ReturnCode::IterOver,
            _ => return None,
        };
        Some(code)
    }

    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, ReturnCode::Ok)
    }

    /// Control sentinel rather than a genuine failure.
    #[inline]
    pub const fn is_sentinel(self) -> bool {
        matches!(
            self,
            ReturnCode::User | ReturnCode::Passthrough | ReturnCode::IterOver
        )
    }

    /// Genuine failure: negative and not a sentinel.
    #[inline]
    pub const fn is_error(self) -> bool {
        !self.is_ok() && !self.is_sentinel()
    }

    /// Internal-only sentinels that must never be shown to an end user.
    #[inline]
    pub const fn is_internal(self) -> bool {
        matches!(self, ReturnCode::Passthrough | ReturnCode::IterOver)
    }

    pub const fn description(self) -> &'static str {
        match self {
            ReturnCode::Ok => "no error",
            ReturnCode::Error => "generic error",
            ReturnCode::NotFound => "requested object could not be found",
            ReturnCode::Exists => "object exists preventing operation",
            ReturnCode::Ambiguous => "more than one object matches",
            ReturnCode::BufferTooShort => "output buffer too short to hold data",
            ReturnCode::User => "stopped by user callback",
            ReturnCode::BareRepo => "operation not allowed on bare repository",
            ReturnCode::UnbornBranch => "HEAD refers to branch with no commits",
            ReturnCode::Unmerged => "merge in progress prevented operation",
            ReturnCode::NonFastForward => "reference was not fast-forwardable",
            ReturnCode::InvalidSpec => "name/ref spec was not in a valid format",
            ReturnCode::MergeConflict => "merge conflicts prevented operation",
            ReturnCode::Locked => "lock file prevented operation",
            ReturnCode::Modified => "reference value does not match expected",
            ReturnCode::Certificate => "server certificate is invalid",
            ReturnCode::Passthrough => "passthrough",
            ReturnCode::IterOver => "iteration over",
        }
    }
}

impl Default for ReturnCode {
    fn default() -> Self {
        ReturnCode::Ok
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_raw())
    }
}

impl std::error::Error for ReturnCode {}

impl From<ReturnCode> for i32 {
    fn from(code: ReturnCode) -> i32 {
        code.as_raw()
    }
}

/// Result alias for calls that report failure through a `ReturnCode`.
pub type CodeResult<T> = Result<T, ReturnCode>;

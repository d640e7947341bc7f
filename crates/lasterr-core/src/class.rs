//! Error classification tags.
//!
//! An `ErrorClass` names the subsystem that raised an error. It is pure
//! metadata: nothing in lasterr branches on it except `ErrorClass::Os`,
//! which asks the reporter to append the platform's last OS error.
//!
//! # Numbering
//!
//! Values are stable and contiguous from `0` so that they can cross an FFI
//! boundary as a plain `i32`.
//!
//! | Range     | Meaning                                   |
//! |-----------|-------------------------------------------|
//! | `0`       | `None`, no class                          |
//! | `1..=2`   | Process level (`NoMemory`, `Os`)          |
//! | `3..=27`  | Library subsystems                        |

use core::fmt;

/// Subsystem that produced the error record.
#[repr(i32)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorClass {
    None = 0,
    NoMemory = 1,
    Os = 2,
    Invalid = 3,
    Reference = 4,
    Zlib = 5,
    Repository = 6,
    Config = 7,
    Regex = 8,
    Odb = 9,
    Index = 10,
    Object = 11,
    Net = 12,
    Tag = 13,
    Tree = 14,
    Indexer = 15,
    Ssl = 16,
    Submodule = 17,
    Thread = 18,
    Stash = 19,
    Checkout = 20,
    FetchHead = 21,
    Merge = 22,
    Ssh = 23,
    Filter = 24,
    Revert = 25,
    Callback = 26,
    CherryPick = 27,
}

impl ErrorClass {
    /// Every class, in numeric order.
    pub const ALL: [ErrorClass; 28] = [
        ErrorClass::None,
        ErrorClass::NoMemory,
        ErrorClass::Os,
        ErrorClass::Invalid,
        ErrorClass::Reference,
        ErrorClass::Zlib,
        ErrorClass::Repository,
        ErrorClass::Config,
        ErrorClass::Regex,
        ErrorClass::Odb,
        ErrorClass::Index,
        ErrorClass::Object,
        ErrorClass::Net,
        ErrorClass::Tag,
        ErrorClass::Tree,
        ErrorClass::Indexer,
        ErrorClass::Ssl,
        ErrorClass::Submodule,
        ErrorClass::Thread,
        ErrorClass::Stash,
        ErrorClass::Checkout,
        ErrorClass::FetchHead,
        ErrorClass::Merge,
        ErrorClass::Ssh,
        ErrorClass::Filter,
        ErrorClass::Revert,
        ErrorClass::Callback,
        ErrorClass::CherryPick,
    ];

    /// Raw integer value, as exposed across an FFI boundary.
    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Convert a raw integer back into a class.
    ///
    /// ```
    /// use lasterr_core::ErrorClass;
    /// assert_eq!(ErrorClass::from_raw(10), Some(ErrorClass::Index));
    /// assert_eq!(ErrorClass::from_raw(-1), None);
    /// ```
    pub const fn from_raw(raw: i32) -> Option<ErrorClass> {
        if raw < 0 || raw as usize >= Self::ALL.len() {
            return None;
        }
        Some(Self::ALL[raw as usize])
    }

    /// Short lowercase name used by `Display`.
    pub const fn name(self) -> &'static str {
        match self {
            ErrorClass::None => "none",
            ErrorClass::NoMemory => "nomemory",
            ErrorClass::Os => "os",
            ErrorClass::Invalid => "invalid",
            ErrorClass::Reference => "reference",
            ErrorClass::Zlib => "zlib",
            ErrorClass::Repository => "repository",
            ErrorClass::Config => "config",
            ErrorClass::Regex => "regex",
            ErrorClass::Odb => "odb",
            ErrorClass::Index => "index",
            ErrorClass::Object => "object",
            ErrorClass::Net => "net",
            ErrorClass::Tag => "tag",
            ErrorClass::Tree => "tree",
            ErrorClass::Indexer => "indexer",
            ErrorClass::Ssl => "ssl",
            ErrorClass::Submodule => "submodule",
            ErrorClass::Thread => "thread",
            ErrorClass::Stash => "stash",
            ErrorClass::Checkout => "checkout",
            ErrorClass::FetchHead => "fetchhead",
            ErrorClass::Merge => "merge",
            ErrorClass::Ssh => "ssh",
            ErrorClass::Filter => "filter",
            ErrorClass::Revert => "revert",
            ErrorClass::Callback => "callback",
            ErrorClass::CherryPick => "cherrypick",
        }
    }

    /// True for the class that triggers OS-error augmentation.
    #[inline]
    pub const fn is_os(self) -> bool {
        matches!(self, ErrorClass::Os)
    }
}

impl Default for ErrorClass {
    fn default() -> Self {
        ErrorClass::None
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.as_raw())
    }
}

impl From<ErrorClass> for i32 {
    fn from(class: ErrorClass) -> i32 {
        class.as_raw()
    }
}

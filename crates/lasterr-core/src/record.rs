//! The `{class, message}` pair held by an error slot.

use std::borrow::Cow;
use std::fmt;

use crate::ErrorClass;

/// Message stored by `set_out_of_memory`.
pub const OUT_OF_MEMORY_MESSAGE: &str = "Out of memory";

/// Process-wide record used when allocating a message is not possible.
///
/// Lives for the whole process and is only ever shared by reference, so
/// selecting it never allocates and never fails.
pub static OUT_OF_MEMORY: ErrorRecord = ErrorRecord {
    message: Cow::Borrowed(OUT_OF_MEMORY_MESSAGE),
    class: ErrorClass::NoMemory,
};

/// Description of the most recent failure.
///
/// The message is immutable once built. Records produced by the reporter own
/// their text. Records copied from `OUT_OF_MEMORY` borrow `'static` text, so
/// cloning them is allocation-free.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ErrorRecord {
    message: Cow<'static, str>,
    class: ErrorClass,
}

impl ErrorRecord {
    pub fn new(class: ErrorClass, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            class,
        }
    }

    /// Build a record around a `'static` message. Usable in `const` context.
    pub const fn from_static(class: ErrorClass, message: &'static str) -> Self {
        Self {
            message: Cow::Borrowed(message),
            class,
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn class(&self) -> ErrorClass {
        self.class
    }

    /// Consume the record, handing out the message.
    pub fn into_message(self) -> Cow<'static, str> {
        self.message
    }

    /// Split into `(class, message)`.
    pub fn into_parts(self) -> (ErrorClass, Cow<'static, str>) {
        (self.class, self.message)
    }

    /// True if this is (a copy of) the static out-of-memory record.
    pub fn is_out_of_memory(&self) -> bool {
        self.class == ErrorClass::NoMemory && self.message == OUT_OF_MEMORY_MESSAGE
    }

    /// True if the message is borrowed static text rather than owned.
    pub fn is_static(&self) -> bool {
        matches!(self.message, Cow::Borrowed(_))
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorRecord")
            .field("class", &self.class)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for ErrorRecord {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_record() {
        let rec = ErrorRecord::new(ErrorClass::Index, String::from("bad index entry"));
        assert_eq!(rec.class(), ErrorClass::Index);
        assert_eq!(rec.message(), "bad index entry");
        assert!(!rec.is_static());
        assert!(!rec.is_out_of_memory());
    }

    #[test]
    fn oom_record_is_static() {
        assert_eq!(OUT_OF_MEMORY.class(), ErrorClass::NoMemory);
        assert_eq!(OUT_OF_MEMORY.message(), "Out of memory");
        assert!(OUT_OF_MEMORY.is_static());
        assert!(OUT_OF_MEMORY.clone().is_out_of_memory());
    }

    #[test]
    fn default_is_empty_none() {
        let rec = ErrorRecord::default();
        assert_eq!(rec.class(), ErrorClass::None);
        assert!(rec.message().is_empty());
    }

    #[test]
    fn display_is_message() {
        let rec = ErrorRecord::from_static(ErrorClass::Net, "connection reset");
        assert_eq!(rec.to_string(), "connection reset");
        assert!(format!("{:?}", rec).contains("net(12)"));
    }
}

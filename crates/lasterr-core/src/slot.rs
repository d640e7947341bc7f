//! Single-record error cell
//!
//! An `ErrorSlot` holds zero or one `ErrorRecord`. It knows nothing about
//! threads: the runtime decides where slots live (one per OS thread, or a
//! single locked global) and hands out `&mut ErrorSlot` to the reporter.
//!
//! A slot entry is either an owned record or a borrowed `'static` record.
//! The borrowed form lets the out-of-memory fallback be stored without
//! touching the allocator.

use std::borrow::Cow;

use crate::ErrorRecord;

/// Zero-or-one error record.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    entry: Option<Cow<'static, ErrorRecord>>,
}

impl ErrorSlot {
    /// An empty slot. `const` so it can initialise thread-locals and statics.
    #[inline]
    pub const fn new() -> Self {
        Self { entry: None }
    }

    /// Replace any existing record. The previous record is dropped first.
    #[inline]
    pub fn store(&mut self, record: ErrorRecord) {
        self.entry = None;
        self.entry = Some(Cow::Owned(record));
    }

    /// Store a reference to a record that outlives the process.
    ///
    /// Never allocates.
    #[inline]
    pub fn store_static(&mut self, record: &'static ErrorRecord) {
        self.entry = Some(Cow::Borrowed(record));
    }

    /// Read-only view of the current record.
    #[inline]
    pub fn peek(&self) -> Option<&ErrorRecord> {
        self.entry.as_deref()
    }

    /// Remove the record and hand ownership to the caller.
    ///
    /// Taking a static record copies it; its message stays borrowed, so no
    /// allocation takes place.
    #[inline]
    pub fn take(&mut self) -> Option<ErrorRecord> {
        self.entry.take().map(Cow::into_owned)
    }

    /// Release the record, if any. Idempotent.
    #[inline]
    pub fn erase(&mut self) {
        self.entry = None;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorClass, OUT_OF_MEMORY};

    fn rec(class: ErrorClass, msg: &str) -> ErrorRecord {
        ErrorRecord::new(class, msg.to_string())
    }

    #[test]
    fn starts_empty() {
        let slot = ErrorSlot::new();
        assert!(slot.is_empty());
        assert!(slot.peek().is_none());
    }

    #[test]
    fn store_replaces() {
        let mut slot = ErrorSlot::new();
        slot.store(rec(ErrorClass::Odb, "first"));
        slot.store(rec(ErrorClass::Net, "second"));

        let current = slot.peek().unwrap();
        assert_eq!(current.class(), ErrorClass::Net);
        assert_eq!(current.message(), "second");
    }

    #[test]
    fn peek_is_repeatable() {
        let mut slot = ErrorSlot::new();
        slot.store(rec(ErrorClass::Tree, "missing entry"));
        assert_eq!(slot.peek(), slot.peek());
        assert!(!slot.is_empty());
    }

    #[test]
    fn take_moves_out() {
        let mut slot = ErrorSlot::new();
        slot.store(rec(ErrorClass::Merge, "conflict"));

        let taken = slot.take().unwrap();
        assert_eq!(taken.message(), "conflict");
        assert!(slot.is_empty());
        assert!(slot.take().is_none());
    }

    #[test]
    fn erase_is_idempotent() {
        let mut slot = ErrorSlot::new();
        slot.erase();
        assert!(slot.is_empty());

        slot.store(rec(ErrorClass::Config, "bad key"));
        slot.erase();
        slot.erase();
        assert!(slot.is_empty());
    }

    #[test]
    fn static_record_round_trip() {
        let mut slot = ErrorSlot::new();
        slot.store_static(&OUT_OF_MEMORY);
        assert!(std::ptr::eq(slot.peek().unwrap(), &OUT_OF_MEMORY));

        let taken = slot.take().unwrap();
        assert!(taken.is_out_of_memory());
        assert!(taken.is_static());
        assert!(slot.is_empty());
    }

    #[test]
    fn owned_replaces_static() {
        let mut slot = ErrorSlot::new();
        slot.store_static(&OUT_OF_MEMORY);
        slot.store(rec(ErrorClass::Index, "bad index entry"));
        assert_eq!(slot.peek().unwrap().class(), ErrorClass::Index);
    }
}

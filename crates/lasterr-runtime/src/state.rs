//! Saving and reinstating the current error across cleanup code.
//!
//! Cleanup paths (closing handles, unlocking files, rolling back) may record
//! errors of their own and would overwrite the failure the caller actually
//! needs to see. Capture before cleanup, restore afterwards:
//!
//! ```ignore
//! let state = ErrorState::capture();
//! let _ = unlock_index(repo);   // may call set_error!
//! state.restore();              // original failure is back
//! ```

use lasterr_core::ErrorRecord;

use crate::reporter;
use crate::tls;

/// A detached error record, owned until restored.
///
/// Move-only: a captured state can be restored at most once.
#[must_use = "a captured error state is lost unless restored"]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ErrorState {
    record: Option<ErrorRecord>,
}

impl ErrorState {
    /// Detach the current record (if any) into a new state.
    pub fn capture() -> Self {
        Self {
            record: reporter::detach(),
        }
    }

    /// Reinstate the captured record, replacing whatever the slot holds.
    ///
    /// Restoring an empty capture clears the slot.
    pub fn restore(self) {
        match self.record {
            Some(record) => tls::store(record),
            None => reporter::clear(),
        }
    }

    pub fn record(&self) -> Option<&ErrorRecord> {
        self.record.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_none()
    }

    /// Give up on restoring and keep the record.
    pub fn into_record(self) -> Option<ErrorRecord> {
        self.record
    }
}

impl From<ErrorRecord> for ErrorState {
    fn from(record: ErrorRecord) -> Self {
        Self { record: Some(record) }
    }
}

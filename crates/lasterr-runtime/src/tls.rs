//! Slot storage
//!
//! Decides where the current caller's `ErrorSlot` lives and exposes the
//! five storage operations the reporter is built on: `store`,
//! `store_out_of_memory`, `with_current`, `take` and `erase`.
//!
//! - `threads` (default): one slot per OS thread, held in a `const`
//!   thread-local. No locking; two threads never see the same slot. The
//!   slot is dropped, together with any record it still holds, when the
//!   thread exits. During and after that teardown every access reports the
//!   slot as unavailable.
//!
//!   The first touch of the slot registers its thread-exit destructor, which
//!   may allocate inside the platform's C runtime. The out-of-memory record
//!   is therefore kept outside the slot, in a destructor-free flag, and the
//!   slot is only touched by readers once something has been stored in it.
//!
//! - no `threads`: one process-wide slot behind a `SpinLock`. It is never
//!   dropped. Records written by different threads overwrite each other, so
//!   this build is only meaningful for single-threaded embeddings.

use lasterr_core::{ErrorRecord, ErrorSlot, OUT_OF_MEMORY};

cfg_if::cfg_if! {
    if #[cfg(feature = "threads")] {
        use std::cell::{Cell, RefCell};

        use lasterr_core::kwarn;

        thread_local! {
            /// The calling thread's error slot
            static SLOT: RefCell<ErrorSlot> = const { RefCell::new(ErrorSlot::new()) };
            /// `SLOT` has been touched and its destructor registered.
            static SLOT_LIVE: Cell<bool> = const { Cell::new(false) };
            /// The current record is `OUT_OF_MEMORY`. Overrides `SLOT`.
            static OUT_OF_MEMORY_SET: Cell<bool> = const { Cell::new(false) };
        }

        #[inline]
        fn slot_live() -> bool {
            SLOT_LIVE.with(Cell::get)
        }

        #[inline]
        fn oom_set() -> bool {
            OUT_OF_MEMORY_SET.with(Cell::get)
        }

        #[inline]
        fn set_oom(value: bool) {
            OUT_OF_MEMORY_SET.with(|flag| flag.set(value));
        }

        /// Run `f` against the slot.
        ///
        /// `None` if the slot is torn down, or if a `with_current` view of it
        /// is open on this thread; the update is then dropped.
        fn with_slot_mut<R>(f: impl FnOnce(&mut ErrorSlot) -> R) -> Option<R> {
            SLOT.try_with(|cell| {
                SLOT_LIVE.with(|live| live.set(true));
                match cell.try_borrow_mut() {
                    Ok(mut slot) => Some(f(&mut *slot)),
                    Err(_) => {
                        kwarn!("error slot is being read on this thread; update dropped");
                        None
                    }
                }
            })
            .ok()
            .flatten()
        }

        /// Drop whatever the slot holds without logging or registering it.
        fn erase_slot_quiet() {
            if !slot_live() {
                return;
            }
            let _ = SLOT.try_with(|cell| {
                if let Ok(mut slot) = cell.try_borrow_mut() {
                    slot.erase();
                }
            });
        }

        /// Replace the current record.
        pub fn store(record: ErrorRecord) {
            if with_slot_mut(|slot| slot.store(record)).is_some() {
                set_oom(false);
            }
        }

        /// Make `OUT_OF_MEMORY` the current record.
        ///
        /// Never allocates: only destructor-free thread-locals are touched,
        /// plus the slot itself when it is already live.
        pub fn store_out_of_memory() {
            set_oom(true);
            erase_slot_quiet();
        }

        /// Run `f` with a view of the current record. `f` is always called
        /// exactly once; a torn-down slot reads as empty.
        pub fn with_current<R>(f: impl FnOnce(Option<&ErrorRecord>) -> R) -> R {
            if oom_set() {
                return f(Some(&OUT_OF_MEMORY));
            }
            if !slot_live() {
                return f(None);
            }
            let mut f = Some(f);
            let done = SLOT
                .try_with(|cell| f.take().map(|f| f(cell.borrow().peek())))
                .ok()
                .flatten();
            match (done, f) {
                (Some(r), _) => r,
                (None, Some(f)) => f(None),
                (None, None) => unreachable!("slot closure consumed without a result"),
            }
        }

        /// Move the current record out, leaving nothing behind.
        pub fn take() -> Option<ErrorRecord> {
            if oom_set() {
                set_oom(false);
                erase_slot_quiet();
                return Some(OUT_OF_MEMORY.clone());
            }
            if !slot_live() {
                return None;
            }
            with_slot_mut(ErrorSlot::take).flatten()
        }

        /// Release the current record. Idempotent.
        pub fn erase() {
            set_oom(false);
            if slot_live() {
                with_slot_mut(ErrorSlot::erase);
            }
        }

        /// Whether slots are per-thread in this build.
        pub const THREAD_SCOPED: bool = true;
    } else {
        use lasterr_core::SpinLock;

        /// The process-wide fallback slot
        static SLOT: SpinLock<ErrorSlot> = SpinLock::new(ErrorSlot::new());

        pub fn store(record: ErrorRecord) {
            SLOT.with(|slot| slot.store(record));
        }

        pub fn store_out_of_memory() {
            SLOT.with(|slot| slot.store_static(&OUT_OF_MEMORY));
        }

        /// Run `f` with a view of the global record.
        ///
        /// The lock is held for the duration of `f`, so `f` must not touch
        /// the slot again.
        pub fn with_current<R>(f: impl FnOnce(Option<&ErrorRecord>) -> R) -> R {
            SLOT.with(|slot| f(slot.peek()))
        }

        pub fn take() -> Option<ErrorRecord> {
            SLOT.with(ErrorSlot::take)
        }

        pub fn erase() {
            SLOT.with(ErrorSlot::erase);
        }

        pub const THREAD_SCOPED: bool = false;
    }
}

#[cfg(all(test, feature = "threads"))]
mod tests {
    use super::*;
    use lasterr_core::ErrorClass;
    use std::thread;

    fn on_fresh_thread(f: impl FnOnce() + Send + 'static) {
        thread::spawn(f).join().unwrap();
    }

    #[test]
    fn fresh_thread_starts_empty() {
        on_fresh_thread(|| {
            assert!(with_current(|r| r.is_none()));
            assert!(take().is_none());
            erase();
            assert!(!slot_live());
        });
    }

    #[test]
    fn out_of_memory_leaves_slot_untouched() {
        on_fresh_thread(|| {
            store_out_of_memory();
            assert!(with_current(|r| r.is_some_and(|r| std::ptr::eq(r, &OUT_OF_MEMORY))));
            assert!(!slot_live());

            let rec = take().unwrap();
            assert!(rec.is_out_of_memory());
            assert!(take().is_none());
            assert!(!slot_live());
        });
    }

    #[test]
    fn out_of_memory_hides_and_discards_previous_record() {
        on_fresh_thread(|| {
            store(ErrorRecord::new(ErrorClass::Odb, "object missing".to_string()));
            store_out_of_memory();
            assert!(with_current(|r| r.unwrap().is_out_of_memory()));

            assert!(take().unwrap().is_out_of_memory());
            assert!(with_current(|r| r.is_none()));
        });
    }

    #[test]
    fn store_replaces_out_of_memory() {
        on_fresh_thread(|| {
            store_out_of_memory();
            store(ErrorRecord::new(ErrorClass::Ssl, "handshake failed".to_string()));
            assert_eq!(with_current(|r| r.map(ErrorRecord::class)), Some(ErrorClass::Ssl));
            erase();
            assert!(with_current(|r| r.is_none()));
        });
    }

    #[test]
    fn slot_is_per_thread() {
        on_fresh_thread(|| {
            store(ErrorRecord::new(ErrorClass::Tag, "main".to_string()));

            on_fresh_thread(|| {
                assert!(with_current(|r| r.is_none()));
                store(ErrorRecord::new(ErrorClass::Ssh, "child".to_string()));
            });

            let msg = with_current(|r| r.map(|r| r.message().to_string()));
            assert_eq!(msg.as_deref(), Some("main"));
        });
    }

    #[test]
    fn update_during_view_is_dropped() {
        on_fresh_thread(|| {
            store(ErrorRecord::new(ErrorClass::Tree, "entry missing".to_string()));
            with_current(|_| {
                store(ErrorRecord::new(ErrorClass::Net, "ignored".to_string()));
                assert!(take().is_none());
            });
            assert_eq!(with_current(|r| r.map(ErrorRecord::class)), Some(ErrorClass::Tree));
        });
    }

    #[test]
    fn view_closure_called_once() {
        let mut calls = 0;
        with_current(|_| calls += 1);
        assert_eq!(calls, 1);
    }
}

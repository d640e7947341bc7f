//! Spinlock guarding the process-wide fallback slot
//!
//! Only used when lasterr is built without the `threads` feature, where a
//! single `ErrorSlot` is shared by the whole process. Critical sections are
//! a pointer swap or a record clone.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

/// A simple spinlock
///
/// Not reentrant: locking twice from the same thread deadlocks.
pub struct SpinLock<T> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

// Safety: SpinLock provides exclusive access to T
unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        SpinLock {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(value),
        }
    }

    /// Acquire the lock, spinning until it's available
    #[inline]
    pub fn lock(&self) -> SpinLockGuard<'_, T> {
        loop {
            if self
                .locked
                .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                return SpinLockGuard { lock: self };
            }

            let mut spin_count = 0u32;
            while self.locked.load(Ordering::Relaxed) {
                spin_count = spin_count.wrapping_add(1);
                for _ in 0..spin_count.min(64) {
                    core::hint::spin_loop();
                }
            }
        }
    }

    /// Run `f` with the lock held.
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut *self.lock())
    }
}

/// Guard that releases the spinlock when dropped
pub struct SpinLockGuard<'a, T> {
    lock: &'a SpinLock<T>,
}

impl<T> Deref for SpinLockGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        // Safety: We hold the lock
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for SpinLockGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        // Safety: We hold the lock
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SpinLockGuard<'_, T> {
    #[inline]
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorClass, ErrorRecord, ErrorSlot};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_guarded_slot() {
        let lock = SpinLock::new(ErrorSlot::new());
        lock.with(|slot| {
            slot.store(ErrorRecord::new(ErrorClass::Stash, "no stash entries".to_string()))
        });
        assert_eq!(lock.lock().peek().unwrap().class(), ErrorClass::Stash);
        assert_eq!(lock.with(|slot| slot.take()).unwrap().message(), "no stash entries");
        assert!(lock.with(|slot| slot.is_empty()));
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let lock = SpinLock::new(ErrorSlot::new());
        let guard = lock.lock();
        drop(guard);
        lock.with(|slot| slot.store_static(&crate::OUT_OF_MEMORY));
        assert!(lock.lock().peek().unwrap().is_out_of_memory());
        lock.with(ErrorSlot::erase);
        assert!(lock.with(|slot| slot.is_empty()));
    }

    #[test]
    fn test_concurrent_stores_keep_one_record() {
        let lock = Arc::new(SpinLock::new(ErrorSlot::new()));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let lock = Arc::clone(&lock);
                thread::spawn(move || {
                    for i in 0..250 {
                        let rec = ErrorRecord::new(ErrorClass::Thread, format!("thread {t} iteration {i}"));
                        lock.with(|slot| slot.store(rec));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let guard = lock.lock();
        let last = guard.peek().unwrap();
        assert!(last.message().ends_with("iteration 249"));
    }
}

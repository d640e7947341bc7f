//! Recording while the allocator is failing.
//!
//! Installs a global allocator that refuses every request made by a thread
//! that has opted in, so the rest of the test harness keeps working.

#![cfg(feature = "threads")]

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::ptr;
use std::thread;

use lasterr_core::{ErrorClass, OUT_OF_MEMORY};
use lasterr_runtime::{
    clear, detach, last, last_class, set_error, set_out_of_memory, set_str, with_last,
};

thread_local! {
    static FAILING: Cell<bool> = const { Cell::new(false) };
    static REFUSED: Cell<usize> = const { Cell::new(0) };
}

struct FailingAlloc;

impl FailingAlloc {
    fn refuse() -> bool {
        let failing = FAILING.with(Cell::get);
        if failing {
            REFUSED.with(|n| n.set(n.get() + 1));
        }
        failing
    }
}

unsafe impl GlobalAlloc for FailingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if Self::refuse() {
            return ptr::null_mut();
        }
        System.alloc(layout)
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        if Self::refuse() {
            return ptr::null_mut();
        }
        System.alloc_zeroed(layout)
    }

    unsafe fn realloc(&self, p: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if Self::refuse() {
            return ptr::null_mut();
        }
        System.realloc(p, layout, new_size)
    }

    unsafe fn dealloc(&self, p: *mut u8, layout: Layout) {
        System.dealloc(p, layout)
    }
}

#[global_allocator]
static ALLOC: FailingAlloc = FailingAlloc;

/// Fail every allocation on this thread until dropped.
struct FailGuard;

impl FailGuard {
    fn new() -> Self {
        REFUSED.with(|n| n.set(0));
        FAILING.with(|f| f.set(true));
        FailGuard
    }
}

impl Drop for FailGuard {
    fn drop(&mut self) {
        FAILING.with(|f| f.set(false));
    }
}

fn refused() -> usize {
    REFUSED.with(Cell::get)
}

#[test]
fn set_out_of_memory_on_untouched_thread() {
    let (refused_count, class, detached_static) = thread::spawn(|| {
        let guard = FailGuard::new();
        set_out_of_memory();
        let class = last_class();
        let detached_static = detach().is_some_and(|r| r.is_static());
        drop(guard);
        (refused(), class, detached_static)
    })
    .join()
    .unwrap();

    assert_eq!(refused_count, 0, "set_out_of_memory touched the allocator");
    assert_eq!(class, Some(ErrorClass::NoMemory));
    assert!(detached_static);
}

#[test]
fn set_out_of_memory_never_allocates() {
    clear();
    set_str(ErrorClass::Config, "previous failure");

    let guard = FailGuard::new();
    set_out_of_memory();
    let is_static = with_last(|rec| rec.is_some_and(|r| ptr::eq(r, &OUT_OF_MEMORY)));
    drop(guard);

    assert_eq!(refused(), 0, "set_out_of_memory touched the allocator");
    assert!(is_static);
}

#[test]
fn set_falls_back_to_oom_record() {
    clear();
    set_str(ErrorClass::Config, "previous failure");

    let guard = FailGuard::new();
    set_str(ErrorClass::Index, "bad index entry");
    drop(guard);

    assert!(refused() > 0);
    let rec = last().unwrap();
    assert!(rec.is_out_of_memory());
    assert_eq!(rec.class(), ErrorClass::NoMemory);
}

#[test]
fn formatted_set_on_empty_slot_falls_back() {
    clear();

    let guard = FailGuard::new();
    set_error!(ErrorClass::Odb, "object {} is corrupt", 42);
    drop(guard);

    assert!(last().unwrap().is_out_of_memory());
}

#[test]
fn detach_oom_record_without_allocating() {
    clear();
    set_out_of_memory();

    let guard = FailGuard::new();
    let rec = detach();
    drop(guard);

    assert_eq!(refused(), 0);
    let rec = rec.unwrap();
    assert!(rec.is_out_of_memory());
    assert!(rec.is_static());
    assert!(last().is_none());
}

#[cfg(unix)]
#[test]
fn os_error_is_cleared_even_when_allocation_fails() {
    use nix::errno::Errno;

    clear();
    Errno::EACCES.set();

    let guard = FailGuard::new();
    set_str(ErrorClass::Os, "open failed");
    let errno = Errno::last_raw();
    drop(guard);

    assert_eq!(errno, 0);
    assert!(last().unwrap().is_out_of_memory());
}

#[test]
fn recovers_after_failure_window() {
    clear();
    {
        let _guard = FailGuard::new();
        set_str(ErrorClass::Net, "timed out");
    }
    set_str(ErrorClass::Net, "timed out");
    let rec = last().unwrap();
    assert_eq!(rec.message(), "timed out");
    assert!(!rec.is_static());
}

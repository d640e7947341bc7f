//! Platform last-error query
//!
//! `ErrorClass::Os` records carry the platform's own diagnostic. The value
//! is volatile (any intervening libc call may overwrite it), so it is read
//! and cleared synchronously inside `set`, never at read time.
//!
//! Both the query and the clear are best-effort: they cannot fail and they
//! never allocate. The description is copied into a fixed stack buffer.

use core::fmt;

/// Bytes kept from a platform error description.
pub const DESC_CAPACITY: usize = 128;

/// Snapshot of the platform's last OS error.
#[derive(Clone, Copy)]
pub struct OsError {
    code: i32,
    desc: [u8; DESC_CAPACITY],
    len: usize,
}

impl OsError {
    /// Build from a raw code and description bytes. The description is
    /// truncated to `DESC_CAPACITY` on a UTF-8 boundary.
    fn from_bytes(code: i32, bytes: &[u8]) -> Self {
        let mut desc = [0u8; DESC_CAPACITY];
        let n = bytes.len().min(DESC_CAPACITY);
        desc[..n].copy_from_slice(&bytes[..n]);
        let len = match core::str::from_utf8(&desc[..n]) {
            Ok(_) => n,
            Err(e) => e.valid_up_to(),
        };
        Self { code, desc, len }
    }

    /// Raw platform code (`errno` on unix).
    #[inline]
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Platform description, e.g. "Permission denied".
    pub fn description(&self) -> &str {
        core::str::from_utf8(&self.desc[..self.len]).unwrap_or_default()
    }
}

impl fmt::Display for OsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl fmt::Debug for OsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OsError")
            .field("code", &self.code)
            .field("description", &self.description())
            .finish()
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        use nix::errno::Errno;

        /// The calling thread's last OS error, or `None` if errno is 0.
        pub fn last_os_error() -> Option<OsError> {
            let code = Errno::last_raw();
            if code == 0 {
                return None;
            }
            Some(describe(code))
        }

        /// Reset the platform's last error to "no error".
        #[inline]
        pub fn clear_last_os_error() {
            Errno::clear();
        }

        fn describe(code: i32) -> OsError {
            let mut buf = [0 as libc::c_char; DESC_CAPACITY];
            // Safety: buf is writable for buf.len() bytes; strerror_r
            // NUL-terminates within that length on success.
            let rc = unsafe { libc::strerror_r(code, buf.as_mut_ptr(), buf.len()) };
            if rc != 0 {
                return OsError::from_bytes(code, Errno::from_raw(code).desc().as_bytes());
            }
            // Safety: success guarantees a NUL inside buf.
            let text = unsafe { core::ffi::CStr::from_ptr(buf.as_ptr()) };
            OsError::from_bytes(code, text.to_bytes())
        }
    } else if #[cfg(windows)] {
        use windows_sys::Win32::Foundation::{GetLastError, SetLastError};

        /// The calling thread's last OS error, or `None` if
        /// `GetLastError` reports success.
        pub fn last_os_error() -> Option<OsError> {
            // Safety: reads thread-local state only.
            let code = unsafe { GetLastError() };
            if code == 0 {
                return None;
            }
            Some(describe_io(code as i32))
        }

        /// Reset the platform's last error to `ERROR_SUCCESS`.
        #[inline]
        pub fn clear_last_os_error() {
            // Safety: writes thread-local state only.
            unsafe { SetLastError(0) };
        }
    } else {
        /// The calling thread's last OS error, or `None` if there is none.
        pub fn last_os_error() -> Option<OsError> {
            let code = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
            if code == 0 {
                return None;
            }
            Some(describe_io(code))
        }

        /// This platform has no settable last-error value.
        #[inline]
        pub fn clear_last_os_error() {}
    }
}

/// Describe `code` through `std::io::Error`, truncated into the stack buffer.
#[cfg(not(unix))]
fn describe_io(code: i32) -> OsError {
    struct StackWriter {
        buf: [u8; DESC_CAPACITY],
        len: usize,
    }

    impl fmt::Write for StackWriter {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            let n = s.len().min(DESC_CAPACITY - self.len);
            self.buf[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
            self.len += n;
            Ok(())
        }
    }

    let mut w = StackWriter { buf: [0u8; DESC_CAPACITY], len: 0 };
    let _ = fmt::Write::write_fmt(&mut w, format_args!("{}", std::io::Error::from_raw_os_error(code)));
    OsError::from_bytes(code, &w.buf[..w.len])
}

/// Query the last OS error and clear it, in that order.
pub fn take_last_os_error() -> Option<OsError> {
    let err = last_os_error();
    clear_last_os_error();
    err
}


#[cfg(all(test, windows))]
mod windows_tests {
    use super::*;
    use windows_sys::Win32::Foundation::{GetLastError, SetLastError, ERROR_ACCESS_DENIED};

    #[test]
    fn take_reads_then_clears() {
        unsafe { SetLastError(ERROR_ACCESS_DENIED) };
        let err = take_last_os_error().expect("last error was set");
        assert_eq!(err.code(), ERROR_ACCESS_DENIED as i32);
        assert!(!err.description().is_empty());
        assert_eq!(unsafe { GetLastError() }, 0);
        assert!(take_last_os_error().is_none());
    }
}

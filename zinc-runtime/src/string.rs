//! Null-terminated byte strings: length, equality and concatenation.
//!
//! Strings passed in by the host are borrowed for the duration of a call and
//! never mutated. The only string this module allocates is the result of a
//! concatenation, which is handed to the caller as an [`OwnedStr`] (Rust
//! side) or a raw pointer (C side). Either way the caller owns it from the
//! moment of return.

use std::alloc::{handle_alloc_error, Layout};
use std::ffi::CStr;
use std::fmt;
use std::ops::Deref;
use std::os::raw::c_char;
use std::ptr::{self, NonNull};

use crate::error::{or_terminate, Failure};

/// Borrow a host string, rejecting null references.
///
/// # Safety
/// A non-null `ptr` must point to a null-terminated byte sequence that stays
/// valid and unmodified for `'a`.
pub unsafe fn borrow_c_str<'a>(
    ptr: *const c_char,
    operation: &'static str,
) -> Result<&'a CStr, Failure> {
    if ptr.is_null() {
        return Err(Failure::invalid(operation, "null string"));
    }
    Ok(unsafe { CStr::from_ptr(ptr) })
}

/// Byte length of `bytes` as the ABI integer type.
pub fn length(bytes: &[u8]) -> Result<i32, Failure> {
    i32::try_from(bytes.len()).map_err(|_| Failure::invalid("str_len", "length exceeds i32 range"))
}

/// Byte-wise equality: same bytes, same length.
pub fn equal(lhs: &[u8], rhs: &[u8]) -> bool {
    lhs == rhs
}

/// A null-terminated string allocated with the C allocator.
///
/// Produced by [`OwnedStr::concat`]. Dropping it releases the buffer;
/// [`OwnedStr::into_raw`] transfers the buffer to a host instead, after which
/// the host must release it with `str_free` (or C `free`).
pub struct OwnedStr {
    ptr: NonNull<c_char>,
    len: usize,
}

// The buffer is uniquely owned and never shared.
unsafe impl Send for OwnedStr {}
unsafe impl Sync for OwnedStr {}

impl OwnedStr {
    /// Allocate a new buffer holding `lhs` followed by `rhs`.
    ///
    /// Every call allocates; equal inputs never share storage.
    pub fn concat(lhs: &CStr, rhs: &CStr) -> Result<Self, Failure> {
        let lhs = lhs.to_bytes();
        let rhs = rhs.to_bytes();

        let len = lhs
            .len()
            .checked_add(rhs.len())
            .filter(|len| *len < isize::MAX as usize)
            .ok_or_else(|| Failure::invalid("str_concat", "combined length overflows"))?;
        let size = len + 1;

        let raw = unsafe { libc::malloc(size) }.cast::<c_char>();
        let Some(ptr) = NonNull::new(raw) else {
            match Layout::array::<u8>(size) {
                Ok(layout) => handle_alloc_error(layout),
                Err(_) => std::process::abort(),
            }
        };

        unsafe {
            let dst = ptr.as_ptr().cast::<u8>();
            ptr::copy_nonoverlapping(lhs.as_ptr(), dst, lhs.len());
            ptr::copy_nonoverlapping(rhs.as_ptr(), dst.add(lhs.len()), rhs.len());
            *dst.add(len) = 0;
        }

        log::trace!("str_concat: allocated {} bytes at {:p}", size, ptr);
        Ok(Self { ptr, len })
    }

    /// Take back ownership of a buffer previously released by [`into_raw`].
    ///
    /// Returns `None` for null.
    ///
    /// # Safety
    /// `ptr` must be null or come from [`OwnedStr::into_raw`] (or
    /// `str_concat`) and must not have been released already.
    ///
    /// [`into_raw`]: OwnedStr::into_raw
    pub unsafe fn from_raw(ptr: *mut c_char) -> Option<Self> {
        let ptr = NonNull::new(ptr)?;
        let len = unsafe { CStr::from_ptr(ptr.as_ptr()) }.to_bytes().len();
        Some(Self { ptr, len })
    }

    /// Hand the buffer to the caller. The caller now owns it.
    pub fn into_raw(self) -> *mut c_char {
        let ptr = self.ptr.as_ptr();
        std::mem::forget(self);
        ptr
    }

    pub fn as_ptr(&self) -> *const c_char {
        self.ptr.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_c_str(&self) -> &CStr {
        unsafe {
            let bytes = std::slice::from_raw_parts(self.ptr.as_ptr().cast::<u8>(), self.len + 1);
            CStr::from_bytes_with_nul_unchecked(bytes)
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.as_c_str().to_bytes()
    }
}

impl Deref for OwnedStr {
    type Target = CStr;

    fn deref(&self) -> &CStr {
        self.as_c_str()
    }
}

impl Drop for OwnedStr {
    fn drop(&mut self) {
        log::trace!("releasing string at {:p}", self.ptr);
        unsafe { libc::free(self.ptr.as_ptr().cast()) }
    }
}

impl fmt::Debug for OwnedStr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("OwnedStr").field(&self.as_c_str()).finish()
    }
}

// ============================================================================
// C ABI
// ============================================================================

/// Length of `s` in bytes, excluding the terminator.
///
/// # Safety
/// `s` must be null or a valid null-terminated string. Null terminates the
/// process with an invalid-argument failure.
#[cfg_attr(feature = "ffi-exports", unsafe(no_mangle))]
pub unsafe extern "C" fn str_len(s: *const c_char) -> i32 {
    let s = or_terminate(unsafe { borrow_c_str(s, "str_len") });
    or_terminate(length(s.to_bytes()))
}

/// Byte-wise equality of two strings.
///
/// # Safety
/// Both arguments must be null or valid null-terminated strings.
#[cfg_attr(feature = "ffi-exports", unsafe(no_mangle))]
pub unsafe extern "C" fn str_eq(lhs: *const c_char, rhs: *const c_char) -> bool {
    let lhs = or_terminate(unsafe { borrow_c_str(lhs, "str_eq") });
    let rhs = or_terminate(unsafe { borrow_c_str(rhs, "str_eq") });
    equal(lhs.to_bytes(), rhs.to_bytes())
}

/// Concatenate two strings into a newly allocated buffer.
///
/// Ownership of the result transfers to the caller, who must release it with
/// [`str_free`] (or C `free`). This layer never releases it.
///
/// # Safety
/// Both arguments must be null or valid null-terminated strings.
#[cfg_attr(feature = "ffi-exports", unsafe(no_mangle))]
pub unsafe extern "C" fn str_concat(lhs: *const c_char, rhs: *const c_char) -> *mut c_char {
    let lhs = or_terminate(unsafe { borrow_c_str(lhs, "str_concat") });
    let rhs = or_terminate(unsafe { borrow_c_str(rhs, "str_concat") });
    or_terminate(OwnedStr::concat(lhs, rhs)).into_raw()
}

/// Release a string returned by [`str_concat`]. Null is a no-op.
///
/// # Safety
/// `s` must be null or a pointer returned by `str_concat` that has not been
/// released yet.
#[cfg_attr(feature = "ffi-exports", unsafe(no_mangle))]
pub unsafe extern "C" fn str_free(s: *mut c_char) {
    drop(unsafe { OwnedStr::from_raw(s) });
}

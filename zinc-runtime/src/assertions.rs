//! Equality assertions and the panic primitive.
//!
//! The `check_*` functions are the Rust-side contract: `Ok(())` on equal
//! values, `Err(Failure::AssertionMismatch)` otherwise. The exported
//! `assert_*` functions and [`panic`] never return on failure; they report
//! and exit with [`EXIT_STATUS`](crate::EXIT_STATUS).

use std::os::raw::c_char;

use crate::error::{or_terminate, terminate, Failure};
use crate::string::{borrow_c_str, equal};

pub fn check_int_eq(lhs: i32, rhs: i32) -> Result<(), Failure> {
    if lhs != rhs {
        return Err(Failure::mismatch(lhs.to_string(), rhs.to_string()));
    }
    Ok(())
}

pub fn check_bool_eq(lhs: bool, rhs: bool) -> Result<(), Failure> {
    if lhs != rhs {
        return Err(Failure::mismatch(lhs.to_string(), rhs.to_string()));
    }
    Ok(())
}

pub fn check_str_eq(lhs: &[u8], rhs: &[u8]) -> Result<(), Failure> {
    if !equal(lhs, rhs) {
        return Err(Failure::mismatch(lhs, rhs));
    }
    Ok(())
}

// ============================================================================
// C ABI
// ============================================================================

#[cfg_attr(feature = "ffi-exports", unsafe(no_mangle))]
pub extern "C" fn assert_int_eq(lhs: i32, rhs: i32) {
    or_terminate(check_int_eq(lhs, rhs));
}

#[cfg_attr(feature = "ffi-exports", unsafe(no_mangle))]
pub extern "C" fn assert_bool_eq(lhs: bool, rhs: bool) {
    or_terminate(check_bool_eq(lhs, rhs));
}

/// # Safety
/// Both arguments must be null or valid null-terminated strings.
#[cfg_attr(feature = "ffi-exports", unsafe(no_mangle))]
pub unsafe extern "C" fn assert_str_eq(lhs: *const c_char, rhs: *const c_char) {
    let lhs = or_terminate(unsafe { borrow_c_str(lhs, "assert_str_eq") });
    let rhs = or_terminate(unsafe { borrow_c_str(rhs, "assert_str_eq") });
    or_terminate(check_str_eq(lhs.to_bytes(), rhs.to_bytes()));
}

/// Report `panic` and exit. Used by generated code for unrecoverable
/// conditions such as out-of-bounds access.
#[cfg_attr(feature = "ffi-exports", unsafe(no_mangle))]
pub extern "C" fn panic() -> ! {
    terminate(Failure::ExplicitPanic)
}

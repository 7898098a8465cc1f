//! Primitive printing: one value, one line, flushed before returning.

use std::io::{self, Write};
use std::os::raw::c_char;

use crate::error::or_terminate;
use crate::string::borrow_c_str;

pub fn write_int<W: Write>(out: &mut W, value: i32) -> io::Result<()> {
    writeln!(out, "{}", value)?;
    out.flush()
}

/// Booleans print as `true` / `false`, never as digits.
pub fn write_bool<W: Write>(out: &mut W, value: bool) -> io::Result<()> {
    out.write_all(if value { b"true\n" } else { b"false\n" })?;
    out.flush()
}

/// Writes `bytes` verbatim. No escaping, no UTF-8 validation.
pub fn write_str<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    out.write_all(bytes)?;
    out.write_all(b"\n")?;
    out.flush()
}

fn emit(operation: &str, f: impl FnOnce(&mut io::StdoutLock<'_>) -> io::Result<()>) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = f(&mut out) {
        // Printing has no error channel.
        log::warn!("{}: write to stdout failed: {}", operation, e);
    }
}

// ============================================================================
// C ABI
// ============================================================================

#[cfg_attr(feature = "ffi-exports", unsafe(no_mangle))]
pub extern "C" fn print_int(x: i32) {
    emit("print_int", |out| write_int(out, x));
}

#[cfg_attr(feature = "ffi-exports", unsafe(no_mangle))]
pub extern "C" fn print_bool(x: bool) {
    emit("print_bool", |out| write_bool(out, x));
}

/// # Safety
/// `s` must be null or a valid null-terminated string. Null terminates the
/// process with an invalid-argument failure.
#[cfg_attr(feature = "ffi-exports", unsafe(no_mangle))]
pub unsafe extern "C" fn print_str(s: *const c_char) {
    let s = or_terminate(unsafe { borrow_c_str(s, "print_str") });
    emit("print_str", |out| write_str(out, s.to_bytes()));
}

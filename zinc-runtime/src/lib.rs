//! Zinc Runtime - native support primitives for Zinc-generated code
//!
//! This crate provides:
//! - Printing of integers, booleans and strings (one line per call)
//! - Length, equality and concatenation of null-terminated byte strings
//! - Equality assertions and `panic`, which report and exit with status 1
//! - The builtin table (names, signatures, addresses) for JIT and AOT hosts
//! - Value-level dispatch of the same primitives for interpreting hosts
//!
//! The exported C functions are a flat table with unmangled names
//! (`print_int`, `str_concat`, ...). None of them keep state, and none of
//! them lock across calls: hosts calling from several threads must serialize
//! their calls if output ordering matters.
//!
//! `str_concat` is the only function that allocates on the caller's behalf.
//! Its result belongs to the caller, who releases it with `str_free`.

pub mod assertions;
pub mod builtin;
pub mod error;
pub mod io;
pub mod string;
pub mod value;

pub use assertions::{
    assert_bool_eq, assert_int_eq, assert_str_eq, check_bool_eq, check_int_eq, check_str_eq, panic,
};
pub use builtin::{symbols, AbiType, Builtin, Signature, UnknownBuiltin};
pub use error::{terminate, Failure, FailureKind, EXIT_STATUS};
pub use io::{print_bool, print_int, print_str};
pub use string::{str_concat, str_eq, str_free, str_len, OwnedStr};
pub use value::{CallError, Value};

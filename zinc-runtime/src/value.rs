//! Value-level dispatch for interpreting hosts.
//!
//! An interpreter has no C strings and must not lose the process on a failed
//! assertion, so [`Builtin::invoke`] runs a primitive on tagged [`Value`]s,
//! writes to a caller-supplied sink and returns failures as [`CallError`].
//! Output text and failure messages are identical to the C entry points.

use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

use crate::assertions::{check_bool_eq, check_int_eq, check_str_eq};
use crate::builtin::Builtin;
use crate::error::Failure;
use crate::io::{write_bool, write_int, write_str};
use crate::string::{equal, length};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Bool(bool),
    Str(Vec<u8>),
    Unit,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::Unit => "unit",
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Str(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{}", String::from_utf8_lossy(v)),
            Value::Unit => write!(f, "()"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CallError {
    #[error("{builtin} expects {expected} argument(s), found {found}")]
    Arity {
        builtin: Builtin,
        expected: usize,
        found: usize,
    },

    #[error("{builtin}: argument {position} must be {expected}, found {found}")]
    Type {
        builtin: Builtin,
        position: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// The failure the C entry point would have terminated with.
    #[error(transparent)]
    Failed(#[from] Failure),

    #[error("output error: {0}")]
    Io(#[from] io::Error),
}

struct Args<'a> {
    builtin: Builtin,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn get(&self, position: usize) -> Option<&'a Value> {
        self.values.get(position)
    }

    fn mismatch(&self, position: usize, expected: &'static str, found: Option<&Value>) -> CallError {
        CallError::Type {
            builtin: self.builtin,
            position,
            expected,
            found: found.map_or("nothing", Value::type_name),
        }
    }

    fn int(&self, position: usize) -> Result<i32, CallError> {
        match self.get(position) {
            Some(Value::Int(v)) => Ok(*v),
            other => Err(self.mismatch(position, "int", other)),
        }
    }

    fn bool(&self, position: usize) -> Result<bool, CallError> {
        match self.get(position) {
            Some(Value::Bool(v)) => Ok(*v),
            other => Err(self.mismatch(position, "bool", other)),
        }
    }

    fn str(&self, position: usize) -> Result<&'a [u8], CallError> {
        match self.get(position) {
            // A C string ends at its first NUL, so such a value has no C-side twin.
            Some(Value::Str(v)) if v.contains(&0) => {
                Err(Failure::invalid(self.builtin.name(), "interior nul byte").into())
            }
            Some(Value::Str(v)) => Ok(v.as_slice()),
            other => Err(self.mismatch(position, "str", other)),
        }
    }
}

impl Builtin {
    /// Run this primitive on `args`, writing any output to `out`.
    ///
    /// Printing and assertions return [`Value::Unit`]; `str_free` is a no-op
    /// since values own their strings. A string argument containing a NUL
    /// byte is an invalid-argument failure, as no C string can carry one.
    pub fn invoke<W: Write>(self, args: &[Value], out: &mut W) -> Result<Value, CallError> {
        let expected = self.signature().params.len();
        if args.len() != expected {
            return Err(CallError::Arity {
                builtin: self,
                expected,
                found: args.len(),
            });
        }

        let args = Args {
            builtin: self,
            values: args,
        };

        let result = match self {
            Builtin::PrintInt => {
                write_int(out, args.int(0)?)?;
                Value::Unit
            }
            Builtin::PrintBool => {
                write_bool(out, args.bool(0)?)?;
                Value::Unit
            }
            Builtin::PrintStr => {
                write_str(out, args.str(0)?)?;
                Value::Unit
            }
            Builtin::StrLen => Value::Int(length(args.str(0)?)?),
            Builtin::StrEq => Value::Bool(equal(args.str(0)?, args.str(1)?)),
            Builtin::StrConcat => Value::Str([args.str(0)?, args.str(1)?].concat()),
            Builtin::StrFree => {
                args.str(0)?;
                Value::Unit
            }
            Builtin::AssertIntEq => {
                check_int_eq(args.int(0)?, args.int(1)?)?;
                Value::Unit
            }
            Builtin::AssertBoolEq => {
                check_bool_eq(args.bool(0)?, args.bool(1)?)?;
                Value::Unit
            }
            Builtin::AssertStrEq => {
                check_str_eq(args.str(0)?, args.str(1)?)?;
                Value::Unit
            }
            Builtin::Panic => return Err(Failure::ExplicitPanic.into()),
        };

        log::trace!("{} -> {}", self, result);
        Ok(result)
    }
}

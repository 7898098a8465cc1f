//! The builtin table: every exported primitive with its symbol name,
//! signature and entry address.
//!
//! A JIT host registers [`symbols`] with its linker; an AOT host declares
//! each [`Builtin::signature`] as an import when emitting object files.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::{assertions, io, string};

/// Argument and return types at the C ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbiType {
    /// 32-bit signed integer (C `int`)
    Int32,
    /// One-byte boolean (C `bool`)
    Bool,
    /// Pointer-sized address of a null-terminated string
    Pointer,
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AbiType::Int32 => write!(f, "i32"),
            AbiType::Bool => write!(f, "bool"),
            AbiType::Pointer => write!(f, "ptr"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub params: &'static [AbiType],
    pub ret: Option<AbiType>,
    /// The function never returns to its caller.
    pub diverges: bool,
}

impl Signature {
    const fn returning(params: &'static [AbiType], ret: AbiType) -> Self {
        Self {
            params,
            ret: Some(ret),
            diverges: false,
        }
    }

    const fn unit(params: &'static [AbiType]) -> Self {
        Self {
            params,
            ret: None,
            diverges: false,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")?;
        match (self.diverges, self.ret) {
            (true, _) => write!(f, " -> !"),
            (false, Some(ret)) => write!(f, " -> {}", ret),
            (false, None) => Ok(()),
        }
    }
}

/// One exported runtime primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    PrintInt,
    PrintBool,
    PrintStr,
    StrLen,
    StrEq,
    StrConcat,
    StrFree,
    AssertIntEq,
    AssertBoolEq,
    AssertStrEq,
    Panic,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown builtin `{0}`")]
pub struct UnknownBuiltin(pub String);

impl Builtin {
    /// Every builtin, in ABI table order.
    pub const ALL: [Builtin; 11] = [
        Builtin::PrintInt,
        Builtin::PrintBool,
        Builtin::PrintStr,
        Builtin::StrLen,
        Builtin::StrEq,
        Builtin::StrConcat,
        Builtin::StrFree,
        Builtin::AssertIntEq,
        Builtin::AssertBoolEq,
        Builtin::AssertStrEq,
        Builtin::Panic,
    ];

    /// Exported symbol name
    pub fn name(self) -> &'static str {
        match self {
            Builtin::PrintInt => "print_int",
            Builtin::PrintBool => "print_bool",
            Builtin::PrintStr => "print_str",
            Builtin::StrLen => "str_len",
            Builtin::StrEq => "str_eq",
            Builtin::StrConcat => "str_concat",
            Builtin::StrFree => "str_free",
            Builtin::AssertIntEq => "assert_int_eq",
            Builtin::AssertBoolEq => "assert_bool_eq",
            Builtin::AssertStrEq => "assert_str_eq",
            Builtin::Panic => "panic",
        }
    }

    pub fn signature(self) -> Signature {
        use AbiType::*;

        match self {
            Builtin::PrintInt => Signature::unit(&[Int32]),
            Builtin::PrintBool => Signature::unit(&[Bool]),
            Builtin::PrintStr => Signature::unit(&[Pointer]),
            Builtin::StrLen => Signature::returning(&[Pointer], Int32),
            Builtin::StrEq => Signature::returning(&[Pointer, Pointer], Bool),
            Builtin::StrConcat => Signature::returning(&[Pointer, Pointer], Pointer),
            Builtin::StrFree => Signature::unit(&[Pointer]),
            Builtin::AssertIntEq => Signature::unit(&[Int32, Int32]),
            Builtin::AssertBoolEq => Signature::unit(&[Bool, Bool]),
            Builtin::AssertStrEq => Signature::unit(&[Pointer, Pointer]),
            Builtin::Panic => Signature {
                params: &[],
                ret: None,
                diverges: true,
            },
        }
    }

    /// Entry address of the exported function, for JIT symbol registration.
    pub fn address(self) -> *const u8 {
        match self {
            Builtin::PrintInt => io::print_int as *const u8,
            Builtin::PrintBool => io::print_bool as *const u8,
            Builtin::PrintStr => io::print_str as *const u8,
            Builtin::StrLen => string::str_len as *const u8,
            Builtin::StrEq => string::str_eq as *const u8,
            Builtin::StrConcat => string::str_concat as *const u8,
            Builtin::StrFree => string::str_free as *const u8,
            Builtin::AssertIntEq => assertions::assert_int_eq as *const u8,
            Builtin::AssertBoolEq => assertions::assert_bool_eq as *const u8,
            Builtin::AssertStrEq => assertions::assert_str_eq as *const u8,
            Builtin::Panic => assertions::panic as *const u8,
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Builtin {
    type Err = UnknownBuiltin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Builtin::ALL
            .into_iter()
            .find(|builtin| builtin.name() == s)
            .ok_or_else(|| UnknownBuiltin(s.to_string()))
    }
}

/// `(name, address)` for every builtin, ready to hand to a JIT linker.
pub fn symbols() -> Vec<(&'static str, *const u8)> {
    Builtin::ALL
        .into_iter()
        .map(|builtin| (builtin.name(), builtin.address()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for builtin in Builtin::ALL {
            assert_eq!(builtin.name().parse::<Builtin>(), Ok(builtin));
        }
        assert_eq!(
            "print_float".parse::<Builtin>(),
            Err(UnknownBuiltin("print_float".to_string()))
        );
    }

    #[test]
    fn test_symbols_are_distinct_and_non_null() {
        let symbols = symbols();
        assert_eq!(symbols.len(), Builtin::ALL.len());

        let names: HashSet<_> = symbols.iter().map(|(name, _)| *name).collect();
        let addresses: HashSet<_> = symbols.iter().map(|(_, addr)| *addr as usize).collect();
        assert_eq!(names.len(), symbols.len());
        assert_eq!(addresses.len(), symbols.len());
        assert!(symbols.iter().all(|(_, addr)| !addr.is_null()));
    }

    #[test]
    fn test_signatures() {
        assert_eq!(Builtin::StrConcat.signature().to_string(), "(ptr, ptr) -> ptr");
        assert_eq!(Builtin::StrLen.signature().to_string(), "(ptr) -> i32");
        assert_eq!(Builtin::AssertBoolEq.signature().to_string(), "(bool, bool)");
        assert_eq!(Builtin::Panic.signature().to_string(), "() -> !");
        assert!(Builtin::ALL
            .iter()
            .filter(|b| b.signature().diverges)
            .eq([Builtin::Panic].iter()));
    }
}

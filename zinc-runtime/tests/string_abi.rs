use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use zinc_runtime::{str_concat, str_eq, str_free, str_len, symbols, Builtin, OwnedStr};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn concat(lhs: &CStr, rhs: &CStr) -> *mut c_char {
    unsafe { str_concat(lhs.as_ptr(), rhs.as_ptr()) }
}

#[test]
fn test_concat_length_is_sum_of_lengths() {
    init_logger();

    let cases: [(&CStr, &CStr); 4] = [(c"foo", c"bar"), (c"", c""), (c"a", c""), (c"", c"longer text")];
    for (a, b) in cases {
        let joined = concat(a, b);
        let len = unsafe { str_len(joined) };
        assert_eq!(len, unsafe { str_len(a.as_ptr()) + str_len(b.as_ptr()) });

        let expected = [a.to_bytes(), b.to_bytes()].concat();
        assert_eq!(unsafe { CStr::from_ptr(joined) }.to_bytes(), expected.as_slice());

        unsafe { str_free(joined) };
    }
}

#[test]
fn test_concat_leaves_inputs_untouched() {
    init_logger();

    let a = CString::new("left").unwrap();
    let b = CString::new("right").unwrap();
    let joined = concat(&a, &b);

    assert_eq!(a.as_bytes(), b"left");
    assert_eq!(b.as_bytes(), b"right");

    unsafe { str_free(joined) };
    assert_eq!(a.as_bytes(), b"left");
}

#[test]
fn test_concat_results_are_independent() {
    init_logger();

    let first = concat(c"ab", c"cd");
    let second = concat(c"ab", c"cd");
    assert_ne!(first, second);

    // Mutating one result must not show through the other.
    unsafe { *first = b'X' as c_char };
    assert_eq!(unsafe { CStr::from_ptr(second) }.to_bytes(), b"abcd");

    unsafe { str_free(first) };
    assert!(unsafe { str_eq(second, c"abcd".as_ptr()) });
    unsafe { str_free(second) };
}

#[test]
fn test_concat_result_is_c_allocated() {
    // The host may release a result with plain `free` instead of `str_free`.
    let joined = concat(c"x", c"y");
    unsafe { libc::free(joined.cast()) };
}

#[test]
fn test_str_eq_is_bytewise() {
    unsafe {
        assert!(str_eq(c"same".as_ptr(), c"same".as_ptr()));
        assert!(!str_eq(c"same".as_ptr(), c"Same".as_ptr()));
        assert!(!str_eq(c"same".as_ptr(), c"sam".as_ptr()));
        assert!(str_eq(c"".as_ptr(), c"".as_ptr()));
    }
}

#[test]
fn test_str_free_accepts_null() {
    unsafe { str_free(std::ptr::null_mut()) };
}

#[test]
fn test_owned_str_hands_over_to_abi() {
    let owned = OwnedStr::concat(c"foo", c"bar").unwrap();
    let raw = owned.into_raw();
    assert_eq!(unsafe { str_len(raw) }, 6);
    unsafe { str_free(raw) };
}

#[test]
fn test_symbol_table_calls_through() {
    let table = symbols();
    let (name, addr) = table
        .iter()
        .copied()
        .find(|(name, _)| *name == Builtin::StrLen.name())
        .unwrap();
    assert_eq!(name, "str_len");

    let f: unsafe extern "C" fn(*const c_char) -> i32 = unsafe { std::mem::transmute(addr) };
    assert_eq!(unsafe { f(c"bruh".as_ptr()) }, 4);
}

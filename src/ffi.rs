//! C ABI entry points.
//!
//! Every raw pointer is checked here and turned into a slice exactly once, the sorting code only
//! ever sees slices. Errors are returned as [`BinSortStatus`] codes with a message retrievable
//! through [`binsort_last_error`], panics are caught before they reach the caller.
//!
//! See `include/binsort.h` for the C declarations.

use std::cell::RefCell;
use std::ffi::{c_char, CString};
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::ptr;
use std::slice;

use crate::approx::{self, Binning};
use crate::counting;
use crate::error::BinSortError;

/// Result of a boundary call. `Ok` is zero, everything else is a rejected call that left the
/// output buffer untouched, except `Panicked`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinSortStatus {
    Ok = 0,
    NullPointer = 1,
    InvalidLength = 2,
    Misaligned = 3,
    Aliased = 4,
    InvalidLabel = 5,
    IndexOverflow = 6,
    TooManyBuckets = 7,
    AllocationFailed = 8,
    InvalidArgument = 9,
    Panicked = 10,
}

impl From<&BinSortError> for BinSortStatus {
    fn from(err: &BinSortError) -> Self {
        match err {
            BinSortError::InvalidLabel { .. } => BinSortStatus::InvalidLabel,
            BinSortError::LengthMismatch { .. } => BinSortStatus::InvalidLength,
            BinSortError::IndexOverflow { .. } => BinSortStatus::IndexOverflow,
            BinSortError::TooManyBuckets { .. } => BinSortStatus::TooManyBuckets,
            BinSortError::Allocation { .. } => BinSortStatus::AllocationFailed,
            BinSortError::ZeroBins
            | BinSortError::NonFinite { .. }
            | BinSortError::NonPositive { .. } => BinSortStatus::InvalidArgument,
        }
    }
}

struct Rejection {
    status: BinSortStatus,
    message: String,
}

impl Rejection {
    fn new(status: BinSortStatus, message: String) -> Self {
        Self { status, message }
    }
}

impl From<BinSortError> for Rejection {
    fn from(err: BinSortError) -> Self {
        Self::new(BinSortStatus::from(&err), err.to_string())
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = RefCell::new(None);
}

/// Message describing why the last call on this thread failed, NULL if it succeeded.
///
/// The string is owned by the library and stays valid until the next call on the same thread.
#[no_mangle]
pub extern "C" fn binsort_last_error() -> *const c_char {
    LAST_ERROR.with(|last| {
        last.borrow()
            .as_ref()
            .map_or(ptr::null(), |message| message.as_ptr())
    })
}

fn set_last_error(message: Option<String>) {
    // Interior NUL can't come from our own messages, fall back to an empty string regardless.
    let message = message.map(|m| CString::new(m).unwrap_or_default());
    LAST_ERROR.with(|last| *last.borrow_mut() = message);
}

fn last_error_message() -> String {
    LAST_ERROR.with(|last| {
        last.borrow()
            .as_ref()
            .map(|message| message.to_string_lossy().into_owned())
            .unwrap_or_default()
    })
}

fn run_boundary(name: &str, body: impl FnOnce() -> Result<(), Rejection>) -> BinSortStatus {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(())) => {
            set_last_error(None);
            BinSortStatus::Ok
        }
        Ok(Err(rejection)) => {
            set_last_error(Some(rejection.message));
            rejection.status
        }
        Err(err) => {
            eprintln!("Panic during {name}: {err:?}");
            set_last_error(Some(format!("panic during {name}")));
            BinSortStatus::Panicked
        }
    }
}

fn checked_len<T>(n: i64) -> Result<usize, Rejection> {
    let len = usize::try_from(n).map_err(|_| {
        Rejection::new(
            BinSortStatus::InvalidLength,
            format!("item count {n} is negative or too large"),
        )
    })?;

    match len.checked_mul(mem::size_of::<T>()) {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(len),
        _ => Err(Rejection::new(
            BinSortStatus::InvalidLength,
            format!("{len} items exceed the addressable size"),
        )),
    }
}

fn check_ptr<T>(ptr: *const T, name: &str) -> Result<(), Rejection> {
    if ptr.is_null() {
        return Err(Rejection::new(
            BinSortStatus::NullPointer,
            format!("{name} is null"),
        ));
    }

    if (ptr as usize) % mem::align_of::<T>() != 0 {
        return Err(Rejection::new(
            BinSortStatus::Misaligned,
            format!("{name} is not aligned to {} bytes", mem::align_of::<T>()),
        ));
    }

    Ok(())
}

fn check_disjoint<A, B>(a: *const A, b: *const B, len: usize) -> Result<(), Rejection> {
    let a_start = a as usize;
    let a_end = a_start.saturating_add(len * mem::size_of::<A>());
    let b_start = b as usize;
    let b_end = b_start.saturating_add(len * mem::size_of::<B>());

    if a_start < b_end && b_start < a_end {
        return Err(Rejection::new(
            BinSortStatus::Aliased,
            "input and order buffers overlap".into(),
        ));
    }

    Ok(())
}

/// Validates the caller's buffers and runs `f` over slices of them.
///
/// # Safety
///
/// For `n > 0` both pointers must be valid for `n` elements for the duration of the call, `input`
/// for reads and `order` for writes.
unsafe fn with_buffers<K, I>(
    n: i64,
    input: *const K,
    order: *mut I,
    f: impl FnOnce(&[K], &mut [I]) -> Result<(), Rejection>,
) -> Result<(), Rejection> {
    let len = checked_len::<K>(n)?;
    checked_len::<I>(n)?;

    if len == 0 {
        return f(&[], &mut []);
    }

    check_ptr(input, "input")?;
    check_ptr(order as *const I, "order")?;
    check_disjoint(input, order as *const I, len)?;

    // SAFETY: non-null, aligned, disjoint, and the size fits isize. Validity for `len` elements
    // is the caller's part of the contract.
    let (input, order) = unsafe {
        (
            slice::from_raw_parts(input, len),
            slice::from_raw_parts_mut(order, len),
        )
    };

    f(input, order)
}

macro_rules! ffi_binsort_impl {
    ($($t:ident),*) => {
        paste::paste! {
            $(
                #[doc = "Writes the stable by-bin permutation of `n` `" $t "` labels into `order`."]
                ///
                /// # Safety
                ///
                /// For `n > 0`, `bins` must be readable and `order` writable for `n` elements,
                /// both staying valid until the call returns.
                #[no_mangle]
                pub unsafe extern "C" fn [<binsort_ $t>](
                    n: i64,
                    bins: *const $t,
                    order: *mut $t,
                ) -> BinSortStatus {
                    run_boundary(concat!("binsort_", stringify!($t)), || {
                        // SAFETY: forwarded from this function's contract.
                        unsafe {
                            with_buffers(n, bins, order, |bins, order| {
                                counting::sort_into(bins, order).map_err(Rejection::from)
                            })
                        }
                    })
                }
            )*
        }
    };
}

ffi_binsort_impl!(i32, i64, u32, u64);

/// Approximate argsort of `n` finite values into `bins` bins, over `ln(x)` if `log` is set.
///
/// # Safety
///
/// For `n > 0`, `values` must be readable and `order` writable for `n` elements, both staying
/// valid until the call returns.
#[no_mangle]
pub unsafe extern "C" fn binsort_approx_f64(
    n: i64,
    values: *const f64,
    bins: i64,
    log: bool,
    order: *mut i64,
) -> BinSortStatus {
    run_boundary("binsort_approx_f64", || {
        // SAFETY: forwarded from this function's contract.
        unsafe {
            with_buffers(n, values, order, |values, order| {
                // Nothing to order, the bin count is never looked at.
                if values.is_empty() {
                    return Ok(());
                }

                let bins = usize::try_from(bins).map_err(|_| {
                    Rejection::new(
                        BinSortStatus::InvalidArgument,
                        format!("bin count {bins} is negative or too large"),
                    )
                })?;
                let binning = if log {
                    Binning::Log(bins)
                } else {
                    Binning::Linear(bins)
                };

                approx::approx_argsort_into(values, binning, order).map_err(Rejection::from)
            })
        }
    })
}

/// Same contract as [`binsort_i64`] without a status: any rejected input is reported on stderr
/// and aborts the process.
///
/// # Safety
///
/// See [`binsort_i64`].
#[export_name = "cApprox"]
pub unsafe extern "C" fn c_approx(n: i64, bins: *const i64, order: *mut i64) {
    // SAFETY: same contract.
    let status = unsafe { binsort_i64(n, bins, order) };

    if status != BinSortStatus::Ok {
        eprintln!("cApprox: {status:?}: {}", last_error_message());
        process::abort();
    }
}

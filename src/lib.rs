//! Stable ordering of items by integer bin label.
//!
//! [`sort`] computes the permutation that groups items by ascending bin while keeping items with
//! equal bins in input order, using a counting sort. [`approx`] builds an approximate argsort of
//! real values on top of it, and [`ffi`] exposes both to foreign callers over raw buffers.

pub mod approx;
pub mod counting;
pub mod error;
pub mod ffi;
pub mod label;
pub mod patterns;

pub use approx::{approx_argsort, quantize, Binning};
pub use counting::{bucket_count, sort, sort_into, BinSorter, MAX_BUCKETS};
pub use error::{BinSortError, Result};
pub use ffi::BinSortStatus;
pub use label::{BinLabel, OrderIndex};

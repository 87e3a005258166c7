use thiserror::Error;

pub type Result<T> = std::result::Result<T, BinSortError>;

/// Everything that can go wrong while ordering items by bin.
///
/// All validation happens before the output buffer is written, a returned error means the
/// caller's `order` buffer is untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BinSortError {
    /// A label is negative or too large to index a bucket on this platform.
    #[error("bin label {label} at index {index} is not a valid bucket index")]
    InvalidLabel { index: usize, label: i128 },

    #[error("bins has {bins} elements but order has {order}")]
    LengthMismatch { bins: usize, order: usize },

    /// The order buffer's element type can't represent every item index.
    #[error("{len} items can't be indexed by an order type with max index {max}")]
    IndexOverflow { len: usize, max: usize },

    #[error("{buckets} buckets requested, limit is {limit}")]
    TooManyBuckets { buckets: usize, limit: usize },

    #[error("failed to allocate counts for {buckets} buckets")]
    Allocation { buckets: usize },

    #[error("binning needs at least one bin")]
    ZeroBins,

    #[error("value at index {index} is not finite")]
    NonFinite { index: usize },

    /// Log binning saw a value with no real logarithm.
    #[error("value at index {index} is not positive, can't take its log")]
    NonPositive { index: usize },
}

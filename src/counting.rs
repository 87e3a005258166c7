//! Stable counting sort of item indices by bin label.
//!
//! Three linear passes over the labels, *O*(*n* + *k*) for *k* buckets:
//!
//! 1. Validate the labels and find the bucket count `max + 1`.
//! 2. Count items per bucket one slot to the right, then prefix sum, leaving the start offset of
//!    bucket `b` in `counts[b]`.
//! 3. Scatter item indices in original order, bumping the bucket's cursor after each write.
//!
//! Visiting items strictly left to right in the scatter pass is what makes the result stable.

use std::mem;
use std::ops::Range;

use crate::error::{BinSortError, Result};
use crate::label::{BinLabel, OrderIndex};

/// Upper bound on the bucket count, the counts buffer can't be larger than `isize::MAX` bytes.
pub const MAX_BUCKETS: usize = (isize::MAX as usize) / mem::size_of::<usize>() - 1;

/// Returns the number of buckets `bins` spans, `max(bins) + 1`, or `0` for no labels.
pub fn bucket_count<K: BinLabel>(bins: &[K]) -> Result<usize> {
    scan(bins, MAX_BUCKETS)
}

/// Writes the stable by-bin permutation of `0..bins.len()` into `order`.
///
/// `order` must have the same length as `bins`. Uses a fresh [`BinSorter`], see there for
/// reusing the scratch buffer across calls.
pub fn sort_into<K: BinLabel, I: OrderIndex>(bins: &[K], order: &mut [I]) -> Result<()> {
    BinSorter::new().sort_into(bins, order)
}

/// Returns the stable by-bin permutation of `0..bins.len()`.
pub fn sort<K: BinLabel>(bins: &[K]) -> Result<Vec<usize>> {
    BinSorter::new().sort(bins)
}

/// Counting sorter that keeps its counts buffer between calls.
///
/// After a successful sort the buffer holds the end offset of every bucket, which
/// [`BinSorter::bucket_range`] exposes.
#[derive(Debug, Clone)]
pub struct BinSorter {
    counts: Vec<usize>,
    n_bins: usize,
    max_buckets: usize,
}

impl Default for BinSorter {
    fn default() -> Self {
        Self::new()
    }
}

impl BinSorter {
    pub fn new() -> Self {
        Self::with_max_buckets(MAX_BUCKETS)
    }

    /// Rejects inputs spanning more than `limit` buckets with [`BinSortError::TooManyBuckets`]
    /// instead of allocating for them. A single huge label is enough to need a huge counts
    /// buffer, no matter how few items there are.
    pub fn with_max_buckets(limit: usize) -> Self {
        Self {
            counts: Vec::new(),
            n_bins: 0,
            max_buckets: limit.min(MAX_BUCKETS),
        }
    }

    pub fn sort_into<K: BinLabel, I: OrderIndex>(
        &mut self,
        bins: &[K],
        order: &mut [I],
    ) -> Result<()> {
        self.n_bins = 0;

        let len = bins.len();
        if order.len() != len {
            return Err(BinSortError::LengthMismatch {
                bins: len,
                order: order.len(),
            });
        }

        if len == 0 {
            return Ok(());
        }

        if len - 1 > I::MAX_INDEX {
            return Err(BinSortError::IndexOverflow {
                len,
                max: I::MAX_INDEX,
            });
        }

        let n_bins = scan(bins, self.max_buckets)?;
        self.reset_counts(n_bins)?;

        let counts = self.counts.as_mut_slice();
        for &label in bins {
            counts[scanned_bucket(label) + 1] += 1;
        }

        for i in 1..counts.len() {
            counts[i] += counts[i - 1];
        }

        let starts = &mut counts[..n_bins];
        for (i, &label) in bins.iter().enumerate() {
            let bucket = scanned_bucket(label);
            order[starts[bucket]] = I::from_index(i);
            starts[bucket] += 1;
        }

        self.n_bins = n_bins;
        Ok(())
    }

    pub fn sort<K: BinLabel>(&mut self, bins: &[K]) -> Result<Vec<usize>> {
        let mut order = vec![0usize; bins.len()];
        self.sort_into(bins, &mut order)?;
        Ok(order)
    }

    /// Number of buckets spanned by the last successful sort, `0` after an error.
    pub fn bucket_len(&self) -> usize {
        self.n_bins
    }

    /// Positions in the last computed order holding the items of `bucket`.
    ///
    /// Empty for a bucket no item landed in, `None` for `bucket >= self.bucket_len()`.
    pub fn bucket_range(&self, bucket: usize) -> Option<Range<usize>> {
        if bucket >= self.n_bins {
            return None;
        }

        // The scatter pass moved every cursor to the end of its bucket.
        let start = if bucket == 0 {
            0
        } else {
            self.counts[bucket - 1]
        };

        Some(start..self.counts[bucket])
    }

    fn reset_counts(&mut self, n_bins: usize) -> Result<()> {
        let len = n_bins + 1;

        self.counts.clear();
        self.counts
            .try_reserve_exact(len)
            .map_err(|_| BinSortError::Allocation { buckets: n_bins })?;
        self.counts.resize(len, 0);

        Ok(())
    }
}

fn scan<K: BinLabel>(bins: &[K], limit: usize) -> Result<usize> {
    let mut n_bins = 0;

    for (index, &label) in bins.iter().enumerate() {
        let bucket = label.bucket().ok_or(BinSortError::InvalidLabel {
            index,
            label: label.widen(),
        })?;

        if bucket >= limit {
            return Err(BinSortError::TooManyBuckets {
                buckets: bucket.saturating_add(1),
                limit,
            });
        }

        if n_bins <= bucket {
            n_bins = bucket + 1;
        }
    }

    Ok(n_bins)
}

// Only for labels `scan` already accepted.
#[inline]
fn scanned_bucket<K: BinLabel>(label: K) -> usize {
    match label.bucket() {
        Some(bucket) => bucket,
        None => unreachable!("label passed scan"),
    }
}

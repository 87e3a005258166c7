//! Approximate argsort of real values by binning them first.
//!
//! Values are mapped onto `bins` equal width intervals between their minimum and maximum, then
//! ordered with the counting sort. Values sharing an interval keep their input order, so the result
//! matches a true argsort whenever no two values share an interval.

use crate::counting::{self, BinSorter};
use crate::error::{BinSortError, Result};
use crate::label::OrderIndex;

/// How values are mapped onto bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binning {
    /// `n` equal width bins over the values.
    Linear(usize),
    /// `n` equal width bins over the natural log of the values. Only for positive values.
    Log(usize),
}

impl Binning {
    pub fn bins(self) -> usize {
        match self {
            Binning::Linear(bins) | Binning::Log(bins) => bins,
        }
    }
}

/// Maps every value to its bin label.
///
/// Labels cover `0..=bins`: the maximum value lands in a bucket of its own at index `bins`. If all
/// values are equal every label is `0`.
pub fn quantize(values: &[f64], binning: Binning) -> Result<Vec<usize>> {
    if values.is_empty() {
        return Ok(Vec::new());
    }

    let bins = binning.bins();
    if bins == 0 {
        return Err(BinSortError::ZeroBins);
    }

    let keys = match binning {
        Binning::Linear(_) => {
            check_finite(values)?;
            values.to_vec()
        }
        Binning::Log(_) => {
            check_finite(values)?;
            if let Some(index) = values.iter().position(|&x| x <= 0.0) {
                return Err(BinSortError::NonPositive { index });
            }
            values.iter().map(|x| x.ln()).collect()
        }
    };

    let (low, high) = keys
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), &x| {
            (low.min(x), high.max(x))
        });

    if high == low {
        return Ok(vec![0; keys.len()]);
    }

    // Halved so the span between values near +-f64::MAX stays finite.
    let low_half = low / 2.0;
    let dx = (high / 2.0 - low_half) / bins as f64;

    Ok(keys
        .iter()
        .map(|&x| {
            let pos = (x / 2.0 - low_half) / dx;
            // Float to int casts saturate, NaN becomes 0.
            (pos as usize).min(bins)
        })
        .collect())
}

/// Returns an ordering of `values` in the style of an argsort, exact up to bin resolution.
pub fn approx_argsort(values: &[f64], binning: Binning) -> Result<Vec<usize>> {
    counting::sort(&quantize(values, binning)?)
}

/// Like [`approx_argsort`], writing into a caller buffer of the same length as `values`.
pub fn approx_argsort_into<I: OrderIndex>(
    values: &[f64],
    binning: Binning,
    order: &mut [I],
) -> Result<()> {
    if order.len() != values.len() {
        return Err(BinSortError::LengthMismatch {
            bins: values.len(),
            order: order.len(),
        });
    }

    BinSorter::new().sort_into(&quantize(values, binning)?, order)
}

fn check_finite(values: &[f64]) -> Result<()> {
    match values.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(BinSortError::NonFinite { index }),
        None => Ok(()),
    }
}

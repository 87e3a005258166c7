//! Bin label and value patterns useful for testing and benchmarking the bin sort.
//! Labels are i64, the type of the C entry point.

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::distributions::Uniform;
use rand::prelude::*;

use once_cell::sync::OnceCell;

// --- Public ---

pub fn random_bins(size: usize, max_bin: i64) -> Vec<i64> {
    //     .
    // : . : :
    // :.:::.::

    random_uniform(size, 0..=max_bin)
}

pub fn random_uniform<R>(size: usize, range: R) -> Vec<i64>
where
    R: Into<Uniform<i64>>,
{
    let mut rng = new_seed();
    let dist: Uniform<i64> = range.into();

    (0..size).map(|_| dist.sample(&mut rng)).collect()
}

pub fn all_equal(size: usize) -> Vec<i64> {
    // ......
    // ::::::

    vec![6; size]
}

pub fn ascending(size: usize) -> Vec<i64> {
    //     .:
    //   .:::
    // .:::::

    (0..size as i64).collect()
}

pub fn descending(size: usize) -> Vec<i64> {
    // :.
    // :::.
    // :::::.

    (0..size as i64).rev().collect()
}

pub fn saw_mixed(size: usize, saw_count: usize, max_bin: i64) -> Vec<i64> {
    // :.  :.    .::.    .:
    // :::.:::..::::::..:::

    if size == 0 {
        return Vec::new();
    }

    let mut vals = random_bins(size, max_bin);
    let chunks_size = (size / saw_count.max(1)).max(1);
    let saw_directions = random_uniform((size / chunks_size) + 1, 0..=1);

    for (i, chunk) in vals.chunks_mut(chunks_size).enumerate() {
        if saw_directions[i] == 0 {
            chunk.sort_unstable();
        } else {
            chunk.sort_unstable_by_key(|&e| std::cmp::Reverse(e));
        }
    }

    vals
}

pub fn pipe_organ(size: usize, max_bin: i64) -> Vec<i64> {
    //   .:.
    // .:::::.

    let mut vals = random_bins(size, max_bin);

    let (first_half, second_half) = vals.split_at_mut(size / 2);
    first_half.sort_unstable();
    second_half.sort_unstable_by_key(|&e| std::cmp::Reverse(e));

    vals
}

pub fn sparse_outliers(size: usize, outlier_count: usize, max_bin: i64) -> Vec<i64> {
    // .      .
    // :::::::::::
    // Mostly small labels, a few far out ones that blow up the bucket count.

    if size == 0 {
        return Vec::new();
    }

    // One stream for everything, separately seeded draws would repeat the same sequence.
    let mut rng = new_seed();
    let small = Uniform::new_inclusive(0, max_bin.min(15));
    let far = Uniform::new_inclusive(max_bin / 2, max_bin);

    let mut vals = (0..size)
        .map(|_| small.sample(&mut rng))
        .collect::<Vec<i64>>();

    for _ in 0..outlier_count {
        let pos = rng.gen_range(0..size);
        vals[pos] = far.sample(&mut rng);
    }

    vals
}

/// Uniform values in `[0, 1)`.
pub fn random_values(size: usize) -> Vec<f64> {
    let mut rng = new_seed();

    (0..size).map(|_| rng.gen::<f64>()).collect()
}

/// Positive values spread over twelve decades, for log binning.
pub fn random_log_values(size: usize) -> Vec<f64> {
    let mut rng = new_seed();
    let exponent = Uniform::new(-6.0f64, 6.0);

    (0..size)
        .map(|_| 10f64.powf(exponent.sample(&mut rng)))
        .collect()
}

static USE_FIXED_SEED: AtomicBool = AtomicBool::new(true);

pub fn disable_fixed_seed() {
    USE_FIXED_SEED.store(false, Ordering::Release);
}

/// The seed every pattern is derived from. Set `BINSORT_SEED` to reproduce a run.
pub fn random_init_seed() -> u64 {
    if USE_FIXED_SEED.load(Ordering::Acquire) {
        static SEED: OnceCell<u64> = OnceCell::new();
        *SEED.get_or_init(|| -> u64 {
            env::var("BINSORT_SEED")
                .ok()
                .and_then(|seed| seed.parse().ok())
                .unwrap_or_else(|| thread_rng().gen())
        })
    } else {
        thread_rng().gen()
    }
}

// --- Private ---

fn new_seed() -> StdRng {
    StdRng::seed_from_u64(random_init_seed())
}

use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::Mutex;

use binsort::{patterns, BinLabel, BinSortError, BinSorter, OrderIndex};

#[cfg(miri)]
const TEST_SIZES: [usize; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 10, 15, 20, 24, 33, 50, 100];

#[cfg(feature = "large_test_sizes")]
#[cfg(not(miri))]
const TEST_SIZES: [usize; 28] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 15, 16, 17, 20, 24, 30, 32, 33, 35, 50, 100, 200, 500, 1_000,
    10_000, 100_000, 1_000_000,
];

#[cfg(not(feature = "large_test_sizes"))]
#[cfg(not(miri))]
const TEST_SIZES: [usize; 27] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 15, 16, 17, 20, 24, 30, 32, 33, 35, 50, 100, 200, 500, 1_000,
    2_048, 10_000,
];

fn get_or_init_random_seed() -> u64 {
    static SEED_WRITTEN: Mutex<bool> = Mutex::new(false);
    let seed = patterns::random_init_seed();

    let mut seed_writer = SEED_WRITTEN.lock().unwrap();
    if !*seed_writer {
        // Always write the seed before doing anything to ensure reproducibility of failures.
        io::stdout()
            .write_all(format!("\nSeed: {seed}\n\n").as_bytes())
            .unwrap();
        io::stdout().flush().unwrap();

        *seed_writer = true;
    }

    seed
}

/// The standard library's sort is stable, so sorting indices by label gives the one correct answer.
fn reference_order<K: Ord + Copy>(bins: &[K]) -> Vec<usize> {
    let mut order = (0..bins.len()).collect::<Vec<_>>();
    order.sort_by_key(|&i| bins[i]);
    order
}

fn check_order<K: BinLabel + Ord + Debug>(bins: &[K]) {
    let _seed = get_or_init_random_seed();

    let expected = reference_order(bins);
    let got = binsort::sort(bins).unwrap();

    if got != expected {
        if bins.len() <= 100 {
            eprintln!("Bins:     {:?}", bins);
            eprintln!("Expected: {:?}", expected);
            eprintln!("Got:      {:?}", got);
        } else {
            eprintln!("Failed comparison for {} bins, re-run with the printed seed.", bins.len());
        }

        panic!("Test assertion failed!")
    }
}

fn test_impl(pattern_fn: impl Fn(usize) -> Vec<i64>) {
    for test_size in TEST_SIZES {
        check_order(&pattern_fn(test_size));
    }
}

fn log2_bins(size: usize) -> i64 {
    (size as f64).log2().round().max(0.0) as i64
}

// --- TESTS ---

#[test]
fn basic() {
    check_order::<i64>(&[]);
    check_order(&[0i64]);
    check_order(&[1i64, 0]);
    check_order(&[3i64, 3, 3]);
    check_order(&[2i64, 0, 1, 0, 2]);
    check_order(&[15i64, 1, 3, 1, 3, 1, 7]);
}

#[test]
fn known_orders() {
    let cases: [(&[i64], &[usize]); 8] = [
        (&[], &[]),
        (&[0], &[0]),
        (&[0, 0, 0, 0], &[0, 1, 2, 3]),
        (&[2, 0, 1, 0, 2], &[1, 3, 2, 0, 4]),
        (&[0, 1, 2, 3, 4], &[0, 1, 2, 3, 4]),
        (&[4, 3, 2, 1, 0], &[4, 3, 2, 1, 0]),
        (&[40, 30, 20, 10, 0], &[4, 3, 2, 1, 0]),
        (&[0, 0, 2, 2, 1, 1], &[0, 1, 4, 5, 2, 3]),
    ];

    for (bins, expected) in cases {
        assert_eq!(binsort::sort(bins).unwrap(), expected, "bins: {bins:?}");
    }
}

#[test]
fn empty_input_leaves_no_buckets() {
    let mut sorter = BinSorter::new();
    let mut order: [u32; 0] = [];

    sorter.sort_into::<i64, u32>(&[], &mut order).unwrap();

    assert_eq!(sorter.bucket_len(), 0);
    assert_eq!(sorter.bucket_range(0), None);
    assert_eq!(binsort::bucket_count::<i64>(&[]), Ok(0));
}

#[test]
fn bucket_count_is_max_plus_one() {
    assert_eq!(binsort::bucket_count(&[0i64]), Ok(1));
    assert_eq!(binsort::bucket_count(&[3u8, 9, 1]), Ok(10));
    assert_eq!(
        binsort::bucket_count(&[3i32, -2]),
        Err(BinSortError::InvalidLabel {
            index: 1,
            label: -2
        })
    );
}

#[test]
fn random_narrow() {
    test_impl(|size| patterns::random_bins(size, log2_bins(size)));
}

#[test]
fn random_binary() {
    test_impl(|size| patterns::random_bins(size, 1));
}

#[test]
fn random_wide() {
    test_impl(|size| patterns::random_bins(size, size as i64 * 4));
}

#[test]
fn all_equal() {
    test_impl(patterns::all_equal);
}

#[test]
fn ascending() {
    test_impl(patterns::ascending);
}

#[test]
fn descending() {
    test_impl(patterns::descending);
}

#[test]
fn saw_mixed() {
    test_impl(|size| patterns::saw_mixed(size, log2_bins(size) as usize, 100));
}

#[test]
fn pipe_organ() {
    test_impl(|size| patterns::pipe_organ(size, 50));
}

#[test]
fn sparse_outliers() {
    test_impl(|size| patterns::sparse_outliers(size, 3, 100_000));
}

#[test]
fn stable_within_bucket() {
    let _seed = get_or_init_random_seed();

    // Equal bins have to come out in input order.
    let bins = patterns::random_bins(5_000, 7);
    let order = binsort::sort(&bins).unwrap();

    for pair in order.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!(bins[a] <= bins[b]);
        if bins[a] == bins[b] {
            assert!(a < b, "equal bins out of input order: {a} before {b}");
        }
    }
}

#[test]
fn order_is_permutation() {
    let _seed = get_or_init_random_seed();

    for test_size in TEST_SIZES {
        let bins = patterns::random_bins(test_size, 31);
        let order = binsort::sort(&bins).unwrap();

        let mut seen = vec![false; test_size];
        for &i in &order {
            assert!(!seen[i], "index {i} written twice");
            seen[i] = true;
        }
        assert!(seen.into_iter().all(|s| s));
    }
}

#[test]
fn bucket_ranges_partition_order() {
    let _seed = get_or_init_random_seed();

    let bins = patterns::sparse_outliers(2_000, 4, 64);
    let mut sorter = BinSorter::new();
    let order = sorter.sort(&bins).unwrap();

    let bucket_len = sorter.bucket_len();
    assert_eq!(bucket_len, *bins.iter().max().unwrap() as usize + 1);
    assert_eq!(sorter.bucket_range(bucket_len), None);

    let mut next_start = 0;
    for bucket in 0..bucket_len {
        let range = sorter.bucket_range(bucket).unwrap();
        assert_eq!(range.start, next_start);
        next_start = range.end;

        for &i in &order[range] {
            assert_eq!(bins[i], bucket as i64);
        }
    }
    assert_eq!(next_start, bins.len());
}

#[test]
fn sorting_grouped_labels_again_is_identity() {
    let _seed = get_or_init_random_seed();

    let bins = patterns::random_bins(3_000, 40);
    let order = binsort::sort(&bins).unwrap();

    let grouped = order.iter().map(|&i| bins[i]).collect::<Vec<_>>();
    let regrouped = binsort::sort(&grouped).unwrap();

    assert_eq!(regrouped, (0..grouped.len()).collect::<Vec<_>>());
}

#[test]
fn label_and_order_types() {
    let _seed = get_or_init_random_seed();

    fn check<K: BinLabel + Ord + Debug, I: OrderIndex + TryInto<usize>>(bins: &[K])
    where
        <I as TryInto<usize>>::Error: Debug,
    {
        let mut order = vec![I::from_index(0); bins.len()];
        binsort::sort_into(bins, &mut order).unwrap();

        let order = order
            .into_iter()
            .map(|i| i.try_into().unwrap())
            .collect::<Vec<usize>>();
        assert_eq!(order, reference_order(bins));
    }

    let bins = patterns::random_bins(1_000, 200);

    check::<i64, i64>(&bins);
    check::<i64, u16>(&bins);
    check::<u8, u32>(&bins.iter().map(|&b| b as u8).collect::<Vec<_>>());
    check::<i32, i32>(&bins.iter().map(|&b| b as i32).collect::<Vec<_>>());
    check::<u64, usize>(&bins.iter().map(|&b| b as u64).collect::<Vec<_>>());
    check::<usize, u64>(&bins.iter().map(|&b| b as usize).collect::<Vec<_>>());
}

#[test]
fn sorter_reuse() {
    let _seed = get_or_init_random_seed();

    let mut sorter = BinSorter::new();

    let large = patterns::random_bins(10_000, 1_000);
    assert_eq!(sorter.sort(&large).unwrap(), reference_order(&large));
    assert_eq!(sorter.bucket_len(), *large.iter().max().unwrap() as usize + 1);

    let small = [1i64, 0, 1];
    assert_eq!(sorter.sort(&small).unwrap(), [1, 0, 2]);
    assert_eq!(sorter.bucket_len(), 2);
    assert_eq!(sorter.bucket_range(0), Some(0..1));
    assert_eq!(sorter.bucket_range(1), Some(1..3));
    assert_eq!(sorter.bucket_range(2), None);
}

#[test]
fn unused_buckets_have_empty_ranges() {
    let mut sorter = BinSorter::new();
    sorter.sort(&[4i64, 0, 4]).unwrap();

    assert_eq!(sorter.bucket_range(0), Some(0..1));
    for bucket in 1..4 {
        assert!(sorter.bucket_range(bucket).unwrap().is_empty());
    }
    assert_eq!(sorter.bucket_range(4), Some(1..3));
}

#[test]
fn negative_label_rejected() {
    let bins = [3i64, 0, -1, 2];
    let mut order = [99i64; 4];

    let err = binsort::sort_into(&bins, &mut order).unwrap_err();

    assert_eq!(
        err,
        BinSortError::InvalidLabel {
            index: 2,
            label: -1
        }
    );
    assert_eq!(order, [99; 4]);
}

#[test]
fn length_mismatch_rejected() {
    let mut order = [0usize; 2];

    assert_eq!(
        binsort::sort_into(&[0i64, 1, 2], &mut order),
        Err(BinSortError::LengthMismatch { bins: 3, order: 2 })
    );
}

#[test]
fn index_overflow_rejected() {
    let bins = vec![0i64; 257];
    let mut order = vec![0u8; 257];

    assert_eq!(
        binsort::sort_into(&bins, &mut order),
        Err(BinSortError::IndexOverflow { len: 257, max: 255 })
    );

    // 256 items only need indices up to 255.
    let mut order = vec![0u8; 256];
    binsort::sort_into(&bins[..256], &mut order).unwrap();
    assert_eq!(order[255], 255);
}

#[test]
fn bucket_limit() {
    let mut sorter = BinSorter::with_max_buckets(4);

    assert_eq!(sorter.sort(&[3i64, 0, 1]).unwrap(), [1, 2, 0]);
    assert_eq!(
        sorter.sort(&[3i64, 4, 1]),
        Err(BinSortError::TooManyBuckets {
            buckets: 5,
            limit: 4
        })
    );
    assert_eq!(sorter.bucket_len(), 0);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn huge_labels_fail_without_aborting() {
    assert!(matches!(
        binsort::sort(&[i64::MAX]),
        Err(BinSortError::TooManyBuckets { .. })
    ));

    // Representable, but no allocator hands out that much memory.
    let label = (binsort::MAX_BUCKETS - 1) as u64;
    assert_eq!(
        binsort::sort(&[label]),
        Err(BinSortError::Allocation {
            buckets: binsort::MAX_BUCKETS
        })
    );
}

#[test]
fn sparse_outliers_not_tied_to_position() {
    let _seed = get_or_init_random_seed();

    let bins = patterns::sparse_outliers(10_000, 50, 1_000_000);
    assert!(bins.iter().all(|&b| (0..=1_000_000).contains(&b)));

    // Outlier labels read left to right must not simply ascend.
    let outliers = bins.iter().copied().filter(|&b| b > 15).collect::<Vec<_>>();
    assert!(outliers.len() > 1);
    assert!(
        outliers.windows(2).any(|pair| pair[0] > pair[1]),
        "outliers ascend with position: {outliers:?}"
    );
}

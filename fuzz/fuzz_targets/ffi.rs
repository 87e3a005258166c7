#![no_main]

use libfuzzer_sys::fuzz_target;

use binsort::ffi::binsort_i64;
use binsort::BinSortStatus;
use binsort_fuzz::{bytes_as_labels, reference_order};

fuzz_target!(|data: &[u8]| {
    let bins = bytes_as_labels(data);
    let mut order = vec![-1i64; bins.len()];

    let status = unsafe { binsort_i64(bins.len() as i64, bins.as_ptr(), order.as_mut_ptr()) };

    if bins.iter().any(|&b| b < 0) {
        assert_eq!(status, BinSortStatus::InvalidLabel);
        assert!(order.iter().all(|&i| i == -1));
    } else {
        assert_eq!(status, BinSortStatus::Ok);
        let order = order.into_iter().map(|i| i as usize).collect::<Vec<_>>();
        assert_eq!(order, reference_order(&bins));
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;

use binsort_fuzz::{bytes_as_labels, reference_order};

fuzz_target!(|data: &[u8]| {
    let bins = bytes_as_labels(data);

    match binsort::sort(&bins) {
        Ok(order) => assert_eq!(order, reference_order(&bins)),
        Err(_) => assert!(bins.iter().any(|&b| b < 0)),
    }
});

/// Reads the input as little endian i16 labels, a trailing odd byte is ignored.
///
/// i16 keeps the bucket count small enough to never hit the allocator limits while still producing
/// negative labels.
pub fn bytes_as_labels(data: &[u8]) -> Vec<i64> {
    data.chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as i64)
        .collect()
}

pub fn reference_order(bins: &[i64]) -> Vec<usize> {
    let mut order = (0..bins.len()).collect::<Vec<_>>();
    order.sort_by_key(|&i| bins[i]);
    order
}

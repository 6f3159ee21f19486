//! Work splitting for projection runs that report progress between chunks.

/// Split `total` items into up to `num_batches` half-open ranges `[start, end)`.
/// Sizes differ by at most one; the larger batches come first.
///
/// # Example
/// ```
/// # use buzzer::parallel::batch_ranges;
/// let ranges = batch_ranges(10, 3);
/// assert_eq!(ranges, vec![(0, 4), (4, 7), (7, 10)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut start = 0;
    (0..num_batches)
        .map(|index| {
            let end = start + base + usize::from(index < remainder);
            let range = (start, end);
            start = end;
            range
        })
        .collect()
}

/// Ranges of at most `batch_size` items covering `0..total`.
pub fn fixed_size_ranges(total: usize, batch_size: usize) -> Vec<(usize, usize)> {
    if batch_size == 0 {
        return batch_ranges(total, 1);
    }
    batch_ranges(total, total.div_ceil(batch_size))
}

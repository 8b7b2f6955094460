//! Batch boundaries for the catalog load.
//!
//! The manifest is cut into fixed-size slices; each slice is fetched concurrently
//! and slices run one after another, so `batch_size` bounds in-flight requests.

/// Default number of detail requests in flight per batch.
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// Split `total` items into consecutive `[start, end)` ranges of `batch_size`.
/// Only the last range may be shorter. A `batch_size` of 0 is treated as 1.
///
/// # Example
/// ```
/// # use dexvs::catalog::batch_ranges;
/// let ranges = batch_ranges(450, 200);
/// assert_eq!(ranges, vec![(0, 200), (200, 400), (400, 450)]);
/// ```
pub fn batch_ranges(total: usize, batch_size: usize) -> Vec<(usize, usize)> {
    let batch_size = batch_size.max(1);
    (0..total)
        .step_by(batch_size)
        .map(|start| (start, (start + batch_size).min(total)))
        .collect()
}

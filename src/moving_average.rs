//! Peak selection by centered moving average.
//!
//! The window around index `i` covers `[i - left, i + right]` with
//! `left = (w - 1) / 2` and `right = w - 1 - left`, so even windows lean
//! forward. Windows are truncated at the sequence ends. Only values inside
//! `[min_valid, max_valid]` count towards a mean; a window with no valid
//! value has no mean and cannot be selected.
//!
//! One forward pass: index `i` enters the window when it becomes the
//! trailing edge and leaves when it falls behind the leading edge, so the
//! running sum and count are updated in O(1) per step.

use std::ops::Range;

/// Index in `range` with the largest windowed mean of valid values.
///
/// The earliest index wins ties. Returns `None` if `window` is zero or longer
/// than `values`, or if no index in `range` has a valid mean.
pub fn select_peak(
    values: &[f64],
    window: usize,
    range: Range<usize>,
    min_valid: f64,
    max_valid: f64,
) -> Option<usize> {
    let n = values.len();
    if window == 0 || window > n {
        return None;
    }
    let left = (window - 1) / 2;
    let right = window - 1 - left;
    let valid = |v: f64| v >= min_valid && v <= max_valid;

    let mut sum = 0.0;
    let mut count = 0usize;
    let mut best: Option<(usize, f64)> = None;

    // `lead` is the newest index in the window, `mid = lead - right` its center.
    for lead in 0..n + right {
        if lead < n && valid(values[lead]) {
            sum += values[lead];
            count += 1;
        }
        let Some(mid) = lead.checked_sub(right) else {
            continue;
        };
        // The element just before `mid - left` slides out.
        if let Some(gone) = mid.checked_sub(left + 1) {
            if valid(values[gone]) {
                sum -= values[gone];
                count -= 1;
            }
        }
        if count == 0 || !range.contains(&mid) {
            continue;
        }
        let mean = sum / count as f64;
        if best.map_or(true, |(_, m)| mean > m) {
            best = Some((mid, mean));
        }
    }

    best.map(|(i, _)| i)
}

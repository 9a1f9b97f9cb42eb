//! Cosine similarity between time slices.

use crate::series::Sample;

/// Squared norms at or below this are treated as zero vectors.
pub const EPSILON: f64 = 1e-6;

/// `dot(a, b) / (‖a‖ ‖b‖)`.
///
/// Returns `0.0` when the lengths differ or either squared norm is at most
/// [`EPSILON`].
pub fn cosine_similarity<T: Sample>(a: &[T], b: &[T]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let x = x.to_f64().unwrap_or(0.0);
        let y = y.to_f64().unwrap_or(0.0);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a <= EPSILON || norm_b <= EPSILON {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn orthogonal_and_opposite() {
        assert_eq!(cosine_similarity(&[1.0f32, 0.0], &[0.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0f64, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs_are_zero() {
        assert_eq!(cosine_similarity(&[0.0f32; 4], &[0.0; 4]), 0.0);
        assert_eq!(cosine_similarity(&[1.0f32, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[1e-4f64, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity::<f32>(&[], &[]), 0.0);
    }

    #[test]
    fn integer_slices() {
        let s = cosine_similarity(&[3i32, 4], &[4, 3]);
        assert!((s - 24.0 / 25.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn self_similarity_is_one(v in proptest::collection::vec(-100.0f64..100.0, 1..16)) {
            let norm: f64 = v.iter().map(|x| x * x).sum();
            prop_assume!(norm > EPSILON);
            prop_assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
        }
    }
}

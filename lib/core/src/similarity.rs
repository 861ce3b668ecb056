//! Cosine similarity kernels
//!
//! Slice-level operations shared by pairwise queries, ranking, and
//! per-attribute breakdowns. Norms are clamped to a small positive floor
//! before dividing, so all-zero inputs produce a finite near-zero score
//! instead of NaN.

/// Smallest norm ever used as a divisor.
pub const NORM_FLOOR: f32 = f32::EPSILON;

/// Dot product of two equal-length slices.
#[inline]
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean norm of a slice.
#[inline]
#[must_use]
pub fn norm(a: &[f32]) -> f32 {
    dot(a, a).sqrt()
}

/// Cosine similarity between two slices.
///
/// Mismatched lengths score 0.0. Each norm is clamped to [`NORM_FLOOR`],
/// so zero vectors (one or both) yield a defined result near zero.
#[must_use]
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let norm_a = norm(a).max(NORM_FLOOR);
    let norm_b = norm(b).max(NORM_FLOOR);

    dot(a, b) / (norm_a * norm_b)
}

/// Cosine similarity of one target against many candidates, in order.
#[must_use]
pub fn cosine_one_to_many<'a, I>(target: &[f32], candidates: I) -> Vec<f32>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    candidates
        .into_iter()
        .map(|candidate| cosine(target, candidate))
        .collect()
}

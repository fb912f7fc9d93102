//! Vector math for the retrieval store.
//!
//! Pure-Rust implementations of:
//! - Euclidean normalization (zero vectors are left untouched)
//! - Dot product over unit vectors
//! - Cosine similarity for vectors of arbitrary norm

/// Euclidean norm, accumulated in f64.
fn norm(v: &[f32]) -> f64 {
    v.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt()
}

/// Scale `v` to unit length in place.
///
/// A vector whose norm is 0 is left as-is, so it stays a zero vector and
/// scores 0 against everything.
pub fn normalize(v: &mut [f32]) {
    let n = norm(v);
    if n == 0.0 {
        return;
    }
    for x in v.iter_mut() {
        *x = (*x as f64 / n) as f32;
    }
}

/// Owned variant of [`normalize`].
pub fn normalized(mut v: Vec<f32>) -> Vec<f32> {
    normalize(&mut v);
    v
}

/// Dot product. For unit vectors this is the cosine similarity.
///
/// Returns 0.0 if the lengths differ or either vector is empty.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    a.iter()
        .zip(b.iter())
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum::<f64>() as f32
}

/// Compute cosine similarity between two vectors of any norm.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if either vector is zero-length or empty.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let denom = norm(a) * norm(b);
    if denom < 1e-10 {
        return 0.0;
    }

    (dot(a, b) as f64 / denom) as f32
}

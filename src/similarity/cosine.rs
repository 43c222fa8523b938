use ndarray::{Array2, Axis};

/// Pairwise cosine similarity between the rows of `vectors`.
///
/// All-zero rows are similar to nothing, themselves included. The result is
/// exactly symmetric and clipped to [-1, 1].
pub fn cosine_similarity(vectors: &Array2<f64>) -> Array2<f64> {
    let mut normalized = vectors.clone();
    for mut row in normalized.axis_iter_mut(Axis(0)) {
        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|v| v / norm);
        }
    }

    let mut similarity = normalized.dot(&normalized.t());
    let n = similarity.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            let value = similarity[[i, j]].clamp(-1.0, 1.0);
            similarity[[i, j]] = value;
            similarity[[j, i]] = value;
        }
        similarity[[i, i]] = similarity[[i, i]].clamp(-1.0, 1.0);
    }
    similarity
}

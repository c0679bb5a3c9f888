use std::collections::HashMap;

/// Cosine similarity between two sparse item-quantity vectors.
///
/// Missing entries count as zero, so the dot product only needs the keys
/// of one side. Defined as 0.0 when either vector has zero magnitude.
#[must_use]
pub fn cosine_similarity(a: &HashMap<String, u64>, b: &HashMap<String, u64>) -> f64 {
    let mut dot = 0.0f64;
    for (item, qty_a) in a {
        if let Some(qty_b) = b.get(item) {
            dot += *qty_a as f64 * *qty_b as f64;
        }
    }

    let mag_a = magnitude(a);
    let mag_b = magnitude(b);
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

fn magnitude(v: &HashMap<String, u64>) -> f64 {
    v.values()
        .map(|q| (*q as f64) * (*q as f64))
        .sum::<f64>()
        .sqrt()
}

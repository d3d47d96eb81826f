use crate::TermWeights;

/// Cosine similarity of two sparse weight maps; 0 when either has zero norm.
pub fn cosine_similarity(v1: &TermWeights, v2: &TermWeights) -> f64 {
    let norm1 = norm(v1);
    let norm2 = norm(v2);
    if norm1 == 0.0 || norm2 == 0.0 { return 0.0; }
    dot(v1, v2) / (norm1 * norm2)
}

fn dot(v1: &TermWeights, v2: &TermWeights) -> f64 {
    // only shared terms contribute, so scan the smaller map
    let (small, large) = if v1.len() <= v2.len() { (v1, v2) } else { (v2, v1) };
    small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|other| w * other))
        .sum()
}

fn norm(v: &TermWeights) -> f64 {
    v.values().map(|w| w * w).sum::<f64>().sqrt()
}

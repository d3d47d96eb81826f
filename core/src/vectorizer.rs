use crate::frequency::term_frequency;
use crate::{IdfTable, TermWeights};

/// TF-IDF weights for `tokens`. Terms missing from `idf` weigh 0.
pub fn tfidf_vector(tokens: &[String], idf: &IdfTable) -> TermWeights {
    let mut v = term_frequency(tokens);
    for (term, w) in v.iter_mut() {
        *w *= idf.get(term).copied().unwrap_or(0.0);
    }
    v
}

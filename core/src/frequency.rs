use crate::{Document, IdfTable, TermWeights};
use std::collections::{HashMap, HashSet};

/// Relative frequency of each term: count(t) / number of tokens.
pub fn term_frequency(tokens: &[String]) -> TermWeights {
    let mut tf = TermWeights::new();
    if tokens.is_empty() { return tf; }
    for token in tokens {
        *tf.entry(token.clone()).or_insert(0.0) += 1.0;
    }
    let total = tokens.len() as f64;
    for w in tf.values_mut() { *w /= total; }
    tf
}

/// idf(t) = ln(N / (1 + df(t))) for every distinct term in the corpus.
///
/// Document frequency counts presence, not multiplicity. The +1 smoothing
/// keeps the log argument positive; the result goes negative once a term
/// appears in every document and is left that way.
pub fn inverse_document_frequency(documents: &[Document]) -> IdfTable {
    let total_docs = documents.len() as f64;
    let mut df: HashMap<&str, u32> = HashMap::new();
    for doc in documents {
        let seen_in_doc: HashSet<&str> = doc.iter().map(String::as_str).collect();
        for term in seen_in_doc {
            *df.entry(term).or_insert(0) += 1;
        }
    }
    df.into_iter()
        .map(|(term, df_t)| (term.to_string(), (total_docs / (1.0 + df_t as f64)).ln()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn tf_counts_repeats() {
        let tf = term_frequency(&tokenize("a b a c"));
        assert_eq!(tf["a"], 0.5);
        assert_eq!(tf["b"], 0.25);
        assert_eq!(tf["c"], 0.25);
    }

    #[test]
    fn tf_sums_to_one() {
        let tf = term_frequency(&tokenize("how do i reset my password please reset"));
        let sum: f64 = tf.values().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tf_empty() {
        assert!(term_frequency(&[]).is_empty());
    }

    #[test]
    fn idf_uses_presence_and_smoothing() {
        let docs = vec![tokenize("a a b"), tokenize("a c"), tokenize("d")];
        let idf = inverse_document_frequency(&docs);
        assert_eq!(idf.len(), 4);
        assert!((idf["a"] - (3.0f64 / 3.0).ln()).abs() < 1e-12);
        assert!((idf["b"] - (3.0f64 / 2.0).ln()).abs() < 1e-12);
        assert!((idf["d"] - (3.0f64 / 2.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn idf_goes_negative_for_ubiquitous_terms() {
        let docs = vec![tokenize("a"), tokenize("a b")];
        let idf = inverse_document_frequency(&docs);
        assert!(idf["a"] < 0.0);
        assert_eq!(idf["b"], 0.0);
    }

    #[test]
    fn idf_empty_corpus() {
        assert!(inverse_document_frequency(&[]).is_empty());
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod frequency;
pub mod knowledge;
pub mod matcher;
pub mod similarity;
pub mod tokenizer;
pub mod vectorizer;

pub use frequency::{inverse_document_frequency, term_frequency};
pub use knowledge::{load_knowledge, KnowledgeBase};
pub use matcher::{best_match, rank, CorpusModel, MatchOutcome, ScoredEntry, Weighting};
pub use similarity::cosine_similarity;
pub use tokenizer::tokenize;
pub use vectorizer::tfidf_vector;

/// Normalized terms of one trigger phrase, in order.
pub type Document = Vec<String>;
/// Sparse term -> weight mapping produced for queries and documents.
///
/// Ordered so sums over a map run in the same order on every build, which
/// keeps scores bit-identical across rounds and exact ties exact.
pub type TermWeights = BTreeMap<String, f64>;
/// Term -> idf weight over one corpus snapshot.
pub type IdfTable = BTreeMap<String, f64>;

/// One (trigger, response) record of the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(alias = "Trigger")]
    pub trigger: String,
    #[serde(alias = "Response")]
    pub response: String,
}

impl KnowledgeEntry {
    pub fn new(trigger: impl Into<String>, response: impl Into<String>) -> Self {
        Self { trigger: trigger.into(), response: response.into() }
    }
}

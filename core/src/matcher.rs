//! Ranks a query against a corpus of triggers and picks the reply.

use crate::frequency::{inverse_document_frequency, term_frequency};
use crate::similarity::cosine_similarity;
use crate::tokenizer::tokenize;
use crate::vectorizer::tfidf_vector;
use crate::{Document, IdfTable, KnowledgeEntry, TermWeights};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const EMPTY_INPUT_REPLY: &str = "Message cannot be empty";
pub const NO_KNOWLEDGE_REPLY: &str = "No data found in knowledge base.";
pub const NO_MATCH_REPLY: &str = "Sorry, I couldn't understand that. Can you rephrase?";

/// Which vectors produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    TfIdf,
    /// Plain term frequencies, used when no document scores above zero
    /// under tf-idf (every shared term has idf 0, as in a two-entry corpus).
    TermFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchOutcome {
    EmptyInput,
    NoKnowledge,
    NoMatch,
    Matched { index: usize, score: f64, weighting: Weighting, response: String },
}

impl MatchOutcome {
    /// The text to send back: the matched response or a fixed fallback.
    pub fn reply(&self) -> &str {
        match self {
            MatchOutcome::EmptyInput => EMPTY_INPUT_REPLY,
            MatchOutcome::NoKnowledge => NO_KNOWLEDGE_REPLY,
            MatchOutcome::NoMatch => NO_MATCH_REPLY,
            MatchOutcome::Matched { response, .. } => response,
        }
    }

    pub fn is_match(&self) -> bool { matches!(self, MatchOutcome::Matched { .. }) }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEntry {
    pub index: usize,
    pub score: f64,
    pub weighting: Weighting,
    pub trigger: String,
    pub response: String,
}

/// Tokenized documents, idf table and document vectors for one corpus snapshot.
///
/// Everything here is a pure function of the entries, so a model can be
/// built once and shared across scoring rounds until the corpus changes.
#[derive(Debug, Clone, Default)]
pub struct CorpusModel {
    entries: Vec<KnowledgeEntry>,
    documents: Vec<Document>,
    idf: IdfTable,
    tfidf_vectors: Vec<TermWeights>,
    tf_vectors: Vec<TermWeights>,
}

impl CorpusModel {
    pub fn build(corpus: &[KnowledgeEntry]) -> Self {
        let documents: Vec<Document> = corpus.iter().map(|e| tokenize(&e.trigger)).collect();
        let idf = inverse_document_frequency(&documents);
        let tfidf_vectors = documents.iter().map(|d| tfidf_vector(d, &idf)).collect();
        let tf_vectors = documents.iter().map(|d| term_frequency(d)).collect();
        tracing::debug!(documents = documents.len(), vocabulary = idf.len(), "corpus model built");
        Self { entries: corpus.to_vec(), documents, idf, tfidf_vectors, tf_vectors }
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn entries(&self) -> &[KnowledgeEntry] { &self.entries }
    pub fn documents(&self) -> &[Document] { &self.documents }
    pub fn idf(&self) -> &IdfTable { &self.idf }
    pub fn vocabulary_size(&self) -> usize { self.idf.len() }

    pub fn best_match(&self, query: &str) -> MatchOutcome {
        if query.trim().is_empty() { return MatchOutcome::EmptyInput; }
        if self.is_empty() { return MatchOutcome::NoKnowledge; }

        let tokens = tokenize(query);
        let (weighting, scores) = self.select_round(&tokens);
        match pick_best(&scores) {
            Some((index, score)) => {
                tracing::debug!(index, score, ?weighting, "best match");
                MatchOutcome::Matched { index, score, weighting, response: self.entries[index].response.clone() }
            }
            None => {
                tracing::debug!(terms = tokens.len(), "no trigger scored above zero");
                MatchOutcome::NoMatch
            }
        }
    }

    /// Every entry with its score, best first. Equal scores keep corpus order.
    pub fn rank(&self, query: &str) -> Vec<ScoredEntry> {
        let tokens = tokenize(query);
        let (weighting, scores) = self.select_round(&tokens);
        let mut ranked: Vec<ScoredEntry> = scores
            .into_iter()
            .enumerate()
            .map(|(index, score)| ScoredEntry {
                index,
                score,
                weighting,
                trigger: self.entries[index].trigger.clone(),
                response: self.entries[index].response.clone(),
            })
            .collect();
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        ranked
    }

    fn select_round(&self, tokens: &[String]) -> (Weighting, Vec<f64>) {
        let weighted = self.score_all(tokens, Weighting::TfIdf);
        if pick_best(&weighted).is_some() { return (Weighting::TfIdf, weighted); }
        let plain = self.score_all(tokens, Weighting::TermFrequency);
        if pick_best(&plain).is_some() { return (Weighting::TermFrequency, plain); }
        (Weighting::TfIdf, weighted)
    }

    fn score_all(&self, tokens: &[String], weighting: Weighting) -> Vec<f64> {
        let (query_vector, doc_vectors) = match weighting {
            Weighting::TfIdf => (tfidf_vector(tokens, &self.idf), &self.tfidf_vectors),
            Weighting::TermFrequency => (term_frequency(tokens), &self.tf_vectors),
        };
        doc_vectors.iter().map(|v| cosine_similarity(&query_vector, v)).collect()
    }
}

/// First index whose score strictly exceeds everything before it and 0.
fn pick_best(scores: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    let mut best_score = 0.0;
    for (index, &score) in scores.iter().enumerate() {
        if score > best_score {
            best_score = score;
            best = Some((index, score));
        }
    }
    best
}

/// Score `query` against `corpus` in a fresh round: the corpus is tokenized
/// and weighted again on every call.
pub fn best_match(query: &str, corpus: &[KnowledgeEntry]) -> MatchOutcome {
    if query.trim().is_empty() { return MatchOutcome::EmptyInput; }
    CorpusModel::build(corpus).best_match(query)
}

pub fn rank(query: &str, corpus: &[KnowledgeEntry]) -> Vec<ScoredEntry> {
    CorpusModel::build(corpus).rank(query)
}

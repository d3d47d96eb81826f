use chatmatch_core::matcher::{EMPTY_INPUT_REPLY, NO_KNOWLEDGE_REPLY, NO_MATCH_REPLY};
use chatmatch_core::{
    best_match, cosine_similarity, inverse_document_frequency, rank, term_frequency, tfidf_vector, tokenize,
    CorpusModel, KnowledgeEntry, MatchOutcome, TermWeights,
};

fn corpus(pairs: &[(&str, &str)]) -> Vec<KnowledgeEntry> {
    pairs.iter().map(|(t, r)| KnowledgeEntry::new(*t, *r)).collect()
}

fn support_kb() -> Vec<KnowledgeEntry> {
    corpus(&[
        ("hello there", "Hi!"),
        ("goodbye", "Bye!"),
        ("what are your opening hours", "We open at 9."),
        ("how do i reset my password", "Use the reset link."),
        ("where is your store", "On Main street."),
    ])
}

#[test]
fn tf_of_document_sums_to_one() {
    let tf = term_frequency(&tokenize("the cat sat on the mat"));
    let sum: f64 = tf.values().sum();
    assert!((sum - 1.0).abs() < 1e-12);
}

#[test]
fn cosine_self_and_symmetry() {
    let docs: Vec<_> = support_kb().iter().map(|e| tokenize(&e.trigger)).collect();
    let idf = inverse_document_frequency(&docs);
    let a = tfidf_vector(&tokenize("how do i reset my password"), &idf);
    let b = tfidf_vector(&tokenize("reset password where"), &idf);
    assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-12);
    assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-12);
    assert!(cosine_similarity(&a, &b) > 0.0);
    assert_eq!(cosine_similarity(&a, &TermWeights::new()), 0.0);
}

#[test]
fn hello_matches_hi() {
    let kb = corpus(&[("hello there", "Hi!"), ("goodbye", "Bye!")]);
    assert_eq!(best_match("hello", &kb).reply(), "Hi!");
    assert_eq!(best_match("hello", &support_kb()).reply(), "Hi!");
    assert_eq!(best_match("GOODBYE", &support_kb()).reply(), "Bye!");
}

#[test]
fn empty_corpus_falls_back() {
    let outcome = best_match("hello", &[]);
    assert_eq!(outcome, MatchOutcome::NoKnowledge);
    assert_eq!(outcome.reply(), NO_KNOWLEDGE_REPLY);
}

#[test]
fn blank_query_falls_back() {
    for q in ["", "   ", "\t\n"] {
        assert_eq!(best_match(q, &support_kb()).reply(), EMPTY_INPUT_REPLY);
        assert_eq!(best_match(q, &[]).reply(), EMPTY_INPUT_REPLY);
    }
}

#[test]
fn unknown_terms_fall_back() {
    let kb = corpus(&[("hello there", "Hi!")]);
    assert_eq!(best_match("xyzabc123", &kb), MatchOutcome::NoMatch);
    assert_eq!(best_match("xyzabc123", &kb).reply(), NO_MATCH_REPLY);
    assert_eq!(best_match("xyzabc123", &support_kb()).reply(), NO_MATCH_REPLY);
}

#[test]
fn first_entry_wins_ties() {
    let kb = corpus(&[("a b", "R1"), ("a b", "R2")]);
    assert_eq!(best_match("a b", &kb).reply(), "R1");
}

#[test]
fn model_agrees_with_fresh_rounds() {
    let kb = support_kb();
    let model = CorpusModel::build(&kb);
    for q in ["hello", "reset my password please", "opening hours?", "nothing here", ""] {
        assert_eq!(model.best_match(q), best_match(q, &kb));
    }
}

#[test]
fn rank_head_is_best_match() {
    let kb = support_kb();
    let ranked = rank("where is the store", &kb);
    assert_eq!(ranked.len(), kb.len());
    assert_eq!(ranked[0].response, "On Main street.");
    assert_eq!(best_match("where is the store", &kb).reply(), ranked[0].response);
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
}

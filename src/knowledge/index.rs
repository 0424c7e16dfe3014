//! TF-IDF index over question/answer pairs.
//!
//! Word n-grams (1..=3) of tokens with at least two word characters,
//! vocabulary capped at the most frequent terms, smoothed idf, and
//! L2-normalized vectors so cosine similarity is a dot product.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::KnowledgeError;

/// Largest n-gram length.
const MAX_NGRAM: usize = 3;

/// Vocabulary cap.
pub const MAX_FEATURES: usize = 2000;

/// Minimum score for an answer.
const SCORE_THRESHOLD: f64 = 0.15;

/// Minimum score for one- or two-word queries.
const SHORT_QUERY_THRESHOLD: f64 = 0.12;

/// A clear winner may pass with a lower score.
const WINNING_GAP: f64 = 0.3;

const TOP_MATCHES: usize = 3;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

type SparseVector = HashMap<usize, f64>;

/// One entry of the knowledge file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// A candidate question and its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredQuestion {
    pub question: String,
    pub score: f64,
}

/// Outcome of a search; `answer` is `None` when no match is good enough.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub answer: Option<String>,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_question: Option<String>,
    pub top_matches: Vec<ScoredQuestion>,
}

/// Term → column mapping with per-term idf weights.
#[derive(Debug, Clone)]
pub struct TfIdfIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfIdfIndex {
    /// Learn vocabulary and idf from `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S], max_features: usize) -> Self {
        let mut corpus_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let counts = term_counts(doc.as_ref());
            for (term, count) in counts {
                *corpus_counts.entry(term.clone()).or_default() += count;
                *doc_freq.entry(term).or_default() += 1;
            }
        }

        let mut terms: Vec<(String, usize)> = corpus_counts.into_iter().collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        terms.truncate(max_features);
        terms.sort_by(|a, b| a.0.cmp(&b.0));

        let n_docs = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (column, (term, _)) in terms.into_iter().enumerate() {
            let df = doc_freq.get(&term).copied().unwrap_or(0) as f64;
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term, column);
        }

        Self { vocabulary, idf }
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// L2-normalized tf-idf vector. Unknown terms are ignored.
    fn transform(&self, text: &str) -> SparseVector {
        let mut vector: SparseVector = term_counts(text)
            .into_iter()
            .filter_map(|(term, count)| {
                self.vocabulary
                    .get(&term)
                    .map(|&column| (column, count as f64 * self.idf[column]))
            })
            .collect();

        let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in vector.values_mut() {
                *weight /= norm;
            }
        }
        vector
    }
}

/// Lower-cased word n-gram counts for one document.
fn term_counts(text: &str) -> HashMap<String, usize> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = TOKEN.find_iter(&lowered).map(|m| m.as_str()).collect();

    let mut counts = HashMap::new();
    for n in 1..=MAX_NGRAM {
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_default() += 1;
        }
    }
    counts
}

fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(column, w)| large.get(column).map(|v| w * v))
        .sum()
}

/// Question/answer pairs with precomputed question vectors.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    pairs: Vec<QaPair>,
    index: TfIdfIndex,
    question_vectors: Vec<SparseVector>,
}

impl KnowledgeBase {
    /// Load `[{question, answer}]` from a JSON file.
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Read {
            path: display.clone(),
            source,
        })?;
        let pairs: Vec<QaPair> =
            serde_json::from_str(&raw).map_err(|source| KnowledgeError::Parse {
                path: display.clone(),
                source,
            })?;
        if pairs.is_empty() {
            return Err(KnowledgeError::Empty { path: display });
        }
        Ok(Self::from_pairs(pairs))
    }

    /// Index pairs; the vocabulary is fit on questions and answers.
    pub fn from_pairs(pairs: Vec<QaPair>) -> Self {
        let corpus: Vec<&str> = pairs
            .iter()
            .map(|p| p.question.as_str())
            .chain(pairs.iter().map(|p| p.answer.as_str()))
            .collect();
        let index = TfIdfIndex::fit(&corpus, MAX_FEATURES);
        let question_vectors = pairs.iter().map(|p| index.transform(&p.question)).collect();

        Self {
            pairs,
            index,
            question_vectors,
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.index.len()
    }

    /// Best answer for `query`, if it clears the thresholds.
    pub fn search(&self, query: &str) -> SearchResult {
        let normalized = query.trim().to_lowercase();
        let query_vector = self.index.transform(&normalized);

        let mut ranked: Vec<(usize, f64)> = self
            .question_vectors
            .iter()
            .map(|qv| cosine(&query_vector, qv))
            .enumerate()
            .collect();
        // Stable: equal scores keep file order, so the first best wins.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let top_matches = ranked
            .iter()
            .take(TOP_MATCHES)
            .map(|&(i, score)| ScoredQuestion {
                question: self.pairs[i].question.clone(),
                score,
            })
            .collect();

        let Some(&(best_idx, best_score)) = ranked.first() else {
            return SearchResult {
                answer: None,
                score: 0.0,
                matched_question: None,
                top_matches,
            };
        };
        let second_score = ranked.get(1).map_or(0.0, |&(_, s)| s);

        let threshold = if normalized.split_whitespace().count() <= 2 {
            SHORT_QUERY_THRESHOLD
        } else {
            SCORE_THRESHOLD
        };
        let clear_winner =
            best_score - second_score > WINNING_GAP && best_score > SHORT_QUERY_THRESHOLD;

        if best_score > threshold || clear_winner {
            let pair = &self.pairs[best_idx];
            SearchResult {
                answer: Some(pair.answer.clone()),
                score: best_score,
                matched_question: Some(pair.question.clone()),
                top_matches,
            }
        } else {
            SearchResult {
                answer: None,
                score: best_score,
                matched_question: None,
                top_matches,
            }
        }
    }
}

//! Vectorizer — TF-IDF over a vocabulary shared by every document in one run.
//!
//! Weighting:
//! - `tf  = 1 + ln(count)` (sublinear)
//! - `idf = ln((1 + n) / (1 + df)) + 1` (smoothed)
//! - each document vector is L2-normalized
//!
//! The vocabulary keeps the `max_features` terms with the highest summed TF-IDF
//! weight across the corpus (ties broken alphabetically).

use std::collections::HashMap;

/// Default vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

// ────────────────────────────────────────────────────────────────────────────
// Sparse vectors
// ────────────────────────────────────────────────────────────────────────────

/// Sparse TF-IDF vector: `(term index, weight)` pairs sorted by index.
/// Indices point into the `Vocabulary` of the run that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    entries: Vec<(usize, f64)>,
}

impl TermVector {
    pub(crate) fn from_unsorted(mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(_, w)| w != 0.0);
        entries.sort_by_key(|&(idx, _)| idx);
        Self { entries }
    }

    /// A vector with no non-zero dimension.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-zero dimensions.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product over the shared vocabulary (merge of two sorted index lists).
    pub fn dot(&self, other: &TermVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    fn normalize_l2(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Vocabulary + matrix
// ────────────────────────────────────────────────────────────────────────────

/// Terms retained for one run, in alphabetical order, with their IDF weights.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    idf: Vec<f64>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    fn new(mut terms_with_idf: Vec<(String, f64)>) -> Self {
        terms_with_idf.sort_by(|a, b| a.0.cmp(&b.0));
        let index = terms_with_idf
            .iter()
            .enumerate()
            .map(|(i, (term, _))| (term.clone(), i))
            .collect();
        let (terms, idf) = terms_with_idf.into_iter().unzip();
        Self { terms, idf, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// The `n` highest-weighted terms of `vector`, heaviest first.
    pub fn top_terms(&self, vector: &TermVector, n: usize) -> Vec<&str> {
        let mut weighted: Vec<(usize, f64)> = vector.iter().collect();
        weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        weighted
            .into_iter()
            .take(n)
            .filter_map(|(idx, _)| self.term(idx))
            .collect()
    }
}

/// Output of `fit_transform`: the shared vocabulary and one vector per input document,
/// in input order.
#[derive(Debug, Clone, Default)]
pub struct TfidfMatrix {
    pub vocabulary: Vocabulary,
    pub vectors: Vec<TermVector>,
}

// ────────────────────────────────────────────────────────────────────────────
// Vectorizer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TfidfVectorizer {
    pub max_features: usize,
    /// Inclusive `(min, max)` n-gram lengths.
    pub ngram_range: (usize, usize),
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            ngram_range: (1, 2),
        }
    }
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            ..Self::default()
        }
    }

    /// Learns the vocabulary from `documents` (token sequences) and encodes each one.
    pub fn fit_transform<T: AsRef<[String]>>(&self, documents: &[T]) -> TfidfMatrix {
        let n_docs = documents.len();
        if n_docs == 0 {
            return TfidfMatrix::default();
        }

        let counts: Vec<HashMap<String, u32>> = documents
            .iter()
            .map(|tokens| self.count_ngrams(tokens.as_ref()))
            .collect();

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n = n_docs as f64;
        let idf: HashMap<&str, f64> = doc_freq
            .iter()
            .map(|(&term, &df)| (term, ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
            .collect();

        let mut corpus_weight: HashMap<&str, f64> = HashMap::new();
        for doc in &counts {
            for (term, &count) in doc {
                let w = sublinear_tf(count) * idf[term.as_str()];
                *corpus_weight.entry(term.as_str()).or_insert(0.0) += w;
            }
        }

        let mut ranked: Vec<(&str, f64)> = corpus_weight.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked.truncate(self.max_features);

        let vocabulary = Vocabulary::new(
            ranked
                .into_iter()
                .map(|(term, _)| (term.to_string(), idf[term]))
                .collect(),
        );

        let vectors = counts
            .iter()
            .map(|doc| {
                let entries = doc
                    .iter()
                    .filter_map(|(term, &count)| {
                        let idx = vocabulary.index_of(term)?;
                        Some((idx, sublinear_tf(count) * vocabulary.idf[idx]))
                    })
                    .collect();
                let mut vector = TermVector::from_unsorted(entries);
                vector.normalize_l2();
                vector
            })
            .collect();

        tracing::debug!(
            documents = n_docs,
            vocabulary = vocabulary.len(),
            "TF-IDF matrix built"
        );

        TfidfMatrix {
            vocabulary,
            vectors,
        }
    }

    /// Counts every n-gram within `ngram_range`; n-grams join tokens with a single space.
    fn count_ngrams(&self, tokens: &[String]) -> HashMap<String, u32> {
        let (min_n, max_n) = self.ngram_range;
        let mut counts = HashMap::new();
        for n in min_n.max(1)..=max_n {
            if tokens.len() < n {
                break;
            }
            for window in tokens.windows(n) {
                *counts.entry(window.join(" ")).or_insert(0) += 1;
            }
        }
        counts
    }
}

fn sublinear_tf(count: u32) -> f64 {
    1.0 + (count as f64).ln()
}

/// The job description's vector and one vector per resume, all over one vocabulary.
#[derive(Debug, Clone)]
pub struct ScreeningVectors {
    pub job: TermVector,
    pub resumes: Vec<TermVector>,
    pub vocabulary: Vocabulary,
}

/// Vectorizes a job description together with its resumes. The JD is document 0 of
/// the corpus; the resumes follow in input order.
pub fn vectorize_screening(
    vectorizer: &TfidfVectorizer,
    job_tokens: &[String],
    resume_tokens: &[Vec<String>],
) -> ScreeningVectors {
    let mut corpus: Vec<&[String]> = Vec::with_capacity(resume_tokens.len() + 1);
    corpus.push(job_tokens);
    corpus.extend(resume_tokens.iter().map(Vec::as_slice));

    let TfidfMatrix {
        vocabulary,
        vectors,
    } = vectorizer.fit_transform(&corpus);
    let mut vectors = vectors.into_iter();
    let job = vectors.next().unwrap_or_default();

    ScreeningVectors {
        job,
        resumes: vectors.collect(),
        vocabulary,
    }
}

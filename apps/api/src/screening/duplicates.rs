//! Duplicate detection — flags resume pairs that are near-identical to each other.
//!
//! Resumes are vectorized on their own (no JD in the corpus), then every unordered
//! pair is compared. Catches the same resume uploaded twice under different names.

use serde::{Deserialize, Serialize};

use crate::screening::normalizer::CleanedDocument;
use crate::screening::scorer::{cosine_similarity, round_score};
use crate::screening::vectorizer::TfidfVectorizer;

pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.90;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub candidate_a: String,
    pub candidate_b: String,
    pub similarity: f64,
}

/// Returns every pair `(i, j)`, `i < j`, whose rounded similarity is `>= threshold`.
pub fn detect_duplicates(
    resumes: &[CleanedDocument],
    threshold: f64,
    vectorizer: &TfidfVectorizer,
) -> Vec<DuplicatePair> {
    if resumes.len() < 2 {
        return Vec::new();
    }

    let tokens: Vec<&[String]> = resumes.iter().map(|r| r.tokens.as_slice()).collect();
    let matrix = vectorizer.fit_transform(&tokens);

    let mut duplicates = Vec::new();
    for i in 0..resumes.len() {
        for j in (i + 1)..resumes.len() {
            let similarity = round_score(cosine_similarity(&matrix.vectors[i], &matrix.vectors[j]));
            if similarity >= threshold {
                duplicates.push(DuplicatePair {
                    candidate_a: resumes[i].name.clone(),
                    candidate_b: resumes[j].name.clone(),
                    similarity,
                });
            }
        }
    }

    if !duplicates.is_empty() {
        tracing::info!(pairs = duplicates.len(), threshold, "Possible duplicate resumes detected");
    }

    duplicates
}

//! Scorer — cosine similarity between the JD vector and each resume vector.

use crate::screening::vectorizer::TermVector;

/// Decimal places similarity scores are reported with.
pub const SCORE_PRECISION: i32 = 4;

/// Cosine similarity in `[0, 1]`. Defined as 0.0 when either vector is all-zero.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

/// Scores every resume vector against the JD vector, preserving input order.
pub fn score_all(job: &TermVector, resumes: &[TermVector]) -> Vec<f64> {
    resumes
        .iter()
        .map(|resume| cosine_similarity(job, resume))
        .collect()
}

/// Rounds a score to `SCORE_PRECISION` decimal places.
pub fn round_score(score: f64) -> f64 {
    let factor = 10_f64.powi(SCORE_PRECISION);
    (score * factor).round() / factor
}

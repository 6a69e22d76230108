//! Screening pipeline — JD + resumes in, ranked `ScreeningReport` out.
//!
//! normalize → vectorize (shared vocabulary) → cosine score → rank → enrich each
//! candidate with skills and quality → duplicates → summary.
//! Synchronous and self-contained: nothing outlives the call.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::document::Document;
use crate::resumes::quality::{analyze_quality, QualityLabel, QualityReport};
use crate::resumes::skills::{extract_skills, skills_by_category, CategorySkills};
use crate::screening::duplicates::{detect_duplicates, DuplicatePair, DEFAULT_DUPLICATE_THRESHOLD};
use crate::screening::normalizer::{clean_document, normalize};
use crate::screening::ranker::{rank, MatchLabel, MODERATE_THRESHOLD};
use crate::screening::scorer::{round_score, score_all};
use crate::screening::vectorizer::{vectorize_screening, TfidfVectorizer, DEFAULT_MAX_FEATURES};

pub const DEFAULT_TOP_N: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Options + output models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreeningOptions {
    pub max_features: usize,
    pub top_n: usize,
    pub duplicate_threshold: f64,
}

impl Default for ScreeningOptions {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            top_n: DEFAULT_TOP_N,
            duplicate_threshold: DEFAULT_DUPLICATE_THRESHOLD,
        }
    }
}

/// One candidate's row in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResult {
    pub rank: usize,
    pub name: String,
    pub similarity_score: f64, // 0.0 – 1.0, 4 decimals
    pub match_label: MatchLabel,
    pub skills: Vec<String>,
    pub skill_count: usize,
    pub skills_by_category: Vec<CategorySkills>,
    pub quality_score: f64, // 0.0 – 10.0
    pub quality_label: QualityLabel,
    pub quality: QualityReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningSummary {
    pub candidate_count: usize,
    pub top_score: f64,
    pub average_score: f64,
    /// Candidates at or above the Moderate band.
    pub good_matches: usize,
    pub average_quality: f64,
}

/// How many candidates list a given skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillFrequency {
    pub skill: String,
    pub candidates: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub screening_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub vocabulary_size: usize,
    pub candidates: Vec<CandidateResult>,
    pub recommendations: Vec<CandidateResult>,
    pub duplicates: Vec<DuplicatePair>,
    pub summary: ScreeningSummary,
    pub skill_distribution: Vec<SkillFrequency>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs a full screening. Never fails: degenerate documents simply score 0.0.
pub fn screen(job_description: &str, resumes: &[Document], options: &ScreeningOptions) -> ScreeningReport {
    let vectorizer = TfidfVectorizer::new(options.max_features);

    let job_tokens = normalize(job_description);
    let cleaned: Vec<_> = resumes.iter().map(clean_document).collect();
    let resume_tokens: Vec<Vec<String>> = cleaned.iter().map(|c| c.tokens.clone()).collect();

    let empty = cleaned.iter().filter(|c| c.is_empty()).count();
    if empty > 0 {
        warn!(empty, "Resumes with no usable terms will score 0.0");
    }

    let vectors = vectorize_screening(&vectorizer, &job_tokens, &resume_tokens);
    if vectors.vocabulary.is_empty() {
        debug!("No terms survived normalization; every score is 0.0");
    }
    debug!(
        jd_tokens = job_tokens.len(),
        jd_terms = vectors.job.nnz(),
        vocabulary = vectors.vocabulary.len(),
        top_terms = ?vectors.vocabulary.top_terms(&vectors.job, 5),
        "Job description vectorized"
    );

    let scores = score_all(&vectors.job, &vectors.resumes);
    let ranked = rank(
        resumes
            .iter()
            .zip(scores)
            .map(|(doc, score)| (doc.name.clone(), round_score(score))),
    );

    let candidates: Vec<CandidateResult> = ranked
        .into_iter()
        .map(|entry| {
            let raw_text = &resumes[entry.input_index].text;
            let skills = extract_skills(raw_text);
            let quality = analyze_quality(raw_text);
            CandidateResult {
                rank: entry.rank,
                name: entry.name,
                similarity_score: entry.score,
                match_label: entry.label,
                skill_count: skills.len(),
                skills_by_category: skills_by_category(&skills),
                skills,
                quality_score: quality.score,
                quality_label: quality.label,
                quality,
            }
        })
        .collect();

    let duplicates = detect_duplicates(&cleaned, options.duplicate_threshold, &vectorizer);
    let recommendations = top_recommendations(&candidates, options.top_n);
    let summary = summarize(&candidates);
    let skill_distribution = skill_distribution(&candidates);

    if let Some(top) = candidates.first() {
        info!(
            candidates = candidates.len(),
            top_candidate = %top.name,
            top_score = top.similarity_score,
            top_label = %top.match_label,
            "Screening complete"
        );
    }

    ScreeningReport {
        screening_id: Uuid::new_v4(),
        created_at: Utc::now(),
        vocabulary_size: vectors.vocabulary.len(),
        candidates,
        recommendations,
        duplicates,
        summary,
        skill_distribution,
    }
}

/// First `top_n` of an already-ranked list.
pub fn top_recommendations(candidates: &[CandidateResult], top_n: usize) -> Vec<CandidateResult> {
    candidates.iter().take(top_n).cloned().collect()
}

fn summarize(candidates: &[CandidateResult]) -> ScreeningSummary {
    let count = candidates.len();
    if count == 0 {
        return ScreeningSummary {
            candidate_count: 0,
            top_score: 0.0,
            average_score: 0.0,
            good_matches: 0,
            average_quality: 0.0,
        };
    }

    let top_score = candidates
        .iter()
        .map(|c| c.similarity_score)
        .fold(0.0_f64, f64::max);
    let average_score =
        round_score(candidates.iter().map(|c| c.similarity_score).sum::<f64>() / count as f64);
    let good_matches = candidates
        .iter()
        .filter(|c| c.similarity_score >= MODERATE_THRESHOLD)
        .count();
    let average_quality =
        (candidates.iter().map(|c| c.quality_score).sum::<f64>() / count as f64 * 10.0).round()
            / 10.0;

    ScreeningSummary {
        candidate_count: count,
        top_score,
        average_score,
        good_matches,
        average_quality,
    }
}

/// Skills across all candidates, most common first (ties alphabetical).
fn skill_distribution(candidates: &[CandidateResult]) -> Vec<SkillFrequency> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for candidate in candidates {
        for skill in &candidate.skills {
            *counts.entry(skill.as_str()).or_insert(0) += 1;
        }
    }

    let mut distribution: Vec<SkillFrequency> = counts
        .into_iter()
        .map(|(skill, candidates)| SkillFrequency {
            skill: skill.to_string(),
            candidates,
        })
        .collect();
    // stable sort over alphabetical input keeps ties alphabetical
    distribution.sort_by(|a, b| b.candidates.cmp(&a.candidates));
    distribution
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resumes() -> Vec<Document> {
        vec![
            Document::new("chef", "Chef culinary arts baking. Education: culinary college."),
            Document::new(
                "ds",
                "Data scientist with Python and machine learning. Skills: Python, SQL. Experience: 4 years.",
            ),
            Document::new("ml", "Data scientist Python ML"),
        ]
    }

    const JD: &str = "Data scientist, Python, machine learning";

    #[test]
    fn test_candidates_ranked_descending() {
        let report = screen(JD, &resumes(), &ScreeningOptions::default());
        assert_eq!(report.candidates.len(), 3);
        let scores: Vec<f64> = report.candidates.iter().map(|c| c.similarity_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "Scores were {scores:?}");
        assert_eq!(report.candidates.last().unwrap().name, "chef");
        assert_eq!(report.candidates.last().unwrap().similarity_score, 0.0);
        assert_eq!(report.candidates.last().unwrap().match_label, MatchLabel::Weak);
        assert_eq!(
            report.candidates.iter().map(|c| c.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_identical_resume_is_strong_match() {
        let docs = vec![Document::new("twin", JD), Document::new("other", "pastry chef")];
        let report = screen(JD, &docs, &ScreeningOptions::default());
        assert_eq!(report.candidates[0].name, "twin");
        assert_eq!(report.candidates[0].similarity_score, 1.0);
        assert_eq!(report.candidates[0].match_label, MatchLabel::Strong);
    }

    #[test]
    fn test_candidates_carry_skills_and_quality() {
        let report = screen(JD, &resumes(), &ScreeningOptions::default());
        let ds = report.candidates.iter().find(|c| c.name == "ds").unwrap();
        assert!(ds.skills.contains(&"Python".to_string()));
        assert!(ds.skills.contains(&"Machine Learning".to_string()));
        assert_eq!(ds.skill_count, ds.skills.len());
        assert!(ds.quality_score > 0.0);
        assert_eq!(ds.quality_score, ds.quality.score);
    }

    #[test]
    fn test_recommendations_limited_to_top_n() {
        let options = ScreeningOptions {
            top_n: 2,
            ..ScreeningOptions::default()
        };
        let report = screen(JD, &resumes(), &options);
        assert_eq!(report.recommendations.len(), 2);
        assert_eq!(report.recommendations[0].name, report.candidates[0].name);

        let options = ScreeningOptions {
            top_n: 10,
            ..ScreeningOptions::default()
        };
        assert_eq!(screen(JD, &resumes(), &options).recommendations.len(), 3);
    }

    #[test]
    fn test_empty_job_description_scores_everything_zero() {
        let report = screen("   ", &resumes(), &ScreeningOptions::default());
        assert!(report.candidates.iter().all(|c| c.similarity_score == 0.0));
        // stable: input order preserved on full tie
        let names: Vec<&str> = report.candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["chef", "ds", "ml"]);
    }

    #[test]
    fn test_duplicates_reported() {
        let mut docs = resumes();
        docs.push(Document::new("ml_copy", "Data scientist Python ML"));
        let report = screen(JD, &docs, &ScreeningOptions::default());
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.duplicates[0].candidate_a, "ml");
        assert_eq!(report.duplicates[0].candidate_b, "ml_copy");
    }

    #[test]
    fn test_summary_statistics() {
        let report = screen(JD, &resumes(), &ScreeningOptions::default());
        let summary = &report.summary;
        assert_eq!(summary.candidate_count, 3);
        assert_eq!(summary.top_score, report.candidates[0].similarity_score);
        assert!(summary.average_score <= summary.top_score);
        let expected_good = report
            .candidates
            .iter()
            .filter(|c| c.similarity_score >= 0.30)
            .count();
        assert_eq!(summary.good_matches, expected_good);
    }

    #[test]
    fn test_no_resumes_yields_empty_report() {
        let report = screen(JD, &[], &ScreeningOptions::default());
        assert!(report.candidates.is_empty());
        assert!(report.recommendations.is_empty());
        assert!(report.duplicates.is_empty());
        assert_eq!(report.summary.candidate_count, 0);
        assert_eq!(report.summary.top_score, 0.0);
    }

    #[test]
    fn test_skill_distribution_counts_candidates() {
        let report = screen(JD, &resumes(), &ScreeningOptions::default());
        let python = report
            .skill_distribution
            .iter()
            .find(|s| s.skill == "Python")
            .unwrap();
        assert_eq!(python.candidates, 2);
        assert_eq!(report.skill_distribution[0].skill, "Python");
    }
}

//! Resume quality checks: looks for the sections a complete resume carries.
//!
//! Each section contributes its weight when any of its patterns matches; the total is
//! normalized to a score out of 10.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

struct SectionCheck {
    section: &'static str,
    weight: f64,
    patterns: Vec<Regex>,
}

fn section(section: &'static str, weight: f64, patterns: &[&str]) -> SectionCheck {
    SectionCheck {
        section,
        weight,
        patterns: patterns
            .iter()
            .map(|p| Regex::new(p).expect("quality pattern is valid"))
            .collect(),
    }
}

static QUALITY_CHECKS: LazyLock<Vec<SectionCheck>> = LazyLock::new(|| {
    vec![
        section(
            "Contact Information",
            2.0,
            &[r"[\w.-]+@[\w.-]+\.\w+", r"\+?\d[\d\s\-().]{7,}\d"],
        ),
        section(
            "Skills Section",
            2.0,
            &[
                r"\bskills?\b",
                r"\btechnical skills\b",
                r"\bcore competencies\b",
                r"\bproficiencies\b",
            ],
        ),
        section(
            "Education",
            2.0,
            &[
                r"\beducation\b",
                r"\bdegree\b",
                r"\bbachelor\b",
                r"\bmaster\b",
                r"\bphd\b",
                r"\buniversity\b",
                r"\bcollege\b",
            ],
        ),
        section(
            "Work Experience",
            2.0,
            &[
                r"\bexperience\b",
                r"\bwork history\b",
                r"\bemployment\b",
                r"\bjob\b",
                r"\bintern\b",
                r"\bposition\b",
            ],
        ),
        section(
            "Summary / Objective",
            1.0,
            &[r"\bsummary\b", r"\bobjective\b", r"\bprofile\b", r"\babout me\b"],
        ),
        section(
            "Projects / Certifications",
            1.0,
            &[r"\bproject\b", r"\bcertif", r"\bachievement\b", r"\baward\b"],
        ),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLabel {
    Excellent,
    Good,
    Average,
    NeedsWork,
}

impl QualityLabel {
    /// ≥ 8 Excellent, ≥ 6 Good, ≥ 4 Average, otherwise NeedsWork.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 8.0 => QualityLabel::Excellent,
            s if s >= 6.0 => QualityLabel::Good,
            s if s >= 4.0 => QualityLabel::Average,
            _ => QualityLabel::NeedsWork,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResult {
    pub section: String,
    pub found: bool,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// 0.0 – 10.0, one decimal place
    pub score: f64,
    pub label: QualityLabel,
    pub breakdown: Vec<SectionResult>,
    pub feedback: Vec<String>,
}

/// Evaluates resume completeness from raw (un-normalized) text so section headers survive.
pub fn analyze_quality(text: &str) -> QualityReport {
    if text.is_empty() {
        return QualityReport {
            score: 0.0,
            label: QualityLabel::NeedsWork,
            breakdown: vec![],
            feedback: vec!["No text found in resume.".to_string()],
        };
    }

    let text_lower = text.to_lowercase();
    let total_weight: f64 = QUALITY_CHECKS.iter().map(|c| c.weight).sum();
    let mut earned = 0.0;
    let mut breakdown = Vec::with_capacity(QUALITY_CHECKS.len());
    let mut feedback = Vec::new();

    for check in QUALITY_CHECKS.iter() {
        let found = check.patterns.iter().any(|p| p.is_match(&text_lower));
        if found {
            earned += check.weight;
        } else {
            feedback.push(format!(
                "Add a '{}' section to improve your resume score.",
                check.section
            ));
        }
        breakdown.push(SectionResult {
            section: check.section.to_string(),
            found,
            weight: check.weight,
        });
    }

    let score = ((earned / total_weight) * 100.0).round() / 10.0;

    QualityReport {
        score,
        label: QualityLabel::from_score(score),
        breakdown,
        feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETE_RESUME: &str = r#"
        Jane Doe — jane.doe@example.com — +1 (555) 123-4567
        Summary: Backend engineer focused on distributed systems.
        Technical Skills: Rust, Go, PostgreSQL
        Experience: Senior Engineer at Acme (2019–2024)
        Education: B.Sc. Computer Science, State University
        Projects: open-source WAL library; AWS certification
    "#;

    #[test]
    fn test_complete_resume_scores_ten() {
        let report = analyze_quality(COMPLETE_RESUME);
        assert_eq!(report.score, 10.0);
        assert_eq!(report.label, QualityLabel::Excellent);
        assert!(report.feedback.is_empty());
        assert_eq!(report.breakdown.len(), 6);
        assert!(report.breakdown.iter().all(|s| s.found));
    }

    #[test]
    fn test_missing_sections_produce_feedback() {
        // only Work Experience (2) and Skills Section (2) → 4/10
        let report = analyze_quality("Experience with many skills");
        assert_eq!(report.score, 4.0);
        assert_eq!(report.label, QualityLabel::Average);
        assert_eq!(report.feedback.len(), 4);
        assert!(report
            .feedback
            .iter()
            .any(|f| f.contains("Contact Information")));
    }

    #[test]
    fn test_score_rounded_to_one_decimal() {
        // Summary only → 1/10 = 1.0
        let report = analyze_quality("Profile");
        assert_eq!(report.score, 1.0);
        assert_eq!(report.label, QualityLabel::NeedsWork);
    }

    #[test]
    fn test_empty_text() {
        let report = analyze_quality("");
        assert_eq!(report.score, 0.0);
        assert!(report.breakdown.is_empty());
        assert_eq!(report.feedback, vec!["No text found in resume."]);
    }

    #[test]
    fn test_whitespace_only_text_runs_every_check() {
        let report = analyze_quality(" \n\t ");
        assert_eq!(report.score, 0.0);
        assert_eq!(report.label, QualityLabel::NeedsWork);
        assert_eq!(report.breakdown.len(), 6);
        assert!(report.breakdown.iter().all(|s| !s.found));
        assert_eq!(report.feedback.len(), 6);
    }

    #[test]
    fn test_phone_number_counts_as_contact() {
        let report = analyze_quality("call 555-123-4567");
        let contact = report
            .breakdown
            .iter()
            .find(|s| s.section == "Contact Information")
            .unwrap();
        assert!(contact.found);
    }

    #[test]
    fn test_quality_label_bands() {
        assert_eq!(QualityLabel::from_score(8.0), QualityLabel::Excellent);
        assert_eq!(QualityLabel::from_score(7.9), QualityLabel::Good);
        assert_eq!(QualityLabel::from_score(6.0), QualityLabel::Good);
        assert_eq!(QualityLabel::from_score(4.0), QualityLabel::Average);
        assert_eq!(QualityLabel::from_score(3.9), QualityLabel::NeedsWork);
    }
}

//! Ranker — orders candidates by similarity and labels each with a match band.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lower bound of the Strong band.
pub const STRONG_THRESHOLD: f64 = 0.60;
/// Lower bound of the Moderate band.
pub const MODERATE_THRESHOLD: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchLabel {
    Strong,
    Moderate,
    Weak,
}

impl MatchLabel {
    /// `[0.60, 1.00]` → Strong, `[0.30, 0.60)` → Moderate, below → Weak.
    pub fn from_score(score: f64) -> Self {
        if score >= STRONG_THRESHOLD {
            MatchLabel::Strong
        } else if score >= MODERATE_THRESHOLD {
            MatchLabel::Moderate
        } else {
            MatchLabel::Weak
        }
    }
}

impl fmt::Display for MatchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchLabel::Strong => "Strong",
            MatchLabel::Moderate => "Moderate",
            MatchLabel::Weak => "Weak",
        };
        f.write_str(label)
    }
}

/// One ranked entry. `input_index` points back at the candidate's position in the
/// list handed to `rank`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedScore {
    pub rank: usize,
    pub name: String,
    pub score: f64,
    pub label: MatchLabel,
    pub input_index: usize,
}

/// Sorts `(identifier, score)` pairs by score descending. Equal scores keep their
/// input order. Ranks are 1-based.
pub fn rank<I, S>(scores: I) -> Vec<RankedScore>
where
    I: IntoIterator<Item = (S, f64)>,
    S: Into<String>,
{
    let mut entries: Vec<(usize, String, f64)> = scores
        .into_iter()
        .enumerate()
        .map(|(idx, (name, score))| (idx, name.into(), score))
        .collect();

    // sort_by is stable
    entries.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    entries
        .into_iter()
        .enumerate()
        .map(|(position, (input_index, name, score))| RankedScore {
            rank: position + 1,
            name,
            score,
            label: MatchLabel::from_score(score),
            input_index,
        })
        .collect()
}

//! Dictionary-based skill extraction from raw resume text.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Skill dictionary, grouped by category. Order here is the order categories are reported in.
pub const SKILL_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Programming Languages",
        &[
            "python", "java", "javascript", "typescript", "c++", "c#", "r", "go", "rust",
            "scala", "kotlin", "swift", "php", "ruby", "matlab",
        ],
    ),
    (
        "Web Development",
        &[
            "html", "css", "react", "angular", "vue", "node", "django", "flask", "fastapi",
            "bootstrap", "tailwind", "jquery", "rest api", "graphql",
        ],
    ),
    (
        "Data Science & ML",
        &[
            "machine learning", "deep learning", "nlp", "natural language processing",
            "tensorflow", "keras", "pytorch", "scikit-learn", "sklearn", "xgboost", "pandas",
            "numpy", "scipy", "data science", "computer vision", "bert", "transformer",
            "neural network", "reinforcement learning",
        ],
    ),
    (
        "Databases",
        &[
            "sql", "mysql", "postgresql", "mongodb", "redis", "sqlite", "oracle", "cassandra",
            "elasticsearch", "nosql", "firebase",
        ],
    ),
    (
        "Cloud & DevOps",
        &[
            "aws", "azure", "gcp", "docker", "kubernetes", "ci/cd", "jenkins", "terraform",
            "ansible", "linux", "git", "github", "gitlab", "devops",
        ],
    ),
    (
        "Data Analytics & BI",
        &[
            "tableau", "power bi", "excel", "looker", "data visualization", "matplotlib",
            "seaborn", "plotly", "statistics", "data analysis",
        ],
    ),
    (
        "Soft Skills",
        &[
            "communication", "leadership", "teamwork", "problem solving", "critical thinking",
            "project management", "agile", "scrum", "time management", "collaboration",
        ],
    ),
];

/// Skills found for one category, in dictionary order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySkills {
    pub category: String,
    pub skills: Vec<String>,
}

/// Returns the unique, alphabetically sorted, title-cased skills mentioned in `text`.
pub fn extract_skills(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let text_lower = text.to_lowercase();
    let found: BTreeSet<String> = SKILL_CATEGORIES
        .iter()
        .flat_map(|(_, skills)| skills.iter())
        .filter(|skill| contains_delimited(&text_lower, skill))
        .map(|skill| title_case(skill))
        .collect();

    found.into_iter().collect()
}

/// Groups already-extracted (title-cased) skills by dictionary category.
/// Categories with no hits are omitted.
pub fn skills_by_category(found_skills: &[String]) -> Vec<CategorySkills> {
    SKILL_CATEGORIES
        .iter()
        .filter_map(|(category, skills)| {
            let matched: Vec<String> = skills
                .iter()
                .map(|s| title_case(s))
                .filter(|s| found_skills.contains(s))
                .collect();
            (!matched.is_empty()).then(|| CategorySkills {
                category: category.to_string(),
                skills: matched,
            })
        })
        .collect()
}

/// True if `needle` occurs in `haystack` with no word character on either side.
/// Handles skills ending in symbols (`c++`, `c#`) that a plain `\b` would miss.
fn contains_delimited(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, matched)| {
        let end = start + matched.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_word_char(c));
        before_ok && after_ok
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Uppercases the first letter of every alphabetic run: `ci/cd` → `Ci/Cd`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

//! Per-resume analysis outside the similarity core: file intake, skills, quality.

pub mod intake;
pub mod quality;
pub mod skills;

//! The AI-grading pipeline: domain types, prompt construction, response
//! decoding, and the deterministic fallback.
//!
//! The pipeline is a single request-response cycle: build a structured
//! grading prompt from an assignment, rubric, and submission; send it to the
//! model; decode the returned JSON against the rubric with clamping and
//! defaults; and substitute a static fallback result when the call fails or
//! the output does not parse. Callers always receive a well-formed result,
//! tagged with its provenance so they can tell a model grade from the
//! fallback.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod decode;
pub mod fallback;
pub mod prompt;
pub mod service;

pub use service::GradingService;

/// One named, weighted, point-capped axis of evaluation within a rubric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Criterion {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub max_points: u32,
    pub weight: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingRequest {
    pub assignment_title: String,
    pub assignment_description: String,
    pub submission_content: String,
    pub criteria: Vec<Criterion>,
    pub max_points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingResult {
    pub overall_score: f64,
    pub overall_grade: String,
    pub criteria_scores: HashMap<String, f64>,
    pub criteria_feedback: HashMap<String, String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub detailed_feedback: String,
    pub confidence: f64,
    pub processing_time_ms: u64,
}

/// Why the fallback result was substituted for a model grade.
///
/// `Upstream` covers transport, auth, and rate-limit failures of the call
/// itself; `Malformed` covers a successful call whose text did not decode as
/// the expected JSON shape. Neither kind is retried, but the tag lets a
/// caller that wants to retry distinguish the transient case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FallbackReason {
    Upstream(String),
    Malformed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "source", content = "reason", rename_all = "snake_case")]
pub enum Provenance {
    Model,
    Fallback(FallbackReason),
}

/// A grading result tagged with where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedSubmission {
    pub result: GradingResult,
    pub provenance: Provenance,
}

impl GradedSubmission {
    pub fn is_fallback(&self) -> bool {
        matches!(self.provenance, Provenance::Fallback(_))
    }

    /// Collapses the provenance tag for callers that only want the result.
    pub fn into_result(self) -> GradingResult {
        self.result
    }
}

/// Maps a score to a letter grade on the standard percentage scale.
pub fn letter_grade(score: f64, max_points: u32) -> &'static str {
    if max_points == 0 {
        return "F";
    }
    let percentage = (score / max_points as f64) * 100.0;

    if percentage >= 97.0 {
        "A+"
    } else if percentage >= 93.0 {
        "A"
    } else if percentage >= 90.0 {
        "A-"
    } else if percentage >= 87.0 {
        "B+"
    } else if percentage >= 83.0 {
        "B"
    } else if percentage >= 80.0 {
        "B-"
    } else if percentage >= 77.0 {
        "C+"
    } else if percentage >= 73.0 {
        "C"
    } else if percentage >= 70.0 {
        "C-"
    } else if percentage >= 67.0 {
        "D+"
    } else if percentage >= 63.0 {
        "D"
    } else if percentage >= 60.0 {
        "D-"
    } else {
        "F"
    }
}

/// Logs a warning when a rubric's weights or points do not add up.
///
/// Weights are expected, not required, to sum to 100, and criterion points
/// to sum to the assignment total; imbalance is advisory only.
pub fn warn_on_rubric_imbalance(criteria: &[Criterion], max_points: u32) {
    let weight_sum: u32 = criteria.iter().map(|c| c.weight).sum();
    if weight_sum != 100 {
        log::warn!("Rubric weights sum to {}%, expected 100%", weight_sum);
    }

    let point_sum: u32 = criteria.iter().map(|c| c.max_points).sum();
    if point_sum != max_points {
        log::warn!(
            "Rubric points sum to {}, expected the assignment total of {}",
            point_sum,
            max_points
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_grade_table() {
        assert_eq!(letter_grade(97.0, 100), "A+");
        assert_eq!(letter_grade(93.0, 100), "A");
        assert_eq!(letter_grade(90.0, 100), "A-");
        assert_eq!(letter_grade(87.0, 100), "B+");
        assert_eq!(letter_grade(83.0, 100), "B");
        assert_eq!(letter_grade(80.0, 100), "B-");
        assert_eq!(letter_grade(77.0, 100), "C+");
        assert_eq!(letter_grade(75.0, 100), "C");
        assert_eq!(letter_grade(70.0, 100), "C-");
        assert_eq!(letter_grade(67.0, 100), "D+");
        assert_eq!(letter_grade(63.0, 100), "D");
        assert_eq!(letter_grade(60.0, 100), "D-");
        assert_eq!(letter_grade(59.9, 100), "F");
        assert_eq!(letter_grade(0.0, 100), "F");
    }

    #[test]
    fn test_letter_grade_scales_with_max_points() {
        // 38/50 = 76% -> C, just under the C+ cutoff
        assert_eq!(letter_grade(38.0, 50), "C");
        assert_eq!(letter_grade(0.0, 0), "F");
    }

    #[test]
    fn test_fallback_detection() {
        let graded = GradedSubmission {
            result: fallback::fallback_grading(&GradingRequest {
                assignment_title: "Essay".to_string(),
                assignment_description: String::new(),
                submission_content: String::new(),
                criteria: vec![],
                max_points: 100,
                additional_instructions: None,
            }),
            provenance: Provenance::Fallback(FallbackReason::Upstream("timeout".to_string())),
        };

        assert!(graded.is_fallback());
        assert_eq!(graded.into_result().confidence, 0.0);
    }
}

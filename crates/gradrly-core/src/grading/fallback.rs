//! Static fallback results substituted when the model call fails or its
//! output cannot be decoded.

use crate::grading::{letter_grade, Criterion, GradingRequest, GradingResult};
use std::collections::HashMap;

/// Fraction of the maximum awarded by the fallback grade.
const FALLBACK_RATIO: f64 = 0.75;

pub const FALLBACK_CRITERION_FEEDBACK: &str =
    "AI grading temporarily unavailable. Please review manually.";
pub const FALLBACK_DETAILED_FEEDBACK: &str =
    "AI grading service is temporarily unavailable. This submission requires manual review.";

/// Builds the deterministic fallback grade: 75% of the maximum for every
/// criterion and overall, fixed feedback strings, zero confidence.
pub fn fallback_grading(request: &GradingRequest) -> GradingResult {
    let fallback_score = (request.max_points as f64 * FALLBACK_RATIO).floor();

    let mut criteria_scores = HashMap::new();
    let mut criteria_feedback = HashMap::new();
    for criterion in &request.criteria {
        criteria_scores.insert(
            criterion.name.clone(),
            (criterion.max_points as f64 * FALLBACK_RATIO).floor(),
        );
        criteria_feedback.insert(
            criterion.name.clone(),
            FALLBACK_CRITERION_FEEDBACK.to_string(),
        );
    }

    GradingResult {
        overall_score: fallback_score,
        overall_grade: letter_grade(fallback_score, request.max_points).to_string(),
        criteria_scores,
        criteria_feedback,
        strengths: vec!["Submission received and processed".to_string()],
        improvements: vec!["Manual review recommended".to_string()],
        detailed_feedback: FALLBACK_DETAILED_FEEDBACK.to_string(),
        confidence: 0.0,
        processing_time_ms: 0,
    }
}

/// The fixed four-criterion rubric used when rubric generation fails.
///
/// The first three criteria take the floor of their weight share; the last
/// takes the remainder so the points always sum to the requested total.
pub fn default_rubric(max_points: u32) -> Vec<Criterion> {
    let content = (max_points as f64 * 0.4).floor() as u32;
    let organization = (max_points as f64 * 0.25).floor() as u32;
    let implementation = (max_points as f64 * 0.25).floor() as u32;
    let documentation = max_points - content - organization - implementation;

    vec![
        Criterion {
            name: "Content Quality".to_string(),
            description: "Accuracy, completeness, and depth of content".to_string(),
            max_points: content,
            weight: 40,
        },
        Criterion {
            name: "Organization & Structure".to_string(),
            description: "Logical flow, clear structure, and presentation".to_string(),
            max_points: organization,
            weight: 25,
        },
        Criterion {
            name: "Technical Implementation".to_string(),
            description: "Technical accuracy and implementation quality".to_string(),
            max_points: implementation,
            weight: 25,
        },
        Criterion {
            name: "Documentation & Clarity".to_string(),
            description: "Clear documentation, comments, and explanations".to_string(),
            max_points: documentation,
            weight: 10,
        },
    ]
}

/// Fixed suggestions returned when the suggestion call fails.
pub fn fallback_suggestions() -> Vec<String> {
    vec![
        "Consider providing more detailed explanations".to_string(),
        "Review the assignment requirements carefully".to_string(),
        "Add more examples to support your points".to_string(),
    ]
}

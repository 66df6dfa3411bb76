//! Decode-with-default for model output.
//!
//! The model is asked for a fixed JSON shape but is not trusted to produce
//! it. Decoding tolerates fenced output and surrounding prose, fills every
//! missing field with a defined default, clamps every numeric field into its
//! range, and truncates the open-ended lists. A submission criterion the
//! model skipped is scored 0 with a placeholder feedback string. Only a
//! payload that cannot be parsed at all is an error, which the service then
//! converts into the static fallback.

use crate::errors::GradingError;
use crate::grading::{letter_grade, Criterion, GradingRequest, GradingResult};
use crate::llm::ResponseParser;
use serde::Deserialize;
use std::collections::HashMap;

pub const MISSING_CRITERION_FEEDBACK: &str = "No feedback provided for this criterion.";
pub const MISSING_DETAILED_FEEDBACK: &str = "No detailed feedback provided.";

/// Confidence assumed when a parsed response omits the field.
const DEFAULT_CONFIDENCE: f64 = 85.0;

/// At most this many strengths/improvements are kept.
const MAX_LIST_ENTRIES: usize = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawGrading {
    overall_score: Option<f64>,
    overall_grade: Option<String>,
    criteria_scores: HashMap<String, f64>,
    criteria_feedback: HashMap<String, String>,
    strengths: Vec<String>,
    improvements: Vec<String>,
    detailed_feedback: Option<String>,
    confidence: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawRubric {
    criteria: Vec<RawCriterion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCriterion {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    max_points: f64,
    #[serde(default)]
    weight: f64,
}

fn parse_lenient<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, GradingError> {
    let clean = ResponseParser::strip_code_fences(text);

    match serde_json::from_str::<T>(&clean) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            // Second chance: the model may have wrapped the object in prose.
            if let Some(embedded) = ResponseParser::extract_json_object(&clean) {
                if let Ok(value) = serde_json::from_str::<T>(embedded) {
                    return Ok(value);
                }
            }
            Err(GradingError::ParsingError(format!(
                "Model output is not the expected JSON shape: {}",
                first_err
            )))
        }
    }
}

fn clamp(value: f64, max: f64) -> f64 {
    value.max(0.0).min(max)
}

/// Decodes grading output against the rubric it was requested for.
pub fn decode_grading(text: &str, request: &GradingRequest) -> Result<GradingResult, GradingError> {
    let raw: RawGrading = parse_lenient(text)?;

    let overall_score = clamp(raw.overall_score.unwrap_or(0.0), request.max_points as f64);

    let overall_grade = raw
        .overall_grade
        .filter(|grade| !grade.trim().is_empty())
        .unwrap_or_else(|| letter_grade(overall_score, request.max_points).to_string());

    let mut criteria_scores = HashMap::new();
    let mut criteria_feedback = HashMap::new();
    for criterion in &request.criteria {
        let score = raw
            .criteria_scores
            .get(&criterion.name)
            .copied()
            .unwrap_or(0.0);
        criteria_scores.insert(
            criterion.name.clone(),
            clamp(score, criterion.max_points as f64),
        );

        let feedback = raw
            .criteria_feedback
            .get(&criterion.name)
            .cloned()
            .unwrap_or_else(|| MISSING_CRITERION_FEEDBACK.to_string());
        criteria_feedback.insert(criterion.name.clone(), feedback);
    }

    let mut strengths = raw.strengths;
    strengths.truncate(MAX_LIST_ENTRIES);
    let mut improvements = raw.improvements;
    improvements.truncate(MAX_LIST_ENTRIES);

    Ok(GradingResult {
        overall_score,
        overall_grade,
        criteria_scores,
        criteria_feedback,
        strengths,
        improvements,
        detailed_feedback: raw
            .detailed_feedback
            .filter(|feedback| !feedback.trim().is_empty())
            .unwrap_or_else(|| MISSING_DETAILED_FEEDBACK.to_string()),
        confidence: clamp(raw.confidence.unwrap_or(DEFAULT_CONFIDENCE), 100.0),
        processing_time_ms: 0,
    })
}

/// Decodes a generated rubric. An empty criteria list is an error so the
/// service falls back to the default rubric.
pub fn decode_rubric(text: &str) -> Result<Vec<Criterion>, GradingError> {
    let raw: RawRubric = parse_lenient(text)?;

    if raw.criteria.is_empty() {
        return Err(GradingError::ParsingError(
            "Rubric response contains no criteria".to_string(),
        ));
    }

    Ok(raw
        .criteria
        .into_iter()
        .map(|c| Criterion {
            name: c.name,
            description: c.description,
            max_points: c.max_points.max(0.0).round() as u32,
            weight: c.weight.max(0.0).round() as u32,
        })
        .collect())
}

/// Decodes feedback suggestions, expected as a JSON array of strings.
pub fn decode_suggestions(text: &str) -> Result<Vec<String>, GradingError> {
    let suggestions: Vec<String> = parse_lenient(text).map_err(|_| {
        GradingError::ParsingError("Suggestions response is not a JSON string array".to_string())
    })?;

    if suggestions.is_empty() {
        return Err(GradingError::ParsingError(
            "Suggestions response is empty".to_string(),
        ));
    }

    Ok(suggestions)
}

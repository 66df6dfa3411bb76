//! The grading service: one blocking request-response cycle per operation,
//! with the fallback substituted on any failure.

use crate::core_types::Message;
use crate::errors::GradingError;
use crate::grading::{
    decode, fallback, prompt, Criterion, FallbackReason, GradedSubmission, GradingRequest,
    Provenance,
};
use crate::llm::LLM;
use std::sync::Arc;
use std::time::Instant;

/// Completion budgets per operation, mirroring the relative sizes of the
/// expected payloads.
const GRADING_MAX_TOKENS: u32 = 2000;
const RUBRIC_MAX_TOKENS: u32 = 1000;
const SUGGESTIONS_MAX_TOKENS: u32 = 500;

pub struct GradingService {
    llm: Arc<dyn LLM>,
    system_prompt: String,
}

impl GradingService {
    pub fn new(llm: Arc<dyn LLM>) -> Self {
        Self {
            llm,
            system_prompt: prompt::GRADER_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: String) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    async fn call_model(&self, user_prompt: String, max_tokens: u32) -> Result<String, GradingError> {
        let messages = vec![
            Message::system(self.system_prompt.clone()),
            Message::user(user_prompt),
        ];

        let response = self.llm.generate(messages, Some(max_tokens)).await?;

        response.content.ok_or_else(|| {
            GradingError::ParsingError("Model response has no text content".to_string())
        })
    }

    /// Grades one submission against its rubric.
    ///
    /// Never fails: an upstream error or undecodable payload yields the
    /// static fallback result, tagged with the reason.
    pub async fn grade_submission(&self, request: &GradingRequest) -> GradedSubmission {
        let started = Instant::now();
        crate::grading::warn_on_rubric_imbalance(&request.criteria, request.max_points);

        let mut graded = match self
            .call_model(prompt::grading_prompt(request), GRADING_MAX_TOKENS)
            .await
        {
            Ok(text) => match decode::decode_grading(&text, request) {
                Ok(result) => GradedSubmission {
                    result,
                    provenance: Provenance::Model,
                },
                Err(err) => {
                    log::warn!(
                        "Grading response for '{}' was malformed, substituting fallback: {}",
                        request.assignment_title,
                        err
                    );
                    GradedSubmission {
                        result: fallback::fallback_grading(request),
                        provenance: Provenance::Fallback(FallbackReason::Malformed(
                            err.to_string(),
                        )),
                    }
                }
            },
            Err(err) => {
                log::error!(
                    "Grading call for '{}' failed, substituting fallback: {}",
                    request.assignment_title,
                    err
                );
                GradedSubmission {
                    result: fallback::fallback_grading(request),
                    provenance: Provenance::Fallback(FallbackReason::Upstream(err.to_string())),
                }
            }
        };

        graded.result.processing_time_ms = started.elapsed().as_millis() as u64;
        graded
    }

    /// Drafts a rubric for an assignment description.
    ///
    /// Falls back to the fixed four-criterion rubric on any failure.
    pub async fn generate_rubric(&self, description: &str, max_points: u32) -> Vec<Criterion> {
        match self
            .call_model(prompt::rubric_prompt(description, max_points), RUBRIC_MAX_TOKENS)
            .await
            .and_then(|text| decode::decode_rubric(&text))
        {
            Ok(criteria) => criteria,
            Err(err) => {
                log::warn!("Rubric generation failed, using default rubric: {}", err);
                fallback::default_rubric(max_points)
            }
        }
    }

    /// Suggests additional feedback points for a submission.
    pub async fn suggest_feedback(
        &self,
        submission_content: &str,
        current_feedback: &str,
    ) -> Vec<String> {
        match self
            .call_model(
                prompt::suggestions_prompt(submission_content, current_feedback),
                SUGGESTIONS_MAX_TOKENS,
            )
            .await
            .and_then(|text| decode::decode_suggestions(&text))
        {
            Ok(suggestions) => suggestions,
            Err(err) => {
                log::warn!("Feedback suggestions failed, using fixed list: {}", err);
                fallback::fallback_suggestions()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::letter_grade;
    use crate::test_utils::ScriptedLLM;
    use serde_json::json;

    fn four_criterion_request() -> GradingRequest {
        GradingRequest {
            assignment_title: "Algorithms Project".to_string(),
            assignment_description: "Implement and analyze a BST.".to_string(),
            submission_content: "My implementation...".to_string(),
            criteria: vec![
                criterion("Correctness", 40),
                criterion("Analysis", 30),
                criterion("Testing", 20),
                criterion("Style", 10),
            ],
            max_points: 100,
            additional_instructions: None,
        }
    }

    fn criterion(name: &str, points: u32) -> Criterion {
        Criterion {
            name: name.to_string(),
            description: String::new(),
            max_points: points,
            weight: points,
        }
    }

    #[tokio::test]
    async fn test_grade_submission_success() {
        let reply = json!({
            "overallScore": 90,
            "overallGrade": "A-",
            "criteriaScores": {
                "Correctness": 38, "Analysis": 27, "Testing": 17, "Style": 8
            },
            "criteriaFeedback": {
                "Correctness": "Handles every case.",
                "Analysis": "Good asymptotic reasoning.",
                "Testing": "Edge cases covered.",
                "Style": "Consistent naming."
            },
            "strengths": ["Complete", "Correct", "Well tested"],
            "improvements": ["Discuss balancing", "Add benchmarks", "Trim comments"],
            "detailedFeedback": "Excellent work overall.",
            "confidence": 92
        });
        let llm = ScriptedLLM::with_replies(vec![Ok(reply.to_string())]);
        let service = GradingService::new(std::sync::Arc::new(llm));

        let graded = service.grade_submission(&four_criterion_request()).await;
        assert_eq!(graded.provenance, Provenance::Model);
        assert_eq!(graded.result.overall_score, 90.0);
        assert_eq!(graded.result.criteria_scores["Analysis"], 27.0);
    }

    #[tokio::test]
    async fn test_grade_submission_upstream_failure_yields_fallback() {
        let llm = ScriptedLLM::with_replies(vec![Err(GradingError::LLMError(
            "status 500".to_string(),
        ))]);
        let service = GradingService::new(std::sync::Arc::new(llm));

        let graded = service.grade_submission(&four_criterion_request()).await;

        // The worked example: max 100, forced failure => 75 / "C" / confidence 0
        assert!(matches!(
            graded.provenance,
            Provenance::Fallback(FallbackReason::Upstream(_))
        ));
        assert_eq!(graded.result.overall_score, 75.0);
        assert_eq!(graded.result.overall_grade, "C");
        assert_eq!(graded.result.confidence, 0.0);
        assert_eq!(graded.result.criteria_scores["Correctness"], 30.0);
    }

    #[tokio::test]
    async fn test_grade_submission_malformed_payload_yields_fallback() {
        let llm = ScriptedLLM::with_replies(vec![Ok(
            "I'm sorry, I can't grade this submission.".to_string()
        )]);
        let service = GradingService::new(std::sync::Arc::new(llm));

        let graded = service.grade_submission(&four_criterion_request()).await;
        assert!(matches!(
            graded.provenance,
            Provenance::Fallback(FallbackReason::Malformed(_))
        ));
        assert_eq!(graded.result.confidence, 0.0);
        assert_eq!(
            graded.result.overall_grade,
            letter_grade(75.0, 100).to_string()
        );
    }

    #[tokio::test]
    async fn test_grade_submission_records_prompt_and_budget() {
        let llm = ScriptedLLM::with_replies(vec![Ok(json!({"overallScore": 50}).to_string())]);
        let llm = std::sync::Arc::new(llm);
        let service = GradingService::new(llm.clone());

        service.grade_submission(&four_criterion_request()).await;

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].max_tokens, Some(GRADING_MAX_TOKENS));
        assert_eq!(calls[0].messages[0].content, prompt::GRADER_SYSTEM_PROMPT);
        assert!(calls[0].messages[1]
            .content
            .contains("ASSIGNMENT: Algorithms Project"));
    }

    #[tokio::test]
    async fn test_generate_rubric_success() {
        let reply = json!({
            "criteria": [
                { "name": "Design", "description": "", "maxPoints": 50, "weight": 50 },
                { "name": "Execution", "description": "", "maxPoints": 50, "weight": 50 }
            ]
        });
        let llm = ScriptedLLM::with_replies(vec![Ok(reply.to_string())]);
        let service = GradingService::new(std::sync::Arc::new(llm));

        let criteria = service.generate_rubric("Design a database schema.", 100).await;
        assert_eq!(criteria.len(), 2);
        assert_eq!(criteria[0].name, "Design");
    }

    #[tokio::test]
    async fn test_generate_rubric_falls_back_to_default() {
        let llm = ScriptedLLM::with_replies(vec![Err(GradingError::LLMError(
            "rate limited".to_string(),
        ))]);
        let service = GradingService::new(std::sync::Arc::new(llm));

        let criteria = service.generate_rubric("Anything", 80).await;
        assert_eq!(criteria.len(), 4);
        let weights: Vec<u32> = criteria.iter().map(|c| c.weight).collect();
        assert_eq!(weights, vec![40, 25, 25, 10]);
        let points_sum: u32 = criteria.iter().map(|c| c.max_points).sum();
        assert_eq!(points_sum, 80);
    }

    #[tokio::test]
    async fn test_suggest_feedback_fallback() {
        let llm = ScriptedLLM::with_replies(vec![Ok("not a json array".to_string())]);
        let service = GradingService::new(std::sync::Arc::new(llm));

        let suggestions = service.suggest_feedback("essay", "needs work").await;
        assert_eq!(suggestions, fallback::fallback_suggestions());
    }

    #[tokio::test]
    async fn test_custom_system_prompt() {
        let llm = ScriptedLLM::with_replies(vec![Ok(json!({"overallScore": 10}).to_string())]);
        let llm = std::sync::Arc::new(llm);
        let service = GradingService::new(llm.clone())
            .with_system_prompt("You are a strict grader.".to_string());

        service.grade_submission(&four_criterion_request()).await;
        assert_eq!(llm.calls()[0].messages[0].content, "You are a strict grader.");
    }
}

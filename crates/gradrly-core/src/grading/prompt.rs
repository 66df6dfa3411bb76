//! Prompt construction for grading, rubric generation, and feedback
//! suggestions.
//!
//! All builders are pure functions from domain values to prompt text. The
//! grading prompt names every criterion in the JSON template it requests so
//! the decode step can hold the model to the rubric.

use crate::grading::GradingRequest;

/// Fixed system instruction sent with every grading call.
pub const GRADER_SYSTEM_PROMPT: &str = "You are an expert academic grader with years of experience in evaluating student work. You provide fair, constructive, and detailed feedback while maintaining high academic standards.";

/// Substituted for the submission body when no text was supplied.
pub const EMPTY_SUBMISSION_PLACEHOLDER: &str = "[No submission content was provided]";

/// Builds the grading prompt for one submission.
pub fn grading_prompt(request: &GradingRequest) -> String {
    let criteria_text = request
        .criteria
        .iter()
        .map(|c| {
            format!(
                "- {} ({} points, {}% weight): {}",
                c.name, c.max_points, c.weight, c.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let score_fields = request
        .criteria
        .iter()
        .map(|c| format!("    \"{}\": <points earned for this criterion>", c.name))
        .collect::<Vec<_>>()
        .join(",\n");

    let feedback_fields = request
        .criteria
        .iter()
        .map(|c| format!("    \"{}\": \"<specific feedback for this criterion>\"", c.name))
        .collect::<Vec<_>>()
        .join(",\n");

    let submission = if request.submission_content.trim().is_empty() {
        EMPTY_SUBMISSION_PLACEHOLDER
    } else {
        request.submission_content.as_str()
    };

    let additional = request
        .additional_instructions
        .as_ref()
        .map(|instructions| format!("ADDITIONAL INSTRUCTIONS: {}\n\n", instructions))
        .unwrap_or_default();

    format!(
        r#"Please grade the following student submission with detailed analysis:

ASSIGNMENT: {title}
DESCRIPTION: {description}
TOTAL POINTS: {max_points}

GRADING CRITERIA:
{criteria_text}

STUDENT SUBMISSION:
{submission}

{additional}Please provide your response in the following JSON format:
{{
  "overallScore": <total points earned>,
  "overallGrade": "<letter grade>",
  "criteriaScores": {{
{score_fields}
  }},
  "criteriaFeedback": {{
{feedback_fields}
  }},
  "strengths": ["<strength 1>", "<strength 2>", "<strength 3>"],
  "improvements": ["<improvement 1>", "<improvement 2>", "<improvement 3>"],
  "detailedFeedback": "<comprehensive feedback paragraph>",
  "confidence": <confidence level 0-100>
}}

Be thorough, fair, and constructive in your evaluation. Focus on both what the student did well and areas for improvement."#,
        title = request.assignment_title,
        description = request.assignment_description,
        max_points = request.max_points,
        criteria_text = criteria_text,
        submission = submission,
        additional = additional,
        score_fields = score_fields,
        feedback_fields = feedback_fields,
    )
}

/// Builds the prompt asking the model to draft a rubric for an assignment.
pub fn rubric_prompt(assignment_description: &str, max_points: u32) -> String {
    format!(
        r#"Create a detailed grading rubric for the following assignment:

ASSIGNMENT DESCRIPTION: {description}
TOTAL POINTS: {max_points}

Please provide a JSON response with 4-6 grading criteria in this format:
{{
  "criteria": [
    {{
      "name": "<criterion name>",
      "description": "<detailed description of what this criterion evaluates>",
      "maxPoints": <points for this criterion>,
      "weight": <percentage weight>
    }}
  ]
}}

Ensure the weights add up to 100% and the maxPoints add up to {max_points}.
Make the criteria comprehensive and appropriate for the assignment type."#,
        description = assignment_description,
        max_points = max_points,
    )
}

/// Builds the prompt asking for additional feedback suggestions.
pub fn suggestions_prompt(submission_content: &str, current_feedback: &str) -> String {
    format!(
        r#"Based on this student submission and current feedback, suggest 3-5 additional constructive feedback points:

SUBMISSION: {submission}
CURRENT FEEDBACK: {feedback}

Provide suggestions as a JSON array of strings:
["suggestion 1", "suggestion 2", "suggestion 3"]

Focus on actionable, specific, and constructive feedback that helps the student improve."#,
        submission = submission_content,
        feedback = current_feedback,
    )
}

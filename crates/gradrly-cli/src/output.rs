//! Human-readable rendering for grading results, rubrics, and history.

use gradrly_core::catalog::GradeRecord;
use gradrly_core::grading::{
    Criterion, FallbackReason, GradedSubmission, GradingRequest, Provenance,
};

pub fn print_graded(request: &GradingRequest, graded: &GradedSubmission) {
    let result = &graded.result;

    println!();
    println!("{}", request.assignment_title);
    println!("{}", "=".repeat(request.assignment_title.len()));
    println!(
        "Overall: {:.0}/{} ({})    Confidence: {:.0}%    {} ms",
        result.overall_score,
        request.max_points,
        result.overall_grade,
        result.confidence,
        result.processing_time_ms
    );

    if let Provenance::Fallback(reason) = &graded.provenance {
        let kind = match reason {
            FallbackReason::Upstream(_) => "the grading call failed",
            FallbackReason::Malformed(_) => "the model response was malformed",
        };
        println!("NOTE: fallback grade ({}); review manually.", kind);
    }

    println!();
    println!("{:<28} | {:<9} | {}", "Criterion", "Score", "Feedback");
    println!("{}", "-".repeat(80));
    for criterion in &request.criteria {
        let score = result
            .criteria_scores
            .get(&criterion.name)
            .copied()
            .unwrap_or(0.0);
        let feedback = result
            .criteria_feedback
            .get(&criterion.name)
            .map(String::as_str)
            .unwrap_or("");
        println!(
            "{:<28} | {:>4.0}/{:<4} | {}",
            truncate(&criterion.name, 28),
            score,
            criterion.max_points,
            feedback
        );
    }

    println!();
    println!("Strengths:");
    for strength in &result.strengths {
        println!("  + {}", strength);
    }
    println!("Improvements:");
    for improvement in &result.improvements {
        println!("  - {}", improvement);
    }
    println!();
    println!("{}", result.detailed_feedback);
    println!();
}

pub fn print_criteria_table(criteria: &[Criterion]) {
    println!();
    println!(
        "{:<28} | {:<7} | {:<7} | {}",
        "Criterion", "Points", "Weight", "Description"
    );
    println!("{}", "-".repeat(80));
    for criterion in criteria {
        println!(
            "{:<28} | {:<7} | {:<6}% | {}",
            truncate(&criterion.name, 28),
            criterion.max_points,
            criterion.weight,
            criterion.description
        );
    }
    println!();
}

pub fn print_history_table(records: &[GradeRecord]) {
    if records.is_empty() {
        println!("\nNo grading history yet.\n");
        return;
    }

    println!();
    println!(
        "{:<24} | {:<20} | {:<9} | {:<8} | {}",
        "Assignment", "Student", "Score", "Source", "Graded at"
    );
    println!("{}", "-".repeat(88));
    for record in records {
        let source = match record.provenance {
            Provenance::Model => "model",
            Provenance::Fallback(_) => "fallback",
        };
        println!(
            "{:<24} | {:<20} | {:>3.0} {:<5} | {:<8} | {}",
            truncate(&record.assignment_title, 24),
            truncate(record.student.as_deref().unwrap_or("-"), 20),
            record.result.overall_score,
            record.result.overall_grade,
            source,
            record.graded_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!();
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long assignment title", 10), "a very lo…");
    }
}

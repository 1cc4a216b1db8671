use std::fmt::Write;

use crate::models::{QuestionDistribution, SubmissionStats};

pub fn build_report(
    submissions: &[SubmissionStats],
    distributions: &[QuestionDistribution],
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Career Readiness Report");
    let _ = writeln!(
        output,
        "Generated across {} submission(s).",
        submissions.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Submission Scores");

    if submissions.is_empty() {
        let _ = writeln!(output, "No submissions recorded.");
    } else {
        for submission in submissions {
            let _ = writeln!(
                output,
                "- {} submitted {}",
                submission.id,
                submission.submitted_at.format("%Y-%m-%d %H:%M:%S")
            );
            for category in &submission.categories {
                let _ = writeln!(output, "  - {}: {:.2}%", category.title, category.percentage);
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Answer Distribution");

    if distributions.is_empty() {
        let _ = writeln!(output, "No questions in the catalog.");
    } else {
        for distribution in distributions {
            let _ = writeln!(
                output,
                "- {} ({} answer(s))",
                distribution.title, distribution.total_answers
            );
            for option in &distribution.options {
                let _ = writeln!(
                    output,
                    "  - {}: {} ({:.2}%)",
                    option.value, option.count, option.percentage
                );
            }
        }
    }

    output
}

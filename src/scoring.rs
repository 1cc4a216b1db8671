use std::collections::HashMap;

use crate::models::{Answer, Question, QuestionGroup, QuestionKind, ScoreResult};

/// Scores one category. Single-question categories are out of 5, paired
/// categories out of 10. Any other question count scores 0 out of 0.
pub fn score_category(answers: &[Answer], questions: &[Question]) -> ScoreResult {
    let mut ordered: Vec<&Question> = questions.iter().collect();
    ordered.sort_by_key(|q| q.id);

    // Answers arrive in created_at order, so inserting in sequence leaves
    // the most recent answer per question in the map.
    let mut by_question: HashMap<i64, &Answer> = HashMap::new();
    for answer in answers {
        by_question.insert(answer.question_id, answer);
    }

    let (score, max_score) = match ordered.as_slice() {
        [question] => {
            let score = by_question
                .get(&question.id)
                .map(|answer| question_score(&answer.value, question, None))
                .unwrap_or(0);
            (score, 5)
        }
        [first, second] => {
            let first_answer = by_question.get(&first.id);
            let second_answer = by_question.get(&second.id);

            let mut score = 0;
            if let Some(answer) = first_answer {
                score += question_score(&answer.value, first, None);
            }
            // The second question counts only when the gating first answer
            // is also present.
            if let (Some(gate), Some(answer)) = (first_answer, second_answer) {
                score += question_score(&answer.value, second, Some(gate.value.as_str()));
            }
            (score, 10)
        }
        _ => (0, 0),
    };

    ScoreResult {
        score,
        max_score,
        percentage: percentage(score, max_score),
    }
}

pub fn question_score(value: &str, question: &Question, gate: Option<&str>) -> i64 {
    match question.kind {
        QuestionKind::Binary => {
            if value == "yes" {
                5
            } else {
                0
            }
        }
        QuestionKind::FivePointScale => {
            if gate == Some("no") {
                return 0;
            }
            // Out-of-range numeric strings pass through unclamped; anything
            // non-numeric scores 0.
            value.parse::<i64>().unwrap_or(0)
        }
        QuestionKind::PortfolioBucket => portfolio_score(value),
        QuestionKind::CareerPath => {
            if gate == Some("no") || value.is_empty() {
                0
            } else {
                5
            }
        }
        QuestionKind::Unknown => 0,
    }
}

pub fn portfolio_score(value: &str) -> i64 {
    match value {
        "0 Project" => 0,
        "1-5 Projects" => 1,
        "5-10 Projects" => 3,
        "10+ Projects" => 5,
        _ => 0,
    }
}

pub fn percentage(score: i64, max_score: i64) -> f64 {
    if max_score == 0 {
        return 0.0;
    }
    let raw = score as f64 / max_score as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Catalog-shape warnings for the caller to surface. Scoring still runs;
/// offending groups score 0 out of 0.
pub fn catalog_warnings(groups: &[QuestionGroup]) -> Vec<String> {
    groups
        .iter()
        .filter(|group| group.questions.is_empty() || group.questions.len() > 2)
        .map(|group| {
            format!(
                "question group '{}' has {} questions; only 1 or 2 are scorable",
                group.title,
                group.questions.len()
            )
        })
        .collect()
}

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Answer, CategoryScore, OptionCount, QuestionDistribution, QuestionGroup, SubmissionStats,
};
use crate::scoring;

/// Category percentages for one submission, in catalog order. Groups the
/// submission never answered are left out rather than reported as 0%.
pub fn score_submission(answers: &[Answer], groups: &[QuestionGroup]) -> Vec<CategoryScore> {
    let mut categories = Vec::new();

    for group in groups {
        let group_answers: Vec<Answer> = answers
            .iter()
            .filter(|answer| group.questions.iter().any(|q| q.id == answer.question_id))
            .cloned()
            .collect();

        if group_answers.is_empty() {
            continue;
        }

        let result = scoring::score_category(&group_answers, &group.questions);
        categories.push(CategoryScore {
            title: group.title.clone(),
            percentage: result.percentage,
        });
    }

    categories
}

pub fn summarize_submissions(
    answers: &[Answer],
    groups: &[QuestionGroup],
) -> Vec<SubmissionStats> {
    struct Bucket {
        submitted_at: DateTime<Utc>,
        answers: Vec<Answer>,
    }

    let mut by_submission: HashMap<Uuid, Bucket> = HashMap::new();
    for answer in answers {
        let bucket = by_submission
            .entry(answer.submission_id)
            .or_insert_with(|| Bucket {
                submitted_at: answer.created_at,
                answers: Vec::new(),
            });
        if answer.created_at < bucket.submitted_at {
            bucket.submitted_at = answer.created_at;
        }
        bucket.answers.push(answer.clone());
    }

    let mut stats: Vec<SubmissionStats> = by_submission
        .into_iter()
        .map(|(id, bucket)| SubmissionStats {
            id,
            submitted_at: bucket.submitted_at,
            categories: score_submission(&bucket.answers, groups),
        })
        .collect();

    stats.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(a.id.cmp(&b.id)));
    stats
}

/// Per-question tally of how often each option was picked. Pure counting;
/// a question nobody answered still lists its options with zero counts.
pub fn option_distribution(
    answers: &[Answer],
    groups: &[QuestionGroup],
) -> Vec<QuestionDistribution> {
    let mut counts: HashMap<i64, HashMap<&str, usize>> = HashMap::new();
    for answer in answers {
        *counts
            .entry(answer.question_id)
            .or_default()
            .entry(answer.value.as_str())
            .or_insert(0) += 1;
    }

    let mut distributions = Vec::new();
    for group in groups {
        for question in &group.questions {
            let tally = counts.get(&question.id);
            let total: usize = tally.map(|t| t.values().sum()).unwrap_or(0);

            let options = question
                .options
                .iter()
                .map(|option| {
                    let count = tally
                        .and_then(|t| t.get(option.as_str()))
                        .copied()
                        .unwrap_or(0);
                    OptionCount {
                        value: option.clone(),
                        count,
                        percentage: if total == 0 {
                            0.0
                        } else {
                            scoring::percentage(count as i64, total as i64)
                        },
                    }
                })
                .collect();

            distributions.push(QuestionDistribution {
                question_id: question.id,
                title: question.title.clone(),
                total_answers: total,
                options,
            });
        }
    }

    distributions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;
    use chrono::Duration;

    fn question(id: i64, group_id: i64, title: &str, options: &[&str]) -> Question {
        Question::new(
            id,
            group_id,
            title.to_string(),
            options.iter().map(|o| o.to_string()).collect(),
        )
    }

    fn catalog() -> Vec<QuestionGroup> {
        vec![
            QuestionGroup {
                id: 1,
                title: "Portfolio".to_string(),
                questions: vec![
                    question(1, 1, "Do you have a professional portfolio?", &["yes", "no"]),
                    question(2, 1, "How many projects are currently in your portfolio?", &[
                        "0 Project",
                        "1-5 Projects",
                        "5-10 Projects",
                        "10+ Projects",
                    ]),
                ],
            },
            QuestionGroup {
                id: 2,
                title: "References".to_string(),
                questions: vec![question(3, 2, "Do you have a reference?", &["yes", "no"])],
            },
        ]
    }

    fn answer(submission_id: Uuid, question_id: i64, value: &str, minutes_ago: i64) -> Answer {
        Answer {
            id: Uuid::new_v4(),
            submission_id,
            question_id,
            value: value.to_string(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn unanswered_groups_are_omitted() {
        let submission = Uuid::new_v4();
        let answers = vec![
            answer(submission, 1, "yes", 5),
            answer(submission, 2, "5-10 Projects", 5),
        ];
        let categories = score_submission(&answers, &catalog());
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].title, "Portfolio");
        assert_eq!(categories[0].percentage, 80.0);
    }

    #[test]
    fn categories_follow_catalog_order() {
        let submission = Uuid::new_v4();
        let answers = vec![
            answer(submission, 3, "yes", 5),
            answer(submission, 1, "yes", 5),
        ];
        let categories = score_submission(&answers, &catalog());
        let titles: Vec<&str> = categories.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Portfolio", "References"]);
    }

    #[test]
    fn submissions_group_and_sort_newest_first() {
        let earlier = Uuid::new_v4();
        let later = Uuid::new_v4();
        let answers = vec![
            answer(earlier, 3, "yes", 60),
            answer(earlier, 1, "no", 59),
            answer(later, 3, "no", 5),
        ];

        let stats = summarize_submissions(&answers, &catalog());
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].id, later);
        assert_eq!(stats[1].id, earlier);
        assert_eq!(stats[1].categories.len(), 2);
    }

    #[test]
    fn submitted_at_is_the_earliest_answer() {
        let submission = Uuid::new_v4();
        let first = answer(submission, 1, "yes", 30);
        let expected = first.created_at;
        let answers = vec![first, answer(submission, 2, "10+ Projects", 29)];

        let stats = summarize_submissions(&answers, &catalog());
        assert_eq!(stats[0].submitted_at, expected);
    }

    #[test]
    fn duplicate_answers_resolve_to_the_latest() {
        let submission = Uuid::new_v4();
        // created_at ascending, matching what the store hands back.
        let answers = vec![
            answer(submission, 3, "no", 10),
            answer(submission, 3, "yes", 1),
        ];
        let categories = score_submission(&answers, &catalog());
        assert_eq!(categories[0].percentage, 100.0);
    }

    #[test]
    fn distribution_counts_and_percentages() {
        let answers = vec![
            answer(Uuid::new_v4(), 3, "yes", 4),
            answer(Uuid::new_v4(), 3, "yes", 3),
            answer(Uuid::new_v4(), 3, "yes", 2),
            answer(Uuid::new_v4(), 3, "no", 1),
        ];

        let distributions = option_distribution(&answers, &catalog());
        let references = distributions
            .iter()
            .find(|d| d.question_id == 3)
            .expect("question 3 in distribution");

        assert_eq!(references.total_answers, 4);
        assert_eq!(references.options[0].value, "yes");
        assert_eq!(references.options[0].count, 3);
        assert_eq!(references.options[0].percentage, 75.0);
        assert_eq!(references.options[1].count, 1);
        assert_eq!(references.options[1].percentage, 25.0);
    }

    #[test]
    fn unanswered_questions_report_zero_counts() {
        let distributions = option_distribution(&[], &catalog());
        assert_eq!(distributions.len(), 3);
        for distribution in &distributions {
            assert_eq!(distribution.total_answers, 0);
            assert!(distribution.options.iter().all(|o| o.count == 0));
            assert!(distribution.options.iter().all(|o| o.percentage == 0.0));
        }
    }
}

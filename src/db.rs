use std::collections::BTreeMap;

use anyhow::Context;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Answer, Question, QuestionGroup};

/// Grouped intake document: group title -> question title -> answer value.
pub type IntakeDocument = BTreeMap<String, BTreeMap<String, String>>;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let catalog: Vec<(&str, Vec<(&str, Vec<&str>)>)> = vec![
        (
            "Tech Skill Acquired",
            vec![
                (
                    "Have You Taken a Course in any of these Career Paths (Data Analytics, Data Science, Data Engineering, Ethical Hacking, SOC Analyst, GRC, Business Analysis, Project Management)",
                    vec!["yes", "no"],
                ),
                (
                    "Which career path?",
                    vec![
                        "Data Analytics",
                        "Data Science",
                        "Data Engineering",
                        "SOC Analyst",
                        "GRC",
                        "Ethical Hacking",
                        "Business Analysis",
                        "Project Management",
                    ],
                ),
            ],
        ),
        (
            "Portfolio",
            vec![
                (
                    "Do you have a professional portfolio showcasing your work?",
                    vec!["yes", "no"],
                ),
                (
                    "How many projects are currently in your portfolio?",
                    vec!["0 Project", "1-5 Projects", "5-10 Projects", "10+ Projects"],
                ),
            ],
        ),
        (
            "CV (ATS Compliance)",
            vec![
                (
                    "Is your CV keyword-optimized for Applicant Tracking Systems (ATS)?",
                    vec!["yes", "no"],
                ),
                (
                    "On a scale of 1–5, how confident are you that your CV matches job descriptions in your field?",
                    vec!["1", "2", "3", "4", "5"],
                ),
            ],
        ),
        (
            "LinkedIn Optimization",
            vec![
                (
                    "Do you have an optimized LinkedIn profile that highlights your skills and achievements in your preferred career path selected in question 1?",
                    vec!["yes", "no"],
                ),
                (
                    "Do recruiters reach out to you on LinkedIn?",
                    vec!["yes", "no"],
                ),
            ],
        ),
        (
            "References",
            vec![(
                "Do you have at least one professional/organizational reference in your preferred career path?",
                vec!["yes", "no"],
            )],
        ),
        (
            "Interview Readiness – SEAT",
            vec![
                (
                    "Do you know how to use the SEAT (Skills, Experience, Achievements, Traits) approach to answer 'Tell me about yourself'?",
                    vec!["yes", "no"],
                ),
                (
                    "On a scale of 1–5, how confident are you in applying SEAT during interviews?",
                    vec!["1", "2", "3", "4", "5"],
                ),
            ],
        ),
        (
            "Interview Readiness – STAR",
            vec![
                (
                    "Do you know how to use the STAR (Situation, Task, Action, Result) method to answer competency-based questions?",
                    vec!["yes", "no"],
                ),
                (
                    "On a scale of 1–5, how confident are you in applying STAR during interviews?",
                    vec!["1", "2", "3", "4", "5"],
                ),
            ],
        ),
    ];

    for (group_title, questions) in catalog {
        let existing = sqlx::query("SELECT id FROM readiness_survey.question_groups WHERE title = $1")
            .bind(group_title)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            continue;
        }

        let group_id: i64 = sqlx::query(
            "INSERT INTO readiness_survey.question_groups (title) VALUES ($1) RETURNING id",
        )
        .bind(group_title)
        .fetch_one(pool)
        .await?
        .get("id");

        for (title, options) in questions {
            let options: Vec<String> = options.iter().map(|o| o.to_string()).collect();
            sqlx::query(
                r#"
                INSERT INTO readiness_survey.questions (question_group_id, title, options)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(group_id)
            .bind(title)
            .bind(&options)
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}

pub async fn list_question_groups(pool: &PgPool) -> anyhow::Result<Vec<QuestionGroup>> {
    let group_rows =
        sqlx::query("SELECT id, title FROM readiness_survey.question_groups ORDER BY id")
            .fetch_all(pool)
            .await?;

    let mut groups: Vec<QuestionGroup> = Vec::new();
    for row in group_rows {
        groups.push(QuestionGroup {
            id: row.get("id"),
            title: row.get("title"),
            questions: Vec::new(),
        });
    }

    let question_rows = sqlx::query(
        "SELECT id, question_group_id, title, options FROM readiness_survey.questions ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    for row in question_rows {
        let question = Question::new(
            row.get("id"),
            row.get("question_group_id"),
            row.get("title"),
            row.get("options"),
        );
        if let Some(group) = groups.iter_mut().find(|g| g.id == question.group_id) {
            group.questions.push(question);
        }
    }

    Ok(groups)
}

pub async fn answers_for_submission(
    pool: &PgPool,
    submission_id: Uuid,
) -> anyhow::Result<Vec<Answer>> {
    let rows = sqlx::query(
        "SELECT id, submission_id, question_id, answer, created_at \
         FROM readiness_survey.answers \
         WHERE submission_id = $1 \
         ORDER BY created_at ASC, id ASC",
    )
    .bind(submission_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(answer_from_row).collect())
}

pub async fn all_answers(pool: &PgPool) -> anyhow::Result<Vec<Answer>> {
    let rows = sqlx::query(
        "SELECT id, submission_id, question_id, answer, created_at \
         FROM readiness_survey.answers \
         ORDER BY created_at ASC, id ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(answer_from_row).collect())
}

fn answer_from_row(row: &PgRow) -> Answer {
    Answer {
        id: row.get("id"),
        submission_id: row.get("submission_id"),
        question_id: row.get("question_id"),
        value: row.get("answer"),
        created_at: row.get("created_at"),
    }
}

/// Stores one grouped submission. Unknown group or question titles are
/// skipped; a value outside the question's option set aborts the intake.
pub async fn intake_submission(
    pool: &PgPool,
    groups: &[QuestionGroup],
    document: &IntakeDocument,
) -> anyhow::Result<(Uuid, usize)> {
    let submission_id = Uuid::new_v4();
    let mut inserted = 0usize;

    for (group_title, entries) in document {
        let Some(group) = groups.iter().find(|g| &g.title == group_title) else {
            continue;
        };

        for (question_title, value) in entries {
            let Some(question) = group.questions.iter().find(|q| &q.title == question_title)
            else {
                continue;
            };

            if !question.options.iter().any(|o| o == value) {
                anyhow::bail!(
                    "invalid answer '{}' for question '{}'; valid options are: {}",
                    value,
                    question_title,
                    question.options.join(", ")
                );
            }

            sqlx::query(
                r#"
                INSERT INTO readiness_survey.answers (id, submission_id, question_id, answer)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(submission_id)
            .bind(question.id)
            .bind(value)
            .execute(pool)
            .await?;
            inserted += 1;
        }
    }

    Ok((submission_id, inserted))
}

pub async fn import_csv(
    pool: &PgPool,
    groups: &[QuestionGroup],
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        submission_id: Uuid,
        question_title: String,
        answer: String,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let question = groups
            .iter()
            .flat_map(|g| g.questions.iter())
            .find(|q| q.title == row.question_title)
            .with_context(|| format!("unknown question '{}'", row.question_title))?;

        if !question.options.iter().any(|o| o == &row.answer) {
            anyhow::bail!(
                "invalid answer '{}' for question '{}'; valid options are: {}",
                row.answer,
                row.question_title,
                question.options.join(", ")
            );
        }

        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let result = sqlx::query(
            r#"
            INSERT INTO readiness_survey.answers
            (id, submission_id, question_id, answer, source_key)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(row.submission_id)
        .bind(question.id)
        .bind(&row.answer)
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}

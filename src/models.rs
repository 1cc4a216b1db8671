use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Scoring rule a question falls under. Classified once from option content
/// and title when the catalog is loaded; the engine never re-sniffs strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Binary,
    FivePointScale,
    PortfolioBucket,
    CareerPath,
    Unknown,
}

impl QuestionKind {
    pub fn classify(title: &str, options: &[String]) -> Self {
        let yes_no = options.len() == 2
            && options.iter().any(|o| o == "yes")
            && options.iter().any(|o| o == "no");
        if yes_no {
            return QuestionKind::Binary;
        }
        if options.iter().any(|o| o == "1") && options.iter().any(|o| o == "5") {
            return QuestionKind::FivePointScale;
        }
        if title.contains("How many projects") {
            return QuestionKind::PortfolioBucket;
        }
        if title.contains("Which career path") || title.contains("career path") {
            return QuestionKind::CareerPath;
        }
        QuestionKind::Unknown
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionGroup {
    pub id: i64,
    pub title: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: i64,
    pub group_id: i64,
    pub title: String,
    pub options: Vec<String>,
    #[serde(skip_serializing)]
    pub kind: QuestionKind,
}

impl Question {
    pub fn new(id: i64, group_id: i64, title: String, options: Vec<String>) -> Self {
        let kind = QuestionKind::classify(&title, &options);
        Self {
            id,
            group_id,
            title,
            options,
            kind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub question_id: i64,
    pub value: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: i64,
    pub max_score: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryScore {
    pub title: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionStats {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub categories: Vec<CategoryScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionCount {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionDistribution {
    pub question_id: i64,
    pub title: String,
    pub total_answers: usize,
    pub options: Vec<OptionCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn classifies_yes_no_as_binary() {
        let kind = QuestionKind::classify(
            "Do you have a professional portfolio showcasing your work?",
            &opts(&["yes", "no"]),
        );
        assert_eq!(kind, QuestionKind::Binary);
    }

    #[test]
    fn classifies_numeric_scale() {
        let kind = QuestionKind::classify(
            "On a scale of 1–5, how confident are you in applying STAR during interviews?",
            &opts(&["1", "2", "3", "4", "5"]),
        );
        assert_eq!(kind, QuestionKind::FivePointScale);
    }

    #[test]
    fn classifies_portfolio_bucket_by_title() {
        let kind = QuestionKind::classify(
            "How many projects are currently in your portfolio?",
            &opts(&["0 Project", "1-5 Projects", "5-10 Projects", "10+ Projects"]),
        );
        assert_eq!(kind, QuestionKind::PortfolioBucket);
    }

    #[test]
    fn bucket_labels_do_not_look_like_a_scale() {
        // "1-5 Projects" must not satisfy the {"1", "5"} membership check.
        let kind = QuestionKind::classify(
            "How many projects are currently in your portfolio?",
            &opts(&["1-5 Projects", "5-10 Projects"]),
        );
        assert_eq!(kind, QuestionKind::PortfolioBucket);
    }

    #[test]
    fn classifies_career_path_by_title() {
        let kind = QuestionKind::classify(
            "Which career path?",
            &opts(&["Data Analytics", "Data Science", "GRC"]),
        );
        assert_eq!(kind, QuestionKind::CareerPath);
    }

    #[test]
    fn binary_options_win_over_title_sniffing() {
        let kind = QuestionKind::classify("Which career path?", &opts(&["yes", "no"]));
        assert_eq!(kind, QuestionKind::Binary);
    }

    #[test]
    fn unrecognized_shape_is_unknown() {
        let kind = QuestionKind::classify("Favorite color?", &opts(&["red", "blue"]));
        assert_eq!(kind, QuestionKind::Unknown);
    }

    #[test]
    fn question_new_caches_the_kind() {
        let question = Question::new(
            3,
            2,
            "Is your CV keyword-optimized for Applicant Tracking Systems (ATS)?".to_string(),
            opts(&["yes", "no"]),
        );
        assert_eq!(question.kind, QuestionKind::Binary);
    }
}

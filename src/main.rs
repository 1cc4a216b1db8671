use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

mod db;
mod models;
mod report;
mod scoring;
mod stats;

#[derive(Parser)]
#[command(name = "readiness-survey")]
#[command(about = "Career readiness survey intake and scoring backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Seed the question catalog
    Seed,
    /// Record one submission from a grouped JSON answer document
    Intake {
        #[arg(long)]
        json: PathBuf,
    },
    /// Bulk-import answers from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print the question catalog as JSON
    Questions,
    /// Print stored answers, optionally for a single submission
    Answers {
        #[arg(long)]
        submission: Option<Uuid>,
    },
    /// Score one submission across categories
    Score {
        #[arg(long)]
        submission: Uuid,
    },
    /// Print all submission scores and option distribution as JSON
    Stats,
    /// Generate a markdown readiness report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Question catalog seeded.");
        }
        Commands::Intake { json } => {
            let text = std::fs::read_to_string(&json)
                .with_context(|| format!("failed to read {}", json.display()))?;
            let document: db::IntakeDocument =
                serde_json::from_str(&text).context("failed to parse intake JSON")?;

            let groups = db::list_question_groups(&pool).await?;
            let (submission_id, inserted) =
                db::intake_submission(&pool, &groups, &document).await?;
            println!("Recorded submission {submission_id} with {inserted} answer(s).");
        }
        Commands::Import { csv } => {
            let groups = db::list_question_groups(&pool).await?;
            let inserted = db::import_csv(&pool, &groups, &csv).await?;
            println!("Inserted {inserted} answer(s) from {}.", csv.display());
        }
        Commands::Questions => {
            let groups = db::list_question_groups(&pool).await?;
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        Commands::Answers { submission } => {
            let groups = db::list_question_groups(&pool).await?;
            let mut answers = match submission {
                Some(id) => db::answers_for_submission(&pool, id).await?,
                None => db::all_answers(&pool).await?,
            };

            if answers.is_empty() {
                println!("No answers recorded.");
                return Ok(());
            }

            let mut titles: HashMap<i64, (String, String)> = HashMap::new();
            for group in &groups {
                for question in &group.questions {
                    titles.insert(question.id, (group.title.clone(), question.title.clone()));
                }
            }

            answers.sort_by(|a, b| {
                a.submission_id
                    .cmp(&b.submission_id)
                    .then(a.created_at.cmp(&b.created_at))
            });

            let mut current: Option<Uuid> = None;
            for answer in &answers {
                if current != Some(answer.submission_id) {
                    println!("Submission {}:", answer.submission_id);
                    current = Some(answer.submission_id);
                }
                match titles.get(&answer.question_id) {
                    Some((group_title, question_title)) => {
                        println!("- [{group_title}] {question_title}: {}", answer.value);
                    }
                    None => {
                        println!("- [question {}] {}", answer.question_id, answer.value);
                    }
                }
            }
        }
        Commands::Score { submission } => {
            let groups = db::list_question_groups(&pool).await?;
            for warning in scoring::catalog_warnings(&groups) {
                eprintln!("warning: {warning}");
            }

            let answers = db::answers_for_submission(&pool, submission).await?;
            if answers.is_empty() {
                println!("No submission found with id {submission}.");
                return Ok(());
            }

            println!("Submission {submission}:");
            for category in stats::score_submission(&answers, &groups) {
                println!("- {}: {:.2}%", category.title, category.percentage);
            }
        }
        Commands::Stats => {
            let groups = db::list_question_groups(&pool).await?;
            for warning in scoring::catalog_warnings(&groups) {
                eprintln!("warning: {warning}");
            }

            let answers = db::all_answers(&pool).await?;
            let submissions = stats::summarize_submissions(&answers, &groups);
            let questions = stats::option_distribution(&answers, &groups);
            let payload = serde_json::json!({
                "submissions": submissions,
                "questions": questions,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Report { out } => {
            let groups = db::list_question_groups(&pool).await?;
            for warning in scoring::catalog_warnings(&groups) {
                eprintln!("warning: {warning}");
            }

            let answers = db::all_answers(&pool).await?;
            let submissions = stats::summarize_submissions(&answers, &groups);
            let distributions = stats::option_distribution(&answers, &groups);
            let report = report::build_report(&submissions, &distributions);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

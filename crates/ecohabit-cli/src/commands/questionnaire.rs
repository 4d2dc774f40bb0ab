//! Questionnaire capture commands for CLI.

use clap::Subcommand;
use ecohabit_core::{Config, QuestionnaireResponse};

use super::common::open_db;

#[derive(Subcommand)]
pub enum QuestionnaireAction {
    /// Record one answer
    Answer {
        /// User id
        user: i64,
        /// Question id
        question: i64,
        /// Primary yes/no answer
        answer1: String,
        /// Hardness rating 1-5, required when the behavior is not yet adopted
        answer2: Option<String>,
    },
    /// List a user's responses
    List {
        /// User id
        user: i64,
    },
}

pub fn run(action: QuestionnaireAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = open_db(&config)?;

    match action {
        QuestionnaireAction::Answer {
            user,
            question,
            answer1,
            answer2,
        } => {
            db.get_user(user)?
                .ok_or(format!("User not found: {user}"))?;
            let known = db.list_questions()?.iter().any(|q| q.id == question);
            if !known {
                return Err(format!("Question not found: {question}").into());
            }

            let response = db.record_response(&QuestionnaireResponse::new(
                user, question, answer1, answer2,
            ))?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        QuestionnaireAction::List { user } => {
            let responses = db.responses_for_user(user)?;
            println!("{}", serde_json::to_string_pretty(&responses)?);
        }
    }
    Ok(())
}

//! Catalog commands for CLI.

use clap::Subcommand;
use ecohabit_core::catalog::{builtin_questions, builtin_templates};
use ecohabit_core::Config;

use super::common::open_db;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// Install the builtin catalog into the store
    Install,
    /// List task templates
    Templates,
    /// List onboarding questions
    Questions,
}

pub fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = open_db(&config)?;

    match action {
        CatalogAction::Install => {
            let questions = builtin_questions();
            let templates = builtin_templates();
            db.install_catalog(&questions, &templates)?;
            println!(
                "Catalog installed: {} templates, {} questions",
                templates.len(),
                questions.len()
            );
        }
        CatalogAction::Templates => {
            let templates = db.list_templates()?;
            println!("{}", serde_json::to_string_pretty(&templates)?);
        }
        CatalogAction::Questions => {
            let questions = db.list_questions()?;
            println!("{}", serde_json::to_string_pretty(&questions)?);
        }
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ecohabit", version, about = "Ecohabit habit-tracking backend CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Catalog install and inspection
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Questionnaire capture
    Questionnaire {
        #[command(subcommand)]
        action: commands::questionnaire::QuestionnaireAction,
    },
    /// Assigned task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Compute task recommendations for a user
    Recommend {
        /// User id
        user: i64,
        /// Persist the shortlist as new task instances
        #[arg(long)]
        assign: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::User { action } => commands::user::run(action),
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::Questionnaire { action } => commands::questionnaire::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Recommend { user, assign } => commands::recommend::run(user, assign),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

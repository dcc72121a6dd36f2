mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod services;
mod workflow;

use std::env;

use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crate::cmd::review::ReviewArgs;
use crate::config::ActionInputs;
use crate::error::{AppError, AppResult};
use crate::infra::actions;

#[derive(Parser)]
#[command(
    name = "ai-teammate",
    author,
    version,
    about = "AI pull request reviewer for GitHub Actions"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a pull request and post the overview and detailed review.
    Review(ReviewArgs),
    /// Send a short test message to the configured model endpoint.
    Check,
    /// Show the resolved configuration (secrets masked).
    Config,
}

#[tokio::main]
async fn main() {
    logging::init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Review(ReviewArgs::default()));
    let review = matches!(command, Commands::Review(_));

    if let Err(error) = run(command).await {
        if review {
            actions::report_failure(&format!("AI review failed: {error}"));
        } else {
            eprintln!("Error: {error}");
        }
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> AppResult<()> {
    match command {
        Commands::Review(args) => {
            let outcome = cmd::review::run(ActionInputs::from_vars(env::vars()), args).await?;
            info!(
                included = outcome.summary.included_count,
                total = outcome.summary.total_count,
                overview_chars = outcome.overview.len(),
                review_chars = outcome.review.len(),
                "review posted"
            );
            Ok(())
        }
        Commands::Check => {
            match dotenvy::dotenv() {
                Ok(path) => debug!(path = %path.display(), "loaded .env"),
                Err(err) if err.not_found() => {}
                Err(err) => {
                    return Err(AppError::Configuration(format!(
                        "failed to load .env: {err}"
                    )));
                }
            }
            let reply = cmd::check::run(&ActionInputs::from_vars(env::vars())).await?;
            println!("Model replied: {reply}");
            Ok(())
        }
        Commands::Config => cmd::config::run(&ActionInputs::from_vars(env::vars())),
    }
}

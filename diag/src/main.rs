use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use gemini_core::client::GeminiClient;
use gemini_core::config::{GeminiConfig, API_KEY_ENV, BASE_URL_ENV};
use tracing::Level;

mod check;
mod listing;
mod probe;

/// Gemini relay diagnostics
///
/// Checks which models the configured key can reach, and whether a deployed
/// relay endpoint answers.
#[derive(Parser, Debug)]
#[command(name = "gemini-diag", author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Gemini API key
    #[arg(short = 'k', long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Override the API base URL
    #[arg(long, global = true, env = BASE_URL_ENV)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the models visible to the API key
    List {
        /// Only show models that accept generateContent calls
        #[arg(long)]
        generate_only: bool,
    },

    /// Send a short prompt to each model and report which ones answer
    Probe {
        /// Models to try, in order (defaults to a built-in list)
        models: Vec<String>,

        /// Keep going after the first model that works
        #[arg(long)]
        all: bool,

        /// Prompt sent to each model
        #[arg(long, default_value = "Hi")]
        prompt: String,
    },

    /// Query a deployed relay endpoint and print what it returns
    Check {
        /// Endpoint URL, e.g. https://example.netlify.app/api/ask
        url: String,

        /// Question to send
        #[arg(long, default_value = "what is freefire")]
        query: String,
    },
}

fn client(cli: &Cli) -> Result<GeminiClient> {
    let config = GeminiConfig::default().merge(&GeminiConfig {
        api_key: cli.api_key.clone(),
        model_name: None,
        base_url: cli.base_url.clone(),
    });
    GeminiClient::new(&config).map_err(|e| anyhow!("{}", e))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::List { generate_only } => {
            let raw = client(&cli)?.list_models_raw().await?;
            match listing::render_listing(&raw, *generate_only) {
                Some(lines) => {
                    println!("{}", "AVAILABLE MODELS:".bold());
                    for line in lines {
                        println!("{}", line);
                    }
                }
                None => println!("No models returned. Response: {}", raw),
            }
        }
        Commands::Probe { models, all, prompt } => {
            let models: Vec<String> = if models.is_empty() {
                probe::DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
            } else {
                models.clone()
            };

            let reports = probe::probe_models(&client(&cli)?, &models, prompt, !all).await;
            for report in &reports {
                println!("{}", report.render());
            }
            if !reports.iter().any(probe::ProbeReport::succeeded) {
                println!("\n{}", "No models were successful.".yellow());
            }
        }
        Commands::Check { url, query } => {
            let (status, body) = check::check_endpoint(url, query).await?;
            println!("Status: {}", status);
            println!("Body: {}", body);
        }
    }

    Ok(())
}

mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod page;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::page::{self as page_cmd, ExtractArgs, InputArgs};
use crate::cmd::summarize::{self, SummarizeArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::credentials::FileCredentialStore;
use crate::infra::groq::GroqClient;
use crate::services::LanguageModelService;

const LOG_ENV: &str = "JTS_LOG";

#[derive(Parser)]
#[command(name = "jts", author, version, about = "Summarize JIRA ticket pages with a language model")]
struct Cli {
    /// Log filter directive, e.g. `debug` or `jts=trace`. Defaults to $JTS_LOG, then `warn`.
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a ticket page, summarize it, and print the rendered summary.
    Summarize(SummarizeArgs),
    /// Print the fields extracted from a ticket page.
    Extract(ExtractArgs),
    /// Print the prompt that would be sent to the summarizer.
    Prompt(InputArgs),
    /// Render a summarizer reply as HTML.
    Render(InputArgs),
    /// Check whether a hostname belongs to a JIRA deployment.
    Check {
        /// Hostname to test, e.g. `acme.atlassian.net`.
        host: String,
    },
    /// Manage CLI configuration and the stored API key.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    if let Err(error) = run(cli.command).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands) -> AppResult<()> {
    match command {
        Commands::Summarize(args) => run_summarize(args).await,
        Commands::Extract(args) => page_cmd::run_extract(args),
        Commands::Prompt(args) => page_cmd::run_prompt(args),
        Commands::Render(args) => page_cmd::run_render(args),
        Commands::Check { host } => page_cmd::run_check(&host),
        Commands::Config(args) => {
            let credentials = FileCredentialStore::open_default()?;
            config_cmd::run(args.command, &credentials)
        }
    }
}

async fn run_summarize(args: SummarizeArgs) -> AppResult<()> {
    let credentials = FileCredentialStore::open_default()?;
    let config = AppConfig::load(&credentials)?;

    if config.groq_api_key.is_none() {
        warn!("Groq API key not configured; run `jts config set-key` or set JTS_GROQ_API_KEY.");
    }

    let language_model: Arc<dyn LanguageModelService> = Arc::new(GroqClient::from_config(&config));
    let context = AppContext::new(config, language_model);

    let outcome = summarize::run(&context, &args).await?;
    info!(
        issue = outcome.ticket.issue_key.as_deref().unwrap_or("?"),
        prompt_chars = outcome.prompt.chars().count(),
        "summary ready"
    );

    if args.raw {
        println!("{}", outcome.summary);
    } else {
        println!("{}", outcome.html);
    }

    Ok(())
}

use std::io::{self, Write};
use std::str::FromStr;

use clap::{Args, Subcommand};

use crate::config::{
    DEFAULT_BASE_URL, DEFAULT_MAX_PROMPT_CHARS, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, StoredConfig, config_file_path,
};
use crate::error::{AppError, AppResult};
use crate::services::{API_KEY_ENTRY, CredentialStore};

const API_KEY_PREFIX: &str = "gsk_";

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
    /// Store the Groq API key.
    SetKey {
        /// The API key value.
        key: String,
    },
    /// Forget the stored Groq API key.
    ClearKey,
}

pub fn run(command: ConfigCommand, credentials: &dyn CredentialStore) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(credentials),
        ConfigCommand::Show => run_show(credentials),
        ConfigCommand::SetKey { key } => set_key(credentials, &key),
        ConfigCommand::ClearKey => {
            credentials.remove(API_KEY_ENTRY)?;
            println!("API key cleared.");
            Ok(())
        }
    }
}

fn run_init(credentials: &dyn CredentialStore) -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring jts.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the local config directory; protect your filesystem accordingly.");
    println!();

    let mut api_key = credentials.get(API_KEY_ENTRY)?;
    apply_prompt("Groq API key", &mut api_key, true)?;
    apply_prompt("Groq model", &mut cfg.groq_model, false)?;
    apply_prompt("Groq API base URL", &mut cfg.groq_base_url, false)?;
    apply_parsed_prompt("Maximum prompt characters", &mut cfg.max_prompt_chars)?;
    apply_parsed_prompt("Sampling temperature", &mut cfg.temperature)?;
    apply_parsed_prompt("Maximum reply tokens", &mut cfg.max_tokens)?;
    if let Some(key) = &api_key {
        validate_api_key(key)?;
    }

    cfg.save()?;
    match api_key {
        Some(key) => credentials.set(API_KEY_ENTRY, &key)?,
        None => credentials.remove(API_KEY_ENTRY)?,
    }

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show(credentials: &dyn CredentialStore) -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;
    let api_key = credentials.get(API_KEY_ENTRY)?;

    println!("Configuration file: {}", path.display());
    println!("Groq API key: {}", mask_secret(&api_key));
    println!(
        "Groq model: {}",
        display_value(&cfg.groq_model, DEFAULT_MODEL)
    );
    println!(
        "Groq API base URL: {}",
        display_value(&cfg.groq_base_url, DEFAULT_BASE_URL)
    );
    println!(
        "Maximum prompt characters: {}",
        cfg.max_prompt_chars.unwrap_or(DEFAULT_MAX_PROMPT_CHARS)
    );
    println!(
        "Sampling temperature: {}",
        cfg.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    );
    println!(
        "Maximum reply tokens: {}",
        cfg.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    );

    Ok(())
}

fn set_key(credentials: &dyn CredentialStore, key: &str) -> AppResult<()> {
    let key = validate_api_key(key)?;
    credentials.set(API_KEY_ENTRY, key)?;
    println!("API key saved.");
    Ok(())
}

/// Groq keys always carry the `gsk_` prefix.
fn validate_api_key(key: &str) -> AppResult<&str> {
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::Configuration(
            "API key must not be empty".to_string(),
        ));
    }
    if !key.starts_with(API_KEY_PREFIX) {
        return Err(AppError::Configuration(format!(
            "Invalid format. Should start with \"{API_KEY_PREFIX}\""
        )));
    }
    Ok(key)
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn apply_parsed_prompt<T>(field: &str, target: &mut Option<T>) -> AppResult<()>
where
    T: FromStr + ToString,
{
    let current = target.as_ref().map(ToString::to_string);
    match prompt(field, current.as_deref(), false)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => {
            let parsed = value.parse::<T>().map_err(|_| {
                AppError::Configuration(format!("invalid value for {field}: '{value}'"))
            })?;
            *target = Some(parsed);
        }
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::parse(&input))
}

fn display_value(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| format!("{default} (default)"))
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}

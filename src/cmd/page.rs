use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Args;

use crate::domain::prompt::format_for_summary;
use crate::domain::summary::render_summary;
use crate::domain::ticket::{Ticket, TicketField};
use crate::error::{AppError, AppResult};
use crate::page::is_jira_page;
use crate::workflow::summarize::ticket_from_html;

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input file; omit or pass `-` to read stdin.
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Print the ticket as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn read_input(file: Option<&Path>) -> AppResult<String> {
    match file {
        Some(path) if path != Path::new("-") => Ok(fs::read_to_string(path)?),
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

pub fn run_extract(args: ExtractArgs) -> AppResult<()> {
    let html = read_input(args.input.file.as_deref())?;
    let ticket = ticket_from_html(&html);
    if ticket.is_empty() {
        return Err(AppError::NoTicketContent);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&ticket)
            .map_err(|err| AppError::Configuration(format!("failed to encode ticket: {err}")))?;
        println!("{json}");
    } else {
        print_ticket(&ticket);
    }
    Ok(())
}

pub fn run_prompt(args: InputArgs) -> AppResult<()> {
    let html = read_input(args.file.as_deref())?;
    let ticket = ticket_from_html(&html);
    if ticket.is_empty() {
        return Err(AppError::NoTicketContent);
    }
    println!("{}", format_for_summary(Some(&ticket)));
    Ok(())
}

pub fn run_render(args: InputArgs) -> AppResult<()> {
    let text = read_input(args.file.as_deref())?;
    println!("{}", render_summary(Some(&text)));
    Ok(())
}

pub fn run_check(host: &str) -> AppResult<()> {
    if !is_jira_page(Some(host)) {
        return Err(AppError::NotJiraPage(host.to_string()));
    }
    println!("{host} is a JIRA host");
    Ok(())
}

fn print_ticket(ticket: &Ticket) {
    for field in TicketField::ALL {
        if let Some(value) = ticket.field(field) {
            println!("{}: {value}", field.label());
        }
    }
    for comment in &ticket.comments {
        println!("COMMENT by {}: {}", comment.author, comment.body);
    }
}

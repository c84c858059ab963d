use tracing::warn;

use crate::domain::ticket::{Ticket, TicketField};

const PROMPT_HEADER: &str = "JIRA TICKET SUMMARY REQUEST";
const PROMPT_INSTRUCTION: &str = "Please provide a concise summary of this JIRA ticket, highlighting the main issue, priority, and any important context from the comments.";

/// Serializes a ticket into the labeled text block sent to the summarizer.
///
/// Present fields are emitted one per line in [`TicketField::ALL`] order, followed by
/// the flattened comments. An absent ticket yields an empty string.
pub fn format_for_summary(ticket: Option<&Ticket>) -> String {
    let Some(ticket) = ticket else {
        warn!("ticket info is required to build a summary prompt");
        return String::new();
    };

    let mut prompt = format!("{PROMPT_HEADER}\n\n");

    for field in TicketField::ALL {
        if let Some(value) = ticket.field(field) {
            prompt.push_str(&format!("{}: {value}\n", field.label()));
        }
    }

    if let Some(comments) = ticket.flattened_comments() {
        prompt.push_str(&format!("COMMENTS: {comments}\n"));
    }

    prompt.push('\n');
    prompt.push_str(PROMPT_INSTRUCTION);
    prompt
}

/// Cuts a prompt to at most `max_chars` characters.
pub fn truncate_prompt(prompt: &str, max_chars: usize) -> &str {
    match prompt.char_indices().nth(max_chars) {
        Some((index, _)) => &prompt[..index],
        None => prompt,
    }
}

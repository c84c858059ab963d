use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::domain::ticket::{Ticket, TicketField};
use crate::page::comments::extract_comments;
use crate::page::document::{PageDocument, query_all_within, text_content};

static ISSUE_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z0-9]+-\d+").expect("issue key pattern is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// A single way of reading one field from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Trimmed text of the first element matching the selector.
    Text(&'static str),
    /// Like `Text`, with inner whitespace runs collapsed to a single space.
    Collapsed(&'static str),
    /// Trimmed texts of `items` inside the first `container`, joined with `", "`.
    Joined {
        container: &'static str,
        items: &'static str,
    },
    /// Issue key pattern found in the document title.
    TitleKey,
}

impl Step {
    pub fn resolve(&self, doc: &PageDocument) -> Option<String> {
        let value = match self {
            Step::Text(selector) => doc
                .query_selector(selector)
                .map(|element| text_content(&element).trim().to_string()),
            Step::Collapsed(selector) => doc
                .query_selector(selector)
                .map(|element| collapse_whitespace(&text_content(&element))),
            Step::Joined { container, items } => doc.query_selector(container).map(|element| {
                query_all_within(&element, items)
                    .iter()
                    .map(|item| text_content(item).trim().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            }),
            Step::TitleKey => ISSUE_KEY_PATTERN
                .find(&doc.title())
                .map(|found| found.as_str().to_string()),
        };
        value.filter(|text| !text.is_empty())
    }
}

const ISSUE_KEY_CHAIN: &[Step] = &[
    Step::Text(
        r#"[data-testid="issue.views.issue-base.foundation.breadcrumbs.breadcrumb-current-issue"]"#,
    ),
    Step::TitleKey,
];

// The bare `h1` and generic description steps come last so they only apply when
// every layout-specific selector came up empty.
const SUMMARY_CHAIN: &[Step] = &[
    Step::Text(r#"[data-testid="issue.views.issue-base.foundation.summary.heading"]"#),
    Step::Text(r#"h1[data-testid*="summary"]"#),
    Step::Text("h1"),
];

const DESCRIPTION_CHAIN: &[Step] = &[
    Step::Text(
        r#"[data-testid="issue.views.issue-base.foundation.description.description-content"]"#,
    ),
    Step::Text(".descriptionWikiEditor"),
    Step::Text("#description-val .descriptionContent"),
    Step::Text("#description-val, .description"),
];

const ASSIGNEE_CHAIN: &[Step] = &[
    Step::Text(r#"[data-testid="issue.views.issue-details.issue-field.assignee"]"#),
    Step::Text("#assignee-val .user-hover"),
];

const REPORTER_CHAIN: &[Step] = &[
    Step::Text(r#"[data-testid="issue.views.issue-details.issue-field.reporter"]"#),
    Step::Text("#reporter-val .user-hover"),
];

const PRIORITY_CHAIN: &[Step] = &[
    Step::Text(r#"[data-testid="issue.views.issue-details.issue-field.priority"]"#),
    Step::Collapsed("#priority-val"),
];

const STATUS_CHAIN: &[Step] = &[
    Step::Text(r#"[data-testid="issue.views.issue-details.issue-field.status"]"#),
    Step::Text("#status-val .jira-issue-status-lozenge"),
];

const TYPE_CHAIN: &[Step] = &[
    Step::Text(r#"[data-testid="issue.views.issue-base.foundation.issue-content-wrap.type"]"#),
    Step::Collapsed("#type-val"),
];

const COMPONENTS_CHAIN: &[Step] = &[Step::Text(
    r#"[data-testid="issue.views.issue-details.issue-field.components"]"#,
)];

const LABELS_CHAIN: &[Step] = &[
    Step::Text(r#"[data-testid="issue.views.issue-details.issue-field.labels"]"#),
    Step::Joined {
        container: r#"[id^="labels-"][id$="-value"]"#,
        items: "a.lozenge",
    },
];

/// Ordered lookup steps for a field; the first non-empty result wins.
pub fn chain(field: TicketField) -> &'static [Step] {
    match field {
        TicketField::IssueKey => ISSUE_KEY_CHAIN,
        TicketField::Summary => SUMMARY_CHAIN,
        TicketField::Description => DESCRIPTION_CHAIN,
        TicketField::Assignee => ASSIGNEE_CHAIN,
        TicketField::Reporter => REPORTER_CHAIN,
        TicketField::Priority => PRIORITY_CHAIN,
        TicketField::Status => STATUS_CHAIN,
        TicketField::IssueType => TYPE_CHAIN,
        TicketField::Components => COMPONENTS_CHAIN,
        TicketField::Labels => LABELS_CHAIN,
    }
}

pub fn resolve_chain(doc: &PageDocument, steps: &[Step]) -> Option<String> {
    steps.iter().find_map(|step| step.resolve(doc))
}

/// Reads every known field from an issue page.
///
/// Missing elements only leave fields unset; an absent document yields an empty ticket.
pub fn extract_ticket(doc: Option<&PageDocument>) -> Ticket {
    let Some(doc) = doc else {
        warn!("document not available for ticket extraction");
        return Ticket::default();
    };

    let mut ticket = Ticket::default();
    for field in TicketField::ALL {
        let value = resolve_chain(doc, chain(field));
        if value.is_none() {
            debug!(field = field.label(), "no value found");
        }
        ticket.set_field(field, value);
    }
    ticket.comments = extract_comments(doc);

    ticket
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

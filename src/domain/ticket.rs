use serde::Serialize;

/// One comment scraped from the issue activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub author: String,
    pub body: String,
}

impl Comment {
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
        }
    }
}

/// Normalized fields of a JIRA issue page.
///
/// A field is `Some` only when a non-empty trimmed value was found for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}

/// The scalar fields of a [`Ticket`], in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketField {
    IssueKey,
    Summary,
    Description,
    Assignee,
    Reporter,
    Priority,
    Status,
    IssueType,
    Components,
    Labels,
}

impl TicketField {
    pub const ALL: [TicketField; 10] = [
        TicketField::IssueKey,
        TicketField::Summary,
        TicketField::Description,
        TicketField::Assignee,
        TicketField::Reporter,
        TicketField::Priority,
        TicketField::Status,
        TicketField::IssueType,
        TicketField::Components,
        TicketField::Labels,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TicketField::IssueKey => "ISSUE KEY",
            TicketField::Summary => "SUMMARY",
            TicketField::Description => "DESCRIPTION",
            TicketField::Assignee => "ASSIGNEE",
            TicketField::Reporter => "REPORTER",
            TicketField::Priority => "PRIORITY",
            TicketField::Status => "STATUS",
            TicketField::IssueType => "TYPE",
            TicketField::Components => "COMPONENTS",
            TicketField::Labels => "LABELS",
        }
    }
}

impl Ticket {
    pub fn field(&self, field: TicketField) -> Option<&str> {
        let value = match field {
            TicketField::IssueKey => &self.issue_key,
            TicketField::Summary => &self.summary,
            TicketField::Description => &self.description,
            TicketField::Assignee => &self.assignee,
            TicketField::Reporter => &self.reporter,
            TicketField::Priority => &self.priority,
            TicketField::Status => &self.status,
            TicketField::IssueType => &self.issue_type,
            TicketField::Components => &self.components,
            TicketField::Labels => &self.labels,
        };
        value.as_deref()
    }

    pub fn set_field(&mut self, field: TicketField, value: Option<String>) {
        let slot = match field {
            TicketField::IssueKey => &mut self.issue_key,
            TicketField::Summary => &mut self.summary,
            TicketField::Description => &mut self.description,
            TicketField::Assignee => &mut self.assignee,
            TicketField::Reporter => &mut self.reporter,
            TicketField::Priority => &mut self.priority,
            TicketField::Status => &mut self.status,
            TicketField::IssueType => &mut self.issue_type,
            TicketField::Components => &mut self.components,
            TicketField::Labels => &mut self.labels,
        };
        *slot = value;
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty() && TicketField::ALL.iter().all(|f| self.field(*f).is_none())
    }

    /// Comments flattened to `"author: body"` entries separated by a blank line.
    pub fn flattened_comments(&self) -> Option<String> {
        if self.comments.is_empty() {
            return None;
        }
        let joined = self
            .comments
            .iter()
            .map(|comment| format!("{}: {}", comment.author, comment.body))
            .collect::<Vec<_>>()
            .join("\n\n");
        Some(joined)
    }
}

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

static BOLD_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold marker pattern is valid"));

const BULLET_PREFIXES: [&str; 3] = ["• ", "* ", "- "];

/// The five section headers the summarizer is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLabel {
    MainObjective,
    KeyDetails,
    Contributors,
    KeyTimelines,
    NextSteps,
}

impl SectionLabel {
    pub const ALL: [SectionLabel; 5] = [
        SectionLabel::MainObjective,
        SectionLabel::KeyDetails,
        SectionLabel::Contributors,
        SectionLabel::KeyTimelines,
        SectionLabel::NextSteps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionLabel::MainObjective => "Main Objective:",
            SectionLabel::KeyDetails => "Key Details:",
            SectionLabel::Contributors => "Contributors:",
            SectionLabel::KeyTimelines => "Key Timelines:",
            SectionLabel::NextSteps => "Next Steps:",
        }
    }

    /// Recognizes a trimmed line that starts with one of the known labels.
    pub fn detect(line: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|label| line.starts_with(label.as_str()))
    }
}

/// A header line and the bullets collected beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub label: SectionLabel,
    pub heading: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
    Heading(String),
    Section(Section),
}

impl Block {
    fn write_html(&self, out: &mut String) {
        match self {
            Block::Paragraph(text) => {
                out.push_str(&format!("<p>{}</p>", escape_html(text)));
            }
            Block::Heading(text) => {
                out.push_str(&format!("<h3>{}</h3>", escape_html(text)));
            }
            Block::Section(section) => {
                out.push_str(&format!("<h3>{}</h3>", escape_html(&section.heading)));
                out.push_str("<ul class=\"section-list\">");
                for bullet in &section.bullets {
                    out.push_str(&format!(
                        "<li class=\"bullet-item\">{}</li>",
                        escape_html(bullet)
                    ));
                }
                out.push_str("</ul>");
            }
        }
    }
}

/// Splits a summarizer reply into paragraphs, headings and bullet sections.
///
/// Bullets accumulate until a header that already has bullets is replaced, so bullets
/// written before the first header belong to it. A header replaced before any bullet
/// arrived is dropped. Loose lines are kept as paragraphs only until the first header.
///
/// Unlike a plain line-by-line HTML substitution, `### ` lines become standalone `<h3>`
/// blocks rather than `<h3>` nested in `<p>`, and all reply text is HTML-escaped when
/// rendered.
pub fn parse_summary(text: &str) -> Vec<Block> {
    let stripped = BOLD_MARKERS.replace_all(text, "$1");

    let mut blocks = Vec::new();
    let mut current: Option<(SectionLabel, String)> = None;
    let mut pending: Vec<String> = Vec::new();

    for line in stripped.lines() {
        let trimmed = line.trim();

        if let Some(label) = SectionLabel::detect(trimmed) {
            flush_section(&mut blocks, current.take(), &mut pending);
            current = Some((label, trimmed.to_string()));
        } else if let Some(bullet) = strip_bullet(trimmed) {
            pending.push(bullet.to_string());
        } else if !trimmed.is_empty() && current.is_none() {
            match line.strip_prefix("### ") {
                Some(heading) => blocks.push(Block::Heading(heading.to_string())),
                None => blocks.push(Block::Paragraph(trimmed.to_string())),
            }
        }
    }
    flush_section(&mut blocks, current, &mut pending);

    blocks
}

/// Renders a summarizer reply as an HTML fragment.
pub fn render_summary(text: Option<&str>) -> String {
    let Some(text) = text else {
        warn!("summary text must be a string");
        return String::new();
    };

    let mut html = String::new();
    for block in parse_summary(text) {
        block.write_html(&mut html);
    }
    html
}

fn flush_section(
    blocks: &mut Vec<Block>,
    header: Option<(SectionLabel, String)>,
    pending: &mut Vec<String>,
) {
    let Some((label, heading)) = header else {
        return;
    };
    if pending.is_empty() {
        debug!(label = label.as_str(), "dropping section without bullets");
        return;
    }
    blocks.push(Block::Section(Section {
        label,
        heading,
        bullets: std::mem::take(pending),
    }));
}

fn strip_bullet(line: &str) -> Option<&str> {
    BULLET_PREFIXES
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

use scraper::ElementRef;
use tracing::debug;

use crate::domain::ticket::Comment;
use crate::page::document::{PageDocument, query_within, text_content};

const UNKNOWN_AUTHOR: &str = "Unknown";

/// One way of locating comments on a page layout.
struct CommentStrategy {
    name: &'static str,
    blocks: &'static str,
    authors: &'static [&'static str],
    contents: &'static [&'static str],
    /// Bodies at or below this many characters are skipped as activity noise.
    noise_chars: Option<usize>,
}

const STRATEGIES: [CommentStrategy; 3] = [
    CommentStrategy {
        name: "cloud",
        blocks: r#"[data-testid="comment"]"#,
        authors: &[
            r#"[data-testid*="author"]"#,
            r#"[data-testid="comment-author"]"#,
        ],
        contents: &[
            r#"[data-testid*="comment-content"]"#,
            r#"[data-testid="comment-content"]"#,
        ],
        noise_chars: None,
    },
    CommentStrategy {
        name: "legacy-block",
        blocks: r#".issue-data-block.comment-block, [role="region"] div[aria-label*="comment"]"#,
        authors: &[".user-hover, .comment-author"],
        contents: &[".comment-body, .ak-renderer-wrapper"],
        noise_chars: None,
    },
    CommentStrategy {
        name: "activity",
        blocks: ".activity-comment, .comment, .issue-data-item",
        authors: &[".author, .user-fullname, .user-link"],
        contents: &[".action-body, .comment-body, .activity-content"],
        noise_chars: Some(10),
    },
];

impl CommentStrategy {
    fn collect(&self, doc: &PageDocument) -> Vec<Comment> {
        doc.query_selector_all(self.blocks)
            .iter()
            .filter_map(|block| self.read_block(block))
            .collect()
    }

    fn read_block(&self, block: &ElementRef<'_>) -> Option<Comment> {
        let author = first_text(block, self.authors).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        let body = first_text(block, self.contents)
            .unwrap_or_else(|| text_content(block).trim().to_string());

        if let Some(limit) = self.noise_chars {
            if body.chars().count() <= limit {
                return None;
            }
        }
        Some(Comment::new(author, body))
    }
}

/// Collects comments from every known layout, in strategy order then document order.
///
/// Results from different strategies are appended without deduplication.
pub fn extract_comments(doc: &PageDocument) -> Vec<Comment> {
    let mut comments = Vec::new();
    for strategy in &STRATEGIES {
        let found = strategy.collect(doc);
        debug!(strategy = strategy.name, count = found.len(), "collected comments");
        comments.extend(found);
    }
    comments
}

fn first_text(block: &ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        let element = query_within(block, selector)?;
        let text = text_content(&element).trim().to_string();
        (!text.is_empty()).then_some(text)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_cloud_comments_with_unknown_default() {
        let doc = PageDocument::parse(
            r#"<div data-testid="comment">
                 <span data-testid="comment-author"> Alice Johnson </span>
                 <div data-testid="comment-content"> This is a sample comment. </div>
               </div>
               <div data-testid="comment">
                 <div data-testid="comment-content">Anonymous note</div>
               </div>"#,
        );
        assert_eq!(
            extract_comments(&doc),
            vec![
                Comment::new("Alice Johnson", "This is a sample comment."),
                Comment::new("Unknown", "Anonymous note"),
            ]
        );
    }

    #[test]
    fn reads_legacy_blocks() {
        let doc = PageDocument::parse(
            r#"<div class="issue-data-block comment-block">
                 <a class="user-hover">Bob</a>
                 <div class="comment-body">Deployed to QA</div>
               </div>"#,
        );
        assert_eq!(
            extract_comments(&doc),
            vec![Comment::new("Bob", "Deployed to QA")]
        );
    }

    #[test]
    fn filters_short_activity_entries() {
        let doc = PageDocument::parse(
            r#"<div class="activity-comment">
                 <span class="author">Carol</span>
                 <div class="action-body">liked this</div>
               </div>
               <div class="activity-comment">
                 <span class="author">Dan</span>
                 <div class="action-body">Root cause is the cache TTL</div>
               </div>"#,
        );
        assert_eq!(
            extract_comments(&doc),
            vec![Comment::new("Dan", "Root cause is the cache TTL")]
        );
    }

    #[test]
    fn falls_back_to_block_text() {
        let doc = PageDocument::parse(
            r#"<div class="issue-data-item">  Plain activity text without markup  </div>"#,
        );
        assert_eq!(
            extract_comments(&doc),
            vec![Comment::new("Unknown", "Plain activity text without markup")]
        );
    }

    #[test]
    fn orders_by_strategy_before_document_position() {
        let doc = PageDocument::parse(
            r#"<div class="activity-comment">
                 <span class="author">Dan</span>
                 <div class="action-body">Root cause is the cache TTL</div>
               </div>
               <div class="issue-data-block comment-block">
                 <a class="user-hover">Bob</a>
                 <div class="comment-body">Deployed to QA</div>
               </div>
               <div data-testid="comment">
                 <span data-testid="comment-author">Alice</span>
                 <div data-testid="comment-content">Cloud note</div>
               </div>"#,
        );
        assert_eq!(
            extract_comments(&doc),
            vec![
                Comment::new("Alice", "Cloud note"),
                Comment::new("Bob", "Deployed to QA"),
                Comment::new("Dan", "Root cause is the cache TTL"),
            ]
        );
    }

    #[test]
    fn no_comment_markup_yields_nothing() {
        let doc = PageDocument::parse("<p>nothing here</p>");
        assert!(extract_comments(&doc).is_empty());
    }
}

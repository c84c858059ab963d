use tracing::info;

use crate::context::AppContext;
use crate::domain::prompt::{format_for_summary, truncate_prompt};
use crate::domain::summary::render_summary;
use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult};
use crate::page::{PageDocument, extract_ticket, is_jira_page};

#[derive(Debug, Clone)]
pub struct SummarizeRequest {
    pub hostname: Option<String>,
    pub html: String,
}

pub struct SummaryOutcome {
    pub ticket: Ticket,
    pub prompt: String,
    pub summary: String,
    pub html: String,
}

/// Reads a ticket off `html` without touching the summarizer.
pub fn ticket_from_html(html: &str) -> Ticket {
    let document = PageDocument::parse(html);
    extract_ticket(Some(&document))
}

pub async fn summarize_page(
    ctx: &AppContext,
    request: SummarizeRequest,
) -> AppResult<SummaryOutcome> {
    if !is_jira_page(request.hostname.as_deref()) {
        return Err(AppError::NotJiraPage(
            request.hostname.unwrap_or_else(|| "<unknown host>".to_string()),
        ));
    }

    let ticket = ticket_from_html(&request.html);
    if ticket.is_empty() {
        return Err(AppError::NoTicketContent);
    }

    let formatted = format_for_summary(Some(&ticket));
    let prompt = truncate_prompt(&formatted, ctx.config.max_prompt_chars).to_string();
    info!(issue = ticket.issue_key.as_deref().unwrap_or("?"), "summarizing ticket");
    let summary = ctx.language_model.summarize(&prompt).await?;

    let html = render_summary(Some(&summary));

    Ok(SummaryOutcome {
        ticket,
        prompt,
        summary,
        html,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::config::AppConfig;
    use crate::services::LanguageModelService;

    const PAGE: &str = r#"<html><head><title>[WEB-12] Checkout</title></head><body>
<h1 data-testid="issue.views.issue-base.foundation.summary.heading">Checkout button unresponsive</h1>
<div data-testid="issue.views.issue-details.issue-field.priority">Highest</div>
</body></html>"#;

    const REPLY: &str = "Main Objective:\n• Restore the checkout button\nNext Steps:\n- Patch the handler";

    struct FakeModel {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeModel {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LanguageModelService for FakeModel {
        async fn summarize(&self, prompt: &str) -> AppResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(AppError::LanguageModel)
        }
    }

    fn context(model: Arc<FakeModel>, max_prompt_chars: usize) -> AppContext {
        let config = AppConfig {
            groq_api_key: Some("key".to_string()),
            groq_model: "fake".to_string(),
            groq_base_url: "http://localhost".to_string(),
            max_prompt_chars,
            temperature: 0.3,
            max_tokens: 800,
        };
        AppContext::new(config, model)
    }

    fn request(host: &str, html: &str) -> SummarizeRequest {
        SummarizeRequest {
            hostname: Some(host.to_string()),
            html: html.to_string(),
        }
    }

    #[tokio::test]
    async fn summarizes_jira_page() {
        let model = FakeModel::replying(REPLY);
        let ctx = context(model.clone(), 10_000);

        let outcome = summarize_page(&ctx, request("acme.atlassian.net", PAGE))
            .await
            .unwrap();

        assert_eq!(outcome.ticket.issue_key.as_deref(), Some("WEB-12"));
        assert!(outcome.prompt.contains("PRIORITY: Highest\n"));
        assert_eq!(model.prompts.lock().unwrap()[0], outcome.prompt);
        assert_eq!(outcome.summary, REPLY);
        assert!(outcome.html.contains("<h3>Next Steps:</h3>"));
    }

    #[tokio::test]
    async fn rejects_non_jira_host() {
        let model = FakeModel::replying(REPLY);
        let ctx = context(model.clone(), 10_000);

        let err = summarize_page(&ctx, request("example.com", PAGE))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::NotJiraPage(_)));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn rejects_page_without_ticket_content() {
        let model = FakeModel::replying(REPLY);
        let ctx = context(model.clone(), 10_000);

        let err = summarize_page(&ctx, request("jira.acme.io", "<p>login</p>"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::NoTicketContent));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn passes_model_failure_through() {
        let ctx = context(FakeModel::failing("rate limited"), 10_000);

        let err = summarize_page(&ctx, request("acme.atlassian.net", PAGE))
            .await
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "language model error: rate limited");
    }

    #[tokio::test]
    async fn truncates_prompt_before_summarizing() {
        let model = FakeModel::replying(REPLY);
        let ctx = context(model.clone(), 40);

        let outcome = summarize_page(&ctx, request("acme.atlassian.net", PAGE))
            .await
            .unwrap();
        assert_eq!(outcome.prompt.chars().count(), 40);
        assert!(outcome.prompt.starts_with("JIRA TICKET SUMMARY REQUEST"));
    }

    #[tokio::test]
    async fn every_run_calls_the_model() {
        let model = FakeModel::replying(REPLY);
        let ctx = context(model.clone(), 10_000);

        for _ in 0..2 {
            let outcome = summarize_page(&ctx, request("acme.atlassian.net", PAGE))
                .await
                .unwrap();
            assert_eq!(outcome.summary, REPLY);
        }
        assert_eq!(model.calls(), 2);
    }
}

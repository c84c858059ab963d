use std::path::PathBuf;

use clap::Args;
use reqwest::Url;

use crate::cmd::page::read_input;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::workflow::summarize::{SummarizeRequest, SummaryOutcome, summarize_page};

#[derive(Args, Debug, Clone)]
pub struct SummarizeArgs {
    /// Saved issue page HTML; omit or pass `-` to read stdin.
    pub file: Option<PathBuf>,
    /// Address the page was loaded from.
    #[arg(long, conflicts_with = "host")]
    pub url: Option<String>,
    /// Hostname the page was loaded from.
    #[arg(long)]
    pub host: Option<String>,
    /// Print the model reply as text instead of HTML.
    #[arg(long)]
    pub raw: bool,
}

impl SummarizeArgs {
    fn hostname(&self) -> AppResult<Option<String>> {
        if let Some(url) = &self.url {
            let parsed = Url::parse(url)
                .map_err(|err| AppError::Configuration(format!("invalid page URL '{url}': {err}")))?;
            return Ok(parsed.host_str().map(str::to_string));
        }
        Ok(self.host.clone())
    }
}

pub async fn run(ctx: &AppContext, args: &SummarizeArgs) -> AppResult<SummaryOutcome> {
    let request = SummarizeRequest {
        hostname: args.hostname()?,
        html: read_input(args.file.as_deref())?,
    };
    summarize_page(ctx, request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(url: Option<&str>, host: Option<&str>) -> SummarizeArgs {
        SummarizeArgs {
            file: None,
            url: url.map(str::to_string),
            host: host.map(str::to_string),
            raw: false,
        }
    }

    #[test]
    fn hostname_from_url() {
        let args = args(Some("https://acme.atlassian.net/browse/WEB-12"), None);
        assert_eq!(args.hostname().unwrap().as_deref(), Some("acme.atlassian.net"));
    }

    #[test]
    fn hostname_from_flag() {
        let args = args(None, Some("jira.acme.io"));
        assert_eq!(args.hostname().unwrap().as_deref(), Some("jira.acme.io"));
    }

    #[test]
    fn invalid_url_is_reported() {
        let err = args(Some("not a url"), None).hostname().unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}

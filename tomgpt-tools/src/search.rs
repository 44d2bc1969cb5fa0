use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tomgpt_core::{Tool, ToolError};

pub const SEARCH_NAME: &str = "Search";
pub const SEARCH_DESCRIPTION: &str =
    "useful for when you need to answer questions about current events. You should ask targeted questions";
pub const NO_SEARCH_RESULT: &str = "No good DuckDuckGo Search Result was found";
pub const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com";

const DEFAULT_MAX_RESULTS: usize = 5;
const DEFAULT_REGION: &str = "wt-wt";
const SNIPPET_SELECTOR: &str = ".result__snippet";

/// The `Search` tool: scrapes result snippets from DuckDuckGo's HTML endpoint.
#[derive(Clone, Debug)]
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    base_url: String,
    region: String,
    max_results: usize,
}

impl DuckDuckGoSearch {
    pub fn new() -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; tomgpt)")
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        Ok(Self {
            client,
            base_url: DUCKDUCKGO_HTML_URL.to_string(),
            region: DEFAULT_REGION.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Result snippets for `query`, best first.
    pub async fn snippets(&self, query: &str) -> Result<Vec<String>, ToolError> {
        let url = format!("{}/html/", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("kl", self.region.as_str())])
            .send()
            .await
            .map_err(|err| ToolError::ExecutionFailed(format!("search request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::ExecutionFailed(format!(
                "DuckDuckGo returned HTTP {status}"
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|err| ToolError::ExecutionFailed(format!("search request failed: {err}")))?;
        extract_snippets(&html, self.max_results)
    }
}

fn extract_snippets(html: &str, limit: usize) -> Result<Vec<String>, ToolError> {
    let selector = Selector::parse(SNIPPET_SELECTOR)
        .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .map(|element| {
            element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|snippet| !snippet.is_empty())
        .take(limit)
        .collect())
}

#[async_trait]
impl Tool for DuckDuckGoSearch {
    fn name(&self) -> &str {
        SEARCH_NAME
    }

    fn description(&self) -> &str {
        SEARCH_DESCRIPTION
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let query = input.trim();
        if query.is_empty() {
            return Err(ToolError::InvalidInput(
                "search query must not be empty".to_string(),
            ));
        }
        tracing::debug!(query, "searching DuckDuckGo");
        let snippets = self.snippets(query).await?;
        if snippets.is_empty() {
            return Ok(NO_SEARCH_RESULT.to_string());
        }
        Ok(snippets.join(" "))
    }
}

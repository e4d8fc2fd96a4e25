//! Web search for the research agent, backed by the Tavily API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Tool;

pub const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Settings for [`WebSearch`].
#[derive(Debug, Clone)]
pub struct WebSearchConfig {
    pub api_key: String,
    pub endpoint: String,
    /// Results per query
    pub max_results: u32,
    pub timeout: Duration,
}

impl WebSearchConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: TAVILY_SEARCH_URL.to_string(),
            max_results: 3,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Search the web using Tavily.
pub struct WebSearch {
    client: Client,
    config: WebSearchConfig,
}

impl WebSearch {
    pub fn new(config: WebSearchConfig) -> anyhow::Result<Self> {
        if config.api_key.trim().is_empty() {
            anyhow::bail!("Tavily API key is empty");
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

/// Tavily API request body.
#[derive(Debug, Serialize)]
struct TavilySearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
    include_answer: bool,
    include_raw_content: bool,
}

/// Tavily API response.
#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

/// A single result from Tavily.
#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

#[async_trait]
impl Tool for WebSearch {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for real-time information. Returns search results with titles, snippets and URLs. Use for finding city guidelines, regulations, fines, or any current information you need."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let query = args["query"]
            .as_str()
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Missing 'query' argument"))?;

        let request = TavilySearchRequest {
            api_key: &self.config.api_key,
            query,
            max_results: self.config.max_results,
            include_answer: false,
            include_raw_content: false,
        };

        tracing::debug!("Searching the web: {:?}", query);

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!("Tavily search failed with {}", status);
            anyhow::bail!("Tavily API error ({}): {}", status, error_text);
        }

        let tavily_response: TavilySearchResponse = response.json().await?;
        Ok(format_results(query, &tavily_response.results))
    }
}

fn format_results(query: &str, results: &[TavilyResult]) -> String {
    if results.is_empty() {
        return format!("No results found for: {}", query);
    }

    let mut output = String::new();
    for (i, result) in results.iter().enumerate() {
        output.push_str(&format!(
            "### {}. {}\n**URL:** {}\n\n{}\n\n",
            i + 1,
            result.title,
            result.url,
            result.content
        ));
    }
    output
}

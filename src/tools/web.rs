//! Web search through DuckDuckGo's HTML endpoint (no API key needed).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;

const DDG_HTML_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Search the web and return titles, snippets and URLs.
pub struct WebSearch {
    client: reqwest::Client,
    endpoint: String,
    max_results: usize,
}

impl WebSearch {
    /// Build the search tool with its own HTTP client.
    pub fn new(max_results: usize) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; AgentRelay/0.1)")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            endpoint: DDG_HTML_ENDPOINT.to_string(),
            max_results: max_results.max(1),
        })
    }
}

#[async_trait]
impl Tool for WebSearch {
    fn name(&self) -> &str {
        "duckduckgo_search"
    }

    fn description(&self) -> &str {
        "Search the web for current information. Input is a search query; returns result titles, snippets and URLs."
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
            .ok_or_else(|| anyhow::anyhow!("Missing 'query' argument"))?;

        let url = format!("{}?q={}", self.endpoint, urlencoding::encode(query));
        tracing::debug!(query, "Running web search");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("Search request failed: HTTP {}", status));
        }
        let html = response.text().await?;

        let results = extract_ddg_results(&html, self.max_results);

        if results.is_empty() {
            Ok(format!("No results found for: {}", query))
        } else {
            Ok(results.join("\n\n"))
        }
    }
}

/// Extract up to `limit` results from DuckDuckGo HTML.
fn extract_ddg_results(html: &str, limit: usize) -> Vec<String> {
    html.split("class=\"result__body\"")
        .skip(1)
        .filter_map(|chunk| {
            let title = field_text(chunk, "result__a")?;
            let snippet =
                field_text(chunk, "result__snippet").unwrap_or_else(|| "No snippet".to_string());
            let url = field_text(chunk, "result__url").unwrap_or_default();

            Some(format!(
                "**{}**\n{}\nURL: {}",
                html_decode(&title),
                html_decode(&snippet),
                url
            ))
        })
        .take(limit)
        .collect()
}

/// Text of the first `<a>` carrying `class="{class}"` in the chunk.
///
/// DuckDuckGo highlights matched words with `<b>`, so inner tags are
/// stripped rather than ending the text.
fn field_text(chunk: &str, class: &str) -> Option<String> {
    let element = chunk.split(&format!("class=\"{}\"", class)).nth(1)?;
    let (_, inner) = element.split_once('>')?;
    let inner = inner.split("</a>").next().unwrap_or(inner);

    // Outside-tag text sits at the even positions.
    let text: String = inner.split(['<', '>']).step_by(2).collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
}

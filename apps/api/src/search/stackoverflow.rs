use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{SearchClient, SearchError, SearchHit, RESULTS_PER_QUERY, USER_AGENT};

const STACK_EXCHANGE_API_URL: &str = "https://api.stackexchange.com/2.3";

#[derive(Debug, Deserialize)]
struct QuestionSearch {
    #[serde(default)]
    items: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct Question {
    title: String,
    link: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    score: i64,
}

/// Stack Exchange advanced search against stackoverflow.com.
#[derive(Clone)]
pub struct StackOverflowSearch {
    client: Client,
    api_base: String,
}

impl StackOverflowSearch {
    pub fn new(timeout: Duration) -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .gzip(true)
                .build()?,
            api_base: STACK_EXCHANGE_API_URL.to_string(),
        })
    }
}

/// Titles come back HTML-escaped.
fn unescape_html(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn hits_from_body(body: &str) -> Result<Vec<SearchHit>, SearchError> {
    let search: QuestionSearch = serde_json::from_str(body)?;
    Ok(search
        .items
        .into_iter()
        .map(|q| {
            let snippet = (!q.tags.is_empty())
                .then(|| format!("Score {} · tagged {}", q.score, q.tags.join(", ")));
            SearchHit {
                title: unescape_html(&q.title),
                url: q.link,
                snippet,
            }
        })
        .collect())
}

#[async_trait]
impl SearchClient for StackOverflowSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let pagesize = RESULTS_PER_QUERY.to_string();
        let response = self
            .client
            .get(format!("{}/search/advanced", self.api_base))
            .query(&[
                ("order", "desc"),
                ("sort", "votes"),
                ("q", query),
                ("site", "stackoverflow"),
                ("pagesize", pagesize.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }

        let hits = hits_from_body(&response.text().await?)?;
        debug!("Stack Overflow search '{query}' returned {} hits", hits.len());
        Ok(hits)
    }

    fn platform(&self) -> &'static str {
        "Stack Overflow"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_from_body_unescapes_titles() {
        let body = r#"{
            "items": [
                {"title": "What&#39;s the difference between &quot;let&quot; and &quot;var&quot;?", "link": "https://stackoverflow.com/questions/762011", "tags": ["javascript", "scope"], "score": 5000},
                {"title": "Plain", "link": "https://stackoverflow.com/questions/1"}
            ],
            "has_more": true,
            "quota_remaining": 290
        }"#;
        let hits = hits_from_body(body).unwrap();
        assert_eq!(
            hits[0].title,
            r#"What's the difference between "let" and "var"?"#
        );
        assert_eq!(
            hits[0].snippet.as_deref(),
            Some("Score 5000 · tagged javascript, scope")
        );
        assert_eq!(hits[1].snippet, None);
    }

    #[test]
    fn test_unescape_ampersand_last() {
        assert_eq!(unescape_html("a &amp;lt; b"), "a &lt; b");
    }
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{SearchClient, SearchError, SearchHit, RESULTS_PER_QUERY, USER_AGENT};

const GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct RepositorySearch {
    #[serde(default)]
    items: Vec<Repository>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    full_name: String,
    html_url: String,
    description: Option<String>,
}

/// GitHub repository search (`GET /search/repositories`), sorted by stars.
#[derive(Clone)]
pub struct GithubSearch {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl GithubSearch {
    pub fn new(token: Option<String>, timeout: Duration) -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()?,
            api_base: GITHUB_API_URL.to_string(),
            token,
        })
    }
}

fn hits_from_body(body: &str) -> Result<Vec<SearchHit>, SearchError> {
    let search: RepositorySearch = serde_json::from_str(body)?;
    Ok(search
        .items
        .into_iter()
        .map(|repo| SearchHit {
            title: repo.full_name,
            url: repo.html_url,
            snippet: repo.description,
        })
        .collect())
}

#[async_trait]
impl SearchClient for GithubSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let per_page = RESULTS_PER_QUERY.to_string();
        let mut request = self
            .client
            .get(format!("{}/search/repositories", self.api_base))
            .header("Accept", "application/vnd.github+json")
            .query(&[
                ("q", query),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }

        let hits = hits_from_body(&response.text().await?)?;
        debug!("GitHub search '{query}' returned {} hits", hits.len());
        Ok(hits)
    }

    fn platform(&self) -> &'static str {
        "GitHub"
    }
}

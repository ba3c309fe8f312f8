//! Parallel aggregation: one independent request per search category, awaited together.
//!
//! Each task gets its own deadline. A failed, timed-out or panicked task leaves its
//! slot empty; it never fails the whole aggregation. Tasks write to disjoint slots,
//! so there is no shared state between siblings.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::models::resource::{CategoryMap, Resource};
use crate::search::{SearchClient, SearchError};

/// Categories the fan-out queries. Courses are split by price afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchCategory {
    Docs,
    Blogs,
    Videos,
    Courses,
}

impl SearchCategory {
    pub const ALL: [SearchCategory; 4] = [
        SearchCategory::Docs,
        SearchCategory::Blogs,
        SearchCategory::Videos,
        SearchCategory::Courses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchCategory::Docs => "docs",
            SearchCategory::Blogs => "blogs",
            SearchCategory::Videos => "videos",
            SearchCategory::Courses => "courses",
        }
    }
}

/// One per-category resource source.
#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn fetch(&self, topic: &str) -> Result<Vec<Resource>, SearchError>;
}

/// A `CategorySource` backed by a `SearchClient` with a fixed query suffix.
pub struct SearchSource {
    client: Arc<dyn SearchClient>,
    query_suffix: &'static str,
    price: Option<&'static str>,
}

impl SearchSource {
    pub fn new(
        client: Arc<dyn SearchClient>,
        query_suffix: &'static str,
        price: Option<&'static str>,
    ) -> Self {
        Self {
            client,
            query_suffix,
            price,
        }
    }

    fn query(&self, topic: &str) -> String {
        if self.query_suffix.is_empty() {
            topic.to_string()
        } else {
            format!("{topic} {}", self.query_suffix)
        }
    }
}

#[async_trait]
impl CategorySource for SearchSource {
    async fn fetch(&self, topic: &str) -> Result<Vec<Resource>, SearchError> {
        let platform = self.client.platform();
        let hits = self.client.search(&self.query(topic)).await?;
        Ok(hits
            .into_iter()
            .map(|hit| hit.into_resource(platform, self.price))
            .collect())
    }
}

/// Fan-out result. All four slots always exist; failed categories are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedResources {
    pub docs: Vec<Resource>,
    pub blogs: Vec<Resource>,
    pub videos: Vec<Resource>,
    pub courses: Vec<Resource>,
}

impl AggregatedResources {
    pub fn get(&self, category: SearchCategory) -> &[Resource] {
        match category {
            SearchCategory::Docs => &self.docs,
            SearchCategory::Blogs => &self.blogs,
            SearchCategory::Videos => &self.videos,
            SearchCategory::Courses => &self.courses,
        }
    }

    fn slot_mut(&mut self, category: SearchCategory) -> &mut Vec<Resource> {
        match category {
            SearchCategory::Docs => &mut self.docs,
            SearchCategory::Blogs => &mut self.blogs,
            SearchCategory::Videos => &mut self.videos,
            SearchCategory::Courses => &mut self.courses,
        }
    }

    /// Maps onto the five learning-path categories, splitting courses by price.
    pub fn into_categories(self) -> CategoryMap {
        let (free_courses, paid_courses): (Vec<_>, Vec<_>) =
            self.courses.into_iter().partition(Resource::is_free);
        CategoryMap {
            docs: self.docs,
            blogs: self.blogs,
            videos: self.videos,
            free_courses,
            paid_courses,
        }
    }
}

pub struct Aggregator {
    sources: Vec<(SearchCategory, Arc<dyn CategorySource>)>,
    per_call_timeout: Duration,
}

impl Aggregator {
    pub fn new(per_call_timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            per_call_timeout,
        }
    }

    /// Registers the source for a category, replacing any previous one.
    pub fn with_source(
        mut self,
        category: SearchCategory,
        source: Arc<dyn CategorySource>,
    ) -> Self {
        self.sources.retain(|(c, _)| *c != category);
        self.sources.push((category, source));
        self
    }

    /// Default wiring over GitHub and Stack Overflow.
    pub fn with_search_clients(
        per_call_timeout: Duration,
        github: Arc<dyn SearchClient>,
        stackoverflow: Arc<dyn SearchClient>,
    ) -> Self {
        Self::new(per_call_timeout)
            .with_source(
                SearchCategory::Docs,
                Arc::new(SearchSource::new(Arc::clone(&github), "documentation", Some("Free"))),
            )
            .with_source(
                SearchCategory::Blogs,
                Arc::new(SearchSource::new(stackoverflow, "", Some("Free"))),
            )
            .with_source(
                SearchCategory::Videos,
                Arc::new(SearchSource::new(Arc::clone(&github), "tutorial", Some("Free"))),
            )
            .with_source(
                SearchCategory::Courses,
                Arc::new(SearchSource::new(github, "course", Some("Free"))),
            )
    }

    /// Runs every source concurrently and collects whatever succeeded.
    pub async fn aggregate(&self, topic: &str) -> AggregatedResources {
        let mut tasks = JoinSet::new();

        for (category, source) in &self.sources {
            let category = *category;
            let source = Arc::clone(source);
            let topic = topic.to_string();
            let deadline = self.per_call_timeout;
            tasks.spawn(async move {
                let outcome = timeout(deadline, source.fetch(&topic)).await;
                (category, outcome)
            });
        }

        let mut aggregated = AggregatedResources::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((category, Ok(Ok(resources)))) => {
                    debug!(
                        "Aggregation: {} returned {} resources",
                        category.as_str(),
                        resources.len()
                    );
                    *aggregated.slot_mut(category) = resources;
                }
                Ok((category, Ok(Err(e)))) => {
                    warn!("Aggregation: {} failed: {e}", category.as_str());
                }
                Ok((category, Err(_))) => {
                    warn!(
                        "Aggregation: {} timed out after {:?}",
                        category.as_str(),
                        self.per_call_timeout
                    );
                }
                Err(e) => {
                    warn!("Aggregation task did not complete: {e}");
                }
            }
        }

        let empty: Vec<&str> = SearchCategory::ALL
            .into_iter()
            .filter(|c| aggregated.get(*c).is_empty())
            .map(|c| c.as_str())
            .collect();
        if !empty.is_empty() {
            debug!("Aggregation for '{topic}' left empty: {}", empty.join(", "));
        }

        aggregated
    }
}

//! Turns a topic into a complete `LearningPath`.
//!
//! Tiers, in order, until one yields resources:
//!   1. AI: one chat-completions call, strictly parsed
//!   2. Template: hand-curated table, substring match on the topic
//!   3. Search: parallel aggregation over public search APIs (optional)
//!   4. Generic: search-engine links built from the topic
//!
//! Nothing in here returns an error. Every failure is logged and degrades to the
//! next tier, so the caller always gets a full path.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::aggregation::Aggregator;
use crate::curation::parser::{parse_curation, CurationError};
use crate::curation::prompts::{CURATION_PERSONA, CURATION_PROMPT_TEMPLATE};
use crate::curation::templates::{find_template, generic_categories};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, REAL_LINKS_INSTRUCTION};
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::resource::{CategoryMap, LearningPath};

pub const DEFAULT_MAX_AI_FAILURES: u32 = 3;
pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(30);

/// Which tier produced a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Ai,
    Template,
    Search,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curation {
    pub path: LearningPath,
    pub tier: Tier,
}

#[derive(Debug, Error)]
enum AiFailure {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] CurationError),
}

/// Counts consecutive AI failures. Once the count reaches the threshold the AI
/// tier is skipped; any success resets it.
#[derive(Debug)]
pub struct FailureGate {
    consecutive: AtomicU32,
    threshold: u32,
}

impl FailureGate {
    pub fn new(threshold: u32) -> Self {
        Self {
            consecutive: AtomicU32::new(0),
            threshold,
        }
    }

    pub fn is_tripped(&self) -> bool {
        self.failures() >= self.threshold
    }

    pub fn failures(&self) -> u32 {
        self.consecutive.load(Ordering::Relaxed)
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Returns the new consecutive-failure count.
    pub fn record_failure(&self) -> u32 {
        self.consecutive.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_success(&self) {
        self.consecutive.store(0, Ordering::Relaxed);
    }
}

impl Default for FailureGate {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AI_FAILURES)
    }
}

pub struct Curator {
    generator: Option<Arc<dyn TextGenerator>>,
    aggregator: Option<Aggregator>,
    gate: FailureGate,
    ai_timeout: Duration,
}

impl Curator {
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        gate: FailureGate,
        ai_timeout: Duration,
    ) -> Self {
        Self {
            generator,
            aggregator: None,
            gate,
            ai_timeout,
        }
    }

    /// Enables the search tier.
    pub fn with_aggregator(mut self, aggregator: Aggregator) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    pub fn gate(&self) -> &FailureGate {
        &self.gate
    }

    pub fn model(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.model())
    }

    pub fn search_enabled(&self) -> bool {
        self.aggregator.is_some()
    }

    /// Produces a path for `topic`. Never fails; the caller validates non-blank input.
    pub async fn curate(&self, topic: &str) -> Curation {
        let topic = topic.trim();

        if let Some(categories) = self.try_ai(topic).await {
            return self.finish(topic, categories, Tier::Ai);
        }

        if let Some(template) = find_template(topic) {
            debug!("Template '{}' matched topic '{topic}'", template.key);
            return self.finish(topic, template.to_categories(), Tier::Template);
        }

        if let Some(aggregator) = &self.aggregator {
            let categories = aggregator.aggregate(topic).await.into_categories();
            if !categories.is_empty() {
                return self.finish(topic, categories, Tier::Search);
            }
            warn!("Search aggregation returned nothing for '{topic}'");
        }

        self.finish(topic, generic_categories(topic), Tier::Generic)
    }

    fn finish(&self, topic: &str, categories: CategoryMap, tier: Tier) -> Curation {
        let path = LearningPath::new(topic, categories);
        let breakdown: Vec<String> = path
            .categories()
            .iter()
            .map(|(category, resources)| format!("{}={}", category.as_str(), resources.len()))
            .collect();
        info!(
            "Curated '{topic}' via {tier:?} tier: {} resources ({})",
            path.resource_count(),
            breakdown.join(" ")
        );
        Curation { path, tier }
    }

    async fn try_ai(&self, topic: &str) -> Option<CategoryMap> {
        let Some(generator) = self.generator.as_deref() else {
            debug!("No LLM configured; skipping AI tier");
            return None;
        };

        if self.gate.is_tripped() {
            warn!(
                "AI tier disabled after {} consecutive failures",
                self.gate.failures()
            );
            return None;
        }

        match self.request_ai(generator, topic).await {
            Ok(categories) => {
                self.gate.record_success();
                Some(categories)
            }
            Err(e) => {
                let failures = self.gate.record_failure();
                warn!(
                    "AI curation failed ({failures}/{}): {e}",
                    self.gate.threshold()
                );
                None
            }
        }
    }

    async fn request_ai(
        &self,
        generator: &dyn TextGenerator,
        topic: &str,
    ) -> Result<CategoryMap, AiFailure> {
        let system = format!("{CURATION_PERSONA} {JSON_ONLY_SYSTEM}");
        let prompt = CURATION_PROMPT_TEMPLATE
            .replace("{real_links_instruction}", REAL_LINKS_INSTRUCTION)
            .replace("{topic}", topic);

        let text = timeout(self.ai_timeout, generator.complete(&system, &prompt))
            .await
            .map_err(|_| LlmError::Timeout(self.ai_timeout))??;

        Ok(parse_curation(&text)?)
    }
}

use crate::client::sources::{standard_sources, DrugSource, SourceId, SourceResult};
use crate::client::{DrugQuery, HttpClientConfig, SourceHttpClient};
use crate::repositories::ResponseCache;
use crate::{Config, Error, Result};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// Configuration for fan-out behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Maximum number of sources queried at once; 1 queries them one by one
    pub max_parallel_sources: usize,
}

impl AggregatorConfig {
    /// Reject settings that would stall the fan-out
    pub fn validate(&self) -> Result<()> {
        if self.max_parallel_sources == 0 {
            return Err(Error::invalid_input(
                "aggregator.max_parallel_sources",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_parallel_sources: 6,
        }
    }
}

/// One source's outcome inside a [`ResultBundle`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceOutcome {
    pub source: SourceId,
    pub result: SourceResult,
}

/// Every source's outcome for a single query, in dispatch order
#[derive(Debug, Clone, Serialize)]
pub struct ResultBundle {
    /// Query that was executed
    pub query: DrugQuery,
    /// One entry per source invoked
    pub outcomes: Vec<SourceOutcome>,
    /// Wall time for the whole fan-out in milliseconds
    pub elapsed_ms: u64,
}

impl ResultBundle {
    /// Number of sources covered
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Result for `source`, if it was invoked
    pub fn get(&self, source: SourceId) -> Option<&SourceResult> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.source == source)
            .map(|outcome| &outcome.result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceId, &SourceResult)> {
        self.outcomes.iter().map(|outcome| (outcome.source, &outcome.result))
    }

    /// Number of sources that produced a payload
    pub fn successful_sources(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_success()).count()
    }

    /// Number of sources that failed
    pub fn failed_sources(&self) -> usize {
        self.len() - self.successful_sources()
    }
}

/// Queries every drug source for one drug name and bundles the outcomes
///
/// Sources are dispatched in registration order, through the shared cache.
/// A failing source never prevents the others from running, and
/// [`Self::aggregate`] itself cannot fail.
pub struct DrugInfoAggregator {
    sources: Vec<Arc<dyn DrugSource>>,
    cache: Arc<ResponseCache>,
    config: AggregatorConfig,
}

impl std::fmt::Debug for DrugInfoAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrugInfoAggregator")
            .field("sources", &self.sources())
            .field("cache", &"ResponseCache")
            .field("config", &self.config)
            .finish()
    }
}

impl DrugInfoAggregator {
    /// Build the standard six-source aggregator from application config
    pub fn new(config: &Config, cache: Arc<ResponseCache>) -> Result<Self> {
        config.validate()?;

        let http = SourceHttpClient::new(&HttpClientConfig {
            user_agent: config.http.user_agent.clone(),
            ..HttpClientConfig::default()
        })?;
        let sources = standard_sources(&http, &config.sources);

        info!("Initialized drug info aggregator with {} sources", sources.len());

        Self::with_sources(sources, cache, config.aggregator.clone())
    }

    /// Build an aggregator over an arbitrary set of sources
    pub fn with_sources(
        sources: Vec<Arc<dyn DrugSource>>,
        cache: Arc<ResponseCache>,
        config: AggregatorConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            sources,
            cache,
            config,
        })
    }

    /// Registered sources, in dispatch order
    pub fn sources(&self) -> Vec<SourceId> {
        self.sources.iter().map(|s| s.id()).collect()
    }

    /// The cache shared by all lookups
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Look the drug up in every source
    #[instrument(skip_all, fields(query = %query))]
    pub async fn aggregate(&self, query: &DrugQuery) -> ResultBundle {
        let start_time = Instant::now();
        let parallelism = self.config.max_parallel_sources;

        info!(
            "Aggregating {} sources for: {} (parallelism: {})",
            self.sources.len(),
            query,
            parallelism
        );

        // `buffered` starts futures in order and yields them in order
        let outcomes: Vec<SourceOutcome> = stream::iter(self.sources.iter().cloned())
            .map(|source| {
                let cache = Arc::clone(&self.cache);
                async move {
                    let id = source.id();
                    let result = cache
                        .get_or_compute(id, query.as_str(), || source.lookup(query))
                        .await;
                    SourceOutcome { source: id, result }
                }
            })
            .buffered(parallelism)
            .collect()
            .await;

        let bundle = ResultBundle {
            query: query.clone(),
            outcomes,
            elapsed_ms: u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        info!(
            "Aggregation completed: {} succeeded, {} failed in {}ms",
            bundle.successful_sources(),
            bundle.failed_sources(),
            bundle.elapsed_ms
        );

        bundle
    }
}

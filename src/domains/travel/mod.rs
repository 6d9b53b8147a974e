//! Travel domain module.
//!
//! Holds the inputs the travel tools build (pipeline state, flight queries)
//! and the contracts of the two external collaborators:
//!
//! - `pipeline.rs` - the travel research pipeline (`invoke(state)`)
//! - `search.rs` - the SERP search helper (`search(query, engine)`)
//!
//! Both collaborators are synchronous and must only be called through the
//! blocking bridge in `domains/tools/bridge.rs`.

mod error;
pub mod pipeline;
pub mod query;
pub mod search;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::core::config::Config;

pub use error::CollaboratorError;
pub use pipeline::{HttpPipeline, TravelPipeline, UnconfiguredPipeline};
pub use query::flight_query;
pub use search::{BrightDataSerp, SearchEngine};
pub use state::{Message, PipelineState};

/// The collaborators shared by all tool calls.
#[derive(Clone)]
pub struct Collaborators {
    pub pipeline: Arc<dyn TravelPipeline>,
    pub search: Arc<dyn SearchEngine>,
}

impl Collaborators {
    pub fn new(pipeline: Arc<dyn TravelPipeline>, search: Arc<dyn SearchEngine>) -> Self {
        Self { pipeline, search }
    }

    /// Build the collaborators described by the configuration.
    pub fn from_config(config: &Config) -> Self {
        let pipeline: Arc<dyn TravelPipeline> = match &config.pipeline.url {
            Some(url) => {
                info!("Travel pipeline endpoint: {}", url);
                Arc::new(HttpPipeline::new(
                    url.clone(),
                    config.credentials.pipeline_api_key.clone(),
                    Duration::from_secs(config.pipeline.timeout_secs),
                ))
            }
            None => {
                warn!("MCP_PIPELINE_URL not set - travel.plan_trip calls will fail");
                Arc::new(UnconfiguredPipeline)
            }
        };

        let search = Arc::new(BrightDataSerp::new(
            config.search.endpoint.clone(),
            config.search.zone.clone(),
            config.credentials.brightdata_api_key.clone(),
        ));

        Self { pipeline, search }
    }
}

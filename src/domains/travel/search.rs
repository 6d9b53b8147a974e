//! Web search collaborator backed by the Bright Data SERP API.

use serde_json::Value;
use tracing::{info, warn};

use super::error::CollaboratorError;

/// Contract of the search helper.
pub trait SearchEngine: Send + Sync {
    /// Run `query` against `engine` and return the raw results. Blocks the
    /// calling thread.
    fn search(&self, query: &str, engine: &str) -> Result<Value, CollaboratorError>;
}

/// Bright Data SERP client.
///
/// Each search is sent to the request API as `{zone, url, format: "raw"}`,
/// where `url` is the engine's result page with `brd_json=1` so that Bright
/// Data returns parsed JSON.
#[derive(Clone)]
pub struct BrightDataSerp {
    endpoint: String,
    zone: String,
    api_key: Option<String>,
}

impl BrightDataSerp {
    pub fn new(
        endpoint: impl Into<String>,
        zone: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            zone: zone.into(),
            api_key,
        }
    }

    /// Build the search page URL for an engine.
    pub fn engine_url(engine: &str, query: &str) -> Result<String, CollaboratorError> {
        let base = match engine.to_lowercase().as_str() {
            "google" => "https://www.google.com/search",
            "bing" => "https://www.bing.com/search",
            _ => return Err(CollaboratorError::UnsupportedEngine(engine.to_string())),
        };

        let params = serde_urlencoded::to_string([("q", query), ("brd_json", "1")])
            .map_err(|e| CollaboratorError::other(format!("failed to encode query: {}", e)))?;

        Ok(format!("{}?{}", base, params))
    }
}

impl std::fmt::Debug for BrightDataSerp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrightDataSerp")
            .field("endpoint", &self.endpoint)
            .field("zone", &self.zone)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl SearchEngine for BrightDataSerp {
    fn search(&self, query: &str, engine: &str) -> Result<Value, CollaboratorError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            CollaboratorError::not_configured("Bright Data SERP (set MCP_BRIGHTDATA_API_KEY)")
        })?;

        let url = Self::engine_url(engine, query)?;
        info!("SERP search on {}: {}", engine, query);

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&serde_json::json!({
                "zone": self.zone,
                "url": url,
                "format": "raw",
            }))
            .send()?
            .error_for_status()?;

        let body = response.text()?;
        match serde_json::from_str(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                warn!("SERP response is not JSON ({}), returning raw body", e);
                Ok(Value::String(body))
            }
        }
    }
}

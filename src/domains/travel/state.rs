//! Initial state handed to the travel research pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single chat message in the pipeline transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    /// Create a message authored by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// State object consumed by the travel research pipeline.
///
/// Every intermediate slot starts as `None` and serializes as `null`.
/// The pipeline fills them in as it runs, so a `null` slot means "not yet
/// computed" while an empty array or string means "computed as empty".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub messages: Vec<Message>,
    pub user_question: String,
    pub google_results: Option<Value>,
    pub bing_results: Option<Value>,
    pub reddit_results: Option<Value>,
    pub selected_reddit_urls: Option<Vec<String>>,
    pub reddit_post_data: Option<Value>,
    pub google_analysis: Option<String>,
    pub bing_analysis: Option<String>,
    pub reddit_analysis: Option<String>,
    pub final_answer: Option<String>,
}

impl PipelineState {
    /// Build the baseline state for a new request.
    ///
    /// The question is recorded both as the single seed message and in
    /// `user_question`. An empty question is accepted as-is.
    pub fn new(question: impl Into<String>) -> Self {
        let question = question.into();
        Self {
            messages: vec![Message::user(question.clone())],
            user_question: question,
            google_results: None,
            bing_results: None,
            reddit_results: None,
            selected_reddit_urls: None,
            reddit_post_data: None,
            google_analysis: None,
            bing_analysis: None,
            reddit_analysis: None,
            final_answer: None,
        }
    }
}

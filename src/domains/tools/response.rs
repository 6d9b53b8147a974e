//! Tool response assembly.
//!
//! Every successful tool call produces a text summary followed by the full
//! structured result as a pretty-printed JSON blob.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rmcp::model::{CallToolResult, Content, ResourceContents};
use serde::Serialize;

use super::error::ToolError;

/// Media type of the structured payload.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// URI prefix of blob parts when sent as MCP embedded resources.
pub const RESULT_URI_PREFIX: &str = "travel://results/";

/// One typed unit of a tool response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text {
        text: String,
    },
    Blob {
        bytes: Vec<u8>,
        media_type: String,
        filename: String,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Serialize `payload` as pretty-printed JSON into a blob part.
    pub fn json_blob<T>(payload: &T, filename: impl Into<String>) -> Result<Self, ToolError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec_pretty(payload).map_err(ToolError::Serialization)?;
        Ok(Self::Blob {
            bytes,
            media_type: JSON_MEDIA_TYPE.to_string(),
            filename: filename.into(),
        })
    }

    /// Convert to MCP content. Blobs become embedded blob resources.
    pub fn into_content(self) -> Content {
        match self {
            Self::Text { text } => Content::text(text),
            Self::Blob {
                bytes,
                media_type,
                filename,
            } => Content::resource(ResourceContents::BlobResourceContents {
                uri: format!("{}{}", RESULT_URI_PREFIX, filename),
                mime_type: Some(media_type),
                blob: STANDARD.encode(bytes),
                meta: None,
            }),
        }
    }
}

/// Ordered content returned by a tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResponse {
    pub content: Vec<ContentPart>,
}

impl ToolResponse {
    /// Build the standard two-part response: summary text, then JSON blob.
    pub fn assemble<T>(
        summary: impl Into<String>,
        payload: &T,
        filename: impl Into<String>,
    ) -> Result<Self, ToolError>
    where
        T: Serialize + ?Sized,
    {
        Ok(Self {
            content: vec![
                ContentPart::text(summary),
                ContentPart::json_blob(payload, filename)?,
            ],
        })
    }

    /// The first text part, if any.
    pub fn summary(&self) -> Option<&str> {
        self.content.iter().find_map(|part| match part {
            ContentPart::Text { text } => Some(text.as_str()),
            ContentPart::Blob { .. } => None,
        })
    }

    /// The first blob part decoded as JSON, if any.
    pub fn payload_json(&self) -> Option<serde_json::Value> {
        self.content.iter().find_map(|part| match part {
            ContentPart::Blob { bytes, .. } => serde_json::from_slice(bytes).ok(),
            ContentPart::Text { .. } => None,
        })
    }
}

impl From<ToolResponse> for CallToolResult {
    fn from(response: ToolResponse) -> Self {
        CallToolResult::success(
            response
                .content
                .into_iter()
                .map(ContentPart::into_content)
                .collect(),
        )
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data_models::ListingSummary;
use crate::query_interpreter::PackIntent;

/// Accepts `{"searchTerm": ...}`, `{"query": ...}`, or the voice tool-call shape where
/// `parameters` holds the same fields, either as an object or as a JSON-encoded string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default, alias = "query")]
    pub search_term: Option<String>,
    #[serde(default)]
    pub parameters: Option<Value>,
}

impl SearchRequest {
    /// The non-blank search term, preferring the one nested in `parameters`.
    pub fn term(&self) -> Option<String> {
        let nested = match &self.parameters {
            Some(Value::String(raw)) => serde_json::from_str::<SearchRequest>(raw).ok(),
            Some(params @ Value::Object(_)) => serde_json::from_value(params.clone()).ok(),
            _ => None,
        }
        .and_then(|p| p.search_term);

        nested
            .or_else(|| self.search_term.clone())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub search_term: String,
    pub api_query: String,
    pub pack_intent: PackIntent,
    pub products: Vec<ListingSummary>,
    pub total_results: usize,
    pub processing_time_ms: u128,
    pub response_message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub response_message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, response_message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            response_message: response_message.into(),
        }
    }
}

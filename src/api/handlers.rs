use async_trait::async_trait;
use axum::{
    Form, Json,
    body::Bytes,
    extract::{FromRequest, Query, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
};
use std::sync::Arc;
use std::time::Instant;

use crate::query_engine::{QueryEngine, SearchOutcome};
use crate::query_interpreter::InterpretedQuery;

use super::models::{ErrorResponse, SearchRequest, SearchResponse};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn missing_term() -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(
            "Search term is required",
            "I didn't catch what you'd like me to search for. Could you say it again?",
        )),
    )
}

fn malformed_body(reason: String) -> ApiError {
    log::warn!("rejected search request body: {reason}");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(
            reason,
            "I couldn't understand that search request. Could you try again?",
        )),
    )
}

/// Search request body, read as a form when posted as
/// `application/x-www-form-urlencoded` and as JSON otherwise.
pub struct SearchPayload(pub SearchRequest);

#[async_trait]
impl<S> FromRequest<S> for SearchPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(request) = Form::<SearchRequest>::from_request(req, state)
                .await
                .map_err(|e| malformed_body(e.body_text()))?;
            return Ok(Self(request));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| malformed_body(e.body_text()))?;
        let request = serde_json::from_slice(&body)
            .map_err(|e| malformed_body(format!("Invalid JSON body: {e}")))?;
        Ok(Self(request))
    }
}

/// The sentence the voice assistant reads back after a search.
pub fn response_message(outcome: &SearchOutcome) -> String {
    let count = outcome.listings.len();
    let pack = outcome
        .query
        .pack_intent
        .quantity()
        .map(|q| format!(" in packs of {q}"))
        .unwrap_or_default();

    let mut message = format!(
        "I found {count} products for \"{}\"{pack}. ",
        outcome.query.original_phrase
    );
    if count > 0 {
        message.push_str(
            "You can explore these products by clicking on the \"Explore Product\" links below each image.",
        );
    } else {
        message.push_str("Unfortunately, no products were found for this search term.");
    }
    message
}

async fn run_search(
    query_engine: &QueryEngine,
    request: SearchRequest,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = Instant::now();
    let term = request.term().ok_or_else(missing_term)?;

    let outcome = query_engine.query(&term).await.map_err(|e| {
        log::error!("search for {term:?} failed: {e}");
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new(
                e.to_string(),
                format!(
                    "I'm sorry, but there was an error while searching for products: {e}"
                ),
            )),
        )
    })?;

    let response_message = response_message(&outcome);
    let processing_time_ms = start.elapsed().as_millis();
    log::info!(
        "{} of {} listings kept for {term:?} in {processing_time_ms}ms",
        outcome.listings.len(),
        outcome.raw_count
    );

    Ok(Json(SearchResponse {
        success: true,
        search_term: outcome.query.original_phrase,
        api_query: outcome.query.api_query,
        pack_intent: outcome.query.pack_intent,
        total_results: outcome.listings.len(),
        products: outcome.listings,
        processing_time_ms,
        response_message,
    }))
}

pub async fn search_handler(
    State(query_engine): State<Arc<QueryEngine>>,
    SearchPayload(request): SearchPayload,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(&query_engine, request).await
}

pub async fn search_get_handler(
    State(query_engine): State<Arc<QueryEngine>>,
    Query(request): Query<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(&query_engine, request).await
}

pub async fn interpret_handler(
    State(query_engine): State<Arc<QueryEngine>>,
    SearchPayload(request): SearchPayload,
) -> Result<Json<InterpretedQuery>, ApiError> {
    let term = request.term().ok_or_else(missing_term)?;
    Ok(Json(query_engine.interpreter().interpret(&term)))
}

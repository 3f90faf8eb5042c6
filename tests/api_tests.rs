use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use packsearch::api::create_router;
use packsearch::data_models::ListingSummary;
use packsearch::error::{Result, SearchError};
use packsearch::query_engine::{ListingSource, QueryEngine};

mod test_helpers {
    use super::*;

    /// Returns canned listings and remembers every query it was asked for.
    pub struct StubSource {
        pub listings: Vec<ListingSummary>,
        pub queries: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ListingSource for StubSource {
        async fn search(&self, query: &str) -> Result<Vec<ListingSummary>> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.listings.clone())
        }
    }

    pub struct FailingSource;

    #[async_trait]
    impl ListingSource for FailingSource {
        async fn search(&self, _query: &str) -> Result<Vec<ListingSummary>> {
            Err(SearchError::Upstream(503))
        }
    }

    pub fn listing(title: &str, id: usize) -> ListingSummary {
        ListingSummary::new(
            title,
            format!("https://www.ebay.com/itm/{id}"),
            format!("https://i.ebayimg.com/{id}.jpg"),
            "USD 12.49",
        )
    }

    pub fn stub_router() -> (axum::Router, Arc<Mutex<Vec<String>>>) {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let source = StubSource {
            listings: vec![
                listing("Duracell AA Batteries 16 Pack", 1),
                listing("Energizer AA 160-pack", 2),
                listing("AA Batteries 16 count", 3),
                listing("AA Batteries 4 pack", 4),
                ListingSummary::new("AA Batteries 16 pack, no image", "https://x/5", "", "N/A"),
            ],
            queries: queries.clone(),
        };
        let engine = Arc::new(QueryEngine::with_source(Box::new(source)));
        (create_router(engine), queries)
    }

    pub fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn post_raw(uri: &str, content_type: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn send(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub fn product_titles(body: &Value) -> Vec<String> {
        body["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap().to_string())
            .collect()
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_search_with_pack_intent() {
    let (router, queries) = stub_router();
    let (status, body) = send(
        router,
        post_json("/api/search", json!({ "searchTerm": "16 pack of AA batteries" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["searchTerm"], "16 pack of AA batteries");
    assert_eq!(body["apiQuery"], "AA batteries");
    assert_eq!(body["packIntent"], json!({ "present": true, "quantity": 16 }));
    assert_eq!(
        product_titles(&body),
        vec!["Duracell AA Batteries 16 Pack", "AA Batteries 16 count"]
    );
    assert_eq!(body["totalResults"], 2);
    assert_eq!(body["products"][0]["imageUrl"], "https://i.ebayimg.com/1.jpg");
    assert!(
        body["responseMessage"]
            .as_str()
            .unwrap()
            .starts_with("I found 2 products for \"16 pack of AA batteries\" in packs of 16.")
    );

    assert_eq!(*queries.lock().unwrap(), vec!["AA batteries".to_string()]);
}

#[tokio::test]
async fn test_search_without_pack_intent_via_get() {
    let (router, queries) = stub_router();
    let request = Request::builder()
        .uri("/api/search?searchTerm=AA%20batteries")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["packIntent"]["present"], false);
    assert_eq!(body["packIntent"]["quantity"], Value::Null);
    assert_eq!(
        product_titles(&body),
        vec![
            "Duracell AA Batteries 16 Pack",
            "Energizer AA 160-pack",
            "AA Batteries 16 count",
            "AA Batteries 4 pack",
        ]
    );
    assert_eq!(*queries.lock().unwrap(), vec!["AA batteries".to_string()]);
}

#[tokio::test]
async fn test_search_with_tool_call_parameters() {
    let (router, _) = stub_router();
    let (status, body) = send(
        router,
        post_json(
            "/api/search",
            json!({ "parameters": "{\"searchTerm\": \"four pack batteries\"}" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["apiQuery"], "batteries");
    assert_eq!(product_titles(&body), vec!["AA Batteries 4 pack"]);
}

#[tokio::test]
async fn test_search_with_tool_call_parameters_object() {
    let (router, queries) = stub_router();
    let (status, body) = send(
        router,
        post_json(
            "/api/search",
            json!({ "parameters": { "searchTerm": "sixteen pack AA batteries" } }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["packIntent"]["quantity"], 16);
    assert_eq!(*queries.lock().unwrap(), vec!["AA batteries".to_string()]);
}

#[tokio::test]
async fn test_search_with_form_body() {
    let (router, queries) = stub_router();
    let (status, body) = send(
        router,
        post_raw(
            "/api/search",
            "application/x-www-form-urlencoded",
            "searchTerm=4+pack+AA+batteries",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["searchTerm"], "4 pack AA batteries");
    assert_eq!(product_titles(&body), vec!["AA Batteries 4 pack"]);
    assert_eq!(*queries.lock().unwrap(), vec!["AA batteries".to_string()]);
}

#[tokio::test]
async fn test_search_json_without_content_type() {
    let (router, _) = stub_router();
    let request = Request::builder()
        .method("POST")
        .uri("/api/search")
        .body(Body::from(r#"{"searchTerm": "AA batteries"}"#))
        .unwrap();
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["apiQuery"], "AA batteries");
}

#[tokio::test]
async fn test_search_malformed_body() {
    let (router, queries) = stub_router();
    let (status, body) = send(
        router,
        post_raw("/api/search", "application/json", "garbage"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    assert!(body["responseMessage"].as_str().is_some());
    assert!(queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_interpret_malformed_body() {
    let (router, _) = stub_router();
    let (status, body) = send(router, post_raw("/api/interpret", "application/json", "{")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_search_no_matches_message() {
    let (router, _) = stub_router();
    let (status, body) = send(
        router,
        post_json("/api/search", json!({ "searchTerm": "48 pack AA batteries" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalResults"], 0);
    assert!(
        body["responseMessage"]
            .as_str()
            .unwrap()
            .contains("Unfortunately, no products were found")
    );
}

#[tokio::test]
async fn test_search_empty_term() {
    let (router, queries) = stub_router();
    let (status, body) = send(router, post_json("/api/search", json!({ "searchTerm": "  " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Search term is required");
    assert!(queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_upstream_failure() {
    let engine = Arc::new(QueryEngine::with_source(Box::new(FailingSource)));
    let (status, body) = send(
        create_router(engine),
        post_json("/api/search", json!({ "searchTerm": "cola" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert!(
        body["responseMessage"]
            .as_str()
            .unwrap()
            .starts_with("I'm sorry, but there was an error while searching for products")
    );
}

#[tokio::test]
async fn test_interpret_endpoint() {
    let (router, queries) = stub_router();
    let (status, body) = send(
        router,
        post_json("/api/interpret", json!({ "query": "Twelve pack of AAA batteries" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "originalPhrase": "Twelve pack of AAA batteries",
            "apiQuery": "AAA batteries",
            "packIntent": { "present": true, "quantity": 12 }
        })
    );
    assert!(queries.lock().unwrap().is_empty());
}

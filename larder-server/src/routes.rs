//! Router assembly and middleware stack

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// All routes, no middleware, no state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(api::health::router())
        .merge(api::products::router())
        .merge(api::stock::router())
        .merge(api::labels::router())
        .merge(api::cache::router())
}

/// The full application: routes plus the middleware stack
pub fn build_app() -> Router<ServerState> {
    let request_id = HeaderName::from_static("x-request-id");

    build_router()
        // CORS - the kitchen tablets hit this from a different origin
        .layer(CorsLayer::permissive())
        // Request tracing at INFO level
        .layer(TraceLayer::new_for_http())
        // Unique ID per request, propagated to the response
        .layer(SetRequestIdLayer::new(request_id.clone(), XRequestId))
        .layer(PropagateRequestIdLayer::new(request_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ServerState;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn raw(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn test_app() -> Router {
        let store = Arc::new(MemoryStore::with_data(
            vec![
                raw(&["PRODUCT", "CATEGORY", "CODE", "SHELF_LIFE_DAYS"]),
                raw(&["Yogurt", "external", "YO", "10"]),
                raw(&["Fresh Cream", "internal", "FC", "5"]),
            ],
            vec![
                raw(&["Product", "Qty", "Pack", "", "Lot", "Expiry", "Start"]),
                raw(&["Yogurt", "5", "bag", "", "L123", "2024-03-10", "2024-03-01"]),
            ],
        ));
        build_router().with_state(ServerState::for_tests(store))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_products_sorted() {
        let response = test_app()
            .oneshot(Request::get("/api/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let names: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Fresh Cream", "Yogurt"]);
    }

    #[tokio::test]
    async fn test_stock_summary() {
        let response = test_app()
            .oneshot(Request::get("/api/stock").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["data"][0]["product_name"], "Yogurt");
        assert_eq!(body["data"][0]["total_quantity"], 5);
    }

    #[tokio::test]
    async fn test_stock_rows_unknown_product() {
        let response = test_app()
            .oneshot(
                Request::get("/api/stock/Mystery")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_body(response).await;
        assert_eq!(body["code"], 6001);
    }

    #[tokio::test]
    async fn test_print_label_returns_document() {
        let response = test_app()
            .oneshot(post_json(
                "/api/labels/print",
                json!({ "product_name": "Yogurt", "quantity": 2, "lot": "123" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        assert!(
            response.headers()[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .contains("labels_")
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let doc = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(doc.contains("SIZE 58 mm,40 mm"));
        assert!(doc.contains("Yogurt"));
        assert!(doc.contains("Lot: L123"));
    }

    #[tokio::test]
    async fn test_print_label_missing_lot() {
        // Fresh stock for an external product with no lot anywhere
        let store = Arc::new(MemoryStore::with_data(
            vec![
                raw(&["PRODUCT", "CATEGORY"]),
                raw(&["Mozzarella", "external"]),
            ],
            vec![raw(&["Product", "Qty"])],
        ));
        let app = build_router().with_state(ServerState::for_tests(store));

        let response = app
            .oneshot(post_json(
                "/api/labels/print",
                json!({ "product_name": "Mozzarella", "quantity": 1 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["code"], 4001);
        assert!(body["message"].as_str().unwrap().contains("Mozzarella"));
    }

    #[tokio::test]
    async fn test_add_stock_folds() {
        let response = test_app()
            .oneshot(post_json(
                "/api/stock/add",
                json!({ "product_name": "Yogurt", "quantity": 3, "lot": "123" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["data"]["lot"], "L123");
        assert_eq!(body["data"]["folded_into_row"], 2);
    }

    #[tokio::test]
    async fn test_cache_status_and_refresh() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/cache/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::get("/api/cache/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["data"]["products"], 2);
        assert_eq!(body["data"]["stock_rows"], 1);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = test_app()
            .oneshot(Request::get("/api/nothing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

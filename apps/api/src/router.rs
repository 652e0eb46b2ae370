use std::time::Duration;

use axum::{error_handling::HandleErrorLayer, routing::get, BoxError, Router};
use tower::timeout::{error::Elapsed, TimeoutLayer};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::Level;

use booking_cell::{booking_routes, BookingState};
use shared_models::error::AppError;

async fn handle_timeout_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::UpstreamTimeout("Booking provider did not respond in time".to_string())
    } else {
        AppError::Internal(format!("Unhandled middleware error: {}", err))
    }
}

pub fn create_router(state: BookingState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { "Medihunter API is running!" }))
        .merge(booking_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use booking_cell::test_utils::StubBookingProvider;
    use shared_utils::test_utils::basic_auth_header;

    fn create_test_app(provider: &StubBookingProvider) -> Router {
        let state = BookingState::new(Arc::new(provider.clone()));
        create_router(state, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_liveness_needs_no_credentials() {
        let provider = StubBookingProvider::new();
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = create_test_app(&provider).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Medihunter API is running!");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_booking_routes_are_mounted() {
        let provider = StubBookingProvider::new().with_listing(json!([{"id": 204}]));
        let request = Request::builder()
            .uri("/params/regions")
            .header("authorization", basic_auth_header("user", "pass"))
            .body(Body::empty())
            .unwrap();

        let response = create_test_app(&provider).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json_response: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json_response, json!([{"id": 204}]));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out_with_json_body() {
        let provider = StubBookingProvider::new().with_login_delay(Duration::from_secs(2));
        let app = create_router(
            BookingState::new(Arc::new(provider.clone())),
            Duration::from_millis(50),
        );
        let request = Request::builder()
            .uri("/params/regions")
            .header("authorization", basic_auth_header("user", "pass"))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json_response: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json_response,
            json!({"error": "Booking provider did not respond in time"})
        );
        assert_eq!(provider.query_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let provider = StubBookingProvider::new();
        let request = Request::builder().uri("/book").body(Body::empty()).unwrap();

        let response = create_test_app(&provider).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

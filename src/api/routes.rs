use std::any::Any;

use axum::{
    body::Bytes,
    routing::{get, post},
    Router,
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{CorsLayer, Any as AnyOrigin};
use tower_http::trace::TraceLayer;
use chrono::Utc;
use tracing::{error, info, warn};

use crate::error::{AppError, ErrorResponse};
use crate::api::models::HealthResponse;
use crate::processor::{parse_input, process};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/scrape", post(scrape_handler))
        .route("/health", get(health_handler))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .with_state(app_state)
}

async fn scrape_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let start_time = std::time::Instant::now();

    let result = parse_input(&body).and_then(|input| {
        info!(
            url = input.url.as_deref().unwrap_or("<none>"),
            links = input.links.as_ref().map_or(0, Vec::len),
            images = input.images.as_ref().map_or(0, Vec::len),
            headings = input.headings.as_ref().map_or(0, Vec::len),
            "Processing scraped page"
        );
        process(input, &state.config.limits, Utc::now())
    });

    match result {
        Ok(output) => {
            info!(elapsed = ?start_time.elapsed(), "Scraped page processed");
            (StatusCode::OK, Json(output)).into_response()
        }
        Err(err) => {
            match &err {
                AppError::MissingInput => warn!("Rejected request without data"),
                AppError::MalformedInput(msg) => warn!("Malformed body: {}", msg),
                AppError::ProcessingFailure(msg) => error!("Processing failed: {}", msg),
                AppError::ConfigError(msg) => error!("Config error: {}", msg),
            }
            err.into_response()
        }
    }
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
    })
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);

    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(detail))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn panics_become_json_errors() {
        let res = panic_response(Box::new("boom"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"error": "boom"}));
    }

    #[tokio::test]
    async fn formatted_panic_messages_are_kept() {
        let res = panic_response(Box::new(format!("index {} out of range", 7)));
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "index 7 out of range");
    }
}

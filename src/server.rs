//! Axum REST API server for the web deployment.
//!
//! Thin transport around the mission pipeline: decodes requests, maps
//! `MissionError`s to 400 responses and streams finished CSV files back as
//! attachments.

use std::str::FromStr;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::mission::{self, GeneratedMission, MissionError};
use crate::models::MissionRequest;
use crate::presets;
use crate::validator::AllowedRange;

/// Server settings, read from the environment at start-up
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// `HOST`, `PORT` and `MAX_BODY_BYTES`, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            max_body_bytes: env_or("MAX_BODY_BYTES", defaults.max_body_bytes),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or<T: FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T: FromStr + std::fmt::Display>(key: &str, raw: &str, default: T) -> T {
    raw.trim().parse().unwrap_or_else(|_| {
        log::warn!("Invalid {} value '{}', using default {}", key, raw, default);
        default
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

/// Standard error response
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    waypoint_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed_range: Option<AllowedRange>,
}

impl From<&MissionError> for ErrorResponse {
    fn from(err: &MissionError) -> Self {
        let validation = err.validation_error();
        Self {
            error: err.to_string(),
            kind: Some(match validation {
                Some(v) => v.kind().as_str(),
                None => "empty_mission",
            }),
            waypoint_index: err.waypoint_index(),
            field: validation.map(|v| v.field().to_string()),
            allowed_range: validation.and_then(|v| v.allowed_range()),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn err_response(status: StatusCode, msg: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: msg.into(),
            kind: None,
            waypoint_index: None,
            field: None,
            allowed_range: None,
        }),
    )
}

fn mission_err_response(err: &MissionError) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(err)))
}

fn csv_response(generated: GeneratedMission) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", generated.file_name),
            ),
        ],
        generated.csv,
    )
        .into_response()
}

/// GET /health — Liveness check
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Litchi CSV Generator API is running",
    })
}

/// POST /api/generate-mission — Build a Litchi CSV from submitted waypoints
async fn generate_mission(
    payload: Result<Json<MissionRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        log::warn!("Rejected mission request: {}", rejection.body_text());
        err_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", rejection.body_text()),
        )
    })?;

    let generated = mission::generate_mission(&request).map_err(|e| {
        log::warn!("Mission generation failed: {}", e);
        mission_err_response(&e)
    })?;

    Ok(csv_response(generated))
}

/// GET /api/example-mission/:preset — Generate a built-in example mission
async fn example_mission(Path(preset): Path<String>) -> Result<Response, ApiError> {
    let request = presets::preset_mission(&preset).ok_or_else(|| {
        err_response(
            StatusCode::NOT_FOUND,
            format!(
                "Unknown example mission '{}' (available: {})",
                preset,
                presets::PRESET_NAMES.join(", ")
            ),
        )
    })?;

    let generated = mission::generate_mission(&request).map_err(|e| {
        log::error!("Example mission '{}' failed validation: {}", preset, e);
        err_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(csv_response(generated))
}

pub fn build_router(config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/generate-mission", post(generate_mission))
        .route("/api/example-mission/:preset", get(example_mission))
        .layer(cors)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
}

/// Start the Axum web server
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let router = build_router(&config);
    let addr = config.addr();

    log::info!("Starting Litchi Mission Generator web server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

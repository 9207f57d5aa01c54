/// Data Whisperer HTTP API - field mapping suggestions and previews over JSON
///
/// Thin request/response layer around `MappingEngine`. Every endpoint takes
/// and returns JSON; engine errors become 400 (bad input) or 500.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use data_whisperer::engine::HealthResponse;
use data_whisperer::{
    AnalyzeRequest, AnalyzeResponse, EngineConfig, ExportRequest, ExportResponse, MapperError,
    MappingEngine, PreviewRequest, PreviewResponse,
};

struct AppState {
    engine: MappingEngine,
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = EngineConfig::from_env();
    tracing::info!("Suggestion threshold: {}", config.threshold);
    let state = Arc::new(AppState {
        engine: MappingEngine::new(config),
    });

    let app = Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/preview", post(preview))
        .route("/api/export", post(export))
        .route("/api/transforms", get(list_transforms))
        .route("/api/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port = match std::env::var("PORT") {
        Ok(raw) => match raw.parse::<u16>() {
            Ok(port) => port,
            Err(e) => {
                eprintln!("Invalid PORT {:?}: {}", raw, e);
                std::process::exit(1);
            }
        },
        Err(_) => 5001,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Data Whisperer API listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Suggest mappings between a source and a target document
async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = body?;
    let response = state.engine.analyze(request)?;
    tracing::info!("Analyzed request: {} suggestions", response.mappings.len());
    Ok(Json(response))
}

/// Reshape a source document with the current mappings
async fn preview(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<PreviewResponse>, AppError> {
    let Json(request) = body?;
    Ok(Json(state.engine.preview(request)?))
}

/// Package complete mappings as a configuration
async fn export(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Json<ExportResponse>, AppError> {
    let Json(request) = body?;
    Ok(Json(state.engine.export(request)))
}

async fn list_transforms(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.engine.registry().list_transforms())
}

/// Health check endpoint (liveness)
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(state.engine.health())
}

// Error handling

#[derive(Debug)]
enum AppError {
    ValidationError(String),
    InternalError(String),
}

impl From<MapperError> for AppError {
    fn from(err: MapperError) -> Self {
        if err.is_client_error() {
            AppError::ValidationError(err.to_string())
        } else {
            tracing::error!("Engine error: {}", err);
            AppError::InternalError(err.to_string())
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(format!("Invalid JSON: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({
            "error": message
        }))).into_response()
    }
}

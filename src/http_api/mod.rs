use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tracing::{error, info, warn};

use crate::{Error, FailureResponse, JsonScheduleReader, ParsedSchedule, ScheduleParser};

pub const ENV_HTTP_ADDR: &str = "SCHEDULE_NORMALIZER_HTTP_ADDR";
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

#[derive(Clone)]
pub struct AppState {
    parser: Arc<ScheduleParser>,
}

impl AppState {
    pub fn new(parser: ScheduleParser) -> Self {
        Self {
            parser: Arc::new(parser),
        }
    }

    fn parser(&self) -> Arc<ScheduleParser> {
        self.parser.clone()
    }
}

#[derive(Debug)]
enum ApiError {
    Invalid(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let message = FailureResponse::from(&err).error;
        if err.is_input_error() {
            ApiError::Invalid(message)
        } else {
            ApiError::Internal(message)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        let body = Json(FailureResponse {
            success: false,
            error,
        });
        (status, body).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/parse", post(parse_schedule))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, parser: ScheduleParser) -> std::io::Result<()> {
    let app = router(AppState::new(parser));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "schedule normalizer HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn parse_schedule(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ParsedSchedule>, ApiError> {
    let parser = state.parser();
    let result = tokio::task::spawn_blocking(move || -> crate::Result<ParsedSchedule> {
        let project = JsonScheduleReader::new().read_slice(&body)?;
        parser.parse(&&project)
    })
    .await
    .map_err(|err| {
        error!(error = %err, "parse worker panicked");
        ApiError::Internal(format!("parse worker failed: {err}"))
    })?;

    match result {
        Ok(parsed) => Ok(Json(parsed)),
        Err(err) => {
            warn!(error = %err, "schedule parse failed");
            Err(ApiError::from(err))
        }
    }
}

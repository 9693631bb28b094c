//! HTTP control surface.
//!
//! Thin JSON layer over [`Controller`]: every handler validates, delegates,
//! and answers immediately. Failures are `400 {success: false, error}`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use human_typer_proto::{
    ErrorResponse, Features, HealthResponse, Outcome, Progress, ResumeResponse, SettingsPatch,
    Stats, StatusResponse, StopResponse, TypeRequest, TypeResponse, UpdateSettingsResponse,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::controller::Controller;
use crate::error::SessionError;
use crate::session::{PauseReason, SessionOutcome, StatusSnapshot};

/// Request bodies above this size are rejected.
const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

type AppState = Arc<Controller>;

/// Create the router with all control endpoints and middleware.
pub fn create_router(controller: Arc<Controller>) -> Router {
    // Browser extensions call from arbitrary origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/status", get(status))
        .route("/health", get(health))
        .route("/type", post(start_typing))
        .route("/stop", post(stop))
        .route("/resume", post(resume))
        .route("/restart", post(restart))
        .route("/update-settings", post(update_settings))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(controller)
}

/// Failure answered to the client.
#[derive(Debug)]
pub enum ApiError {
    Session(SessionError),
    /// Malformed request body.
    BadRequest(String),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::Session(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match self {
            ApiError::Session(err) => err.to_string(),
            ApiError::BadRequest(msg) => msg,
        };
        debug!(%error, "Rejecting request");

        let body = ErrorResponse {
            success: false,
            error,
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

async fn status(State(controller): State<AppState>) -> Json<StatusResponse> {
    Json(status_response(controller.status().await))
}

async fn health(State(controller): State<AppState>) -> Json<HealthResponse> {
    let caps = controller.capabilities();
    Json(HealthResponse {
        healthy: true,
        timestamp: chrono::Utc::now().to_rfc3339(),
        features: Features {
            window_tracking: caps.window_tracking,
            sound_alerts: caps.sound_alerts,
        },
    })
}

async fn start_typing(
    State(controller): State<AppState>,
    payload: Result<Json<TypeRequest>, JsonRejection>,
) -> Result<Json<TypeResponse>, ApiError> {
    let Json(request) = payload?;
    let text_length = controller
        .start_session(&request.text, &request.settings)
        .await?;

    Ok(Json(TypeResponse {
        success: true,
        text_length,
        message: "Typing started - focus on your text field!".to_string(),
    }))
}

async fn stop(State(controller): State<AppState>) -> Result<Json<StopResponse>, ApiError> {
    controller.stop_session().await?;
    Ok(Json(StopResponse {
        success: true,
        message: "Stopping typing...".to_string(),
    }))
}

async fn resume(State(controller): State<AppState>) -> Result<Json<ResumeResponse>, ApiError> {
    let resume_position = controller.resume_session().await?;
    Ok(Json(ResumeResponse {
        success: true,
        resume_position,
    }))
}

async fn restart(State(controller): State<AppState>) -> Result<Json<TypeResponse>, ApiError> {
    let text_length = controller.restart_session().await?;
    Ok(Json(TypeResponse {
        success: true,
        text_length,
        message: "Typing restarted - focus on your text field!".to_string(),
    }))
}

async fn update_settings(
    State(controller): State<AppState>,
    payload: Result<Json<SettingsPatch>, JsonRejection>,
) -> Result<Json<UpdateSettingsResponse>, ApiError> {
    let Json(patch) = payload?;
    let settings = controller.update_settings(&patch).await?;
    Ok(Json(UpdateSettingsResponse {
        success: true,
        current_settings: settings.to_wire(),
    }))
}

fn status_response(snapshot: StatusSnapshot) -> StatusResponse {
    StatusResponse {
        status: "online".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        is_typing: snapshot.is_typing,
        paused: snapshot.is_paused,
        progress: Progress {
            current: snapshot.cursor,
            total: snapshot.total,
            percentage: snapshot.percentage(),
            typed_so_far: snapshot.typed_so_far,
            remaining: snapshot.remaining,
        },
        pause_reason: snapshot.pause_reason.map(|reason| match reason {
            PauseReason::FocusLost => human_typer_proto::PauseReason::FocusLost,
        }),
        stats: Stats {
            interruptions: snapshot.interruptions,
            mistakes: snapshot.mistakes,
        },
        last_outcome: snapshot.last_outcome.map(|outcome| match outcome {
            SessionOutcome::Completed => Outcome::Completed,
            SessionOutcome::Stopped => Outcome::Stopped,
        }),
        settings: snapshot.settings.to_wire(),
    }
}

#[cfg(test)]
#[path = "server_test.rs"]
mod tests;

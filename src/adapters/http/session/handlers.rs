//! HTTP handlers for session endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{json_rejection, ErrorResponse};
use crate::application::handlers::content::ExportActiveFilesHandler;
use crate::application::handlers::session::{
    ListActiveSessionsHandler, Resolution, ResolveSessionCommand, ResolveSessionHandler,
};
use crate::config::ServerConfig;
use crate::domain::session::SessionError;

use super::dto::{ActiveSessionResponse, ResolveSessionRequest, ResolveSessionResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    resolve_handler: Arc<ResolveSessionHandler>,
    list_handler: Arc<ListActiveSessionsHandler>,
    export_handler: Arc<ExportActiveFilesHandler>,
    server: Arc<ServerConfig>,
    retry_after_secs: u64,
}

impl SessionHandlers {
    pub fn new(
        resolve_handler: Arc<ResolveSessionHandler>,
        list_handler: Arc<ListActiveSessionsHandler>,
        export_handler: Arc<ExportActiveFilesHandler>,
        server: Arc<ServerConfig>,
    ) -> Self {
        Self {
            resolve_handler,
            list_handler,
            export_handler,
            server,
            retry_after_secs: 300,
        }
    }

    /// Seconds a client should wait after a conflict.
    pub fn with_retry_after(mut self, secs: u64) -> Self {
        self.retry_after_secs = secs;
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /session - Create or join a session by name
pub async fn resolve_session(
    State(handlers): State<SessionHandlers>,
    body: Result<Json<ResolveSessionRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection(rejection),
    };

    let cmd = ResolveSessionCommand { name: req.name };

    let resolved = handlers.resolve_handler.handle(cmd).await;

    match resolved.and_then(Resolution::into_result) {
        Ok((session, created)) => {
            let url = handlers.server.session_url(session.name().as_str());
            let status = if created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(ResolveSessionResponse::new(&session, url, created))).into_response()
        }
        Err(e) => handle_session_error(e, handlers.retry_after_secs),
    }
}

/// GET /sessions - List live sessions
pub async fn list_sessions(State(handlers): State<SessionHandlers>) -> Response {
    match handlers.list_handler.handle().await {
        Ok(sessions) => {
            let response: Vec<ActiveSessionResponse> =
                sessions.iter().map(ActiveSessionResponse::from).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e, handlers.retry_after_secs),
    }
}

/// GET /sessions/active/files/download_all - Zip of every live file
pub async fn download_all_files(State(handlers): State<SessionHandlers>) -> Response {
    match handlers.export_handler.handle().await {
        Ok(archive) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/zip"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"active_sessions_files.zip\"",
                ),
            ],
            archive.bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to export live session files");
            ErrorResponse::from_code(e.code(), e.message())
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_session_error(error: SessionError, retry_after_secs: u64) -> Response {
    let code = error.code();
    let message = error.message();
    match error {
        SessionError::Conflict(_) => {
            let mut response =
                ErrorResponse::from_code(code, message).into_response_with(StatusCode::CONFLICT);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
            response
        }
        SessionError::ValidationFailed { field, .. } => {
            ErrorResponse::validation(&field, message).into_response_with(StatusCode::BAD_REQUEST)
        }
        SessionError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "session storage failure");
            ErrorResponse::from_code(code, message)
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

use crate::commands::{self, BotCommand};
use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use statements::error::AppError;
use statements::workflows::statement::{GeneratedStatement, StatementError, StatementWorkflow};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateStatementRequest {
    #[serde(default)]
    pub(crate) ticket_number: Option<String>,
    #[serde(default)]
    pub(crate) latest: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatementResponse {
    pub(crate) file_name: String,
    pub(crate) path: String,
    pub(crate) applicant_role: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BotCommandRequest {
    pub(crate) text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct BotCommandResponse {
    pub(crate) reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) file: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DownloadParams {
    pub(crate) file: String,
}

pub(crate) fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/statements",
            axum::routing::post(generate_statement_endpoint),
        )
        .route(
            "/api/v1/statements/download",
            axum::routing::get(download_endpoint),
        )
        .route("/api/v1/bot/command", axum::routing::post(bot_command_endpoint))
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// The fetch -> extract -> render -> write pipeline is synchronous by
/// design, so it runs on the blocking pool rather than the handler task.
async fn run_pipeline<F>(
    workflow: Arc<StatementWorkflow>,
    job: F,
) -> Result<GeneratedStatement, AppError>
where
    F: FnOnce(&StatementWorkflow) -> Result<GeneratedStatement, StatementError> + Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(move || job(&workflow)).await?;
    Ok(outcome?)
}

pub(crate) async fn generate_statement_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<GenerateStatementRequest>,
) -> Result<Json<StatementResponse>, AppError> {
    let statement = match (payload.ticket_number, payload.latest) {
        (Some(ticket), _) => {
            run_pipeline(state.workflow.clone(), move |workflow| {
                workflow.generate_for_ticket(&ticket)
            })
            .await?
        }
        (None, true) => {
            run_pipeline(state.workflow.clone(), |workflow| workflow.generate_latest()).await?
        }
        (None, false) => {
            return Err(AppError::InvalidRequest(
                "provide ticket_number or set latest".to_string(),
            ))
        }
    };

    Ok(Json(StatementResponse {
        file_name: statement.file_name,
        path: statement.path.display().to_string(),
        applicant_role: statement.applicant_role.label().to_string(),
    }))
}

pub(crate) async fn download_endpoint(
    Extension(state): Extension<AppState>,
    Query(params): Query<DownloadParams>,
) -> Result<impl IntoResponse + std::fmt::Debug, AppError> {
    // Generated files all live flat in the output directory; reject
    // anything that tries to climb out of it.
    if params.file.contains('/') || params.file.contains("..") {
        return Err(AppError::InvalidRequest("invalid file name".to_string()));
    }

    let path = state.documents.output_dir.join(&params.file);
    let bytes = tokio::task::spawn_blocking(move || std::fs::read(path))
        .await?
        .map_err(|_| AppError::NotFound(format!("no generated statement named {}", params.file)))?;

    let content_type = mime_guess::from_path(&params.file)
        .first_or_octet_stream()
        .to_string();
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        bytes,
    ))
}

pub(crate) async fn bot_command_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<BotCommandRequest>,
) -> Result<Json<BotCommandResponse>, AppError> {
    let response = match commands::parse(&payload.text) {
        BotCommand::Start | BotCommand::Unknown => BotCommandResponse {
            reply: commands::START_REPLY.to_string(),
            file: None,
        },
        BotCommand::GetWithoutTicket => BotCommandResponse {
            reply: commands::MISSING_TICKET_REPLY.to_string(),
            file: None,
        },
        BotCommand::Get { ticket } => {
            let outcome = run_bot_pipeline(&state, move |workflow| {
                workflow.generate_for_ticket(&ticket)
            })
            .await?;
            outcome
        }
        BotCommand::Latest => {
            let outcome =
                run_bot_pipeline(&state, |workflow| workflow.generate_latest()).await?;
            outcome
        }
    };

    Ok(Json(response))
}

/// Domain failures become chat replies with status 200; only infrastructure
/// failures bubble up as HTTP errors.
async fn run_bot_pipeline<F>(state: &AppState, job: F) -> Result<BotCommandResponse, AppError>
where
    F: FnOnce(&StatementWorkflow) -> Result<GeneratedStatement, StatementError> + Send + 'static,
{
    let workflow = state.workflow.clone();
    match tokio::task::spawn_blocking(move || job(&workflow)).await? {
        Ok(statement) => Ok(BotCommandResponse {
            reply: format!(
                "Готово! Создано заявление для: {}",
                statement.applicant_role.label()
            ),
            file: Some(statement.file_name),
        }),
        Err(error) => {
            warn!(%error, "bot command failed");
            Ok(BotCommandResponse {
                reply: commands::user_message(&error),
                file: None,
            })
        }
    }
}

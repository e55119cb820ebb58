//! Request handlers and wire types.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use readpal_companion::CompanionStats;
use readpal_core::error::Error;
use readpal_core::knowledge::DocumentUrl;
use readpal_core::reading::{PersonalizedResponse, ProgressSnapshot, UserPreferences};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::SharedState;

// --- Errors ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

/// Every core failure is a 500 carrying the error text.
fn internal(err: Error) -> ApiError {
    warn!(error = %err, "Request failed");
    error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

/// `pdf_url` must be an absolute http(s) URL. The original string is kept
/// as the cache key.
fn document_url(raw: &str) -> Result<DocumentUrl, ApiError> {
    let parsed = reqwest::Url::parse(raw).map_err(|e| {
        error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("pdf_url is not a valid URL: {e}"),
        )
    })?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(DocumentUrl::new(raw)),
        _ => Err(error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "pdf_url must be an http or https URL",
        )),
    }
}

// --- Health ---

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    stats: CompanionStats,
}

pub async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        stats: state.stats(),
    })
}

// --- Documents ---

#[derive(Deserialize)]
pub struct DocumentRequest {
    pdf_url: String,
}

#[derive(Serialize)]
pub struct ProcessResponse {
    status: &'static str,
    message: &'static str,
    pdf_url: String,
}

pub async fn process_pdf_handler(
    State(state): State<SharedState>,
    Json(req): Json<DocumentRequest>,
) -> ApiResult<ProcessResponse> {
    let url = document_url(&req.pdf_url)?;
    info!(url = %url, "Processing document");
    state.resolve_agents(&url).await.map_err(internal)?;

    Ok(Json(ProcessResponse {
        status: "success",
        message: "PDF processed successfully",
        pdf_url: req.pdf_url,
    }))
}

#[derive(Deserialize)]
pub struct AskRequest {
    question: String,
    pdf_url: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    response: String,
}

pub async fn ask_handler(
    State(state): State<SharedState>,
    Json(req): Json<AskRequest>,
) -> ApiResult<AskResponse> {
    let url = document_url(&req.pdf_url)?;
    let answer = state.ask_question(&url, &req.question).await.map_err(internal)?;
    Ok(Json(AskResponse {
        response: answer.content,
    }))
}

#[derive(Serialize)]
pub struct SummaryResponse {
    summary: String,
}

pub async fn summarize_handler(
    State(state): State<SharedState>,
    Json(req): Json<DocumentRequest>,
) -> ApiResult<SummaryResponse> {
    let url = document_url(&req.pdf_url)?;
    let summary = state.summarize(&url).await.map_err(internal)?;
    Ok(Json(SummaryResponse {
        summary: summary.content,
    }))
}

#[derive(Serialize)]
pub struct InsightsResponse {
    insights: String,
}

pub async fn insights_handler(
    State(state): State<SharedState>,
    Json(req): Json<DocumentRequest>,
) -> ApiResult<InsightsResponse> {
    let url = document_url(&req.pdf_url)?;
    let insights = state.get_insights(&url).await.map_err(internal)?;
    Ok(Json(InsightsResponse {
        insights: insights.content,
    }))
}

#[derive(Deserialize)]
pub struct PersonalizedRequest {
    pdf_url: String,
    user_id: String,
    #[serde(default)]
    preferences: Option<UserPreferences>,
}

pub async fn personalized_insights_handler(
    State(state): State<SharedState>,
    Json(req): Json<PersonalizedRequest>,
) -> ApiResult<PersonalizedResponse> {
    let url = document_url(&req.pdf_url)?;
    let response = state
        .get_personalized_insights(&url, &req.user_id, req.preferences.as_ref())
        .await
        .map_err(internal)?;
    Ok(Json(response))
}

// --- Reading progress ---

#[derive(Deserialize)]
pub struct ProgressParams {
    user_id: String,
    section: String,
    progress: f64,
}

#[derive(Serialize)]
pub struct ProgressResponse {
    status: &'static str,
    progress: ProgressSnapshot,
}

pub async fn reading_progress_handler(
    State(state): State<SharedState>,
    params: Result<Query<ProgressParams>, QueryRejection>,
) -> ApiResult<ProgressResponse> {
    let Query(params) =
        params.map_err(|e| error(StatusCode::UNPROCESSABLE_ENTITY, e.body_text()))?;
    let progress = state.update_progress(&params.user_id, &params.section, params.progress);
    Ok(Json(ProgressResponse {
        status: "success",
        progress,
    }))
}

#[derive(Serialize)]
pub struct SuggestionsResponse {
    suggestions: Vec<String>,
}

pub async fn suggestions_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        suggestions: state.get_suggestions(&user_id),
    })
}

//! HTTP handlers for the proxy, store, analytics, and health endpoints.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use lingua_core::errors::UpstreamError;
use lingua_core::ids::{RequestId, TranslationId};
use lingua_core::lang::LanguagePair;
use lingua_core::record::{self, NewTranslation, TranslationRecord};
use lingua_store::StoreError;

use crate::analytics;
use crate::server::AppState;

const DEFAULT_HISTORY_LIMIT: u32 = 20;
const MAX_HISTORY_LIMIT: u32 = 100;

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn internal_error(message: impl Into<String>) -> Response {
    error_body(StatusCode::INTERNAL_SERVER_ERROR, message)
}

// ── Translation proxy ──

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "sourceLang")]
    pub source_lang: String,
    #[serde(default, rename = "targetLang")]
    pub target_lang: String,
}

pub async fn translate(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Response {
    let started = Instant::now();
    let request_id = RequestId::new();

    if req.text.trim().is_empty()
        || req.source_lang.trim().is_empty()
        || req.target_lang.trim().is_empty()
    {
        state.record_request("translate", "missing_parameters", started);
        return internal_error("Missing required parameters");
    }

    let pair = LanguagePair::new(req.source_lang.as_str(), req.target_lang.as_str());
    info!(request_id = %request_id, pair = %pair.langpair_param(), "translate request");

    match state.translator.translate(&req.text, &pair).await {
        Ok(translated) => {
            state.record_request("translate", "ok", started);
            (StatusCode::OK, Json(json!({ "translatedText": translated }))).into_response()
        }
        Err(e) => {
            error!(
                request_id = %request_id,
                pair = %pair.langpair_param(),
                kind = e.error_kind(),
                error = %e,
                "translation failed"
            );
            state.record_request("translate", e.error_kind(), started);
            internal_error(translate_error_message(&e))
        }
    }
}

fn translate_error_message(e: &UpstreamError) -> String {
    match e {
        UpstreamError::MissingParameters => "Missing required parameters".to_string(),
        UpstreamError::Rejected(details) => format!("Translation failed: {details}"),
        _ => "Translation failed".to_string(),
    }
}

// ── Summary proxy ──

/// One transcript entry as sent by the client. Accepts both the stored
/// snake_case record shape and the browser's camelCase fields.
#[derive(Debug, Deserialize)]
struct SummaryItem {
    #[serde(alias = "sourceLang")]
    source_language: String,
    #[serde(alias = "targetLang")]
    target_language: String,
    #[serde(alias = "originalText")]
    source_text: String,
    #[serde(alias = "translatedText")]
    translated_text: String,
    #[serde(default, alias = "createdAt")]
    created_at: String,
}

impl SummaryItem {
    fn into_record(self) -> TranslationRecord {
        let word_count = record::word_count(&self.source_text);
        TranslationRecord {
            id: TranslationId::new(),
            source_language: self.source_language,
            target_language: self.target_language,
            source_text: self.source_text,
            translated_text: self.translated_text,
            word_count,
            created_at: self.created_at,
        }
    }
}

pub async fn generate_summary(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let started = Instant::now();
    let request_id = RequestId::new();

    let Some(items) = body.get("translations").and_then(|v| v.as_array()) else {
        state.record_request("summary", "invalid_data", started);
        return internal_error("Invalid translations data");
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<SummaryItem>(item.clone()) {
            Ok(item) => records.push(item.into_record()),
            Err(_) => {
                state.record_request("summary", "invalid_data", started);
                return internal_error("Invalid translations data");
            }
        }
    }

    info!(request_id = %request_id, count = records.len(), "summary request");

    match state.summarizer.summarize(&records).await {
        Ok(summary) => {
            state.record_request("summary", "ok", started);
            (StatusCode::OK, Json(json!({ "summary": summary }))).into_response()
        }
        Err(e) => {
            error!(
                request_id = %request_id,
                kind = e.error_kind(),
                error = %e,
                "summary generation failed"
            );
            state.record_request("summary", e.error_kind(), started);
            internal_error(summary_error_message(&e))
        }
    }
}

fn summary_error_message(e: &UpstreamError) -> String {
    match e {
        UpstreamError::MissingCredential(_) => e.to_string(),
        _ => "Failed to generate summary".to_string(),
    }
}

// ── Translation store ──

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

pub async fn list_translations(
    State(state): State<AppState>,
    Query(q): Query<HistoryQuery>,
) -> Response {
    let limit = q.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).min(MAX_HISTORY_LIMIT);
    match state.repo.list(limit) {
        Ok(records) => (StatusCode::OK, Json(json!({ "translations": records }))).into_response(),
        Err(e) => {
            error!(error = %e, "listing translations failed");
            internal_error("Failed to load translations")
        }
    }
}

pub async fn insert_translation(
    State(state): State<AppState>,
    Json(new): Json<NewTranslation>,
) -> Response {
    if new.source_language.trim().is_empty()
        || new.target_language.trim().is_empty()
        || new.source_text.trim().is_empty()
    {
        return internal_error("Missing required parameters");
    }

    match state.repo.insert(&new) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => {
            error!(error = %e, "saving translation failed");
            internal_error("Failed to save translation")
        }
    }
}

pub async fn delete_translation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = TranslationId::from_raw(id);
    match state.repo.delete(&id) {
        Ok(()) => (StatusCode::OK, Json(json!({ "deleted": true }))).into_response(),
        Err(StoreError::NotFound(_)) => error_body(StatusCode::NOT_FOUND, "Translation not found"),
        Err(e) => {
            error!(translation_id = %id, error = %e, "deleting translation failed");
            internal_error("Failed to delete translation")
        }
    }
}

// ── Analytics / health ──

pub async fn analytics(State(state): State<AppState>) -> Response {
    match state.repo.list(analytics::ANALYTICS_WINDOW) {
        Ok(records) => {
            let summary = analytics::summarize(&records, chrono::Local::now().date_naive());
            (StatusCode::OK, Json(summary)).into_response()
        }
        Err(e) => {
            error!(error = %e, "analytics aggregation failed");
            internal_error("Failed to compute analytics")
        }
    }
}

pub async fn health(State(state): State<AppState>) -> Response {
    match state.repo.count() {
        Ok(count) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "translations": count })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy" })),
            )
                .into_response()
        }
    }
}

//! Public planner handlers
//!
//! The read-heavy surface the site renders from, plus the public canvas
//! sync and the entry/media write paths.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::body::Bytes;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::app::AppState;
use crate::database::{
    CreateEntryRequest, SaveCanvasRequest, SetSmudgeRequest, UpdateEntryRequest,
    UpdateMediaAttachmentRequest, UpsertDayEntryRequest,
};
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i64,
    pub month: i64,
}

/// GET /api/planner/canvas?year&month
pub async fn list_canvas(
    State(state): State<AppState>,
    Query(q): Query<MonthQuery>,
) -> Result<Response> {
    let items = state.canvas.list_items(q.year, q.month).await?;
    Ok(Json(items).into_response())
}

/// PUT /api/planner/canvas
pub async fn save_canvas(
    State(state): State<AppState>,
    Json(req): Json<SaveCanvasRequest>,
) -> Result<Response> {
    let saved = state.canvas.save_items(req.year, req.month, req.items).await?;
    Ok(Json(saved).into_response())
}

/// GET /api/planner/entries?year&month
pub async fn month_summary(
    State(state): State<AppState>,
    Query(q): Query<MonthQuery>,
) -> Result<Response> {
    let summary = state.entries.month_summary(q.year, q.month).await?;
    Ok(Json(summary).into_response())
}

/// GET /api/planner/entries/{date}
pub async fn day_detail(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Response> {
    let entries = state.entries.day_detail(&date).await?;
    Ok(Json(entries).into_response())
}

/// POST /api/planner/entry
pub async fn create_entry(
    State(state): State<AppState>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<Response> {
    let created = state.entries.create_entry(req).await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// PATCH /api/planner/entry/{id}
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<Response> {
    let updated = state.entries.update_entry(&id, req).await?;
    Ok(Json(updated).into_response())
}

/// PATCH /api/planner/media/{id}
pub async fn update_media_attachment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateMediaAttachmentRequest>,
) -> Result<Response> {
    let updated = state.entries.update_media_attachment(&id, req).await?;
    Ok(Json(updated).into_response())
}

/// GET /api/planner/day-entries/{date}
pub async fn get_day_entry(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Response> {
    let entry = state.entries.get_day_entry(&date).await?;
    Ok(Json(entry).into_response())
}

/// PUT /api/planner/day-entries
pub async fn upsert_day_entry(
    State(state): State<AppState>,
    Json(req): Json<UpsertDayEntryRequest>,
) -> Result<Response> {
    let entry = state.entries.upsert_day_entry(&req.date, req.fields).await?;
    Ok(Json(entry).into_response())
}

/// GET /api/planner/decor?year&month
pub async fn list_decor(
    State(state): State<AppState>,
    Query(q): Query<MonthQuery>,
) -> Result<Response> {
    let smudges = state.smudge.list_month(q.year, q.month).await?;
    Ok(Json(smudges).into_response())
}

/// GET /api/planner/smudge/{date}
pub async fn get_smudge(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Response> {
    let smudge = state.smudge.get(&date).await?;
    Ok(Json(smudge).into_response())
}

/// POST /api/planner/smudge/{date}
///
/// An empty body means "randomize everything"; a non-empty body must be a
/// valid request, so type errors are rejected instead of being mistaken
/// for the empty case.
pub async fn set_smudge(
    State(state): State<AppState>,
    Path(date): Path<String>,
    body: Bytes,
) -> Result<Response> {
    let req = if body.is_empty() {
        SetSmudgeRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::validation(format!("Invalid smudge request: {}", e)))?
    };

    let smudge = state.smudge.set(&date, req).await?;
    Ok(Json(smudge).into_response())
}

/// DELETE /api/planner/smudge/{date}
pub async fn clear_smudge(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Response> {
    state.smudge.clear(&date).await?;
    Ok(Json(json!({ "ok": true })).into_response())
}

/// GET /api/planner/spreads?year&month — get-or-create the month's spread.
pub async fn get_or_create_spread(
    State(state): State<AppState>,
    Query(q): Query<MonthQuery>,
) -> Result<Response> {
    let page = state.pages.get_or_create(q.year, q.month).await?;
    Ok(Json(page).into_response())
}

/// GET /api/planner/spreads/{id}/elements
pub async fn list_spread_elements(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let items = state.items.list(&id).await?;
    Ok(Json(items).into_response())
}

/// PUT /api/planner/spreads/{id}/elements — full replace.
pub async fn replace_spread_elements(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(items): Json<Vec<crate::database::CreatePlannerItemRequest>>,
) -> Result<Response> {
    let replaced = state.items.replace_elements(&id, items).await?;
    Ok(Json(replaced).into_response())
}

#[derive(Debug, Deserialize)]
pub struct EntryUploadQuery {
    pub entry_id: String,
    pub filename: Option<String>,
    pub mime: Option<String>,
}

/// POST /api/planner/upload?entry_id&filename&mime — raw body upload tied
/// to an entry.
pub async fn upload_entry_media(
    State(state): State<AppState>,
    Query(q): Query<EntryUploadQuery>,
    body: Bytes,
) -> Result<Response> {
    if body.is_empty() {
        return Err(AppError::validation("Upload body is empty".to_string()));
    }

    // Entry must exist before we store anything.
    state.repo.get_entry(&q.entry_id).await?;

    let filename = q.filename.unwrap_or_else(|| "upload".to_string());
    let mime = q.mime.unwrap_or_else(|| "application/octet-stream".to_string());
    let media_type = if mime.starts_with("video/") { "video" } else { "image" };

    let hash = state.blobs.write(&body).await?;
    state
        .repo
        .record_media_file(&hash, &filename, &mime, body.len() as i64)
        .await?;

    let position = state.repo.list_media_for_entry(&q.entry_id).await?.len() as i64;
    let media = state
        .repo
        .create_entry_media(
            &q.entry_id,
            media_type,
            &format!("/media/{}", hash),
            None,
            position,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(media)).into_response())
}

/// GET /media/{hash} — serve an uploaded blob with its recorded type.
pub async fn serve_media(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Response> {
    let Some(file) = state.repo.get_media_file(&hash).await? else {
        return Err(AppError::NotFound(format!("media {}", hash)));
    };

    let data = state.blobs.read(&hash).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, file.mime_type)],
        data,
    )
        .into_response())
}

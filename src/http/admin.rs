//! Admin handlers
//!
//! Session-guarded mutation surface: login/logout, planner item CRUD,
//! page get-or-create and media upload. Every handler takes the
//! `AdminSession` extractor; there is no second auth path.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::app::AppState;
use crate::auth::AdminSession;
use crate::config::ADMIN_COOKIE;
use crate::database::{CreatePlannerItemRequest, UpdatePlannerItemRequest};
use crate::error::{AppError, Result};

use super::planner::MonthQuery;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response> {
    let token = state.auth.login(&req.password).await?;

    let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Strict", ADMIN_COOKIE, token);
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "ok": true })),
    )
        .into_response())
}

/// POST /api/admin/logout
pub async fn logout(State(state): State<AppState>, parts: axum::http::HeaderMap) -> Result<Response> {
    if let Some(token) = parts
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|header| {
            header
                .split(';')
                .map(str::trim)
                .find_map(|pair| pair.strip_prefix(ADMIN_COOKIE)?.strip_prefix('='))
        })
    {
        state.auth.logout(token).await;
    }

    let cookie = format!("{}=; Path=/; HttpOnly; Max-Age=0", ADMIN_COOKIE);
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "ok": true })),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct ItemListQuery {
    pub page_id: String,
}

/// GET /api/planner/admin/items?page_id
pub async fn list_items(
    _session: AdminSession,
    State(state): State<AppState>,
    Query(q): Query<ItemListQuery>,
) -> Result<Response> {
    let items = state.items.list(&q.page_id).await?;
    Ok(Json(items).into_response())
}

/// POST /api/planner/admin/items
pub async fn create_item(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(req): Json<CreatePlannerItemRequest>,
) -> Result<Response> {
    let item = state.items.create(req).await?;
    Ok((StatusCode::CREATED, Json(item)).into_response())
}

/// PATCH /api/planner/admin/items/{id}
pub async fn update_item(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePlannerItemRequest>,
) -> Result<Response> {
    let item = state.items.update(&id, req).await?;
    Ok(Json(item).into_response())
}

/// DELETE /api/planner/admin/items/{id}
pub async fn delete_item(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    state.items.delete(&id).await?;
    Ok(Json(json!({ "ok": true })).into_response())
}

/// GET and POST /api/planner/admin/pages — get-or-create by (year, month).
pub async fn get_or_create_page(
    _session: AdminSession,
    State(state): State<AppState>,
    Query(q): Query<MonthQuery>,
) -> Result<Response> {
    let page = state.pages.get_or_create(q.year, q.month).await?;
    Ok(Json(page).into_response())
}

#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    pub year: i64,
    pub month: i64,
}

pub async fn create_page(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(req): Json<CreatePageRequest>,
) -> Result<Response> {
    let page = state.pages.get_or_create(req.year, req.month).await?;
    Ok(Json(page).into_response())
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
    pub mime: Option<String>,
}

/// POST /api/planner/admin/upload — raw body image upload.
pub async fn upload(
    _session: AdminSession,
    State(state): State<AppState>,
    Query(q): Query<UploadQuery>,
    body: Bytes,
) -> Result<Response> {
    if body.is_empty() {
        return Err(AppError::validation("Upload body is empty".to_string()));
    }

    let filename = q.filename.unwrap_or_else(|| "upload".to_string());
    let mime = q.mime.unwrap_or_else(|| "application/octet-stream".to_string());

    let hash = state.blobs.write(&body).await?;
    let file = state
        .repo
        .record_media_file(&hash, &filename, &mime, body.len() as i64)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "hash": file.hash, "url": format!("/media/{}", file.hash) })),
    )
        .into_response())
}

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> Result<Response> {
    let settings = state.settings.get().await?;
    Ok(Json(settings).into_response())
}

/// PATCH /api/settings (session-guarded)
pub async fn patch_settings(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Response> {
    let settings = state.settings.patch(patch).await?;
    Ok(Json(settings).into_response())
}

//! HTTP module
//!
//! Route table and middleware stack for the planner API.

pub mod admin;
pub mod planner;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app::AppState;
use crate::config::MAX_UPLOAD_BYTES;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public planner surface
        .route("/api/planner/canvas", get(planner::list_canvas).put(planner::save_canvas))
        .route("/api/planner/entries", get(planner::month_summary))
        .route("/api/planner/entries/:date", get(planner::day_detail))
        .route("/api/planner/entry", post(planner::create_entry))
        .route("/api/planner/entry/:id", patch(planner::update_entry))
        .route("/api/planner/media/:id", patch(planner::update_media_attachment))
        .route(
            "/api/planner/day-entries",
            put(planner::upsert_day_entry),
        )
        .route(
            "/api/planner/day-entries/:date",
            get(planner::get_day_entry),
        )
        .route("/api/planner/decor", get(planner::list_decor))
        .route(
            "/api/planner/smudge/:date",
            get(planner::get_smudge)
                .post(planner::set_smudge)
                .delete(planner::clear_smudge),
        )
        .route("/api/planner/spreads", get(planner::get_or_create_spread))
        .route(
            "/api/planner/spreads/:id/elements",
            get(planner::list_spread_elements).put(planner::replace_spread_elements),
        )
        .route("/api/planner/upload", post(planner::upload_entry_media))
        .route("/media/:hash", get(planner::serve_media))
        // Admin surface
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/logout", post(admin::logout))
        .route(
            "/api/planner/admin/items",
            get(admin::list_items).post(admin::create_item),
        )
        .route(
            "/api/planner/admin/items/:id",
            patch(admin::update_item).delete(admin::delete_item),
        )
        .route(
            "/api/planner/admin/pages",
            get(admin::get_or_create_page).post(admin::create_page),
        )
        .route("/api/planner/admin/upload", post(admin::upload))
        // Site settings
        .route(
            "/api/settings",
            get(admin::get_settings).patch(admin::patch_settings),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Database models
//!
//! Row structs for every planner entity plus the request/patch shapes the
//! HTTP boundary deserializes. All models use serde for JSON responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A planner page: the persisted identity of one (year, month) spread.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Page {
    pub id: String,
    pub year: i64,
    pub month: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// A decorative canvas item positioned on one side of a month's spread.
///
/// Identified by the natural key (year, month, page, item_kind, item_key);
/// x and y are normalized to [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CanvasItem {
    pub id: String,
    pub year: i64,
    pub month: i64,
    pub page: String,
    pub item_kind: String,
    pub item_key: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub z_index: i64,
    pub updated_at: DateTime<Utc>,
}

/// One item of a canvas batch save.
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasItemInput {
    pub page: String,
    pub item_kind: String,
    pub item_key: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub z_index: i64,
}

/// Batch canvas save request.
#[derive(Debug, Deserialize)]
pub struct SaveCanvasRequest {
    pub year: i64,
    pub month: i64,
    pub items: Vec<CanvasItemInput>,
}

/// A rich planner item managed by the admin canvas editor.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlannerItem {
    pub id: String,
    pub page_id: String,
    pub page_side: String,
    pub item_type: String,
    pub asset_url: Option<String>,
    pub text_content: Option<String>,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale: f64,
    pub z_index: i64,
    /// Free-form styling bag, JSON-encoded.
    pub style_json: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_page_side() -> String {
    "left".to_string()
}

fn default_scale() -> f64 {
    1.0
}

/// Create planner item request
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlannerItemRequest {
    /// May be omitted when the target page comes from the URL path.
    #[serde(default)]
    pub page_id: String,
    #[serde(default = "default_page_side")]
    pub page_side: String,
    pub item_type: String,
    pub asset_url: Option<String>,
    pub text_content: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub z_index: i64,
    pub style: Option<serde_json::Value>,
}

/// Update planner item request (partial patch by presence)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlannerItemRequest {
    pub page_side: Option<String>,
    pub item_type: Option<String>,
    pub asset_url: Option<String>,
    pub text_content: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rotation: Option<f64>,
    pub scale: Option<f64>,
    pub z_index: Option<i64>,
    pub style: Option<serde_json::Value>,
}

/// A calendar day row, created lazily on first use.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlannerDay {
    pub id: String,
    /// Date in YYYY-MM-DD form.
    pub date: String,
    pub created_at: DateTime<Utc>,
}

/// A narrative journal entry attached to a day.
///
/// `tags` and `stickers` are JSON-encoded string arrays in storage; use
/// [`DayEntry::into_view`] for the API shape.
#[derive(Debug, Clone, FromRow)]
pub struct DayEntry {
    pub id: String,
    pub day_id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: String,
    pub mood: Option<String>,
    pub summary_quote: Option<String>,
    pub stickers: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API shape of a day entry with decoded tag/sticker arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryView {
    pub id: String,
    pub day_id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Vec<String>,
    pub mood: Option<String>,
    pub summary_quote: Option<String>,
    pub stickers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DayEntry {
    /// Decode the stored JSON arrays; malformed stored values degrade to
    /// empty lists rather than failing the read.
    pub fn into_view(self) -> EntryView {
        EntryView {
            id: self.id,
            day_id: self.day_id,
            title: self.title,
            content: self.content,
            tags: serde_json::from_str(&self.tags).unwrap_or_default(),
            mood: self.mood,
            summary_quote: self.summary_quote,
            stickers: serde_json::from_str(&self.stickers).unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// An entry together with its media, the day-detail projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryWithMedia {
    #[serde(flatten)]
    pub entry: EntryView,
    pub media: Vec<EntryMedia>,
}

/// One media row attached to an entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EntryMedia {
    pub id: String,
    pub entry_id: String,
    pub media_type: String,
    pub url: String,
    pub attachment_type: Option<String>,
    pub attachment_style: Option<String>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

/// Media supplied inline with entry creation.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaInput {
    #[serde(default = "default_media_type")]
    pub media_type: String,
    pub url: String,
    pub attachment_type: Option<String>,
}

fn default_media_type() -> String {
    "image".to_string()
}

/// Create entry request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntryRequest {
    pub date: String,
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub mood: Option<String>,
    pub summary_quote: Option<String>,
    #[serde(default)]
    pub stickers: Vec<String>,
    #[serde(default)]
    pub media: Vec<MediaInput>,
    /// Bare image URLs, attached after `media` in submission order.
    #[serde(default)]
    pub media_urls: Vec<String>,
}

/// Update entry request (partial patch by presence)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEntryRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub mood: Option<String>,
    pub summary_quote: Option<String>,
    pub stickers: Option<Vec<String>>,
}

/// Upsert-by-date request for the single day-entry path.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertDayEntryRequest {
    pub date: String,
    #[serde(flatten)]
    pub fields: UpdateEntryRequest,
}

/// Media attachment patch; empty strings clear the attachment visual.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMediaAttachmentRequest {
    pub attachment_type: Option<String>,
    pub attachment_style: Option<String>,
}

/// One day of the month-summary projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: String,
    pub entry_count: i64,
    pub title: Option<String>,
    pub mood: Option<String>,
    pub has_media: bool,
}

/// Flat row backing the month summary aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct MonthEntryRow {
    pub date: String,
    pub title: Option<String>,
    pub mood: Option<String>,
    pub has_media: bool,
}

/// A date's cosmetic ink-smudge overlay.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Smudge {
    pub date: String,
    pub preset: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub opacity: f64,
    pub updated_at: DateTime<Utc>,
}

/// Set-smudge request; omitted fields are randomized.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetSmudgeRequest {
    pub preset: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
}

/// An uploaded file recorded in the media index.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MediaFile {
    pub hash: String,
    pub filename: String,
    pub mime_type: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

//! Repository layer for database operations
//!
//! CRUD and upsert queries for every planner entity. Upserts use
//! `ON CONFLICT` on each entity's natural key, so get-or-create paths stay
//! race-safe without application-level locking.

use super::models::*;
use crate::error::{AppError, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ===== Pages =====

    /// Look up a page by its (year, month) natural key.
    pub async fn get_page(&self, year: i64, month: i64) -> Result<Option<Page>> {
        let page = sqlx::query_as::<_, Page>(
            "SELECT * FROM planner_pages WHERE year = ? AND month = ?",
        )
        .bind(year)
        .bind(month)
        .fetch_optional(&self.pool)
        .await?;

        Ok(page)
    }

    pub async fn get_page_by_id(&self, id: &str) -> Result<Option<Page>> {
        let page = sqlx::query_as::<_, Page>("SELECT * FROM planner_pages WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(page)
    }

    /// Insert a page for (year, month) unless one already exists, then
    /// return whichever row won. Two racing callers both land on one row.
    pub async fn ensure_page(&self, year: i64, month: i64, title: &str) -> Result<Page> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO planner_pages (id, year, month, title, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(year, month) DO NOTHING
            "#,
        )
        .bind(&id)
        .bind(year)
        .bind(month)
        .bind(title)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_page(year, month)
            .await?
            .ok_or_else(|| AppError::Generic(format!("Page {}-{} vanished after insert", year, month)))
    }

    // ===== Canvas items =====

    /// List canvas items for a month, bottom of the stack first.
    pub async fn list_canvas_items(&self, year: i64, month: i64) -> Result<Vec<CanvasItem>> {
        let items = sqlx::query_as::<_, CanvasItem>(
            r#"
            SELECT * FROM canvas_items
            WHERE year = ? AND month = ?
            ORDER BY z_index ASC, item_key ASC
            "#,
        )
        .bind(year)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Upsert one canvas item on its composite natural key; re-saving the
    /// same key overwrites position rather than duplicating.
    pub async fn upsert_canvas_item(
        &self,
        year: i64,
        month: i64,
        item: &CanvasItemInput,
    ) -> Result<CanvasItem> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let saved = sqlx::query_as::<_, CanvasItem>(
            r#"
            INSERT INTO canvas_items
                (id, year, month, page, item_kind, item_key, x, y, rotation, z_index, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(year, month, page, item_kind, item_key) DO UPDATE SET
                x = excluded.x,
                y = excluded.y,
                rotation = excluded.rotation,
                z_index = excluded.z_index,
                updated_at = excluded.updated_at
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(year)
        .bind(month)
        .bind(&item.page)
        .bind(&item.item_kind)
        .bind(&item.item_key)
        .bind(item.x)
        .bind(item.y)
        .bind(item.rotation)
        .bind(item.z_index)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    // ===== Planner items (admin canvas editor) =====

    pub async fn create_planner_item(&self, req: &CreatePlannerItemRequest) -> Result<PlannerItem> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let style_json = req
            .style
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let item = sqlx::query_as::<_, PlannerItem>(
            r#"
            INSERT INTO planner_items
                (id, page_id, page_side, item_type, asset_url, text_content,
                 x, y, rotation, scale, z_index, style_json, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.page_id)
        .bind(&req.page_side)
        .bind(&req.item_type)
        .bind(&req.asset_url)
        .bind(&req.text_content)
        .bind(req.x)
        .bind(req.y)
        .bind(req.rotation)
        .bind(req.scale)
        .bind(req.z_index)
        .bind(&style_json)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created planner item: {} on page {}", id, req.page_id);
        Ok(item)
    }

    pub async fn get_planner_item(&self, id: &str) -> Result<PlannerItem> {
        sqlx::query_as::<_, PlannerItem>("SELECT * FROM planner_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("planner item {}", id)))
    }

    /// List a page's items ordered by stacking order.
    pub async fn list_planner_items(&self, page_id: &str) -> Result<Vec<PlannerItem>> {
        let items = sqlx::query_as::<_, PlannerItem>(
            r#"
            SELECT * FROM planner_items
            WHERE page_id = ?
            ORDER BY z_index ASC, created_at ASC
            "#,
        )
        .bind(page_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Write back all mutable fields of an item (read-merge-write patching
    /// happens in the service).
    pub async fn save_planner_item(&self, item: &PlannerItem) -> Result<PlannerItem> {
        let now = Utc::now();

        let rows = sqlx::query(
            r#"
            UPDATE planner_items SET
                page_side = ?, item_type = ?, asset_url = ?, text_content = ?,
                x = ?, y = ?, rotation = ?, scale = ?, z_index = ?, style_json = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&item.page_side)
        .bind(&item.item_type)
        .bind(&item.asset_url)
        .bind(&item.text_content)
        .bind(item.x)
        .bind(item.y)
        .bind(item.rotation)
        .bind(item.scale)
        .bind(item.z_index)
        .bind(&item.style_json)
        .bind(now)
        .bind(&item.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound(format!("planner item {}", item.id)));
        }

        self.get_planner_item(&item.id).await
    }

    pub async fn delete_planner_item(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM planner_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound(format!("planner item {}", id)));
        }

        tracing::debug!("Deleted planner item: {}", id);
        Ok(())
    }

    /// Replace every item of a spread in one transaction: delete the current
    /// rows, insert the payload. Rows absent from the payload are gone after
    /// commit, unlike the additive canvas sync.
    pub async fn replace_planner_items(
        &self,
        page_id: &str,
        items: &[CreatePlannerItemRequest],
    ) -> Result<Vec<PlannerItem>> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM planner_items WHERE page_id = ?")
            .bind(page_id)
            .execute(&mut *tx)
            .await?;

        for req in items {
            let id = Uuid::new_v4().to_string();
            let style_json = req.style.as_ref().map(serde_json::to_string).transpose()?;

            sqlx::query(
                r#"
                INSERT INTO planner_items
                    (id, page_id, page_side, item_type, asset_url, text_content,
                     x, y, rotation, scale, z_index, style_json, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&id)
            .bind(page_id)
            .bind(&req.page_side)
            .bind(&req.item_type)
            .bind(&req.asset_url)
            .bind(&req.text_content)
            .bind(req.x)
            .bind(req.y)
            .bind(req.rotation)
            .bind(req.scale)
            .bind(req.z_index)
            .bind(&style_json)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!("Replaced {} items on page {}", items.len(), page_id);
        self.list_planner_items(page_id).await
    }

    // ===== Days =====

    pub async fn get_day(&self, date: &str) -> Result<Option<PlannerDay>> {
        let day = sqlx::query_as::<_, PlannerDay>("SELECT * FROM planner_days WHERE date = ?")
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;

        Ok(day)
    }

    /// Get-or-create the day row for a date, race-safe on UNIQUE(date).
    pub async fn ensure_day(&self, date: &str) -> Result<PlannerDay> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO planner_days (id, date, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(date) DO NOTHING
            "#,
        )
        .bind(&id)
        .bind(date)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_day(date)
            .await?
            .ok_or_else(|| AppError::Generic(format!("Day {} vanished after insert", date)))
    }

    // ===== Day entries =====

    #[allow(clippy::too_many_arguments)]
    pub async fn create_entry(
        &self,
        day_id: &str,
        title: Option<&str>,
        content: Option<&str>,
        tags_json: &str,
        mood: Option<&str>,
        summary_quote: Option<&str>,
        stickers_json: &str,
    ) -> Result<DayEntry> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let entry = sqlx::query_as::<_, DayEntry>(
            r#"
            INSERT INTO day_entries
                (id, day_id, title, content, tags, mood, summary_quote, stickers,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(day_id)
        .bind(title)
        .bind(content)
        .bind(tags_json)
        .bind(mood)
        .bind(summary_quote)
        .bind(stickers_json)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created entry: {} for day: {}", id, day_id);
        Ok(entry)
    }

    pub async fn get_entry(&self, id: &str) -> Result<DayEntry> {
        sqlx::query_as::<_, DayEntry>("SELECT * FROM day_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("entry {}", id)))
    }

    pub async fn list_entries_for_day(&self, day_id: &str) -> Result<Vec<DayEntry>> {
        let entries = sqlx::query_as::<_, DayEntry>(
            "SELECT * FROM day_entries WHERE day_id = ? ORDER BY created_at ASC",
        )
        .bind(day_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Write back all mutable fields of an entry.
    pub async fn save_entry(&self, entry: &DayEntry) -> Result<DayEntry> {
        let now = Utc::now();

        let rows = sqlx::query(
            r#"
            UPDATE day_entries SET
                title = ?, content = ?, tags = ?, mood = ?, summary_quote = ?,
                stickers = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(&entry.tags)
        .bind(&entry.mood)
        .bind(&entry.summary_quote)
        .bind(&entry.stickers)
        .bind(now)
        .bind(&entry.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound(format!("entry {}", entry.id)));
        }

        self.get_entry(&entry.id).await
    }

    /// Flat rows for the month-summary projection. `month_prefix` is
    /// `"YYYY-MM-"`.
    pub async fn month_entry_rows(&self, month_prefix: &str) -> Result<Vec<MonthEntryRow>> {
        let rows = sqlx::query_as::<_, MonthEntryRow>(
            r#"
            SELECT d.date AS date, e.title AS title, e.mood AS mood,
                   EXISTS(SELECT 1 FROM entry_media m WHERE m.entry_id = e.id) AS has_media
            FROM day_entries e
            JOIN planner_days d ON d.id = e.day_id
            WHERE d.date LIKE ?
            ORDER BY d.date ASC, e.created_at ASC
            "#,
        )
        .bind(format!("{}%", month_prefix))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ===== Entry media =====

    pub async fn create_entry_media(
        &self,
        entry_id: &str,
        media_type: &str,
        url: &str,
        attachment_type: Option<&str>,
        position: i64,
    ) -> Result<EntryMedia> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let media = sqlx::query_as::<_, EntryMedia>(
            r#"
            INSERT INTO entry_media
                (id, entry_id, media_type, url, attachment_type, attachment_style,
                 position, created_at)
            VALUES (?, ?, ?, ?, ?, NULL, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(entry_id)
        .bind(media_type)
        .bind(url)
        .bind(attachment_type)
        .bind(position)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created media: {} for entry: {}", id, entry_id);
        Ok(media)
    }

    pub async fn get_entry_media(&self, id: &str) -> Result<EntryMedia> {
        sqlx::query_as::<_, EntryMedia>("SELECT * FROM entry_media WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("media {}", id)))
    }

    /// Media rows in submission order.
    pub async fn list_media_for_entry(&self, entry_id: &str) -> Result<Vec<EntryMedia>> {
        let media = sqlx::query_as::<_, EntryMedia>(
            "SELECT * FROM entry_media WHERE entry_id = ? ORDER BY position ASC",
        )
        .bind(entry_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(media)
    }

    pub async fn save_media_attachment(
        &self,
        id: &str,
        attachment_type: Option<&str>,
        attachment_style: Option<&str>,
    ) -> Result<EntryMedia> {
        let rows = sqlx::query(
            "UPDATE entry_media SET attachment_type = ?, attachment_style = ? WHERE id = ?",
        )
        .bind(attachment_type)
        .bind(attachment_style)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound(format!("media {}", id)));
        }

        self.get_entry_media(id).await
    }

    // ===== Smudges =====

    pub async fn get_smudge(&self, date: &str) -> Result<Option<Smudge>> {
        let smudge = sqlx::query_as::<_, Smudge>("SELECT * FROM day_smudges WHERE date = ?")
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;

        Ok(smudge)
    }

    /// One smudge row per date, replaced wholesale on conflict.
    pub async fn upsert_smudge(
        &self,
        date: &str,
        preset: &str,
        x: f64,
        y: f64,
        rotation: f64,
        opacity: f64,
    ) -> Result<Smudge> {
        let now = Utc::now();

        let smudge = sqlx::query_as::<_, Smudge>(
            r#"
            INSERT INTO day_smudges (date, preset, x, y, rotation, opacity, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(date) DO UPDATE SET
                preset = excluded.preset,
                x = excluded.x,
                y = excluded.y,
                rotation = excluded.rotation,
                opacity = excluded.opacity,
                updated_at = excluded.updated_at
            RETURNING *
            "#,
        )
        .bind(date)
        .bind(preset)
        .bind(x)
        .bind(y)
        .bind(rotation)
        .bind(opacity)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(smudge)
    }

    /// Deleting an absent smudge is not an error.
    pub async fn delete_smudge(&self, date: &str) -> Result<()> {
        sqlx::query("DELETE FROM day_smudges WHERE date = ?")
            .bind(date)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Cleared smudge for: {}", date);
        Ok(())
    }

    pub async fn list_smudges_for_month(&self, month_prefix: &str) -> Result<Vec<Smudge>> {
        let smudges = sqlx::query_as::<_, Smudge>(
            "SELECT * FROM day_smudges WHERE date LIKE ? ORDER BY date ASC",
        )
        .bind(format!("{}%", month_prefix))
        .fetch_all(&self.pool)
        .await?;

        Ok(smudges)
    }

    // ===== Media files (uploads) =====

    /// Record an uploaded blob; re-uploading identical content keeps the
    /// original record.
    pub async fn record_media_file(
        &self,
        hash: &str,
        filename: &str,
        mime_type: &str,
        size: i64,
    ) -> Result<MediaFile> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO media_files (hash, filename, mime_type, size, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(hash) DO NOTHING
            "#,
        )
        .bind(hash)
        .bind(filename)
        .bind(mime_type)
        .bind(size)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_media_file(hash)
            .await?
            .ok_or_else(|| AppError::Generic(format!("Media file {} vanished after insert", hash)))
    }

    pub async fn get_media_file(&self, hash: &str) -> Result<Option<MediaFile>> {
        let file = sqlx::query_as::<_, MediaFile>("SELECT * FROM media_files WHERE hash = ?")
            .bind(hash)
            .fetch_optional(&self.pool)
            .await?;

        Ok(file)
    }

    // ===== Settings =====

    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Set setting: {}", key);
        Ok(())
    }
}

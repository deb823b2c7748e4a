//! Day entry aggregator
//!
//! Narrative journal entries attached to calendar dates, their media, and
//! the month/day read projections the calendar and flip-book views render.

use chrono::NaiveDate;

use super::pages::{validate_month, validate_year};
use crate::config::{ATTACHMENT_STYLES, ATTACHMENT_TYPES};
use crate::database::{
    CreateEntryRequest, DayEntry, DaySummary, EntryMedia, EntryView, EntryWithMedia, MediaInput,
    PlannerDay, Repository, UpdateEntryRequest, UpdateMediaAttachmentRequest,
};
use crate::error::{AppError, Result};

/// Parse a planner date, strictly YYYY-MM-DD.
///
/// chrono accepts non-zero-padded fields, but dates are stored and queried
/// as strings (day keys, `LIKE` month prefixes), so only the canonical
/// zero-padded form is allowed through.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Date must be YYYY-MM-DD, got {:?}", date)))?;

    if parsed.format("%Y-%m-%d").to_string() != date {
        return Err(AppError::validation(format!(
            "Date must be zero-padded YYYY-MM-DD, got {:?}",
            date
        )));
    }

    Ok(parsed)
}

/// Blank and whitespace-only text is stored as NULL, not as empty strings.
fn normalize_text(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Validate an attachment field against its vocabulary; the empty string is
/// the "clear" sentinel and normalizes to None.
fn normalize_attachment(
    value: Option<String>,
    allowed: &[&str],
    field: &str,
) -> Result<Option<String>> {
    match value {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) if allowed.contains(&s.as_str()) => Ok(Some(s)),
        Some(s) => Err(AppError::validation(format!(
            "Invalid {}: {:?}",
            field, s
        ))),
    }
}

/// Service for day entries, their media and calendar projections
#[derive(Clone)]
pub struct EntryService {
    repo: Repository,
}

impl EntryService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Idempotent get-or-create of the day row for a date. An invalid date
    /// fails before anything is written.
    pub async fn ensure_day(&self, date: &str) -> Result<PlannerDay> {
        parse_date(date)?;
        self.repo.ensure_day(date).await
    }

    /// Create an entry for a date and attach its media in submission order.
    ///
    /// The entry stands once its row exists: a media attach failure is
    /// logged and swallowed rather than rolling anything back.
    pub async fn create_entry(&self, req: CreateEntryRequest) -> Result<EntryWithMedia> {
        let day = self.ensure_day(&req.date).await?;

        let tags_json = serde_json::to_string(&req.tags)?;
        let stickers_json = serde_json::to_string(&req.stickers)?;
        let title = normalize_text(req.title);
        let content = normalize_text(req.content);

        let entry = self
            .repo
            .create_entry(
                &day.id,
                title.as_deref(),
                content.as_deref(),
                &tags_json,
                normalize_text(req.mood).as_deref(),
                normalize_text(req.summary_quote).as_deref(),
                &stickers_json,
            )
            .await?;

        tracing::info!("Created entry {} for {}", entry.id, req.date);

        let mut position = 0i64;
        for media in &req.media {
            self.attach_media_best_effort(&entry.id, media, position).await;
            position += 1;
        }
        for url in &req.media_urls {
            let media = MediaInput {
                media_type: "image".to_string(),
                url: url.clone(),
                attachment_type: None,
            };
            self.attach_media_best_effort(&entry.id, &media, position).await;
            position += 1;
        }

        let media = self.repo.list_media_for_entry(&entry.id).await?;
        Ok(EntryWithMedia {
            entry: entry.into_view(),
            media,
        })
    }

    async fn attach_media_best_effort(&self, entry_id: &str, media: &MediaInput, position: i64) {
        let result = self.attach_media(entry_id, media, position).await;
        if let Err(e) = result {
            tracing::warn!("Skipping media {:?} for entry {}: {}", media.url, entry_id, e);
        }
    }

    /// Attach one media row to an entry.
    pub async fn attach_media(
        &self,
        entry_id: &str,
        media: &MediaInput,
        position: i64,
    ) -> Result<EntryMedia> {
        if media.media_type != "image" && media.media_type != "video" {
            return Err(AppError::validation(format!(
                "Media type must be image or video, got {:?}",
                media.media_type
            )));
        }
        if media.url.trim().is_empty() {
            return Err(AppError::validation("Media url must be non-empty".to_string()));
        }
        let attachment_type = normalize_attachment(
            media.attachment_type.clone(),
            ATTACHMENT_TYPES,
            "attachment_type",
        )?;

        self.repo
            .create_entry_media(
                entry_id,
                &media.media_type,
                &media.url,
                attachment_type.as_deref(),
                position,
            )
            .await
    }

    /// Patch an entry. Only fields present in the request are written;
    /// absent fields stay untouched.
    pub async fn update_entry(&self, id: &str, patch: UpdateEntryRequest) -> Result<EntryView> {
        let mut entry = self.repo.get_entry(id).await?;
        apply_entry_patch(&mut entry, patch)?;
        let saved = self.repo.save_entry(&entry).await?;
        Ok(saved.into_view())
    }

    /// Month summary: one line per day that has entries.
    pub async fn month_summary(&self, year: i64, month: i64) -> Result<Vec<DaySummary>> {
        validate_year(year)?;
        validate_month(month)?;

        let prefix = format!("{:04}-{:02}-", year, month);
        let rows = self.repo.month_entry_rows(&prefix).await?;

        let mut summaries: Vec<DaySummary> = Vec::new();
        for row in rows {
            match summaries.last_mut() {
                Some(day) if day.date == row.date => {
                    day.entry_count += 1;
                    day.has_media = day.has_media || row.has_media;
                }
                _ => summaries.push(DaySummary {
                    date: row.date,
                    entry_count: 1,
                    title: row.title,
                    mood: row.mood,
                    has_media: row.has_media,
                }),
            }
        }

        Ok(summaries)
    }

    /// Every entry of a date with its media. A date with no day row is a
    /// normal empty state.
    pub async fn day_detail(&self, date: &str) -> Result<Vec<EntryWithMedia>> {
        parse_date(date)?;

        let Some(day) = self.repo.get_day(date).await? else {
            return Ok(Vec::new());
        };

        let entries = self.repo.list_entries_for_day(&day.id).await?;
        let mut detailed = Vec::with_capacity(entries.len());
        for entry in entries {
            let media = self.repo.list_media_for_entry(&entry.id).await?;
            detailed.push(EntryWithMedia {
                entry: entry.into_view(),
                media,
            });
        }

        Ok(detailed)
    }

    /// The single day-entry view: the date's first entry, if any.
    pub async fn get_day_entry(&self, date: &str) -> Result<Option<EntryWithMedia>> {
        Ok(self.day_detail(date).await?.into_iter().next())
    }

    /// Upsert by date: patch the date's first entry or create one.
    pub async fn upsert_day_entry(
        &self,
        date: &str,
        fields: UpdateEntryRequest,
    ) -> Result<EntryWithMedia> {
        let day = self.ensure_day(date).await?;

        let existing = self.repo.list_entries_for_day(&day.id).await?.into_iter().next();
        let entry = match existing {
            Some(mut entry) => {
                apply_entry_patch(&mut entry, fields)?;
                self.repo.save_entry(&entry).await?
            }
            None => {
                let tags_json = serde_json::to_string(&fields.tags.unwrap_or_default())?;
                let stickers_json = serde_json::to_string(&fields.stickers.unwrap_or_default())?;
                self.repo
                    .create_entry(
                        &day.id,
                        normalize_text(fields.title).as_deref(),
                        normalize_text(fields.content).as_deref(),
                        &tags_json,
                        normalize_text(fields.mood).as_deref(),
                        normalize_text(fields.summary_quote).as_deref(),
                        &stickers_json,
                    )
                    .await?
            }
        };

        let media = self.repo.list_media_for_entry(&entry.id).await?;
        Ok(EntryWithMedia {
            entry: entry.into_view(),
            media,
        })
    }

    /// Patch a media row's attachment visual. Empty strings clear; values
    /// outside the vocabulary are rejected.
    pub async fn update_media_attachment(
        &self,
        id: &str,
        patch: UpdateMediaAttachmentRequest,
    ) -> Result<EntryMedia> {
        let current = self.repo.get_entry_media(id).await?;

        let attachment_type = match patch.attachment_type {
            None => current.attachment_type.clone(),
            some => normalize_attachment(some, ATTACHMENT_TYPES, "attachment_type")?,
        };
        let attachment_style = match patch.attachment_style {
            None => current.attachment_style.clone(),
            some => normalize_attachment(some, ATTACHMENT_STYLES, "attachment_style")?,
        };

        self.repo
            .save_media_attachment(id, attachment_type.as_deref(), attachment_style.as_deref())
            .await
    }
}

/// Overwrite an entry's fields from the patch, presence-wise.
fn apply_entry_patch(entry: &mut DayEntry, patch: UpdateEntryRequest) -> Result<()> {
    if patch.title.is_some() {
        entry.title = normalize_text(patch.title);
    }
    if patch.content.is_some() {
        entry.content = normalize_text(patch.content);
    }
    if let Some(tags) = patch.tags {
        entry.tags = serde_json::to_string(&tags)?;
    }
    if patch.mood.is_some() {
        entry.mood = normalize_text(patch.mood);
    }
    if patch.summary_quote.is_some() {
        entry.summary_quote = normalize_text(patch.summary_quote);
    }
    if let Some(stickers) = patch.stickers {
        entry.stickers = serde_json::to_string(&stickers)?;
    }
    Ok(())
}

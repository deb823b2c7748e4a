//! Canvas item store
//!
//! Batch persistence for the public canvas editor's decorative items.
//! Saves are upsert-only on the composite natural key: re-saving a key
//! moves the item, and items missing from a payload are left in place.

use super::pages::{validate_month, validate_year, PageRegistry};
use crate::config::PAGE_SIDES;
use crate::database::{CanvasItem, CanvasItemInput, Repository};
use crate::error::{AppError, Result};

/// Service for the month-canvas decorative items
#[derive(Clone)]
pub struct CanvasService {
    repo: Repository,
    pages: PageRegistry,
}

impl CanvasService {
    pub fn new(repo: Repository, pages: PageRegistry) -> Self {
        Self { repo, pages }
    }

    /// List a month's canvas items. A month whose page was never created
    /// is a normal empty state, not an error.
    pub async fn list_items(&self, year: i64, month: i64) -> Result<Vec<CanvasItem>> {
        if self.pages.get(year, month).await?.is_none() {
            return Ok(Vec::new());
        }
        self.repo.list_canvas_items(year, month).await
    }

    /// Batch upsert of canvas items.
    ///
    /// Out-of-range x/y are clamped into [0, 1] rather than rejected; an
    /// unknown page side fails the whole batch up front. The first failing
    /// upsert aborts the batch; earlier upserts stay applied.
    pub async fn save_items(
        &self,
        year: i64,
        month: i64,
        items: Vec<CanvasItemInput>,
    ) -> Result<Vec<CanvasItem>> {
        validate_year(year)?;
        validate_month(month)?;

        for item in &items {
            if !PAGE_SIDES.contains(&item.page.as_str()) {
                return Err(AppError::validation(format!(
                    "Unknown page side: {}",
                    item.page
                )));
            }
            if item.item_kind.trim().is_empty() || item.item_key.trim().is_empty() {
                return Err(AppError::validation(
                    "item_kind and item_key must be non-empty".to_string(),
                ));
            }
        }

        // The page must exist before items reference its month.
        self.pages.get_or_create(year, month).await?;

        let mut saved = Vec::with_capacity(items.len());
        for mut item in items {
            item.x = item.x.clamp(0.0, 1.0);
            item.y = item.y.clamp(0.0, 1.0);
            saved.push(self.repo.upsert_canvas_item(year, month, &item).await?);
        }

        tracing::debug!("Saved {} canvas items for {}-{:02}", saved.len(), year, month);
        Ok(saved)
    }
}

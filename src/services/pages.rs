//! Page/spread registry
//!
//! Maps a (year, month) pair to its unique persisted page, creating it
//! lazily on first access. Pages are never deleted.

use crate::config::MONTH_NAMES;
use crate::database::{Page, Repository};
use crate::error::{AppError, Result};

/// Validate a planner month.
pub fn validate_month(month: i64) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(AppError::validation(format!(
            "Month must be between 1 and 12, got {}",
            month
        )));
    }
    Ok(())
}

/// Validate a planner year. The bounds are generous; the point is catching
/// swapped year/month arguments and garbage input.
pub fn validate_year(year: i64) -> Result<()> {
    if !(1900..=2200).contains(&year) {
        return Err(AppError::validation(format!(
            "Year must be between 1900 and 2200, got {}",
            year
        )));
    }
    Ok(())
}

/// Registry of planner pages keyed by (year, month)
#[derive(Clone)]
pub struct PageRegistry {
    repo: Repository,
}

impl PageRegistry {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Resolve the page for a month, creating it with a human-readable
    /// title ("Mart 2026") on first access.
    pub async fn get_or_create(&self, year: i64, month: i64) -> Result<Page> {
        validate_year(year)?;
        validate_month(month)?;

        if let Some(page) = self.repo.get_page(year, month).await? {
            return Ok(page);
        }

        let title = format!("{} {}", MONTH_NAMES[(month - 1) as usize], year);
        tracing::info!("Creating planner page: {}", title);

        self.repo.ensure_page(year, month, &title).await
    }

    /// Look up a month's page without creating it.
    pub async fn get(&self, year: i64, month: i64) -> Result<Option<Page>> {
        validate_year(year)?;
        validate_month(month)?;
        self.repo.get_page(year, month).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Page>> {
        self.repo.get_page_by_id(id).await
    }
}

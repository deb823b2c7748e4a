//! Site settings service
//!
//! The site's configuration aggregate: one JSON value in the settings
//! table, lazily materialized with defaults and updated by merge patch so
//! unpatched fields survive.

use serde::{Deserialize, Serialize};

use crate::database::Repository;
use crate::error::{AppError, Result};

const SITE_SETTINGS_KEY: &str = "site";

/// Site-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteSettings {
    #[serde(default = "default_site_title")]
    pub site_title: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    #[serde(default)]
    pub footer_note: Option<String>,
    #[serde(default = "default_true")]
    pub show_planner: bool,
}

fn default_site_title() -> String {
    "Plaktaki Kitap".to_string()
}

fn default_accent_color() -> String {
    "#b5485d".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_title: default_site_title(),
            tagline: None,
            accent_color: default_accent_color(),
            footer_note: None,
            show_planner: true,
        }
    }
}

/// Service for the settings aggregate
#[derive(Clone)]
pub struct SiteSettingsService {
    repo: Repository,
}

impl SiteSettingsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Current settings; the first read persists the defaults.
    pub async fn get(&self) -> Result<SiteSettings> {
        match self.repo.get_setting(SITE_SETTINGS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => {
                let defaults = SiteSettings::default();
                self.repo
                    .set_setting(SITE_SETTINGS_KEY, &serde_json::to_string(&defaults)?)
                    .await?;
                Ok(defaults)
            }
        }
    }

    /// Merge-patch: only the keys present in the patch object change.
    pub async fn patch(&self, patch: serde_json::Value) -> Result<SiteSettings> {
        let serde_json::Value::Object(patch) = patch else {
            return Err(AppError::validation(
                "Settings patch must be a JSON object".to_string(),
            ));
        };

        let current = self.get().await?;
        let mut merged = match serde_json::to_value(&current)? {
            serde_json::Value::Object(map) => map,
            _ => unreachable!("settings serialize to an object"),
        };

        for (key, value) in patch {
            if !merged.contains_key(&key) {
                return Err(AppError::validation(format!("Unknown setting: {:?}", key)));
            }
            merged.insert(key, value);
        }

        let updated: SiteSettings = serde_json::from_value(serde_json::Value::Object(merged))
            .map_err(|e| AppError::validation(format!("Invalid settings patch: {}", e)))?;

        self.repo
            .set_setting(SITE_SETTINGS_KEY, &serde_json::to_string(&updated)?)
            .await?;

        tracing::info!("Site settings updated");
        Ok(updated)
    }
}

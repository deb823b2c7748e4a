//! Smudge decorator
//!
//! Per-date cosmetic ink/stain overlays. Parameter generation is a pure
//! function over an injected RNG so the randomization policy is testable
//! apart from persistence.

use rand::Rng;

use super::entries::parse_date;
use super::pages::{validate_month, validate_year};
use crate::config::{
    SMUDGE_OPACITY_BOUNDS, SMUDGE_OPACITY_RANGE, SMUDGE_PRESETS, SMUDGE_ROTATION_RANGE,
    SMUDGE_X_RANGE, SMUDGE_Y_RANGE,
};
use crate::database::{Repository, SetSmudgeRequest, Smudge};
use crate::error::{AppError, Result};

/// Fully resolved smudge parameters, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct SmudgeParams {
    pub preset: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub opacity: f64,
}

impl SmudgeParams {
    /// Generate a plausible smudge within the designed ranges.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            preset: SMUDGE_PRESETS[rng.gen_range(0..SMUDGE_PRESETS.len())].to_string(),
            x: rng.gen_range(SMUDGE_X_RANGE.0..=SMUDGE_X_RANGE.1),
            y: rng.gen_range(SMUDGE_Y_RANGE.0..=SMUDGE_Y_RANGE.1),
            rotation: rng.gen_range(SMUDGE_ROTATION_RANGE.0..=SMUDGE_ROTATION_RANGE.1),
            opacity: rng.gen_range(SMUDGE_OPACITY_RANGE.0..=SMUDGE_OPACITY_RANGE.1),
        }
    }

    /// Resolve a request against random defaults: omitted fields are
    /// generated, a supplied preset must be known, and opacity is clamped
    /// to its hard bounds even when explicit.
    pub fn resolve<R: Rng>(req: SetSmudgeRequest, rng: &mut R) -> Result<Self> {
        let defaults = Self::random(rng);

        let preset = match req.preset {
            None => defaults.preset,
            Some(p) if SMUDGE_PRESETS.contains(&p.as_str()) => p,
            Some(p) => {
                return Err(AppError::validation(format!("Unknown smudge preset: {:?}", p)))
            }
        };

        Ok(Self {
            preset,
            x: req.x.unwrap_or(defaults.x),
            y: req.y.unwrap_or(defaults.y),
            rotation: req.rotation.unwrap_or(defaults.rotation),
            opacity: req
                .opacity
                .unwrap_or(defaults.opacity)
                .clamp(SMUDGE_OPACITY_BOUNDS.0, SMUDGE_OPACITY_BOUNDS.1),
        })
    }
}

/// Service for date-keyed smudge overlays
#[derive(Clone)]
pub struct SmudgeService {
    repo: Repository,
}

impl SmudgeService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn get(&self, date: &str) -> Result<Option<Smudge>> {
        parse_date(date)?;
        self.repo.get_smudge(date).await
    }

    /// Create or replace the date's smudge.
    pub async fn set(&self, date: &str, req: SetSmudgeRequest) -> Result<Smudge> {
        parse_date(date)?;
        let params = SmudgeParams::resolve(req, &mut rand::thread_rng())?;

        self.repo
            .upsert_smudge(
                date,
                &params.preset,
                params.x,
                params.y,
                params.rotation,
                params.opacity,
            )
            .await
    }

    pub async fn clear(&self, date: &str) -> Result<()> {
        parse_date(date)?;
        self.repo.delete_smudge(date).await
    }

    /// All smudges of a month, for the decor overlay list.
    pub async fn list_month(&self, year: i64, month: i64) -> Result<Vec<Smudge>> {
        validate_year(year)?;
        validate_month(month)?;
        let prefix = format!("{:04}-{:02}-", year, month);
        self.repo.list_smudges_for_month(&prefix).await
    }
}

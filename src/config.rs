//! Application configuration
//!
//! Runtime configuration loaded from `PLAKTAKI_*` environment variables,
//! plus the validation boundaries and fixed vocabularies used throughout
//! the planner.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{AppError, Result};

// ===== Planner Vocabularies =====

/// Month names used when titling a lazily created page, indexed by month - 1.
pub const MONTH_NAMES: &[&str] = &[
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos",
    "Eylül", "Ekim", "Kasım", "Aralık",
];

/// Page sides of a planner spread.
pub const PAGE_SIDES: &[&str] = &["left", "right"];

/// Recognized planner item kinds for the admin canvas editor.
pub const ITEM_TYPES: &[&str] = &[
    "photo",
    "polaroid",
    "sticker",
    "postit",
    "tape",
    "paperclip",
    "text",
    "doodle",
    "coffee_stain",
];

/// Smudge texture presets.
pub const SMUDGE_PRESETS: &[&str] = &["ink_blot", "ink_streak", "coffee_ring", "fingerprint"];

/// Valid media attachment visuals for entry media.
pub const ATTACHMENT_TYPES: &[&str] = &["paperclip", "paste", "staple"];

/// Valid attachment style presets.
pub const ATTACHMENT_STYLES: &[&str] = &["standard_clip", "colorful_clip", "binder_clip", "staple"];

// ===== Smudge Randomization Ranges =====

/// Horizontal placement range for a generated smudge.
pub const SMUDGE_X_RANGE: (f64, f64) = (0.2, 0.8);
/// Vertical placement range for a generated smudge.
pub const SMUDGE_Y_RANGE: (f64, f64) = (0.3, 0.8);
/// Rotation range in degrees for a generated smudge.
pub const SMUDGE_ROTATION_RANGE: (f64, f64) = (-20.0, 20.0);
/// Opacity range for a generated smudge.
pub const SMUDGE_OPACITY_RANGE: (f64, f64) = (0.1, 0.25);
/// Hard opacity bounds applied even to explicitly supplied values.
pub const SMUDGE_OPACITY_BOUNDS: (f64, f64) = (0.05, 1.0);

// ===== Request Limits =====

/// Maximum accepted upload size in bytes (8 MiB).
pub const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

/// Name of the admin session cookie.
pub const ADMIN_COOKIE: &str = "plaktaki_admin";

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Directory holding the SQLite database and the blob store.
    pub data_dir: PathBuf,
    /// Argon2 PHC-format hash of the admin password.
    pub admin_password_hash: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `PLAKTAKI_ADMIN_PASSWORD_HASH` is mandatory; everything else has a
    /// development-friendly default.
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("PLAKTAKI_BIND")
            .unwrap_or_else(|_| "127.0.0.1:8686".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::validation(format!("Invalid PLAKTAKI_BIND: {}", e)))?;

        let data_dir = std::env::var("PLAKTAKI_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let admin_password_hash = std::env::var("PLAKTAKI_ADMIN_PASSWORD_HASH").map_err(|_| {
            AppError::validation("PLAKTAKI_ADMIN_PASSWORD_HASH must be set".to_string())
        })?;

        Ok(Self {
            bind_addr,
            data_dir,
            admin_password_hash,
        })
    }

    /// Path of the SQLite database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("plaktaki.db")
    }

    /// Root of the content-addressed blob store.
    pub fn blob_root(&self) -> PathBuf {
        self.data_dir.join("blobs")
    }
}

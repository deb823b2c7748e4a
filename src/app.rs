//! Application state and initialization
//!
//! All services are built here once at startup and shared through
//! `AppState`, the axum state for every handler.

use crate::auth::AdminAuth;
use crate::config::Config;
use crate::database::{create_pool, Repository};
use crate::error::Result;
use crate::services::{
    CanvasService, EntryService, ItemService, PageRegistry, SiteSettingsService, SmudgeService,
};
use crate::storage::BlobStore;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub pages: PageRegistry,
    pub canvas: CanvasService,
    pub entries: EntryService,
    pub items: ItemService,
    pub smudge: SmudgeService,
    pub settings: SiteSettingsService,
    pub auth: AdminAuth,
    pub repo: Repository,
    pub blobs: BlobStore,
}

impl AppState {
    /// Wire every service over a repository and blob store.
    pub fn new(repo: Repository, blobs: BlobStore, auth: AdminAuth) -> Self {
        let pages = PageRegistry::new(repo.clone());
        Self {
            canvas: CanvasService::new(repo.clone(), pages.clone()),
            entries: EntryService::new(repo.clone()),
            items: ItemService::new(repo.clone(), pages.clone()),
            smudge: SmudgeService::new(repo.clone()),
            settings: SiteSettingsService::new(repo.clone()),
            pages,
            auth,
            repo,
            blobs,
        }
    }
}

/// Application setup: data directories, database pool, blob store.
pub async fn init(config: &Config) -> Result<AppState> {
    tracing::info!("Initializing application");

    std::fs::create_dir_all(&config.data_dir)?;

    let pool = create_pool(&config.db_path()).await?;
    let repo = Repository::new(pool);

    let blobs = BlobStore::new(config.blob_root());
    blobs.initialize().await?;

    let auth = AdminAuth::new(config.admin_password_hash.clone());

    tracing::info!("Application initialized");
    Ok(AppState::new(repo, blobs, auth))
}

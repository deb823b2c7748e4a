//! Services module
//!
//! Business logic between the HTTP handlers and the repository.

pub mod canvas;
pub mod entries;
pub mod items;
pub mod pages;
pub mod site_settings;
pub mod smudge;

pub use canvas::CanvasService;
pub use entries::EntryService;
pub use items::ItemService;
pub use pages::PageRegistry;
pub use site_settings::{SiteSettings, SiteSettingsService};
pub use smudge::SmudgeService;

//! Planner item service
//!
//! The admin canvas editor's richer item model: single-row create, partial
//! patch, delete, z-ordered listing, and the whole-spread element replace.

use super::pages::PageRegistry;
use crate::config::{ITEM_TYPES, PAGE_SIDES};
use crate::database::{
    CreatePlannerItemRequest, PlannerItem, Repository, UpdatePlannerItemRequest,
};
use crate::error::{AppError, Result};

fn validate_item_type(item_type: &str) -> Result<()> {
    if !ITEM_TYPES.contains(&item_type) {
        return Err(AppError::validation(format!(
            "Unknown item type: {:?}",
            item_type
        )));
    }
    Ok(())
}

fn validate_page_side(side: &str) -> Result<()> {
    if !PAGE_SIDES.contains(&side) {
        return Err(AppError::validation(format!("Unknown page side: {:?}", side)));
    }
    Ok(())
}

/// Service for admin planner items
#[derive(Clone)]
pub struct ItemService {
    repo: Repository,
    pages: PageRegistry,
}

impl ItemService {
    pub fn new(repo: Repository, pages: PageRegistry) -> Self {
        Self { repo, pages }
    }

    pub async fn create(&self, req: CreatePlannerItemRequest) -> Result<PlannerItem> {
        validate_item_type(&req.item_type)?;
        validate_page_side(&req.page_side)?;

        if self.pages.get_by_id(&req.page_id).await?.is_none() {
            return Err(AppError::validation(format!(
                "Unknown page: {}",
                req.page_id
            )));
        }

        self.repo.create_planner_item(&req).await
    }

    pub async fn get(&self, id: &str) -> Result<PlannerItem> {
        self.repo.get_planner_item(id).await
    }

    /// List a page's items in stacking order.
    pub async fn list(&self, page_id: &str) -> Result<Vec<PlannerItem>> {
        self.repo.list_planner_items(page_id).await
    }

    /// Partial patch by presence.
    pub async fn update(&self, id: &str, patch: UpdatePlannerItemRequest) -> Result<PlannerItem> {
        let mut item = self.repo.get_planner_item(id).await?;

        if let Some(side) = patch.page_side {
            validate_page_side(&side)?;
            item.page_side = side;
        }
        if let Some(item_type) = patch.item_type {
            validate_item_type(&item_type)?;
            item.item_type = item_type;
        }
        if patch.asset_url.is_some() {
            item.asset_url = patch.asset_url;
        }
        if patch.text_content.is_some() {
            item.text_content = patch.text_content;
        }
        if let Some(x) = patch.x {
            item.x = x;
        }
        if let Some(y) = patch.y {
            item.y = y;
        }
        if let Some(rotation) = patch.rotation {
            item.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            item.scale = scale;
        }
        if let Some(z_index) = patch.z_index {
            item.z_index = z_index;
        }
        if let Some(style) = patch.style {
            item.style_json = Some(serde_json::to_string(&style)?);
        }

        self.repo.save_planner_item(&item).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repo.delete_planner_item(id).await
    }

    /// Replace a spread's elements wholesale. Unlike the public canvas
    /// sync, rows absent from the payload are deleted.
    pub async fn replace_elements(
        &self,
        page_id: &str,
        items: Vec<CreatePlannerItemRequest>,
    ) -> Result<Vec<PlannerItem>> {
        if self.pages.get_by_id(page_id).await?.is_none() {
            return Err(AppError::NotFound(format!("spread {}", page_id)));
        }

        let mut normalized = Vec::with_capacity(items.len());
        for mut req in items {
            validate_item_type(&req.item_type)?;
            validate_page_side(&req.page_side)?;
            req.page_id = page_id.to_string();
            normalized.push(req);
        }

        self.repo.replace_planner_items(page_id, &normalized).await
    }
}

//! Item submission, catalog listing, and moderation DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{PaginationMeta, default_page, default_per_page};
use crate::domain::{
    Category, Condition, ItemId, ItemQuery, ItemStatus, ItemType, Size, UserId,
};
use crate::service::{ItemWithOwner, NewItem};

/// Request body for `POST /items`.
///
/// Produced by the item submission collaborator: images are already
/// uploaded (opaque URIs), description/tags may come from AI suggestion.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitItemRequest {
    /// Listing title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Audience category.
    pub category: Category,
    /// Garment type.
    pub item_type: ItemType,
    /// Garment size.
    pub size: Size,
    /// Condition at submission.
    pub condition: Condition,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ordered opaque image URIs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Redemption price in points.
    pub points: i64,
}

impl From<SubmitItemRequest> for NewItem {
    fn from(req: SubmitItemRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            category: req.category,
            item_type: req.item_type,
            size: req.size,
            condition: req.condition,
            tags: req.tags,
            images: req.images,
            points: req.points,
        }
    }
}

/// Owner summary embedded in item responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemOwnerDto {
    /// Owner's user ID.
    pub id: UserId,
    /// Owner's display name.
    pub display_name: String,
}

/// Full item representation with owner joined.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemDto {
    /// Item identifier.
    pub id: ItemId,
    /// Listing title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Audience category.
    pub category: Category,
    /// Garment type.
    pub item_type: ItemType,
    /// Garment size.
    pub size: Size,
    /// Condition at submission.
    pub condition: Condition,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Ordered opaque image URIs.
    pub images: Vec<String>,
    /// Redemption price in points.
    pub points: i64,
    /// Lifecycle status.
    pub status: ItemStatus,
    /// Current owner.
    pub owner: ItemOwnerDto,
    /// Listing timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,
}

impl From<ItemWithOwner> for ItemDto {
    fn from(entry: ItemWithOwner) -> Self {
        Self {
            id: entry.item.id,
            title: entry.item.title,
            description: entry.item.description,
            category: entry.item.category,
            item_type: entry.item.item_type,
            size: entry.item.size,
            condition: entry.item.condition,
            tags: entry.item.tags,
            images: entry.item.images,
            points: entry.item.points,
            status: entry.item.status,
            owner: ItemOwnerDto {
                id: entry.owner.id,
                display_name: entry.owner.display_name,
            },
            created_at: entry.item.created_at,
            updated_at: entry.item.updated_at,
        }
    }
}

/// Response body for paginated item listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemListResponse {
    /// Items on this page.
    pub data: Vec<ItemDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Query parameters for `GET /items`.
///
/// The same shape the natural-language search collaborator produces; every
/// enumerated field is validated during deserialization.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CatalogQueryParams {
    /// Restrict to one audience category.
    pub category: Option<Category>,
    /// Restrict to one garment type.
    pub item_type: Option<ItemType>,
    /// Restrict to one size.
    pub size: Option<Size>,
    /// Restrict to one condition.
    pub condition: Option<Condition>,
    /// Case-insensitive substring match against title or description.
    pub search: Option<String>,
    /// Restrict to one lifecycle status. Defaults to `approved`.
    pub status: Option<ItemStatus>,
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl CatalogQueryParams {
    /// Converts the query parameters into a domain [`ItemQuery`].
    #[must_use]
    pub fn to_item_query(&self) -> ItemQuery {
        ItemQuery {
            category: self.category,
            item_type: self.item_type,
            size: self.size,
            condition: self.condition,
            search: self.search.clone(),
            owner: None,
            status: self.status,
        }
    }
}

/// Query parameters for `GET /items/mine`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct OwnedItemsParams {
    /// Restrict to one lifecycle status. Unset means all statuses.
    pub status: Option<ItemStatus>,
}

/// Request body for `PUT /admin/items/{id}/status`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ModerateItemRequest {
    /// Target status: `approved` or `rejected`.
    pub status: ItemStatus,
}

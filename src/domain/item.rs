//! Listed garments: lifecycle status, enumerated attributes, and the
//! validated catalog filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ItemId, UserId};

/// Lifecycle status of a listed item.
///
/// `Pending` items await moderation and are invisible to the catalog.
/// `Swapped` is terminal: it marks an item consumed by a points settlement
/// and retained for ledger auditability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Submitted, awaiting moderation.
    Pending,
    /// Approved by an admin; visible and requestable.
    Approved,
    /// Rejected by an admin; hidden from the catalog.
    Rejected,
    /// Consumed by a points settlement. Terminal.
    Swapped,
}

/// Audience category of a garment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Menswear.
    Men,
    /// Womenswear.
    Women,
    /// Children's clothing.
    Kids,
}

/// Garment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Shirts and tops.
    Shirt,
    /// Trousers and jeans.
    Pants,
    /// Dresses.
    Dress,
    /// Jackets and coats.
    Jacket,
    /// Footwear.
    Shoes,
    /// Bags, belts, scarves, and other accessories.
    Accessories,
}

/// Garment size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    /// Extra small.
    Xs,
    /// Small.
    S,
    /// Medium.
    M,
    /// Large.
    L,
    /// Extra large.
    Xl,
    /// Double extra large.
    Xxl,
}

/// Garment condition as assessed at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    /// Worn once or twice, indistinguishable from new.
    LikeNew,
    /// Light signs of wear.
    Excellent,
    /// Visible wear, fully functional.
    Good,
    /// Heavy wear.
    Fair,
}

/// A listed garment.
///
/// The point price is immutable after creation; ownership changes only
/// through swap settlement, and status only through moderation or points
/// settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique item identifier.
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
    /// Free-form tags (supplied by the submission collaborator).
    pub tags: Vec<String>,
    /// Ordered opaque image URIs.
    pub images: Vec<String>,
    /// Redemption price in points. Immutable after creation.
    pub points: i64,
    /// Lifecycle status.
    pub status: ItemStatus,
    /// Current owner. Mutable: changes on swap settlement.
    pub owner: UserId,
    /// Listing timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,
}

/// Validated catalog filter.
///
/// Every field is a typed optional; an unset field does not constrain the
/// result. Filter input coming from the natural-language search collaborator
/// is deserialized into this same struct, so it passes through identical
/// enumerated-value validation as manually selected filters. The public
/// catalog applies a default of [`ItemStatus::Approved`] when `status` is
/// unset; owner views pass an explicit status (or none, meaning all).
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ItemQuery {
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
    /// Restrict to items owned by this user.
    pub owner: Option<UserId>,
    /// Restrict to one lifecycle status.
    pub status: Option<ItemStatus>,
}

impl ItemQuery {
    /// Returns `true` if the item satisfies every set constraint.
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(category) = self.category
            && item.category != category
        {
            return false;
        }
        if let Some(item_type) = self.item_type
            && item.item_type != item_type
        {
            return false;
        }
        if let Some(size) = self.size
            && item.size != size
        {
            return false;
        }
        if let Some(condition) = self.condition
            && item.condition != condition
        {
            return false;
        }
        if let Some(owner) = self.owner
            && item.owner != owner
        {
            return false;
        }
        if let Some(status) = self.status
            && item.status != status
        {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_title = item.title.to_lowercase().contains(&needle);
            let in_description = item.description.to_lowercase().contains(&needle);
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_item(title: &str, description: &str) -> Item {
        let now = Utc::now();
        Item {
            id: ItemId::new(),
            title: title.to_string(),
            description: description.to_string(),
            category: Category::Women,
            item_type: ItemType::Jacket,
            size: Size::M,
            condition: Condition::Good,
            tags: vec!["vintage".to_string()],
            images: vec!["blob://img-1".to_string()],
            points: 40,
            status: ItemStatus::Approved,
            owner: UserId::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        let item = make_item("Denim jacket", "Classic blue denim");
        assert!(ItemQuery::default().matches(&item));
    }

    #[test]
    fn search_is_case_insensitive_on_title_and_description() {
        let item = make_item("Denim jacket", "Classic blue");
        let by_title = ItemQuery {
            search: Some("DENIM".to_string()),
            ..ItemQuery::default()
        };
        assert!(by_title.matches(&item));

        let by_description = ItemQuery {
            search: Some("classic BLUE".to_string()),
            ..ItemQuery::default()
        };
        assert!(by_description.matches(&item));

        let miss = ItemQuery {
            search: Some("corduroy".to_string()),
            ..ItemQuery::default()
        };
        assert!(!miss.matches(&item));
    }

    #[test]
    fn filters_compose() {
        let item = make_item("Denim jacket", "Classic blue denim");
        let query = ItemQuery {
            category: Some(Category::Women),
            size: Some(Size::M),
            search: Some("denim".to_string()),
            ..ItemQuery::default()
        };
        assert!(query.matches(&item));

        let wrong_size = ItemQuery {
            size: Some(Size::Xl),
            search: Some("denim".to_string()),
            ..ItemQuery::default()
        };
        assert!(!wrong_size.matches(&item));
    }

    #[test]
    fn status_filter_excludes_other_statuses() {
        let mut item = make_item("Denim jacket", "Classic blue denim");
        item.status = ItemStatus::Pending;
        let approved_only = ItemQuery {
            status: Some(ItemStatus::Approved),
            ..ItemQuery::default()
        };
        assert!(!approved_only.matches(&item));
    }

    #[test]
    fn condition_serializes_kebab_case() {
        let json = serde_json::to_string(&Condition::LikeNew).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert_eq!(json, "\"like-new\"");
    }
}

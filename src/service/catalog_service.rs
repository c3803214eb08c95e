//! Item submission and read-side catalog queries.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Category, Condition, EventBus, ExchangeEvent, ExchangeRegistry, Item, ItemId, ItemQuery,
    ItemStatus, ItemType, Size, User, UserId,
};
use crate::error::GatewayError;

/// Maximum number of image references accepted per listing.
const MAX_IMAGES: usize = 10;

/// An item joined with its current owner, as returned by every catalog read.
#[derive(Debug, Clone)]
pub struct ItemWithOwner {
    /// The listed item.
    pub item: Item,
    /// The item's current owner.
    pub owner: User,
}

/// Fully-formed listing payload, as produced by the item submission
/// collaborator (upload handling and AI suggestion run upstream).
#[derive(Debug, Clone)]
pub struct NewItem {
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
}

/// Read-side filtering/search over items, plus listing submission.
#[derive(Debug, Clone)]
pub struct CatalogService {
    registry: Arc<ExchangeRegistry>,
    event_bus: EventBus,
}

impl CatalogService {
    /// Creates a new `CatalogService`.
    #[must_use]
    pub fn new(registry: Arc<ExchangeRegistry>, event_bus: EventBus) -> Self {
        Self {
            registry,
            event_bus,
        }
    }

    /// Public catalog query. When the filter does not name a status, only
    /// `approved` items are returned; results are newest first with owners
    /// joined.
    pub async fn list(&self, query: &ItemQuery) -> Vec<ItemWithOwner> {
        let mut effective = query.clone();
        if effective.status.is_none() {
            effective.status = Some(ItemStatus::Approved);
        }
        self.query_with_owner(&effective).await
    }

    /// Owner view over a user's own listings. `status = None` means all
    /// statuses, unlike the public catalog default.
    pub async fn items_owned_by(
        &self,
        owner: UserId,
        status: Option<ItemStatus>,
    ) -> Vec<ItemWithOwner> {
        let query = ItemQuery {
            owner: Some(owner),
            status,
            ..ItemQuery::default()
        };
        self.query_with_owner(&query).await
    }

    /// Returns one item with its owner, any status (detail view).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ItemNotFound`] if no such item exists, or
    /// [`GatewayError::UserNotFound`] if its owner record is missing.
    pub async fn get(&self, id: ItemId) -> Result<ItemWithOwner, GatewayError> {
        let state = self.registry.read().await;
        let item = state.item(id)?.clone();
        let owner = state.user(item.owner)?.clone();
        Ok(ItemWithOwner { item, owner })
    }

    /// Creates a new `pending` listing from a submission payload.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UserNotFound`] for an unknown owner and
    /// [`GatewayError::InvalidRequest`] for an empty title/description,
    /// a non-positive point price, or too many images.
    pub async fn submit(&self, owner: UserId, payload: NewItem) -> Result<Item, GatewayError> {
        if payload.title.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "title must not be empty".to_string(),
            ));
        }
        if payload.description.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "description must not be empty".to_string(),
            ));
        }
        if payload.points <= 0 {
            return Err(GatewayError::InvalidRequest(format!(
                "point price must be positive, got {}",
                payload.points
            )));
        }
        if payload.images.len() > MAX_IMAGES {
            return Err(GatewayError::InvalidRequest(format!(
                "at most {MAX_IMAGES} images are allowed"
            )));
        }

        let now = Utc::now();
        let item = Item {
            id: ItemId::new(),
            title: payload.title,
            description: payload.description,
            category: payload.category,
            item_type: payload.item_type,
            size: payload.size,
            condition: payload.condition,
            tags: payload.tags,
            images: payload.images,
            points: payload.points,
            status: ItemStatus::Pending,
            owner,
            created_at: now,
            updated_at: now,
        };
        let created = item.clone();

        let mut state = self.registry.write().await;
        let _ = state.insert_item(item)?;
        drop(state);

        let _ = self.event_bus.publish(ExchangeEvent::ItemSubmitted {
            item_id: created.id,
            owner,
            points: created.points,
            timestamp: now,
        });

        tracing::info!(item_id = %created.id, owner = %owner, "item submitted");
        Ok(created)
    }

    async fn query_with_owner(&self, query: &ItemQuery) -> Vec<ItemWithOwner> {
        let state = self.registry.read().await;
        state
            .query_items(query)
            .into_iter()
            .filter_map(|item| {
                let owner = state.user(item.owner).ok()?.clone();
                Some(ItemWithOwner { item, owner })
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    fn make_service() -> CatalogService {
        let registry = Arc::new(ExchangeRegistry::new());
        let event_bus = EventBus::new(1000);
        CatalogService::new(registry, event_bus)
    }

    async fn seed_user(service: &CatalogService, email: &str) -> UserId {
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: email.to_string(),
            password_hash: "opaque".to_string(),
            display_name: "Test User".to_string(),
            role: UserRole::User,
            balance: 0,
            profile_image: None,
            created_at: now,
            updated_at: now,
        };
        let id = user.id;
        let mut state = service.registry.write().await;
        let Ok(_) = state.insert_user(user) else {
            panic!("seed user failed");
        };
        id
    }

    fn payload(title: &str, description: &str) -> NewItem {
        NewItem {
            title: title.to_string(),
            description: description.to_string(),
            category: Category::Men,
            item_type: ItemType::Shirt,
            size: Size::L,
            condition: Condition::Excellent,
            tags: vec!["casual".to_string()],
            images: vec!["blob://img-1".to_string()],
            points: 25,
        }
    }

    async fn approve(service: &CatalogService, id: ItemId) {
        let mut state = service.registry.write().await;
        let Ok(item) = state.item_mut(id) else {
            panic!("item missing");
        };
        item.status = ItemStatus::Approved;
    }

    #[tokio::test]
    async fn submitted_items_start_pending_and_stay_out_of_the_catalog() {
        let service = make_service();
        let owner = seed_user(&service, "a@example.com").await;

        let Ok(item) = service.submit(owner, payload("Linen shirt", "Summer")).await else {
            panic!("submit failed");
        };
        assert_eq!(item.status, ItemStatus::Pending);

        assert!(service.list(&ItemQuery::default()).await.is_empty());

        approve(&service, item.id).await;
        assert_eq!(service.list(&ItemQuery::default()).await.len(), 1);
    }

    #[tokio::test]
    async fn list_joins_owner_and_orders_newest_first() {
        let service = make_service();
        let owner = seed_user(&service, "a@example.com").await;

        let Ok(older) = service.submit(owner, payload("First", "one")).await else {
            panic!("submit failed");
        };
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let Ok(newer) = service.submit(owner, payload("Second", "two")).await else {
            panic!("submit failed");
        };
        approve(&service, older.id).await;
        approve(&service, newer.id).await;

        let listed = service.list(&ItemQuery::default()).await;
        assert_eq!(listed.len(), 2);
        let ids: Vec<ItemId> = listed.iter().map(|entry| entry.item.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert!(
            listed
                .iter()
                .all(|entry| entry.owner.email == "a@example.com")
        );
    }

    #[tokio::test]
    async fn search_composes_with_status_filter() {
        let service = make_service();
        let owner = seed_user(&service, "a@example.com").await;

        let Ok(denim) = service
            .submit(owner, payload("Denim jacket", "Classic blue"))
            .await
        else {
            panic!("submit failed");
        };
        let Ok(_) = service
            .submit(owner, payload("Wool coat", "Winter warmth"))
            .await
        else {
            panic!("submit failed");
        };
        approve(&service, denim.id).await;

        let query = ItemQuery {
            search: Some("denim".to_string()),
            ..ItemQuery::default()
        };
        let found = service.list(&query).await;
        assert_eq!(found.len(), 1);
        assert_eq!(
            found.first().map(|entry| entry.item.id),
            Some(denim.id)
        );

        // Pending-status search sees the unapproved coat, not the jacket.
        let pending_query = ItemQuery {
            search: Some("wool".to_string()),
            status: Some(ItemStatus::Pending),
            ..ItemQuery::default()
        };
        assert_eq!(service.list(&pending_query).await.len(), 1);
    }

    #[tokio::test]
    async fn owner_view_includes_all_statuses() {
        let service = make_service();
        let owner = seed_user(&service, "a@example.com").await;
        let other = seed_user(&service, "b@example.com").await;

        let Ok(mine) = service.submit(owner, payload("Mine", "pending")).await else {
            panic!("submit failed");
        };
        let Ok(_) = service.submit(other, payload("Theirs", "pending")).await else {
            panic!("submit failed");
        };

        let owned = service.items_owned_by(owner, None).await;
        assert_eq!(owned.len(), 1);
        assert_eq!(owned.first().map(|entry| entry.item.id), Some(mine.id));
    }

    #[tokio::test]
    async fn submission_payload_is_validated() {
        let service = make_service();
        let owner = seed_user(&service, "a@example.com").await;

        let empty_title = service.submit(owner, payload("  ", "desc")).await;
        assert!(matches!(empty_title, Err(GatewayError::InvalidRequest(_))));

        let mut free = payload("Free", "desc");
        free.points = 0;
        assert!(matches!(
            service.submit(owner, free).await,
            Err(GatewayError::InvalidRequest(_))
        ));

        let mut flooded = payload("Flood", "desc");
        flooded.images = (0..11).map(|i| format!("blob://img-{i}")).collect();
        assert!(matches!(
            service.submit(owner, flooded).await,
            Err(GatewayError::InvalidRequest(_))
        ));

        let unknown_owner = service.submit(UserId::new(), payload("Ghost", "desc")).await;
        assert!(matches!(unknown_owner, Err(GatewayError::UserNotFound(_))));
    }
}

//! Types and functions for storing and loading items.
//!
//! Items live in memory only. The collection is guarded by a read/write lock,
//! and every read-modify-write sequence runs under a single write guard, so
//! ids stay unique even when requests are served in parallel.

use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, sync::Arc};
use tokio::sync::RwLock;
use tracing::instrument;
use utoipa::ToSchema;
use validator::Validate;

/// A unit-less price.
///
/// Whole prices serialize as JSON integers, others as decimals.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<i32> for Price {
    fn from(value: i32) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// i64 holds every whole f64 below 2^63 exactly.
const MAX_WHOLE: f64 = 9_223_372_036_854_775_807.0;

impl Serialize for Price {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 && self.0.abs() < MAX_WHOLE {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

/// A new item.
#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct NewItem {
    /// The item's title.
    #[schema(example = "Hollow Knight")]
    #[validate(length(min = 1))]
    pub title: String,
    /// The item's price.
    #[schema(value_type = f64, example = 15)]
    pub price: Price,
}

/// Changes to an existing item. Absent fields are left untouched.
///
/// A field sent as `null` is rejected rather than treated as absent.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct ItemPatch {
    /// The item's new title.
    #[schema(example = "Hollow Knight: Silksong")]
    #[validate(length(min = 1))]
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    /// The item's new price.
    #[schema(value_type = Option<f64>, example = 20)]
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Price>,
}

/// Deserializes a field that may be left out but must not be `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)?
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom("must not be null"))
}

/// An existing item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// The item's id.
    #[schema(example = 1)]
    pub id: u64,
    /// The item's title.
    #[schema(example = "Red Dead Redemption 2")]
    pub title: String,
    /// The item's price.
    #[schema(value_type = f64, example = 20)]
    pub price: Price,
}

impl Item {
    fn apply(&mut self, patch: ItemPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
    }
}

/// The items present when the service starts.
const SEED_ITEMS: [(&str, i32); 10] = [
    ("Red Dead Redemption 2", 20),
    ("Grand Theft Auto V", 15),
    ("The Witcher 3: Wild Hunt", 18),
    ("Elden Ring", 35),
    ("Cyberpunk 2077", 25),
    ("Minecraft", 10),
    ("God of War", 30),
    ("Horizon Zero Dawn", 22),
    ("Assassin's Creed Valhalla", 28),
    ("FIFA 23", 40),
];

/// An in-memory item repository. Clones share the same collection.
#[derive(Clone, Debug, Default)]
pub struct ItemRepository {
    items: Arc<RwLock<Vec<Item>>>,
}

impl ItemRepository {
    /// Creates a new repository holding `items` in the given order.
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Creates a repository holding the seed items.
    pub fn seeded() -> Self {
        let items = SEED_ITEMS
            .iter()
            .zip(1..)
            .map(|(&(title, price), id)| Item {
                id,
                title: title.to_string(),
                price: price.into(),
            })
            .collect();
        Self::new(items)
    }

    /// Returns every item in insertion order.
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Vec<Item> {
        let items = self.items.read().await.clone();
        tracing::info!("Listed {} items", items.len());
        items
    }

    /// Fetches an item.
    #[instrument(skip(self))]
    pub async fn fetch_item(&self, id: u64) -> Option<Item> {
        let item = self
            .items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned();
        tracing::info!("Found item: {:?}", item);
        item
    }

    /// Appends a new item with the next free id.
    #[instrument(skip(self))]
    pub async fn create_item(&self, new_item: NewItem) -> Item {
        let mut items = self.items.write().await;
        let id = items.iter().map(|item| item.id).max().unwrap_or(0) + 1;
        let item = Item {
            id,
            title: new_item.title,
            price: new_item.price,
        };
        items.push(item.clone());
        tracing::info!("Created item {:?}", item);
        item
    }

    /// Applies `patch` to an item, returning the updated item.
    #[instrument(skip(self))]
    pub async fn update_item(&self, id: u64, patch: ItemPatch) -> Option<Item> {
        let mut items = self.items.write().await;
        let item = items.iter_mut().find(|item| item.id == id)?;
        item.apply(patch);
        tracing::info!("Updated item {:?}", item);
        Some(item.clone())
    }

    /// Removes an item, returning it.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: u64) -> Option<Item> {
        let mut items = self.items.write().await;
        let index = items.iter().position(|item| item.id == id)?;
        let item = items.remove(index);
        tracing::info!("Deleted item {:?}", item);
        Some(item)
    }

    /// The number of items in the collection.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the collection is empty.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

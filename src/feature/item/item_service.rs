//! A service for interacting with items.

use super::item_repository::{Item, ItemPatch, ItemRepository, NewItem};
use crate::infra::{
    error::{ApiResult, ClientError},
    pagination::Pagination,
    query::{non_empty, parse_number},
    validation::Valid,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::instrument;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};
use utoipa::ToSchema;

/// What to sort a listing by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Price,
    Title,
}

impl SortKey {
    /// Parses a sort key. Unknown keys mean the listing stays unsorted.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "price" | "precio" => Some(Self::Price),
            "title" | "titulo" => Some(Self::Title),
            _ => None,
        }
    }
}

/// The direction to sort in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Only `desc` sorts descending, anything else sorts ascending.
    pub fn parse(order: &str) -> Self {
        match order {
            "desc" => Self::Desc,
            _ => Self::Asc,
        }
    }
}

/// Filters and ordering applied to a listing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemQuery {
    /// Case-insensitive substring the title must contain.
    pub text: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// What to sort by, if anything.
    pub sort: Option<SortKey>,
    /// Which direction to sort in.
    pub order: SortOrder,
}

impl ItemQuery {
    /// Coerces raw query values. Values that cannot be understood are ignored.
    pub fn from_query(
        text: Option<&str>,
        min_price: Option<&str>,
        max_price: Option<&str>,
        sort: Option<&str>,
        order: Option<&str>,
    ) -> Self {
        Self {
            text: non_empty(text).map(str::to_lowercase),
            min_price: min_price.and_then(parse_number),
            max_price: max_price.and_then(parse_number),
            sort: sort.and_then(SortKey::parse),
            order: order.map(SortOrder::parse).unwrap_or_default(),
        }
    }

    fn matches(&self, item: &Item) -> bool {
        let price = item.price.value();
        self.text
            .as_deref()
            .map_or(true, |text| item.title.to_lowercase().contains(text))
            && self.min_price.map_or(true, |min| price >= min)
            && self.max_price.map_or(true, |max| price <= max)
    }

    fn compare(&self, key: SortKey, a: &Item, b: &Item) -> Ordering {
        let (a, b) = match self.order {
            SortOrder::Asc => (a, b),
            SortOrder::Desc => (b, a),
        };
        match key {
            SortKey::Price => a.price.value().total_cmp(&b.price.value()),
            SortKey::Title => collate(&a.title, &b.title),
        }
    }

    /// Filters and sorts `items`. Sorting is stable.
    pub fn apply(&self, items: Vec<Item>) -> Vec<Item> {
        let mut items: Vec<Item> = items.into_iter().filter(|item| self.matches(item)).collect();
        if let Some(key) = self.sort {
            items.sort_by(|a, b| self.compare(key, a, b));
        }
        items
    }
}

/// Compares text the way a dictionary does.
///
/// Letters are compared without accents or case first. Ties are broken by
/// accents, then by case with lowercase first, then by the exact text.
fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented_letters(a).cmp(accented_letters(b)))
        .then_with(|| letter_case(a).cmp(letter_case(b)))
        .then_with(|| a.cmp(b))
}

fn base_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd().flat_map(char::to_lowercase)
}

fn letter_case(text: &str) -> impl Iterator<Item = bool> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
}

/// A page of items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemPage {
    /// The number of items matching the query, before pagination.
    #[schema(example = 10)]
    pub total: usize,
    /// The number of skipped items.
    #[schema(example = 0)]
    pub offset: i64,
    /// The page size. Equal to `total` when no limit was requested.
    #[schema(example = 10)]
    pub limit: i64,
    /// The items on this page.
    pub items: Vec<Item>,
}

/// Filters, sorts and paginates the collection.
#[instrument(skip(repository))]
pub async fn list_items(
    repository: &ItemRepository,
    query: &ItemQuery,
    pagination: Pagination,
) -> ItemPage {
    let items = query.apply(repository.list_items().await);
    paginate(items, pagination)
}

/// Cuts a page out of a filtered and sorted listing.
pub fn paginate(items: Vec<Item>, pagination: Pagination) -> ItemPage {
    let total = items.len();
    ItemPage {
        total,
        offset: pagination.offset(),
        limit: pagination.effective_limit(total),
        items: pagination.window(&items).to_vec(),
    }
}

/// Reads an item.
#[instrument(skip(repository))]
pub async fn read_item(repository: &ItemRepository, id: u64) -> ApiResult<Item> {
    let item = repository.fetch_item(id).await.ok_or(ClientError::NotFound)?;
    Ok(item)
}

/// Creates a new item.
#[instrument(skip(repository))]
pub async fn create_item(repository: &ItemRepository, new_item: Valid<NewItem>) -> Item {
    repository.create_item(new_item.into_inner()).await
}

/// Updates an item. The patch has been validated as a whole, so a rejected
/// request never changes the item.
#[instrument(skip(repository))]
pub async fn update_item(
    repository: &ItemRepository,
    id: u64,
    patch: Valid<ItemPatch>,
) -> ApiResult<Item> {
    let item = repository
        .update_item(id, patch.into_inner())
        .await
        .ok_or(ClientError::NotFound)?;
    Ok(item)
}

/// Deletes an item, returning it.
#[instrument(skip(repository))]
pub async fn delete_item(repository: &ItemRepository, id: u64) -> ApiResult<Item> {
    let item = repository.delete_item(id).await.ok_or(ClientError::NotFound)?;
    Ok(item)
}

//! The item API implementation.

use crate::{
    feature::item::{
        item_repository::{Item, ItemPatch, ItemRepository, NewItem},
        item_service::{self, ItemPage, ItemQuery},
    },
    infra::{
        error::{ApiResult, ClientError, ErrorBody},
        extract::{Json, Query},
        pagination::Pagination,
        query,
        state::AppState,
        validation::Valid,
    },
};
use axum::{extract::State, Router};
use axum_extra::routing::{RouterExt, TypedPath};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::IntoParams;

/// The item API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .typed_get(list_items)
        .typed_post(create_item)
        .typed_get(get_item)
        .typed_put(update_item)
        .typed_delete(delete_item)
}

#[derive(Debug, Deserialize, TypedPath)]
#[typed_path("/items", rejection(ClientError))]
struct Items;

#[derive(Debug, Deserialize, TypedPath)]
#[typed_path("/items/:id", rejection(ClientError))]
struct ItemsId(String);

impl ItemsId {
    /// The id is read as a number, so `5.0` and ` 5` name item 5.
    /// Anything that is not a positive whole number matches no item.
    fn id(&self) -> ApiResult<u64> {
        let id = query::parse_number(&self.0)
            .filter(|n| *n >= 1.0 && n.fract() == 0.0 && *n <= u64::MAX as f64)
            .ok_or(ClientError::NotFound)?;
        Ok(id as u64)
    }
}

/// Filtering, sorting and pagination of the item listing.
///
/// Every parameter is optional and values that cannot be understood are ignored.
/// A repeated key keeps its first value.
#[derive(Clone, Debug, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase", from = "Vec<(String, String)>")]
pub struct ListParams {
    /// Case-insensitive text the title must contain.
    q: Option<String>,
    /// Inclusive lower price bound. `minPrecio` is read when absent.
    min_price: Option<String>,
    /// Inclusive upper price bound. `maxPrecio` is read when absent.
    max_price: Option<String>,
    /// Sort by `price` or `title`.
    sort: Option<String>,
    /// `asc` (default) or `desc`.
    order: Option<String>,
    /// Maximum number of items to return.
    limit: Option<String>,
    /// Number of items to skip.
    offset: Option<String>,
}

impl From<Vec<(String, String)>> for ListParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let first = |keys: &[&str]| {
            keys.iter().find_map(|key| {
                pairs
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| value.clone())
            })
        };
        ListParams {
            q: first(&["q"]),
            min_price: first(&["minPrice", "minPrecio"]),
            max_price: first(&["maxPrice", "maxPrecio"]),
            sort: first(&["sort"]),
            order: first(&["order"]),
            limit: first(&["limit"]),
            offset: first(&["offset"]),
        }
    }
}

impl ListParams {
    fn query(&self) -> ItemQuery {
        ItemQuery::from_query(
            self.q.as_deref(),
            self.min_price.as_deref(),
            self.max_price.as_deref(),
            self.sort.as_deref(),
            self.order.as_deref(),
        )
    }

    fn pagination(&self) -> Pagination {
        Pagination::from_query(self.offset.as_deref(), self.limit.as_deref())
    }
}

/// Lists items.
#[utoipa::path(
    get,
    path = "/items",
    params(ListParams),
    responses(
        (status = 200, description = "Success", body = ItemPage),
    )
)]
#[instrument(skip(items))]
async fn list_items(
    Items: Items,
    State(items): State<ItemRepository>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<ItemPage>> {
    let page = item_service::list_items(&items, &params.query(), params.pagination()).await;
    Ok(Json(page))
}

/// Gets an item.
#[utoipa::path(
    get,
    path = "/items/{id}",
    params(("id" = u64, Path, description = "The item's id")),
    responses(
        (status = 200, description = "Ok", body = Item),
        (status = 404, description = "Not Found", body = ErrorBody),
    )
)]
#[instrument(skip(items))]
async fn get_item(id: ItemsId, State(items): State<ItemRepository>) -> ApiResult<Json<Item>> {
    let item = item_service::read_item(&items, id.id()?).await?;
    Ok(Json(item))
}

/// Creates a new item.
#[utoipa::path(
    post,
    path = "/items",
    request_body = NewItem,
    responses(
        (status = 201, description = "Created", body = Item),
        (status = 400, description = "Bad Request", body = ErrorBody),
    )
)]
#[instrument(skip(items))]
async fn create_item(
    Items: Items,
    State(items): State<ItemRepository>,
    new_item: Valid<NewItem>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let item = item_service::create_item(&items, new_item).await;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Updates an item. Only the given fields change.
#[utoipa::path(
    put,
    path = "/items/{id}",
    params(("id" = u64, Path, description = "The item's id")),
    request_body = ItemPatch,
    responses(
        (status = 200, description = "Ok", body = Item),
        (status = 400, description = "Bad Request", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
    )
)]
#[instrument(skip(items))]
async fn update_item(
    id: ItemsId,
    State(items): State<ItemRepository>,
    patch: Valid<ItemPatch>,
) -> ApiResult<Json<Item>> {
    let item = item_service::update_item(&items, id.id()?, patch).await?;
    Ok(Json(item))
}

/// Deletes an item, returning it.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    params(("id" = u64, Path, description = "The item's id")),
    responses(
        (status = 200, description = "Ok", body = Item),
        (status = 404, description = "Not Found", body = ErrorBody),
    )
)]
#[instrument(skip(items))]
async fn delete_item(id: ItemsId, State(items): State<ItemRepository>) -> ApiResult<Json<Item>> {
    let item = item_service::delete_item(&items, id.id()?).await?;
    Ok(Json(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(text: &str) -> ApiResult<u64> {
        ItemsId(text.to_string()).id()
    }

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(7, id("7").unwrap());
        assert!(id("abc").is_err());
        assert!(id("-1").is_err());
        assert!(id("0").is_err());
        assert!(id("1.5").is_err());
        assert!(id("").is_err());
    }

    #[test]
    fn ids_are_read_as_numbers() {
        assert_eq!(5, id("5.0").unwrap());
        assert_eq!(5, id(" 5").unwrap());
        assert_eq!(5, id("05").unwrap());
        assert_eq!(500, id("5e2").unwrap());
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let params = parse_params("limit=1&limit=2&sort=price&sort=title");
        assert_eq!(Some(1), params.pagination().limit());
        assert_eq!(Some("price"), params.sort.as_deref());
    }

    #[test]
    fn english_bounds_win_over_spanish_ones() {
        let params = parse_params("minPrecio=25&minPrice=20&maxPrecio=40");
        let query = params.query();
        assert_eq!(Some(20.0), query.min_price);
        assert_eq!(Some(40.0), query.max_price);
    }

    #[test]
    fn spanish_parameter_names_are_accepted() {
        let params: ListParams =
            parse_params("minPrecio=20&maxPrice=30&sort=precio&limit=2");
        let query = params.query();
        assert_eq!(Some(20.0), query.min_price);
        assert_eq!(Some(30.0), query.max_price);
        assert_eq!(Some(2), params.pagination().limit());
    }

    fn parse_params(query: &str) -> ListParams {
        let uri: http::Uri = format!("/items?{query}").parse().unwrap();
        axum::extract::Query::try_from_uri(&uri).unwrap().0
    }
}

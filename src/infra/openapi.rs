//! OpenAPI configuration.

use crate::feature::{
    info::info_api,
    item::{item_api, item_repository, item_service},
};
use utoipa::OpenApi;

/// OpenApi configuration.
#[derive(OpenApi)]
#[openapi(
    info(title = "Catalog service", description = "An in-memory catalog of items."),
    paths(
        info_api::info,
        item_api::list_items,
        item_api::get_item,
        item_api::create_item,
        item_api::update_item,
        item_api::delete_item,
    ),
    components(
        schemas(
            info_api::AppInfo,
            item_repository::NewItem,
            item_repository::ItemPatch,
            item_repository::Item,
            item_service::ItemPage,
            crate::infra::error::ErrorBody
        )
    )
)]
#[derive(Clone, Copy, Debug)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn documents_every_item_route() {
        let doc = ApiDoc::openapi();
        for path in ["/items", "/items/{id}", "/info"] {
            assert!(doc.paths.paths.contains_key(path), "{path} is not documented");
        }
    }
}

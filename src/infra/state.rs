//! Global application state.
//!
//! Used for access to common resources such as
//! the item collection or the configuration.

use super::config::Config;
use crate::feature::item::item_repository::ItemRepository;
use axum::extract::FromRef;
use std::sync::Arc;

/// Global application state.
#[derive(Clone, Debug, FromRef)]
pub struct AppState {
    items: ItemRepository,
    config: Arc<Config>,
}

impl AppState {
    /// Constructs a new [`AppState`].
    pub fn new(items: ItemRepository, config: Config) -> Self {
        Self {
            items,
            config: Arc::new(config),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::item::item_repository::{NewItem, Price};

    #[tokio::test]
    async fn handlers_share_the_state_repository() {
        let state = AppState::new(ItemRepository::default(), Config::default());
        let items = ItemRepository::from_ref(&state);
        items
            .create_item(NewItem {
                title: "Celeste".to_string(),
                price: Price::new(20.0),
            })
            .await;
        assert_eq!(1, ItemRepository::from_ref(&state).len().await);
        assert_eq!(3127, state.config().server.http_port);
    }
}

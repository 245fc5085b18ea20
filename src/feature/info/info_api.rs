//! APIs for getting information about the application.

use crate::infra::{extract::Json, state::AppState};
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The info API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new().route("/info", get(info))
}

/// Application information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AppInfo {
    /// The application name.
    name: String,
    /// The application version.
    version: String,
}

impl AppInfo {
    /// The application name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The application version.
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Returns application information.
#[utoipa::path(
    get,
    path = "/info",
    responses(
        (status = 200, description = "Success", body = AppInfo),
    )
)]
pub async fn info() -> Json<AppInfo> {
    Json(AppInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_package_name_and_version() {
        let Json(info) = info().await;
        assert_eq!("catalog-service", info.name());
        assert_eq!(env!("CARGO_PKG_VERSION"), info.version());
    }
}

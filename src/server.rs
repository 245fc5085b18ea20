//! The HTTP server.
//!
//! # Examples
//!
//! List the catalog.
//!
//! ```rust
//! # use catalog_service::feature::item::item_service::ItemPage;
//! # use catalog_service::infra::config::Config;
//! # tokio_test::block_on(async {
//! # let url = catalog_service::server::spawn_app(Config::default()).await.unwrap();
//! let response = reqwest::get(format!("{}/items?q=witcher", url)).await.unwrap();
//! assert_eq!(200, response.status());
//! let page = response.json::<ItemPage>().await.unwrap();
//! assert_eq!("The Witcher 3: Wild Hunt", page.items[0].title);
//! # });
//! ```

use crate::{
    feature::{info::info_api, item::item_api, item::item_repository::ItemRepository},
    infra::{
        config::Config,
        error::{InternalError, PanicHandler},
        middleware::{log_request_response, MakeRequestIdSpan},
        openapi::ApiDoc,
        shutdown::shutdown_signal,
        state::AppState,
    },
};
use axum::{error_handling::HandleErrorLayer, response::IntoResponse, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

/// Constructs the full axum application.
pub fn app(state: AppState) -> Router {
    let config = state.config().server.clone();

    // Fallible middleware from tower, mapped to infallible response with [`HandleErrorLayer`].
    let tower_middleware = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|e| async move {
            InternalError::Other(format!("Tower middleware failed: {e}")).into_response()
        }))
        .concurrency_limit(config.concurrency_limit);

    // The REST API, its documentation, and the static UI for everything else.
    Router::new()
        .merge(info_api::routes())
        .merge(item_api::routes())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", ApiDoc::openapi()))
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .merge(RapiDoc::new("/openapi.json").path("/rapidoc"))
        .fallback_service(ServeDir::new(&config.static_dir))
        // Layers
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(axum::middleware::from_fn(log_request_response))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(MakeRequestIdSpan)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(()),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(tower_middleware)
        .layer(CatchPanicLayer::custom(PanicHandler))
}

/// Starts the axum server.
pub async fn run_app(listener: TcpListener, config: Config) -> std::io::Result<()> {
    let state = AppState::new(ItemRepository::seeded(), config);
    let app = app(state);

    tracing::info!("Starting axum on {}", listener.local_addr()?);
    let exit_result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    match &exit_result {
        Ok(_) => tracing::info!("Successfully shut down"),
        Err(e) => tracing::error!("Shutdown failed: {}", e),
    }

    exit_result
}

/// Spawn a server on a random port, returning its base url.
pub async fn spawn_app(config: Config) -> std::io::Result<String> {
    let address = "127.0.0.1";
    let listener = TcpListener::bind(format!("{address}:0")).await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(run_app(listener, config));
    Ok(format!("http://{address}:{port}"))
}

use std::sync::Arc;

use a2a_host::{
    jsonrpc_endpoint, serve_agent_card, DefaultRequestHandler, InMemoryPushNotifier, ServerState,
    AGENT_CARD_PATH,
};
use axum::extract::FromRef;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::agent::{InsightAgent, WarehouseAgent};
use crate::card::agent_card;
use crate::config::Config;
use crate::executor::InsightExecutor;
use crate::routes;

/// Top-level state. The protocol endpoints pull [`ServerState`] out of it,
/// the custom routes pull the [`Config`].
#[derive(Clone)]
pub struct AppState {
    pub server: ServerState,
    pub config: Arc<Config>,
}

impl FromRef<AppState> for ServerState {
    fn from_ref(state: &AppState) -> Self {
        state.server.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

/// Application with the stock warehouse agent.
pub fn create_app(config: Config) -> Router {
    create_app_with_agent(config, Arc::new(WarehouseAgent::new()))
}

/// Assembles the full router. The root path serves the liveness text on
/// GET and JSON-RPC on POST; discovery, health and the ORD document sit on
/// their own routes.
pub fn create_app_with_agent(config: Config, agent: Arc<dyn InsightAgent>) -> Router {
    let card = agent_card(&config.public_base_url, agent.description());
    let handler = DefaultRequestHandler::builder()
        .executor(Arc::new(InsightExecutor::new(agent)))
        .push_notifier(Arc::new(InMemoryPushNotifier::new(reqwest::Client::new())))
        .build();

    let state = AppState {
        server: ServerState::new(Arc::new(handler), card),
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(routes::liveness).post(jsonrpc_endpoint))
        .route(AGENT_CARD_PATH, get(serve_agent_card))
        .route("/check_agent", get(routes::health))
        .route(routes::ORD_DOCUMENT_ROUTE, get(routes::ord_document))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

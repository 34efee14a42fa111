use std::sync::Arc;

use a2a_wire::AgentCard;
use axum::routing::{get, post};
use axum::Router;

use crate::card::serve_agent_card;
use crate::handler::RequestHandler;
use crate::rpc::jsonrpc_endpoint;

/// Discovery path for the agent card.
pub const AGENT_CARD_PATH: &str = "/.well-known/agent.json";

/// State shared by the protocol endpoints. Embedding applications that
/// build their own router can hold this as a substate and expose it with
/// `FromRef`.
#[derive(Clone)]
pub struct ServerState {
    pub handler: Arc<dyn RequestHandler>,
    pub agent_card: AgentCard,
}

impl ServerState {
    pub fn new(handler: Arc<dyn RequestHandler>, agent_card: AgentCard) -> Self {
        Self {
            handler,
            agent_card,
        }
    }
}

/// Router with the two protocol endpoints: JSON-RPC behind `POST /` and
/// the agent card behind the well-known discovery path.
pub fn create_router(handler: Arc<dyn RequestHandler>, agent_card: AgentCard) -> Router {
    Router::new()
        .route("/", post(jsonrpc_endpoint))
        .route(AGENT_CARD_PATH, get(serve_agent_card))
        .with_state(ServerState::new(handler, agent_card))
}

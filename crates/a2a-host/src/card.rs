use a2a_wire::AgentCard;
use axum::extract::State;
use axum::Json;

use crate::router::ServerState;

/// Serves the agent card for discovery.
pub async fn serve_agent_card(State(state): State<ServerState>) -> Json<AgentCard> {
    Json(state.agent_card.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn card_response_is_json() {
        let card = AgentCard {
            name: "Probe".into(),
            description: "probe".into(),
            url: "http://localhost:8080/".into(),
            version: "0.0.1".into(),
            default_input_modes: vec!["text/plain".into()],
            default_output_modes: vec!["text/plain".into()],
            capabilities: Default::default(),
            skills: vec![],
            provider: None,
            documentation_url: None,
        };

        let response = Json(card).into_response();
        let content_type = response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("application/json"));
    }
}

use a2a_wire::{AgentCapabilities, AgentCard, AgentSkill};

pub const AGENT_NAME: &str = "Warehouse_Insight_Agent";
pub const AGENT_VERSION: &str = "0.0.1";
pub const TEXT_MODE: &str = "text/plain";

/// Discovery card for the warehouse agent. The advertised URL always ends
/// with a single trailing slash, whatever the configured base looks like.
pub fn agent_card(public_base_url: &str, description: &str) -> AgentCard {
    let skill = AgentSkill {
        id: "warehouse-insight-query".into(),
        name: "Warehouse Insight Query Tool".into(),
        description: description.into(),
        tags: vec![
            "warehouse".into(),
            "stock".into(),
            "inventory".into(),
            "data query".into(),
            "shipping".into(),
        ],
        examples: Some(vec![
            "why did the stock level for Item X drop this morning?".into(),
            "which orders caused stock changes for Item Y in the last 24 hours?".into(),
        ]),
        input_modes: None,
        output_modes: None,
    };

    AgentCard {
        name: AGENT_NAME.into(),
        description: description.into(),
        url: format!("{}/", public_base_url.trim_end_matches('/')),
        version: AGENT_VERSION.into(),
        default_input_modes: vec![TEXT_MODE.into()],
        default_output_modes: vec![TEXT_MODE.into()],
        capabilities: AgentCapabilities::default(),
        skills: vec![skill],
        provider: None,
        documentation_url: None,
    }
}

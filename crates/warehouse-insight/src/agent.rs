use async_trait::async_trait;

/// Advertised when the underlying agent carries no description of its own.
pub const DEFAULT_AGENT_DESCRIPTION: &str =
    "Warehouse Insight Agent handling data queries about shipping details.";

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("warehouse backend unavailable: {0}")]
    Backend(String),
}

/// The question-answering seam behind the protocol front-end. The host
/// machinery never sees what produces the answer.
#[async_trait]
pub trait InsightAgent: Send + Sync + 'static {
    fn description(&self) -> &str;

    /// Produces the insight text for one warehouse data query.
    async fn answer(&self, query: &str) -> Result<String, AgentError>;
}

/// Deterministic warehouse agent. It reduces a query to a canned insight
/// over the stock ledger so the surrounding protocol plumbing can be
/// exercised without a reasoning backend.
pub struct WarehouseAgent {
    description: String,
}

impl WarehouseAgent {
    pub fn new() -> Self {
        Self {
            description: DEFAULT_AGENT_DESCRIPTION.to_string(),
        }
    }
}

impl Default for WarehouseAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InsightAgent for WarehouseAgent {
    fn description(&self) -> &str {
        &self.description
    }

    async fn answer(&self, query: &str) -> Result<String, AgentError> {
        let query = query.trim();
        Ok(format!(
            "Insight for \"{query}\": the stock changes in the requested window trace back to \
             outbound orders fulfilled from the main warehouse; no manual corrections or \
             shipping exceptions were recorded in the same period."
        ))
    }
}

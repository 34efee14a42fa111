use std::sync::Arc;

use a2a_host::{AgentExecutor, EventQueue, HostError, RequestContext, TaskUpdater};
use async_trait::async_trait;

use crate::agent::InsightAgent;

/// Name given to the artifact carrying the agent's answer.
pub const INSIGHT_ARTIFACT_NAME: &str = "warehouse-insight";

/// Drives one task through its lifecycle: submitted for fresh tasks, then
/// working, then either a completed task with the insight artifact or a
/// failed one carrying the agent's error.
pub struct InsightExecutor {
    agent: Arc<dyn InsightAgent>,
}

impl InsightExecutor {
    pub fn new(agent: Arc<dyn InsightAgent>) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl AgentExecutor for InsightExecutor {
    async fn execute(&self, ctx: RequestContext, queue: EventQueue) -> Result<(), HostError> {
        let updater = TaskUpdater::new(&ctx, queue);

        let query = ctx.message_text();
        if query.trim().is_empty() {
            let prompt = updater.status_message("Please provide a warehouse data query.");
            updater.requires_input(prompt);
            return Ok(());
        }

        if ctx.is_new_task() {
            updater.submit();
        }
        updater.start_work();

        match self.agent.answer(&query).await {
            Ok(insight) => {
                updater.add_text_artifact(Some(INSIGHT_ARTIFACT_NAME.into()), insight);
                updater.complete();
            }
            Err(err) => {
                tracing::warn!(task_id = %ctx.task_id, error = %err, "agent could not answer");
                let note = updater.status_message(err.to_string());
                updater.fail(Some(note));
            }
        }
        Ok(())
    }

    async fn cancel(&self, ctx: RequestContext, queue: EventQueue) -> Result<(), HostError> {
        TaskUpdater::new(&ctx, queue).cancel();
        Ok(())
    }
}

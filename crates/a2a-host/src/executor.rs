use a2a_wire::{Message, Task};
use async_trait::async_trait;

use crate::error::HostError;
use crate::event_queue::EventQueue;

/// Everything an executor needs to know about the request it is serving.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub task_id: String,
    pub context_id: String,
    /// The user message that triggered this execution. Absent for
    /// cancellation contexts.
    pub message: Option<Message>,
    /// Stored snapshot when the message continues an existing task.
    pub task: Option<Task>,
}

impl RequestContext {
    pub fn new(
        task_id: impl Into<String>,
        context_id: impl Into<String>,
        message: Option<Message>,
        task: Option<Task>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            context_id: context_id.into(),
            message,
            task,
        }
    }

    /// Whether this request starts a fresh task.
    pub fn is_new_task(&self) -> bool {
        self.task.is_none()
    }

    /// Concatenated text of the triggering message, empty when there is
    /// no message or no text parts.
    pub fn message_text(&self) -> String {
        self.message
            .as_ref()
            .map(Message::text_content)
            .unwrap_or_default()
    }
}

/// Agent business logic entry point. Implementations publish task events
/// into the queue; the host aggregates and persists them.
#[async_trait]
pub trait AgentExecutor: Send + Sync + 'static {
    async fn execute(&self, ctx: RequestContext, queue: EventQueue) -> Result<(), HostError>;

    /// Cancellation request for a running task. Implementations should
    /// publish a canceled status update for live subscribers.
    async fn cancel(&self, ctx: RequestContext, queue: EventQueue) -> Result<(), HostError>;
}

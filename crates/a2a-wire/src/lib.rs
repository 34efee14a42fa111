//! Wire types for the A2A agent-to-agent protocol: the JSON-RPC 2.0
//! envelope, the message/task/event data model, agent card discovery records
//! and push notification configs. Serialization follows the protocol's JSON
//! shapes (camelCase fields, `kind`-discriminated unions, kebab-case task
//! states); no transport or server logic lives here.

pub mod agent_card;
pub mod error;
pub mod event;
pub mod jsonrpc;
pub mod message;
pub mod push;
pub mod task;

// Convenience re-exports
pub use agent_card::{AgentCapabilities, AgentCard, AgentProvider, AgentSkill};
pub use error::A2AError;
pub use event::{Event, TaskArtifactUpdateEvent, TaskStatusUpdateEvent};
pub use jsonrpc::{JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse};
pub use message::{
    FileContent, Message, MessageSendConfiguration, MessageSendParams, Part, Role,
};
pub use push::{
    PushNotificationAuthenticationInfo, PushNotificationConfig, TaskPushNotificationConfig,
};
pub use task::{Artifact, Task, TaskIdParams, TaskQueryParams, TaskState, TaskStatus};

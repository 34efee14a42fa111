//! Server-side machinery for hosting an agent behind the A2A protocol.
//!
//! An [`AgentExecutor`] holds the agent logic and publishes lifecycle
//! events into a per-task [`EventQueue`]. The [`DefaultRequestHandler`]
//! owns the rest: it resolves incoming messages to tasks, runs the
//! executor, folds events into the [`TaskStore`] through a `TaskManager`,
//! delivers webhook notifications, and exposes the whole protocol surface
//! over a single JSON-RPC endpoint with SSE streaming.

pub mod card;
pub mod error;
pub mod event_queue;
pub mod executor;
pub mod handler;
pub mod push_notifier;
pub mod router;
pub mod rpc;
pub mod sse;
pub mod task_manager;
pub mod task_store;
pub mod updater;

pub use card::serve_agent_card;
pub use error::HostError;
pub use event_queue::{EventQueue, EventStream, InMemoryQueueManager, QueueManager};
pub use executor::{AgentExecutor, RequestContext};
pub use handler::{DefaultRequestHandler, DefaultRequestHandlerBuilder, RequestHandler};
pub use push_notifier::{InMemoryPushNotifier, PushNotifier, NOTIFICATION_TOKEN_HEADER};
pub use router::{create_router, ServerState, AGENT_CARD_PATH};
pub use rpc::jsonrpc_endpoint;
pub use task_manager::TaskManager;
pub use task_store::{InMemoryTaskStore, TaskStore};
pub use updater::TaskUpdater;

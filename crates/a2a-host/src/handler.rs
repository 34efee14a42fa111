use std::sync::Arc;

use a2a_wire::{
    A2AError, Event, Message, MessageSendConfiguration, MessageSendParams, Task,
    TaskIdParams, TaskPushNotificationConfig, TaskQueryParams, TaskState, TaskStatus,
    TaskStatusUpdateEvent,
};
use async_trait::async_trait;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use uuid::Uuid;

use crate::error::HostError;
use crate::event_queue::{EventQueue, EventStream, InMemoryQueueManager, QueueManager};
use crate::executor::{AgentExecutor, RequestContext};
use crate::push_notifier::{InMemoryPushNotifier, PushNotifier};
use crate::task_manager::TaskManager;
use crate::task_store::{InMemoryTaskStore, TaskStore};

/// Protocol-method surface the JSON-RPC endpoint dispatches into.
///
/// `message/send` and `message/stream` both resolve to an execution; the
/// difference is whether the caller gets the final outcome or the event
/// stream leading up to it.
#[async_trait]
pub trait RequestHandler: Send + Sync + 'static {
    /// `message/send`. Returns the final `Task` snapshot, or the agent's
    /// direct `Message` reply when the executor answers without a task
    /// lifecycle. With `configuration.blocking` set to `false` the initial
    /// snapshot is returned while execution continues in the background.
    async fn on_message_send(&self, params: MessageSendParams) -> Result<Event, HostError>;

    /// `message/stream`. The first item is the stored `Task` snapshot,
    /// followed by every event the executor publishes.
    async fn on_message_stream(&self, params: MessageSendParams)
        -> Result<EventStream, HostError>;

    /// `tasks/get`.
    async fn on_get_task(&self, params: TaskQueryParams) -> Result<Task, HostError>;

    /// `tasks/cancel`.
    async fn on_cancel_task(&self, params: TaskIdParams) -> Result<Task, HostError>;

    /// `tasks/resubscribe`. Snapshot first, then the live tail if the task
    /// still has an open queue.
    async fn on_resubscribe(&self, params: TaskIdParams) -> Result<EventStream, HostError>;

    /// `tasks/pushNotificationConfig/set`.
    async fn on_set_push_config(
        &self,
        params: TaskPushNotificationConfig,
    ) -> Result<TaskPushNotificationConfig, HostError>;

    /// `tasks/pushNotificationConfig/get`.
    async fn on_get_push_config(
        &self,
        params: TaskIdParams,
    ) -> Result<TaskPushNotificationConfig, HostError>;
}

/// Standard handler wiring an executor to the store, queues and webhooks.
pub struct DefaultRequestHandler {
    executor: Arc<dyn AgentExecutor>,
    task_store: Arc<dyn TaskStore>,
    queue_manager: Arc<dyn QueueManager>,
    push_notifier: Option<Arc<dyn PushNotifier>>,
}

impl DefaultRequestHandler {
    pub fn builder() -> DefaultRequestHandlerBuilder {
        DefaultRequestHandlerBuilder::default()
    }

    fn task_manager(&self, task_id: &str, context_id: &str) -> TaskManager {
        TaskManager::new(
            task_id,
            context_id,
            self.task_store.clone(),
            self.push_notifier.clone(),
        )
    }

    /// Resolves the request to a task identity, loading the stored task for
    /// continuations. The returned message carries the resolved ids.
    async fn resolve_context(
        &self,
        params: &MessageSendParams,
    ) -> Result<(RequestContext, Message), HostError> {
        let incoming = &params.message;
        let (task_id, context_id, task) = match incoming.task_id.clone() {
            Some(task_id) => {
                let task = self
                    .task_store
                    .get(&task_id)
                    .await?
                    .ok_or_else(|| HostError::TaskNotFound(task_id.clone()))?;
                if task.status.state.is_terminal() {
                    return Err(HostError::A2A(A2AError::InvalidParams(format!(
                        "task {task_id} is in a terminal state and cannot be continued"
                    ))));
                }
                let context_id = incoming
                    .context_id
                    .clone()
                    .unwrap_or_else(|| task.context_id.clone());
                (task_id, context_id, Some(task))
            }
            None => {
                let context_id = incoming
                    .context_id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                (Uuid::new_v4().to_string(), context_id, None)
            }
        };

        let mut message = incoming.clone();
        message.task_id = Some(task_id.clone());
        message.context_id = Some(context_id.clone());

        let ctx = RequestContext::new(task_id, context_id, Some(message.clone()), task);
        Ok((ctx, message))
    }

    /// Registers a webhook supplied inline with a send request.
    async fn register_push_config(
        &self,
        task_id: &str,
        configuration: Option<&MessageSendConfiguration>,
    ) -> Result<(), HostError> {
        let Some(push) = configuration.and_then(|c| c.push_notification_config.clone()) else {
            return Ok(());
        };
        let notifier = self
            .push_notifier
            .as_ref()
            .ok_or(HostError::PushNotSupported)?;
        notifier
            .set_config(TaskPushNotificationConfig {
                task_id: task_id.to_string(),
                push_notification_config: push,
            })
            .await
    }

    /// Runs the executor on its own task so a slow agent never blocks the
    /// endpoint. An executor error becomes a final `failed` status update
    /// for whoever is listening.
    fn spawn_executor(&self, ctx: RequestContext, queue: EventQueue) {
        let executor = self.executor.clone();
        tokio::spawn(async move {
            let task_id = ctx.task_id.clone();
            let context_id = ctx.context_id.clone();
            if let Err(err) = executor.execute(ctx, queue.clone()).await {
                tracing::error!(task_id = %task_id, error = %err, "agent executor failed");
                let message = Message::agent_text(err.to_string())
                    .for_task(task_id.clone(), context_id.clone());
                queue.publish(Event::StatusUpdate(TaskStatusUpdateEvent {
                    task_id,
                    context_id,
                    status: TaskStatus::now(TaskState::Failed).with_message(message),
                    is_final: true,
                }));
                queue.close();
            }
        });
    }
}

#[async_trait]
impl RequestHandler for DefaultRequestHandler {
    async fn on_message_send(&self, params: MessageSendParams) -> Result<Event, HostError> {
        let (ctx, message) = self.resolve_context(&params).await?;
        let configuration = params.configuration.as_ref();
        let blocking = configuration.and_then(|c| c.blocking).unwrap_or(true);
        let history_length = configuration.and_then(|c| c.history_length);
        self.register_push_config(&ctx.task_id, configuration).await?;

        let task_id = ctx.task_id.clone();
        let mut manager = self.task_manager(&ctx.task_id, &ctx.context_id);
        let queue = self.queue_manager.create_or_tap(&ctx.task_id);
        let initial = manager.ensure_task(&message).await?;

        // Tap before the executor starts so no event can slip past.
        let events = queue.tap();
        self.spawn_executor(ctx, queue);

        let queue_manager = self.queue_manager.clone();
        let aggregation = tokio::spawn({
            let task_id = task_id.clone();
            async move {
                let outcome = aggregate_all(manager, events).await;
                queue_manager.close(&task_id);
                outcome
            }
        });

        if !blocking {
            // The aggregation task keeps folding events into the store.
            return Ok(Event::Task(limit_history(initial, history_length)));
        }

        let outcome = aggregation
            .await
            .map_err(|err| HostError::Internal(format!("event aggregation panicked: {err}")))??;
        Ok(match outcome {
            Event::Task(task) => Event::Task(limit_history(task, history_length)),
            other => other,
        })
    }

    async fn on_message_stream(
        &self,
        params: MessageSendParams,
    ) -> Result<EventStream, HostError> {
        let (ctx, message) = self.resolve_context(&params).await?;
        self.register_push_config(&ctx.task_id, params.configuration.as_ref())
            .await?;

        let task_id = ctx.task_id.clone();
        let mut manager = self.task_manager(&ctx.task_id, &ctx.context_id);
        let queue = self.queue_manager.create_or_tap(&ctx.task_id);
        let initial = manager.ensure_task(&message).await?;

        let mut events = queue.tap();
        self.spawn_executor(ctx, queue);

        let (tx, rx) = tokio::sync::mpsc::channel::<Event>(16);
        let queue_manager = self.queue_manager.clone();
        tokio::spawn(async move {
            // A dropped receiver stops delivery but never aggregation; the
            // store must reach the final state regardless of the client.
            let _ = tx.send(Event::Task(initial)).await;
            while let Some(event) = events.next().await {
                if let Err(err) = manager.apply(&event).await {
                    tracing::error!(task_id = %task_id, error = %err, "failed to apply task event");
                    break;
                }
                let done = event.is_final();
                let _ = tx.send(event).await;
                if done {
                    break;
                }
            }
            queue_manager.close(&task_id);
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    async fn on_get_task(&self, params: TaskQueryParams) -> Result<Task, HostError> {
        let task = self
            .task_store
            .get(&params.id)
            .await?
            .ok_or_else(|| HostError::TaskNotFound(params.id.clone()))?;
        Ok(limit_history(task, params.history_length))
    }

    async fn on_cancel_task(&self, params: TaskIdParams) -> Result<Task, HostError> {
        let task = self
            .task_store
            .get(&params.id)
            .await?
            .ok_or_else(|| HostError::TaskNotFound(params.id.clone()))?;
        if task.status.state.is_terminal() {
            return Err(HostError::TaskNotCancelable(params.id.clone()));
        }

        let queue = self.queue_manager.create_or_tap(&params.id);
        let ctx = RequestContext::new(
            task.id.clone(),
            task.context_id.clone(),
            None,
            Some(task.clone()),
        );
        self.executor.cancel(ctx, queue).await?;

        // The executor told live subscribers; the store is settled here so
        // cancellation holds even when nothing was consuming the queue.
        let mut manager = self.task_manager(&task.id, &task.context_id);
        let canceled = Event::StatusUpdate(TaskStatusUpdateEvent {
            task_id: task.id.clone(),
            context_id: task.context_id.clone(),
            status: TaskStatus::now(TaskState::Canceled),
            is_final: true,
        });
        let snapshot = manager.apply(&canceled).await?;
        self.queue_manager.close(&params.id);
        Ok(snapshot)
    }

    async fn on_resubscribe(&self, params: TaskIdParams) -> Result<EventStream, HostError> {
        let task = self
            .task_store
            .get(&params.id)
            .await?
            .ok_or_else(|| HostError::TaskNotFound(params.id.clone()))?;

        // Resubscribers only observe; the sending request owns aggregation.
        let tail: EventStream = match self.queue_manager.tap(&params.id) {
            Some(queue) => queue.tap(),
            None => Box::pin(tokio_stream::empty()),
        };
        Ok(Box::pin(tokio_stream::once(Event::Task(task)).chain(tail)))
    }

    async fn on_set_push_config(
        &self,
        params: TaskPushNotificationConfig,
    ) -> Result<TaskPushNotificationConfig, HostError> {
        let notifier = self
            .push_notifier
            .as_ref()
            .ok_or(HostError::PushNotSupported)?;
        self.task_store
            .get(&params.task_id)
            .await?
            .ok_or_else(|| HostError::TaskNotFound(params.task_id.clone()))?;
        notifier.set_config(params.clone()).await?;
        Ok(params)
    }

    async fn on_get_push_config(
        &self,
        params: TaskIdParams,
    ) -> Result<TaskPushNotificationConfig, HostError> {
        let notifier = self
            .push_notifier
            .as_ref()
            .ok_or(HostError::PushNotSupported)?;
        self.task_store
            .get(&params.id)
            .await?
            .ok_or_else(|| HostError::TaskNotFound(params.id.clone()))?;
        notifier
            .get_config(&params.id)
            .await?
            .ok_or_else(|| {
                HostError::Internal(format!("no push notification config for task {}", params.id))
            })
    }
}

/// Folds the queue into the store until the stream yields a final event or
/// closes, returning what `message/send` should answer with.
async fn aggregate_all(
    mut manager: TaskManager,
    mut events: EventStream,
) -> Result<Event, HostError> {
    while let Some(event) = events.next().await {
        let snapshot = manager.apply(&event).await?;
        match event {
            Event::Message(message) => return Ok(Event::Message(message)),
            event if event.is_final() => return Ok(Event::Task(snapshot)),
            _ => {}
        }
    }
    let snapshot = manager
        .current()
        .cloned()
        .ok_or_else(|| HostError::Internal("task stream ended before any snapshot".into()))?;
    Ok(Event::Task(snapshot))
}

fn limit_history(task: Task, limit: Option<usize>) -> Task {
    match limit {
        Some(limit) => task.with_limited_history(limit),
        None => task,
    }
}

#[derive(Default)]
pub struct DefaultRequestHandlerBuilder {
    executor: Option<Arc<dyn AgentExecutor>>,
    task_store: Option<Arc<dyn TaskStore>>,
    queue_manager: Option<Arc<dyn QueueManager>>,
    push_notifier: Option<Arc<dyn PushNotifier>>,
    push_disabled: bool,
}

impl DefaultRequestHandlerBuilder {
    pub fn executor(mut self, executor: Arc<dyn AgentExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn task_store(mut self, task_store: Arc<dyn TaskStore>) -> Self {
        self.task_store = Some(task_store);
        self
    }

    pub fn queue_manager(mut self, queue_manager: Arc<dyn QueueManager>) -> Self {
        self.queue_manager = Some(queue_manager);
        self
    }

    pub fn push_notifier(mut self, push_notifier: Arc<dyn PushNotifier>) -> Self {
        self.push_notifier = Some(push_notifier);
        self
    }

    /// Disables webhook support; the push config methods then answer with
    /// `PushNotificationNotSupported`.
    pub fn without_push_notifications(mut self) -> Self {
        self.push_disabled = true;
        self
    }

    /// Panics when no executor was provided.
    pub fn build(self) -> DefaultRequestHandler {
        let push_notifier = if self.push_disabled {
            None
        } else {
            Some(
                self.push_notifier
                    .unwrap_or_else(|| Arc::new(InMemoryPushNotifier::default()) as _),
            )
        };
        DefaultRequestHandler {
            executor: self.executor.expect("executor is required"),
            task_store: self
                .task_store
                .unwrap_or_else(|| Arc::new(InMemoryTaskStore::new()) as _),
            queue_manager: self
                .queue_manager
                .unwrap_or_else(|| Arc::new(InMemoryQueueManager::new()) as _),
            push_notifier,
        }
    }
}

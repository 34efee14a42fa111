use std::sync::Arc;

use a2a_wire::{Event, Message, Task, TaskArtifactUpdateEvent, TaskStatusUpdateEvent};

use crate::error::HostError;
use crate::push_notifier::PushNotifier;
use crate::task_store::TaskStore;

/// Folds the event stream of a single task into its stored snapshot.
///
/// One manager is created per handled request. Only the request that owns
/// the execution aggregates; resubscribed consumers read the queue without
/// going through a manager, so every event is applied to the store exactly
/// once.
pub struct TaskManager {
    task_id: String,
    context_id: String,
    store: Arc<dyn TaskStore>,
    notifier: Option<Arc<dyn PushNotifier>>,
    current: Option<Task>,
}

impl TaskManager {
    pub fn new(
        task_id: impl Into<String>,
        context_id: impl Into<String>,
        store: Arc<dyn TaskStore>,
        notifier: Option<Arc<dyn PushNotifier>>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            context_id: context_id.into(),
            store,
            notifier,
            current: None,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn current(&self) -> Option<&Task> {
        self.current.as_ref()
    }

    /// Loads the task from the store, appending the incoming message to its
    /// history, or creates a fresh `submitted` snapshot when the store has
    /// none. The result is persisted before any executor event is applied.
    pub async fn ensure_task(&mut self, message: &Message) -> Result<Task, HostError> {
        let task = match self.store.get(&self.task_id).await? {
            Some(mut task) => {
                task.push_history(message.clone());
                task
            }
            None => Task::submitted(
                self.task_id.clone(),
                self.context_id.clone(),
                message.clone(),
            ),
        };
        self.current = Some(task);
        self.persist().await
    }

    /// Applies one executor event to the snapshot and persists the result.
    pub async fn apply(&mut self, event: &Event) -> Result<Task, HostError> {
        match event {
            Event::Task(task) => {
                self.current = Some(task.clone());
            }
            Event::StatusUpdate(update) => self.apply_status(update).await?,
            Event::ArtifactUpdate(update) => self.apply_artifact(update).await?,
            Event::Message(message) => {
                let task = self.snapshot_mut().await?;
                task.push_history(message.clone());
            }
        }
        self.persist().await
    }

    async fn apply_status(&mut self, update: &TaskStatusUpdateEvent) -> Result<(), HostError> {
        let task_id = self.task_id.clone();
        let task = self.snapshot_mut().await?;
        if update.task_id != task_id {
            tracing::warn!(
                expected = %task_id,
                got = %update.task_id,
                "status update for a different task, skipping"
            );
            return Ok(());
        }
        // A superseded status message is not lost: it becomes history.
        if let Some(previous) = task.status.message.take() {
            task.push_history(previous);
        }
        task.status = update.status.clone();
        Ok(())
    }

    async fn apply_artifact(&mut self, update: &TaskArtifactUpdateEvent) -> Result<(), HostError> {
        let task_id = self.task_id.clone();
        let task = self.snapshot_mut().await?;
        if update.task_id != task_id {
            tracing::warn!(
                expected = %task_id,
                got = %update.task_id,
                "artifact update for a different task, skipping"
            );
            return Ok(());
        }

        let artifacts = task.artifacts.get_or_insert_with(Vec::new);
        let existing = artifacts
            .iter_mut()
            .find(|artifact| artifact.artifact_id == update.artifact.artifact_id);
        match existing {
            Some(artifact) if update.append == Some(true) => {
                artifact.parts.extend(update.artifact.parts.iter().cloned());
            }
            Some(artifact) => {
                *artifact = update.artifact.clone();
            }
            None => {
                artifacts.push(update.artifact.clone());
            }
        }
        Ok(())
    }

    async fn snapshot_mut(&mut self) -> Result<&mut Task, HostError> {
        if self.current.is_none() {
            self.current = self.store.get(&self.task_id).await?;
        }
        self.current
            .as_mut()
            .ok_or_else(|| HostError::TaskNotFound(self.task_id.clone()))
    }

    async fn persist(&mut self) -> Result<Task, HostError> {
        let task = self
            .current
            .clone()
            .ok_or_else(|| HostError::TaskNotFound(self.task_id.clone()))?;
        self.store.save(task.clone()).await?;
        if let Some(notifier) = &self.notifier {
            notifier.notify(&task).await;
        }
        Ok(task)
    }
}

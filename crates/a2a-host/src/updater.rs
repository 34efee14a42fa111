use a2a_wire::{
    Artifact, Event, Message, TaskArtifactUpdateEvent, TaskState, TaskStatus,
    TaskStatusUpdateEvent,
};

use crate::event_queue::EventQueue;
use crate::executor::RequestContext;

/// Executor-side helper that publishes well-formed events for one task, so
/// agent code never assembles update payloads by hand.
pub struct TaskUpdater {
    task_id: String,
    context_id: String,
    queue: EventQueue,
}

impl TaskUpdater {
    pub fn new(ctx: &RequestContext, queue: EventQueue) -> Self {
        Self {
            task_id: ctx.task_id.clone(),
            context_id: ctx.context_id.clone(),
            queue,
        }
    }

    /// Non-final status update.
    pub fn update_status(&self, state: TaskState, message: Option<Message>) {
        self.publish_status(state, message, false);
    }

    pub fn submit(&self) {
        self.update_status(TaskState::Submitted, None);
    }

    pub fn start_work(&self) {
        self.update_status(TaskState::Working, None);
    }

    /// Attach output. `append` extends a previously sent artifact with the
    /// same id.
    pub fn add_artifact(&self, artifact: Artifact, append: bool) {
        self.queue.publish(Event::ArtifactUpdate(TaskArtifactUpdateEvent {
            task_id: self.task_id.clone(),
            context_id: self.context_id.clone(),
            artifact,
            append: append.then_some(true),
            last_chunk: None,
        }));
    }

    /// Convenience for a single text artifact.
    pub fn add_text_artifact(&self, name: Option<String>, text: impl Into<String>) {
        self.add_artifact(Artifact::from_text(name, text), false);
    }

    pub fn complete(&self) {
        self.publish_status(TaskState::Completed, None, true);
        self.queue.close();
    }

    pub fn fail(&self, message: Option<Message>) {
        self.publish_status(TaskState::Failed, message, true);
        self.queue.close();
    }

    pub fn cancel(&self) {
        self.publish_status(TaskState::Canceled, None, true);
        self.queue.close();
    }

    /// Ask the caller for more input. Final for this exchange; the task
    /// stays open for a follow-up message.
    pub fn requires_input(&self, message: Message) {
        self.publish_status(TaskState::InputRequired, Some(message), true);
        self.queue.close();
    }

    /// Agent text attached to a status update, addressed to this task.
    pub fn status_message(&self, text: impl Into<String>) -> Message {
        Message::agent_text(text).for_task(self.task_id.clone(), self.context_id.clone())
    }

    fn publish_status(&self, state: TaskState, message: Option<Message>, is_final: bool) {
        let mut status = TaskStatus::now(state);
        if let Some(message) = message {
            status = status.with_message(message);
        }
        self.queue.publish(Event::StatusUpdate(TaskStatusUpdateEvent {
            task_id: self.task_id.clone(),
            context_id: self.context_id.clone(),
            status,
            is_final,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    fn updater_with_tap() -> (TaskUpdater, crate::event_queue::EventStream) {
        let queue = EventQueue::new();
        let tap = queue.tap();
        let ctx = RequestContext::new("t-1", "ctx-1", Some(Message::user_text("q")), None);
        (TaskUpdater::new(&ctx, queue), tap)
    }

    #[tokio::test]
    async fn lifecycle_events_carry_task_ids() {
        let (updater, mut tap) = updater_with_tap();

        updater.submit();
        updater.start_work();
        updater.complete();

        for expected in [TaskState::Submitted, TaskState::Working, TaskState::Completed] {
            match tap.next().await.unwrap() {
                Event::StatusUpdate(update) => {
                    assert_eq!(update.task_id, "t-1");
                    assert_eq!(update.context_id, "ctx-1");
                    assert_eq!(update.status.state, expected);
                    assert!(update.status.timestamp.is_some());
                }
                other => panic!("expected status update, got {other:?}"),
            }
        }
        assert!(tap.next().await.is_none(), "complete should close the queue");
    }

    #[tokio::test]
    async fn only_terminal_updates_are_final() {
        let (updater, mut tap) = updater_with_tap();

        updater.start_work();
        updater.complete();

        match tap.next().await.unwrap() {
            Event::StatusUpdate(update) => assert!(!update.is_final),
            other => panic!("unexpected {other:?}"),
        }
        match tap.next().await.unwrap() {
            Event::StatusUpdate(update) => assert!(update.is_final),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn text_artifact_event_shape() {
        let (updater, mut tap) = updater_with_tap();

        updater.add_text_artifact(Some("insight".into()), "stock dropped 40 units");

        match tap.next().await.unwrap() {
            Event::ArtifactUpdate(update) => {
                assert_eq!(update.task_id, "t-1");
                assert!(update.append.is_none());
                assert_eq!(update.artifact.name.as_deref(), Some("insight"));
                assert_eq!(
                    update.artifact.parts[0].as_text(),
                    Some("stock dropped 40 units")
                );
            }
            other => panic!("expected artifact update, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn append_flag_is_set_only_when_appending() {
        let (updater, mut tap) = updater_with_tap();

        let artifact = Artifact::from_text(None, "chunk");
        updater.add_artifact(artifact.clone(), true);

        match tap.next().await.unwrap() {
            Event::ArtifactUpdate(update) => assert_eq!(update.append, Some(true)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn fail_carries_message_and_closes() {
        let (updater, mut tap) = updater_with_tap();

        let note = updater.status_message("agent exploded");
        updater.fail(Some(note));

        match tap.next().await.unwrap() {
            Event::StatusUpdate(update) => {
                assert_eq!(update.status.state, TaskState::Failed);
                assert!(update.is_final);
                let message = update.status.message.unwrap();
                assert_eq!(message.text_content(), "agent exploded");
                assert_eq!(message.task_id.as_deref(), Some("t-1"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(tap.next().await.is_none());
    }

    #[tokio::test]
    async fn requires_input_is_final_but_not_terminal() {
        let (updater, mut tap) = updater_with_tap();

        updater.requires_input(updater.status_message("which item?"));

        match tap.next().await.unwrap() {
            Event::StatusUpdate(update) => {
                assert_eq!(update.status.state, TaskState::InputRequired);
                assert!(update.is_final);
                assert!(!update.status.state.is_terminal());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(tap.next().await.is_none());
    }
}

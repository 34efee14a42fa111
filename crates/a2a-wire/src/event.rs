use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::task::{Artifact, Task, TaskStatus};

/// Status change for a task. `final` marks the last update of the exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusUpdateEvent {
    pub task_id: String,
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(rename = "final")]
    pub is_final: bool,
}

/// New or extended artifact for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskArtifactUpdateEvent {
    pub task_id: String,
    pub context_id: String,
    pub artifact: Artifact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_chunk: Option<bool>,
}

/// Anything an executor can emit and a client can receive, discriminated by
/// `kind`. Full task snapshots and bare messages share the stream with
/// incremental updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Event {
    Task(Task),
    Message(Message),
    StatusUpdate(TaskStatusUpdateEvent),
    ArtifactUpdate(TaskArtifactUpdateEvent),
}

impl Event {
    /// Task this event belongs to. Bare messages may not reference one.
    pub fn task_id(&self) -> Option<&str> {
        match self {
            Event::Task(task) => Some(&task.id),
            Event::Message(message) => message.task_id.as_deref(),
            Event::StatusUpdate(update) => Some(&update.task_id),
            Event::ArtifactUpdate(update) => Some(&update.task_id),
        }
    }

    pub fn context_id(&self) -> Option<&str> {
        match self {
            Event::Task(task) => Some(&task.context_id),
            Event::Message(message) => message.context_id.as_deref(),
            Event::StatusUpdate(update) => Some(&update.context_id),
            Event::ArtifactUpdate(update) => Some(&update.context_id),
        }
    }

    /// Whether no further events are expected for the current exchange:
    /// a bare message, a final status update, or a task snapshot that is
    /// already terminal or waiting on the caller.
    pub fn is_final(&self) -> bool {
        match self {
            Event::Message(_) => true,
            Event::StatusUpdate(update) => update.is_final,
            Event::Task(task) => {
                task.status.state.is_terminal() || task.status.state.is_interrupted()
            }
            Event::ArtifactUpdate(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Part;
    use crate::task::TaskState;

    fn status_update(state: TaskState, is_final: bool) -> TaskStatusUpdateEvent {
        TaskStatusUpdateEvent {
            task_id: "t-1".into(),
            context_id: "ctx-1".into(),
            status: TaskStatus::now(state),
            is_final,
        }
    }

    #[test]
    fn task_event_carries_kind_tag() {
        let task = Task::submitted("t-1", "ctx-1", Message::user_text("q"));
        let json = serde_json::to_value(Event::Task(task)).unwrap();
        assert_eq!(json["kind"], "task");
        assert_eq!(json["id"], "t-1");
    }

    #[test]
    fn status_update_serializes_final_keyword() {
        let event = Event::StatusUpdate(status_update(TaskState::Completed, true));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "status-update");
        assert_eq!(json["final"], true);
        assert_eq!(json["taskId"], "t-1");
        assert_eq!(json["status"]["state"], "completed");
    }

    #[test]
    fn artifact_update_kind_tag() {
        let event = Event::ArtifactUpdate(TaskArtifactUpdateEvent {
            task_id: "t-2".into(),
            context_id: "ctx-2".into(),
            artifact: Artifact::from_text(None, "partial"),
            append: Some(true),
            last_chunk: None,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "artifact-update");
        assert_eq!(json["append"], true);
        assert!(json.get("lastChunk").is_none());
    }

    #[test]
    fn message_event_roundtrip() {
        let event = Event::Message(Message::agent_text("need more detail").for_task("t-3", "ctx-3"));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"message\""));

        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn kind_tag_selects_variant_on_decode() {
        let json = r#"{
            "kind": "status-update",
            "taskId": "t-4",
            "contextId": "ctx-4",
            "status": {"state": "working"},
            "final": false
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        match event {
            Event::StatusUpdate(update) => {
                assert_eq!(update.status.state, TaskState::Working);
                assert!(!update.is_final);
            }
            other => panic!("expected status update, got {other:?}"),
        }
    }

    #[test]
    fn event_without_kind_fails() {
        let json = r#"{"taskId": "t-5", "contextId": "ctx-5"}"#;
        assert!(serde_json::from_str::<Event>(json).is_err());
    }

    #[test]
    fn task_and_context_id_accessors() {
        let event = Event::ArtifactUpdate(TaskArtifactUpdateEvent {
            task_id: "t-6".into(),
            context_id: "ctx-6".into(),
            artifact: Artifact {
                artifact_id: "a-6".into(),
                name: None,
                description: None,
                parts: vec![Part::text("x")],
                metadata: None,
            },
            append: None,
            last_chunk: None,
        });
        assert_eq!(event.task_id(), Some("t-6"));
        assert_eq!(event.context_id(), Some("ctx-6"));

        let bare = Event::Message(Message::user_text("hello"));
        assert_eq!(bare.task_id(), None);
    }

    #[test]
    fn finality_rules() {
        assert!(Event::Message(Message::agent_text("reply")).is_final());
        assert!(Event::StatusUpdate(status_update(TaskState::Completed, true)).is_final());
        assert!(!Event::StatusUpdate(status_update(TaskState::Working, false)).is_final());

        let mut task = Task::submitted("t-7", "ctx-7", Message::user_text("q"));
        assert!(!Event::Task(task.clone()).is_final());
        task.status = TaskStatus::now(TaskState::InputRequired);
        assert!(Event::Task(task.clone()).is_final());
        task.status = TaskStatus::now(TaskState::Failed);
        assert!(Event::Task(task).is_final());

        let artifact = Event::ArtifactUpdate(TaskArtifactUpdateEvent {
            task_id: "t-8".into(),
            context_id: "ctx-8".into(),
            artifact: Artifact::from_text(None, "chunk"),
            append: None,
            last_chunk: Some(true),
        });
        assert!(!artifact.is_final());
    }
}

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use a2a_wire::Event;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

/// Stream of events observed through a queue tap.
pub type EventStream = Pin<Box<dyn Stream<Item = Event> + Send>>;

const BROADCAST_CAPACITY: usize = 32;

/// Cloneable per-task event channel. Executors publish into it; request
/// flows tap it for a live view.
///
/// The broadcast sender sits behind `RwLock<Option<...>>` so `close()` can
/// drop it, which ends every tap. Publishing to a closed queue or a queue
/// with no taps drops the event silently.
#[derive(Clone)]
pub struct EventQueue {
    sender: Arc<RwLock<Option<broadcast::Sender<Event>>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::with_capacity(BROADCAST_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(RwLock::new(Some(sender))),
        }
    }

    pub fn publish(&self, event: Event) {
        let sender = self.sender.read().expect("queue lock poisoned");
        if let Some(sender) = sender.as_ref() {
            let _ = sender.send(event);
        }
    }

    pub fn close(&self) {
        let mut sender = self.sender.write().expect("queue lock poisoned");
        *sender = None;
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().expect("queue lock poisoned").is_none()
    }

    /// Live view of events published after this call. Ends when the queue
    /// closes; lagged taps skip the events they missed.
    pub fn tap(&self) -> EventStream {
        let sender = self.sender.read().expect("queue lock poisoned");
        match sender.as_ref() {
            Some(sender) => {
                let rx = sender.subscribe();
                Box::pin(BroadcastStream::new(rx).filter_map(|result| result.ok()))
            }
            None => Box::pin(tokio_stream::empty()),
        }
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Hands out per-task event queues.
pub trait QueueManager: Send + Sync + 'static {
    /// Queue for the task, created on first use.
    fn create_or_tap(&self, task_id: &str) -> EventQueue;

    /// Queue for the task if one is live.
    fn tap(&self, task_id: &str) -> Option<EventQueue>;

    /// Close the task's queue and forget it. Outstanding taps end.
    fn close(&self, task_id: &str);
}

/// Queue manager over a locked map, for single-process deployments.
pub struct InMemoryQueueManager {
    queues: RwLock<HashMap<String, EventQueue>>,
}

impl InMemoryQueueManager {
    pub fn new() -> Self {
        Self {
            queues: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryQueueManager {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueManager for InMemoryQueueManager {
    fn create_or_tap(&self, task_id: &str) -> EventQueue {
        {
            let queues = self.queues.read().expect("queue map lock poisoned");
            if let Some(queue) = queues.get(task_id) {
                return queue.clone();
            }
        }
        let mut queues = self.queues.write().expect("queue map lock poisoned");
        queues.entry(task_id.to_string()).or_default().clone()
    }

    fn tap(&self, task_id: &str) -> Option<EventQueue> {
        let queues = self.queues.read().expect("queue map lock poisoned");
        queues.get(task_id).cloned()
    }

    fn close(&self, task_id: &str) {
        let queue = {
            let mut queues = self.queues.write().expect("queue map lock poisoned");
            queues.remove(task_id)
        };
        if let Some(queue) = queue {
            queue.close();
        }
    }
}

use std::collections::HashMap;

use a2a_wire::Task;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::HostError;

/// Storage for task snapshots. Implementations hold whole tasks; event
/// aggregation happens in [`crate::task_manager::TaskManager`].
#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    async fn save(&self, task: Task) -> Result<(), HostError>;
    async fn get(&self, task_id: &str) -> Result<Option<Task>, HostError>;
    async fn delete(&self, task_id: &str) -> Result<(), HostError>;
}

/// Process-local task store over `RwLock<HashMap>`. Nothing survives a
/// restart.
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn save(&self, task: Task) -> Result<(), HostError> {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id.clone(), task);
        Ok(())
    }

    async fn get(&self, task_id: &str) -> Result<Option<Task>, HostError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(task_id).cloned())
    }

    async fn delete(&self, task_id: &str) -> Result<(), HostError> {
        let mut tasks = self.tasks.write().await;
        tasks.remove(task_id);
        Ok(())
    }
}

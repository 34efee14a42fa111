use std::collections::HashMap;

use a2a_wire::{Event, Task, TaskPushNotificationConfig};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::HostError;

/// Header carrying the client-chosen token on webhook deliveries.
pub const NOTIFICATION_TOKEN_HEADER: &str = "X-A2A-Notification-Token";

/// Registry of per-task webhook configs plus the delivery side.
#[async_trait]
pub trait PushNotifier: Send + Sync + 'static {
    async fn set_config(&self, config: TaskPushNotificationConfig) -> Result<(), HostError>;
    async fn get_config(
        &self,
        task_id: &str,
    ) -> Result<Option<TaskPushNotificationConfig>, HostError>;
    async fn remove_config(&self, task_id: &str) -> Result<(), HostError>;

    /// Deliver the task snapshot to the task's webhook, if one is
    /// configured. Delivery problems are logged, never propagated; a lost
    /// notification must not fail the task flow.
    async fn notify(&self, task: &Task);
}

/// Push notifier with an in-process config map, delivering over a shared
/// HTTP client.
pub struct InMemoryPushNotifier {
    configs: RwLock<HashMap<String, TaskPushNotificationConfig>>,
    client: reqwest::Client,
}

impl InMemoryPushNotifier {
    /// The client is shared for the life of the process, like the single
    /// long-lived handle the notifier held in the original deployment.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            configs: RwLock::new(HashMap::new()),
            client,
        }
    }
}

impl Default for InMemoryPushNotifier {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl PushNotifier for InMemoryPushNotifier {
    async fn set_config(&self, config: TaskPushNotificationConfig) -> Result<(), HostError> {
        let mut configs = self.configs.write().await;
        configs.insert(config.task_id.clone(), config);
        Ok(())
    }

    async fn get_config(
        &self,
        task_id: &str,
    ) -> Result<Option<TaskPushNotificationConfig>, HostError> {
        let configs = self.configs.read().await;
        Ok(configs.get(task_id).cloned())
    }

    async fn remove_config(&self, task_id: &str) -> Result<(), HostError> {
        let mut configs = self.configs.write().await;
        configs.remove(task_id);
        Ok(())
    }

    async fn notify(&self, task: &Task) {
        let config = {
            let configs = self.configs.read().await;
            configs.get(&task.id).cloned()
        };
        let Some(config) = config else {
            return;
        };

        let push = config.push_notification_config;
        let payload = Event::Task(task.clone());
        let mut request = self.client.post(&push.url).json(&payload);
        if let Some(token) = push.token.as_deref() {
            request = request.header(NOTIFICATION_TOKEN_HEADER, token);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(task_id = %task.id, url = %push.url, "push notification delivered");
            }
            Ok(response) => {
                tracing::warn!(
                    task_id = %task.id,
                    url = %push.url,
                    status = %response.status(),
                    "push notification rejected by webhook"
                );
            }
            Err(err) => {
                tracing::warn!(task_id = %task.id, url = %push.url, error = %err, "push notification failed");
            }
        }
    }
}

use a2a_wire::{A2AError, JsonRpcError};

/// Faults raised by the host machinery while serving protocol requests.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error(transparent)]
    A2A(#[from] A2AError),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task not cancelable: {0}")]
    TaskNotCancelable(String),

    #[error("Push notifications not configured on this handler")]
    PushNotSupported,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<&HostError> for A2AError {
    fn from(err: &HostError) -> Self {
        match err {
            HostError::A2A(e) => e.clone(),
            HostError::TaskNotFound(id) => A2AError::TaskNotFound(id.clone()),
            HostError::TaskNotCancelable(id) => A2AError::TaskNotCancelable(id.clone()),
            HostError::PushNotSupported => A2AError::PushNotificationNotSupported,
            HostError::Internal(msg) => A2AError::Internal(msg.clone()),
            HostError::Serialization(e) => A2AError::Internal(e.to_string()),
            HostError::Io(e) => A2AError::Internal(e.to_string()),
        }
    }
}

impl From<&HostError> for JsonRpcError {
    fn from(err: &HostError) -> Self {
        let a2a: A2AError = err.into();
        JsonRpcError::from(&a2a)
    }
}

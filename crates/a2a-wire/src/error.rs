use thiserror::Error;

use crate::jsonrpc::JsonRpcError;

/// Protocol-level errors with their JSON-RPC error codes.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum A2AError {
    #[error("Invalid JSON payload")]
    ParseError,
    #[error("Request payload validation error: {0}")]
    InvalidRequest(String),
    #[error("Method not found: {0}")]
    MethodNotFound(String),
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    #[error("Task cannot be canceled: {0}")]
    TaskNotCancelable(String),
    #[error("Push notifications are not supported")]
    PushNotificationNotSupported,
    #[error("This operation is not supported")]
    UnsupportedOperation,
    #[error("Incompatible content types: {0}")]
    ContentTypeNotSupported(String),
    #[error("Invalid agent response: {0}")]
    InvalidAgentResponse(String),
}

impl A2AError {
    pub fn code(&self) -> i32 {
        match self {
            A2AError::ParseError => -32700,
            A2AError::InvalidRequest(_) => -32600,
            A2AError::MethodNotFound(_) => -32601,
            A2AError::InvalidParams(_) => -32602,
            A2AError::Internal(_) => -32603,
            A2AError::TaskNotFound(_) => -32001,
            A2AError::TaskNotCancelable(_) => -32002,
            A2AError::PushNotificationNotSupported => -32003,
            A2AError::UnsupportedOperation => -32004,
            A2AError::ContentTypeNotSupported(_) => -32005,
            A2AError::InvalidAgentResponse(_) => -32006,
        }
    }
}

impl From<&A2AError> for JsonRpcError {
    fn from(err: &A2AError) -> Self {
        JsonRpcError {
            code: err.code(),
            message: err.to_string(),
            data: None,
        }
    }
}

impl From<A2AError> for JsonRpcError {
    fn from(err: A2AError) -> Self {
        JsonRpcError::from(&err)
    }
}

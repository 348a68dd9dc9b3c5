//! Errors raised by the server itself rather than the engine.

use rmcp::model::{ErrorCode, ErrorData as McpError};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The trigger queue is at capacity.
    #[error("QUEUE_FULL: {0}")]
    QueueFull(String),

    /// The dispatcher has stopped consuming triggers.
    #[error("DISPATCHER_STOPPED: {0}")]
    DispatcherStopped(String),
}

impl From<ServerError> for McpError {
    fn from(err: ServerError) -> Self {
        let (code, message) = match &err {
            ServerError::QueueFull(msg) => (-32011, msg.clone()),
            ServerError::DispatcherStopped(msg) => (-32012, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err: McpError = ServerError::QueueFull("64 triggers pending".into()).into();
        assert_eq!(err.code, ErrorCode(-32011));
        assert_eq!(err.message, "64 triggers pending");

        let err: McpError = ServerError::DispatcherStopped("channel closed".into()).into();
        assert_eq!(err.code, ErrorCode(-32012));
    }
}

//! Failure signaling for the remote sync gateway.

use std::fmt;

use thiserror::Error;

/// The remote operations the gateway can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListTodos,
    GetTodo,
    CreateTodo,
    UpdateTodo,
    DeleteTodo,
    ListLabels,
    CreateLabel,
    DeleteLabel,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::ListTodos,
        Operation::GetTodo,
        Operation::CreateTodo,
        Operation::UpdateTodo,
        Operation::DeleteTodo,
        Operation::ListLabels,
        Operation::CreateLabel,
        Operation::DeleteLabel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::ListTodos => "list todos",
            Operation::GetTodo => "get todo",
            Operation::CreateTodo => "create todo",
            Operation::UpdateTodo => "update todo",
            Operation::DeleteTodo => "delete todo",
            Operation::ListLabels => "list labels",
            Operation::CreateLabel => "create label",
            Operation::DeleteLabel => "delete label",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a request failed. Diagnostic detail only; callers handle every cause the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureCause {
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response body: {0}")]
    Decode(String),
}

impl FailureCause {
    pub(crate) fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            FailureCause::Timeout
        } else if error.is_decode() {
            FailureCause::Decode(error.to_string())
        } else {
            FailureCause::Transport(error.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("{operation} request failed ({cause})")]
    RequestFailed {
        operation: Operation,
        cause: FailureCause,
    },
}

impl SyncError {
    pub fn request_failed(operation: Operation, cause: FailureCause) -> Self {
        SyncError::RequestFailed { operation, cause }
    }

    pub fn operation(&self) -> Operation {
        match self {
            SyncError::RequestFailed { operation, .. } => *operation,
        }
    }

    pub fn cause(&self) -> &FailureCause {
        match self {
            SyncError::RequestFailed { cause, .. } => cause,
        }
    }

    /// HTTP status of the response, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self.cause() {
            FailureCause::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

//! Maps gateway failures to tagdo_core::AppError for consistent user-facing messages.

use tagdo_core::{AppError, NetworkError};
use tagdo_services::{FailureCause, SyncError};

pub fn app_error(error: &SyncError) -> AppError {
    let network = match error.cause() {
        FailureCause::Status { status, body } => NetworkError::ServerError {
            status: *status,
            message: body.clone(),
        },
        FailureCause::Timeout => NetworkError::Timeout,
        FailureCause::Transport(message) => NetworkError::ConnectionFailed(message.clone()),
        FailureCause::Decode(message) => NetworkError::InvalidResponse(message.clone()),
    };
    AppError::Network(network)
}

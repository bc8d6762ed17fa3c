//! Error types for the load simulator
//!
//! None of these ever reach the caller of a trigger: per-order failures are
//! logged and counted, run failures end up in the run's status.

use thiserror::Error;

/// Failure talking to the order API. Distinct from a non-success status code.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Failed to connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Transport error calling {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Invalid target URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

/// Failure of a single loop iteration. Logged, never escalated.
#[derive(Debug, Error)]
pub(crate) enum IterationError {
    #[error("Order creation failed: {0}")]
    Create(#[from] ClientError),

    #[error("Order creation returned an unreadable body: {reason}")]
    MalformedBody { reason: String },

    #[error("Reprocess of order {order_id} failed: {source}")]
    Reprocess {
        order_id: String,
        #[source]
        source: ClientError,
    },
}

impl IterationError {
    /// Whether the order itself failed (as opposed to its reprocess call).
    pub(crate) fn is_order_failure(&self) -> bool {
        !matches!(self, IterationError::Reprocess { .. })
    }
}

/// Top-level run failure: the run cannot proceed at all.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RunError {
    #[error("Cannot pace {order_count} orders over {duration_seconds}s")]
    InvalidPacing {
        order_count: u32,
        duration_seconds: f64,
    },
}

/// Rejection of a launch request by the supervisor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LaunchError {
    #[error("Too many scenario runs in flight ({in_flight}/{limit})")]
    AtCapacity { in_flight: usize, limit: usize },

    #[error("Scenario supervisor is shutting down")]
    ShuttingDown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reprocess_failure_is_not_an_order_failure() {
        let err = IterationError::Reprocess {
            order_id: "42".to_string(),
            source: ClientError::Timeout { url: "http://x/orders/42/reprocess".to_string() },
        };
        assert!(!err.is_order_failure());

        let err = IterationError::MalformedBody { reason: "not an object".to_string() };
        assert!(err.is_order_failure());
    }

    #[test]
    fn test_launch_error_display() {
        let err = LaunchError::AtCapacity { in_flight: 20, limit: 20 };
        assert_eq!(err.to_string(), "Too many scenario runs in flight (20/20)");
    }
}

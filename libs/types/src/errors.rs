//! Error types shared by the services
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Order-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {order_id}")]
    NotFound { order_id: String },

    #[error("Invalid order id: {order_id}")]
    InvalidId { order_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_error_display() {
        let err = OrderError::NotFound { order_id: "abc".to_string() };
        assert_eq!(err.to_string(), "Order not found: abc");
    }
}

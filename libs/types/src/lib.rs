//! Types library for the observable orders demo
//!
//! Shared definitions used by the order API, the worker and the load
//! simulator so that every service agrees on the wire format.
//!
//! # Modules
//! - `health`: `GET /health` body
//! - `ids`: Unique identifiers (OrderId, RunId)
//! - `order`: Order receipts and statuses returned by the order API
//! - `worker`: Request/response bodies of the worker's `/process` endpoint
//! - `errors`: Error taxonomy

// Public modules
pub mod health;
pub mod ids;
pub mod order;
pub mod worker;
pub mod errors;


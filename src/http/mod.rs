//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, timeout, routing)
//!     → security (admission) → translator (send) / health / metrics
//!     → request.rs (bounded body read)
//!     → response.rs (status mapping, plain-text errors)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer, ServerError, X_REQUEST_ID};

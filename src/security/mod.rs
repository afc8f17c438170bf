//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming send request:
//!     → rate_limit.rs (wait for a token, or refuse with 429)
//!     → Pass to the translator
//! ```
//!
//! # Design Decisions
//! - One bucket for the whole process, not per client
//! - Waiting is preferred over rejecting; refusal only when the wait cannot finish in time
//! - No inbound authentication; outbound credentials live with the backend client

pub mod rate_limit;

pub use rate_limit::{admission_middleware, AdmissionController, AdmissionError};

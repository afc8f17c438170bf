//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling produces:
//!     → logging.rs (structured log events, request id attached)
//!     → metrics.rs (sampled request counter + latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → GET /metrics (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through all subsystems
//! - Metrics are sampled to keep the hot path cheap

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::{MetricsRecorder, RequestLabels};

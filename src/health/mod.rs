//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health
//!     → probe.rs (parse backend URL, TCP connect with timeout)
//!     → 200 healthy | 503 unreachable | 500 bad backend URL
//! ```
//!
//! # Design Decisions
//! - Checks run on demand; there is no background monitor
//! - Only network reachability is tested, never the backend's HTTP behaviour
//! - A malformed backend URL is reported as a server fault, not as "unhealthy"

pub mod probe;

pub use probe::{HealthProbe, ProbeError, DEFAULT_PROBE_TIMEOUT};

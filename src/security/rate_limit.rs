//! Token-bucket admission control for the send route.
//!
//! Callers wait for a token instead of being rejected outright. A request is
//! only refused (429) when its wait would outlast the request deadline, or
//! when the bucket can never produce a token for it.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tokio::time::Instant;

use crate::config::RateLimitConfig;

/// Reasons a request is refused admission.
#[derive(Debug, Error, PartialEq)]
pub enum AdmissionError {
    /// Burst size is zero; no request can ever be admitted.
    #[error("rate limiter burst is zero")]
    ZeroBurst,

    /// The rate is zero and the initial burst has been spent.
    #[error("rate limiter exhausted")]
    Exhausted,

    /// The wait for a token would outlast the request deadline.
    #[error("wait of {wait:?} would exceed deadline of {max_wait:?}")]
    WouldExceedDeadline { wait: Duration, max_wait: Duration },
}

/// A simple token bucket.
#[derive(Debug)]
struct TokenBucket {
    /// May go negative: outstanding reservations are debt against future refill.
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_update: now,
        }
    }

    /// Tokens available at `now` after refilling, without committing.
    fn refilled(&self, now: Instant, capacity: f64, refill_rate: f64) -> f64 {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();
        (self.tokens + elapsed * refill_rate).min(capacity)
    }
}

/// Shared rate limiter gating every send request.
#[derive(Debug)]
pub struct AdmissionController {
    bucket: Mutex<TokenBucket>,
    rate: f64,
    burst: f64,
    max_wait: Duration,
}

impl AdmissionController {
    /// Create a limiter with a full bucket.
    pub fn new(rate: f64, burst: u32, max_wait: Duration) -> Self {
        Self {
            bucket: Mutex::new(TokenBucket::new(burst as f64, Instant::now())),
            rate: rate.max(0.0),
            burst: burst as f64,
            max_wait,
        }
    }

    pub fn from_config(config: &RateLimitConfig, max_wait: Duration) -> Self {
        Self::new(config.requests_per_second, config.burst_size, max_wait)
    }

    /// Wait until a token is available.
    ///
    /// Dropping the returned future before it completes returns the reserved
    /// token to the bucket.
    pub async fn acquire(&self) -> Result<(), AdmissionError> {
        let now = Instant::now();
        let reservation = self.reserve(now)?;
        if reservation.ready_at > now {
            tokio::time::sleep_until(reservation.ready_at).await;
        }
        reservation.commit();
        Ok(())
    }

    fn reserve(&self, now: Instant) -> Result<Reservation<'_>, AdmissionError> {
        if self.burst < 1.0 {
            return Err(AdmissionError::ZeroBurst);
        }

        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        let remaining = bucket.refilled(now, self.burst, self.rate) - 1.0;

        let wait = if remaining >= 0.0 {
            Duration::ZERO
        } else if self.rate == 0.0 {
            return Err(AdmissionError::Exhausted);
        } else {
            Duration::from_secs_f64(-remaining / self.rate)
        };

        if wait > self.max_wait {
            return Err(AdmissionError::WouldExceedDeadline {
                wait,
                max_wait: self.max_wait,
            });
        }

        bucket.tokens = remaining;
        bucket.last_update = now;

        Ok(Reservation {
            limiter: self,
            ready_at: now + wait,
            committed: false,
        })
    }

    fn release(&self) {
        let now = Instant::now();
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        bucket.tokens = (bucket.refilled(now, self.burst, self.rate) + 1.0).min(self.burst);
        bucket.last_update = now;
    }
}

/// A token taken from the bucket, returned on drop unless committed.
struct Reservation<'a> {
    limiter: &'a AdmissionController,
    ready_at: Instant,
    committed: bool,
}

impl Reservation<'_> {
    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.limiter.release();
            tracing::debug!("Admission wait abandoned, token returned");
        }
    }
}

/// Middleware gating requests on the admission controller.
///
/// If the client goes away while waiting, hyper drops this future and no
/// response is written.
pub async fn admission_middleware(
    State(limiter): State<Arc<AdmissionController>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match limiter.acquire().await {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::error!(path = %request.uri().path(), error = %e, "Rate limit exceeded");
            e.into_response()
        }
    }
}

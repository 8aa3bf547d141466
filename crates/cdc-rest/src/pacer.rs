//! Adaptive request pacing
//!
//! The pacer keeps outbound requests at least `1 / rate` seconds apart. The
//! effective rate for a request is resolved in this order:
//!
//! 1. cooldown rate, if a rate-limit rejection happened since the last paced
//!    request (the cooldown is consumed by that request)
//! 2. the rate requested by the caller, if non-zero
//! 3. the normal rate
//!
//! Time is measured with `tokio::time::Instant`, so tests can drive the pacer
//! with a paused clock.

use async_trait::async_trait;
use cdc_types::rate_limit::{min_interval, RateBudget};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{RestError, RestResult};
use crate::hooks::{PacerHooks, WaitInfo};
use crate::transport::HttpMethod;

/// Pacing decision for one request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pace {
    /// Effective rate in requests per second
    pub rate: f64,
    /// Time to wait before sending
    pub delay: Duration,
    /// Whether the cooldown rate was used
    pub cooldown: bool,
}

/// Strategy deciding how long each request waits
///
/// The dispatcher calls `before_request` before every attempt,
/// `after_request` once the attempt is over (whatever its outcome) and
/// `on_rate_limit_rejection` when the server answered 429.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait until the request may be sent
    async fn before_request(
        &self,
        method: HttpMethod,
        path: &str,
        requested_rate: f64,
    ) -> RestResult<()>;

    /// Record the end of an attempt
    fn after_request(&self);

    /// React to a rate-limit rejection
    fn on_rate_limit_rejection(&self, method: HttpMethod, path: &str);
}

#[derive(Debug, Default)]
struct PacerState {
    cooldown: bool,
    last_request: Option<Instant>,
}

/// Default pacer: fixed spacing with a one-shot cooldown after a 429
#[derive(Debug)]
pub struct AdaptivePacer {
    budget: RateBudget,
    state: Mutex<PacerState>,
    hooks: PacerHooks,
}

impl Default for AdaptivePacer {
    fn default() -> Self {
        Self::new(RateBudget::defaults())
    }
}

impl AdaptivePacer {
    /// Create a pacer with the given budget
    pub fn new(budget: RateBudget) -> Self {
        Self::with_hooks(budget, PacerHooks::default())
    }

    /// Create a pacer with a budget and observability hooks
    pub fn with_hooks(budget: RateBudget, hooks: PacerHooks) -> Self {
        Self {
            budget,
            state: Mutex::new(PacerState::default()),
            hooks,
        }
    }

    /// Rate budget in use
    pub fn budget(&self) -> RateBudget {
        self.budget
    }

    /// Returns true if the next request will use the cooldown rate
    pub fn is_cooling_down(&self) -> bool {
        self.state.lock().cooldown
    }

    /// Latest reserved send time or attempt end, whichever is later
    pub fn last_request(&self) -> Option<Instant> {
        self.state.lock().last_request
    }

    /// Resolve the effective rate and the wait for the next request
    ///
    /// Consumes a pending cooldown and reserves the send slot, so concurrent
    /// callers sharing this pacer are spaced behind one another.
    pub fn plan(&self, requested_rate: f64) -> Pace {
        self.reserve(requested_rate).0
    }

    fn reserve(&self, requested_rate: f64) -> (Pace, Reservation) {
        let mut state = self.state.lock();

        let cooldown = std::mem::take(&mut state.cooldown);
        let rate = if cooldown {
            self.budget.cooldown_rps
        } else if requested_rate > 0.0 {
            requested_rate
        } else {
            self.budget.normal_rps
        };

        let now = Instant::now();
        let delay = match state.last_request {
            Some(last) => (last + min_interval(rate)).saturating_duration_since(now),
            None => Duration::ZERO,
        };

        let reservation = Reservation {
            slot: now + delay,
            previous: state.last_request,
            cooldown,
        };
        state.last_request = Some(reservation.slot);

        (
            Pace {
                rate,
                delay,
                cooldown,
            },
            reservation,
        )
    }

    /// Give back a slot that will not be used
    fn release(&self, reservation: Reservation) {
        let mut state = self.state.lock();
        if state.last_request == Some(reservation.slot) {
            state.last_request = reservation.previous;
        }
        state.cooldown |= reservation.cooldown;
    }
}

#[derive(Debug, Clone, Copy)]
struct Reservation {
    slot: Instant,
    previous: Option<Instant>,
    cooldown: bool,
}

#[async_trait]
impl Pacer for AdaptivePacer {
    async fn before_request(
        &self,
        method: HttpMethod,
        path: &str,
        requested_rate: f64,
    ) -> RestResult<()> {
        let (pace, reservation) = self.reserve(requested_rate);
        if pace.delay.is_zero() {
            return Ok(());
        }

        let info = WaitInfo {
            method,
            path: path.to_string(),
            rate: pace.rate,
            delay: pace.delay,
            cooldown: pace.cooldown,
        };
        if let Err(reason) = self.hooks.invoke_wait(&info) {
            self.release(reservation);
            warn!(%method, path, %reason, "request vetoed by pacer hook");
            return Err(RestError::Vetoed {
                method,
                path: path.to_string(),
                reason,
            });
        }

        if pace.cooldown {
            info!(%method, path, delay = ?pace.delay, "cooling down after rate limit");
        } else {
            debug!(%method, path, rate = pace.rate, delay = ?pace.delay, "pacing request");
        }

        tokio::time::sleep(pace.delay).await;
        Ok(())
    }

    fn after_request(&self) {
        let now = Instant::now();
        let mut state = self.state.lock();
        if state.last_request.map_or(true, |last| last < now) {
            state.last_request = Some(now);
        }
    }

    fn on_rate_limit_rejection(&self, method: HttpMethod, path: &str) {
        self.state.lock().cooldown = true;
        warn!(%method, path, "rate limit rejection, next request uses cooldown rate");
        self.hooks.invoke_cooldown(method, path);
    }
}

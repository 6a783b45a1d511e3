// breaker.rs — Circuit breaker for remote availability.
//
// The engine's degrade/retry behavior is an explicit state machine
// instead of a flag and a timer:
//
//   Closed ──failure──► Open ──cooldown elapsed──► HalfOpen
//     ▲                                               │
//     └────────────── success ──────────────────────┘
//     (a HalfOpen failure reopens the circuit and restarts the cooldown)
//
// Unreachability is detected by call failure, not by an explicit health
// check; while Open, remote calls are skipped entirely and the session
// runs from the local cache.

use chrono::{DateTime, Duration, Utc};

/// What callers observe: can the engine reach the remote store right now?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityMode {
    /// Remote calls are being attempted.
    Remote,
    /// Remote calls are skipped until the retry cooldown elapses.
    LocalOnly,
}

impl std::fmt::Display for AvailabilityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AvailabilityMode::Remote => write!(f, "remote"),
            AvailabilityMode::LocalOnly => write!(f, "local-only"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakerState {
    Closed,
    Open { since: DateTime<Utc> },
    HalfOpen,
}

/// Failure-driven circuit breaker with a fixed retry cooldown.
pub struct CircuitBreaker {
    state: BreakerState,
    cooldown: Duration,
}

impl CircuitBreaker {
    pub fn new(cooldown: std::time::Duration) -> Self {
        Self {
            state: BreakerState::Closed,
            cooldown: Duration::from_std(cooldown).unwrap_or_else(|_| Duration::seconds(60)),
        }
    }

    /// Whether a remote call should be attempted now. An Open circuit
    /// whose cooldown has elapsed transitions to HalfOpen and allows one
    /// probe through.
    pub fn allows_request(&mut self, now: DateTime<Utc>) -> bool {
        match self.state {
            BreakerState::Closed | BreakerState::HalfOpen => true,
            BreakerState::Open { since } => {
                if now - since >= self.cooldown {
                    tracing::debug!("retry cooldown elapsed, probing remote");
                    self.state = BreakerState::HalfOpen;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// A remote call succeeded: close the circuit.
    pub fn record_success(&mut self) {
        if self.state != BreakerState::Closed {
            tracing::info!("remote store recovered, leaving local-only mode");
        }
        self.state = BreakerState::Closed;
    }

    /// A remote call failed: open the circuit and restart the cooldown.
    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        if matches!(self.state, BreakerState::Closed) {
            tracing::warn!("remote store unavailable, entering local-only mode");
        }
        self.state = BreakerState::Open { since: now };
    }

    /// The externally visible availability mode.
    pub fn mode(&self) -> AvailabilityMode {
        match self.state {
            BreakerState::Closed | BreakerState::HalfOpen => AvailabilityMode::Remote,
            BreakerState::Open { .. } => AvailabilityMode::LocalOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn breaker() -> CircuitBreaker {
        CircuitBreaker::new(std::time::Duration::from_secs(60))
    }

    #[test]
    fn starts_closed_and_allows_requests() {
        let mut b = breaker();
        assert_eq!(b.mode(), AvailabilityMode::Remote);
        assert!(b.allows_request(at(0)));
    }

    #[test]
    fn failure_opens_and_blocks_until_cooldown() {
        let mut b = breaker();
        b.record_failure(at(0));
        assert_eq!(b.mode(), AvailabilityMode::LocalOnly);
        assert!(!b.allows_request(at(30)));
        // Cooldown elapsed: one probe allowed, state is HalfOpen.
        assert!(b.allows_request(at(60)));
        assert_eq!(b.mode(), AvailabilityMode::Remote);
    }

    #[test]
    fn half_open_success_closes() {
        let mut b = breaker();
        b.record_failure(at(0));
        assert!(b.allows_request(at(61)));
        b.record_success();
        assert_eq!(b.mode(), AvailabilityMode::Remote);
        assert!(b.allows_request(at(62)));
    }

    #[test]
    fn half_open_failure_reopens_with_fresh_cooldown() {
        let mut b = breaker();
        b.record_failure(at(0));
        assert!(b.allows_request(at(60)));
        b.record_failure(at(60));
        // A fresh cooldown runs from the second failure.
        assert!(!b.allows_request(at(90)));
        assert!(b.allows_request(at(120)));
    }
}

//! Reservation window evaluation
//!
//! A reservation is active over the half-open interval `[start, end)`.

use chrono::{DateTime, Utc};

/// Whether a reservation is active at `now`.
///
/// Active from its start instant up to, but not including, its end
/// instant. `now` is the event's own reference timestamp so the
/// decision is deterministic and replayable for the same payload.
pub fn is_active(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    start <= now && now < end
}

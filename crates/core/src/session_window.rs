//! Session window gate for scheduled shoots (PRD-09).
//!
//! Decides whether the "start session" action is currently permitted: the
//! gate opens 30 minutes before the scheduled time-of-day and closes 4
//! hours after it, inclusive on both ends. The caller supplies "now" (no
//! hidden clock) and re-polls on a fixed cadence while the gated view is
//! visible.
//!
//! The scheduled time-of-day is combined with the reference instant's
//! calendar date, so a booking on another day still gates against today.
//! Known carried-over quirk, kept for parity with the existing clients.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minutes before the scheduled time at which the gate opens.
pub const OPEN_BEFORE_MINUTES: i64 = 30;

/// Minutes after the scheduled time at which the gate closes (4 hours).
pub const OPEN_AFTER_MINUTES: i64 = 240;

/// Reference polling cadence for callers: re-evaluate the gate every 60
/// seconds (and once on mount) while the gated element is visible.
pub const POLL_INTERVAL_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// Time of day
// ---------------------------------------------------------------------------

/// A validated wall-clock time of day (hour 0-23, minute 0-59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self, CoreError> {
        if hour > 23 || minute > 59 {
            return Err(CoreError::InvalidTimeFormat(format!(
                "time of day out of range: {hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Parse an `"HH:mm"` string.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let bad = || CoreError::InvalidTimeFormat(format!("expected HH:mm, got '{raw}'"));

        let (hour, minute) = raw.split_once(':').ok_or_else(bad)?;
        if hour.is_empty() || minute.is_empty() || minute.contains(':') {
            return Err(bad());
        }
        let hour: u32 = hour.parse().map_err(|_| bad())?;
        let minute: u32 = minute.parse().map_err(|_| bad())?;
        Self::new(hour, minute)
    }

    pub fn hour(self) -> u32 {
        self.hour
    }

    pub fn minute(self) -> u32 {
        self.minute
    }

    /// Minutes since midnight.
    fn minutes_from_midnight(self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// The `[open_from, open_until]` window for a schedule, anchored to the
/// reference instant's calendar date.
pub fn session_window(scheduled: TimeOfDay, reference: Timestamp) -> (Timestamp, Timestamp) {
    let midnight = reference.date_naive().and_time(chrono::NaiveTime::MIN).and_utc();
    let scheduled_at = midnight + Duration::minutes(scheduled.minutes_from_midnight());
    (
        scheduled_at - Duration::minutes(OPEN_BEFORE_MINUTES),
        scheduled_at + Duration::minutes(OPEN_AFTER_MINUTES),
    )
}

/// Whether the gated action is permitted at `reference`. Inclusive at both
/// window ends. Pure function of its inputs.
pub fn is_open(scheduled: TimeOfDay, reference: Timestamp) -> bool {
    let (open_from, open_until) = session_window(scheduled, reference);
    open_from <= reference && reference <= open_until
}

/// Parse-and-gate convenience for callers holding the raw `"HH:mm"` string.
///
/// On malformed input the caller should render the gate closed but surface
/// the error for diagnostics; a warning is logged here either way.
pub fn is_open_str(raw: &str, reference: Timestamp) -> Result<bool, CoreError> {
    match TimeOfDay::parse(raw) {
        Ok(scheduled) => Ok(is_open(scheduled, reference)),
        Err(err) => {
            tracing::warn!(raw, %err, "rejected malformed schedule time");
            Err(err)
        }
    }
}

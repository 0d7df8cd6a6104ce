//! Lifecycle status sets and the booking state machine (PRD-02).
//!
//! These match the status values seeded in the `booking_statuses` and
//! `account_statuses` lookup tables. The state machine is kept here in
//! `core` (zero internal deps) so it can be shared by the API/repository
//! layer and any future worker tooling.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Sentinels
// ---------------------------------------------------------------------------

/// Sentinel value for the status filter and badge counts meaning "every
/// status" / "the whole collection".
pub const STATUS_ALL: &str = "all";

// ---------------------------------------------------------------------------
// Booking lifecycle
// ---------------------------------------------------------------------------

/// Deposit requested, not yet paid.
pub const BOOKING_PENDING_DEPOSIT: &str = "pending_deposit";
/// Deposit paid, awaiting photographer confirmation.
pub const BOOKING_PENDING_CONFIRMATION: &str = "pending_confirmation";
/// Confirmed, shoot date in the future.
pub const BOOKING_UPCOMING: &str = "upcoming";
/// Shoot in progress.
pub const BOOKING_ONGOING: &str = "ongoing";
/// Shoot finished, awaiting final payment.
pub const BOOKING_PENDING_PAYMENT: &str = "pending_payment";
/// Paid, photos in post-processing.
pub const BOOKING_PENDING_PROCESSING: &str = "pending_processing";
/// Processing done, delivery pending customer acceptance.
pub const BOOKING_PROCESSED: &str = "processed";
/// Delivered and accepted. Terminal.
pub const BOOKING_COMPLETED: &str = "completed";
/// Cancelled before the shoot started. Terminal.
pub const BOOKING_CANCELLED: &str = "cancelled";

/// All valid booking status values, in lifecycle order.
pub const VALID_BOOKING_STATUSES: &[&str] = &[
    BOOKING_PENDING_DEPOSIT,
    BOOKING_PENDING_CONFIRMATION,
    BOOKING_UPCOMING,
    BOOKING_ONGOING,
    BOOKING_PENDING_PAYMENT,
    BOOKING_PENDING_PROCESSING,
    BOOKING_PROCESSED,
    BOOKING_COMPLETED,
    BOOKING_CANCELLED,
];

/// Booking lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    PendingDeposit,
    PendingConfirmation,
    Upcoming,
    Ongoing,
    PendingPayment,
    PendingProcessing,
    Processed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// The snake_case wire form, matching the lookup-table seed data.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingDeposit => BOOKING_PENDING_DEPOSIT,
            Self::PendingConfirmation => BOOKING_PENDING_CONFIRMATION,
            Self::Upcoming => BOOKING_UPCOMING,
            Self::Ongoing => BOOKING_ONGOING,
            Self::PendingPayment => BOOKING_PENDING_PAYMENT,
            Self::PendingProcessing => BOOKING_PENDING_PROCESSING,
            Self::Processed => BOOKING_PROCESSED,
            Self::Completed => BOOKING_COMPLETED,
            Self::Cancelled => BOOKING_CANCELLED,
        }
    }

    /// Parse a wire-form status string.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            BOOKING_PENDING_DEPOSIT => Ok(Self::PendingDeposit),
            BOOKING_PENDING_CONFIRMATION => Ok(Self::PendingConfirmation),
            BOOKING_UPCOMING => Ok(Self::Upcoming),
            BOOKING_ONGOING => Ok(Self::Ongoing),
            BOOKING_PENDING_PAYMENT => Ok(Self::PendingPayment),
            BOOKING_PENDING_PROCESSING => Ok(Self::PendingProcessing),
            BOOKING_PROCESSED => Ok(Self::Processed),
            BOOKING_COMPLETED => Ok(Self::Completed),
            BOOKING_CANCELLED => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Invalid booking status '{other}'. Must be one of: {}",
                VALID_BOOKING_STATUSES.join(", ")
            ))),
        }
    }
}

/// Validate that a booking status string is one of the accepted values.
pub fn validate_booking_status(status: &str) -> Result<(), CoreError> {
    BookingStatus::parse(status).map(|_| ())
}

// ---------------------------------------------------------------------------
// Account lifecycle (customers and photographers)
// ---------------------------------------------------------------------------

pub const ACCOUNT_ACTIVE: &str = "active";
pub const ACCOUNT_INACTIVE: &str = "inactive";
pub const ACCOUNT_SUSPENDED: &str = "suspended";

/// All valid account status values.
pub const VALID_ACCOUNT_STATUSES: &[&str] =
    &[ACCOUNT_ACTIVE, ACCOUNT_INACTIVE, ACCOUNT_SUSPENDED];

/// Validate that an account status string is one of the accepted values.
pub fn validate_account_status(status: &str) -> Result<(), CoreError> {
    if VALID_ACCOUNT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid account status '{status}'. Must be one of: {}",
            VALID_ACCOUNT_STATUSES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

pub mod state_machine {
    use super::BookingStatus;
    use super::BookingStatus::*;

    /// Returns the set of valid target statuses reachable from `from`.
    ///
    /// Terminal states (`Completed`, `Cancelled`) return an empty slice
    /// because no further transitions are allowed. Cancellation is only
    /// reachable before the shoot starts; once `Ongoing`, the booking must
    /// run forward through payment and processing.
    pub fn valid_transitions(from: BookingStatus) -> &'static [BookingStatus] {
        match from {
            PendingDeposit => &[PendingConfirmation, Cancelled],
            PendingConfirmation => &[Upcoming, Cancelled],
            Upcoming => &[Ongoing, Cancelled],
            Ongoing => &[PendingPayment],
            PendingPayment => &[PendingProcessing],
            PendingProcessing => &[Processed],
            Processed => &[Completed],
            Completed | Cancelled => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: BookingStatus, to: BookingStatus) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a state transition, returning an error message for invalid ones.
    pub fn validate_transition(from: BookingStatus, to: BookingStatus) -> Result<(), String> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(format!(
                "Invalid transition: {} -> {}",
                from.as_str(),
                to.as_str()
            ))
        }
    }
}

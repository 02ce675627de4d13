use chrono::NaiveDate;
use thiserror::Error;

use crate::models::occupancy::OccupiedDateIndex;
use crate::models::selection::SelectionState;

/// A rejected click. Display text is shown to the guest as is.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Cannot select past dates")]
    PastDate,

    #[error("This date is already booked. Please select different dates.")]
    OccupiedDate,

    #[error("Please select a check-in date first")]
    MissingCheckIn,

    #[error("Check-out date must be after check-in date")]
    InvalidOrder,

    #[error("Your selected dates overlap with an existing booking. Please adjust your dates.")]
    RangeConflict,

    #[error("Availability could not be loaded. Please try again later.")]
    AvailabilityUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    AwaitingCheckIn,
    AwaitingCheckOut,
}

impl SelectionPhase {
    pub fn of(state: &SelectionState) -> Self {
        if state.awaiting_check_in() {
            SelectionPhase::AwaitingCheckIn
        } else {
            SelectionPhase::AwaitingCheckOut
        }
    }
}

/// Applies one click to `state`. On rejection the caller keeps the state it
/// already had.
pub fn select_date(
    state: &SelectionState,
    date: NaiveDate,
    today: NaiveDate,
    occupied: &OccupiedDateIndex,
) -> Result<SelectionState, ValidationError> {
    match SelectionPhase::of(state) {
        SelectionPhase::AwaitingCheckIn => {
            if date < today {
                return Err(ValidationError::PastDate);
            }
            if occupied.contains(date) {
                return Err(ValidationError::OccupiedDate);
            }
            Ok(SelectionState::checking_in(date))
        }
        SelectionPhase::AwaitingCheckOut => {
            let Some(check_in) = state.check_in() else {
                return Err(ValidationError::MissingCheckIn);
            };
            if date <= check_in {
                return Err(ValidationError::InvalidOrder);
            }
            if occupied.any_between(check_in, date) {
                return Err(ValidationError::RangeConflict);
            }
            SelectionState::stay(check_in, date).ok_or(ValidationError::InvalidOrder)
        }
    }
}

pub fn reset() -> SelectionState {
    SelectionState::empty()
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Check-in/check-out pair owned by the caller. Only the calendar's
/// selection machine moves it between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    awaiting_check_in: bool,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::empty()
    }
}

impl SelectionState {
    pub fn empty() -> Self {
        Self {
            check_in: None,
            check_out: None,
            awaiting_check_in: true,
        }
    }

    pub fn checking_in(check_in: NaiveDate) -> Self {
        Self {
            check_in: Some(check_in),
            check_out: None,
            awaiting_check_in: false,
        }
    }

    pub fn stay(check_in: NaiveDate, check_out: NaiveDate) -> Option<Self> {
        if check_in >= check_out {
            return None;
        }
        Some(Self {
            check_in: Some(check_in),
            check_out: Some(check_out),
            awaiting_check_in: true,
        })
    }

    /// Rebuilds a selection from stored parts. A check-out needs an earlier
    /// check-in, and a finished stay waits for the next check-in.
    pub fn from_parts(
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
        awaiting_check_in: bool,
    ) -> Option<Self> {
        match (check_in, check_out) {
            (None, Some(_)) => None,
            (Some(check_in), Some(check_out)) if check_in >= check_out || !awaiting_check_in => {
                None
            }
            _ => Some(Self {
                check_in,
                check_out,
                awaiting_check_in,
            }),
        }
    }

    pub fn check_in(&self) -> Option<NaiveDate> {
        self.check_in
    }

    pub fn check_out(&self) -> Option<NaiveDate> {
        self.check_out
    }

    pub fn awaiting_check_in(&self) -> bool {
        self.awaiting_check_in
    }

    pub fn is_empty(&self) -> bool {
        self.check_in.is_none() && self.check_out.is_none()
    }

    pub fn nights(&self) -> Option<i64> {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => Some((check_out - check_in).num_days()),
            _ => None,
        }
    }
}

/// Stored shape of a selection. Converting back checks the ordering rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRecord {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub awaiting_check_in: bool,
}

impl From<SelectionState> for SelectionRecord {
    fn from(state: SelectionState) -> Self {
        Self {
            check_in: state.check_in,
            check_out: state.check_out,
            awaiting_check_in: state.awaiting_check_in,
        }
    }
}

impl SelectionRecord {
    pub fn to_state(&self) -> Option<SelectionState> {
        SelectionState::from_parts(self.check_in, self.check_out, self.awaiting_check_in)
    }
}

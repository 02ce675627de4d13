use chrono::{Datelike, NaiveDate};

use super::month_view::{DayCell, MonthView};
use crate::models::occupancy::OccupiedDateIndex;
use crate::models::selection::SelectionState;

/// How a day cell is drawn. Evaluated once per cell, first match wins:
/// check-in/check-out tag, occupied, selected, today, plain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStatus {
    CheckIn,
    CheckOut,
    Occupied,
    Selected,
    Today,
    Plain,
}

impl CellStatus {
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            CellStatus::CheckIn => Some("Check-in"),
            CellStatus::CheckOut => Some("Check-out"),
            CellStatus::Occupied => Some("Booked"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub status: CellStatus,
    pub past: bool,
    pub disabled: bool,
}

impl CellView {
    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

pub fn is_selected(state: &SelectionState, date: NaiveDate) -> bool {
    match (state.check_in(), state.check_out()) {
        (None, None) => false,
        (Some(check_in), None) => date == check_in,
        (Some(check_in), Some(check_out)) => check_in <= date && date <= check_out,
        (None, Some(_)) => false,
    }
}

pub fn is_past(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

pub fn is_disabled(date: NaiveDate, today: NaiveDate, occupied: &OccupiedDateIndex) -> bool {
    is_past(date, today) || occupied.contains(date)
}

pub fn cell_status(
    date: NaiveDate,
    today: NaiveDate,
    state: &SelectionState,
    occupied: &OccupiedDateIndex,
) -> CellStatus {
    if state.check_in() == Some(date) {
        CellStatus::CheckIn
    } else if state.check_out() == Some(date) {
        CellStatus::CheckOut
    } else if occupied.contains(date) {
        CellStatus::Occupied
    } else if is_selected(state, date) {
        CellStatus::Selected
    } else if date == today {
        CellStatus::Today
    } else {
        CellStatus::Plain
    }
}

pub fn cell_view(
    cell: &DayCell,
    today: NaiveDate,
    state: &SelectionState,
    occupied: &OccupiedDateIndex,
) -> CellView {
    CellView {
        date: cell.date,
        in_current_month: cell.in_current_month,
        status: cell_status(cell.date, today, state, occupied),
        past: is_past(cell.date, today),
        disabled: is_disabled(cell.date, today, occupied),
    }
}

const WEEKDAY_HEADER: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

fn marker(cell: &CellView) -> &'static str {
    match cell.status {
        CellStatus::CheckIn => "[in]",
        CellStatus::CheckOut => "[out]",
        CellStatus::Occupied => "xx",
        CellStatus::Selected => "*",
        CellStatus::Today => "!",
        CellStatus::Plain if cell.past => "-",
        CellStatus::Plain => "",
    }
}

/// Plain-text month grid for terminals. Days from neighbouring months are
/// left blank.
pub fn render_month(view: &MonthView, cells: &[CellView]) -> String {
    let mut out = format!("{:^56}\n", view.year_month.title());
    for name in WEEKDAY_HEADER {
        out.push_str(&format!("{:<8}", name));
    }
    out.push('\n');
    for week in cells.chunks(7) {
        for cell in week {
            let text = if cell.in_current_month {
                format!("{:>2}{}", cell.day(), marker(cell))
            } else {
                String::new()
            };
            out.push_str(&format!("{:<8}", text));
        }
        out.push('\n');
    }
    out.push_str("[in] check-in  [out] check-out  xx booked  * selected  ! today  - past\n");
    out
}

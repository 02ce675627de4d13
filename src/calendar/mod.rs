//! Availability calendar for a single room: occupancy loading, month
//! navigation and the check-in/check-out selection protocol.

pub mod month_view;
pub mod render;
pub mod selection;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clients::range_provider::RangeProvider;
use crate::error::ProviderError;
use crate::models::occupancy::{OccupiedDateIndex, OccupiedInterval};
use crate::models::selection::SelectionState;
use month_view::{Direction, MonthView, YearMonth};
use render::CellView;
use selection::ValidationError;

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Today's date in the hotel's timezone.
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Receives the outcome of every click and reset.
pub trait CalendarListener: Send + Sync {
    fn on_date_select(&self, check_in: Option<NaiveDate>, check_out: Option<NaiveDate>);
    fn on_validation_error(&self, message: &str);
}

/// What to do with the grid when the occupancy fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchFailurePolicy {
    /// Treat the room as having no bookings. Can let a guest pick dates
    /// that are really taken while the backend is down.
    #[default]
    FailOpen,
    /// Block every selection until a fetch succeeds.
    FailClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub room_id: String,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    #[error("{0}")]
    Rejected(ValidationError),

    #[error("Calendar is not accepting clicks")]
    NotInteractive,
}

pub struct AvailabilityCalendar {
    room_id: String,
    displayed: YearMonth,
    intervals: Vec<OccupiedInterval>,
    occupied: OccupiedDateIndex,
    load_state: LoadState,
    generation: u64,
    selection: SelectionState,
    failure_policy: FetchFailurePolicy,
    clock: Arc<dyn Clock>,
    listener: Arc<dyn CalendarListener>,
}

impl AvailabilityCalendar {
    pub fn new(
        room_id: impl Into<String>,
        clock: Arc<dyn Clock>,
        listener: Arc<dyn CalendarListener>,
    ) -> Self {
        let displayed = YearMonth::from_date(clock.today());
        Self {
            room_id: room_id.into(),
            displayed,
            intervals: Vec::new(),
            occupied: OccupiedDateIndex::default(),
            load_state: LoadState::Idle,
            generation: 0,
            selection: SelectionState::empty(),
            failure_policy: FetchFailurePolicy::default(),
            clock,
            listener,
        }
    }

    pub fn with_failure_policy(mut self, policy: FetchFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Seeds the caller's stored selection.
    pub fn with_selection(mut self, selection: SelectionState) -> Self {
        self.selection = selection;
        self
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn intervals(&self) -> &[OccupiedInterval] {
        &self.intervals
    }

    pub fn occupied(&self) -> &OccupiedDateIndex {
        &self.occupied
    }

    pub fn displayed(&self) -> YearMonth {
        self.displayed
    }

    pub fn navigate(&mut self, direction: Direction) -> YearMonth {
        self.displayed = self.displayed.navigate(direction);
        self.displayed
    }

    pub fn show_month(&mut self, year_month: YearMonth) {
        self.displayed = year_month;
    }

    /// Switches rooms. Occupancy for the old room is dropped and any fetch
    /// still in flight for it will be ignored.
    pub fn set_room(&mut self, room_id: impl Into<String>) {
        let room_id = room_id.into();
        if room_id == self.room_id {
            return;
        }
        self.room_id = room_id;
        self.intervals.clear();
        self.occupied = OccupiedDateIndex::default();
        self.generation += 1;
        self.load_state = LoadState::Idle;
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.load_state = LoadState::Loading;
        LoadTicket {
            generation: self.generation,
            room_id: self.room_id.clone(),
        }
    }

    /// Applies a fetch result. Returns false when a newer load has been
    /// started since `ticket` was issued.
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<OccupiedInterval>, ProviderError>,
    ) -> bool {
        if ticket.generation != self.generation || ticket.room_id != self.room_id {
            debug!(
                room_id = %ticket.room_id,
                generation = ticket.generation,
                latest = self.generation,
                "Dropping stale occupancy response"
            );
            return false;
        }
        match result {
            Ok(intervals) => {
                self.occupied = OccupiedDateIndex::from_intervals(&intervals);
                info!(
                    room_id = %self.room_id,
                    intervals = intervals.len(),
                    occupied_dates = self.occupied.len(),
                    "Loaded room occupancy"
                );
                self.intervals = intervals;
                self.load_state = LoadState::Loaded;
            }
            Err(err) => {
                warn!(
                    room_id = %self.room_id,
                    error = %err,
                    policy = ?self.failure_policy,
                    "Failed to load room occupancy"
                );
                self.intervals.clear();
                self.occupied = OccupiedDateIndex::default();
                self.load_state = LoadState::Failed(err.to_string());
            }
        }
        true
    }

    pub async fn load_occupancy<P: RangeProvider + ?Sized>(&mut self, provider: &P) -> bool {
        let ticket = self.begin_load();
        let result = provider.fetch_ranges(&ticket.room_id).await;
        self.apply_load(ticket, result)
    }

    pub fn is_interactive(&self) -> bool {
        match self.load_state {
            LoadState::Loaded => true,
            LoadState::Failed(_) => self.failure_policy == FetchFailurePolicy::FailOpen,
            LoadState::Idle | LoadState::Loading => false,
        }
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<SelectionState, SelectError> {
        match (&self.load_state, self.failure_policy) {
            (LoadState::Idle | LoadState::Loading, _) => {
                debug!(%date, "Ignoring click while occupancy is loading");
                return Err(SelectError::NotInteractive);
            }
            (LoadState::Failed(_), FetchFailurePolicy::FailClosed) => {
                return Err(self.reject(date, ValidationError::AvailabilityUnavailable));
            }
            _ => {}
        }

        match selection::select_date(&self.selection, date, self.today(), &self.occupied) {
            Ok(next) => {
                self.selection = next;
                self.listener.on_date_select(next.check_in(), next.check_out());
                Ok(next)
            }
            Err(err) => Err(self.reject(date, err)),
        }
    }

    fn reject(&self, date: NaiveDate, err: ValidationError) -> SelectError {
        debug!(%date, error = ?err, "Rejected date selection");
        self.listener.on_validation_error(&err.to_string());
        SelectError::Rejected(err)
    }

    pub fn reset(&mut self) -> SelectionState {
        self.selection = selection::reset();
        self.listener.on_date_select(None, None);
        self.selection
    }

    pub fn month_view(&self) -> MonthView {
        MonthView::generate(self.displayed)
    }

    /// Cells for the displayed month. Nothing is clickable while the grid
    /// is not interactive.
    pub fn cells(&self) -> Vec<CellView> {
        let today = self.today();
        let interactive = self.is_interactive();
        self.month_view()
            .cells
            .iter()
            .map(|cell| {
                let mut view = render::cell_view(cell, today, &self.selection, &self.occupied);
                view.disabled |= !interactive;
                view
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let view = self.month_view();
        let mut out = render::render_month(&view, &self.cells());
        match &self.load_state {
            LoadState::Idle | LoadState::Loading => out.push_str("Loading availability...\n"),
            LoadState::Failed(_) if self.failure_policy == FetchFailurePolicy::FailClosed => {
                out.push_str(&format!("{}\n", ValidationError::AvailabilityUnavailable))
            }
            _ => {}
        }
        out
    }
}

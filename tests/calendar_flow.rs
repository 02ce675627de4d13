use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use roomCalendar::calendar::selection::ValidationError;
use roomCalendar::calendar::month_view::{Direction, YearMonth};
use roomCalendar::calendar::{
    AvailabilityCalendar, CalendarListener, FixedClock, LoadState, SelectError,
};
use roomCalendar::clients::range_provider::RangeProvider;
use roomCalendar::error::ProviderError;
use roomCalendar::models::occupancy::OccupiedInterval;
use roomCalendar::models::selection::SelectionState;

struct FakeProvider {
    response: Result<Vec<OccupiedInterval>, String>,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    fn with(intervals: Vec<OccupiedInterval>) -> Self {
        Self {
            response: Ok(intervals),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            response: Err("connection refused".to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl RangeProvider for FakeProvider {
    async fn fetch_ranges(&self, room_id: &str) -> Result<Vec<OccupiedInterval>, ProviderError> {
        self.calls.lock().unwrap().push(room_id.to_string());
        match &self.response {
            Ok(intervals) => Ok(intervals.clone()),
            Err(err) => Err(ProviderError::Other(err.clone())),
        }
    }
}

#[derive(Default)]
struct RecordingListener {
    selects: Mutex<Vec<(Option<NaiveDate>, Option<NaiveDate>)>>,
    errors: Mutex<Vec<String>>,
}

impl CalendarListener for RecordingListener {
    fn on_date_select(&self, check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) {
        self.selects.lock().unwrap().push((check_in, check_out));
    }

    fn on_validation_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
}

async fn loaded_calendar(
    intervals: Vec<OccupiedInterval>,
) -> (AvailabilityCalendar, Arc<RecordingListener>) {
    let listener = Arc::new(RecordingListener::default());
    let mut calendar =
        AvailabilityCalendar::new("101", Arc::new(FixedClock(day(1))), listener.clone());
    calendar.load_occupancy(&FakeProvider::with(intervals)).await;
    (calendar, listener)
}

#[tokio::test]
async fn index_is_exact_union_of_loaded_ranges() {
    let (calendar, _) = loaded_calendar(vec![
        OccupiedInterval::new(day(10), day(12)),
        OccupiedInterval::new(day(15), day(15)),
    ])
    .await;
    assert_eq!(calendar.load_state(), &LoadState::Loaded);
    assert_eq!(
        calendar.occupied().keys(),
        vec!["2024-08-10", "2024-08-11", "2024-08-12", "2024-08-15"]
    );
}

#[tokio::test]
async fn past_date_is_rejected_and_state_kept() {
    let listener = Arc::new(RecordingListener::default());
    let mut calendar =
        AvailabilityCalendar::new("101", Arc::new(FixedClock(day(20))), listener.clone());
    calendar.load_occupancy(&FakeProvider::with(Vec::new())).await;

    let result = calendar.select_date(day(19));
    assert_eq!(result, Err(SelectError::Rejected(ValidationError::PastDate)));
    assert_eq!(calendar.selection(), SelectionState::empty());
    assert!(listener.selects.lock().unwrap().is_empty());
    assert_eq!(
        listener.errors.lock().unwrap().as_slice(),
        ["Cannot select past dates"]
    );
}

#[tokio::test]
async fn occupied_check_in_is_rejected() {
    let (mut calendar, listener) =
        loaded_calendar(vec![OccupiedInterval::new(day(10), day(12))]).await;
    let result = calendar.select_date(day(11));
    assert_eq!(result, Err(SelectError::Rejected(ValidationError::OccupiedDate)));
    assert!(calendar.selection().is_empty());
    assert_eq!(
        listener.errors.lock().unwrap().as_slice(),
        ["This date is already booked. Please select different dates."]
    );
}

#[tokio::test]
async fn check_out_before_check_in_is_rejected() {
    let (mut calendar, listener) = loaded_calendar(Vec::new()).await;
    calendar.select_date(day(10)).unwrap();
    let result = calendar.select_date(day(9));
    assert_eq!(result, Err(SelectError::Rejected(ValidationError::InvalidOrder)));
    assert_eq!(calendar.selection(), SelectionState::checking_in(day(10)));
    assert_eq!(
        listener.errors.lock().unwrap().as_slice(),
        ["Check-out date must be after check-in date"]
    );
}

#[tokio::test]
async fn stay_across_booking_is_rejected_but_short_stay_succeeds() {
    let (mut calendar, listener) =
        loaded_calendar(vec![OccupiedInterval::new(day(12), day(12))]).await;
    calendar.select_date(day(10)).unwrap();

    let result = calendar.select_date(day(14));
    assert_eq!(result, Err(SelectError::Rejected(ValidationError::RangeConflict)));
    assert_eq!(calendar.selection(), SelectionState::checking_in(day(10)));

    let state = calendar.select_date(day(11)).unwrap();
    assert_eq!(state.check_in(), Some(day(10)));
    assert_eq!(state.check_out(), Some(day(11)));
    assert!(state.awaiting_check_in());

    assert_eq!(
        listener.errors.lock().unwrap().as_slice(),
        ["Your selected dates overlap with an existing booking. Please adjust your dates."]
    );
    assert_eq!(
        listener.selects.lock().unwrap().as_slice(),
        [(Some(day(10)), None), (Some(day(10)), Some(day(11)))]
    );
}

#[tokio::test]
async fn reset_always_returns_to_empty() {
    let (mut calendar, listener) = loaded_calendar(Vec::new()).await;
    assert_eq!(calendar.reset(), SelectionState::empty());

    calendar.select_date(day(10)).unwrap();
    assert_eq!(calendar.reset(), SelectionState::empty());

    calendar.select_date(day(10)).unwrap();
    calendar.select_date(day(13)).unwrap();
    let state = calendar.reset();
    assert_eq!(state.check_in(), None);
    assert_eq!(state.check_out(), None);
    assert!(state.awaiting_check_in());

    let selects = listener.selects.lock().unwrap();
    assert_eq!(selects.last(), Some(&(None, None)));
}

#[tokio::test]
async fn reloading_same_room_is_idempotent() {
    let provider = FakeProvider::with(vec![
        OccupiedInterval::new(day(3), day(5)),
        OccupiedInterval::new(day(20), day(22)),
    ]);
    let listener = Arc::new(RecordingListener::default());
    let mut calendar = AvailabilityCalendar::new("101", Arc::new(FixedClock(day(1))), listener);

    calendar.load_occupancy(&provider).await;
    let first = calendar.occupied().clone();
    calendar.load_occupancy(&provider).await;
    assert_eq!(calendar.occupied(), &first);
    assert_eq!(provider.calls.lock().unwrap().as_slice(), ["101", "101"]);
}

#[tokio::test]
async fn failed_fetch_fails_open() {
    let listener = Arc::new(RecordingListener::default());
    let mut calendar =
        AvailabilityCalendar::new("101", Arc::new(FixedClock(day(1))), listener.clone());
    calendar
        .load_occupancy(&FakeProvider::with(vec![OccupiedInterval::new(day(10), day(12))]))
        .await;
    assert!(calendar.occupied().contains(day(11)));

    calendar.load_occupancy(&FakeProvider::failing()).await;
    assert!(matches!(calendar.load_state(), LoadState::Failed(_)));
    assert!(calendar.occupied().is_empty());
    assert!(calendar.is_interactive());
    assert!(calendar.select_date(day(11)).is_ok());
    assert!(listener.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_fetch_degrades_silently() {
    let (mut calendar, listener) =
        loaded_calendar(vec![OccupiedInterval::new(day(10), day(12))]).await;
    calendar.load_occupancy(&FakeProvider::failing()).await;

    let text = calendar.render();
    assert!(!text.contains("Availability could not be loaded"));
    assert!(!text.contains("Loading availability"));
    assert!(text.contains("11 "));
    assert!(!text.contains("11xx"));

    let cells = calendar.cells();
    let future: Vec<_> = cells
        .iter()
        .filter(|cell| cell.in_current_month && cell.date >= day(1))
        .collect();
    assert_eq!(future.len(), 31);
    assert!(future.iter().all(|cell| !cell.disabled));
    assert!(listener.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn navigate_moves_displayed_month_and_grid() {
    let (mut calendar, _) = loaded_calendar(vec![OccupiedInterval::new(day(30), day(31))]).await;
    assert_eq!(calendar.displayed(), YearMonth::new(2024, 8).unwrap());

    assert_eq!(calendar.navigate(Direction::Next), YearMonth::new(2024, 9).unwrap());
    let view = calendar.month_view();
    assert_eq!(view.year_month, YearMonth::new(2024, 9).unwrap());
    // September 2024 starts on a Sunday; the grid ends on October 5.
    assert_eq!(view.cells.len(), 35);
    assert_eq!(view.cells[0].date, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
    assert!(calendar.render().contains("September 2024"));

    calendar.navigate(Direction::Prev);
    calendar.navigate(Direction::Prev);
    assert_eq!(calendar.displayed(), YearMonth::new(2024, 7).unwrap());
    // July 2024 starts on a Monday and spills into August 1 to 3.
    let cells = calendar.cells();
    assert_eq!(cells.len(), 35);
    assert_eq!(cells[0].date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    assert_eq!(cells[34].date, day(3));
    assert!(!cells[34].in_current_month);
}

#[tokio::test]
async fn room_change_refetches_for_new_room() {
    let provider = FakeProvider::with(vec![OccupiedInterval::new(day(10), day(10))]);
    let listener = Arc::new(RecordingListener::default());
    let mut calendar = AvailabilityCalendar::new("101", Arc::new(FixedClock(day(1))), listener);
    calendar.load_occupancy(&provider).await;

    calendar.set_room("202");
    assert!(calendar.occupied().is_empty());
    assert!(!calendar.is_interactive());

    calendar.load_occupancy(&provider).await;
    assert_eq!(provider.calls.lock().unwrap().as_slice(), ["101", "202"]);
    assert!(calendar.occupied().contains(day(10)));
}

#[tokio::test]
async fn selection_survives_session_boundary_through_store() {
    use roomCalendar::store::selection_store::{MemorySelectionStore, SelectionStore};

    let store = MemorySelectionStore::default();
    let (mut calendar, _) = loaded_calendar(Vec::new()).await;
    let state = calendar.select_date(day(10)).unwrap();
    store.save("guest", &state).unwrap();

    let listener = Arc::new(RecordingListener::default());
    let mut resumed = AvailabilityCalendar::new("101", Arc::new(FixedClock(day(1))), listener)
        .with_selection(store.load("guest").unwrap());
    resumed.load_occupancy(&FakeProvider::with(Vec::new())).await;
    let state = resumed.select_date(day(14)).unwrap();
    assert_eq!(state, SelectionState::stay(day(10), day(14)).unwrap());
}

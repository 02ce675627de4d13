//! Local date-range provider serving bookings from a JSON fixture, for
//! trying the calendar without a booking backend.

use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use warp::Filter;

use crate::error::FixtureError;
use crate::models::occupancy::BookingRange;

/// Room id to the booking rows returned for it.
pub type Fixture = HashMap<String, Vec<BookingRange>>;

pub fn load_fixture(path: &str) -> Result<Fixture, FixtureError> {
    let content = fs::read_to_string(path).map_err(|source| FixtureError::Read {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| FixtureError::Parse {
        path: path.to_string(),
        source,
    })
}

pub fn routes(
    fixture: Arc<Fixture>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("bookings" / "room" / String)
        .and(warp::get())
        .map(move |room_id: String| {
            let ranges = fixture.get(&room_id).cloned().unwrap_or_default();
            info!(%room_id, ranges = ranges.len(), "Serving booking ranges");
            warp::reply::json(&ranges)
        })
}

pub async fn serve(fixture: Fixture, addr: SocketAddr) {
    info!(%addr, rooms = fixture.len(), "Starting fixture booking provider");
    warp::serve(routes(Arc::new(fixture))).run(addr).await;
}

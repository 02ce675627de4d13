use chrono::{DateTime, NaiveDate, NaiveDateTime};

const KEY_FORMAT: &str = "%Y-%m-%d";

// Used as a set key and wire value, so never locale formatted.
pub fn format_date_key(date: NaiveDate) -> String {
    date.format(KEY_FORMAT).to_string()
}

/// Parses the date strings a booking backend hands back. Datetimes keep the
/// calendar date written in their own offset.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, KEY_FORMAT) {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime.date());
    }
    NaiveDate::parse_from_str(value, "%Y/%m/%d").ok()
}

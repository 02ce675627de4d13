use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::date_key::{format_date_key, parse_date};

/// One existing booking on a room, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupiedInterval {
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
}

impl OccupiedInterval {
    pub fn new(check_in_date: NaiveDate, check_out_date: NaiveDate) -> Self {
        Self {
            check_in_date,
            check_out_date,
        }
    }
}

/// Row shape returned by the date-range provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRange {
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

impl BookingRange {
    pub fn from_interval(interval: &OccupiedInterval) -> Self {
        Self {
            check_in: Some(format_date_key(interval.check_in_date)),
            check_out: Some(format_date_key(interval.check_out_date)),
        }
    }

    pub fn to_interval(&self) -> Option<OccupiedInterval> {
        let check_in = parse_date(self.check_in.as_deref()?)?;
        let check_out = parse_date(self.check_out.as_deref()?)?;
        Some(OccupiedInterval::new(check_in, check_out))
    }
}

/// Turns a provider body into intervals. Anything that is not a JSON array
/// yields no intervals; rows that cannot be read are skipped.
pub fn intervals_from_body(body: &Value) -> Vec<OccupiedInterval> {
    let Value::Array(rows) = body else {
        warn!("Booking range response is not an array, treating as empty");
        return Vec::new();
    };
    rows.iter()
        .filter_map(|row| {
            let interval = serde_json::from_value::<BookingRange>(row.clone())
                .ok()
                .and_then(|range| range.to_interval());
            if interval.is_none() {
                warn!(%row, "Skipping unreadable booking range");
            }
            interval
        })
        .collect()
}

/// Every date covered by at least one interval, kept as sorted, merged
/// inclusive ranges so a long booking costs one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupiedDateIndex {
    ranges: Vec<(NaiveDate, NaiveDate)>,
}

impl OccupiedDateIndex {
    pub fn from_intervals(intervals: &[OccupiedInterval]) -> Self {
        let mut spans: Vec<(NaiveDate, NaiveDate)> = intervals
            .iter()
            .filter(|interval| interval.check_in_date <= interval.check_out_date)
            .map(|interval| (interval.check_in_date, interval.check_out_date))
            .collect();
        spans.sort_unstable();

        let mut ranges: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(spans.len());
        for (start, end) in spans {
            match ranges.last_mut() {
                Some(last) if start <= last.1 || last.1.succ_opt() == Some(start) => {
                    last.1 = last.1.max(end);
                }
                _ => ranges.push((start, end)),
            }
        }
        Self { ranges }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let idx = self.ranges.partition_point(|(_, end)| *end < date);
        self.ranges
            .get(idx)
            .is_some_and(|(start, _)| *start <= date)
    }

    /// True when any occupied date lies in `(after, through]`.
    pub fn any_between(&self, after: NaiveDate, through: NaiveDate) -> bool {
        if through <= after {
            return false;
        }
        let idx = self.ranges.partition_point(|(_, end)| *end <= after);
        self.ranges
            .get(idx)
            .is_some_and(|(start, _)| *start <= through)
    }

    pub fn ranges(&self) -> &[(NaiveDate, NaiveDate)] {
        &self.ranges
    }

    /// Number of occupied dates.
    pub fn len(&self) -> usize {
        self.ranges
            .iter()
            .map(|(start, end)| (*end - *start).num_days() as usize + 1)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Expands every occupied date into its wire key.
    pub fn keys(&self) -> Vec<String> {
        self.ranges
            .iter()
            .flat_map(|(start, end)| {
                let end = *end;
                start.iter_days().take_while(move |date| *date <= end)
            })
            .map(format_date_key)
            .collect()
    }
}

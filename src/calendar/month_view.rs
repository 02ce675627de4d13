use chrono::{Datelike, Duration, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// A displayed `(year, month)` pair. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Accepts `YYYY-MM`.
    pub fn parse(value: &str) -> Option<Self> {
        let (year, month) = value.trim().split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn navigate(&self, direction: Direction) -> Self {
        match direction {
            Direction::Prev => self.prev(),
            Direction::Next => self.next(),
        }
    }

    pub fn days_in_month(&self) -> u32 {
        (self.next().first_day() - self.first_day()).num_days() as u32
    }

    pub fn title(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_current_month: bool,
}

/// Sunday-first grid of whole weeks covering one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub year_month: YearMonth,
    pub cells: Vec<DayCell>,
}

impl MonthView {
    pub fn generate(year_month: YearMonth) -> Self {
        let first = year_month.first_day();
        let leading = first.weekday().num_days_from_sunday() as i64;
        let filled = leading + year_month.days_in_month() as i64;
        let total = (filled + 6) / 7 * 7;
        let start = first - Duration::days(leading);

        let cells = start
            .iter_days()
            .take(total as usize)
            .map(|date| DayCell {
                date,
                in_current_month: date.year() == year_month.year()
                    && date.month() == year_month.month(),
            })
            .collect();

        Self { year_month, cells }
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }
}

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// Weekday labels for the header strip, Monday first.
pub const WEEKDAY_ABBREVS: [&str; 7] = ["M", "T", "W", "T", "F", "S", "S"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

impl CalendarError {
    fn invalid(year: i32, month: u32, day: u32) -> Self {
        CalendarError::InvalidDate { year, month, day }
    }
}

/// A (year, month, day) triple that is known to name a real calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    year: i32,
    month: u32,
    day: u32,
    #[serde(skip)]
    date: NaiveDate,
}

impl Selection {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, CalendarError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self::from_date)
            .ok_or_else(|| CalendarError::invalid(year, month, day))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            date,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Length of the selected month. Cannot fail: construction already
    /// rejected months outside 1..=12.
    pub fn days_in_month(&self) -> u32 {
        month_length(self.year, self.month)
    }

    pub fn day_choices(&self) -> Vec<String> {
        padded_days(self.days_in_month())
    }
}

/// The Monday..Sunday span containing some date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub monday: NaiveDate,
    pub sunday: NaiveDate,
    pub dates: [NaiveDate; 7],
}

pub fn resolve_week(date: NaiveDate) -> WeekWindow {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    let dates: [NaiveDate; 7] = std::array::from_fn(|i| monday + Duration::days(i as i64));
    WeekWindow {
        monday,
        sunday: dates[6],
        dates,
    }
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::invalid(year, month, 1));
    }
    Ok(month_length(year, month))
}

// Callers guarantee month is in 1..=12.
fn month_length(year: i32, month: u32) -> u32 {
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if leap => 29,
        _ => 28,
    }
}

fn padded_days(days: u32) -> Vec<String> {
    (1..=days).map(|d| format!("{:02}", d)).collect()
}

/// Picker entries for the day selector: "01".."28|29|30|31".
pub fn day_choices(year: i32, month: u32) -> Result<Vec<String>, CalendarError> {
    Ok(padded_days(days_in_month(year, month)?))
}

pub fn month_choices() -> Vec<String> {
    (1..=12).map(|m| format!("{:02}", m)).collect()
}

/// "Jun" when the week sits inside one month, "Jun-Jul" when it straddles two.
pub fn header_label(monday: NaiveDate, sunday: NaiveDate) -> String {
    let first = monday.format("%b").to_string();
    if monday.month() == sunday.month() {
        first
    } else {
        format!("{}-{}", first, sunday.format("%b"))
    }
}

pub fn weekday_header(window: &WeekWindow) -> Vec<(&'static str, u32)> {
    WEEKDAY_ABBREVS
        .iter()
        .zip(window.dates.iter())
        .map(|(abbrev, d)| (*abbrev, d.day()))
        .collect()
}

pub fn advance(selection: Selection, delta_weeks: i64) -> Result<Selection, CalendarError> {
    let start = selection.date();
    Duration::try_weeks(delta_weeks)
        .and_then(|delta| start.checked_add_signed(delta))
        .map(Selection::from_date)
        .ok_or_else(|| CalendarError::invalid(selection.year, selection.month, selection.day))
}

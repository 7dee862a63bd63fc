//! Calendar bucket resolution for dashboard time filters.
//!
//! Symbolic filters ("this_month", "last_quarter", ...) resolve to concrete
//! midnight-to-midnight local intervals, serialized as UTC-normalized ISO
//! instants. The unbounded range (both bounds empty) is the permissive default
//! for `all` and for any wire value the service does not recognize.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};

/// Symbolic reporting window selected in the dashboard toolbar.
///
/// Wire values outside the known vocabulary land in `Unrecognized` rather than
/// failing deserialization; they resolve exactly like [`TimeFilter::All`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TimeFilter {
    All,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisQuarter,
    LastQuarter,
    ThisYear,
    LastYear,
    YearToDate,
    Unrecognized(String),
}

impl TimeFilter {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "all" => Self::All,
            "this_week" => Self::ThisWeek,
            "last_week" => Self::LastWeek,
            "this_month" => Self::ThisMonth,
            "last_month" => Self::LastMonth,
            "this_quarter" => Self::ThisQuarter,
            "last_quarter" => Self::LastQuarter,
            "this_year" => Self::ThisYear,
            "last_year" => Self::LastYear,
            "ytd" | "year_to_date" => Self::YearToDate,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::All => "all",
            Self::ThisWeek => "this_week",
            Self::LastWeek => "last_week",
            Self::ThisMonth => "this_month",
            Self::LastMonth => "last_month",
            Self::ThisQuarter => "this_quarter",
            Self::LastQuarter => "last_quarter",
            Self::ThisYear => "this_year",
            Self::LastYear => "last_year",
            Self::YearToDate => "ytd",
            Self::Unrecognized(raw) => raw.as_str(),
        }
    }
}

impl From<String> for TimeFilter {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TimeFilter> for String {
    fn from(value: TimeFilter) -> Self {
        value.as_wire().to_string()
    }
}

impl Default for TimeFilter {
    fn default() -> Self {
        Self::All
    }
}

/// Explicit bucket shape used when a report anchors on a chosen date instead
/// of a symbolic filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Weekly,
    Monthly,
    Yearly,
    Ytd,
}

/// Resolved interval. Empty strings mean the bound is open; callers treat the
/// fully empty range as "no date filter".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start_date.is_empty() && self.end_date.is_empty()
    }
}

/// Resolve a symbolic filter against the supplied clock.
pub fn resolve<Tz: TimeZone>(filter: &TimeFilter, now: &DateTime<Tz>) -> DateRange {
    let today = now.date_naive();
    let tz = now.timezone();

    let (first, last) = match filter {
        TimeFilter::All | TimeFilter::Unrecognized(_) => return DateRange::unbounded(),
        TimeFilter::ThisWeek => week_of(today),
        TimeFilter::LastWeek => week_of(today - Duration::days(7)),
        TimeFilter::ThisMonth => month_of(today),
        TimeFilter::LastMonth => month_of(month_of(today).0 - Duration::days(1)),
        TimeFilter::ThisQuarter => quarter_of(today),
        TimeFilter::LastQuarter => quarter_of(quarter_of(today).0 - Duration::days(1)),
        TimeFilter::ThisYear => year_of(today.year()),
        TimeFilter::LastYear => year_of(today.year() - 1),
        TimeFilter::YearToDate => (year_of(today.year()).0, today),
    };

    bounded(first, last, &tz)
}

/// Resolve an explicit (anchor date, period) pair. `Ytd` keeps the asymmetric
/// contract: start at the anchor's calendar-year start, end at today.
pub fn resolve_period<Tz: TimeZone>(
    anchor: NaiveDate,
    period: ReportPeriod,
    now: &DateTime<Tz>,
) -> DateRange {
    let tz = now.timezone();
    let (first, last) = match period {
        ReportPeriod::Weekly => week_of(anchor),
        ReportPeriod::Monthly => month_of(anchor),
        ReportPeriod::Yearly => year_of(anchor.year()),
        ReportPeriod::Ytd => (year_of(anchor.year()).0, now.date_naive()),
    };

    bounded(first, last, &tz)
}

fn bounded<Tz: TimeZone>(first: NaiveDate, last: NaiveDate, tz: &Tz) -> DateRange {
    let start = first.and_hms_opt(0, 0, 0).expect("midnight is valid");
    let end = last
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("end of day is valid");

    DateRange {
        start_date: render(instant(start, tz)),
        end_date: render(instant(end, tz)),
    }
}

fn instant<Tz: TimeZone>(wall_clock: NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&wall_clock) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        // DST fold: take the earlier of the two readings.
        LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
        // DST gap: the wall-clock time never happened; fall back to UTC.
        LocalResult::None => Utc.from_utc_datetime(&wall_clock),
    }
}

fn render(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn week_of(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

fn month_of(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = day.with_day(1).expect("first of month is valid");
    (first, last_day_of_month(day.year(), day.month()))
}

fn quarter_of(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start_month = (day.month0() / 3) * 3 + 1;
    let first =
        NaiveDate::from_ymd_opt(day.year(), start_month, 1).expect("quarter start is valid");
    (first, last_day_of_month(day.year(), start_month + 2))
}

fn year_of(year: i32) -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(year, 1, 1).expect("january 1 is valid"),
        NaiveDate::from_ymd_opt(year, 12, 31).expect("december 31 is valid"),
    )
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .expect("month boundary is valid")
}

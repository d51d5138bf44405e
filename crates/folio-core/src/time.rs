use chrono::{Datelike, Days, NaiveDate};
use std::cell::Cell;

thread_local! {
    static FIXED_TODAY_LOCAL: Cell<Option<NaiveDate>> = const { Cell::new(None) };
}

/// Runs `f` with [`today_local`] pinned to `today` on the current thread.
///
/// Layout passes take "today" as an explicit input; this only affects callers that ask
/// [`today_local`] for it, which keeps snapshot tests independent of the wall clock.
pub fn with_fixed_today<R>(today: Option<NaiveDate>, f: impl FnOnce() -> R) -> R {
    FIXED_TODAY_LOCAL.with(|cell| {
        let prev = cell.replace(today);
        let out = f();
        cell.set(prev);
        out
    })
}

pub fn today_local() -> NaiveDate {
    FIXED_TODAY_LOCAL
        .with(|cell| cell.get())
        .unwrap_or_else(|| chrono::Local::now().date_naive())
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// The calendar day after `date`, saturating at `NaiveDate::MAX`.
pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

/// Parses `YYYY-MM-DD`, or `YYYY-MM` resolved to the first (`month_end = false`) or last day of
/// the month.
pub fn parse_content_date(raw: &str, month_end: bool) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    let (y, m) = raw.split_once('-')?;
    if y.len() != 4 || m.is_empty() || m.len() > 2 {
        return None;
    }
    let year: i32 = y.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    let day = if month_end {
        days_in_month(year, month)
    } else {
        1
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

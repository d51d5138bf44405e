//! Quarter-indexed time axis shared by the timeline bars and markers.
//!
//! Positions are measured in quarters from January 1st of `min_year`; pixel space is simply
//! `position * quarter_width_px`.

use chrono::{Datelike, NaiveDate};
use folio_core::TimelineEvent;
use folio_core::time::{days_in_month, next_day};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// Earliest data year up to a few years past today.
    #[default]
    MultiYear,
    /// A window centered on today.
    Today,
    /// Exactly the data's years, sized to the viewport.
    Fit,
}

impl ViewMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "multi-year" | "multiYear" | "years" => Some(Self::MultiYear),
            "today" => Some(Self::Today),
            "fit" => Some(Self::Fit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisOptions {
    /// Years kept past today in [`ViewMode::MultiYear`].
    pub future_years: i32,
    /// Half-width (in years) of the [`ViewMode::Today`] window.
    pub today_span_years: i32,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            future_years: 2,
            today_span_years: 2,
        }
    }
}

impl AxisOptions {
    /// The wide "today" variant (±20 years).
    pub fn wide() -> Self {
        Self {
            today_span_years: 20,
            ..Self::default()
        }
    }
}

pub fn quarter_index(date: NaiveDate, min_year: i32) -> i32 {
    (date.year() - min_year) * 4 + (date.month0() / 3) as i32
}

pub fn quarter_position(date: NaiveDate, min_year: i32) -> f64 {
    let months = f64::from(date.year() - min_year) * 12.0 + f64::from(date.month0());
    let day_progress = f64::from(date.day0()) / f64::from(days_in_month(date.year(), date.month()));
    (months + day_progress) / 3.0
}

/// Year range covered by events with a valid (`start <= end`) range.
pub fn data_year_range(events: &[TimelineEvent]) -> Option<(i32, i32)> {
    events
        .iter()
        .filter(|e| e.start <= e.end)
        .map(|e| (e.start.year(), e.end.year()))
        .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalAxis {
    pub min_year: i32,
    pub max_year: i32,
    pub total_quarters: i32,
}

impl TemporalAxis {
    pub fn new(min_year: i32, max_year: i32) -> Self {
        let (min_year, max_year) = if min_year <= max_year {
            (min_year, max_year)
        } else {
            (max_year, min_year)
        };
        Self {
            min_year,
            max_year,
            total_quarters: (max_year - min_year + 1) * 4,
        }
    }

    /// Range used when there is no usable data: the current year and its neighbours.
    pub fn fallback(today: NaiveDate) -> Self {
        Self::new(today.year() - 1, today.year() + 1)
    }

    pub fn for_events(
        events: &[TimelineEvent],
        mode: ViewMode,
        today: NaiveDate,
        options: &AxisOptions,
    ) -> Self {
        let ty = today.year();
        let data = data_year_range(events);
        match (mode, data) {
            (ViewMode::MultiYear, Some((lo, hi))) => {
                Self::new(lo, hi.max(ty + options.future_years.max(0)))
            }
            (ViewMode::Fit, Some((lo, hi))) => Self::new(lo, hi),
            (ViewMode::Today, data) => {
                // Grow the window symmetrically so it never holds fewer quarters than the data.
                let mut half = options.today_span_years.max(0);
                if let Some((lo, hi)) = data {
                    half = half.max(ty - lo).max(hi - ty);
                }
                Self::new(ty - half, ty + half)
            }
            (_, None) => Self::fallback(today),
        }
    }

    pub fn quarter_index(&self, date: NaiveDate) -> i32 {
        quarter_index(date, self.min_year)
    }

    pub fn quarter_position(&self, date: NaiveDate) -> f64 {
        quarter_position(date, self.min_year)
    }

    /// Position just past an inclusive end date.
    pub fn end_position(&self, end: NaiveDate) -> f64 {
        quarter_position(next_day(end), self.min_year)
    }

    pub fn clamp_position(&self, q: f64) -> f64 {
        q.clamp(0.0, f64::from(self.total_quarters))
    }

    pub fn contains_year(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains_year(date.year())
    }

    pub fn year_start_position(&self, year: i32) -> f64 {
        f64::from((year - self.min_year) * 4)
    }

    /// Midpoint of the data's bars in quarter space (`None` without valid events).
    pub fn data_midpoint(&self, events: &[TimelineEvent]) -> Option<f64> {
        let (lo, hi) = events
            .iter()
            .filter(|e| e.start <= e.end)
            .map(|e| (self.quarter_position(e.start), self.end_position(e.end)))
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))?;
        Some(self.clamp_position((lo + hi) / 2.0))
    }
}

//! Timeline bars on the quarter axis: geometry, overflow arrows, label placement and the scroll
//! targets for view-mode switches.

use crate::axis::{AxisOptions, TemporalAxis, ViewMode};
use crate::model::{
    ModeTransition, OverflowAffordance, OverflowEdge, QuarterMarker, TimelineBarLayout,
    TimelineLayout, YearMarker, ZoomOutcome,
};
use crate::text::{TextMeasurer, TextStyle};
use crate::{Error, Result};
use chrono::NaiveDate;
use folio_core::geom::clamp;
use folio_core::{FolioConfig, TimelineEvent};

pub const MIN_QUARTER_WIDTH_PX: f64 = 24.0;
pub const MAX_QUARTER_WIDTH_PX: f64 = 140.0;

const DEFAULT_QUARTER_WIDTH_PX: f64 = 56.0;
const DEFAULT_ROW_HEIGHT_PX: f64 = 44.0;
const DEFAULT_LABEL_MARGIN_PX: f64 = 12.0;
const LABEL_PADDING_PX: f64 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineOptions {
    pub quarter_width_px: f64,
    pub row_height_px: f64,
    pub label_margin_px: f64,
    pub label_style: TextStyle,
    pub axis: AxisOptions,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            quarter_width_px: DEFAULT_QUARTER_WIDTH_PX,
            row_height_px: DEFAULT_ROW_HEIGHT_PX,
            label_margin_px: DEFAULT_LABEL_MARGIN_PX,
            label_style: TextStyle {
                font_size: 13.0,
                ..Default::default()
            },
            axis: AxisOptions::default(),
        }
    }
}

impl TimelineOptions {
    /// Reads `timeline.*` keys; missing keys keep their defaults.
    pub fn from_config(cfg: &FolioConfig) -> Self {
        let d = Self::default();
        let axis = AxisOptions {
            future_years: cfg
                .get_i64("timeline.futureYears")
                .and_then(|v| i32::try_from(v).ok())
                .unwrap_or(d.axis.future_years),
            today_span_years: match cfg.get_bool("timeline.wideToday") {
                Some(true) => AxisOptions::wide().today_span_years,
                _ => cfg
                    .get_i64("timeline.todaySpanYears")
                    .and_then(|v| i32::try_from(v).ok())
                    .unwrap_or(d.axis.today_span_years),
            },
        };
        Self {
            quarter_width_px: cfg
                .get_f64("timeline.quarterWidth")
                .unwrap_or(d.quarter_width_px),
            row_height_px: cfg.get_f64("timeline.rowHeight").unwrap_or(d.row_height_px),
            label_margin_px: cfg
                .get_f64("timeline.labelMargin")
                .unwrap_or(d.label_margin_px),
            label_style: TextStyle {
                font_family: cfg.get_str("fontFamily").map(str::to_string),
                font_size: cfg
                    .get_f64("timeline.fontSize")
                    .unwrap_or(d.label_style.font_size),
                font_weight: None,
            },
            axis,
        }
    }

    fn validate(&self) -> Result<()> {
        let checks = [
            ("quarterWidth", self.quarter_width_px),
            ("rowHeight", self.row_height_px),
        ];
        for (name, v) in checks {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::InvalidOptions {
                    message: format!("timeline.{name} must be a positive number (got {v})"),
                });
            }
        }
        if !self.label_margin_px.is_finite() || self.label_margin_px < 0.0 {
            return Err(Error::InvalidOptions {
                message: format!(
                    "timeline.labelMargin must be non-negative (got {})",
                    self.label_margin_px
                ),
            });
        }
        Ok(())
    }
}

/// Scroll state of the timeline viewport, in content pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimelineViewport {
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub width: f64,
    pub height: f64,
}

impl TimelineViewport {
    pub fn new(scroll_left: f64, width: f64) -> Self {
        Self {
            scroll_left,
            width,
            ..Default::default()
        }
    }

    fn right(&self) -> f64 {
        self.scroll_left + self.width.max(0.0)
    }
}

pub fn clamp_quarter_width(px: f64) -> f64 {
    if !px.is_finite() {
        return DEFAULT_QUARTER_WIDTH_PX;
    }
    px.clamp(MIN_QUARTER_WIDTH_PX, MAX_QUARTER_WIDTH_PX)
}

/// Events with a valid range, ordered by start date (ties keep input order). The position in the
/// returned list is the event's row.
pub fn ordered_rows(events: &[TimelineEvent]) -> Vec<&TimelineEvent> {
    let mut rows: Vec<&TimelineEvent> = events.iter().filter(|e| e.start <= e.end).collect();
    rows.sort_by_key(|e| e.start);
    rows
}

/// Label x in content space: after the bar start, but kept inside the visible slice.
fn label_x(left: f64, viewport: &TimelineViewport, margin: f64, label_width: f64) -> f64 {
    let lo = viewport.scroll_left + margin;
    let hi = viewport.right() - label_width;
    clamp(left + margin, lo, hi)
}

pub fn layout_timeline(
    events: &[TimelineEvent],
    mode: ViewMode,
    viewport: &TimelineViewport,
    today: NaiveDate,
    options: &TimelineOptions,
    measurer: &dyn TextMeasurer,
) -> Result<TimelineLayout> {
    options.validate()?;

    let mut hidden_event_ids: Vec<String> = Vec::new();
    for e in events.iter().filter(|e| e.start > e.end) {
        tracing::warn!(
            id = %e.id,
            start = %e.start,
            end = %e.end,
            "timeline event has an inverted date range"
        );
        hidden_event_ids.push(e.id.clone());
    }

    let rows = ordered_rows(events);
    let axis = TemporalAxis::for_events(events, mode, today, &options.axis);
    let qw = clamp_quarter_width(options.quarter_width_px);
    let total = f64::from(axis.total_quarters);
    let row_h = options.row_height_px;

    let mut bars: Vec<TimelineBarLayout> = Vec::with_capacity(rows.len());
    let mut affordances: Vec<OverflowAffordance> = Vec::new();

    for (row_index, ev) in rows.iter().enumerate() {
        let start_q = axis.quarter_position(ev.start);
        let end_q = axis.end_position(ev.end);
        if end_q <= 0.0 || start_q >= total {
            hidden_event_ids.push(ev.id.clone());
            continue;
        }
        let start_q = axis.clamp_position(start_q);
        let end_q = axis.clamp_position(end_q);
        let left = start_q * qw;
        let right = end_q * qw;
        let top = row_index as f64 * row_h;

        let is_past_overflow = left < viewport.scroll_left && right >= viewport.scroll_left;
        let is_future_overflow = right > viewport.right();
        let is_label_visible = right > viewport.scroll_left && left < viewport.right();

        let label_width =
            measurer.measure(&ev.title, &options.label_style).width + LABEL_PADDING_PX;
        let label_offset_px = if is_label_visible {
            label_x(left, viewport, options.label_margin_px, label_width) - left
        } else {
            0.0
        };

        if is_past_overflow {
            affordances.push(OverflowAffordance {
                event_id: ev.id.clone(),
                row_index,
                edge: OverflowEdge::Past,
                x_px: viewport.scroll_left,
                top_px: top,
            });
        }
        if is_future_overflow {
            affordances.push(OverflowAffordance {
                event_id: ev.id.clone(),
                row_index,
                edge: OverflowEdge::Future,
                x_px: viewport.right(),
                top_px: top,
            });
        }

        bars.push(TimelineBarLayout {
            event_id: ev.id.clone(),
            row_index,
            left_px: left,
            width_px: right - left,
            top_px: top,
            start_quarter: start_q,
            end_quarter: end_q,
            is_past_overflow,
            is_future_overflow,
            is_label_visible,
            label_offset_px,
            label_width_px: label_width,
        });
    }

    let current_quarter_index = axis
        .contains_date(today)
        .then(|| axis.quarter_index(today));
    let today_px = axis
        .contains_date(today)
        .then(|| axis.quarter_position(today) * qw);

    let years = (axis.min_year..=axis.max_year)
        .map(|year| YearMarker {
            year,
            left_px: axis.year_start_position(year) * qw,
            width_px: 4.0 * qw,
        })
        .collect();
    let quarters = (0..axis.total_quarters)
        .map(|index| {
            let quarter = (index % 4) as u8 + 1;
            QuarterMarker {
                index,
                year: axis.min_year + index / 4,
                quarter,
                label: format!("Q{quarter}"),
                left_px: f64::from(index) * qw,
                width_px: qw,
                is_current: current_quarter_index == Some(index),
            }
        })
        .collect();

    tracing::debug!(
        bars = bars.len(),
        hidden = hidden_event_ids.len(),
        total_quarters = axis.total_quarters,
        quarter_width_px = qw,
        "timeline layout"
    );

    Ok(TimelineLayout {
        mode,
        axis,
        quarter_width_px: qw,
        row_height_px: row_h,
        content_width_px: total * qw,
        content_height_px: rows.len() as f64 * row_h,
        bars,
        hidden_event_ids,
        affordances,
        years,
        quarters,
        current_quarter_index,
        today_px,
    })
}

/// Signed distance (in quarters) from `now` to `[start, end]`: negative when the interval is
/// still ahead, positive when it is over, zero inside.
pub fn signed_distance_to_interval(now: f64, start: f64, end: f64) -> f64 {
    if now < start {
        now - start
    } else if now > end {
        now - end
    } else {
        0.0
    }
}

/// Row whose bar is closest to `today` (ties go to the lower row).
pub fn nearest_row_to_today(
    events: &[TimelineEvent],
    axis: &TemporalAxis,
    today: NaiveDate,
) -> Option<usize> {
    let now = axis.quarter_position(today);
    let mut best: Option<(usize, f64)> = None;
    for (row, ev) in ordered_rows(events).iter().enumerate() {
        let d = signed_distance_to_interval(
            now,
            axis.quarter_position(ev.start),
            axis.end_position(ev.end),
        )
        .abs();
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((row, d));
        }
    }
    best.map(|(row, _)| row)
}

fn scroll_to_center(target_px: f64, viewport_extent: f64, content_extent: f64) -> f64 {
    let max_scroll = (content_extent - viewport_extent).max(0.0);
    clamp(target_px - viewport_extent / 2.0, 0.0, max_scroll)
}

/// Target geometry for switching to `mode`. The renderer animates towards these positions.
pub fn plan_mode_transition(
    events: &[TimelineEvent],
    mode: ViewMode,
    viewport: &TimelineViewport,
    today: NaiveDate,
    options: &TimelineOptions,
) -> Result<ModeTransition> {
    options.validate()?;

    let axis = TemporalAxis::for_events(events, mode, today, &options.axis);
    let total = f64::from(axis.total_quarters);
    let quarter_width_px = match mode {
        ViewMode::Fit if viewport.width > 0.0 => clamp_quarter_width(viewport.width / total),
        _ => clamp_quarter_width(options.quarter_width_px),
    };

    let today_q = axis.clamp_position(axis.quarter_position(today));
    let target_quarter = match mode {
        ViewMode::Fit => axis.data_midpoint(events).unwrap_or(today_q),
        ViewMode::MultiYear | ViewMode::Today => today_q,
    };
    let scroll_left = scroll_to_center(
        target_quarter * quarter_width_px,
        viewport.width.max(0.0),
        total * quarter_width_px,
    );

    let (focus_row, scroll_top) = match mode {
        ViewMode::Fit => match nearest_row_to_today(events, &axis, today) {
            Some(row) => {
                let row_h = options.row_height_px;
                let content_h = ordered_rows(events).len() as f64 * row_h;
                let center = row as f64 * row_h + row_h / 2.0;
                (
                    Some(row),
                    Some(scroll_to_center(center, viewport.height.max(0.0), content_h)),
                )
            }
            None => (None, None),
        },
        ViewMode::MultiYear | ViewMode::Today => (None, None),
    };

    Ok(ModeTransition {
        mode,
        axis,
        quarter_width_px,
        target_quarter,
        scroll_left,
        focus_row,
        scroll_top,
    })
}

/// Changes the quarter width while keeping the quarter under the viewport center in place.
pub fn zoom(
    axis: &TemporalAxis,
    viewport: &TimelineViewport,
    current_quarter_width_px: f64,
    requested_quarter_width_px: f64,
) -> ZoomOutcome {
    let current = clamp_quarter_width(current_quarter_width_px);
    let next = clamp_quarter_width(requested_quarter_width_px);
    let width = viewport.width.max(0.0);
    let center_q = axis.clamp_position((viewport.scroll_left + width / 2.0) / current);
    ZoomOutcome {
        quarter_width_px: next,
        scroll_left: scroll_to_center(
            center_q * next,
            width,
            f64::from(axis.total_quarters) * next,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_stays_inside_visible_slice() {
        let vp = TimelineViewport::new(1000.0, 400.0);
        // Bar started long before the viewport: label pinned to the left edge.
        assert_eq!(label_x(200.0, &vp, 12.0, 100.0), 1012.0);
        // Bar starts inside: label follows the bar.
        assert_eq!(label_x(1100.0, &vp, 12.0, 100.0), 1112.0);
        // Bar starts near the right edge: label pulled back so it fits.
        assert_eq!(label_x(1350.0, &vp, 12.0, 100.0), 1300.0);
        // Viewport narrower than the label: the left bound wins.
        let tiny = TimelineViewport::new(0.0, 50.0);
        assert_eq!(label_x(0.0, &tiny, 12.0, 100.0), 12.0);
    }

    #[test]
    fn signed_distance_is_zero_inside_interval() {
        assert_eq!(signed_distance_to_interval(5.0, 4.0, 6.0), 0.0);
        assert_eq!(signed_distance_to_interval(2.0, 4.0, 6.0), -2.0);
        assert_eq!(signed_distance_to_interval(9.0, 4.0, 6.0), 3.0);
    }

    #[test]
    fn quarter_width_is_bounded() {
        assert_eq!(clamp_quarter_width(5.0), MIN_QUARTER_WIDTH_PX);
        assert_eq!(clamp_quarter_width(500.0), MAX_QUARTER_WIDTH_PX);
        assert_eq!(clamp_quarter_width(80.0), 80.0);
        assert_eq!(clamp_quarter_width(f64::NAN), DEFAULT_QUARTER_WIDTH_PX);
    }
}

use super::{ParseOptions, Parsed, collect_records};
use crate::time::parse_content_date;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineItemRecord {
    id: String,
    #[serde(default)]
    group: String,
    title: String,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    location: Option<String>,
    start: String,
    end: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    details_url: Option<String>,
}

/// A date-ranged experience entry. `end` is an inclusive calendar day and never precedes `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    pub group: String,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub tags: Vec<String>,
    pub detail: Option<String>,
    pub details_url: Option<String>,
}

impl TimelineEvent {
    /// Minimal constructor; fails when `start > end`.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self> {
        let id = id.into();
        if start > end {
            return Err(Error::InvalidDateRange { id, start, end });
        }
        Ok(Self {
            id,
            group: String::new(),
            title: title.into(),
            company: None,
            location: None,
            start,
            end,
            tags: Vec::new(),
            detail: None,
            details_url: None,
        })
    }

    fn from_record(r: TimelineItemRecord) -> Result<Self> {
        let start = parse_content_date(&r.start, false).ok_or_else(|| Error::InvalidDate {
            id: r.id.clone(),
            value: r.start.clone(),
        })?;
        let end = parse_content_date(&r.end, true).ok_or_else(|| Error::InvalidDate {
            id: r.id.clone(),
            value: r.end.clone(),
        })?;
        let ev = Self::new(r.id, r.title, start, end)?;
        Ok(Self {
            group: r.group,
            company: r.company,
            location: r.location,
            tags: r.tags,
            detail: r.detail,
            details_url: r.details_url,
            ..ev
        })
    }
}

pub fn parse_timeline(value: &Value, options: ParseOptions) -> Result<Parsed<TimelineEvent>> {
    let raw: Vec<TimelineItemRecord> = Vec::deserialize(value)?;
    collect_records(raw, options, TimelineEvent::from_record)
}

pub fn parse_timeline_str(json: &str, options: ParseOptions) -> Result<Parsed<TimelineEvent>> {
    let value: Value = serde_json::from_str(json)?;
    parse_timeline(&value, options)
}

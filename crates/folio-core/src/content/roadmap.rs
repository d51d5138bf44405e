use super::{ParseOptions, Parsed, collect_records};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopicStatus {
    #[serde(alias = "notStarted", alias = "NotStarted", alias = "not_started")]
    NotStarted,
    #[serde(alias = "Studying")]
    Studying,
    #[serde(alias = "Done")]
    Done,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoadmapItemRecord {
    id: String,
    area: String,
    topic: String,
    status: TopicStatus,
    #[serde(default)]
    progress: f64,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapTopic {
    pub id: String,
    pub area: String,
    pub topic: String,
    pub status: TopicStatus,
    /// Percentage in `0..=100`.
    pub progress: f64,
    pub priority: Option<String>,
    pub link: Option<String>,
}

impl RoadmapTopic {
    pub fn new(
        id: impl Into<String>,
        area: impl Into<String>,
        topic: impl Into<String>,
        status: TopicStatus,
        progress: f64,
    ) -> Self {
        Self {
            id: id.into(),
            area: area.into(),
            topic: topic.into(),
            status,
            progress: normalize_progress(progress),
            priority: None,
            link: None,
        }
    }

    fn from_record(r: RoadmapItemRecord) -> Result<Self> {
        Ok(Self {
            priority: r.priority,
            link: r.link,
            ..Self::new(r.id, r.area, r.topic, r.status, r.progress)
        })
    }
}

fn normalize_progress(progress: f64) -> f64 {
    if progress.is_finite() {
        progress.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub fn parse_roadmap(value: &Value, options: ParseOptions) -> Result<Parsed<RoadmapTopic>> {
    let raw: Vec<RoadmapItemRecord> = Vec::deserialize(value)?;
    collect_records(raw, options, RoadmapTopic::from_record)
}

pub fn parse_roadmap_str(json: &str, options: ParseOptions) -> Result<Parsed<RoadmapTopic>> {
    let value: Value = serde_json::from_str(json)?;
    parse_roadmap(&value, options)
}

use crate::axis::{TemporalAxis, ViewMode};
use folio_core::TopicStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl From<folio_core::geom::Point> for LayoutPoint {
    fn from(p: folio_core::geom::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

// Timeline ----------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBarLayout {
    pub event_id: String,
    pub row_index: usize,
    pub left_px: f64,
    pub width_px: f64,
    pub top_px: f64,
    /// Bar edges in quarter space, after clamping to the axis.
    pub start_quarter: f64,
    pub end_quarter: f64,
    pub is_past_overflow: bool,
    pub is_future_overflow: bool,
    pub is_label_visible: bool,
    /// Label x relative to `left_px`.
    pub label_offset_px: f64,
    pub label_width_px: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowEdge {
    Past,
    Future,
}

/// A clickable arrow pinned to a viewport edge that selects an event whose bar runs past it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverflowAffordance {
    pub event_id: String,
    pub row_index: usize,
    pub edge: OverflowEdge,
    /// Content-space x of the viewport edge the arrow is pinned to.
    pub x_px: f64,
    pub top_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearMarker {
    pub year: i32,
    pub left_px: f64,
    pub width_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterMarker {
    pub index: i32,
    pub year: i32,
    pub quarter: u8,
    pub label: String,
    pub left_px: f64,
    pub width_px: f64,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineLayout {
    pub mode: ViewMode,
    pub axis: TemporalAxis,
    pub quarter_width_px: f64,
    pub row_height_px: f64,
    pub content_width_px: f64,
    pub content_height_px: f64,
    pub bars: Vec<TimelineBarLayout>,
    /// Events with no bar: outside the axis range or with an inverted date range.
    pub hidden_event_ids: Vec<String>,
    pub affordances: Vec<OverflowAffordance>,
    pub years: Vec<YearMarker>,
    pub quarters: Vec<QuarterMarker>,
    pub current_quarter_index: Option<i32>,
    pub today_px: Option<f64>,
}

/// Where a view-mode switch should (smoothly) scroll to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeTransition {
    pub mode: ViewMode,
    pub axis: TemporalAxis,
    pub quarter_width_px: f64,
    pub target_quarter: f64,
    pub scroll_left: f64,
    pub focus_row: Option<usize>,
    pub scroll_top: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomOutcome {
    pub quarter_width_px: f64,
    pub scroll_left: f64,
}

// Skill tree --------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillZone {
    /// Above the root: advanced topics.
    Upper,
    /// Below the root: foundational topics.
    Root,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAnchor {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewBox {
    pub view_box_x: f64,
    pub view_box_y: f64,
    pub view_box_width: f64,
    pub view_box_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAreaLayout {
    pub area: String,
    pub cluster_id: usize,
    pub zone: SkillZone,
    pub side: i8,
    pub color: String,
    /// Anchor point (center of the area node).
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub band_top: f64,
    pub band_bottom: f64,
    pub topic_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillTopicLayout {
    pub id: String,
    pub area: String,
    pub topic: String,
    pub status: TopicStatus,
    pub progress: f64,
    pub link: Option<String>,
    pub cluster_id: usize,
    pub x: f64,
    pub y: f64,
    pub area_x: f64,
    pub area_y: f64,
    pub box_x: f64,
    pub box_y: f64,
    pub box_width: f64,
    pub box_height: f64,
    pub box_anchor_x: f64,
    pub box_center_y: f64,
    pub radius: f64,
    pub text_x: f64,
    pub text_anchor: TextAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillEdgeKind {
    RootToArea,
    AreaToTopic,
}

/// A cubic curve `start -> c1 -> c2 -> end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEdgeLayout {
    pub kind: SkillEdgeKind,
    pub from: String,
    pub to: String,
    pub start: LayoutPoint,
    pub c1: LayoutPoint,
    pub c2: LayoutPoint,
    pub end: LayoutPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillTreeLayout {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub root: LayoutPoint,
    pub root_radius: f64,
    pub areas: Vec<SkillAreaLayout>,
    /// Same order as the input topics.
    pub topics: Vec<SkillTopicLayout>,
    pub edges: Vec<SkillEdgeLayout>,
    #[serde(flatten)]
    pub view_box: ViewBox,
    pub compaction_iterations: usize,
    /// Topics whose label box could not be placed without overlap.
    pub unresolved_topic_ids: Vec<String>,
}

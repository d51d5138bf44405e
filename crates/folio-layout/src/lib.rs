#![forbid(unsafe_code)]

//! Headless layout engines for the portfolio views.
//!
//! - [`timeline`]: quarter-based horizontal timeline with overflow affordances and view modes
//! - [`skill_tree`]: radial skill tree packed around a root node
//!
//! Both engines are pure functions: a snapshot of content plus options goes in, serializable
//! geometry comes out. Text is measured through [`text::TextMeasurer`] so callers can plug in
//! real font metrics.

pub mod axis;
pub mod error;
pub mod model;
pub mod skill_tree;
pub mod text;
pub mod timeline;

pub use axis::{AxisOptions, TemporalAxis, ViewMode};
pub use error::{Error, Result};
pub use model::{SkillTreeLayout, TimelineLayout};
pub use skill_tree::{SkillTreeOptions, layout_skill_tree};
pub use text::{DeterministicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};
pub use timeline::{
    TimelineOptions, TimelineViewport, layout_timeline, plan_mode_transition, zoom,
};

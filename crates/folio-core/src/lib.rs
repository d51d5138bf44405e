#![forbid(unsafe_code)]

//! Portfolio content model (headless).
//!
//! Design goals:
//! - load-once, read-only records for the timeline and skill roadmap
//! - deterministic inputs for the layout engines (no hidden clock reads)
//! - runtime-agnostic async seam for the README preview

pub mod config;
pub mod content;
pub mod error;
pub mod geom;
pub mod readme;
pub mod time;

pub use config::FolioConfig;
pub use content::{
    ParseOptions, Parsed, RoadmapTopic, TimelineEvent, TopicStatus, parse_roadmap,
    parse_roadmap_str, parse_timeline, parse_timeline_str,
};
pub use error::{Error, Result};

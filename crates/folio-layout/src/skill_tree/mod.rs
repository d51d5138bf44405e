//! Radial skill tree: areas around a root point, topics fanned out beside their area, packed
//! towards the root without collisions.
//!
//! The pass runs in fixed stages over a working [`arena::Arena`]:
//!
//! 1. group topics by area and split them into the upper and root zones,
//! 2. place area anchors on each zone's arc,
//! 3. shift anchors radially until their vertical bands stop colliding,
//! 4. stack topics inside each band,
//! 5. resolve label-box overlaps,
//! 6. compact whole clusters towards the root,
//! 7. separate area nodes that ended up too close,
//! 8. resolve label-box overlaps again,
//! 9. fit the view box.
//!
//! Every loop has a hard iteration cap; hitting it keeps the best positions found so far.

mod arena;
mod compact;
mod resolve;
mod viewport;

use crate::model::{SkillAreaLayout, SkillTopicLayout, SkillTreeLayout, TextAnchor};
use crate::text::{TextMeasurer, TextStyle};
use crate::{Error, Result};
use folio_core::geom::{Point, point};
use folio_core::{FolioConfig, RoadmapTopic};

pub use arena::leaf_radius;

#[derive(Debug, Clone, PartialEq)]
pub struct SkillTreeOptions {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Root position as a fraction of the canvas size.
    pub root_x_ratio: f64,
    pub root_y_ratio: f64,
    pub root_radius: f64,
    /// No cluster bounding box may enter this disk around the root.
    pub keep_out_radius: f64,
    /// Vertical clearance between the root and either zone.
    pub zone_gap: f64,
    /// Distance kept from the canvas edges when clamping topic boxes.
    pub canvas_margin: f64,

    pub upper_arc_deg: f64,
    pub upper_center_deg: f64,
    pub root_arc_deg: f64,
    pub root_center_deg: f64,
    pub upper_base_radius: f64,
    pub root_base_radius: f64,
    pub radius_step: f64,

    pub row_step: f64,
    pub band_margin: f64,
    pub band_gap: f64,
    pub band_probe_step: f64,
    pub band_probe_limit: usize,

    pub leaf_offset_x: f64,
    pub lane_offset: f64,
    pub box_min_width: f64,
    pub box_max_width: f64,
    pub box_height: f64,
    pub box_padding_x: f64,
    pub text_inset: f64,
    pub orb_min_radius: f64,
    pub orb_max_radius: f64,
    pub orb_gap: f64,
    pub area_node_min_width: f64,
    pub area_node_max_width: f64,
    pub area_node_height: f64,

    pub box_gap: f64,
    pub overlap_step: f64,
    pub overlap_max_steps: usize,

    pub cluster_gap: f64,
    pub compaction_step: f64,
    pub compaction_max_iterations: usize,

    pub min_x_gap: f64,
    pub min_y_gap: f64,
    pub separation_max_iterations: usize,

    pub viewport_padding: f64,

    /// Areas laid out in the root (foundational) zone, always present even without topics.
    pub foundation_areas: Vec<String>,
    pub topic_style: TextStyle,
    pub area_style: TextStyle,
}

impl Default for SkillTreeOptions {
    fn default() -> Self {
        Self {
            canvas_width: 2400.0,
            canvas_height: 1800.0,
            root_x_ratio: 0.5,
            root_y_ratio: 0.56,
            root_radius: 34.0,
            keep_out_radius: 150.0,
            zone_gap: 48.0,
            canvas_margin: 24.0,

            upper_arc_deg: 72.0,
            upper_center_deg: -90.0,
            root_arc_deg: 64.0,
            root_center_deg: 90.0,
            upper_base_radius: 380.0,
            root_base_radius: 300.0,
            radius_step: 150.0,

            row_step: 52.0,
            band_margin: 24.0,
            band_gap: 16.0,
            band_probe_step: 12.0,
            band_probe_limit: 120,

            leaf_offset_x: 60.0,
            lane_offset: 22.0,
            box_min_width: 238.0,
            box_max_width: 380.0,
            box_height: 40.0,
            box_padding_x: 56.0,
            text_inset: 16.0,
            orb_min_radius: 6.0,
            orb_max_radius: 14.0,
            orb_gap: 10.0,
            area_node_min_width: 150.0,
            area_node_max_width: 300.0,
            area_node_height: 48.0,

            box_gap: 10.0,
            overlap_step: 6.0,
            overlap_max_steps: 80,

            cluster_gap: 18.0,
            compaction_step: 8.0,
            compaction_max_iterations: 320,

            min_x_gap: 260.0,
            min_y_gap: 90.0,
            separation_max_iterations: 64,

            viewport_padding: 48.0,

            foundation_areas: vec![
                "Fundamentals".to_string(),
                "Languages".to_string(),
                "Tooling".to_string(),
            ],
            topic_style: TextStyle {
                font_size: 14.0,
                ..Default::default()
            },
            area_style: TextStyle {
                font_size: 15.0,
                font_weight: Some("600".to_string()),
                ..Default::default()
            },
        }
    }
}

impl SkillTreeOptions {
    /// Reads `skillTree.*` keys; missing keys keep their defaults.
    pub fn from_config(cfg: &FolioConfig) -> Self {
        let d = Self::default();
        let f = |key: &str, fallback: f64| {
            cfg.get_f64(&format!("skillTree.{key}")).unwrap_or(fallback)
        };
        let n = |key: &str, fallback: usize| {
            cfg.get_i64(&format!("skillTree.{key}"))
                .and_then(|v| usize::try_from(v).ok())
                .unwrap_or(fallback)
        };
        Self {
            canvas_width: f("canvasWidth", d.canvas_width),
            canvas_height: f("canvasHeight", d.canvas_height),
            keep_out_radius: f("keepOutRadius", d.keep_out_radius),
            zone_gap: f("zoneGap", d.zone_gap),
            row_step: f("rowStep", d.row_step),
            min_x_gap: f("minXGap", d.min_x_gap),
            min_y_gap: f("minYGap", d.min_y_gap),
            compaction_step: f("compactionStep", d.compaction_step),
            compaction_max_iterations: n("compactionMaxIterations", d.compaction_max_iterations),
            separation_max_iterations: n("separationMaxIterations", d.separation_max_iterations),
            foundation_areas: cfg
                .get_str_list("skillTree.foundationAreas")
                .unwrap_or_else(|| d.foundation_areas.clone()),
            ..d
        }
    }

    pub fn root(&self) -> Point {
        point(
            self.canvas_width * self.root_x_ratio,
            self.canvas_height * self.root_y_ratio,
        )
    }

    fn validate(&self) -> Result<()> {
        let positive = [
            ("canvasWidth", self.canvas_width),
            ("canvasHeight", self.canvas_height),
            ("rowStep", self.row_step),
            ("boxHeight", self.box_height),
            ("bandProbeStep", self.band_probe_step),
            ("overlapStep", self.overlap_step),
            ("compactionStep", self.compaction_step),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::InvalidOptions {
                    message: format!("skillTree.{name} must be a positive number (got {v})"),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.root_x_ratio) || !(0.0..=1.0).contains(&self.root_y_ratio) {
            return Err(Error::InvalidOptions {
                message: "skillTree root ratios must lie in 0..=1".to_string(),
            });
        }
        if self.box_min_width > self.box_max_width {
            return Err(Error::InvalidOptions {
                message: format!(
                    "skillTree box width bounds are inverted ({} > {})",
                    self.box_min_width, self.box_max_width
                ),
            });
        }
        Ok(())
    }
}

pub fn layout_skill_tree(
    topics: &[RoadmapTopic],
    options: &SkillTreeOptions,
    measurer: &dyn TextMeasurer,
) -> Result<SkillTreeLayout> {
    options.validate()?;

    let mut arena = arena::Arena::build(topics, options, measurer);
    resolve::resolve_leaf_overlaps(&mut arena, options);
    let compaction_iterations = compact::compact_clusters(&mut arena, options);
    compact::separate_area_nodes(&mut arena, options);
    let unresolved = resolve::resolve_leaf_overlaps(&mut arena, options);

    let edges = viewport::edges(&arena, topics);
    let view_box = viewport::fit_view_box(&arena, &edges, options);

    let areas = arena
        .clusters
        .values()
        .enumerate()
        .map(|(cluster_id, c)| SkillAreaLayout {
            area: c.area.clone(),
            cluster_id,
            zone: c.zone,
            side: c.side,
            color: c.color.to_string(),
            x: c.anchor.x,
            y: c.anchor.y,
            width: c.node_width,
            height: c.node_height,
            band_top: c.band.top,
            band_bottom: c.band.bottom,
            topic_count: c.leaves.len(),
        })
        .collect();

    let mut topic_layouts: Vec<Option<SkillTopicLayout>> = vec![None; topics.len()];
    for leaf in &arena.leaves {
        let t = &topics[leaf.topic];
        let cluster = &arena.clusters[leaf.cluster_id];
        let b = leaf.label_box();
        let (box_anchor_x, text_x, text_anchor) = if leaf.side > 0 {
            (b.min.x, b.min.x + options.text_inset, TextAnchor::Start)
        } else {
            (b.max.x, b.max.x - options.text_inset, TextAnchor::End)
        };
        topic_layouts[leaf.topic] = Some(SkillTopicLayout {
            id: t.id.clone(),
            area: t.area.clone(),
            topic: t.topic.clone(),
            status: t.status,
            progress: t.progress,
            link: t.link.clone(),
            cluster_id: leaf.cluster_id,
            x: leaf.x,
            y: leaf.y,
            area_x: cluster.anchor.x,
            area_y: cluster.anchor.y,
            box_x: b.min.x,
            box_y: b.min.y,
            box_width: b.width(),
            box_height: b.height(),
            box_anchor_x,
            box_center_y: (b.min.y + b.max.y) / 2.0,
            radius: leaf.radius,
            text_x,
            text_anchor,
        });
    }

    let root = arena.root;
    let unresolved_topic_ids: Vec<String> = unresolved
        .iter()
        .map(|&li| topics[arena.leaves[li].topic].id.clone())
        .collect();

    tracing::debug!(
        topics = topics.len(),
        clusters = arena.clusters.len(),
        compaction_iterations,
        unresolved = unresolved_topic_ids.len(),
        "skill tree layout"
    );

    Ok(SkillTreeLayout {
        canvas_width: options.canvas_width,
        canvas_height: options.canvas_height,
        root: root.into(),
        root_radius: options.root_radius,
        areas,
        topics: topic_layouts.into_iter().flatten().collect(),
        edges,
        view_box,
        compaction_iterations,
        unresolved_topic_ids,
    })
}

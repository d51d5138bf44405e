//! Working state of one skill-tree pass: clusters keyed by area, leaves indexed by position.
//!
//! Leaves point back to their cluster by arena index (`cluster_id`), never by reference.

use super::SkillTreeOptions;
use crate::model::SkillZone;
use crate::text::TextMeasurer;
use folio_core::RoadmapTopic;
use folio_core::geom::{
    Box2D, Point, centered_rect, clamp, intervals_overlap, point, polar_point, rect,
};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

const AREA_PALETTE: [&str; 8] = [
    "#4f7cff", "#f5a524", "#17c964", "#f31260", "#7828c8", "#06b7db", "#ff7a45", "#9aa5b1",
];

/// Orb radius for a topic: grows linearly with progress.
pub fn leaf_radius(progress: f64, options: &SkillTreeOptions) -> f64 {
    let p = if progress.is_finite() {
        progress.clamp(0.0, 100.0)
    } else {
        0.0
    };
    options.orb_min_radius + (options.orb_max_radius - options.orb_min_radius).max(0.0) * p / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Band {
    pub top: f64,
    pub bottom: f64,
}

impl Band {
    fn around(center_y: f64, height: f64) -> Self {
        Self {
            top: center_y - height / 2.0,
            bottom: center_y + height / 2.0,
        }
    }

    fn collides(&self, other: &Band, gap: f64) -> bool {
        intervals_overlap(self.top - gap, self.bottom + gap, other.top, other.bottom)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ClusterRecord {
    pub area: String,
    pub zone: SkillZone,
    pub side: i8,
    pub color: &'static str,
    pub angle_deg: f64,
    pub radius: f64,
    pub anchor: Point,
    pub node_width: f64,
    pub node_height: f64,
    pub band: Band,
    pub leaves: Vec<usize>,
}

impl ClusterRecord {
    pub fn node_box(&self) -> Box2D {
        centered_rect(self.anchor, self.node_width, self.node_height)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LeafRecord {
    /// Index into the input topic slice.
    pub topic: usize,
    pub cluster_id: usize,
    pub side: i8,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub box_width: f64,
    pub box_height: f64,
    pub orb_gap: f64,
}

impl LeafRecord {
    /// Label box for the leaf centered at height `y`; it sits on the outer side of the orb.
    pub fn label_box_at(&self, y: f64) -> Box2D {
        let x = if self.side > 0 {
            self.x + self.radius + self.orb_gap
        } else {
            self.x - self.radius - self.orb_gap - self.box_width
        };
        rect(x, y - self.box_height / 2.0, self.box_width, self.box_height)
    }

    pub fn label_box(&self) -> Box2D {
        self.label_box_at(self.y)
    }

    pub fn body_box(&self) -> Box2D {
        let orb = centered_rect(point(self.x, self.y), self.radius * 2.0, self.radius * 2.0);
        self.label_box().union(&orb)
    }
}

/// Valid vertical range of a zone, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ZoneBounds {
    pub min_y: f64,
    pub max_y: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct Arena {
    pub root: Point,
    pub canvas: Box2D,
    pub clusters: IndexMap<String, ClusterRecord>,
    pub leaves: Vec<LeafRecord>,
    upper: ZoneBounds,
    lower: ZoneBounds,
}

impl Arena {
    pub fn zone_bounds(&self, zone: SkillZone) -> ZoneBounds {
        match zone {
            SkillZone::Upper => self.upper,
            SkillZone::Root => self.lower,
        }
    }

    /// Union of the area node and every topic (orb + label) of the cluster.
    pub fn cluster_bounds(&self, cluster_id: usize) -> Box2D {
        let c = &self.clusters[cluster_id];
        c.leaves
            .iter()
            .map(|&li| self.leaves[li].body_box())
            .fold(c.node_box(), |acc, b| acc.union(&b))
    }

    /// Moves a cluster rigidly: anchor, band and all of its leaves.
    pub fn translate_cluster(&mut self, cluster_id: usize, dx: f64, dy: f64) {
        let c = &mut self.clusters[cluster_id];
        c.anchor = point(c.anchor.x + dx, c.anchor.y + dy);
        c.band.top += dy;
        c.band.bottom += dy;
        for &li in &c.leaves {
            let leaf = &mut self.leaves[li];
            leaf.x += dx;
            leaf.y += dy;
        }
    }

    /// Stages 1-4: grouping, angular placement, band collision avoidance, topic placement.
    pub fn build(
        topics: &[RoadmapTopic],
        options: &SkillTreeOptions,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let root = options.root();
        let canvas = rect(0.0, 0.0, options.canvas_width, options.canvas_height);
        let upper = ZoneBounds {
            min_y: options.canvas_margin,
            max_y: root.y - options.zone_gap,
        };
        let lower = ZoneBounds {
            min_y: root.y + options.zone_gap,
            max_y: options.canvas_height - options.canvas_margin,
        };

        let (upper_groups, root_groups) = group_topics(topics, &options.foundation_areas);

        let mut clusters: IndexMap<String, ClusterRecord> = IndexMap::new();
        let zones = [
            (
                SkillZone::Upper,
                upper_groups,
                options.upper_center_deg,
                options.upper_arc_deg,
                options.upper_base_radius,
            ),
            (
                SkillZone::Root,
                root_groups,
                options.root_center_deg,
                options.root_arc_deg,
                options.root_base_radius,
            ),
        ];
        for (zone, groups, center, span, base_radius) in zones {
            let n = groups.len();
            let mut side_counts = [0usize; 2];
            for (i, (area, members)) in groups.into_iter().enumerate() {
                let angle_deg = if n <= 1 {
                    center
                } else {
                    center - span / 2.0 + span * i as f64 / (n - 1) as f64
                };
                let side: i8 = if polar_point(root, 1.0, angle_deg).x < root.x - 1e-9 {
                    -1
                } else {
                    1
                };
                let slot = usize::from(side > 0);
                let radius = base_radius + options.radius_step * side_counts[slot] as f64;
                side_counts[slot] += 1;

                let anchor = polar_point(root, radius, angle_deg);
                let label_w = measurer.measure(&area, &options.area_style).width;
                let color = AREA_PALETTE[clusters.len() % AREA_PALETTE.len()];
                clusters.insert(
                    area.clone(),
                    ClusterRecord {
                        area,
                        zone,
                        side,
                        color,
                        angle_deg,
                        radius,
                        anchor,
                        node_width: clamp(
                            label_w + 40.0,
                            options.area_node_min_width,
                            options.area_node_max_width,
                        ),
                        node_height: options.area_node_height,
                        band: Band::around(anchor.y, 0.0),
                        // Topic indices for now; replaced by leaf indices in stage 4.
                        leaves: members,
                    },
                );
            }
        }

        let mut arena = Self {
            root,
            canvas,
            clusters,
            leaves: Vec::new(),
            upper,
            lower,
        };
        arena.claim_bands(options);
        arena.place_topics(topics, options, measurer);
        arena
    }

    fn band_height(topic_count: usize, options: &SkillTreeOptions) -> f64 {
        if topic_count == 0 {
            0.0
        } else {
            options.row_step * topic_count as f64 + options.band_margin
        }
    }

    /// Stage 3: probe radial offsets `0, +s, -s, +2s, -2s, ...` until the band is free on its side.
    fn claim_bands(&mut self, options: &SkillTreeOptions) {
        let root = self.root;
        let mut claimed: Vec<(i8, Band)> = Vec::new();
        for cluster in self.clusters.values_mut() {
            let zb = match cluster.zone {
                SkillZone::Upper => self.upper,
                SkillZone::Root => self.lower,
            };
            let height = Self::band_height(cluster.leaves.len(), options);
            let half_node = cluster.node_height / 2.0;

            let mut chosen: Option<(f64, Point, Band)> = None;
            for probe in 0..=options.band_probe_limit {
                let k = probe.div_ceil(2) as f64;
                let sign = if probe % 2 == 1 { 1.0 } else { -1.0 };
                let offset = sign * k * options.band_probe_step;
                let r = cluster.radius + offset;
                if r < options.keep_out_radius {
                    continue;
                }
                let p = polar_point(root, r, cluster.angle_deg);
                if p.y - half_node < zb.min_y || p.y + half_node > zb.max_y {
                    continue;
                }
                let band = Band::around(p.y, height);
                let free = !claimed
                    .iter()
                    .any(|(side, b)| *side == cluster.side && b.collides(&band, options.band_gap));
                if free {
                    chosen = Some((r, p, band));
                    break;
                }
            }

            match chosen {
                Some((r, p, band)) => {
                    cluster.radius = r;
                    cluster.anchor = p;
                    cluster.band = band;
                }
                None => {
                    tracing::warn!(
                        area = %cluster.area,
                        "no free band found; keeping the arc position"
                    );
                    cluster.band = Band::around(cluster.anchor.y, height);
                }
            }
            claimed.push((cluster.side, cluster.band));
        }
    }

    /// Stage 4: rows inside the band by descending progress, alternating lanes.
    fn place_topics(
        &mut self,
        topics: &[RoadmapTopic],
        options: &SkillTreeOptions,
        measurer: &dyn TextMeasurer,
    ) {
        for (cluster_id, cluster) in self.clusters.values_mut().enumerate() {
            let mut members = std::mem::take(&mut cluster.leaves);
            members.sort_by(|&a, &b| topics[b].progress.total_cmp(&topics[a].progress));

            let side = f64::from(cluster.side);
            for (row, &ti) in members.iter().enumerate() {
                let t = &topics[ti];
                let lane = (row % 2) as f64;
                let x = cluster.anchor.x
                    + side
                        * (cluster.node_width / 2.0
                            + options.leaf_offset_x
                            + lane * options.lane_offset);
                let y = cluster.band.top
                    + options.band_margin / 2.0
                    + options.row_step * (row as f64 + 0.5);
                let text_w = measurer.measure(&t.topic, &options.topic_style).width;

                cluster.leaves.push(self.leaves.len());
                self.leaves.push(LeafRecord {
                    topic: ti,
                    cluster_id,
                    side: cluster.side,
                    x,
                    y,
                    radius: leaf_radius(t.progress, options),
                    box_width: clamp(
                        text_w + options.box_padding_x,
                        options.box_min_width,
                        options.box_max_width,
                    ),
                    box_height: options.box_height,
                    orb_gap: options.orb_gap,
                });
            }
        }
    }
}

/// Stage 1. Upper zone: by topic count descending, then name. Root zone: the configured
/// foundation areas (even when empty), alphabetically.
fn group_topics(
    topics: &[RoadmapTopic],
    foundation_areas: &[String],
) -> (Vec<(String, Vec<usize>)>, Vec<(String, Vec<usize>)>) {
    let foundation: FxHashSet<&str> = foundation_areas.iter().map(String::as_str).collect();

    let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for area in foundation_areas {
        groups.entry(area.as_str()).or_default();
    }
    for (i, t) in topics.iter().enumerate() {
        groups.entry(t.area.as_str()).or_default().push(i);
    }

    let (mut root_zone, mut upper): (Vec<_>, Vec<_>) = groups
        .into_iter()
        .map(|(area, members)| (area.to_string(), members))
        .partition(|(area, _)| foundation.contains(area.as_str()));

    upper.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(&b.0)));
    root_zone.sort_by(|a, b| a.0.cmp(&b.0));
    (upper, root_zone)
}

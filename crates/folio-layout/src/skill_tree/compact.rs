//! Stages 6 and 7: rigid cluster moves.

use super::SkillTreeOptions;
use super::arena::Arena;
use crate::model::SkillZone;
use folio_core::geom::{
    Box2D, Vector, containment_excess, disk_penetration, inflated_overlap_area, vector,
};

const EPS: f64 = 1e-9;
/// Extra clearance on every separation push, so rounding never leaves a pair just short of the
/// gap.
const SEPARATION_SLACK: f64 = 0.5;

/// Penalties a compaction step must not increase.
#[derive(Debug, Clone)]
struct Penalty {
    zone: f64,
    canvas: f64,
    keep_out: f64,
    /// Gap-inflated overlap area with every other cluster, by arena index.
    overlaps: Vec<f64>,
}

impl Penalty {
    fn not_worse_than(&self, before: &Penalty) -> bool {
        self.zone <= before.zone + EPS
            && self.canvas <= before.canvas + EPS
            && self.keep_out <= before.keep_out + EPS
            && self
                .overlaps
                .iter()
                .zip(&before.overlaps)
                .all(|(now, was)| *now <= *was + EPS)
    }
}

fn penalty(
    arena: &Arena,
    bounds: &[Box2D],
    cluster_id: usize,
    candidate: &Box2D,
    options: &SkillTreeOptions,
) -> Penalty {
    let zone = match arena.clusters[cluster_id].zone {
        SkillZone::Upper => (candidate.max.y - (arena.root.y - options.zone_gap)).max(0.0),
        SkillZone::Root => ((arena.root.y + options.zone_gap) - candidate.min.y).max(0.0),
    };
    let overlaps = bounds
        .iter()
        .enumerate()
        .map(|(other, b)| {
            if other == cluster_id {
                0.0
            } else {
                inflated_overlap_area(candidate, b, options.cluster_gap)
            }
        })
        .collect();
    Penalty {
        zone,
        canvas: containment_excess(candidate, &arena.canvas),
        keep_out: disk_penetration(candidate, arena.root, options.keep_out_radius),
        overlaps,
    }
}

/// Pulls clusters towards the root, farthest first, until a full sweep moves nothing or the
/// iteration cap is hit. Returns the number of sweeps run.
pub(crate) fn compact_clusters(arena: &mut Arena, options: &SkillTreeOptions) -> usize {
    let n = arena.clusters.len();
    let mut bounds: Vec<Box2D> = (0..n).map(|i| arena.cluster_bounds(i)).collect();

    let mut iterations = 0;
    while iterations < options.compaction_max_iterations {
        iterations += 1;

        let mut order: Vec<usize> = (0..n).collect();
        let root = arena.root;
        let dist = |i: usize| (arena.clusters[i].anchor - root).length();
        order.sort_by(|&a, &b| dist(b).total_cmp(&dist(a)).then_with(|| a.cmp(&b)));

        let mut moved = false;
        for id in order {
            let to_root = root - arena.clusters[id].anchor;
            let len = to_root.length();
            if len <= EPS {
                continue;
            }
            let full = to_root * (options.compaction_step.min(len) / len);
            let before = penalty(arena, &bounds, id, &bounds[id], options);

            // Straight towards the root first, then each axis on its own.
            let candidates: [Vector; 3] = [full, vector(full.x, 0.0), vector(0.0, full.y)];
            let step = candidates.into_iter().find(|v| {
                v.length() > EPS && {
                    let moved_box = bounds[id].translate(*v);
                    penalty(&*arena, &bounds, id, &moved_box, options).not_worse_than(&before)
                }
            });

            if let Some(v) = step {
                arena.translate_cluster(id, v.x, v.y);
                bounds[id] = bounds[id].translate(v);
                moved = true;
            }
        }

        if !moved {
            break;
        }
    }

    if iterations >= options.compaction_max_iterations {
        tracing::debug!(iterations, "cluster compaction hit its iteration cap");
    }
    iterations
}

/// Vertical shift for `cluster_id` limited so its bounding box stays inside its zone.
fn allowed_shift(arena: &Arena, cluster_id: usize, dy: f64) -> f64 {
    let zone = arena.zone_bounds(arena.clusters[cluster_id].zone);
    let b = arena.cluster_bounds(cluster_id);
    if dy < 0.0 {
        dy.max((zone.min_y - b.min.y).min(0.0))
    } else {
        dy.min((zone.max_y - b.max.y).max(0.0))
    }
}

fn too_close(arena: &Arena, i: usize, j: usize, options: &SkillTreeOptions) -> bool {
    let (a, b) = (&arena.clusters[i], &arena.clusters[j]);
    a.zone == b.zone
        && (a.anchor.x - b.anchor.x).abs() < options.min_x_gap
        && (a.anchor.y - b.anchor.y).abs() < options.min_y_gap
}

fn count_violations(arena: &Arena, options: &SkillTreeOptions) -> usize {
    let n = arena.clusters.len();
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .filter(|&(i, j)| too_close(arena, i, j, options))
        .count()
}

/// Pushes apart area nodes of the same zone that sit closer than `min_x_gap` horizontally and
/// `min_y_gap` vertically at the same time.
pub(crate) fn separate_area_nodes(arena: &mut Arena, options: &SkillTreeOptions) {
    let n = arena.clusters.len();
    for _ in 0..options.separation_max_iterations {
        let mut violations = 0usize;
        let mut moved = false;

        for i in 0..n {
            for j in (i + 1)..n {
                if !too_close(arena, i, j, options) {
                    continue;
                }
                violations += 1;

                let (a, b) = (&arena.clusters[i], &arena.clusters[j]);
                let dy = (a.anchor.y - b.anchor.y).abs();
                // On a tie the earlier cluster moves away from the root.
                let (up, down) = if a.anchor.y < b.anchor.y {
                    (i, j)
                } else if b.anchor.y < a.anchor.y {
                    (j, i)
                } else if a.zone == SkillZone::Upper {
                    (i, j)
                } else {
                    (j, i)
                };

                let need = options.min_y_gap + SEPARATION_SLACK - dy;
                let half = need / 2.0;

                let up_shift = allowed_shift(arena, up, -half);
                arena.translate_cluster(up, 0.0, up_shift);
                let down_want = need + up_shift;
                let down_shift = allowed_shift(arena, down, down_want);
                arena.translate_cluster(down, 0.0, down_shift);
                let rest = down_want - down_shift;
                let mut extra = 0.0;
                if rest > EPS {
                    extra = allowed_shift(arena, up, -rest);
                    arena.translate_cluster(up, 0.0, extra);
                }

                if up_shift.abs() + down_shift.abs() + extra.abs() > EPS {
                    moved = true;
                }
            }
        }

        if violations == 0 {
            return;
        }
        if !moved {
            break;
        }
    }

    settle_outward(arena, options);
    let left = count_violations(arena, options);
    if left > 0 {
        tracing::warn!(violations = left, "area nodes cannot be separated inside their zone");
    }
}

/// Walks each zone from the root outwards and moves every node away from the root until it
/// clears the nodes already visited. Visited nodes never move again, so every pair settled here
/// stays settled.
fn settle_outward(arena: &mut Arena, options: &SkillTreeOptions) {
    let n = arena.clusters.len();
    for zone in [SkillZone::Upper, SkillZone::Root] {
        // Outward coordinate: grows with the distance from the root along y.
        let outward = match zone {
            SkillZone::Upper => -1.0,
            SkillZone::Root => 1.0,
        };
        let o = |arena: &Arena, id: usize| outward * arena.clusters[id].anchor.y;

        let mut ids: Vec<usize> = (0..n).filter(|&i| arena.clusters[i].zone == zone).collect();
        ids.sort_by(|&a, &b| {
            o(&*arena, a)
                .total_cmp(&o(&*arena, b))
                .then_with(|| a.cmp(&b))
        });

        for (pos, &id) in ids.iter().enumerate() {
            let x = arena.clusters[id].anchor.x;
            let here = o(&*arena, id);
            let neighbours: Vec<f64> = ids[..pos]
                .iter()
                .filter(|&&k| (arena.clusters[k].anchor.x - x).abs() < options.min_x_gap)
                .map(|&k| o(&*arena, k))
                .collect();
            let clears =
                |s: f64| neighbours.iter().all(|ok| (here + s - ok).abs() >= options.min_y_gap);

            let shift = std::iter::once(0.0)
                .chain(
                    neighbours
                        .iter()
                        .map(|ok| ok + options.min_y_gap + SEPARATION_SLACK - here),
                )
                .filter(|&s| s >= 0.0 && clears(s))
                .min_by(f64::total_cmp)
                .unwrap_or(0.0);
            if shift > 0.0 {
                let dy = allowed_shift(arena, id, outward * shift);
                arena.translate_cluster(id, 0.0, dy);
            }
        }
    }
}

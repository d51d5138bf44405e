use super::SkillTreeOptions;
use super::arena::Arena;
use folio_core::geom::{Box2D, boxes_overlap, clamp};

/// Moves leaves vertically until no label box overlaps an area node or an earlier label box.
///
/// Leaves are visited top to bottom, then left to right. Returns the indices of leaves that kept
/// their original height because no free slot exists inside their zone.
pub(crate) fn resolve_leaf_overlaps(arena: &mut Arena, options: &SkillTreeOptions) -> Vec<usize> {
    let nodes: Vec<Box2D> = arena.clusters.values().map(|c| c.node_box()).collect();

    let mut order: Vec<usize> = (0..arena.leaves.len()).collect();
    order.sort_by(|&a, &b| {
        let (ba, bb) = (arena.leaves[a].label_box(), arena.leaves[b].label_box());
        ba.min
            .y
            .total_cmp(&bb.min.y)
            .then_with(|| ba.min.x.total_cmp(&bb.min.x))
            .then_with(|| a.cmp(&b))
    });

    let mut placed: Vec<Box2D> = Vec::with_capacity(order.len());
    let mut unresolved = Vec::new();
    for li in order {
        let leaf = arena.leaves[li].clone();
        let zone = arena.zone_bounds(arena.clusters[leaf.cluster_id].zone);
        let lo = zone.min_y + leaf.box_height / 2.0;
        let hi = zone.max_y - leaf.box_height / 2.0;
        let natural = leaf.y;

        let is_free = |y: f64| {
            let b = leaf.label_box_at(y);
            !nodes
                .iter()
                .chain(placed.iter())
                .any(|o| boxes_overlap(&b, o, options.box_gap))
        };

        let mut found = (0..=options.overlap_max_steps).find_map(|step| {
            let k = step.div_ceil(2) as f64;
            let sign = if step % 2 == 1 { 1.0 } else { -1.0 };
            let y = clamp(natural + sign * k * options.overlap_step, lo, hi);
            is_free(y).then_some(y)
        });

        if found.is_none() && hi >= lo {
            let slots = ((hi - lo) / options.overlap_step).ceil() as usize;
            found = (0..=slots)
                .map(|j| (lo + j as f64 * options.overlap_step).min(hi))
                .filter(|&y| is_free(y))
                .min_by(|a, b| (a - natural).abs().total_cmp(&(b - natural).abs()));
        }

        match found {
            Some(y) => arena.leaves[li].y = y,
            None => {
                tracing::warn!(leaf = li, y = natural, "label box overlap left unresolved");
                unresolved.push(li);
            }
        }
        placed.push(arena.leaves[li].label_box());
    }

    unresolved.sort_unstable();
    unresolved
}

use super::SkillTreeOptions;
use super::arena::Arena;
use crate::model::{LayoutPoint, SkillEdgeKind, SkillEdgeLayout, ViewBox};
use folio_core::RoadmapTopic;
use folio_core::geom::{Box2D, centered_rect, point, union_all};

pub(crate) fn edges(arena: &Arena, topics: &[RoadmapTopic]) -> Vec<SkillEdgeLayout> {
    let root = arena.root;
    let mut out = Vec::with_capacity(arena.clusters.len() + arena.leaves.len());
    for cluster in arena.clusters.values() {
        let a = cluster.anchor;
        let mid_y = (root.y + a.y) / 2.0;
        out.push(SkillEdgeLayout {
            kind: SkillEdgeKind::RootToArea,
            from: "root".to_string(),
            to: cluster.area.clone(),
            start: root.into(),
            c1: point(root.x, mid_y).into(),
            c2: point(a.x, mid_y).into(),
            end: a.into(),
        });

        let side = f64::from(cluster.side);
        let start = point(a.x + side * cluster.node_width / 2.0, a.y);
        for &li in &cluster.leaves {
            let leaf = &arena.leaves[li];
            let end = point(leaf.x - side * leaf.radius, leaf.y);
            let mid_x = (start.x + end.x) / 2.0;
            out.push(SkillEdgeLayout {
                kind: SkillEdgeKind::AreaToTopic,
                from: cluster.area.clone(),
                to: topics[leaf.topic].id.clone(),
                start: start.into(),
                c1: point(mid_x, start.y).into(),
                c2: point(mid_x, end.y).into(),
                end: end.into(),
            });
        }
    }
    out
}

/// Bounding box of everything drawn, padded and clipped to the canvas.
pub(crate) fn fit_view_box(
    arena: &Arena,
    edges: &[SkillEdgeLayout],
    options: &SkillTreeOptions,
) -> ViewBox {
    let root_disk = centered_rect(
        arena.root,
        options.root_radius * 2.0,
        options.root_radius * 2.0,
    );
    let curve_points = edges
        .iter()
        .flat_map(|e| [e.start, e.c1, e.c2, e.end])
        .map(|p: LayoutPoint| Box2D::new(point(p.x, p.y), point(p.x, p.y)));
    let content = union_all(
        std::iter::once(root_disk)
            .chain(arena.clusters.values().map(|c| c.node_box()))
            .chain(arena.leaves.iter().map(|l| l.body_box()))
            .chain(curve_points),
    )
    .unwrap_or(root_disk)
    .inflate(options.viewport_padding, options.viewport_padding);

    let clip = |lo: f64, hi: f64, limit: f64| {
        let lo = lo.clamp(0.0, limit);
        let hi = hi.clamp(lo, limit);
        (lo, hi - lo)
    };
    let (x, width) = clip(content.min.x, content.max.x, options.canvas_width);
    let (y, height) = clip(content.min.y, content.max.y, options.canvas_height);
    ViewBox {
        view_box_x: x,
        view_box_y: y,
        view_box_width: width,
        view_box_height: height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::DeterministicTextMeasurer;

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn empty_tree_frames_the_root() {
        let options = SkillTreeOptions {
            foundation_areas: Vec::new(),
            ..Default::default()
        };
        let arena = Arena::build(&[], &options, &DeterministicTextMeasurer::default());
        let vb = fit_view_box(&arena, &[], &options);
        let r = options.root();
        let half = options.root_radius + options.viewport_padding;
        approx(vb.view_box_x, r.x - half);
        approx(vb.view_box_y, r.y - half);
        approx(vb.view_box_width, half * 2.0);
        approx(vb.view_box_height, half * 2.0);
    }

    #[test]
    fn view_box_is_clipped_to_the_canvas() {
        let options = SkillTreeOptions {
            canvas_width: 100.0,
            canvas_height: 80.0,
            foundation_areas: Vec::new(),
            ..Default::default()
        };
        let arena = Arena::build(&[], &options, &DeterministicTextMeasurer::default());
        let vb = fit_view_box(&arena, &[], &options);
        assert_eq!(vb.view_box_x, 0.0);
        assert_eq!(vb.view_box_y, 0.0);
        assert_eq!(vb.view_box_width, 100.0);
        assert_eq!(vb.view_box_height, 80.0);
    }
}

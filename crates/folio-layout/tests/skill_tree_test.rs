use folio_core::geom::{boxes_overlap, rect};
use folio_core::{FolioConfig, RoadmapTopic, TopicStatus};
use folio_layout::model::{SkillEdgeKind, SkillTopicLayout, SkillZone, TextAnchor};
use folio_layout::skill_tree::leaf_radius;
use folio_layout::{DeterministicTextMeasurer, Error, SkillTreeOptions, layout_skill_tree};
use serde_json::json;

fn topic(id: &str, area: &str, progress: f64) -> RoadmapTopic {
    RoadmapTopic::new(id, area, format!("{area} topic {id}"), TopicStatus::Studying, progress)
}

fn portfolio() -> Vec<RoadmapTopic> {
    vec![
        topic("be-1", "Backend", 80.0),
        topic("be-2", "Backend", 40.0),
        topic("be-3", "Backend", 65.0),
        topic("be-4", "Backend", 10.0),
        topic("fe-1", "Frontend", 55.0),
        topic("fe-2", "Frontend", 20.0),
        topic("fe-3", "Frontend", 95.0),
        topic("da-1", "Data", 30.0),
        topic("da-2", "Data", 60.0),
        topic("cl-1", "Cloud", 0.0),
        topic("cl-2", "Cloud", 100.0),
        topic("fu-1", "Fundamentals", 90.0),
        topic("fu-2", "Fundamentals", 70.0),
        topic("la-1", "Languages", 50.0),
        topic("la-2", "Languages", 35.0),
        topic("to-1", "Tooling", 25.0),
    ]
}

fn label_box(t: &SkillTopicLayout) -> folio_core::geom::Box2D {
    rect(t.box_x, t.box_y, t.box_width, t.box_height)
}

#[test]
fn layout_is_deterministic() {
    let topics = portfolio();
    let options = SkillTreeOptions::default();
    let measurer = DeterministicTextMeasurer::default();
    let a = layout_skill_tree(&topics, &options, &measurer).unwrap();
    let b = layout_skill_tree(&topics, &options, &measurer).unwrap();
    assert_eq!(a, b);
}

#[test]
fn zones_and_area_order() {
    let layout = layout_skill_tree(
        &portfolio(),
        &SkillTreeOptions::default(),
        &DeterministicTextMeasurer::default(),
    )
    .unwrap();

    let areas: Vec<(&str, SkillZone)> = layout
        .areas
        .iter()
        .map(|a| (a.area.as_str(), a.zone))
        .collect();
    assert_eq!(
        areas,
        vec![
            ("Backend", SkillZone::Upper),
            ("Frontend", SkillZone::Upper),
            ("Cloud", SkillZone::Upper),
            ("Data", SkillZone::Upper),
            ("Fundamentals", SkillZone::Root),
            ("Languages", SkillZone::Root),
            ("Tooling", SkillZone::Root),
        ]
    );
    for (i, a) in layout.areas.iter().enumerate() {
        assert_eq!(a.cluster_id, i);
        match a.zone {
            SkillZone::Upper => assert!(a.y < layout.root.y),
            SkillZone::Root => assert!(a.y > layout.root.y),
        }
    }
    assert_eq!(layout.topics.len(), 16);
    // Output keeps the input topic order.
    assert_eq!(layout.topics[0].id, "be-1");
    assert_eq!(layout.topics[15].id, "to-1");
}

#[test]
fn label_boxes_of_a_cluster_never_overlap() {
    let layout = layout_skill_tree(
        &portfolio(),
        &SkillTreeOptions::default(),
        &DeterministicTextMeasurer::default(),
    )
    .unwrap();
    assert!(layout.unresolved_topic_ids.is_empty());

    for (i, a) in layout.topics.iter().enumerate() {
        for b in &layout.topics[i + 1..] {
            if a.cluster_id == b.cluster_id {
                assert!(
                    !boxes_overlap(&label_box(a), &label_box(b), 0.0),
                    "{} overlaps {}",
                    a.id,
                    b.id
                );
            }
        }
    }
}

#[test]
fn area_nodes_of_a_zone_keep_their_distance() {
    let options = SkillTreeOptions::default();
    let layout = layout_skill_tree(
        &portfolio(),
        &options,
        &DeterministicTextMeasurer::default(),
    )
    .unwrap();

    for (i, a) in layout.areas.iter().enumerate() {
        for b in &layout.areas[i + 1..] {
            if a.zone != b.zone {
                continue;
            }
            let too_close =
                (a.x - b.x).abs() < options.min_x_gap && (a.y - b.y).abs() < options.min_y_gap;
            assert!(!too_close, "{} and {} are too close", a.area, b.area);
        }
    }
}

#[test]
fn leaf_radius_grows_with_progress() {
    let topics: Vec<RoadmapTopic> = [10.0, 50.0, 90.0, 30.0, 70.0]
        .into_iter()
        .enumerate()
        .map(|(i, p)| topic(&format!("t{i}"), "Systems", p))
        .collect();
    let layout = layout_skill_tree(
        &topics,
        &SkillTreeOptions::default(),
        &DeterministicTextMeasurer::default(),
    )
    .unwrap();

    let mut by_progress: Vec<&SkillTopicLayout> = layout.topics.iter().collect();
    by_progress.sort_by(|a, b| a.progress.total_cmp(&b.progress));
    for pair in by_progress.windows(2) {
        assert!(pair[0].radius <= pair[1].radius);
    }

    let options = SkillTreeOptions::default();
    assert_eq!(leaf_radius(0.0, &options), options.orb_min_radius);
    assert_eq!(leaf_radius(100.0, &options), options.orb_max_radius);
    assert_eq!(leaf_radius(250.0, &options), options.orb_max_radius);
}

#[test]
fn text_anchor_follows_the_side() {
    let layout = layout_skill_tree(
        &portfolio(),
        &SkillTreeOptions::default(),
        &DeterministicTextMeasurer::default(),
    )
    .unwrap();
    for t in &layout.topics {
        let side = layout.areas[t.cluster_id].side;
        if side > 0 {
            assert_eq!(t.text_anchor, TextAnchor::Start);
            assert_eq!(t.box_anchor_x, t.box_x);
            assert!(t.x > t.area_x);
        } else {
            assert_eq!(t.text_anchor, TextAnchor::End);
            assert_eq!(t.box_anchor_x, t.box_x + t.box_width);
            assert!(t.x < t.area_x);
        }
        assert!(t.box_width >= 238.0 && t.box_width <= 380.0);
        assert_eq!(t.box_height, 40.0);
    }
}

#[test]
fn view_box_stays_inside_the_canvas() {
    let options = SkillTreeOptions::default();
    let layout = layout_skill_tree(
        &portfolio(),
        &options,
        &DeterministicTextMeasurer::default(),
    )
    .unwrap();
    let vb = &layout.view_box;
    assert!(vb.view_box_x >= 0.0 && vb.view_box_y >= 0.0);
    assert!(vb.view_box_width <= options.canvas_width);
    assert!(vb.view_box_height <= options.canvas_height);
    assert!(vb.view_box_x + vb.view_box_width <= options.canvas_width);
    assert!(vb.view_box_y + vb.view_box_height <= options.canvas_height);
}

#[test]
fn edges_link_root_areas_and_topics() {
    let layout = layout_skill_tree(
        &portfolio(),
        &SkillTreeOptions::default(),
        &DeterministicTextMeasurer::default(),
    )
    .unwrap();
    let root_edges = layout
        .edges
        .iter()
        .filter(|e| e.kind == SkillEdgeKind::RootToArea)
        .count();
    assert_eq!(root_edges, layout.areas.len());
    assert_eq!(layout.edges.len(), layout.areas.len() + layout.topics.len());
    for e in &layout.edges {
        if e.kind == SkillEdgeKind::RootToArea {
            assert_eq!(e.start, layout.root);
            assert_eq!(e.c1.y, e.c2.y);
        }
    }
}

#[test]
fn empty_foundation_area_keeps_a_zero_height_band() {
    let topics = vec![topic("a", "Backend", 50.0)];
    let layout = layout_skill_tree(
        &topics,
        &SkillTreeOptions::default(),
        &DeterministicTextMeasurer::default(),
    )
    .unwrap();
    let tooling = layout.areas.iter().find(|a| a.area == "Tooling").unwrap();
    assert_eq!(tooling.zone, SkillZone::Root);
    assert_eq!(tooling.topic_count, 0);
    assert_eq!(tooling.band_top, tooling.band_bottom);
}

#[test]
fn empty_roadmap_yields_only_the_root() {
    let options = SkillTreeOptions {
        foundation_areas: Vec::new(),
        ..Default::default()
    };
    let layout = layout_skill_tree(&[], &options, &DeterministicTextMeasurer::default()).unwrap();
    assert!(layout.areas.is_empty());
    assert!(layout.topics.is_empty());
    assert!(layout.edges.is_empty());
    assert_eq!(layout.compaction_iterations, 1);

    let vb = &layout.view_box;
    let half = options.root_radius + options.viewport_padding;
    assert!((vb.view_box_width - half * 2.0).abs() < 1e-9);
    assert!(vb.view_box_x < layout.root.x && layout.root.x < vb.view_box_x + vb.view_box_width);
}

#[test]
fn invalid_canvas_is_rejected() {
    let options = SkillTreeOptions {
        canvas_width: -1.0,
        ..Default::default()
    };
    let measurer = DeterministicTextMeasurer::default();
    let err = layout_skill_tree(&portfolio(), &options, &measurer).unwrap_err();
    assert!(matches!(err, Error::InvalidOptions { .. }));
}

#[test]
fn options_are_read_from_config() {
    let cfg = FolioConfig::from_value(json!({
        "skillTree": { "canvasWidth": 3000, "foundationAreas": ["Math"], "minYGap": 120 }
    }));
    let options = SkillTreeOptions::from_config(&cfg);
    assert_eq!(options.canvas_width, 3000.0);
    assert_eq!(options.canvas_height, 1800.0);
    assert_eq!(options.min_y_gap, 120.0);
    assert_eq!(options.foundation_areas, vec!["Math"]);
}

#[test]
fn layout_serializes_with_camel_case_keys() {
    let layout = layout_skill_tree(
        &portfolio(),
        &SkillTreeOptions::default(),
        &DeterministicTextMeasurer::default(),
    )
    .unwrap();
    let value = serde_json::to_value(&layout).unwrap();
    assert!(value["viewBoxWidth"].is_number());
    assert!(value["topics"][0]["boxAnchorX"].is_number());
    assert!(matches!(
        value["topics"][0]["textAnchor"].as_str(),
        Some("start" | "end")
    ));
    assert_eq!(value["areas"][4]["zone"], json!("root"));
}

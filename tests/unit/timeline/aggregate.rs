use super::*;
use crate::model::script::SlideScript;

fn header(ids: &[&str]) -> ShowHeader {
    ShowHeader {
        slide_list: ids.iter().map(|s| s.to_string()).collect(),
        slide_width: 1024.0,
        slide_height: 768.0,
        extra: Map::new(),
    }
}

fn fragment(id: &str, scenes: usize) -> Fragment {
    let events = (0..scenes)
        .map(|i| {
            let mut s = Scene::default();
            s.base_layer.initial_state.width = i as f64;
            s
        })
        .collect();
    Fragment::new(
        id,
        SlideScript {
            events,
            ..SlideScript::default()
        },
    )
}

#[test]
fn barrier_waits_for_every_fragment() {
    let mut agg = Aggregator::new(header(&["a", "b", "c"])).unwrap();
    assert_eq!(
        agg.report_loaded(fragment("c", 1)).unwrap(),
        BarrierState::Waiting {
            reported: 1,
            expected: 3
        }
    );
    assert!(agg.merge().unwrap().is_none());
    agg.report_loaded(fragment("a", 2)).unwrap();
    assert!(agg.merge().unwrap().is_none());
    assert_eq!(
        agg.report_loaded(fragment("b", 0)).unwrap(),
        BarrierState::Complete
    );
    assert!(agg.merge().unwrap().is_some());
}

#[test]
fn merge_follows_slide_list_not_arrival_order() {
    let mut agg = Aggregator::new(header(&["a", "b", "c"])).unwrap();
    agg.report_loaded(fragment("c", 1)).unwrap();
    agg.report_loaded(fragment("b", 3)).unwrap();
    agg.report_loaded(fragment("a", 2)).unwrap();
    let script = agg.merge().unwrap().unwrap();

    assert_eq!(script.num_scenes(), 6);
    assert_eq!(script.last_scene_index(), Some(5));
    assert_eq!(script.last_slide_index(), Some(2));
    assert_eq!(script.scene_index_from_slide, vec![0, 2, 5]);
    assert_eq!(script.slide_index_from_scene, vec![0, 0, 1, 1, 1, 2]);
    // Relative order inside a slide is preserved.
    let widths: Vec<f64> = script
        .scenes()
        .iter()
        .map(|s| s.base_layer.initial_state.width)
        .collect();
    assert_eq!(widths, vec![0.0, 1.0, 0.0, 1.0, 2.0, 0.0]);
    assert_eq!(script.scenes(), script.original_scenes());
}

#[test]
fn scene_ranges_partition_the_timeline() {
    let counts = [2usize, 0, 3, 1];
    let ids = ["s0", "s1", "s2", "s3"];
    let mut agg = Aggregator::new(header(&ids)).unwrap();
    for (id, n) in ids.iter().zip(counts) {
        agg.report_loaded(fragment(id, n)).unwrap();
    }
    let script = agg.merge().unwrap().unwrap();
    assert_eq!(script.num_scenes(), counts.iter().sum::<usize>());

    for (i, n) in counts.iter().enumerate() {
        let start = script.scene_index_from_slide(i).unwrap();
        let next = script
            .scene_index_from_slide(i + 1)
            .unwrap_or(script.num_scenes());
        assert_eq!(next - start, *n);
        assert_eq!(script.slide_scene_range(i), Some(start..next));
    }

    for s in 0..script.num_scenes() {
        let slide = script.slide_index_from_scene(s).unwrap();
        let range = script.slide_scene_range(slide).unwrap();
        assert!(range.contains(&s));
    }
}

#[test]
fn queries_are_bounds_checked() {
    let mut agg = Aggregator::new(header(&["a"])).unwrap();
    agg.report_loaded(fragment("a", 1)).unwrap();
    let script = agg.merge().unwrap().unwrap();
    assert_eq!(script.scene_index_from_slide(1), None);
    assert_eq!(script.slide_index_from_scene(1), None);
    assert_eq!(script.slide_scene_range(3), None);
}

#[test]
fn any_failure_blocks_the_merge() {
    let mut agg = Aggregator::new(header(&["a", "b"])).unwrap();
    agg.report_failed("b", "404").unwrap();
    assert!(agg.merge().unwrap().is_none());
    let state = agg.report_loaded(fragment("a", 1)).unwrap();
    assert!(matches!(state, BarrierState::Failed(ref r) if r.contains("404")));
    assert!(matches!(agg.merge(), Err(ShowError::Load(_))));
}

#[test]
fn duplicate_reports_do_not_advance_the_barrier() {
    let mut agg = Aggregator::new(header(&["a", "b"])).unwrap();
    agg.report_loaded(fragment("a", 1)).unwrap();
    let state = agg.report_loaded(fragment("a", 1)).unwrap();
    assert_eq!(
        state,
        BarrierState::Waiting {
            reported: 1,
            expected: 2
        }
    );
}

#[test]
fn unknown_slides_and_second_merges_are_rejected() {
    let mut agg = Aggregator::new(header(&["a"])).unwrap();
    assert!(matches!(
        agg.report_loaded(fragment("zz", 1)),
        Err(ShowError::Validation(_))
    ));
    agg.report_loaded(fragment("a", 1)).unwrap();
    assert!(agg.merge().unwrap().is_some());
    assert!(matches!(agg.merge(), Err(ShowError::Validation(_))));
}

#[test]
fn authoring_dimensions_become_the_scale_baseline() {
    let mut agg = Aggregator::new(header(&["a"])).unwrap();
    agg.report_loaded(fragment("a", 1)).unwrap();
    let script = agg.merge().unwrap().unwrap();
    assert_eq!(script.original_slide_size(), Size::new(1024.0, 768.0));
    assert_eq!(script.slide_size(), script.original_slide_size());
    assert_eq!(script.scale_factor(), 1.0);
    assert!(!script.quirks_applied());
}

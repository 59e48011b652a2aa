use serde_json::Map;

use super::*;
use crate::{
    foundation::core::{Point, RectValue},
    model::header::ShowHeader,
    model::script::{Hyperlink, SizeValue, SlideScript},
    timeline::aggregate::merge_fragments,
    timeline::fragment::Fragment,
};

fn show(scenes: Vec<Scene>) -> ShowScript {
    let header = ShowHeader {
        slide_list: vec!["s1".to_string()],
        slide_width: 1024.0,
        slide_height: 768.0,
        extra: Map::new(),
    };
    let fragment = Fragment::new(
        "s1",
        SlideScript {
            events: scenes,
            ..SlideScript::default()
        },
    );
    merge_fragments(&header, vec![fragment]).unwrap()
}

fn layer(width: f64, height: f64, x: f64, y: f64) -> Layer {
    let mut l = Layer::default();
    l.initial_state.width = width;
    l.initial_state.height = height;
    l.initial_state.position = Point::new(x, y);
    l
}

fn anim(property: &str, from: AnimValue, to: AnimValue) -> Animation {
    Animation {
        property: property.to_string(),
        duration: 1.0,
        from: Some(from),
        to: Some(to),
        ..Animation::default()
    }
}

fn scalar(v: &Option<AnimValue>) -> f64 {
    v.as_ref().and_then(AnimValue::as_number).unwrap()
}

#[test]
fn layer_geometry_follows_the_fit_factor() {
    let mut base = layer(1024.0, 768.0, 512.0, 384.0);
    base.initial_state.affine_transform = [1.0, 0.0, 0.0, 1.0, 10.0, 20.0];
    let mut script = show(vec![Scene {
        base_layer: base,
        ..Scene::default()
    }]);

    let k = crate::scale::fit::compute_scale_factor(
        script.original_slide_size(),
        Size::new(800.0, 400.0),
    )
    .unwrap();
    apply_scale(&mut script, k).unwrap();

    let st = &script.scenes()[0].base_layer.initial_state;
    assert!((st.height - 400.0).abs() < 1e-9);
    assert!((st.width - 1024.0 * 400.0 / 768.0).abs() < 1e-9);
    assert!((st.position.y - 200.0).abs() < 1e-9);
    assert!((st.affine_transform[5] - 20.0 * k).abs() < 1e-12);
    assert_eq!(st.affine_transform[0], 1.0);
    assert!((script.slide_size().height - 400.0).abs() < 1e-9);
    assert_eq!(script.scale_factor(), k);
    // Authoring values are never touched.
    assert_eq!(script.original_scenes()[0].base_layer.initial_state.width, 1024.0);
}

#[test]
fn rescaling_always_starts_from_the_original() {
    let mut base = layer(300.0, 200.0, 150.0, 100.0);
    base.animations.push(anim(
        "position",
        AnimValue::Point(Point::new(0.0, 0.0)),
        AnimValue::Point(Point::new(333.0, 77.0)),
    ));
    let scene = Scene {
        base_layer: base,
        ..Scene::default()
    };

    let mut twice = show(vec![scene.clone()]);
    apply_scale(&mut twice, 0.37).unwrap();
    apply_scale(&mut twice, 1.9).unwrap();

    let mut once = show(vec![scene]);
    apply_scale(&mut once, 1.9).unwrap();

    assert_eq!(twice.scenes(), once.scenes());
    assert_eq!(twice.slide_size(), once.slide_size());
}

#[test]
fn ratio_channels_and_depth_markers_are_preserved() {
    let mut base = layer(10.0, 10.0, 5.0, 5.0);
    base.animations = vec![
        anim("transform.scale.x", AnimValue::number(0.5), AnimValue::number(2.0)),
        anim("transform.translation.z", AnimValue::number(1.0), AnimValue::number(0.01)),
        anim("transform.translation.z", AnimValue::number(5.0), AnimValue::number(-4.0)),
        anim("zPosition", AnimValue::number(3.0), AnimValue::number(6.0)),
        anim("opacity", AnimValue::number(0.0), AnimValue::number(1.0)),
    ];
    let mut script = show(vec![Scene {
        base_layer: base,
        ..Scene::default()
    }]);
    apply_scale(&mut script, 2.0).unwrap();

    let a = &script.scenes()[0].base_layer.animations;
    assert_eq!((scalar(&a[0].from), scalar(&a[0].to)), (0.5, 2.0));
    assert_eq!((scalar(&a[1].from), scalar(&a[1].to)), (1.0, 0.01));
    assert_eq!((scalar(&a[2].from), scalar(&a[2].to)), (10.0, -8.0));
    assert_eq!((scalar(&a[3].from), scalar(&a[3].to)), (6.0, 12.0));
    assert_eq!((scalar(&a[4].from), scalar(&a[4].to)), (0.0, 1.0));
}

#[test]
fn transform_bounds_and_paths_scale_their_pixel_components() {
    let mut matrix: Vec<f64> = (0..16).map(f64::from).collect();
    matrix[0] = 1.0;
    let mut keyed = anim(
        "transform",
        AnimValue::Transform {
            transform: matrix.clone(),
        },
        AnimValue::Transform {
            transform: matrix.clone(),
        },
    );
    keyed.values = Some(vec![AnimValue::Transform {
        transform: matrix.clone(),
    }]);
    let bounds = anim(
        "bounds",
        AnimValue::Size(SizeValue {
            width: 100.0,
            height: 50.0,
        }),
        AnimValue::Size(SizeValue {
            width: 10.0,
            height: 5.0,
        }),
    );
    let mut moved = Animation {
        property: "position".to_string(),
        path: Some(vec![crate::model::script::PathSegment {
            points: vec![[10.0, 20.0], [30.0, 40.0]],
        }]),
        ..Animation::default()
    };
    moved.animations.push(anim(
        "transform.translation.x",
        AnimValue::number(7.0),
        AnimValue::number(8.0),
    ));

    let mut base = layer(1.0, 1.0, 0.0, 0.0);
    base.animations = vec![keyed, bounds, moved];
    let mut script = show(vec![Scene {
        base_layer: base,
        ..Scene::default()
    }]);
    apply_scale(&mut script, 3.0).unwrap();

    let a = &script.scenes()[0].base_layer.animations;
    let Some(AnimValue::Transform { transform }) = &a[0].values.as_ref().unwrap().first() else {
        panic!("transform sample expected");
    };
    assert_eq!(&transform[..12], &matrix[..12]);
    assert_eq!(&transform[12..15], &[36.0, 39.0, 42.0]);
    assert_eq!(transform[15], 15.0);
    assert_eq!(
        a[1].from,
        Some(AnimValue::Size(SizeValue {
            width: 300.0,
            height: 150.0
        }))
    );
    let path = a[2].path.as_ref().unwrap();
    assert_eq!(path[0].points, vec![[30.0, 60.0], [30.0, 40.0]]);
    assert_eq!(scalar(&a[2].animations[0].to), 24.0);
}

#[test]
fn tile_effects_are_recut_against_the_scaled_show() {
    let mut container = Layer::default();
    for col in 0..2 {
        let mut tile = layer(512.0, 768.0, 256.0 + 512.0 * f64::from(col), 384.0);
        tile.initial_state.contents_rect =
            Some(RectValue::new(0.5 * f64::from(col), 0.0, 0.5, 1.0));
        container.layers.push(tile);
    }
    let mut root = Layer::default();
    root.layers.push(container);
    let effect = Effect {
        name: "com.apple.iWork.Keynote.BLTBlinds".to_string(),
        kind: "transition".to_string(),
        duration: 1.0,
        base_layer: root,
        ..Effect::default()
    };
    let mut script = show(vec![Scene {
        effects: vec![effect],
        ..Scene::default()
    }]);
    // 1024 * 0.5005 = 512.512 -> tiles 256 and 256.512 wide.
    apply_scale(&mut script, 0.5005).unwrap();

    let tiles = &script.scenes()[0].effects[0].base_layer.layers[0].layers;
    let show_w = 1024.0 * 0.5005;
    let first = &tiles[0].initial_state;
    assert_eq!(first.width, 256.0);
    assert_eq!(first.position.x, 128.0);
    let second = &tiles[1].initial_state;
    assert!((second.width - (show_w - 256.0)).abs() < 1e-9);
    assert!((second.position.x - (256.0 + second.width / 2.0)).abs() < 1e-9);
    let crop = second.contents_rect.unwrap();
    assert!((crop.x - 256.0 / show_w).abs() < 1e-12);
    assert!((crop.x + crop.width - 1.0).abs() < 1e-12);
}

#[test]
fn a_degenerate_tile_crop_is_a_structure_error() {
    let mut tile = layer(1024.0, 768.0, 512.0, 384.0);
    tile.initial_state.contents_rect = Some(RectValue::new(0.999, 0.0, 1e-10, 1.0));
    let mut container = Layer::default();
    container.layers.push(tile);
    let mut root = Layer::default();
    root.layers.push(container);
    let effect = Effect {
        name: "com.apple.iWork.Keynote.BLTBlinds".to_string(),
        kind: "transition".to_string(),
        duration: 1.0,
        base_layer: root,
        ..Effect::default()
    };
    let mut script = show(vec![Scene {
        effects: vec![effect],
        ..Scene::default()
    }]);

    assert!(matches!(
        apply_scale(&mut script, 0.5),
        Err(ShowError::Structure(_))
    ));
}

#[test]
fn hyperlinks_and_their_state_scenes_are_scaled() {
    let mut states = std::collections::BTreeMap::new();
    states.insert(
        "hover".to_string(),
        Scene {
            base_layer: layer(40.0, 20.0, 20.0, 10.0),
            ..Scene::default()
        },
    );
    let link = Hyperlink {
        target_rectangle: RectValue::new(10.0, 20.0, 30.0, 40.0),
        events: states,
        ..Hyperlink::default()
    };
    let mut script = show(vec![Scene {
        hyperlinks: vec![link],
        ..Scene::default()
    }]);
    apply_scale(&mut script, 0.5).unwrap();

    let link = &script.scenes()[0].hyperlinks[0];
    assert_eq!(link.target_rectangle, RectValue::new(5.0, 10.0, 15.0, 20.0));
    assert_eq!(link.events["hover"].base_layer.initial_state.width, 20.0);
}

#[test]
fn non_positive_factors_are_rejected() {
    let mut script = show(vec![Scene::default()]);
    assert!(matches!(
        apply_scale(&mut script, 0.0),
        Err(ShowError::Validation(_))
    ));
    assert!(apply_scale(&mut script, f64::INFINITY).is_err());
    assert_eq!(script.scale_factor(), 1.0);
}

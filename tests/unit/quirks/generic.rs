use super::*;
use crate::foundation::error::ShowError;
use crate::model::script::Layer;

fn tagged(width: f64) -> Layer {
    let mut l = Layer::default();
    l.initial_state.width = width;
    l
}

fn widths(layers: &[Layer]) -> Vec<f64> {
    layers.iter().map(|l| l.initial_state.width).collect()
}

fn effect(name: &str, kind: &str, children: Vec<Layer>) -> Effect {
    let mut inner = Layer::default();
    inner.layers = children;
    let mut base = Layer::default();
    base.layers.push(inner);
    Effect {
        name: name.to_string(),
        kind: kind.to_string(),
        base_layer: base,
        ..Effect::default()
    }
}

fn run(rule: fn(Paired<'_, Effect>) -> ShowResult<()>, mut cur: Effect) -> ShowResult<Effect> {
    let mut orig = cur.clone();
    rule(Paired::new(&mut cur, &mut orig))?;
    assert_eq!(cur, orig, "both trees must receive the same edit");
    Ok(cur)
}

#[test]
fn blinds_transition_drops_two_control_layers() {
    let e = effect(
        "com.apple.iWork.Keynote.BLTBlinds",
        "transition",
        (0..5).map(|i| tagged(f64::from(i))).collect(),
    );
    let out = run(blinds_transition, e).unwrap();
    assert_eq!(widths(&out.base_layer.layers[0].layers), vec![2.0, 3.0, 4.0]);
}

#[test]
fn blinds_build_is_left_alone() {
    let e = effect(
        "com.apple.iWork.Keynote.BLTBlinds",
        "buildIn",
        (0..3).map(|i| tagged(f64::from(i))).collect(),
    );
    let before = e.clone();
    assert_eq!(run(blinds_transition, e).unwrap(), before);
}

#[test]
fn grid_drops_control_layers_for_any_kind() {
    let e = effect("apple:apple-grid", "buildIn", vec![tagged(0.0), tagged(1.0)]);
    let out = run(grid, e).unwrap();
    assert!(out.base_layer.layers[0].layers.is_empty());
}

#[test]
fn swoosh_drops_control_layer_and_restores_page_order() {
    let mut wrapper = Layer::default();
    wrapper.layers = vec![tagged(10.0), tagged(11.0)];
    let mut outgoing = tagged(1.0);
    outgoing.layers.push(wrapper);
    let e = effect(
        "com.apple.iWork.Keynote.BLTSwoosh",
        "transition",
        vec![tagged(0.0), outgoing, tagged(2.0)],
    );

    let out = run(swoosh_transition, e).unwrap();
    let pages = &out.base_layer.layers[0].layers;
    assert_eq!(widths(pages), vec![0.0, 2.0, 1.0]);
    assert_eq!(widths(&pages[2].layers[0].layers), vec![11.0]);
}

#[test]
fn swoosh_without_its_pages_is_a_structure_error() {
    let e = effect(
        "com.apple.iWork.Keynote.BLTSwoosh",
        "transition",
        vec![tagged(0.0)],
    );
    assert!(matches!(
        run(swoosh_transition, e),
        Err(ShowError::Structure(_))
    ));
}

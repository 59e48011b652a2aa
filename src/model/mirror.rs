//! Structural comparison between a current tree and its original mirror.
//!
//! Two trees mirror each other when they have the same child counts at every
//! path and the same animation property names. Leaf values are free to differ.

use crate::model::script::{Animation, Effect, Layer, Scene, SlideScript};

/// First structural difference between two slide scripts, as a `$.path: reason` string.
pub fn slide_mismatch(cur: &SlideScript, orig: &SlideScript) -> Option<String> {
    let mut path = String::from("$");
    if cur.assets.len() != orig.assets.len() || !cur.assets.keys().eq(orig.assets.keys()) {
        return Some(format!("{path}.assets: asset keys differ"));
    }
    scenes(&mut path, "events", &cur.events, &orig.events)
}

/// First structural difference between two scenes.
pub fn scene_mismatch(cur: &Scene, orig: &Scene) -> Option<String> {
    let mut path = String::from("$");
    scene(&mut path, cur, orig)
}

fn scenes(path: &mut String, field: &str, cur: &[Scene], orig: &[Scene]) -> Option<String> {
    if cur.len() != orig.len() {
        return Some(count_mismatch(path, field, cur.len(), orig.len()));
    }
    for (i, (c, o)) in cur.iter().zip(orig).enumerate() {
        let mark = path.len();
        path.push_str(&format!(".{field}[{i}]"));
        if let Some(m) = scene(path, c, o) {
            return Some(m);
        }
        path.truncate(mark);
    }
    None
}

fn scene(path: &mut String, cur: &Scene, orig: &Scene) -> Option<String> {
    let mark = path.len();
    path.push_str(".baseLayer");
    if let Some(m) = layer(path, &cur.base_layer, &orig.base_layer) {
        return Some(m);
    }
    path.truncate(mark);

    if let Some(m) = effects(path, &cur.effects, &orig.effects) {
        return Some(m);
    }

    if cur.hyperlinks.len() != orig.hyperlinks.len() {
        return Some(count_mismatch(
            path,
            "hyperlinks",
            cur.hyperlinks.len(),
            orig.hyperlinks.len(),
        ));
    }
    for (i, (c, o)) in cur.hyperlinks.iter().zip(&orig.hyperlinks).enumerate() {
        if !c.events.keys().eq(o.events.keys()) {
            return Some(format!("{path}.hyperlinks[{i}].events: state names differ"));
        }
        for ((state, cs), os) in c.events.iter().zip(o.events.values()) {
            let mark = path.len();
            path.push_str(&format!(".hyperlinks[{i}].events.{state}"));
            if let Some(m) = scene(path, cs, os) {
                return Some(m);
            }
            path.truncate(mark);
        }
    }
    None
}

fn effects(path: &mut String, cur: &[Effect], orig: &[Effect]) -> Option<String> {
    if cur.len() != orig.len() {
        return Some(count_mismatch(path, "effects", cur.len(), orig.len()));
    }
    for (i, (c, o)) in cur.iter().zip(orig).enumerate() {
        let mark = path.len();
        path.push_str(&format!(".effects[{i}]"));
        if c.name != o.name {
            return Some(format!("{path}.name: '{}' vs '{}'", c.name, o.name));
        }
        let effect_mark = path.len();
        path.push_str(".baseLayer");
        if let Some(m) = layer(path, &c.base_layer, &o.base_layer) {
            return Some(m);
        }
        path.truncate(effect_mark);
        if let Some(m) = effects(path, &c.effects, &o.effects) {
            return Some(m);
        }
        path.truncate(mark);
    }
    None
}

fn layer(path: &mut String, cur: &Layer, orig: &Layer) -> Option<String> {
    if cur.initial_state.contents_rect.is_some() != orig.initial_state.contents_rect.is_some() {
        return Some(format!("{path}.initialState.contentsRect: presence differs"));
    }
    if let Some(m) = animations(path, &cur.animations, &orig.animations) {
        return Some(m);
    }
    if cur.layers.len() != orig.layers.len() {
        return Some(count_mismatch(path, "layers", cur.layers.len(), orig.layers.len()));
    }
    for (i, (c, o)) in cur.layers.iter().zip(&orig.layers).enumerate() {
        let mark = path.len();
        path.push_str(&format!(".layers[{i}]"));
        if let Some(m) = layer(path, c, o) {
            return Some(m);
        }
        path.truncate(mark);
    }
    None
}

fn animations(path: &mut String, cur: &[Animation], orig: &[Animation]) -> Option<String> {
    if cur.len() != orig.len() {
        return Some(count_mismatch(path, "animations", cur.len(), orig.len()));
    }
    for (i, (c, o)) in cur.iter().zip(orig).enumerate() {
        let mark = path.len();
        path.push_str(&format!(".animations[{i}]"));
        if c.property != o.property {
            return Some(format!("{path}.property: '{}' vs '{}'", c.property, o.property));
        }
        let values_len = |a: &Animation| a.values.as_ref().map(Vec::len);
        let path_len = |a: &Animation| a.path.as_ref().map(Vec::len);
        if values_len(c) != values_len(o) || path_len(c) != path_len(o) {
            return Some(format!("{path}: keyframe or path counts differ"));
        }
        if let Some(m) = animations(path, &c.animations, &o.animations) {
            return Some(m);
        }
        path.truncate(mark);
    }
    None
}

fn count_mismatch(path: &str, field: &str, cur: usize, orig: usize) -> String {
    format!("{path}.{field}: {cur} current vs {orig} original")
}

#[cfg(test)]
#[path = "../../tests/unit/model/mirror.rs"]
mod tests;

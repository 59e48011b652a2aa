use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::foundation::core::{Point, RectValue};

/// Effect `type` used by slide transitions.
pub const EFFECT_TYPE_TRANSITION: &str = "transition";

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One slide's script as delivered by the loader: its scenes plus the visual
/// assets those scenes reference.
pub struct SlideScript {
    /// Scenes contributed by this slide, in playback order.
    #[serde(default)]
    pub events: Vec<Scene>,
    /// Visual assets keyed by asset id.
    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,
    /// Unrecognized fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A visual asset's bounding size at authoring time.
pub struct Asset {
    /// Width in show units.
    #[serde(default)]
    pub width: f64,
    /// Height in show units.
    #[serde(default)]
    pub height: f64,
    /// Unrecognized fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One timeline unit: a layer tree, the effects that play on it, and its hyperlinks.
pub struct Scene {
    /// Root of the scene's layer tree.
    #[serde(default)]
    pub base_layer: Layer,
    /// Effects in playback order.
    #[serde(default)]
    pub effects: Vec<Effect>,
    /// Interactive regions, each with per-state scenes.
    #[serde(default)]
    pub hyperlinks: Vec<Hyperlink>,
    /// Unrecognized fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A clickable region with nested scenes keyed by interaction-state name.
pub struct Hyperlink {
    /// Hit rectangle in show units.
    #[serde(default)]
    pub target_rectangle: RectValue,
    /// Scenes played for each interaction state.
    #[serde(default)]
    pub events: BTreeMap<String, Scene>,
    /// Unrecognized fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A recursive visual node.
pub struct Layer {
    /// Geometry and visibility before any animation runs.
    #[serde(default)]
    pub initial_state: InitialState,
    /// Animations attached to this layer.
    #[serde(default)]
    pub animations: Vec<Animation>,
    /// Child layers, back to front.
    #[serde(default)]
    pub layers: Vec<Layer>,
    /// Unrecognized fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Static layer state.
pub struct InitialState {
    /// 2D affine `[a, b, c, d, tx, ty]`; indices 4 and 5 are the translation.
    #[serde(default = "identity_affine")]
    pub affine_transform: [f64; 6],
    /// Layer width.
    #[serde(default)]
    pub width: f64,
    /// Layer height.
    #[serde(default)]
    pub height: f64,
    /// Anchor position (layers are center-anchored).
    #[serde(default)]
    pub position: Point,
    /// Hidden before any animation toggles it.
    #[serde(default)]
    pub hidden: bool,
    /// Normalized source-image crop, present on tile layers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents_rect: Option<RectValue>,
    /// Unrecognized fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn identity_affine() -> [f64; 6] {
    [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            affine_transform: identity_affine(),
            width: 0.0,
            height: 0.0,
            position: Point::default(),
            hidden: false,
            contents_rect: None,
            extra: Map::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A named transition or emphasis behavior with its own private layer tree.
pub struct Effect {
    /// Renderer-defined effect identifier.
    #[serde(default)]
    pub name: String,
    /// `"transition"`, `"build"`, or another renderer-defined kind.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Total effect duration in seconds.
    #[serde(default)]
    pub duration: f64,
    /// Root of the effect's private layer tree.
    #[serde(default)]
    pub base_layer: Layer,
    /// Nested effects (compound builds).
    #[serde(default)]
    pub effects: Vec<Effect>,
    /// Unrecognized fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Effect {
    /// `true` for slide transitions.
    pub fn is_transition(&self) -> bool {
        self.kind == EFFECT_TYPE_TRANSITION
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A keyed animation over one property channel, possibly a group of children.
pub struct Animation {
    /// Animated channel, e.g. `position`, `opacity`, `transform.translation.z`.
    #[serde(default)]
    pub property: String,
    /// Start offset in seconds, relative to the parent.
    #[serde(default)]
    pub begin_time: f64,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: f64,
    /// Fill mode (`forwards`, `both`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_mode: Option<String>,
    /// Timing function name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing_function: Option<String>,
    /// Start value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<AnimValue>,
    /// End value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<AnimValue>,
    /// Keyframe values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<AnimValue>>,
    /// Control path for path-based motion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
    /// Child animations for compound or staggered motion.
    #[serde(default)]
    pub animations: Vec<Animation>,
    /// Unrecognized fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Animation {
    /// A constant-valued `forwards`/`linear` animation, as inserted by quirk rewrites.
    pub fn synthetic(
        property: &str,
        begin_time: f64,
        duration: f64,
        from: AnimValue,
        to: AnimValue,
    ) -> Self {
        Self {
            property: property.to_string(),
            begin_time,
            duration,
            fill_mode: Some("forwards".to_string()),
            timing_function: Some("linear".to_string()),
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    /// Replace the fill mode.
    pub fn with_fill_mode(mut self, fill_mode: &str) -> Self {
        self.fill_mode = Some(fill_mode.to_string());
        self
    }

    /// Replace the timing function.
    pub fn with_timing_function(mut self, timing_function: &str) -> Self {
        self.timing_function = Some(timing_function.to_string());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// One sub-path of a motion path.
pub struct PathSegment {
    /// Control points; the first one anchors the segment.
    #[serde(default)]
    pub points: Vec<[f64; 2]>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// A scalar sample: numeric for most channels, boolean for `hidden`.
pub enum Scalar {
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// `{width, height}` sample used by the `bounds` channel.
pub struct SizeValue {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Index of the X translation component in a 4x4 transform sample.
pub const TRANSFORM_TX: usize = 12;
/// Index of the Y translation component in a 4x4 transform sample.
pub const TRANSFORM_TY: usize = 13;
/// Index of the Z translation component in a 4x4 transform sample.
pub const TRANSFORM_TZ: usize = 14;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// A single animation sample.
pub enum AnimValue {
    /// `{"scalar": ..}`
    Scalar {
        /// The sample.
        scalar: Scalar,
    },
    /// `{"pointX": .., "pointY": ..}`
    Point(Point),
    /// `{"transform": [16 numbers]}`, column-major 4x4.
    Transform {
        /// Matrix components.
        transform: Vec<f64>,
    },
    /// `{"width": .., "height": ..}`
    Size(SizeValue),
    /// Any other shape, preserved verbatim.
    Other(Value),
}

impl AnimValue {
    /// Numeric scalar sample.
    pub fn number(v: f64) -> Self {
        Self::Scalar {
            scalar: Scalar::Number(v),
        }
    }

    /// Boolean scalar sample.
    pub fn flag(v: bool) -> Self {
        Self::Scalar {
            scalar: Scalar::Bool(v),
        }
    }

    /// Numeric scalar, if this is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Scalar {
                scalar: Scalar::Number(v),
            } => Some(*v),
            _ => None,
        }
    }

    /// Point sample, if this is one.
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Point(p) => Some(*p),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/script.rs"]
mod tests;

//! Showscript merges per-slide animation scripts into one show timeline, scales it to a
//! display viewport, and normalizes it for the rendering engine that will play it.
//!
//! Every slide arrives as a tree of layers, effects and animations held twice: an
//! authoring-time **original** and a **current** copy the engine edits. The original
//! never drifts, so each rescale recomputes the current tree from it.
//!
//! # Pipeline overview
//!
//! 1. **Aggregate**: per-slide [`Fragment`]s report into an [`Aggregator`] barrier, which
//!    merges them in `slideList` order into a [`ShowScript`] once all have arrived.
//! 2. **Normalize**: a [`QuirkAdapter`] rewrites effect subtrees once for the target
//!    [`RendererVariant`], editing both trees through [`Paired`] so they keep one shape.
//! 3. **Scale**: [`apply_scale`] writes `original * k` into every pixel-valued leaf, with
//!    `k` from [`compute_scale_factor`] (contain-fit of the show into the viewport).
//!
//! [`ShowSession`] drives all three and queues [`ShowEvent`]s for the renderer;
//! [`load_show_dir`] feeds a session from a directory of JSON files.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Mirror invariant**: structural edits go through [`Paired`] only.
//! - **No ambient state**: the renderer variant is an explicit parameter.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod loader;
mod model;
mod quirks;
mod scale;
mod session;
mod timeline;

pub use foundation::core::{Point, RectValue, Size};
pub use foundation::error::{ShowError, ShowResult};
pub use loader::dir::{HEADER_FILE, load_show_dir};
pub use model::header::ShowHeader;
pub use model::mirror::{scene_mismatch, slide_mismatch};
pub use model::paired::{Paired, zip_pairs};
pub use model::script::{
    AnimValue, Animation, Asset, EFFECT_TYPE_TRANSITION, Effect, Hyperlink, InitialState, Layer,
    PathSegment, Scalar, Scene, SizeValue, SlideScript, TRANSFORM_TX, TRANSFORM_TY, TRANSFORM_TZ,
};
pub use quirks::adapter::QuirkAdapter;
/// Effect and property identifiers recognized by the rewrite tables.
pub use quirks::names as effect_names;
pub use quirks::registry::{QuirkRule, QuirkTable};
pub use quirks::variant::RendererVariant;
pub use scale::fit::{compute_scale_factor, fit_within};
pub use scale::geometry::{DEPTH_SENTINELS, apply_scale, is_depth_sentinel};
pub use scale::tiles::{
    MAX_TILE_CELLS, TILE_EFFECTS, TileGrid, TilePlacement, is_tile_effect, tile_rect,
};
pub use session::show::{SessionOpts, SessionState, ShowEvent, ShowSession, ViewScaleHook};
pub use timeline::aggregate::{Aggregator, BarrierState, ShowScript};
pub use timeline::fragment::{Fragment, FragmentStatus};

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use serde_json::{Map, Value};

use crate::{
    foundation::core::Size,
    foundation::error::{ShowError, ShowResult},
    model::header::ShowHeader,
    model::paired::Paired,
    model::script::{Asset, Scene},
    timeline::fragment::{Fragment, FragmentStatus},
};

#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// The merged show: one linear timeline of scenes built from every slide fragment.
///
/// Topology is fixed once built. Only leaf values of the current side change afterwards
/// (through scaling), plus the one-time quirk rewrites which edit both sides alike.
pub struct ShowScript {
    pub(crate) slide_list: Vec<String>,
    #[serde(rename = "events")]
    pub(crate) scenes: Vec<Scene>,
    #[serde(rename = "originalEvents")]
    pub(crate) original_scenes: Vec<Scene>,
    pub(crate) slide_assets: Vec<BTreeMap<String, Asset>>,
    pub(crate) original_slide_assets: Vec<BTreeMap<String, Asset>>,
    #[serde(rename = "sceneIndexFromSlideIndexLookup")]
    pub(crate) scene_index_from_slide: Vec<usize>,
    #[serde(rename = "slideIndexFromSceneIndexLookup")]
    pub(crate) slide_index_from_scene: Vec<usize>,
    pub(crate) original_slide_width: f64,
    pub(crate) original_slide_height: f64,
    pub(crate) slide_width: f64,
    pub(crate) slide_height: f64,
    pub(crate) scale_factor: f64,
    #[serde(skip)]
    pub(crate) quirks_applied: bool,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl ShowScript {
    /// Slide identifiers in presentation order.
    pub fn slide_list(&self) -> &[String] {
        &self.slide_list
    }

    /// Working scenes (scaled and quirk-adjusted).
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Authoring-time scenes, the baseline for every scale computation.
    pub fn original_scenes(&self) -> &[Scene] {
        &self.original_scenes
    }

    /// Working asset sizes of slide `slide`.
    pub fn slide_assets(&self, slide: usize) -> Option<&BTreeMap<String, Asset>> {
        self.slide_assets.get(slide)
    }

    /// Number of scenes in the show.
    pub fn num_scenes(&self) -> usize {
        self.scenes.len()
    }

    /// Index of the last scene, `None` for a show without scenes.
    pub fn last_scene_index(&self) -> Option<usize> {
        self.scenes.len().checked_sub(1)
    }

    /// Index of the last slide.
    pub fn last_slide_index(&self) -> Option<usize> {
        self.slide_list.len().checked_sub(1)
    }

    /// First global scene index of slide `slide`.
    pub fn scene_index_from_slide(&self, slide: usize) -> Option<usize> {
        self.scene_index_from_slide.get(slide).copied()
    }

    /// Slide owning global scene `scene`.
    pub fn slide_index_from_scene(&self, scene: usize) -> Option<usize> {
        self.slide_index_from_scene.get(scene).copied()
    }

    /// Global scene range contributed by slide `slide`.
    pub fn slide_scene_range(&self, slide: usize) -> Option<Range<usize>> {
        let start = self.scene_index_from_slide(slide)?;
        let end = self
            .scene_index_from_slide(slide + 1)
            .unwrap_or(self.scenes.len());
        Some(start..end)
    }

    /// Authoring-time show size.
    pub fn original_slide_size(&self) -> Size {
        Size::new(self.original_slide_width, self.original_slide_height)
    }

    /// Current (scaled) show size.
    pub fn slide_size(&self) -> Size {
        Size::new(self.slide_width, self.slide_height)
    }

    /// Active scale factor (`1.0` until the first scale application).
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// `true` once the one-time quirk pass has run.
    pub fn quirks_applied(&self) -> bool {
        self.quirks_applied
    }

    /// Paired handle on scene `idx`.
    pub(crate) fn scene_pair(&mut self, idx: usize) -> Option<Paired<'_, Scene>> {
        let cur = self.scenes.get_mut(idx)?;
        let orig = self.original_scenes.get_mut(idx)?;
        Some(Paired::new(cur, orig))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Progress of the completion barrier after a report.
pub enum BarrierState {
    /// Some fragments have not reported yet.
    Waiting {
        /// Fragments that have reported (success or failure).
        reported: usize,
        /// Fragments expected in total.
        expected: usize,
    },
    /// Every fragment loaded; the script can be merged.
    Complete,
    /// Every fragment reported and at least one failed.
    Failed(String),
}

/// Completion barrier and merger for per-slide fragments.
///
/// Fragments may report in any order. The merge is released only once every slide in
/// the header's `slideList` has reported, and is refused if any of them failed.
#[derive(Debug)]
pub struct Aggregator {
    header: ShowHeader,
    slots: Vec<FragmentStatus>,
    slot_by_id: HashMap<String, usize>,
    reported: usize,
    merged: bool,
}

impl Aggregator {
    /// Start a barrier for every slide named by `header`.
    pub fn new(header: ShowHeader) -> ShowResult<Self> {
        header.validate()?;
        let slot_by_id = header
            .slide_list
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Ok(Self {
            slots: vec![FragmentStatus::Pending; header.slide_list.len()],
            slot_by_id,
            header,
            reported: 0,
            merged: false,
        })
    }

    /// The header this barrier was built from.
    pub fn header(&self) -> &ShowHeader {
        &self.header
    }

    /// Record a successfully loaded fragment.
    pub fn report_loaded(&mut self, fragment: Fragment) -> ShowResult<BarrierState> {
        let id = fragment.slide_id().to_string();
        self.report(&id, FragmentStatus::Loaded(fragment))
    }

    /// Record a fragment that failed to load.
    pub fn report_failed(&mut self, slide_id: &str, reason: &str) -> ShowResult<BarrierState> {
        self.report(slide_id, FragmentStatus::Failed(reason.to_string()))
    }

    fn report(&mut self, slide_id: &str, status: FragmentStatus) -> ShowResult<BarrierState> {
        let Some(&slot) = self.slot_by_id.get(slide_id) else {
            return Err(ShowError::validation(format!(
                "slide '{slide_id}' is not in the show's slideList"
            )));
        };
        if self.slots[slot].is_reported() {
            tracing::warn!(slide_id, "ignoring duplicate completion report");
        } else {
            tracing::debug!(
                slide_id,
                failed = matches!(status, FragmentStatus::Failed(_)),
                "fragment reported"
            );
            self.slots[slot] = status;
            self.reported += 1;
        }
        Ok(self.state())
    }

    /// Current barrier state.
    pub fn state(&self) -> BarrierState {
        if self.reported < self.slots.len() {
            return BarrierState::Waiting {
                reported: self.reported,
                expected: self.slots.len(),
            };
        }
        match self.first_failure() {
            Some(reason) => BarrierState::Failed(reason),
            None => BarrierState::Complete,
        }
    }

    fn first_failure(&self) -> Option<String> {
        self.slots
            .iter()
            .zip(&self.header.slide_list)
            .find_map(|(s, id)| match s {
                FragmentStatus::Failed(reason) => Some(format!("slide '{id}': {reason}")),
                _ => None,
            })
    }

    /// Merge every fragment into one [`ShowScript`].
    ///
    /// Returns `Ok(None)` while the barrier is still waiting, and a load error once every
    /// fragment reported but one of them failed. A barrier merges at most once.
    #[tracing::instrument(skip(self), fields(slides = self.slots.len()))]
    pub fn merge(&mut self) -> ShowResult<Option<ShowScript>> {
        if self.merged {
            return Err(ShowError::validation("fragments were already merged"));
        }
        match self.state() {
            BarrierState::Waiting { .. } => return Ok(None),
            BarrierState::Failed(reason) => return Err(ShowError::load(reason)),
            BarrierState::Complete => {}
        }

        let slots = std::mem::take(&mut self.slots);
        let mut fragments = Vec::with_capacity(slots.len());
        for slot in slots {
            match slot {
                FragmentStatus::Loaded(f) => fragments.push(f),
                _ => return Err(ShowError::load("fragment missing at merge time")),
            }
        }
        self.merged = true;

        let script = merge_fragments(&self.header, fragments)?;
        tracing::info!(
            scenes = script.num_scenes(),
            slides = script.slide_list.len(),
            "show script merged"
        );
        Ok(Some(script))
    }
}

/// Merge fragments already arranged in `header.slide_list` order.
pub(crate) fn merge_fragments(
    header: &ShowHeader,
    fragments: Vec<Fragment>,
) -> ShowResult<ShowScript> {
    if fragments.len() != header.slide_list.len() {
        return Err(ShowError::validation(format!(
            "expected {} fragments, got {}",
            header.slide_list.len(),
            fragments.len()
        )));
    }

    let total: usize = fragments.iter().map(Fragment::scene_count).sum();
    let mut scenes = Vec::with_capacity(total);
    let mut original_scenes = Vec::with_capacity(total);
    let mut slide_assets = Vec::with_capacity(fragments.len());
    let mut original_slide_assets = Vec::with_capacity(fragments.len());
    let mut scene_index_from_slide = Vec::with_capacity(fragments.len());
    let mut slide_index_from_scene = Vec::with_capacity(total);

    for (slide_idx, (fragment, expected_id)) in
        fragments.into_iter().zip(&header.slide_list).enumerate()
    {
        let (id, current, original) = fragment.into_parts();
        if &id != expected_id {
            return Err(ShowError::validation(format!(
                "fragment '{id}' is out of order; expected '{expected_id}'"
            )));
        }
        if current.events.len() != original.events.len() {
            return Err(ShowError::structure(format!(
                "slide '{id}': {} current scenes vs {} original",
                current.events.len(),
                original.events.len()
            )));
        }

        scene_index_from_slide.push(scenes.len());
        slide_index_from_scene.extend(std::iter::repeat_n(slide_idx, current.events.len()));
        scenes.extend(current.events);
        original_scenes.extend(original.events);
        slide_assets.push(current.assets);
        original_slide_assets.push(original.assets);
    }

    Ok(ShowScript {
        slide_list: header.slide_list.clone(),
        scenes,
        original_scenes,
        slide_assets,
        original_slide_assets,
        scene_index_from_slide,
        slide_index_from_scene,
        original_slide_width: header.slide_width,
        original_slide_height: header.slide_height,
        slide_width: header.slide_width,
        slide_height: header.slide_height,
        scale_factor: 1.0,
        quirks_applied: false,
        extra: header.extra.clone(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/aggregate.rs"]
mod tests;

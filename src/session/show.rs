use std::time::{Duration, Instant};

use crate::{
    foundation::core::Size,
    foundation::error::{ShowError, ShowResult},
    model::header::ShowHeader,
    model::script::SlideScript,
    quirks::{adapter::QuirkAdapter, variant::RendererVariant},
    scale::{fit::compute_scale_factor, geometry::apply_scale},
    timeline::aggregate::{Aggregator, BarrierState, ShowScript},
    timeline::fragment::Fragment,
};

/// Options controlling how a [`ShowSession`] loads and presents a show.
#[derive(Clone, Debug)]
pub struct SessionOpts {
    /// Renderer family the script is normalized for.
    pub variant: RendererVariant,
    /// Initial display viewport. `0x0` means "authoring size".
    pub viewport: Size,
    /// How long to wait for every slide to report before giving up.
    pub load_timeout: Duration,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            variant: RendererVariant::Reference,
            viewport: Size::ZERO,
            load_timeout: Duration::from_secs(30),
        }
    }
}

/// Notifications for the renderer, drained with [`ShowSession::drain_events`].
#[derive(Clone, Debug, PartialEq)]
pub enum ShowEvent {
    /// The merged script is ready. Emitted once.
    ///
    /// The event carries a summary; the script itself is borrowed through
    /// [`ShowSession::script`] or taken with [`ShowSession::into_script`].
    ScriptReady {
        /// Scenes in the merged timeline.
        scenes: usize,
        /// Slides the timeline was merged from.
        slides: usize,
    },
    /// The show's display size changed (initially and after every rescale).
    ShowSizeChanged {
        /// New show width.
        width: f64,
        /// New show height.
        height: f64,
    },
    /// Loading was abandoned; no script will be produced.
    ScriptDidNotLoad {
        /// Why loading failed.
        reason: String,
    },
}

/// Lifecycle of a [`ShowSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for slide fragments.
    Loading,
    /// Script merged, normalized and scaled.
    Ready,
    /// A fragment failed, the wait timed out, or the merged script was unusable.
    Failed,
}

/// Callback receiving the active scale factor after every scale application.
pub type ViewScaleHook = Box<dyn FnMut(f64)>;

/// Drives one show from header to a ready, scaled script.
///
/// Slides report in any order. Once all have reported the session merges them, runs
/// the quirk pass for its variant, applies the initial scale and queues
/// [`ShowEvent::ScriptReady`] followed by [`ShowEvent::ShowSizeChanged`].
pub struct ShowSession {
    opts: SessionOpts,
    aggregator: Aggregator,
    adapter: QuirkAdapter,
    state: SessionState,
    script: Option<ShowScript>,
    deadline: Option<Instant>,
    events: Vec<ShowEvent>,
    view_scale_hook: Option<ViewScaleHook>,
}

impl ShowSession {
    /// Start a session for `header`. The header is validated before anything is loaded.
    pub fn new(header: ShowHeader, opts: SessionOpts) -> ShowResult<Self> {
        check_viewport(opts.viewport)?;
        let aggregator = Aggregator::new(header)?;
        tracing::debug!(
            slides = aggregator.header().slide_list.len(),
            variant = %opts.variant,
            "show session started"
        );
        Ok(Self {
            deadline: Instant::now().checked_add(opts.load_timeout),
            adapter: QuirkAdapter::new(opts.variant),
            aggregator,
            opts,
            state: SessionState::Loading,
            script: None,
            events: Vec::new(),
            view_scale_hook: None,
        })
    }

    /// Parse the header JSON and start a session.
    pub fn from_header_json(header_json: &str, opts: SessionOpts) -> ShowResult<Self> {
        Self::new(ShowHeader::from_json(header_json)?, opts)
    }

    /// Show header.
    pub fn header(&self) -> &ShowHeader {
        self.aggregator.header()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Variant the script is normalized for.
    pub fn variant(&self) -> RendererVariant {
        self.opts.variant
    }

    /// Report a loaded slide.
    pub fn slide_loaded(
        &mut self,
        slide_id: &str,
        script: SlideScript,
    ) -> ShowResult<SessionState> {
        self.fragment_loaded(Fragment::new(slide_id, script))
    }

    /// Report a loaded fragment (e.g. one built from separate current/original payloads).
    pub fn fragment_loaded(&mut self, fragment: Fragment) -> ShowResult<SessionState> {
        if self.state != SessionState::Loading {
            tracing::warn!(
                slide_id = fragment.slide_id(),
                state = ?self.state,
                "ignoring late slide report"
            );
            return Ok(self.state);
        }
        let barrier = self.aggregator.report_loaded(fragment)?;
        self.advance(barrier)
    }

    /// Report a slide that failed to load.
    pub fn slide_failed(&mut self, slide_id: &str, reason: &str) -> ShowResult<SessionState> {
        if self.state != SessionState::Loading {
            tracing::warn!(slide_id, state = ?self.state, "ignoring late slide failure");
            return Ok(self.state);
        }
        tracing::warn!(slide_id, reason, "slide failed to load");
        let barrier = self.aggregator.report_failed(slide_id, reason)?;
        self.advance(barrier)
    }

    /// Fail the load if the timeout elapsed before every slide reported.
    pub fn poll_timeout(&mut self, now: Instant) -> SessionState {
        if self.state == SessionState::Loading {
            if let Some(deadline) = self.deadline {
                if now >= deadline {
                    let reason = match self.aggregator.state() {
                        BarrierState::Waiting { reported, expected } => format!(
                            "timed out after {:?} with {reported} of {expected} slides reported",
                            self.opts.load_timeout
                        ),
                        _ => format!("timed out after {:?}", self.opts.load_timeout),
                    };
                    self.fail(reason);
                }
            }
        }
        self.state
    }

    fn advance(&mut self, barrier: BarrierState) -> ShowResult<SessionState> {
        match barrier {
            BarrierState::Waiting { .. } => {}
            BarrierState::Failed(reason) => {
                // Leave the barrier unmerged; the script is abandoned.
                self.fail(reason);
            }
            BarrierState::Complete => {
                if let Err(e) = self.finish() {
                    self.fail(e.to_string());
                    return Err(e);
                }
            }
        }
        Ok(self.state)
    }

    #[tracing::instrument(skip(self), fields(variant = %self.opts.variant))]
    fn finish(&mut self) -> ShowResult<()> {
        let Some(mut script) = self.aggregator.merge()? else {
            return Ok(());
        };
        self.adapter.apply(&mut script)?;

        let viewport = self.effective_viewport(&script);
        let k = compute_scale_factor(script.original_slide_size(), viewport)?;
        apply_scale(&mut script, k)?;
        let size = script.slide_size();
        let ready = ShowEvent::ScriptReady {
            scenes: script.num_scenes(),
            slides: script.slide_list().len(),
        };

        self.script = Some(script);
        self.state = SessionState::Ready;
        self.deadline = None;
        self.notify_view_scale(k);
        self.events.push(ready);
        self.events.push(ShowEvent::ShowSizeChanged {
            width: size.width,
            height: size.height,
        });
        tracing::info!(scale = k, width = size.width, height = size.height, "show ready");
        Ok(())
    }

    fn fail(&mut self, reason: String) {
        tracing::warn!(%reason, "show script did not load");
        self.state = SessionState::Failed;
        self.deadline = None;
        self.events.push(ShowEvent::ScriptDidNotLoad { reason });
    }

    fn effective_viewport(&self, script: &ShowScript) -> Size {
        if is_unset(self.opts.viewport) {
            script.original_slide_size()
        } else {
            self.opts.viewport
        }
    }

    /// Rescale the ready script for a new viewport. Returns the new scale factor.
    #[tracing::instrument(skip(self))]
    pub fn resize(&mut self, viewport: Size) -> ShowResult<f64> {
        check_viewport(viewport)?;
        let Some(script) = self.script.as_mut() else {
            return Err(ShowError::validation("no script is ready to resize"));
        };
        let target = if is_unset(viewport) {
            script.original_slide_size()
        } else {
            viewport
        };
        let k = compute_scale_factor(script.original_slide_size(), target)?;
        apply_scale(script, k)?;
        let size = script.slide_size();

        self.opts.viewport = viewport;
        self.notify_view_scale(k);
        self.events.push(ShowEvent::ShowSizeChanged {
            width: size.width,
            height: size.height,
        });
        tracing::info!(scale = k, width = size.width, height = size.height, "show rescaled");
        Ok(k)
    }

    /// Register the render-surface scale setter, called after every scale application.
    pub fn set_view_scale_hook(&mut self, hook: impl FnMut(f64) + 'static) {
        self.view_scale_hook = Some(Box::new(hook));
    }

    fn notify_view_scale(&mut self, k: f64) {
        if let Some(hook) = self.view_scale_hook.as_mut() {
            hook(k);
        }
    }

    /// Take every queued notification, oldest first.
    pub fn drain_events(&mut self) -> Vec<ShowEvent> {
        std::mem::take(&mut self.events)
    }

    /// The ready script.
    pub fn script(&self) -> Option<&ShowScript> {
        self.script.as_ref()
    }

    /// Take ownership of the ready script, ending the session.
    pub fn into_script(self) -> Option<ShowScript> {
        self.script
    }

    /// Active scale factor of the ready script.
    pub fn scale_factor(&self) -> Option<f64> {
        self.script.as_ref().map(ShowScript::scale_factor)
    }

    /// First scene of slide `slide`; `None` before the script is ready or out of range.
    pub fn scene_index_from_slide(&self, slide: usize) -> Option<usize> {
        self.script.as_ref()?.scene_index_from_slide(slide)
    }

    /// Slide owning scene `scene`; `None` before the script is ready or out of range.
    pub fn slide_index_from_scene(&self, scene: usize) -> Option<usize> {
        self.script.as_ref()?.slide_index_from_scene(scene)
    }
}

/// `0x0` stands for the authoring size.
fn is_unset(viewport: Size) -> bool {
    viewport.width == 0.0 && viewport.height == 0.0
}

fn check_viewport(viewport: Size) -> ShowResult<()> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if is_unset(viewport) || (positive(viewport.width) && positive(viewport.height)) {
        Ok(())
    } else {
        Err(ShowError::validation(format!(
            "viewport must be 0x0 or finite and positive, got {}x{}",
            viewport.width, viewport.height
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/show.rs"]
mod tests;

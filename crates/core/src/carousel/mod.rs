//! Carousel playback controller.
//!
//! The controller owns the [`PlaybackState`] and reacts to discrete events
//! (mounts, metadata, clip start/end, viewport crossings, control presses)
//! in arrival order. Each event runs through the pure state machine, and the
//! difference between the previous and next state decides which effects run:
//! a slide tween on index change, a progress tracker re-evaluation and a
//! native play/pause reconciliation.

mod binding;
mod driver;
mod progress;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

pub use binding::BindingAction;

use crate::{
    CarouselConfig, CarouselSnapshot, ClipCatalog, ClipSurface, ControlAction, Length,
    PlaybackEvent, PlaybackState, Result, ShowcaseConfig, StyleProps, StyleTarget, SurfaceRegistry,
    TweenEngine, TweenEvent,
};
use driver::TransitionDriver;
use progress::ProgressTracker;

/// Viewport width assumed until the host reports one.
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1440.0;

#[derive(Debug)]
pub struct CarouselController<S> {
    config: CarouselConfig,
    catalog: ClipCatalog,
    state: PlaybackState,
    registry: SurfaceRegistry<S>,
    engine: TweenEngine,
    driver: TransitionDriver,
    tracker: ProgressTracker,
    viewport_width: f32,
    last_binding: Option<BindingAction>,
}

impl<S: ClipSurface> CarouselController<S> {
    pub fn new(config: CarouselConfig, catalog: ClipCatalog) -> Self {
        let driver = TransitionDriver::new(&config);
        Self {
            config,
            catalog,
            state: PlaybackState::new(),
            registry: SurfaceRegistry::new(),
            engine: TweenEngine::new(),
            driver,
            tracker: ProgressTracker::new(),
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            last_binding: None,
        }
    }

    pub fn from_config(config: &ShowcaseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.carousel.clone(), config.catalog()?))
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn catalog(&self) -> &ClipCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn registry(&self) -> &SurfaceRegistry<S> {
        &self.registry
    }

    pub fn engine(&self) -> &TweenEngine {
        &self.engine
    }

    pub fn control(&self) -> ControlAction {
        self.state.control()
    }

    /// Result of the most recent play/pause reconciliation, if any ran.
    pub fn last_binding(&self) -> Option<BindingAction> {
        self.last_binding
    }

    /// Percentage shown by the active clip's indicator, once tracked.
    pub fn active_percent(&self) -> Option<u32> {
        self.tracker.percent(self.state.active_index)
    }

    /// Whether the per-frame sampler for `index` is registered.
    pub fn is_sampling(&self, index: usize) -> bool {
        self.tracker.is_sampling(index)
    }

    pub fn sampler_count(&self) -> usize {
        self.tracker.sampler_count()
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn set_viewport_width(&mut self, width_px: f32) {
        self.viewport_width = width_px.max(0.0);
    }

    /// Records the playback surface the renderer created for `index`.
    pub fn mount_clip(&mut self, index: usize, surface: &Rc<RefCell<S>>) {
        if index >= self.catalog.len() {
            debug!(index, "ignoring mount for unknown clip");
            return;
        }
        self.registry.mount_clip(index, surface);
        self.reevaluate_progress();
    }

    /// Records the indicator pair the renderer created for `index`.
    pub fn mount_indicator(&mut self, index: usize) {
        if index >= self.catalog.len() {
            debug!(index, "ignoring indicator for unknown clip");
            return;
        }
        self.registry.mount_indicator(index);
        self.engine.set(
            StyleTarget::IndicatorTrack(index),
            StyleProps::width(self.config.indicator.finished_width),
        );
        self.engine.set(
            StyleTarget::IndicatorFill(index),
            StyleProps::width(Length::Percent(0.0)),
        );
        self.reevaluate_progress();
    }

    /// The clip at `index` finished loading its metadata.
    pub fn metadata_loaded(&mut self, index: usize) {
        if index >= self.catalog.len() || !self.registry.mark_ready(index) {
            return;
        }

        let ready = self.registry.ready_count();
        debug!(index, ready, "clip metadata loaded");
        if ready == self.config.readiness_threshold {
            info!(ready, "carousel ready for playback");
            self.reevaluate_progress();
        }
        self.reconcile_binding();
    }

    pub fn clip_started(&mut self, index: usize) -> PlaybackState {
        self.dispatch(PlaybackEvent::ClipStarted(index))
    }

    /// The clip at `index` played to its end. The indicator takes one last
    /// sample first so it settles on the clip's final position.
    pub fn clip_ended(&mut self, index: usize) -> PlaybackState {
        if index == self.state.active_index {
            self.sample_progress();
        }
        self.dispatch(PlaybackEvent::ClipEnded(index))
    }

    /// Presses the control button, issuing whatever event its current icon
    /// stands for. Returns the action that was pressed.
    pub fn press_control(&mut self) -> ControlAction {
        let action = self.state.control();
        self.dispatch(action.event());
        action
    }

    /// Feeds the visible ratio of the carousel area.
    pub fn viewport_changed(&mut self, visible_ratio: f32) {
        if self.driver.observe_viewport(visible_ratio, &self.state) {
            if let Some(event) = self.driver.advance(0.0) {
                self.dispatch(event);
            }
        }
    }

    /// Per-frame tick: fires a due autoplay arm, samples the active clip's
    /// clock, then steps the running tweens.
    pub fn frame(&mut self, dt: f32) -> Vec<TweenEvent> {
        if let Some(event) = self.driver.advance(dt) {
            self.dispatch(event);
        }
        let events = self.sample_progress();
        self.engine.advance(dt);
        events
    }

    /// Applies one event and runs the effects its state change calls for.
    pub fn dispatch(&mut self, event: PlaybackEvent) -> PlaybackState {
        let previous = self.state;
        let next = previous.apply(event, self.catalog.len());
        if next == previous {
            debug!(?event, "event left playback state unchanged");
            return next;
        }

        self.state = next;
        debug!(?event, state = ?next, "playback state changed");

        let index_changed = previous.active_index != next.active_index;
        let intent_changed = previous.is_playing != next.is_playing;
        let armed_changed = previous.autoplay_armed != next.autoplay_armed;
        let ended_changed = previous.sequence_ended != next.sequence_ended;

        if index_changed {
            self.driver
                .slide_to(next.active_index, &mut self.engine, &self.config);
        }
        if index_changed || intent_changed || armed_changed || ended_changed {
            self.reevaluate_progress();
        }
        if index_changed || intent_changed || armed_changed {
            self.reconcile_binding();
        }
        if next.sequence_ended && !previous.sequence_ended {
            info!(clips = self.catalog.len(), "showcase sequence finished");
        }

        next
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot::capture(&self.state, &self.catalog, &self.engine)
    }

    fn sample_progress(&mut self) -> Vec<TweenEvent> {
        self.tracker.sample(
            &self.registry,
            &mut self.engine,
            &self.config,
            self.viewport_width,
        )
    }

    fn reevaluate_progress(&mut self) {
        self.tracker
            .reevaluate(&self.state, &self.catalog, &self.registry, &self.config);
    }

    fn reconcile_binding(&mut self) {
        let action = binding::reconcile(
            &self.state,
            &self.registry,
            self.config.readiness_threshold,
        );
        self.last_binding = Some(action);
    }
}

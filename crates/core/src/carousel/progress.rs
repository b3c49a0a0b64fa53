use tracing::{debug, trace};

use crate::{
    CarouselConfig, ClipCatalog, ClipSurface, Easing, Length, PlaybackState, ProgressTween,
    StyleProps, StyleTarget, SurfaceRegistry, Ticker, TweenEngine, TweenEvent, TweenOptions,
};

/// Keeps the active clip's indicator in step with that clip's own clock.
#[derive(Debug, Default)]
pub(crate) struct ProgressTracker {
    active: Option<(usize, ProgressTween)>,
    ticker: Ticker<usize>,
    /// Index, arm and finished flags seen by the last evaluation that reached
    /// the tween. The first clip restarts only when this changes.
    evaluated: Option<(usize, bool, bool)>,
}

impl ProgressTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Re-evaluates after the active index, playback intent, arming, sequence
    /// end, readiness or a mount changed.
    pub(crate) fn reevaluate<S>(
        &mut self,
        state: &PlaybackState,
        catalog: &ClipCatalog,
        registry: &SurfaceRegistry<S>,
        config: &CarouselConfig,
    ) {
        let index = state.active_index;

        let stale: Vec<usize> = self.ticker.keys().filter(|key| *key != index).collect();
        for key in stale {
            self.ticker.remove(key);
            trace!(key, "dropped sampler for inactive clip");
        }

        if registry.ready_count() < config.readiness_threshold {
            trace!(ready = registry.ready_count(), "progress tracking suspended");
            return;
        }
        if registry.clip(index).is_none() || !registry.has_indicator(index) {
            trace!(index, "progress tracking deferred until surfaces mount");
            return;
        }
        let Some(clip) = catalog.get(index) else {
            return;
        };

        let reuse = matches!(&self.active, Some((active, _)) if *active == index);
        if !reuse {
            self.active = Some((index, ProgressTween::new(clip.duration_seconds)));
        }
        let Some((_, tween)) = self.active.as_mut() else {
            return;
        };
        let key = (index, state.autoplay_armed, state.sequence_ended);
        if index == 0 && !state.sequence_ended && self.evaluated != Some(key) {
            trace!(index, "restarting first clip progress");
            tween.restart();
        }
        self.evaluated = Some(key);

        if state.is_playing {
            if self.ticker.add(index) {
                debug!(index, "sampling clip clock");
            }
        } else if self.ticker.remove(index) {
            debug!(index, "stopped sampling clip clock");
        }
    }

    /// Per-frame sampling: maps the clip clock onto the progress tween and
    /// restyles the indicator when the rounded percentage moves.
    pub(crate) fn sample<S: ClipSurface>(
        &mut self,
        registry: &SurfaceRegistry<S>,
        engine: &mut TweenEngine,
        config: &CarouselConfig,
        viewport_width: f32,
    ) -> Vec<TweenEvent> {
        let Some((index, tween)) = self.active.as_mut() else {
            return Vec::new();
        };
        let index = *index;
        if !self.ticker.contains(index) || !registry.has_indicator(index) {
            return Vec::new();
        }
        let Some(clip) = registry.clip(index) else {
            return Vec::new();
        };

        let clock = clip.borrow().current_time();
        let events = tween.sample_clock(clock);
        let indicator = &config.indicator;
        let options = TweenOptions::new(indicator.style_tween_seconds, Easing::Power2Out);

        for event in &events {
            match *event {
                TweenEvent::Update { percent } => {
                    trace!(index, percent, clock, "indicator progress");
                    engine.to(
                        StyleTarget::IndicatorTrack(index),
                        StyleProps::width(indicator.active_width(viewport_width)),
                        options,
                    );
                    engine.to(
                        StyleTarget::IndicatorFill(index),
                        StyleProps::width(Length::Percent(percent as f32))
                            .with_background(indicator.active_tint.clone()),
                        options,
                    );
                }
                TweenEvent::Complete => {
                    debug!(index, "indicator complete");
                    engine.to(
                        StyleTarget::IndicatorTrack(index),
                        StyleProps::width(indicator.finished_width),
                        options,
                    );
                    engine.to(
                        StyleTarget::IndicatorFill(index),
                        StyleProps::background(indicator.inactive_tint.clone()),
                        options,
                    );
                }
            }
        }

        events
    }

    /// Reported percentage of the tracked clip.
    pub(crate) fn percent(&self, index: usize) -> Option<u32> {
        match &self.active {
            Some((active, tween)) if *active == index => Some(tween.percent()),
            _ => None,
        }
    }

    pub(crate) fn is_sampling(&self, index: usize) -> bool {
        self.ticker.contains(index)
    }

    pub(crate) fn sampler_count(&self) -> usize {
        self.ticker.len()
    }
}

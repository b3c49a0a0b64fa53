use tracing::{debug, info};

use crate::{
    CarouselConfig, Crossing, PlaybackEvent, PlaybackState, StyleProps, StyleTarget, TweenEngine,
    TweenOptions, ViewportTrigger,
};

/// Turns state changes into slide tweens and arms autoplay once the
/// carousel first scrolls into view.
#[derive(Debug)]
pub(crate) struct TransitionDriver {
    trigger: ViewportTrigger,
    arm_countdown: Option<f32>,
    arm_delay_seconds: f32,
}

impl TransitionDriver {
    pub(crate) fn new(config: &CarouselConfig) -> Self {
        Self {
            trigger: ViewportTrigger::new(config.viewport_threshold),
            arm_countdown: None,
            arm_delay_seconds: config.arm_delay_seconds,
        }
    }

    /// Slides the strip so the clip at `index` fills the frame.
    pub(crate) fn slide_to(
        &self,
        index: usize,
        engine: &mut TweenEngine,
        config: &CarouselConfig,
    ) {
        let offset = -100.0 * index as f32;
        debug!(index, offset, "sliding carousel");
        engine.to(
            StyleTarget::Slider,
            StyleProps::translate_x(offset),
            TweenOptions::new(config.slide.duration_seconds, config.slide.easing),
        );
    }

    /// Feeds a visibility sample. Returns true when this call scheduled the
    /// one-shot arm.
    pub(crate) fn observe_viewport(&mut self, visible_ratio: f32, state: &PlaybackState) -> bool {
        match self.trigger.observe(visible_ratio) {
            Some(Crossing::Entered) if !state.autoplay_armed && self.arm_countdown.is_none() => {
                debug!(delay = self.arm_delay_seconds, "carousel entered view, arming autoplay");
                self.arm_countdown = Some(self.arm_delay_seconds);
                true
            }
            Some(Crossing::Entered) => {
                debug!("carousel re-entered view, arm already issued");
                false
            }
            None => false,
        }
    }

    /// Counts down a pending arm; yields the arm event once it elapses.
    pub(crate) fn advance(&mut self, dt: f32) -> Option<PlaybackEvent> {
        let remaining = self.arm_countdown.as_mut()?;
        *remaining -= dt.max(0.0);
        if *remaining > 0.0 {
            return None;
        }

        self.arm_countdown = None;
        info!("autoplay armed");
        Some(PlaybackEvent::AutoplayArmed)
    }

    pub(crate) fn arm_pending(&self) -> bool {
        self.arm_countdown.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arms_once_after_delay() {
        let config = CarouselConfig::default();
        let mut driver = TransitionDriver::new(&config);
        let state = PlaybackState::default();

        assert!(driver.observe_viewport(1.0, &state));
        assert!(driver.arm_pending());
        assert_eq!(driver.advance(0.25), None);
        assert_eq!(driver.advance(0.25), Some(PlaybackEvent::AutoplayArmed));
        assert_eq!(driver.advance(1.0), None);

        let armed = state.apply(PlaybackEvent::AutoplayArmed, 4);
        driver.observe_viewport(0.0, &armed);
        assert!(!driver.observe_viewport(1.0, &armed));
        assert!(!driver.arm_pending());
    }

    #[test]
    fn repeated_entry_while_pending_does_not_reschedule() {
        let config = CarouselConfig::default();
        let mut driver = TransitionDriver::new(&config);
        let state = PlaybackState::default();

        assert!(driver.observe_viewport(1.0, &state));
        assert_eq!(driver.advance(0.25), None);
        driver.observe_viewport(0.0, &state);
        assert!(!driver.observe_viewport(1.0, &state));
        assert_eq!(driver.advance(0.25), Some(PlaybackEvent::AutoplayArmed));
    }

    #[test]
    fn slide_targets_negative_offset() {
        let config = CarouselConfig::default();
        let driver = TransitionDriver::new(&config);
        let mut engine = TweenEngine::new();

        driver.slide_to(2, &mut engine, &config);
        engine.advance(config.slide.duration_seconds);
        let style = engine.style(StyleTarget::Slider).unwrap();
        assert!((style.translate_x + 200.0).abs() < 1e-3);
    }
}

//! Frame-stepped tween scheduler used by the carousel.
//!
//! - [`TweenEngine`] interpolates style properties of [`StyleTarget`]s
//! - [`ProgressTween`] is a duration-bound progress handle scrubbed from an
//!   external clock
//! - [`Ticker`] holds the per-frame sampler registrations

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{ComputedStyle, Length, StyleProps, StyleTarget};

/// Timing curve applied to normalised tween time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[serde(rename = "none")]
    Linear,
    #[serde(rename = "power2.in")]
    Power2In,
    #[serde(rename = "power2.out")]
    Power2Out,
    #[default]
    #[serde(rename = "power2.inOut")]
    Power2InOut,
}

impl Easing {
    /// Maps `t` in [0, 1] to eased progress in [0, 1].
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Power2In => t * t * t,
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
            Easing::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
                }
            }
        }
    }
}

#[inline]
fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Handle returned for every scheduled tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenOptions {
    pub duration_seconds: f32,
    pub easing: Easing,
}

impl TweenOptions {
    pub fn new(duration_seconds: f32, easing: Easing) -> Self {
        Self {
            duration_seconds,
            easing,
        }
    }
}

#[derive(Debug)]
struct ActiveTween {
    id: TweenId,
    target: StyleTarget,
    props: StyleProps,
    from_translate: f32,
    from_width: Option<Length>,
    elapsed: f32,
    options: TweenOptions,
}

impl ActiveTween {
    fn normalised_time(&self) -> f32 {
        if self.options.duration_seconds <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.options.duration_seconds).clamp(0.0, 1.0)
        }
    }

    fn write(&self, style: &mut ComputedStyle) {
        let t = self.normalised_time();
        let eased = self.options.easing.apply(t);
        if let Some(to) = self.props.translate_x {
            style.translate_x = lerp_f32(self.from_translate, to, eased);
        }
        if let Some(to) = self.props.width {
            style.width = Some(match self.from_width {
                Some(from) if t < 1.0 => from.lerp(to, eased),
                _ => to,
            });
        }
    }
}

/// Schedules and steps style tweens.
///
/// A new tween on a target takes over the properties it names from any tween
/// already running on that target; requests are never queued.
#[derive(Debug, Default)]
pub struct TweenEngine {
    next_id: u64,
    tweens: Vec<ActiveTween>,
    styles: BTreeMap<StyleTarget, ComputedStyle>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a target's style without animating, cancelling overlapping tweens.
    pub fn set(&mut self, target: StyleTarget, props: StyleProps) {
        self.to(target, props, TweenOptions::new(0.0, Easing::Linear));
    }

    /// Animates `target` from its current style towards `props`.
    pub fn to(&mut self, target: StyleTarget, props: StyleProps, options: TweenOptions) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;

        for tween in self.tweens.iter_mut().filter(|tween| tween.target == target) {
            tween.props.remove_overlap(&props);
        }
        self.tweens.retain(|tween| !tween.props.is_empty());

        let style = self.styles.entry(target).or_default();
        if let Some(color) = &props.background {
            style.background = Some(color.clone());
        }

        let numeric = StyleProps {
            translate_x: props.translate_x,
            width: props.width,
            background: None,
        };
        if numeric.is_empty() {
            return id;
        }

        let tween = ActiveTween {
            id,
            target,
            props: numeric,
            from_translate: style.translate_x,
            from_width: style.width,
            elapsed: 0.0,
            options,
        };

        if options.duration_seconds <= 0.0 {
            tween.write(style);
        } else {
            self.tweens.push(tween);
        }

        id
    }

    /// Steps every running tween by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        for tween in &mut self.tweens {
            tween.elapsed += dt;
            let style = self.styles.entry(tween.target).or_default();
            tween.write(style);
        }
        self.tweens.retain(|tween| tween.normalised_time() < 1.0);
    }

    pub fn style(&self, target: StyleTarget) -> Option<&ComputedStyle> {
        self.styles.get(&target)
    }

    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn is_running(&self, id: TweenId) -> bool {
        self.tweens.iter().any(|tween| tween.id == id)
    }

    /// Number of tweens currently animating `target`.
    pub fn running_on(&self, target: StyleTarget) -> usize {
        self.tweens.iter().filter(|tween| tween.target == target).count()
    }
}

/// Notification produced when a [`ProgressTween`] moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenEvent {
    /// Completion, rounded up to a whole percentage, changed.
    Update { percent: u32 },
    /// Progress reached 1.0.
    Complete,
}

/// Progress handle for a clip indicator, driven by an external clock rather
/// than elapsed wall time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressTween {
    duration_seconds: f32,
    progress: f32,
    percent: u32,
    completed: bool,
}

impl ProgressTween {
    pub fn new(duration_seconds: f32) -> Self {
        Self {
            duration_seconds,
            progress: 0.0,
            percent: 0,
            completed: false,
        }
    }

    pub fn duration_seconds(&self) -> f32 {
        self.duration_seconds
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Last percentage reported through [`TweenEvent::Update`].
    pub fn percent(&self) -> u32 {
        self.percent
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Moves the tween to `progress` and reports what changed.
    pub fn set_progress(&mut self, progress: f32) -> Vec<TweenEvent> {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.progress = progress;

        let mut events = Vec::new();
        let percent = (progress * 100.0).ceil() as u32;
        if percent != self.percent {
            self.percent = percent;
            events.push(TweenEvent::Update { percent });
        }

        if progress >= 1.0 {
            if !self.completed {
                self.completed = true;
                events.push(TweenEvent::Complete);
            }
        } else {
            self.completed = false;
        }

        events
    }

    /// Scrubs to the position of `clock_seconds` on this tween's duration.
    pub fn sample_clock(&mut self, clock_seconds: f32) -> Vec<TweenEvent> {
        self.set_progress(clock_seconds / self.duration_seconds)
    }

    pub fn restart(&mut self) {
        self.progress = 0.0;
        self.percent = 0;
        self.completed = false;
    }
}

/// Per-frame sampler registrations keyed by identity.
#[derive(Debug, Clone)]
pub struct Ticker<K> {
    keys: BTreeSet<K>,
}

impl<K: Ord + Copy> Default for Ticker<K> {
    fn default() -> Self {
        Self {
            keys: BTreeSet::new(),
        }
    }
}

impl<K: Ord + Copy> Ticker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key`; returns false if it was already registered.
    pub fn add(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }

    /// Deregisters `key`; returns false if it was not registered.
    pub fn remove(&mut self, key: K) -> bool {
        self.keys.remove(&key)
    }

    pub fn contains(&self, key: K) -> bool {
        self.keys.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.keys.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_hits_endpoints() {
        for easing in [Easing::Linear, Easing::Power2In, Easing::Power2Out, Easing::Power2InOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        }
        assert!((Easing::Power2InOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!(Easing::Power2InOut.apply(0.25) < 0.25);
    }

    #[test]
    fn easing_uses_gsap_names() {
        let easing: Easing = serde_json::from_str("\"power2.inOut\"").unwrap();
        assert_eq!(easing, Easing::Power2InOut);
        assert_eq!(serde_json::to_string(&Easing::Linear).unwrap(), "\"none\"");
    }

    #[test]
    fn tween_reaches_target_and_retires() {
        let mut engine = TweenEngine::new();
        let id = engine.to(
            StyleTarget::Slider,
            StyleProps::translate_x(-100.0),
            TweenOptions::new(2.0, Easing::Linear),
        );
        engine.advance(1.0);
        let halfway = engine.style(StyleTarget::Slider).unwrap().translate_x;
        assert!((halfway + 50.0).abs() < 1e-4);
        assert!(engine.is_running(id));

        engine.advance(1.5);
        assert_eq!(engine.style(StyleTarget::Slider).unwrap().translate_x, -100.0);
        assert!(engine.is_idle());
    }

    #[test]
    fn later_request_retargets_same_property() {
        let mut engine = TweenEngine::new();
        let options = TweenOptions::new(1.0, Easing::Linear);
        let first = engine.to(StyleTarget::Slider, StyleProps::translate_x(-100.0), options);
        engine.advance(0.5);
        let second = engine.to(StyleTarget::Slider, StyleProps::translate_x(0.0), options);

        assert!(!engine.is_running(first));
        assert_eq!(engine.running_on(StyleTarget::Slider), 1);

        engine.advance(1.0);
        assert_eq!(engine.style(StyleTarget::Slider).unwrap().translate_x, 0.0);
        assert!(!engine.is_running(second));
    }

    #[test]
    fn colors_apply_immediately() {
        let mut engine = TweenEngine::new();
        let fill = StyleTarget::IndicatorFill(0);
        engine.set(fill, StyleProps::width(Length::Percent(0.0)));
        engine.to(
            fill,
            StyleProps::width(Length::Percent(40.0)).with_background("white"),
            TweenOptions::new(1.0, Easing::Linear),
        );

        let style = engine.style(fill).unwrap();
        assert_eq!(style.background.as_deref(), Some("white"));
        assert_eq!(style.width, Some(Length::Percent(0.0)));
    }

    #[test]
    fn progress_reports_ceiling_percent_changes() {
        let mut tween = ProgressTween::new(4.0);
        assert_eq!(tween.sample_clock(0.01), vec![TweenEvent::Update { percent: 1 }]);
        assert!(tween.sample_clock(0.02).is_empty());
        assert_eq!(tween.sample_clock(2.0), vec![TweenEvent::Update { percent: 50 }]);
        assert_eq!(
            tween.sample_clock(4.0),
            vec![TweenEvent::Update { percent: 100 }, TweenEvent::Complete]
        );
        assert!(tween.sample_clock(4.5).is_empty());
        assert!(tween.is_complete());

        tween.restart();
        assert_eq!(tween.percent(), 0);
        assert_eq!(tween.progress(), 0.0);
    }

    #[test]
    fn ticker_registration_is_idempotent() {
        let mut ticker = Ticker::new();
        assert!(ticker.add(2usize));
        assert!(!ticker.add(2));
        assert_eq!(ticker.len(), 1);
        assert!(ticker.remove(2));
        assert!(!ticker.remove(2));
        assert!(ticker.is_empty());
    }
}

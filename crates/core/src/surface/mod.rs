use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

use crate::{Result, ShowcaseError};

/// Native playback surface of a single clip.
pub trait ClipSurface {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    /// Playback clock in seconds.
    fn current_time(&self) -> f32;
    fn is_paused(&self) -> bool;
}

/// Append-only record of the surfaces mounted by the rendering layer.
///
/// Clip handles are weak: the renderer owns their lifecycle and a dropped
/// handle reads the same as one that never mounted.
#[derive(Debug)]
pub struct SurfaceRegistry<S> {
    clips: Vec<Option<Weak<RefCell<S>>>>,
    indicators: Vec<bool>,
    ready: BTreeSet<usize>,
}

impl<S> Default for SurfaceRegistry<S> {
    fn default() -> Self {
        Self {
            clips: Vec::new(),
            indicators: Vec::new(),
            ready: BTreeSet::new(),
        }
    }
}

impl<S> SurfaceRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount_clip(&mut self, index: usize, surface: &Rc<RefCell<S>>) {
        if self.clips.len() <= index {
            self.clips.resize_with(index + 1, || None);
        }
        self.clips[index] = Some(Rc::downgrade(surface));
    }

    pub fn mount_indicator(&mut self, index: usize) {
        if self.indicators.len() <= index {
            self.indicators.resize(index + 1, false);
        }
        self.indicators[index] = true;
    }

    /// Live handle for the clip at `index`, if mounted and not dropped.
    pub fn clip(&self, index: usize) -> Option<Rc<RefCell<S>>> {
        self.clips.get(index)?.as_ref()?.upgrade()
    }

    pub fn has_indicator(&self, index: usize) -> bool {
        self.indicators.get(index).copied().unwrap_or(false)
    }

    /// Records loaded metadata for `index`; returns true the first time.
    pub fn mark_ready(&mut self, index: usize) -> bool {
        self.ready.insert(index)
    }

    pub fn is_ready(&self, index: usize) -> bool {
        self.ready.contains(&index)
    }

    /// Number of distinct clips that have reported metadata.
    pub fn ready_count(&self) -> usize {
        self.ready.len()
    }

    /// Indices with a live clip handle.
    pub fn mounted_clips(&self) -> impl Iterator<Item = usize> + '_ {
        self.clips
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.as_ref().map_or(false, |weak| weak.strong_count() > 0))
            .map(|(index, _)| index)
    }
}

/// Notification raised by a [`SimulatedClip`] while it advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceNotice {
    Started,
    Ended,
}

/// Deterministic in-memory clip used by the CLI simulation and tests.
#[derive(Debug, Clone)]
pub struct SimulatedClip {
    duration_seconds: f32,
    current_time: f32,
    playback_rate: f32,
    paused: bool,
    start_pending: bool,
    play_calls: u32,
    pause_calls: u32,
    reject_play: bool,
}

impl SimulatedClip {
    pub fn new(duration_seconds: f32) -> Self {
        Self {
            duration_seconds,
            current_time: 0.0,
            playback_rate: 1.0,
            paused: true,
            start_pending: false,
            play_calls: 0,
            pause_calls: 0,
            reject_play: false,
        }
    }

    /// Makes every subsequent `play` call fail, as an autoplay-blocked
    /// surface would.
    pub fn rejecting_play(mut self) -> Self {
        self.reject_play = true;
        self
    }

    pub fn set_playback_rate(&mut self, rate: f32) {
        self.playback_rate = rate.max(0.0);
    }

    pub fn seek(&mut self, seconds: f32) {
        self.current_time = seconds.clamp(0.0, self.duration_seconds);
    }

    pub fn play_calls(&self) -> u32 {
        self.play_calls
    }

    pub fn pause_calls(&self) -> u32 {
        self.pause_calls
    }

    /// Moves the clock forward by `dt` seconds of wall time.
    pub fn advance(&mut self, dt: f32) -> Vec<SurfaceNotice> {
        let mut notices = Vec::new();
        if std::mem::take(&mut self.start_pending) {
            notices.push(SurfaceNotice::Started);
        }
        if self.paused {
            return notices;
        }

        self.current_time += dt.max(0.0) * self.playback_rate;
        if self.current_time >= self.duration_seconds {
            self.current_time = self.duration_seconds;
            self.paused = true;
            notices.push(SurfaceNotice::Ended);
        }
        notices
    }
}

impl ClipSurface for SimulatedClip {
    fn play(&mut self) -> Result<()> {
        self.play_calls += 1;
        if self.reject_play {
            return Err(ShowcaseError::Surface("playback was not allowed".into()));
        }
        if self.current_time >= self.duration_seconds {
            self.current_time = 0.0;
        }
        if self.paused {
            self.paused = false;
            self.start_pending = true;
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.pause_calls += 1;
        self.paused = true;
        self.start_pending = false;
        Ok(())
    }

    fn current_time(&self) -> f32 {
        self.current_time
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_handles_read_as_absent() {
        let mut registry = SurfaceRegistry::new();
        let clip = Rc::new(RefCell::new(SimulatedClip::new(1.0)));
        registry.mount_clip(2, &clip);

        assert!(registry.clip(0).is_none());
        assert!(registry.clip(2).is_some());
        assert_eq!(registry.mounted_clips().collect::<Vec<_>>(), vec![2]);

        drop(clip);
        assert!(registry.clip(2).is_none());
        assert_eq!(registry.mounted_clips().count(), 0);
    }

    #[test]
    fn readiness_counts_distinct_clips() {
        let mut registry: SurfaceRegistry<SimulatedClip> = SurfaceRegistry::new();
        assert!(registry.mark_ready(0));
        assert!(!registry.mark_ready(0));
        assert!(registry.mark_ready(3));
        assert_eq!(registry.ready_count(), 2);
        assert!(registry.is_ready(3));
        assert!(!registry.has_indicator(3));
        registry.mount_indicator(3);
        assert!(registry.has_indicator(3));
    }

    #[test]
    fn simulated_clip_reports_start_and_end() {
        let mut clip = SimulatedClip::new(1.0);
        assert!(clip.advance(0.5).is_empty());

        clip.play().unwrap();
        assert_eq!(clip.advance(0.5), vec![SurfaceNotice::Started]);
        assert_eq!(clip.advance(0.6), vec![SurfaceNotice::Ended]);
        assert!(clip.is_paused());
        assert_eq!(clip.current_time(), 1.0);

        clip.play().unwrap();
        assert_eq!(clip.current_time(), 0.0);
    }

    #[test]
    fn playback_rate_scales_clock() {
        let mut clip = SimulatedClip::new(4.0);
        clip.set_playback_rate(2.0);
        clip.play().unwrap();
        clip.advance(0.5);
        assert_eq!(clip.current_time(), 1.0);

        clip.seek(3.5);
        assert_eq!(clip.advance(0.5), vec![SurfaceNotice::Ended]);
    }

    #[test]
    fn rejecting_clip_stays_paused() {
        let mut clip = SimulatedClip::new(1.0).rejecting_play();
        assert!(clip.play().is_err());
        assert!(clip.is_paused());
        assert_eq!(clip.play_calls(), 1);
    }
}

//! Playback state machine for the clip carousel.
//!
//! [`PlaybackState::apply`] is a pure function of the current state and one
//! [`PlaybackEvent`]. Side effects (slide tweens, native play/pause calls,
//! progress sampling) are derived afterwards by comparing the previous and
//! next states, see [`crate::carousel`].

use serde::{Deserialize, Serialize};

/// Discrete inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// The clip at this index played to its end.
    ClipEnded(usize),
    /// Replay pressed after the sequence finished.
    ResetRequested,
    /// Play or pause pressed; the same toggle serves both.
    PlayToggleRequested,
    /// The one-shot autoplay arm fired after the carousel came into view.
    AutoplayArmed,
    /// The native surface of this clip reported that playback began.
    ClipStarted(usize),
}

/// Single mutable playback record owned by the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub active_index: usize,
    /// Set once the final clip has finished.
    pub sequence_ended: bool,
    /// Latches true on the first arm, never cleared.
    pub autoplay_armed: bool,
    /// Whether the active clip should be playing.
    pub is_playing: bool,
    pub active_clip_finished: bool,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state that follows `event` for a sequence of `clip_count`
    /// clips. Events that do not apply to the current state are no-ops.
    pub fn apply(&self, event: PlaybackEvent, clip_count: usize) -> PlaybackState {
        let mut next = *self;
        let last_index = clip_count.saturating_sub(1);

        match event {
            PlaybackEvent::ClipEnded(index) if index >= clip_count => {}
            PlaybackEvent::ClipEnded(index) if index == last_index => {
                next.active_index = last_index;
                next.sequence_ended = true;
                next.active_clip_finished = true;
            }
            PlaybackEvent::ClipEnded(index) => {
                // A late end from an earlier clip also leaves the finished sequence.
                next.active_index = index + 1;
                next.sequence_ended = false;
                next.active_clip_finished = false;
            }
            PlaybackEvent::ResetRequested => {
                if self.sequence_ended {
                    next.active_index = 0;
                    next.sequence_ended = false;
                    next.active_clip_finished = false;
                }
            }
            PlaybackEvent::PlayToggleRequested => {
                next.is_playing = !self.is_playing;
            }
            PlaybackEvent::AutoplayArmed => {
                next.autoplay_armed = true;
                next.is_playing = true;
            }
            PlaybackEvent::ClipStarted(index) => {
                if index == self.active_index {
                    next.is_playing = true;
                }
            }
        }

        next
    }

    /// The action offered by the single control button.
    pub fn control(&self) -> ControlAction {
        if self.sequence_ended {
            ControlAction::Replay
        } else if !self.is_playing {
            ControlAction::Play
        } else {
            ControlAction::Pause
        }
    }

    /// Checks the structural invariants against a clip count.
    pub fn is_consistent(&self, clip_count: usize) -> bool {
        let in_range = self.active_index < clip_count;
        let ended_on_last = !self.sequence_ended || self.active_index + 1 == clip_count;
        in_range && ended_on_last
    }
}

/// Icon/action pair currently shown on the control button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Replay,
    Play,
    Pause,
}

impl ControlAction {
    /// Event issued when the button is pressed while showing this action.
    pub fn event(self) -> PlaybackEvent {
        match self {
            ControlAction::Replay => PlaybackEvent::ResetRequested,
            ControlAction::Play | ControlAction::Pause => PlaybackEvent::PlayToggleRequested,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlAction::Replay => "replay",
            ControlAction::Play => "play",
            ControlAction::Pause => "pause",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIPS: usize = 4;

    fn at(index: usize) -> PlaybackState {
        PlaybackState {
            active_index: index,
            ..PlaybackState::default()
        }
    }

    #[test]
    fn clip_end_advances_to_next() {
        let next = at(1).apply(PlaybackEvent::ClipEnded(1), CLIPS);
        assert_eq!(next.active_index, 2);
        assert!(!next.sequence_ended);
        assert!(next.is_consistent(CLIPS));
    }

    #[test]
    fn last_clip_end_finishes_sequence() {
        let next = at(3).apply(PlaybackEvent::ClipEnded(3), CLIPS);
        assert_eq!(next.active_index, 3);
        assert!(next.active_clip_finished);
        assert!(next.sequence_ended);
        assert_eq!(next.control(), ControlAction::Replay);
    }

    #[test]
    fn late_end_after_finish_reopens_sequence() {
        let finished = at(3).apply(PlaybackEvent::ClipEnded(3), CLIPS);
        let late = finished.apply(PlaybackEvent::ClipEnded(0), CLIPS);
        assert_eq!(late.active_index, 1);
        assert!(!late.sequence_ended);
        assert!(!late.active_clip_finished);
        assert!(late.is_consistent(CLIPS));
        assert_eq!(late.control(), ControlAction::Play);
    }

    #[test]
    fn out_of_range_end_is_ignored() {
        let state = at(2);
        assert_eq!(state.apply(PlaybackEvent::ClipEnded(4), CLIPS), state);
        assert_eq!(state.apply(PlaybackEvent::ClipEnded(usize::MAX), CLIPS), state);
    }

    #[test]
    fn reset_only_after_sequence_end() {
        let playing = PlaybackState {
            is_playing: true,
            ..at(2)
        };
        assert_eq!(playing.apply(PlaybackEvent::ResetRequested, CLIPS), playing);

        let finished = playing.apply(PlaybackEvent::ClipEnded(3), CLIPS);
        let reset = finished.apply(PlaybackEvent::ResetRequested, CLIPS);
        assert_eq!(reset.active_index, 0);
        assert!(!reset.sequence_ended);
        assert!(!reset.active_clip_finished);
        assert!(reset.is_playing);
    }

    #[test]
    fn toggle_twice_restores_intent() {
        let state = at(0);
        let once = state.apply(PlaybackEvent::PlayToggleRequested, CLIPS);
        assert!(once.is_playing);
        let twice = once.apply(PlaybackEvent::PlayToggleRequested, CLIPS);
        assert_eq!(twice, state);
    }

    #[test]
    fn arming_latches() {
        let armed = at(0).apply(PlaybackEvent::AutoplayArmed, CLIPS);
        assert!(armed.autoplay_armed && armed.is_playing);

        let events = [
            PlaybackEvent::PlayToggleRequested,
            PlaybackEvent::ClipEnded(0),
            PlaybackEvent::ClipEnded(3),
            PlaybackEvent::ResetRequested,
        ];
        let after = events
            .iter()
            .fold(armed, |state, event| state.apply(*event, CLIPS));
        assert!(after.autoplay_armed);
    }

    #[test]
    fn clip_started_only_counts_for_active_clip() {
        let state = at(1);
        assert!(!state.apply(PlaybackEvent::ClipStarted(2), CLIPS).is_playing);
        assert!(state.apply(PlaybackEvent::ClipStarted(1), CLIPS).is_playing);
    }

    #[test]
    fn control_follows_state() {
        assert_eq!(at(0).control(), ControlAction::Play);
        assert_eq!(at(0).control().event(), PlaybackEvent::PlayToggleRequested);
        let playing = PlaybackState {
            is_playing: true,
            ..at(0)
        };
        assert_eq!(playing.control(), ControlAction::Pause);
        assert_eq!(ControlAction::Replay.event(), PlaybackEvent::ResetRequested);
    }
}

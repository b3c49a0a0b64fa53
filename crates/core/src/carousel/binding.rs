use serde::Serialize;
use tracing::{debug, warn};

use crate::{ClipSurface, PlaybackState, SurfaceRegistry};

/// Outcome of reconciling the native surfaces with playback intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "index")]
pub enum BindingAction {
    /// Too few clips have loaded metadata; nothing was called.
    Deferred,
    /// The active clip has not mounted (or was dropped).
    Unmounted(usize),
    Paused(usize),
    Played(usize),
    /// Playback is wanted but autoplay has not been armed yet.
    AwaitingArm,
    /// The surface refused the call.
    Rejected(usize),
}

/// Calls `play`/`pause` on the active clip only. Every other clip is left
/// untouched.
pub(crate) fn reconcile<S: ClipSurface>(
    state: &PlaybackState,
    registry: &SurfaceRegistry<S>,
    readiness_threshold: usize,
) -> BindingAction {
    if registry.ready_count() < readiness_threshold {
        debug!(
            ready = registry.ready_count(),
            readiness_threshold, "deferring playback binding"
        );
        return BindingAction::Deferred;
    }

    let index = state.active_index;
    let Some(clip) = registry.clip(index) else {
        return BindingAction::Unmounted(index);
    };
    let mut clip = clip.borrow_mut();

    let (result, action) = if !state.is_playing {
        (clip.pause(), BindingAction::Paused(index))
    } else if state.autoplay_armed {
        (clip.play(), BindingAction::Played(index))
    } else {
        return BindingAction::AwaitingArm;
    };

    match result {
        Ok(()) => {
            debug!(?action, "reconciled clip playback");
            action
        }
        Err(err) => {
            warn!(index, %err, "clip surface rejected playback call");
            BindingAction::Rejected(index)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::SimulatedClip;

    fn registry_with(clips: &[Rc<RefCell<SimulatedClip>>]) -> SurfaceRegistry<SimulatedClip> {
        let mut registry = SurfaceRegistry::new();
        for (index, clip) in clips.iter().enumerate() {
            registry.mount_clip(index, clip);
            registry.mark_ready(index);
        }
        registry
    }

    #[test]
    fn below_threshold_calls_nothing() {
        let clip = Rc::new(RefCell::new(SimulatedClip::new(2.0)));
        let registry = registry_with(&[clip.clone()]);
        let state = PlaybackState {
            is_playing: true,
            autoplay_armed: true,
            ..PlaybackState::default()
        };

        assert_eq!(reconcile(&state, &registry, 2), BindingAction::Deferred);
        assert_eq!(clip.borrow().play_calls(), 0);
        assert_eq!(clip.borrow().pause_calls(), 0);
    }

    #[test]
    fn plays_only_the_active_clip() {
        let clips: Vec<_> = (0..3)
            .map(|_| Rc::new(RefCell::new(SimulatedClip::new(2.0))))
            .collect();
        let registry = registry_with(&clips);
        let state = PlaybackState {
            active_index: 1,
            is_playing: true,
            autoplay_armed: true,
            ..PlaybackState::default()
        };

        assert_eq!(reconcile(&state, &registry, 3), BindingAction::Played(1));
        let playing: Vec<_> = clips.iter().map(|clip| !clip.borrow().is_paused()).collect();
        assert_eq!(playing, vec![false, true, false]);
    }

    #[test]
    fn waits_for_arm_before_playing() {
        let clip = Rc::new(RefCell::new(SimulatedClip::new(2.0)));
        let registry = registry_with(&[clip.clone()]);
        let state = PlaybackState {
            is_playing: true,
            ..PlaybackState::default()
        };

        assert_eq!(reconcile(&state, &registry, 1), BindingAction::AwaitingArm);
        assert_eq!(clip.borrow().play_calls(), 0);
    }

    #[test]
    fn surface_errors_are_absorbed() {
        let clip = Rc::new(RefCell::new(SimulatedClip::new(2.0).rejecting_play()));
        let registry = registry_with(&[clip.clone()]);
        let state = PlaybackState {
            is_playing: true,
            autoplay_armed: true,
            ..PlaybackState::default()
        };

        assert_eq!(reconcile(&state, &registry, 1), BindingAction::Rejected(0));
        assert_eq!(clip.borrow().play_calls(), 1);
        assert!(clip.borrow().is_paused());
    }
}

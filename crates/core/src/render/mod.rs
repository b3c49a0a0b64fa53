use serde::{Deserialize, Serialize};

use crate::{ClipCatalog, ControlAction, PlaybackState, StyleTarget, TweenEngine};

/// Renderer-facing view of the whole carousel at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselSnapshot {
    pub state: PlaybackState,
    /// Horizontal offset of the clip strip, in percent of one slide.
    pub slider_offset: f32,
    pub slides: Vec<SlideView>,
    pub indicators: Vec<IndicatorView>,
    pub control: ControlView,
}

impl CarouselSnapshot {
    pub fn capture(state: &PlaybackState, catalog: &ClipCatalog, engine: &TweenEngine) -> Self {
        let slider_offset = engine
            .style(StyleTarget::Slider)
            .map(|style| style.translate_x)
            .unwrap_or_default();

        let slides = catalog
            .iter()
            .enumerate()
            .map(|(index, clip)| SlideView {
                id: clip.id,
                source: clip.source.clone(),
                caption_lines: clip.caption_lines.clone(),
                active: index == state.active_index,
            })
            .collect();

        let indicators = (0..catalog.len())
            .map(|index| {
                let track = engine.style(StyleTarget::IndicatorTrack(index));
                let fill = engine.style(StyleTarget::IndicatorFill(index));
                IndicatorView {
                    index,
                    track_width: track.and_then(|s| s.width).map(|w| w.to_string()),
                    fill_width: fill.and_then(|s| s.width).map(|w| w.to_string()),
                    fill_color: fill.and_then(|s| s.background.clone()),
                }
            })
            .collect();

        Self {
            state: *state,
            slider_offset,
            slides,
            indicators,
            control: state.control().into(),
        }
    }

    /// CSS transform applied to the clip strip.
    pub fn slider_transform(&self) -> String {
        format!("translateX({}%)", self.slider_offset)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideView {
    pub id: u32,
    pub source: String,
    pub caption_lines: Vec<String>,
    pub active: bool,
}

/// Outer track and inner fill of one clip's progress indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorView {
    pub index: usize,
    pub track_width: Option<String>,
    pub fill_width: Option<String>,
    pub fill_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlView {
    pub action: ControlAction,
    pub icon: String,
    pub label: String,
}

impl From<ControlAction> for ControlView {
    fn from(action: ControlAction) -> Self {
        Self {
            action,
            icon: format!("{}.svg", action.label()),
            label: action.label().to_string(),
        }
    }
}

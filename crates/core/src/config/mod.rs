use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ClipCatalog, ClipDescriptor, Easing, Length, Result, ShowcaseError};

/// Top-level configuration: controller tunables plus the ordered clip list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowcaseConfig {
    #[serde(default)]
    pub carousel: CarouselConfig,
    pub clips: Vec<ClipDescriptor>,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            carousel: CarouselConfig::default(),
            clips: ClipCatalog::highlights().iter().cloned().collect(),
        }
    }
}

impl ShowcaseConfig {
    /// Reads a JSON configuration from disk and validates it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    /// Parses a JSON configuration and validates it.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.carousel.validate()?;
        let catalog = ClipCatalog::new(self.clips.clone())?;
        if self.carousel.readiness_threshold > catalog.len() {
            return Err(ShowcaseError::invalid_config(format!(
                "readiness_threshold {} exceeds the {} configured clips",
                self.carousel.readiness_threshold,
                catalog.len()
            )));
        }
        Ok(())
    }

    /// Builds the immutable clip catalog described by this configuration.
    pub fn catalog(&self) -> Result<ClipCatalog> {
        ClipCatalog::new(self.clips.clone())
    }
}

/// Tunables for the carousel playback controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Number of clips that must report loaded metadata before play/pause
    /// calls and progress restarts take effect.
    pub readiness_threshold: usize,
    /// Delay between the first boundary crossing and autoplay arming.
    pub arm_delay_seconds: f32,
    /// Visible ratio at or above which the carousel counts as in view.
    pub viewport_threshold: f32,
    pub slide: SlideConfig,
    pub indicator: IndicatorConfig,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            readiness_threshold: 4,
            arm_delay_seconds: 0.5,
            viewport_threshold: 0.0,
            slide: SlideConfig::default(),
            indicator: IndicatorConfig::default(),
        }
    }
}

impl CarouselConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.arm_delay_seconds.is_finite() || self.arm_delay_seconds < 0.0 {
            return Err(ShowcaseError::invalid_config(
                "arm_delay_seconds must be a non-negative number",
            ));
        }
        if !(0.0..=1.0).contains(&self.viewport_threshold) {
            return Err(ShowcaseError::invalid_config(
                "viewport_threshold must lie within [0, 1]",
            ));
        }
        if !self.slide.duration_seconds.is_finite() || self.slide.duration_seconds < 0.0 {
            return Err(ShowcaseError::invalid_config(
                "slide duration must be a non-negative number",
            ));
        }
        self.indicator.validate()
    }
}

/// Clip-to-clip slide animation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    pub duration_seconds: f32,
    pub easing: Easing,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 2.0,
            easing: Easing::Power2InOut,
        }
    }
}

/// Progress indicator sizing and tint policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Viewports narrower than this use `small_width`.
    pub small_max_px: f32,
    /// Viewports narrower than this (and not small) use `medium_width`.
    pub medium_max_px: f32,
    pub small_width: Length,
    pub medium_width: Length,
    pub large_width: Length,
    /// Track width once a clip has finished.
    pub finished_width: Length,
    pub active_tint: String,
    pub inactive_tint: String,
    /// Duration of the width/tint tweens issued on each progress update.
    pub style_tween_seconds: f32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            small_max_px: 760.0,
            medium_max_px: 1200.0,
            small_width: Length::Vw(10.0),
            medium_width: Length::Vw(10.0),
            large_width: Length::Vw(4.0),
            finished_width: Length::Px(12.0),
            active_tint: "white".to_string(),
            inactive_tint: "#afafaf".to_string(),
            style_tween_seconds: 0.5,
        }
    }
}

impl IndicatorConfig {
    /// Width of an active indicator track for the given viewport width.
    pub fn active_width(&self, viewport_px: f32) -> Length {
        if viewport_px < self.small_max_px {
            self.small_width
        } else if viewport_px < self.medium_max_px {
            self.medium_width
        } else {
            self.large_width
        }
    }

    fn validate(&self) -> Result<()> {
        if self.small_max_px > self.medium_max_px {
            return Err(ShowcaseError::invalid_config(
                "indicator breakpoints must be ascending",
            ));
        }
        if !self.style_tween_seconds.is_finite() || self.style_tween_seconds < 0.0 {
            return Err(ShowcaseError::invalid_config(
                "style_tween_seconds must be a non-negative number",
            ));
        }
        Ok(())
    }
}

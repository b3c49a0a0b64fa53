use std::fmt;

use serde::{Deserialize, Serialize};

/// Element whose style properties can be animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StyleTarget {
    /// The horizontal strip holding every clip.
    Slider,
    /// Outer container of the indicator paired with a clip.
    IndicatorTrack(usize),
    /// Inner fill of the indicator paired with a clip.
    IndicatorFill(usize),
}

/// CSS-style length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Percent(f32),
    Vw(f32),
    Px(f32),
}

impl Length {
    pub fn value(self) -> f32 {
        match self {
            Length::Percent(v) | Length::Vw(v) | Length::Px(v) => v,
        }
    }

    fn with_value(self, value: f32) -> Self {
        match self {
            Length::Percent(_) => Length::Percent(value),
            Length::Vw(_) => Length::Vw(value),
            Length::Px(_) => Length::Px(value),
        }
    }

    fn same_unit(self, other: Length) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }

    /// Interpolates towards `to`. Lengths in different units snap to `to`.
    pub fn lerp(self, to: Length, t: f32) -> Length {
        if self.same_unit(to) {
            self.with_value(self.value() + (to.value() - self.value()) * t)
        } else {
            to
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Percent(v) => write!(f, "{v}%"),
            Length::Vw(v) => write!(f, "{v}vw"),
            Length::Px(v) => write!(f, "{v}px"),
        }
    }
}

/// Property values requested for a tween. `None` leaves a property alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleProps {
    /// Horizontal offset in percent of the element width.
    pub translate_x: Option<f32>,
    pub width: Option<Length>,
    pub background: Option<String>,
}

impl StyleProps {
    pub fn translate_x(percent: f32) -> Self {
        Self {
            translate_x: Some(percent),
            ..Self::default()
        }
    }

    pub fn width(width: Length) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    pub fn background(color: impl Into<String>) -> Self {
        Self {
            background: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.translate_x.is_none() && self.width.is_none() && self.background.is_none()
    }

    /// Clears the properties that `other` sets.
    pub(crate) fn remove_overlap(&mut self, other: &StyleProps) {
        if other.translate_x.is_some() {
            self.translate_x = None;
        }
        if other.width.is_some() {
            self.width = None;
        }
        if other.background.is_some() {
            self.background = None;
        }
    }
}

/// Current style of one target as seen by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputedStyle {
    pub translate_x: f32,
    pub width: Option<Length>,
    pub background: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_render_as_css() {
        assert_eq!(Length::Percent(42.0).to_string(), "42%");
        assert_eq!(Length::Vw(4.0).to_string(), "4vw");
        assert_eq!(Length::Px(12.0).to_string(), "12px");
    }

    #[test]
    fn mixed_units_snap_to_target() {
        let from = Length::Vw(10.0);
        let to = Length::Px(12.0);
        assert_eq!(from.lerp(to, 0.25), to);
        assert_eq!(Length::Percent(0.0).lerp(Length::Percent(50.0), 0.5), Length::Percent(25.0));
    }

    #[test]
    fn overlap_removal_keeps_disjoint_props() {
        let mut running = StyleProps::width(Length::Percent(40.0)).with_background("white");
        running.remove_overlap(&StyleProps::background("#afafaf"));
        assert_eq!(running.width, Some(Length::Percent(40.0)));
        assert!(running.background.is_none());
    }
}

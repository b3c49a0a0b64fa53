use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Result, ShowcaseError};

/// Static description of one clip in the showcase sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipDescriptor {
    pub id: u32,
    /// Media source reference handed to the native surface.
    pub source: String,
    /// Total clip length, used to normalise the playback clock.
    pub duration_seconds: f32,
    #[serde(default)]
    pub caption_lines: Vec<String>,
}

impl ClipDescriptor {
    pub fn new(id: u32, source: impl Into<String>, duration_seconds: f32) -> Self {
        Self {
            id,
            source: source.into(),
            duration_seconds,
            caption_lines: Vec::new(),
        }
    }

    pub fn with_captions<I, T>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.caption_lines = lines.into_iter().map(Into::into).collect();
        self
    }
}

/// Ordered, validated and immutable list of clips.
#[derive(Debug, Clone)]
pub struct ClipCatalog {
    clips: Vec<ClipDescriptor>,
}

impl ClipCatalog {
    pub fn new(clips: Vec<ClipDescriptor>) -> Result<Self> {
        if clips.is_empty() {
            return Err(ShowcaseError::invalid_config(
                "the carousel needs at least one clip",
            ));
        }

        let mut seen = HashSet::new();
        for clip in &clips {
            if !clip.duration_seconds.is_finite() || clip.duration_seconds <= 0.0 {
                return Err(ShowcaseError::invalid_config(format!(
                    "clip `{}` has a non-positive duration",
                    clip.id
                )));
            }
            if !seen.insert(clip.id) {
                return Err(ShowcaseError::invalid_config(format!(
                    "clip id `{}` appears more than once",
                    clip.id
                )));
            }
        }

        Ok(Self { clips })
    }

    /// The four highlight clips shown on the product page.
    pub fn highlights() -> Self {
        Self {
            clips: vec![
                ClipDescriptor::new(1, "/assets/videos/highlight-first.mp4", 4.0)
                    .with_captions(["A new pro-class chip.", "Groundbreaking performance."]),
                ClipDescriptor::new(2, "/assets/videos/highlight-second.mp4", 5.0)
                    .with_captions(["Titanium.", "So strong. So light."]),
                ClipDescriptor::new(3, "/assets/videos/highlight-third.mp4", 2.0)
                    .with_captions(["The longest optical zoom", "we have ever shipped."]),
                ClipDescriptor::new(4, "/assets/videos/highlight-fourth.mp4", 3.63)
                    .with_captions(["An all-new action button.", "What will yours do?"]),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Always false; an empty catalog cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.clips.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&ClipDescriptor> {
        self.clips.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClipDescriptor> {
        self.clips.iter()
    }
}

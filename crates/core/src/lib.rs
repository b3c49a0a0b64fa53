//! Core library for the showcase video carousel.
//!
//! The carousel plays a fixed sequence of clips end to end, keeps one
//! progress indicator per clip in step with that clip's playback clock, and
//! offers a single play/pause/replay control. Rendering, media decoding and
//! scroll detection belong to the host; this crate owns the playback state
//! machine and the effects derived from it.

pub mod carousel;
pub mod clips;
pub mod config;
pub mod error;
pub mod render;
pub mod state;
pub mod style;
pub mod surface;
pub mod timeline;
pub mod viewport;

pub use carousel::{BindingAction, CarouselController, DEFAULT_VIEWPORT_WIDTH};
pub use clips::{ClipCatalog, ClipDescriptor};
pub use config::{CarouselConfig, IndicatorConfig, ShowcaseConfig, SlideConfig};
pub use error::{Result, ShowcaseError};
pub use render::{CarouselSnapshot, ControlView, IndicatorView, SlideView};
pub use state::{ControlAction, PlaybackEvent, PlaybackState};
pub use style::{ComputedStyle, Length, StyleProps, StyleTarget};
pub use surface::{ClipSurface, SimulatedClip, SurfaceNotice, SurfaceRegistry};
pub use timeline::{Easing, ProgressTween, Ticker, TweenEngine, TweenEvent, TweenId, TweenOptions};
pub use viewport::{Crossing, ViewportTrigger};

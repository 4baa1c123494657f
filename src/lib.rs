//! # oled-carousel
//!
//! Frame carousel UI engine for small monochrome displays.
//!
//! This crate cycles through user-supplied drawing callbacks ("frames"),
//! slides between them, and draws a position indicator and always-visible
//! overlays on top, paced to a target frame rate:
//! - A tick-driven transition state machine ([`TransitionController`])
//! - An update driver turning wall time into ticks ([`CarouselUi`])
//! - A frame position indicator with replaceable 8×8 glyphs
//! - An SSD1306-layout framebuffer usable as a drawing surface
//!
//! Drawing is done with `embedded-graphics`; any `DrawTarget` with
//! `BinaryColor` pixels can become a [`DisplaySurface`].
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for configuration types
//! - `toml` - Load [`CarouselConfig`] from TOML
//! - `web` - Enable web/WASM canvas presentation
//!
//! ## Example
//!
//! ```rust,ignore
//! use oled_carousel::{draw_string, CarouselUi, FrameList, OverlayList, StdClock};
//!
//! let mut ui = CarouselUi::new(display, StdClock::new());
//! ui.set_frames(
//!     FrameList::new()
//!         .with(|d: &mut Display, at: Point| draw_string(d, "Weather", at))
//!         .with(|d: &mut Display, at: Point| draw_string(d, "Clock", at)),
//! );
//! ui.set_overlays(OverlayList::new().with(draw_battery));
//!
//! loop {
//!     let wait = ui.update().as_millis();
//!     if wait > 0 {
//!         sleep_ms(wait);
//!     }
//! }
//! ```

mod animation;
mod clock;
mod color;
mod config;
mod glyph;
mod indicator;
mod registry;
mod surface;
pub mod timing;
mod ui;
#[cfg(feature = "web")]
pub mod web;

pub use animation::{
    FrameState, Redraw, RedrawPolicy, SlideDirection, SlideOffsets, TransitionController,
    TransitionDirection,
};
pub use clock::{Clock, ManualClock, StdClock};
pub use color::{parse_color, PanelColors};
pub use config::{CarouselConfig, ConfigError};
pub use glyph::Glyph;
pub use indicator::{
    GlyphPlacement, IndicatorDirection, IndicatorPosition, IndicatorStyle, GLYPH_SPACING,
};
pub use registry::{Frame, FrameList, Overlay, OverlayList};
pub use surface::{draw_string, DisplaySurface, MonoBuffer};
pub use ui::{CarouselUi, UpdateStatus};

#[cfg(feature = "web")]
pub use web::CanvasSurface;

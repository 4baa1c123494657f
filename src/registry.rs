//! Frame and overlay drawables and their ordered lists.

use embedded_graphics::prelude::Point;

use crate::DisplaySurface;

/// One page of the carousel.
///
/// `origin` is where the frame's top-left corner currently sits; it is
/// `(0, 0)` while the frame is fixed and moves during slides. Frames
/// should draw relative to it and rely on the surface to clip.
///
/// Implemented for every `FnMut(&mut S, Point) -> Result<(), S::Error>`.
pub trait Frame<S: DisplaySurface> {
    fn draw(&mut self, surface: &mut S, origin: Point) -> Result<(), S::Error>;
}

impl<S, F> Frame<S> for F
where
    S: DisplaySurface,
    F: FnMut(&mut S, Point) -> Result<(), S::Error>,
{
    fn draw(&mut self, surface: &mut S, origin: Point) -> Result<(), S::Error> {
        self(surface, origin)
    }
}

/// Content drawn on top of every redraw, independent of the carousel.
///
/// Implemented for every `FnMut(&mut S) -> Result<(), S::Error>`.
pub trait Overlay<S: DisplaySurface> {
    fn draw(&mut self, surface: &mut S) -> Result<(), S::Error>;
}

impl<S, F> Overlay<S> for F
where
    S: DisplaySurface,
    F: FnMut(&mut S) -> Result<(), S::Error>,
{
    fn draw(&mut self, surface: &mut S) -> Result<(), S::Error> {
        self(surface)
    }
}

/// Ordered list of frames. Position in the list is the frame index.
///
/// ## Example
///
/// ```rust
/// use oled_carousel::{draw_string, FrameList, MonoBuffer};
/// use embedded_graphics::prelude::*;
///
/// let frames = FrameList::<MonoBuffer>::new()
///     .with(|d: &mut MonoBuffer, origin: Point| draw_string(d, "one", origin))
///     .with(|d: &mut MonoBuffer, origin: Point| draw_string(d, "two", origin));
/// assert_eq!(frames.len(), 2);
/// ```
pub struct FrameList<'a, S: DisplaySurface> {
    frames: Vec<Box<dyn Frame<S> + 'a>>,
}

impl<'a, S: DisplaySurface> FrameList<'a, S> {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Append a frame, builder style.
    pub fn with(mut self, frame: impl Frame<S> + 'a) -> Self {
        self.push(frame);
        self
    }

    /// Append a frame.
    pub fn push(&mut self, frame: impl Frame<S> + 'a) {
        self.frames.push(Box::new(frame));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Mutable access to the frame at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Frame<S> + 'a)> {
        self.frames.get_mut(index).map(|f| f.as_mut())
    }
}

impl<'a, S: DisplaySurface> Default for FrameList<'a, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, S: DisplaySurface> From<Vec<Box<dyn Frame<S> + 'a>>> for FrameList<'a, S> {
    fn from(frames: Vec<Box<dyn Frame<S> + 'a>>) -> Self {
        Self { frames }
    }
}

/// Ordered list of overlays, drawn first to last.
pub struct OverlayList<'a, S: DisplaySurface> {
    overlays: Vec<Box<dyn Overlay<S> + 'a>>,
}

impl<'a, S: DisplaySurface> OverlayList<'a, S> {
    pub fn new() -> Self {
        Self { overlays: Vec::new() }
    }

    /// Append an overlay, builder style.
    pub fn with(mut self, overlay: impl Overlay<S> + 'a) -> Self {
        self.push(overlay);
        self
    }

    pub fn push(&mut self, overlay: impl Overlay<S> + 'a) {
        self.overlays.push(Box::new(overlay));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Iterate the overlays in draw order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn Overlay<S> + 'a)> + '_ {
        self.overlays.iter_mut().map(|o| o.as_mut())
    }
}

impl<'a, S: DisplaySurface> Default for OverlayList<'a, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, S: DisplaySurface> From<Vec<Box<dyn Overlay<S> + 'a>>> for OverlayList<'a, S> {
    fn from(overlays: Vec<Box<dyn Overlay<S> + 'a>>) -> Self {
        Self { overlays }
    }
}

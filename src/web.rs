//! Web-specific presentation of the framebuffer.

use core::convert::Infallible;
use std::fmt;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::{DisplaySurface, MonoBuffer, PanelColors};

/// Error creating a [`CanvasSurface`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CanvasError {
    /// The canvas refused to hand out a 2d context
    NoContext,
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasError::NoContext => write!(f, "No 2d context available"),
        }
    }
}

impl std::error::Error for CanvasError {}

/// A [`MonoBuffer`] that presents onto an HTML canvas.
///
/// Drawing happens in memory; [`present`](DisplaySurface::present) paints
/// the whole buffer, each pixel scaled to a `scale`×`scale` square.
///
/// ## Example
///
/// ```rust,ignore
/// use oled_carousel::{CarouselUi, StdClock};
/// use oled_carousel::web::CanvasSurface;
///
/// let canvas: web_sys::HtmlCanvasElement = // ... get canvas element
/// let surface = CanvasSurface::new(canvas, 128, 64, 4, Default::default())?;
/// let mut ui = CarouselUi::new(surface, StdClock::new());
/// ```
pub struct CanvasSurface {
    buffer: MonoBuffer,
    ctx: CanvasRenderingContext2d,
    scale: u32,
    lit: String,
    unlit: String,
}

impl CanvasSurface {
    /// Wrap `canvas`, resizing it to `width`×`height` pixels times `scale`.
    pub fn new(canvas: HtmlCanvasElement, width: u32, height: u32, scale: u32, colors: PanelColors) -> Result<Self, CanvasError> {
        let scale = scale.max(1);
        canvas.set_width(width * scale);
        canvas.set_height(height * scale);

        let ctx = canvas
            .get_context("2d")
            .map_err(|_| CanvasError::NoContext)?
            .ok_or(CanvasError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CanvasError::NoContext)?;

        Ok(Self {
            buffer: MonoBuffer::new(width, height),
            ctx,
            scale,
            lit: colors.lit_css(),
            unlit: colors.unlit_css(),
        })
    }

    /// The in-memory framebuffer being presented.
    #[inline]
    pub fn buffer(&self) -> &MonoBuffer {
        &self.buffer
    }
}

impl OriginDimensions for CanvasSurface {
    fn size(&self) -> Size {
        self.buffer.size()
    }
}

impl DrawTarget for CanvasSurface {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.buffer.draw_iter(pixels)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buffer.clear(color)
    }
}

impl DisplaySurface for CanvasSurface {
    fn present(&mut self) -> Result<(), Self::Error> {
        let scale = self.scale as f64;
        let width = self.buffer.width();
        let height = self.buffer.height();

        self.ctx.set_fill_style_str(&self.unlit);
        self.ctx.fill_rect(0.0, 0.0, width as f64 * scale, height as f64 * scale);

        self.ctx.set_fill_style_str(&self.lit);
        for y in 0..height {
            for x in 0..width {
                if self.buffer.pixel(x, y) {
                    self.ctx.fill_rect(x as f64 * scale, y as f64 * scale, scale, scale);
                }
            }
        }
        self.buffer.present()
    }
}

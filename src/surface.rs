//! Display surface abstraction and an in-memory monochrome framebuffer.

use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PointsIter, Rectangle},
    text::{Baseline, Text},
};

/// A monochrome drawing surface the carousel renders onto.
///
/// Drawing goes through the `embedded-graphics` [`DrawTarget`] API; the
/// surface only adds [`present`](DisplaySurface::present), which pushes the
/// finished image to the panel. Implementations are expected to clip
/// out-of-range drawing instead of failing.
pub trait DisplaySurface: DrawTarget<Color = BinaryColor> {
    /// Push the current contents to the physical display.
    fn present(&mut self) -> Result<(), Self::Error>;

    /// Width and height of the drawable area.
    fn dimensions(&self) -> Size {
        self.bounding_box().size
    }
}

/// Draw `text` with the built-in 6×10 font, top-left anchored at `position`.
///
/// Convenience for frame and overlay drawables.
pub fn draw_string<D>(target: &mut D, text: &str, position: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    Text::with_baseline(text, position, style, Baseline::Top).draw(target)?;
    Ok(())
}

/// In-memory monochrome framebuffer.
///
/// Pixels are stored in the SSD1306 page layout: each byte holds eight
/// vertically stacked pixels, least significant bit on top, pages running
/// left to right. The raw buffer can be shipped to such a controller as is.
///
/// ## Example
///
/// ```rust
/// use oled_carousel::{DisplaySurface, MonoBuffer};
/// use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
///
/// let mut buffer = MonoBuffer::new(128, 64);
/// Pixel(Point::new(3, 9), BinaryColor::On).draw(&mut buffer).unwrap();
/// assert!(buffer.pixel(3, 9));
///
/// buffer.present().unwrap();
/// assert_eq!(buffer.present_count(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonoBuffer {
    width: u32,
    height: u32,
    pages: Vec<u8>,
    presents: u64,
}

impl MonoBuffer {
    /// Create a blank framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        let page_rows = height.div_ceil(8) as usize;
        Self {
            width,
            height,
            pages: vec![0; width as usize * page_rows],
            presents: 0,
        }
    }

    /// Create a blank 128×64 framebuffer, the common SSD1306 geometry.
    pub fn ssd1306() -> Self {
        Self::new(128, 64)
    }

    /// Framebuffer width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Framebuffer height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check whether the pixel at (`x`, `y`) is lit.
    ///
    /// Out-of-range coordinates read as unlit.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        match self.index(x, y) {
            Some((idx, bit)) => self.pages[idx] & bit != 0,
            None => false,
        }
    }

    /// Set or clear a single pixel. Out-of-range coordinates are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some((idx, bit)) = self.index(x as u32, y as u32) {
            if on {
                self.pages[idx] |= bit;
            } else {
                self.pages[idx] &= !bit;
            }
        }
    }

    /// Number of lit pixels.
    pub fn lit_count(&self) -> usize {
        self.pages.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Check whether any pixel inside the given rectangle is lit.
    pub fn any_lit_in(&self, area: Rectangle) -> bool {
        area.points()
            .filter(|p| p.x >= 0 && p.y >= 0)
            .any(|p| self.pixel(p.x as u32, p.y as u32))
    }

    /// Raw page-layout buffer.
    #[inline]
    pub fn buffer(&self) -> &[u8] {
        &self.pages
    }

    /// How many times [`present`](DisplaySurface::present) has been called.
    #[inline]
    pub fn present_count(&self) -> u64 {
        self.presents
    }

    fn index(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y / 8) as usize * self.width as usize + x as usize;
        Some((idx, 1 << (y % 8)))
    }
}

impl Default for MonoBuffer {
    fn default() -> Self {
        Self::ssd1306()
    }
}

impl OriginDimensions for MonoBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for MonoBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = if color.is_on() { 0xff } else { 0x00 };
        self.pages.iter_mut().for_each(|b| *b = fill);
        Ok(())
    }
}

impl DisplaySurface for MonoBuffer {
    fn present(&mut self) -> Result<(), Self::Error> {
        self.presents += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_layout() {
        let mut buf = MonoBuffer::new(16, 16);
        buf.set_pixel(2, 0, true);
        buf.set_pixel(2, 9, true);

        assert_eq!(buf.buffer().len(), 32);
        assert_eq!(buf.buffer()[2], 0b0000_0001);
        assert_eq!(buf.buffer()[16 + 2], 0b0000_0010);
        assert!(buf.pixel(2, 9));
        assert!(!buf.pixel(2, 8));
    }

    #[test]
    fn test_clipping() {
        let mut buf = MonoBuffer::new(8, 8);
        buf.set_pixel(-1, 0, true);
        buf.set_pixel(0, -1, true);
        buf.set_pixel(8, 0, true);
        buf.set_pixel(0, 8, true);
        assert_eq!(buf.lit_count(), 0);
        assert!(!buf.pixel(100, 100));
    }

    #[test]
    fn test_partial_page_height() {
        let buf = MonoBuffer::new(10, 12);
        assert_eq!(buf.buffer().len(), 20);
        assert_eq!(buf.dimensions(), Size::new(10, 12));
    }

    #[test]
    fn test_clear() {
        let mut buf = MonoBuffer::new(8, 8);
        buf.clear(BinaryColor::On).unwrap();
        assert_eq!(buf.lit_count(), 64);
        buf.clear(BinaryColor::Off).unwrap();
        assert_eq!(buf.lit_count(), 0);
    }

    #[test]
    fn test_draw_string_lights_pixels() {
        let mut buf = MonoBuffer::ssd1306();
        draw_string(&mut buf, "Hi", Point::new(0, 0)).unwrap();
        assert!(buf.lit_count() > 0);
        assert!(buf.any_lit_in(Rectangle::new(Point::zero(), Size::new(12, 10))));
        assert!(!buf.any_lit_in(Rectangle::new(Point::new(0, 10), Size::new(128, 54))));
    }

    #[test]
    fn test_draw_primitive_clips() {
        use embedded_graphics::primitives::PrimitiveStyle;

        let mut buf = MonoBuffer::new(8, 8);
        Rectangle::new(Point::new(-4, -4), Size::new(8, 8))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut buf)
            .unwrap();
        assert_eq!(buf.lit_count(), 16);
    }
}

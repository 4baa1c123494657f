//! Fixed-size 8×8 bitmaps used by the frame indicator.

use embedded_graphics::{
    image::{Image, ImageRaw},
    pixelcolor::BinaryColor,
    prelude::*,
};

/// An 8×8 monochrome bitmap.
///
/// One byte per row, top row first. The most significant bit of each
/// byte is the leftmost pixel, matching `embedded-graphics`' `ImageRaw`
/// layout for `BinaryColor`. XBM data stores the leftmost pixel in the
/// least significant bit; load it with [`Glyph::from_xbm`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glyph(pub [u8; 8]);

impl Glyph {
    /// Width and height of a glyph in pixels.
    pub const SIZE: u32 = 8;

    /// Filled diamond marking the current frame.
    pub const ACTIVE: Glyph = Glyph([0x00, 0x18, 0x3c, 0x7e, 0x7e, 0x3c, 0x18, 0x00]);

    /// Small dot marking every other frame.
    pub const INACTIVE: Glyph = Glyph([0x00, 0x00, 0x00, 0x18, 0x18, 0x00, 0x00, 0x00]);

    /// Create a glyph from its row bytes.
    pub const fn new(rows: [u8; 8]) -> Self {
        Self(rows)
    }

    /// Create a glyph from XBM rows, where bit 0 is the leftmost pixel.
    pub const fn from_xbm(rows: [u8; 8]) -> Self {
        let mut flipped = [0u8; 8];
        let mut i = 0;
        while i < 8 {
            flipped[i] = rows[i].reverse_bits();
            i += 1;
        }
        Self(flipped)
    }

    /// Row bytes of the glyph.
    #[inline]
    pub fn rows(&self) -> &[u8; 8] {
        &self.0
    }

    /// Check whether the pixel at (`col`, `row`) is lit.
    ///
    /// Out-of-range coordinates are never lit.
    #[inline]
    pub fn is_set(&self, col: u32, row: u32) -> bool {
        if col >= Self::SIZE || row >= Self::SIZE {
            return false;
        }
        self.0[row as usize] & (0x80 >> col) != 0
    }

    /// Draw the glyph with its top-left corner at `top_left`.
    ///
    /// Unset bits are drawn as `Off`, so a glyph fully covers its cell.
    pub fn draw<D>(&self, target: &mut D, top_left: Point) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let raw = ImageRaw::<BinaryColor>::new(&self.0, Self::SIZE);
        Image::new(&raw, top_left).draw(target)
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self::INACTIVE
    }
}

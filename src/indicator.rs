//! Frame position indicator.
//!
//! The indicator is laid out first as a list of glyph placements, which
//! can be inspected or drawn onto any `BinaryColor` target.

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

use crate::Glyph;

/// Distance between the top-left corners of neighbouring glyphs.
pub const GLYPH_SPACING: i32 = 12;

/// Display edge the indicator is drawn along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IndicatorPosition {
    Top,
    Right,
    #[default]
    Bottom,
    Left,
}

/// Order of frames along the indicator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IndicatorDirection {
    /// Frame 0 first (leftmost or topmost)
    #[default]
    LeftRight,
    /// Frame 0 last
    RightLeft,
}

/// Appearance of the indicator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IndicatorStyle {
    pub position: IndicatorPosition,
    pub direction: IndicatorDirection,
    /// Glyph for the current frame
    pub active: Glyph,
    /// Glyph for every other frame
    pub inactive: Glyph,
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            position: IndicatorPosition::Bottom,
            direction: IndicatorDirection::LeftRight,
            active: Glyph::ACTIVE,
            inactive: Glyph::INACTIVE,
        }
    }
}

/// One glyph of the indicator, ready to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphPlacement {
    /// Physical slot, 0 being leftmost (or topmost)
    pub slot: usize,
    /// Top-left corner of the glyph
    pub top_left: Point,
    /// Whether this slot marks the current frame
    pub active: bool,
}

impl IndicatorStyle {
    /// Physical slot holding the current frame.
    ///
    /// Returns `None` when there are no frames.
    pub fn active_slot(&self, current_frame: usize, frame_count: usize) -> Option<usize> {
        if frame_count == 0 {
            return None;
        }
        let current = current_frame.min(frame_count - 1);
        Some(match self.direction {
            IndicatorDirection::LeftRight => current,
            IndicatorDirection::RightLeft => frame_count - 1 - current,
        })
    }

    /// Compute where each glyph goes on a display of the given size.
    ///
    /// Glyphs are centred along the edge, [`GLYPH_SPACING`] apart.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use oled_carousel::{IndicatorStyle, IndicatorDirection};
    /// use embedded_graphics::prelude::*;
    ///
    /// let style = IndicatorStyle {
    ///     direction: IndicatorDirection::RightLeft,
    ///     ..Default::default()
    /// };
    /// let slots = style.layout(0, 3, Size::new(128, 64));
    ///
    /// assert_eq!(slots.len(), 3);
    /// assert!(slots[2].active);
    /// assert_eq!(slots[0].top_left, Point::new(46, 56));
    /// ```
    pub fn layout(&self, current_frame: usize, frame_count: usize, size: Size) -> Vec<GlyphPlacement> {
        let Some(active_slot) = self.active_slot(current_frame, frame_count) else {
            return Vec::new();
        };

        let span = GLYPH_SPACING * frame_count as i32 / 2;
        let width = size.width as i32;
        let height = size.height as i32;
        let glyph = Glyph::SIZE as i32;

        (0..frame_count)
            .map(|slot| {
                let along = GLYPH_SPACING * slot as i32;
                let top_left = match self.position {
                    IndicatorPosition::Top => Point::new(width / 2 - span + along, 0),
                    IndicatorPosition::Bottom => Point::new(width / 2 - span + along, height - glyph),
                    IndicatorPosition::Right => Point::new(width - glyph, height / 2 - span + along),
                    IndicatorPosition::Left => Point::new(0, height / 2 - span + along),
                };
                GlyphPlacement {
                    slot,
                    top_left,
                    active: slot == active_slot,
                }
            })
            .collect()
    }

    /// Draw the indicator for the given frame position.
    ///
    /// Draws nothing when there are no frames.
    pub fn draw<D>(&self, target: &mut D, current_frame: usize, frame_count: usize) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let size = target.bounding_box().size;
        for placement in self.layout(current_frame, frame_count, size) {
            let glyph = if placement.active { &self.active } else { &self.inactive };
            glyph.draw(target, placement.top_left)?;
        }
        Ok(())
    }
}

/// Colours used when a monochrome framebuffer is shown on a colour screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelColors {
    /// Colour of lit pixels
    pub lit: (u8, u8, u8),
    /// Colour of unlit pixels
    pub unlit: (u8, u8, u8),
}

impl Default for PanelColors {
    fn default() -> Self {
        Self {
            lit: (255, 255, 255),
            unlit: (0, 0, 0),
        }
    }
}

impl PanelColors {
    /// Build panel colours from optional hex strings.
    ///
    /// Missing or malformed values keep white on black.
    pub fn from_hex(lit: Option<&str>, unlit: Option<&str>) -> Self {
        let fallback = Self::default();
        Self {
            lit: lit.and_then(parse_color).unwrap_or(fallback.lit),
            unlit: unlit.and_then(parse_color).unwrap_or(fallback.unlit),
        }
    }

    /// Canvas fill style for lit pixels, `#rrggbb`.
    pub fn lit_css(&self) -> String {
        css(self.lit)
    }

    /// Canvas fill style for unlit pixels, `#rrggbb`.
    pub fn unlit_css(&self) -> String {
        css(self.unlit)
    }
}

fn css((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Parse a `#rgb` or `#rrggbb` colour.
///
/// Surrounding whitespace is ignored; digits are case-insensitive.
pub fn parse_color(s: &str) -> Option<(u8, u8, u8)> {
    let digits = s.trim().strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;

    match digits.len() {
        3 => {
            let nibble = |shift: u32| ((value >> shift) & 0xf) as u8 * 0x11;
            Some((nibble(8), nibble(4), nibble(0)))
        }
        6 => Some(((value >> 16) as u8, (value >> 8) as u8, value as u8)),
        _ => None,
    }
}

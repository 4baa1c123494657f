//! Carousel configuration, optionally loaded from TOML.

use std::fmt;

use crate::color::{parse_color, PanelColors};
use crate::timing::{interval_ms, ticks_for, DEFAULT_FPS};
use crate::{IndicatorStyle, RedrawPolicy, SlideDirection, TransitionDirection};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// A colour field is not a `#rgb` or `#rrggbb` value
    InvalidColor { field: &'static str, value: String },
    /// The TOML document could not be parsed
    #[cfg(feature = "toml")]
    Toml(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidColor { field, value } => {
                write!(f, "Invalid color for {}: {:?}", field, value)
            }
            #[cfg(feature = "toml")]
            ConfigError::Toml(err) => write!(f, "Invalid TOML: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "toml")]
            ConfigError::Toml(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "toml")]
impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Toml(err)
    }
}

/// Everything a [`CarouselUi`](crate::CarouselUi) can be configured with.
///
/// Durations are wall time in milliseconds; they are turned into tick
/// counts against the update interval derived from `target_fps`.
///
/// ## Example
///
/// ```rust
/// use oled_carousel::{CarouselConfig, SlideDirection};
///
/// let config = CarouselConfig {
///     target_fps: 30,
///     time_per_frame_ms: 2000,
///     slide: SlideDirection::Up,
///     ..Default::default()
/// };
/// assert_eq!(config.interval_ms(), 33);
/// assert_eq!(config.ticks_per_frame(), 61);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CarouselConfig {
    pub target_fps: u32,
    /// How long a frame stays fixed
    pub time_per_frame_ms: u32,
    /// How long a slide takes
    pub time_per_transition_ms: u32,
    pub auto_transition: bool,
    pub auto_direction: TransitionDirection,
    pub slide: SlideDirection,
    pub indicator: IndicatorStyle,
    pub redraw: RedrawPolicy,
    /// Colour of lit pixels when shown on a colour screen
    pub lit_color: Option<String>,
    /// Colour of unlit pixels when shown on a colour screen
    pub unlit_color: Option<String>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_FPS,
            time_per_frame_ms: 5000,
            time_per_transition_ms: 500,
            auto_transition: true,
            auto_direction: TransitionDirection::Forward,
            slide: SlideDirection::Right,
            indicator: IndicatorStyle::default(),
            redraw: RedrawPolicy::EveryTick,
            lit_color: None,
            unlit_color: None,
        }
    }
}

impl CarouselConfig {
    /// Parse a TOML document into a validated `CarouselConfig`.
    ///
    /// Missing keys keep their defaults.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check fields that cannot be fixed up by clamping.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("lit_color", &self.lit_color), ("unlit_color", &self.unlit_color)] {
            if let Some(value) = value {
                if parse_color(value).is_none() {
                    return Err(ConfigError::InvalidColor {
                        field,
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Update interval in milliseconds.
    #[inline]
    pub fn interval_ms(&self) -> u32 {
        interval_ms(self.target_fps)
    }

    /// Ticks a frame stays fixed, at least 1.
    #[inline]
    pub fn ticks_per_frame(&self) -> u32 {
        ticks_for(self.time_per_frame_ms, self.interval_ms())
    }

    /// Ticks a slide lasts, at least 1.
    #[inline]
    pub fn ticks_per_transition(&self) -> u32 {
        ticks_for(self.time_per_transition_ms, self.interval_ms())
    }

    /// Resolved panel colours, white on black unless configured.
    pub fn panel_colors(&self) -> PanelColors {
        PanelColors::from_hex(self.lit_color.as_deref(), self.unlit_color.as_deref())
    }
}

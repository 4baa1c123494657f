//! Conversions between frame rate, wall time and logical ticks.

/// Default target frame rate.
pub const DEFAULT_FPS: u32 = 60;

/// Update interval in milliseconds for a target frame rate.
///
/// Zero FPS is treated as 1 FPS; the result is never below 1 ms.
///
/// ```rust
/// use oled_carousel::timing::interval_ms;
///
/// assert_eq!(interval_ms(60), 16);
/// assert_eq!(interval_ms(24), 41);
/// assert_eq!(interval_ms(0), 1000);
/// assert_eq!(interval_ms(5000), 1);
/// ```
#[inline]
pub fn interval_ms(fps: u32) -> u32 {
    (1000 / fps.max(1)).max(1)
}

/// Number of ticks covering `duration_ms` at the given update interval.
///
/// Rounded to the nearest tick and never below 1, so a zero duration
/// still spans one tick.
#[inline]
pub fn ticks_for(duration_ms: u32, interval_ms: u32) -> u32 {
    let interval = interval_ms.max(1) as u64;
    let ticks = (duration_ms as u64 + interval / 2) / interval;
    ticks.clamp(1, u32::MAX as u64) as u32
}

/// Wall time represented by `ticks` at the given update interval.
#[inline]
pub fn duration_for(ticks: u32, interval_ms: u32) -> u64 {
    ticks as u64 * interval_ms as u64
}

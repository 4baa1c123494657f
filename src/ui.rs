//! The carousel engine: update pacing, redraw cycle and configuration surface.

use core::fmt;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use log::{debug, trace, warn};

use crate::timing::{duration_for, interval_ms, ticks_for};
use crate::{
    CarouselConfig, Clock, DisplaySurface, FrameList, FrameState, Glyph, IndicatorDirection,
    IndicatorPosition, IndicatorStyle, OverlayList, RedrawPolicy, SlideDirection,
    TransitionController, TransitionDirection,
};

/// What a call to [`CarouselUi::update`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateStatus {
    /// A tick ran and the surface was redrawn and presented
    Redrawn,
    /// A tick ran but nothing needed repainting
    Ticked { next_tick_in_ms: u64 },
    /// Too early for a tick; nothing changed
    Idle { retry_in_ms: u64 },
}

impl UpdateStatus {
    /// `0` after a redraw, otherwise milliseconds until the next tick is due.
    ///
    /// Hosts can sleep for this long before calling `update` again.
    pub fn as_millis(self) -> u64 {
        match self {
            UpdateStatus::Redrawn => 0,
            UpdateStatus::Ticked { next_tick_in_ms } => next_tick_in_ms,
            UpdateStatus::Idle { retry_in_ms } => retry_in_ms,
        }
    }

    #[inline]
    pub fn redrawn(self) -> bool {
        self == UpdateStatus::Redrawn
    }
}

/// Frame carousel driving a monochrome display.
///
/// Owns the display surface and the clock. The host calls
/// [`update`](Self::update) from its main loop as often as it likes; the
/// carousel turns wall time into ticks at the configured frame rate,
/// advances the [`TransitionController`] and redraws the surface.
///
/// Not reentrant: drawables receive the surface, not the carousel.
///
/// ## Example
///
/// ```rust
/// use oled_carousel::{draw_string, CarouselUi, FrameList, ManualClock, MonoBuffer};
/// use embedded_graphics::prelude::*;
///
/// let clock = ManualClock::new(0);
/// let mut ui = CarouselUi::new(MonoBuffer::ssd1306(), &clock);
/// ui.set_frames(
///     FrameList::new()
///         .with(|d: &mut MonoBuffer, at: Point| draw_string(d, "Hello", at))
///         .with(|d: &mut MonoBuffer, at: Point| draw_string(d, "World", at)),
/// );
///
/// clock.advance(16);
/// assert!(ui.update().redrawn());
/// assert!(ui.surface().lit_count() > 0);
///
/// // Too early for the next tick.
/// assert_eq!(ui.update().as_millis(), 16);
/// ```
pub struct CarouselUi<'a, S: DisplaySurface, C: Clock> {
    surface: S,
    clock: C,
    controller: TransitionController,
    frames: FrameList<'a, S>,
    overlays: OverlayList<'a, S>,
    indicator: IndicatorStyle,
    slide: SlideDirection,
    target_fps: u32,
    interval_ms: u32,
    time_per_frame_ms: u32,
    time_per_transition_ms: u32,
    last_update: u64,
}

impl<'a, S, C> CarouselUi<'a, S, C>
where
    S: DisplaySurface,
    S::Error: fmt::Debug,
    C: Clock,
{
    /// Create a carousel with the default configuration.
    pub fn new(surface: S, clock: C) -> Self {
        Self::with_config(surface, clock, &CarouselConfig::default())
    }

    /// Create a carousel from a configuration.
    ///
    /// The first tick is due one update interval after creation.
    pub fn with_config(surface: S, clock: C, config: &CarouselConfig) -> Self {
        let last_update = clock.now_ms();
        let mut ui = Self {
            surface,
            clock,
            controller: TransitionController::new(),
            frames: FrameList::new(),
            overlays: OverlayList::new(),
            indicator: IndicatorStyle::default(),
            slide: SlideDirection::default(),
            target_fps: config.target_fps,
            interval_ms: interval_ms(config.target_fps),
            time_per_frame_ms: config.time_per_frame_ms,
            time_per_transition_ms: config.time_per_transition_ms,
            last_update,
        };
        ui.apply_config(config);
        ui
    }

    /// Apply every setting of `config`. Frames and overlays are kept.
    pub fn apply_config(&mut self, config: &CarouselConfig) {
        self.set_target_fps(config.target_fps);
        self.set_time_per_frame(config.time_per_frame_ms);
        self.set_time_per_transition(config.time_per_transition_ms);
        self.controller.set_auto_transition(config.auto_transition);
        self.controller.set_auto_direction(config.auto_direction);
        self.controller.set_redraw_policy(config.redraw);
        self.slide = config.slide;
        self.indicator = config.indicator.clone();
        self.controller.invalidate();
        debug!("configuration applied: {:?}", config);
    }

    /// Drive the carousel. Call this from the host loop.
    ///
    /// When less than one update interval has passed since the last tick,
    /// nothing happens. Otherwise one tick runs and the logical clock moves
    /// forward by exactly one interval; if the host fell more than one
    /// interval behind, the backlog is dropped instead of replayed.
    pub fn update(&mut self) -> UpdateStatus {
        let now = self.clock.now_ms();
        let interval = self.interval_ms as u64;
        let elapsed = now.saturating_sub(self.last_update);

        if elapsed < interval {
            return UpdateStatus::Idle {
                retry_in_ms: interval - elapsed,
            };
        }

        self.last_update = if elapsed >= interval * 2 {
            trace!("dropping {} ms of backlog", elapsed - interval);
            now
        } else {
            self.last_update + interval
        };

        if self.controller.tick().is_needed() {
            self.redraw();
            UpdateStatus::Redrawn
        } else {
            UpdateStatus::Ticked {
                next_tick_in_ms: (self.last_update + interval).saturating_sub(now),
            }
        }
    }

    /// Repaint the surface now: clear, frames, indicator, overlays, present.
    ///
    /// Drawable failures are logged and skipped.
    pub fn redraw(&mut self) {
        if let Err(err) = self.surface.clear(BinaryColor::Off) {
            warn!("failed to clear surface: {:?}", err);
        }

        self.draw_frames();

        let current = self.controller.current_frame();
        let count = self.controller.frame_count();
        if let Err(err) = self.indicator.draw(&mut self.surface, current, count) {
            warn!("failed to draw indicator: {:?}", err);
        }

        for (index, overlay) in self.overlays.iter_mut().enumerate() {
            if let Err(err) = overlay.draw(&mut self.surface) {
                warn!("overlay {} failed to draw: {:?}", index, err);
            }
        }

        if let Err(err) = self.surface.present() {
            warn!("failed to present surface: {:?}", err);
        }
        self.controller.mark_drawn();
    }

    fn draw_frames(&mut self) {
        let size = self.surface.dimensions();
        match self.controller.slide_offsets(self.slide, size) {
            Some(offsets) => {
                trace!(
                    "slide: frame {} at {:?}, frame {} at {:?}",
                    offsets.outgoing_frame,
                    offsets.outgoing,
                    offsets.incoming_frame,
                    offsets.incoming
                );
                self.draw_frame(offsets.outgoing_frame, offsets.outgoing);
                self.draw_frame(offsets.incoming_frame, offsets.incoming);
            }
            None => {
                if !self.frames.is_empty() {
                    self.draw_frame(self.controller.current_frame(), Point::zero());
                }
            }
        }
    }

    fn draw_frame(&mut self, index: usize, origin: Point) {
        let Some(frame) = self.frames.get_mut(index) else {
            return;
        };
        if let Err(err) = frame.draw(&mut self.surface, origin) {
            warn!("frame {} failed to draw: {:?}", index, err);
        }
    }

    /// Set the target frame rate. Zero is treated as 1 FPS.
    ///
    /// Tick counts are re-derived so the configured durations keep their
    /// wall-clock length.
    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.max(1);
        self.interval_ms = interval_ms(self.target_fps);
        self.controller
            .set_ticks_per_frame(ticks_for(self.time_per_frame_ms, self.interval_ms));
        self.controller
            .set_ticks_per_transition(ticks_for(self.time_per_transition_ms, self.interval_ms));
        debug!("target fps {} (interval {} ms)", self.target_fps, self.interval_ms);
    }

    #[inline]
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Milliseconds between ticks.
    #[inline]
    pub fn update_interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Enable automatic transition to the next frame after the time per frame.
    pub fn enable_auto_transition(&mut self) {
        self.controller.set_auto_transition(true);
    }

    pub fn disable_auto_transition(&mut self) {
        self.controller.set_auto_transition(false);
    }

    pub fn set_auto_transition_forwards(&mut self) {
        self.controller.set_auto_direction(TransitionDirection::Forward);
    }

    pub fn set_auto_transition_backwards(&mut self) {
        self.controller.set_auto_direction(TransitionDirection::Backward);
    }

    /// Set approximately how long a frame is shown, in milliseconds.
    pub fn set_time_per_frame(&mut self, ms: u32) {
        self.time_per_frame_ms = ms;
        self.controller.set_ticks_per_frame(ticks_for(ms, self.interval_ms));
    }

    /// Set approximately how long a slide takes, in milliseconds.
    pub fn set_time_per_transition(&mut self, ms: u32) {
        self.time_per_transition_ms = ms;
        self.controller.set_ticks_per_transition(ticks_for(ms, self.interval_ms));
    }

    /// How long a frame is actually shown, after rounding to whole ticks.
    pub fn time_per_frame(&self) -> u64 {
        duration_for(self.controller.ticks_per_frame(), self.interval_ms)
    }

    /// How long a slide actually takes, after rounding to whole ticks.
    pub fn time_per_transition(&self) -> u64 {
        duration_for(self.controller.ticks_per_transition(), self.interval_ms)
    }

    pub fn set_indicator_position(&mut self, position: IndicatorPosition) {
        self.indicator.position = position;
        self.controller.invalidate();
    }

    /// Set the order of frames along the indicator.
    pub fn set_indicator_direction(&mut self, direction: IndicatorDirection) {
        self.indicator.direction = direction;
        self.controller.invalidate();
    }

    /// Set the glyph marking the current frame in the indicator.
    pub fn set_active_glyph(&mut self, glyph: Glyph) {
        self.indicator.active = glyph;
        self.controller.invalidate();
    }

    /// Set the glyph marking the other frames in the indicator.
    pub fn set_inactive_glyph(&mut self, glyph: Glyph) {
        self.indicator.inactive = glyph;
        self.controller.invalidate();
    }

    #[inline]
    pub fn indicator(&self) -> &IndicatorStyle {
        &self.indicator
    }

    /// Set which way frames slide during a transition.
    pub fn set_frame_animation(&mut self, slide: SlideDirection) {
        self.slide = slide;
    }

    pub fn set_redraw_policy(&mut self, policy: RedrawPolicy) {
        self.controller.set_redraw_policy(policy);
    }

    /// Replace all frames.
    ///
    /// The current frame index is clamped into the new range.
    pub fn set_frames(&mut self, frames: FrameList<'a, S>) {
        debug!("installing {} frames", frames.len());
        self.controller.set_frame_count(frames.len());
        self.frames = frames;
    }

    /// Replace all overlays.
    pub fn set_overlays(&mut self, overlays: OverlayList<'a, S>) {
        debug!("installing {} overlays", overlays.len());
        self.overlays = overlays;
        self.controller.invalidate();
    }

    /// Slide to the next frame now.
    pub fn next_frame(&mut self) {
        self.controller.next_frame();
    }

    /// Slide to the previous frame now.
    pub fn previous_frame(&mut self) {
        self.controller.previous_frame();
    }

    #[inline]
    pub fn frame_state(&self) -> FrameState {
        self.controller.state()
    }

    #[inline]
    pub fn current_frame(&self) -> usize {
        self.controller.current_frame()
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.controller.frame_count()
    }

    /// Read access to the state machine.
    #[inline]
    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface between updates.
    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Give back the surface and the clock.
    pub fn into_parts(self) -> (S, C) {
        (self.surface, self.clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ManualClock, MonoBuffer};
    use std::cell::RefCell;

    fn fixed_timing() -> CarouselConfig {
        // 10 ms interval, 5 ticks per frame, 2 ticks per transition
        CarouselConfig {
            target_fps: 100,
            time_per_frame_ms: 50,
            time_per_transition_ms: 20,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_until_interval_elapsed() {
        let clock = ManualClock::new(1000);
        let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &fixed_timing());

        for _ in 0..5 {
            assert_eq!(ui.update(), UpdateStatus::Idle { retry_in_ms: 10 });
        }
        clock.advance(4);
        assert_eq!(ui.update(), UpdateStatus::Idle { retry_in_ms: 6 });
        assert_eq!(ui.surface().present_count(), 0);
        assert_eq!(ui.controller().ticks_since_switch(), 0);

        clock.advance(6);
        assert_eq!(ui.update(), UpdateStatus::Redrawn);
        assert_eq!(ui.surface().present_count(), 1);
    }

    #[test]
    fn test_interval_phase_is_kept_under_jitter() {
        let clock = ManualClock::new(0);
        let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &fixed_timing());

        clock.set(13);
        assert!(ui.update().redrawn());
        // Logical clock moved to 10, so the next tick is due at 20.
        assert_eq!(ui.update(), UpdateStatus::Idle { retry_in_ms: 7 });
    }

    #[test]
    fn test_backlog_is_dropped() {
        let clock = ManualClock::new(0);
        let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &fixed_timing());

        clock.set(95);
        assert!(ui.update().redrawn());
        assert_eq!(ui.controller().ticks_since_switch(), 1);
        assert_eq!(ui.update(), UpdateStatus::Idle { retry_in_ms: 10 });
    }

    #[test]
    fn test_ticked_without_redraw() {
        let clock = ManualClock::new(0);
        let config = CarouselConfig {
            redraw: RedrawPolicy::OnChange,
            ..fixed_timing()
        };
        let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &config);

        clock.advance(10);
        assert_eq!(ui.update(), UpdateStatus::Redrawn);
        clock.advance(12);
        assert_eq!(ui.update(), UpdateStatus::Ticked { next_tick_in_ms: 8 });
        assert_eq!(ui.surface().present_count(), 1);
    }

    #[test]
    fn test_redraw_order() {
        let calls = RefCell::new(Vec::new());
        let clock = ManualClock::new(0);
        let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &fixed_timing());

        ui.set_frames(
            FrameList::new()
                .with(|_: &mut MonoBuffer, at: Point| {
                    calls.borrow_mut().push(format!("frame0 {},{}", at.x, at.y));
                    Ok(())
                })
                .with(|_: &mut MonoBuffer, at: Point| {
                    calls.borrow_mut().push(format!("frame1 {},{}", at.x, at.y));
                    Ok(())
                }),
        );
        ui.set_overlays(OverlayList::new().with(|_: &mut MonoBuffer| {
            calls.borrow_mut().push("overlay".to_string());
            Ok(())
        }));

        ui.redraw();
        assert_eq!(*calls.borrow(), vec!["frame0 0,0", "overlay"]);

        calls.borrow_mut().clear();
        ui.next_frame();
        clock.advance(10);
        ui.update();
        assert_eq!(*calls.borrow(), vec!["frame0 64,0", "frame1 -64,0", "overlay"]);
    }

    #[test]
    fn test_failing_drawables_do_not_stop_redraw() {
        #[derive(Debug)]
        struct Broken;

        struct Flaky(MonoBuffer);

        impl OriginDimensions for Flaky {
            fn size(&self) -> Size {
                self.0.size()
            }
        }

        impl DrawTarget for Flaky {
            type Color = BinaryColor;
            type Error = Broken;

            fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
            where
                I: IntoIterator<Item = Pixel<Self::Color>>,
            {
                self.0.draw_iter(pixels).map_err(|never| match never {})
            }
        }

        impl DisplaySurface for Flaky {
            fn present(&mut self) -> Result<(), Self::Error> {
                self.0.present().map_err(|never| match never {})
            }
        }

        let overlay_ran = RefCell::new(false);
        let clock = ManualClock::new(0);
        let mut ui = CarouselUi::new(Flaky(MonoBuffer::ssd1306()), &clock);
        ui.set_frames(FrameList::new().with(|_: &mut Flaky, _: Point| Err(Broken)));
        ui.set_overlays(
            OverlayList::new()
                .with(|_: &mut Flaky| Err(Broken))
                .with(|_: &mut Flaky| {
                    *overlay_ran.borrow_mut() = true;
                    Ok(())
                }),
        );

        ui.redraw();
        assert!(*overlay_ran.borrow());
        assert_eq!(ui.surface().0.present_count(), 1);
    }

    #[test]
    fn test_setters_rescale_ticks() {
        let clock = ManualClock::new(0);
        let mut ui = CarouselUi::new(MonoBuffer::ssd1306(), &clock);
        assert_eq!(ui.update_interval_ms(), 16);
        assert_eq!(ui.controller().ticks_per_frame(), 313);
        assert_eq!(ui.time_per_frame(), 5008);
        assert_eq!(ui.time_per_transition(), 496);

        ui.set_target_fps(30);
        assert_eq!(ui.update_interval_ms(), 33);
        assert_eq!(ui.controller().ticks_per_frame(), 152);
        assert_eq!(ui.controller().ticks_per_transition(), 15);
        assert_eq!(ui.time_per_frame(), 5016);
        assert_eq!(ui.time_per_transition(), 495);

        ui.set_target_fps(0);
        assert_eq!(ui.target_fps(), 1);
        assert_eq!(ui.update_interval_ms(), 1000);

        ui.set_time_per_transition(0);
        assert_eq!(ui.controller().ticks_per_transition(), 1);
        assert_eq!(ui.time_per_transition(), 1000);
    }

    #[test]
    fn test_auto_transition_toggles() {
        let clock = ManualClock::new(0);
        let mut ui = CarouselUi::new(MonoBuffer::ssd1306(), &clock);
        ui.disable_auto_transition();
        assert!(!ui.controller().auto_transition());
        ui.enable_auto_transition();
        ui.set_auto_transition_backwards();
        assert_eq!(ui.controller().auto_direction(), TransitionDirection::Backward);
        ui.set_auto_transition_forwards();
        assert_eq!(ui.controller().auto_direction(), TransitionDirection::Forward);
    }

    #[test]
    fn test_into_parts() {
        let clock = ManualClock::new(0);
        let ui: CarouselUi<'_, MonoBuffer, _> = CarouselUi::new(MonoBuffer::new(32, 16), &clock);
        let (surface, _) = ui.into_parts();
        assert_eq!(surface.width(), 32);
    }
}

use core::convert::Infallible;

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use oled_carousel::{
    CarouselConfig, CarouselUi, FrameList, FrameState, IndicatorDirection, ManualClock, MonoBuffer,
    OverlayList, SlideDirection, UpdateStatus,
};

/// 10 ms interval, 5 ticks per frame, 2 ticks per transition.
fn config() -> CarouselConfig {
    CarouselConfig {
        target_fps: 100,
        time_per_frame_ms: 50,
        time_per_transition_ms: 20,
        ..Default::default()
    }
}

/// Fills a 16 pixel wide bar at the frame origin, offset by `lane` rows.
fn bar(lane: i32) -> impl FnMut(&mut MonoBuffer, Point) -> Result<(), Infallible> {
    move |d, origin| {
        Rectangle::new(origin + Point::new(0, lane * 10), Size::new(16, 8))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(d)
    }
}

fn frames<'a>(count: usize) -> FrameList<'a, MonoBuffer> {
    let mut list = FrameList::new();
    for lane in 0..count {
        list.push(bar(lane as i32));
    }
    list
}

fn tick(ui: &mut CarouselUi<'_, MonoBuffer, &ManualClock>, clock: &ManualClock) -> UpdateStatus {
    clock.advance(10);
    ui.update()
}

fn lane_lit(buf: &MonoBuffer, x: i32, lane: i32) -> bool {
    buf.any_lit_in(Rectangle::new(Point::new(x, lane * 10), Size::new(16, 8)))
}

#[test]
fn three_frame_auto_scenario() {
    let clock = ManualClock::new(0);
    let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &config());
    ui.set_frames(frames(3));

    for _ in 0..4 {
        assert_eq!(tick(&mut ui, &clock), UpdateStatus::Redrawn);
        assert_eq!(ui.frame_state(), FrameState::Fixed);
    }
    tick(&mut ui, &clock);
    assert_eq!(ui.frame_state(), FrameState::InTransition);
    assert_eq!(ui.controller().target_frame(), Some(1));

    tick(&mut ui, &clock);
    assert_eq!(ui.frame_state(), FrameState::InTransition);
    tick(&mut ui, &clock);
    assert_eq!(ui.frame_state(), FrameState::Fixed);
    assert_eq!(ui.current_frame(), 1);

    assert!(lane_lit(ui.surface(), 0, 1));
    assert!(!lane_lit(ui.surface(), 0, 0));
}

#[test]
fn slide_draws_both_frames_one_width_apart() {
    let clock = ManualClock::new(0);
    let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &config());
    ui.set_frame_animation(SlideDirection::Left);
    ui.set_frames(frames(2));
    ui.next_frame();

    tick(&mut ui, &clock);
    assert_eq!(ui.frame_state(), FrameState::InTransition);

    // Halfway: frame 0 moved to x = -64 (clipped), frame 1 sits at x = 64.
    let surface = ui.surface();
    assert!(!lane_lit(surface, 0, 0));
    assert!(lane_lit(surface, 64, 1));
    assert!(!lane_lit(surface, 0, 1));
}

#[test]
fn idle_updates_change_nothing() {
    let clock = ManualClock::new(500);
    let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &config());
    ui.set_frames(frames(3));

    tick(&mut ui, &clock);
    let snapshot = ui.surface().clone();
    let ticks = ui.controller().ticks_since_switch();

    for _ in 0..100 {
        assert!(matches!(ui.update(), UpdateStatus::Idle { .. }));
    }
    assert_eq!(ui.surface(), &snapshot);
    assert_eq!(ui.controller().ticks_since_switch(), ticks);
}

#[test]
fn no_frames_is_harmless() {
    let clock = ManualClock::new(0);
    let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &config());
    ui.next_frame();

    for _ in 0..50 {
        assert!(tick(&mut ui, &clock).redrawn());
        assert_eq!(ui.frame_state(), FrameState::Fixed);
    }
    assert_eq!(ui.surface().lit_count(), 0);
    assert_eq!(ui.surface().present_count(), 50);
}

#[test]
fn single_frame_stays_fixed() {
    let clock = ManualClock::new(0);
    let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &config());
    ui.set_frames(frames(1));

    for _ in 0..50 {
        tick(&mut ui, &clock);
        assert_eq!(ui.frame_state(), FrameState::Fixed);
        assert_eq!(ui.current_frame(), 0);
    }
    assert!(lane_lit(ui.surface(), 0, 0));
}

#[test]
fn previous_frame_round_trip() {
    let clock = ManualClock::new(0);
    let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &config());
    ui.disable_auto_transition();
    ui.set_frames(frames(4));

    ui.previous_frame();
    tick(&mut ui, &clock);
    tick(&mut ui, &clock);
    assert_eq!(ui.frame_state(), FrameState::Fixed);
    assert_eq!(ui.current_frame(), 3);

    ui.next_frame();
    tick(&mut ui, &clock);
    tick(&mut ui, &clock);
    assert_eq!(ui.current_frame(), 0);
}

#[test]
fn previous_frame_turns_auto_transitions_backward() {
    let clock = ManualClock::new(0);
    let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &config());
    ui.set_frames(frames(3));

    ui.previous_frame();
    tick(&mut ui, &clock);
    tick(&mut ui, &clock);
    assert_eq!(ui.current_frame(), 2);

    for _ in 0..5 {
        tick(&mut ui, &clock);
    }
    assert_eq!(ui.frame_state(), FrameState::InTransition);
    assert_eq!(ui.controller().target_frame(), Some(1));
}

#[test]
fn shrinking_frame_list_clamps_index() {
    let clock = ManualClock::new(0);
    let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &config());
    ui.disable_auto_transition();
    ui.set_frames(frames(4));
    for _ in 0..3 {
        ui.next_frame();
        tick(&mut ui, &clock);
        tick(&mut ui, &clock);
    }
    assert_eq!(ui.current_frame(), 3);

    ui.set_frames(frames(2));
    assert_eq!(ui.current_frame(), 1);
    assert!(tick(&mut ui, &clock).redrawn());
    assert!(lane_lit(ui.surface(), 0, 1));
}

#[test]
fn indicator_follows_direction() {
    let clock = ManualClock::new(0);
    let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &config());
    ui.disable_auto_transition();

    let mut list = FrameList::<MonoBuffer>::new();
    for _ in 0..3 {
        list.push(|_: &mut MonoBuffer, _: Point| Ok(()));
    }
    ui.set_frames(list);
    ui.set_indicator_direction(IndicatorDirection::RightLeft);
    ui.redraw();

    // Three glyphs at x = 46, 58, 70 along the bottom row; frame 0 is rightmost.
    let buf = ui.surface();
    let diamond_row = |x: u32| buf.pixel(x + 3, 56 + 1);
    assert!(!diamond_row(46));
    assert!(!diamond_row(58));
    assert!(diamond_row(70));
}

#[test]
fn overlays_draw_on_top_every_redraw() {
    let clock = ManualClock::new(0);
    let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &config());
    ui.set_frames(frames(2));
    ui.set_overlays(OverlayList::new().with(|d: &mut MonoBuffer| {
        Pixel(Point::new(127, 0), BinaryColor::On).draw(d)
    }));

    for _ in 0..10 {
        tick(&mut ui, &clock);
        assert!(ui.surface().pixel(127, 0));
    }
}

#[cfg(feature = "toml")]
#[test]
fn configured_from_toml() {
    let config = CarouselConfig::from_toml_str(
        r#"
        target_fps = 100
        time_per_frame_ms = 20
        time_per_transition_ms = 10
        auto_direction = "backward"
        "#,
    )
    .unwrap();

    let clock = ManualClock::new(0);
    let mut ui = CarouselUi::with_config(MonoBuffer::ssd1306(), &clock, &config);
    ui.set_frames(frames(3));
    tick(&mut ui, &clock);
    tick(&mut ui, &clock);
    assert_eq!(ui.controller().target_frame(), Some(2));
    tick(&mut ui, &clock);
    assert_eq!(ui.current_frame(), 2);
}

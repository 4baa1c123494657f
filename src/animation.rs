//! Frame/transition state machine driving the carousel.

use embedded_graphics::prelude::{Point, Size};
use log::{debug, trace};

/// Whether a single frame is shown or two frames are sliding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FrameState {
    /// One frame fully visible, no motion
    #[default]
    Fixed,
    /// Outgoing and incoming frames drawn at complementary offsets
    InTransition,
}

/// Which way frames slide during a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SlideDirection {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

/// Order in which frames are visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TransitionDirection {
    /// Towards higher indices, wrapping to 0
    #[default]
    Forward,
    /// Towards lower indices, wrapping to the last frame
    Backward,
}

impl TransitionDirection {
    /// +1 for forward, -1 for backward.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            TransitionDirection::Forward => 1,
            TransitionDirection::Backward => -1,
        }
    }

    /// Index one step away from `current` in a carousel of `count` frames.
    ///
    /// Wraps in both directions. Returns 0 when `count` is 0.
    pub fn step(self, current: usize, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let count = count as i64;
        (current as i64 + self.sign() as i64).rem_euclid(count) as usize
    }
}

/// When a tick asks for the surface to be repainted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RedrawPolicy {
    /// Repaint on every tick, so overlays animate at the full frame rate
    #[default]
    EveryTick,
    /// Repaint only while sliding, on state switches and after changes
    OnChange,
}

/// Redraw decision produced by [`TransitionController::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redraw {
    Needed,
    NotNeeded,
}

impl Redraw {
    #[inline]
    pub fn is_needed(self) -> bool {
        self == Redraw::Needed
    }
}

/// Positions of the two frames visible during a slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlideOffsets {
    /// Frame being moved out (the current frame)
    pub outgoing_frame: usize,
    /// Origin of the outgoing frame
    pub outgoing: Point,
    /// Frame being moved in (the target frame)
    pub incoming_frame: usize,
    /// Origin of the incoming frame, always one display dimension away
    pub incoming: Point,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Transition {
    target: usize,
    direction: TransitionDirection,
}

/// Tick-driven state machine for the frame carousel.
///
/// The controller knows nothing about time or drawing. Each call to
/// [`tick`](Self::tick) is one logical step; the caller decides how often
/// ticks happen and draws according to [`state`](Self::state) and
/// [`slide_offsets`](Self::slide_offsets).
///
/// ## Example
///
/// ```rust
/// use oled_carousel::{FrameState, TransitionController};
///
/// let mut controller = TransitionController::new();
/// controller.set_frame_count(3);
/// controller.set_ticks_per_frame(5);
/// controller.set_ticks_per_transition(2);
///
/// for _ in 0..5 {
///     controller.tick();
/// }
/// assert_eq!(controller.state(), FrameState::InTransition);
/// assert_eq!(controller.target_frame(), Some(1));
///
/// controller.tick();
/// controller.tick();
/// assert_eq!(controller.state(), FrameState::Fixed);
/// assert_eq!(controller.current_frame(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct TransitionController {
    /// Index of the frame shown (or moving out)
    current_frame: usize,
    /// Number of installed frames
    frame_count: usize,
    /// Active slide, if any
    transition: Option<Transition>,
    ticks_since_switch: u32,
    ticks_per_frame: u32,
    ticks_per_transition: u32,
    auto_transition: bool,
    auto_direction: TransitionDirection,
    redraw_policy: RedrawPolicy,
    /// Something visible changed since the last completed redraw
    stale: bool,
}

impl TransitionController {
    /// Create a controller with no frames, auto-transition enabled, and
    /// the durations of 5000 ms per frame and 500 ms per transition at 60 FPS.
    pub fn new() -> Self {
        Self {
            current_frame: 0,
            frame_count: 0,
            transition: None,
            ticks_since_switch: 0,
            ticks_per_frame: 313,
            ticks_per_transition: 31,
            auto_transition: true,
            auto_direction: TransitionDirection::Forward,
            redraw_policy: RedrawPolicy::EveryTick,
            stale: true,
        }
    }

    /// Set the number of frames.
    ///
    /// The current frame is clamped into the new range. A slide in
    /// progress is retargeted, or dropped when fewer than two frames remain.
    pub fn set_frame_count(&mut self, count: usize) {
        self.frame_count = count;
        if count == 0 {
            self.current_frame = 0;
        } else if self.current_frame >= count {
            self.current_frame = count - 1;
        }

        if let Some(transition) = self.transition.as_mut() {
            if count <= 1 {
                self.transition = None;
                self.ticks_since_switch = 0;
            } else {
                transition.target = transition.direction.step(self.current_frame, count);
            }
        }
        self.stale = true;
    }

    /// Get the number of frames.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Get the current frame index.
    ///
    /// During a slide this is the outgoing frame.
    #[inline]
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Frame the running slide is heading to.
    #[inline]
    pub fn target_frame(&self) -> Option<usize> {
        self.transition.map(|t| t.target)
    }

    /// Direction of the running slide.
    #[inline]
    pub fn transition_direction(&self) -> Option<TransitionDirection> {
        self.transition.map(|t| t.direction)
    }

    #[inline]
    pub fn state(&self) -> FrameState {
        if self.transition.is_some() {
            FrameState::InTransition
        } else {
            FrameState::Fixed
        }
    }

    #[inline]
    pub fn ticks_since_switch(&self) -> u32 {
        self.ticks_since_switch
    }

    /// Set how many ticks a frame stays fixed. Clamped to at least 1.
    pub fn set_ticks_per_frame(&mut self, ticks: u32) {
        self.ticks_per_frame = ticks.max(1);
    }

    #[inline]
    pub fn ticks_per_frame(&self) -> u32 {
        self.ticks_per_frame
    }

    /// Set how many ticks a slide lasts. Clamped to at least 1.
    pub fn set_ticks_per_transition(&mut self, ticks: u32) {
        self.ticks_per_transition = ticks.max(1);
    }

    #[inline]
    pub fn ticks_per_transition(&self) -> u32 {
        self.ticks_per_transition
    }

    pub fn set_auto_transition(&mut self, enabled: bool) {
        self.auto_transition = enabled;
    }

    #[inline]
    pub fn auto_transition(&self) -> bool {
        self.auto_transition
    }

    pub fn set_auto_direction(&mut self, direction: TransitionDirection) {
        self.auto_direction = direction;
    }

    #[inline]
    pub fn auto_direction(&self) -> TransitionDirection {
        self.auto_direction
    }

    pub fn set_redraw_policy(&mut self, policy: RedrawPolicy) {
        self.redraw_policy = policy;
    }

    #[inline]
    pub fn redraw_policy(&self) -> RedrawPolicy {
        self.redraw_policy
    }

    /// Slide progress in `[0, 1)`, or 0 when no slide is running.
    pub fn progress(&self) -> f32 {
        if self.transition.is_none() {
            return 0.0;
        }
        self.clamped_transition_ticks() as f32 / self.ticks_per_transition as f32
    }

    /// Start sliding to the next frame, replacing any running slide.
    ///
    /// Later automatic transitions also run forward. The slide itself
    /// does nothing with fewer than two frames.
    pub fn next_frame(&mut self) {
        self.auto_direction = TransitionDirection::Forward;
        self.begin_transition(TransitionDirection::Forward);
    }

    /// Start sliding to the previous frame, replacing any running slide.
    ///
    /// Later automatic transitions also run backward. The slide itself
    /// does nothing with fewer than two frames.
    pub fn previous_frame(&mut self) {
        self.auto_direction = TransitionDirection::Backward;
        self.begin_transition(TransitionDirection::Backward);
    }

    /// Flag that something visible changed outside the state machine.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Record that the surface now shows the current state.
    pub fn mark_drawn(&mut self) {
        self.stale = false;
    }

    /// Check whether something changed since the last redraw.
    #[inline]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Advance the state machine by one tick.
    ///
    /// Returns whether the surface should be repainted, according to the
    /// redraw policy.
    pub fn tick(&mut self) -> Redraw {
        self.ticks_since_switch = self.ticks_since_switch.saturating_add(1);
        let mut switched = false;

        match self.transition {
            Some(transition) => {
                if self.ticks_since_switch >= self.ticks_per_transition {
                    debug!(
                        "transition finished: frame {} -> {}",
                        self.current_frame, transition.target
                    );
                    self.current_frame = transition.target;
                    self.transition = None;
                    self.ticks_since_switch = 0;
                    switched = true;
                }
            }
            None => {
                if self.ticks_since_switch >= self.ticks_per_frame {
                    self.ticks_since_switch = 0;
                    if self.auto_transition && self.frame_count > 1 {
                        self.begin_transition(self.auto_direction);
                        switched = true;
                    }
                }
            }
        }

        trace!(
            "tick: state={:?} frame={} ticks={}",
            self.state(),
            self.current_frame,
            self.ticks_since_switch
        );

        let needed = match self.redraw_policy {
            RedrawPolicy::EveryTick => true,
            RedrawPolicy::OnChange => switched || self.transition.is_some() || self.stale,
        };
        if needed {
            Redraw::Needed
        } else {
            Redraw::NotNeeded
        }
    }

    /// Origins of the outgoing and incoming frames for the running slide.
    ///
    /// `size` is the display size; horizontal slides move by its width,
    /// vertical slides by its height. A backward slide mirrors both
    /// offsets. Returns `None` when no slide is running.
    pub fn slide_offsets(&self, slide: SlideDirection, size: Size) -> Option<SlideOffsets> {
        let transition = self.transition?;

        let (axis, dimension) = match slide {
            SlideDirection::Left | SlideDirection::Right => (Point::new(1, 0), size.width),
            SlideDirection::Up | SlideDirection::Down => (Point::new(0, 1), size.height),
        };
        let towards = match slide {
            SlideDirection::Left | SlideDirection::Up => -1,
            SlideDirection::Right | SlideDirection::Down => 1,
        };
        let sign = towards * transition.direction.sign();

        let shift = (self.clamped_transition_ticks() as i64 * dimension as i64
            / self.ticks_per_transition as i64) as i32;
        let outgoing = axis * (sign * shift);
        let incoming = outgoing - axis * (sign * dimension as i32);

        Some(SlideOffsets {
            outgoing_frame: self.current_frame,
            outgoing,
            incoming_frame: transition.target,
            incoming,
        })
    }

    fn begin_transition(&mut self, direction: TransitionDirection) {
        if self.frame_count <= 1 {
            return;
        }
        let target = direction.step(self.current_frame, self.frame_count);
        debug!(
            "transition started: frame {} -> {} ({:?})",
            self.current_frame, target, direction
        );
        self.transition = Some(Transition { target, direction });
        self.ticks_since_switch = 0;
        self.stale = true;
    }

    fn clamped_transition_ticks(&self) -> u32 {
        self.ticks_since_switch.min(self.ticks_per_transition - 1)
    }
}

impl Default for TransitionController {
    fn default() -> Self {
        Self::new()
    }
}

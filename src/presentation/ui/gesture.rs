//! Swipe gesture state machine for the deck screen.
//!
//! Tracks a horizontal card offset driven by mouse drags or keyboard
//! nudges. Releasing past the threshold commits the card off-screen;
//! anything short of it springs back to center.

use std::time::Duration;

use crate::domain::entities::SwipeDirection;

/// Fraction of the card width a drag must exceed to commit.
const THRESHOLD_DIVISOR: f32 = 4.0;

/// Time a committed card takes to clear the screen.
const COMMIT_DURATION: Duration = Duration::from_millis(250);

/// Spring-back half-life for a released card.
const SETTLE_HALF_LIFE: Duration = Duration::from_millis(60);

/// Offset below which a settling card snaps to center.
const SETTLE_EPSILON: f32 = 0.5;

/// Extra cells past the card edge before a commit counts as off-screen.
const OFFSCREEN_MARGIN: f32 = 4.0;

/// Phase of the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipePhase {
    /// Card at rest.
    Idle,
    /// Pointer is down and moving the card.
    Dragging,
    /// Card is springing back to center.
    Settling,
    /// Card is animating off-screen; decision pending.
    Committing(SwipeDirection),
}

/// Gesture state for the top card.
#[derive(Debug)]
pub struct SwipeGesture {
    dx: f32,
    phase: SwipePhase,
    card_width: u16,
    animate: bool,
    completed: Option<SwipeDirection>,
}

impl SwipeGesture {
    /// Creates a gesture for a card of the given width.
    #[must_use]
    pub fn new(card_width: u16) -> Self {
        Self {
            dx: 0.0,
            phase: SwipePhase::Idle,
            card_width,
            animate: true,
            completed: None,
        }
    }

    /// Disables animation; commits and settles resolve on the next tick.
    pub fn set_animations_enabled(&mut self, enabled: bool) {
        self.animate = enabled;
    }

    /// Updates the card width the threshold derives from.
    pub fn set_card_width(&mut self, width: u16) {
        self.card_width = width.max(1);
    }

    /// Drag distance past which a release commits.
    #[must_use]
    pub fn threshold(&self) -> f32 {
        f32::from(self.card_width) / THRESHOLD_DIVISOR
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> SwipePhase {
        self.phase
    }

    /// Current horizontal offset in cells.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn offset(&self) -> i32 {
        self.dx.round() as i32
    }

    /// True while a committed card is still animating off-screen.
    #[must_use]
    pub const fn is_committing(&self) -> bool {
        matches!(self.phase, SwipePhase::Committing(_))
    }

    /// How far toward the threshold the card has moved, signed.
    ///
    /// Negative values lean toward dislike, positive toward like; magnitude
    /// saturates at 1.0 once the threshold is passed.
    #[must_use]
    pub fn stamp_ratio(&self) -> f32 {
        let threshold = self.threshold();
        if threshold <= 0.0 {
            return 0.0;
        }
        (self.dx / threshold).clamp(-1.0, 1.0)
    }

    /// Starts a pointer drag.
    pub fn begin_drag(&mut self) {
        if self.is_committing() {
            return;
        }
        self.phase = SwipePhase::Dragging;
    }

    /// Moves the card to an absolute offset while dragging.
    pub fn drag_to(&mut self, dx: f32) {
        if self.phase != SwipePhase::Dragging {
            return;
        }
        self.dx = dx;
    }

    /// Releases a pointer drag: commit past the threshold, spring back otherwise.
    pub fn release(&mut self) {
        if self.phase != SwipePhase::Dragging {
            return;
        }
        if self.dx > self.threshold() {
            self.start_commit(SwipeDirection::Like);
        } else if self.dx < -self.threshold() {
            self.start_commit(SwipeDirection::Dislike);
        } else {
            self.phase = SwipePhase::Settling;
        }
    }

    /// Nudges the card horizontally from the keyboard.
    ///
    /// The spring keeps pulling during settle ticks, so held keys outrun it
    /// and cross the threshold, which commits immediately.
    pub fn nudge(&mut self, delta: f32) {
        if self.is_committing() {
            return;
        }
        self.dx += delta;
        if self.dx > self.threshold() {
            self.start_commit(SwipeDirection::Like);
        } else if self.dx < -self.threshold() {
            self.start_commit(SwipeDirection::Dislike);
        } else {
            self.phase = SwipePhase::Settling;
        }
    }

    /// Commits the card without a drag (action keys).
    pub fn force_commit(&mut self, direction: SwipeDirection) {
        if self.is_committing() {
            return;
        }
        self.start_commit(direction);
    }

    fn start_commit(&mut self, direction: SwipeDirection) {
        self.phase = SwipePhase::Committing(direction);
        if !self.animate {
            self.finish_commit(direction);
        }
    }

    fn finish_commit(&mut self, direction: SwipeDirection) {
        self.completed = Some(direction);
        self.dx = 0.0;
        self.phase = SwipePhase::Idle;
    }

    /// Advances animations by the elapsed duration.
    pub fn tick(&mut self, dt: Duration) {
        match self.phase {
            SwipePhase::Settling => {
                if !self.animate {
                    self.dx = 0.0;
                    self.phase = SwipePhase::Idle;
                    return;
                }
                let half_lives = dt.as_secs_f32() / SETTLE_HALF_LIFE.as_secs_f32();
                self.dx *= 0.5f32.powf(half_lives);
                if self.dx.abs() < SETTLE_EPSILON {
                    self.dx = 0.0;
                    self.phase = SwipePhase::Idle;
                }
            }
            SwipePhase::Committing(direction) => {
                let offscreen = f32::from(self.card_width) + OFFSCREEN_MARGIN;
                let speed = offscreen / COMMIT_DURATION.as_secs_f32();
                let sign = match direction {
                    SwipeDirection::Like => 1.0,
                    SwipeDirection::Dislike => -1.0,
                };
                self.dx += sign * speed * dt.as_secs_f32();
                if self.dx.abs() >= offscreen {
                    self.finish_commit(direction);
                }
            }
            SwipePhase::Idle | SwipePhase::Dragging => {}
        }
    }

    /// Takes the committed direction, if a commit finished since the last call.
    ///
    /// Drains the slot, so each committed swipe is observed exactly once.
    pub fn take_completed(&mut self) -> Option<SwipeDirection> {
        self.completed.take()
    }

    /// Resets the gesture for a fresh card.
    pub fn reset(&mut self) {
        self.dx = 0.0;
        self.phase = SwipePhase::Idle;
        self.completed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const WIDTH: u16 = 40; // threshold = 10

    fn gesture() -> SwipeGesture {
        SwipeGesture::new(WIDTH)
    }

    fn run_until_idle(g: &mut SwipeGesture) {
        for _ in 0..200 {
            g.tick(Duration::from_millis(33));
            if g.phase() == SwipePhase::Idle {
                return;
            }
        }
        panic!("gesture never returned to idle");
    }

    #[test]
    fn test_short_drag_springs_back() {
        let mut g = gesture();
        g.begin_drag();
        g.drag_to(6.0);
        g.release();

        assert_eq!(g.phase(), SwipePhase::Settling);
        run_until_idle(&mut g);

        assert_eq!(g.offset(), 0);
        assert!(g.take_completed().is_none());
    }

    #[test]
    fn test_drag_past_threshold_commits_like() {
        let mut g = gesture();
        g.begin_drag();
        g.drag_to(11.0);
        g.release();

        assert_eq!(g.phase(), SwipePhase::Committing(SwipeDirection::Like));
        run_until_idle(&mut g);

        assert_eq!(g.take_completed(), Some(SwipeDirection::Like));
    }

    #[test]
    fn test_drag_left_past_threshold_commits_dislike() {
        let mut g = gesture();
        g.begin_drag();
        g.drag_to(-11.0);
        g.release();

        run_until_idle(&mut g);
        assert_eq!(g.take_completed(), Some(SwipeDirection::Dislike));
    }

    #[test_case(10.0, false ; "exactly_at_threshold_springs_back")]
    #[test_case(10.5, true ; "just_past_threshold_commits")]
    #[test_case(-10.0, false ; "exactly_at_negative_threshold_springs_back")]
    #[test_case(-10.5, true ; "just_past_negative_threshold_commits")]
    fn test_threshold_boundary(dx: f32, commits: bool) {
        let mut g = gesture();
        g.begin_drag();
        g.drag_to(dx);
        g.release();

        assert_eq!(g.is_committing(), commits);
    }

    #[test]
    fn test_completed_is_observed_exactly_once() {
        let mut g = gesture();
        g.force_commit(SwipeDirection::Like);
        run_until_idle(&mut g);

        assert_eq!(g.take_completed(), Some(SwipeDirection::Like));
        assert_eq!(g.take_completed(), None);
    }

    #[test]
    fn test_force_commit_ignored_while_committing() {
        let mut g = gesture();
        g.force_commit(SwipeDirection::Like);
        assert!(g.is_committing());

        g.force_commit(SwipeDirection::Dislike);
        run_until_idle(&mut g);

        assert_eq!(g.take_completed(), Some(SwipeDirection::Like));
        assert_eq!(g.take_completed(), None);
    }

    #[test]
    fn test_nudges_accumulate_to_commit() {
        let mut g = gesture();
        for _ in 0..6 {
            g.nudge(2.0);
        }
        // 12 > 10 crosses the threshold
        assert_eq!(g.phase(), SwipePhase::Committing(SwipeDirection::Like));
    }

    #[test]
    fn test_nudge_short_of_threshold_settles() {
        let mut g = gesture();
        g.nudge(2.0);

        assert_eq!(g.phase(), SwipePhase::Settling);
        run_until_idle(&mut g);
        assert_eq!(g.offset(), 0);
        assert!(g.take_completed().is_none());
    }

    #[test]
    fn test_drag_ignored_while_committing() {
        let mut g = gesture();
        g.force_commit(SwipeDirection::Dislike);

        g.begin_drag();
        g.drag_to(20.0);

        assert!(g.is_committing());
        run_until_idle(&mut g);
        assert_eq!(g.take_completed(), Some(SwipeDirection::Dislike));
    }

    #[test]
    fn test_stamp_ratio_saturates() {
        let mut g = gesture();
        g.begin_drag();

        g.drag_to(5.0);
        assert!((g.stamp_ratio() - 0.5).abs() < f32::EPSILON);

        g.drag_to(25.0);
        assert!((g.stamp_ratio() - 1.0).abs() < f32::EPSILON);

        g.drag_to(-25.0);
        assert!((g.stamp_ratio() + 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_instant_mode_commits_without_ticks() {
        let mut g = gesture();
        g.set_animations_enabled(false);

        g.force_commit(SwipeDirection::Like);

        assert_eq!(g.phase(), SwipePhase::Idle);
        assert_eq!(g.take_completed(), Some(SwipeDirection::Like));
    }

    #[test]
    fn test_reset_clears_pending_commit() {
        let mut g = gesture();
        g.force_commit(SwipeDirection::Like);
        run_until_idle(&mut g);
        g.reset();

        assert!(g.take_completed().is_none());
        assert_eq!(g.offset(), 0);
    }
}

//! Two-phase digit flip.
//!
//! When a new value is observed the old digit animates out while the new one
//! slides in. At `FLIP_SWAP_MS` the on-screen content swaps to the new value
//! and at `FLIP_SETTLE_MS` the transition state clears.
//!
//! A change observed mid-transition coalesces: the incoming value is replaced
//! by the newest one and the timeline restarts from that observation, with
//! whatever is currently on screen as the outgoing digit. Nothing is queued.

use crate::constants::{FLIP_SETTLE_MS, FLIP_SWAP_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipPhase {
    Idle,
    /// Before the swap: the old digit is still the on-screen content.
    Leaving,
    /// After the swap, until the transition settles.
    Entering,
}

/// What the presentation layer should draw right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipView {
    pub outgoing: u64,
    pub incoming: u64,
    pub animating: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipAnimator {
    displayed: u64,
    target: u64,
    phase: FlipPhase,
    started_ms: i64,
}

impl FlipAnimator {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self {
            displayed: value,
            target: value,
            phase: FlipPhase::Idle,
            started_ms: 0,
        }
    }

    /// Feed the latest value. Returns `true` when a transition was started,
    /// retargeted or cancelled.
    pub fn observe(&mut self, value: u64, now_ms: i64) -> bool {
        self.advance(now_ms);
        if value == self.target {
            return false;
        }
        if value == self.displayed && self.phase == FlipPhase::Leaving {
            // Reverted before the swap; nothing left to animate.
            self.target = value;
            self.phase = FlipPhase::Idle;
            return true;
        }
        self.target = value;
        self.started_ms = now_ms;
        self.phase = FlipPhase::Leaving;
        true
    }

    /// Apply any phase boundary that has passed by `now_ms`.
    pub fn advance(&mut self, now_ms: i64) {
        if self.phase == FlipPhase::Idle {
            return;
        }
        let elapsed = now_ms.saturating_sub(self.started_ms);
        if elapsed >= FLIP_SETTLE_MS {
            self.displayed = self.target;
            self.phase = FlipPhase::Idle;
        } else if elapsed >= FLIP_SWAP_MS {
            self.displayed = self.target;
            self.phase = FlipPhase::Entering;
        }
    }

    #[must_use]
    pub const fn view(&self) -> FlipView {
        FlipView {
            outgoing: self.displayed,
            incoming: self.target,
            animating: !matches!(self.phase, FlipPhase::Idle),
        }
    }

    #[must_use]
    pub const fn phase(&self) -> FlipPhase {
        self.phase
    }

    /// Latest observed value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.target
    }

    /// Instant of the next phase boundary, if a transition is in flight.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<i64> {
        match self.phase {
            FlipPhase::Idle => None,
            FlipPhase::Leaving => Some(self.started_ms + FLIP_SWAP_MS),
            FlipPhase::Entering => Some(self.started_ms + FLIP_SETTLE_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_value_does_not_animate() {
        let mut flip = FlipAnimator::new(7);
        assert!(!flip.observe(7, 1_000));
        assert_eq!(flip.phase(), FlipPhase::Idle);
        assert_eq!(flip.next_deadline(), None);
    }

    #[test]
    fn swap_then_settle_on_schedule() {
        let mut flip = FlipAnimator::new(10);
        assert!(flip.observe(9, 1_000));
        assert_eq!(
            flip.view(),
            FlipView {
                outgoing: 10,
                incoming: 9,
                animating: true
            }
        );
        assert_eq!(flip.next_deadline(), Some(1_200));

        flip.advance(1_199);
        assert_eq!(flip.view().outgoing, 10);

        flip.advance(1_200);
        assert_eq!(flip.phase(), FlipPhase::Entering);
        assert_eq!(flip.view().outgoing, 9);
        assert!(flip.view().animating);
        assert_eq!(flip.next_deadline(), Some(1_400));

        flip.advance(1_400);
        assert_eq!(
            flip.view(),
            FlipView {
                outgoing: 9,
                incoming: 9,
                animating: false
            }
        );
    }

    #[test]
    fn late_advance_jumps_straight_to_idle() {
        let mut flip = FlipAnimator::new(3);
        flip.observe(2, 0);
        flip.advance(5_000);
        assert_eq!(flip.phase(), FlipPhase::Idle);
        assert_eq!(flip.view().outgoing, 2);
    }

    #[test]
    fn mid_transition_change_coalesces_to_latest() {
        let mut flip = FlipAnimator::new(5);
        flip.observe(4, 0);
        assert!(flip.observe(3, 100));
        assert_eq!(flip.view().outgoing, 5);
        assert_eq!(flip.view().incoming, 3);
        assert_eq!(flip.next_deadline(), Some(300));

        flip.advance(300);
        assert_eq!(flip.view().outgoing, 3);
        assert!(flip.observe(2, 350));
        // On-screen content is already 3, so that becomes the outgoing digit.
        assert_eq!(flip.view().outgoing, 3);
        assert_eq!(flip.view().incoming, 2);
        flip.advance(750);
        assert_eq!(flip.view(), FlipView {
            outgoing: 2,
            incoming: 2,
            animating: false
        });
    }

    #[test]
    fn revert_before_swap_cancels() {
        let mut flip = FlipAnimator::new(8);
        flip.observe(7, 0);
        assert!(flip.observe(8, 50));
        assert_eq!(flip.phase(), FlipPhase::Idle);
        assert_eq!(flip.value(), 8);
    }
}

//! Fixed-step update clock.
//!
//! Rendering happens once per loop iteration. Model updates run at a fixed
//! [`FPS`] out of an accumulated lag, and the leftover fraction becomes the
//! `fudge` handed to render.

use std::time::{Duration, Instant};

/// Fixed update rate.
pub const FPS: u32 = 60;

/// Upper bound on catch-up updates per frame after a long stall.
pub const MAX_UPDATES_PER_FRAME: u32 = 10;

pub fn update_step() -> Duration {
    Duration::from_secs(1) / FPS
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    /// Fixed updates to run before rendering.
    pub updates: u32,
    /// Progress towards the next update, in `[0, 1]`.
    pub fudge: f32,
}

#[derive(Debug)]
pub struct FrameClock {
    lag: Duration,
    last: Option<Instant>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            lag: Duration::ZERO,
            last: None,
        }
    }

    /// Account for the time elapsed since the previous call.
    pub fn advance(&mut self, now: Instant) -> FrameStep {
        if let Some(last) = self.last {
            self.lag += now.saturating_duration_since(last);
        }
        self.last = Some(now);

        let step = update_step();
        let mut updates = 0;
        while self.lag >= step && updates < MAX_UPDATES_PER_FRAME {
            self.lag -= step;
            updates += 1;
        }
        if self.lag >= step {
            // Too far behind; drop the backlog rather than spiral.
            self.lag = Duration::ZERO;
        }

        FrameStep {
            updates,
            fudge: (self.lag.as_secs_f32() / step.as_secs_f32()).clamp(0.0, 1.0),
        }
    }

    /// Forget elapsed time, e.g. after the loop slept waiting for events.
    pub fn reset(&mut self, now: Instant) {
        self.lag = Duration::ZERO;
        self.last = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_runs_no_updates() {
        let mut clock = FrameClock::new();
        let step = clock.advance(Instant::now());
        assert_eq!(step.updates, 0);
        assert_eq!(step.fudge, 0.0);
    }

    #[test]
    fn test_lag_becomes_updates_and_fudge() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.advance(t0);

        let step = clock.advance(t0 + update_step() * 2 + update_step() / 2);
        assert_eq!(step.updates, 2);
        assert!((step.fudge - 0.5).abs() < 0.01, "{}", step.fudge);
    }

    #[test]
    fn test_stall_is_capped() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.advance(t0);
        let step = clock.advance(t0 + Duration::from_secs(5));
        assert_eq!(step.updates, MAX_UPDATES_PER_FRAME);
        assert_eq!(step.fudge, 0.0);
    }

    #[test]
    fn test_reset_drops_lag() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.advance(t0);
        clock.reset(t0 + Duration::from_secs(1));
        let step = clock.advance(t0 + Duration::from_secs(1));
        assert_eq!(step.updates, 0);
    }
}

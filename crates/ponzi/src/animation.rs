//! Frame-indexed animations: the generic interpolator, fades and spinners.
//!
//! Animations advance one frame per fixed update tick. Rendering samples
//! them with a `fudge` in `[0, 1]`, the fraction of the next tick already
//! elapsed, so motion stays smooth when frames outpace updates.

use std::f32::consts::TAU;

use ponzi_render::DrawList;

use crate::frame_loop::FPS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Stopped,
    Running,
    /// Runs out to the final frame, then stops. Loops do not wrap.
    Finishing,
}

/// Linear interpolation from `start` to `end` over `frame_count` frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    start: f32,
    end: f32,
    frame_count: u32,
    current_frame: u32,
    looping: bool,
    state: AnimationState,
}

impl Animation {
    /// A stopped animation on frame 0.
    pub fn new(start: f32, end: f32, frame_count: u32) -> Self {
        Self {
            start,
            end,
            frame_count: frame_count.max(1),
            current_frame: 0,
            looping: false,
            state: AnimationState::Stopped,
        }
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    fn last_frame(&self) -> u32 {
        self.frame_count - 1
    }

    pub fn is_animating(&self) -> bool {
        self.state != AnimationState::Stopped
    }

    /// Run from the current frame.
    pub fn start(&mut self) {
        if self.frame_count > 1 {
            self.state = AnimationState::Running;
        }
    }

    /// Run from frame 0.
    pub fn restart(&mut self) {
        self.current_frame = 0;
        self.start();
    }

    pub fn stop(&mut self) {
        self.state = AnimationState::Stopped;
    }

    /// Let a running animation play out to its last frame.
    pub fn finish(&mut self) {
        if self.state == AnimationState::Running {
            self.state = AnimationState::Finishing;
        }
    }

    /// Advance one frame. Returns whether the animation moved.
    pub fn update(&mut self) -> bool {
        match self.state {
            AnimationState::Stopped => false,
            AnimationState::Running if self.looping => {
                self.current_frame = (self.current_frame + 1) % self.frame_count;
                true
            }
            AnimationState::Running | AnimationState::Finishing => {
                self.current_frame = (self.current_frame + 1).min(self.last_frame());
                if self.current_frame == self.last_frame() {
                    self.state = AnimationState::Stopped;
                }
                true
            }
        }
    }

    /// Interpolated value. Boundary frames ignore `fudge`.
    pub fn value(&self, fudge: f32) -> f32 {
        let last = self.last_frame();
        let p = if self.current_frame >= last {
            1.0
        } else if self.current_frame == 0 {
            0.0
        } else {
            let fudge = if self.is_animating() { fudge.clamp(0.0, 1.0) } else { 0.0 };
            ((self.current_frame as f32 + fudge) / last as f32).min(1.0)
        };
        self.start + (self.end - self.start) * p
    }

    /// Same motion played backwards from the value currently shown.
    pub fn reverse(&self) -> Animation {
        Animation {
            start: self.end,
            end: self.start,
            frame_count: self.frame_count,
            current_frame: self.last_frame() - self.current_frame,
            looping: self.looping,
            state: self.state,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    FadingIn,
    FullyVisible,
    FadingOut,
    Hidden,
}

/// Alpha fade between hidden and fully visible.
#[derive(Debug, Clone)]
pub struct Fader {
    fade_in: Animation,
    fade_out: Animation,
    state: FadeState,
}

impl Fader {
    /// A hidden fader whose fades take `ticks` updates.
    pub fn new(ticks: u32) -> Self {
        Self {
            fade_in: Animation::new(0.0, 1.0, ticks + 1),
            fade_out: Animation::new(1.0, 0.0, ticks + 1),
            state: FadeState::Hidden,
        }
    }

    /// One-second fader.
    pub fn one_second() -> Self {
        Self::new(FPS)
    }

    pub fn visible(ticks: u32) -> Self {
        Self {
            state: FadeState::FullyVisible,
            ..Self::new(ticks)
        }
    }

    pub fn state(&self) -> FadeState {
        self.state
    }

    pub fn is_hidden(&self) -> bool {
        self.state == FadeState::Hidden
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, FadeState::FadingIn | FadeState::FadingOut)
    }

    pub fn fade_in(&mut self) {
        match self.state {
            FadeState::FadingIn | FadeState::FullyVisible => return,
            FadeState::Hidden => self.fade_in.restart(),
            FadeState::FadingOut => {
                self.fade_in = self.fade_out.reverse();
                self.fade_in.start();
            }
        }
        self.state = FadeState::FadingIn;
    }

    pub fn fade_out(&mut self) {
        match self.state {
            FadeState::FadingOut | FadeState::Hidden => return,
            FadeState::FullyVisible => self.fade_out.restart(),
            FadeState::FadingIn => {
                self.fade_out = self.fade_in.reverse();
                self.fade_out.start();
            }
        }
        self.state = FadeState::FadingOut;
    }

    pub fn update(&mut self) -> bool {
        match self.state {
            FadeState::FadingIn => {
                self.fade_in.update();
                if !self.fade_in.is_animating() {
                    self.state = FadeState::FullyVisible;
                }
                true
            }
            FadeState::FadingOut => {
                self.fade_out.update();
                if !self.fade_out.is_animating() {
                    self.state = FadeState::Hidden;
                }
                true
            }
            FadeState::FullyVisible | FadeState::Hidden => false,
        }
    }

    pub fn value(&self, fudge: f32) -> f32 {
        match self.state {
            FadeState::FadingIn => self.fade_in.value(fudge),
            FadeState::FullyVisible => 1.0,
            FadeState::FadingOut => self.fade_out.value(fudge),
            FadeState::Hidden => 0.0,
        }
    }

    /// Run `f` with the list's alpha scaled by the fade, unless hidden.
    pub fn render(&self, list: &mut DrawList, fudge: f32, f: impl FnOnce(&mut DrawList)) {
        if self.is_hidden() {
            return;
        }
        list.with_alpha(self.value(fudge), f);
    }
}

/// Frames per spinner revolution (half a second).
pub const SPINNER_FRAMES: u32 = FPS / 2;

/// Continuous rotation that completes its revolution when stopped.
#[derive(Debug, Clone)]
pub struct Spinner {
    rotation: Animation,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            rotation: Animation::new(0.0, -TAU, SPINNER_FRAMES).looping(),
        }
    }

    pub fn start(&mut self) {
        self.rotation.start();
    }

    /// Finish the current revolution, then stop.
    pub fn stop(&mut self) {
        self.rotation.finish();
    }

    pub fn is_animating(&self) -> bool {
        self.rotation.is_animating()
    }

    pub fn update(&mut self) -> bool {
        let moved = self.rotation.update();
        if !self.rotation.is_animating() && self.rotation.current_frame() != 0 {
            // A finished revolution looks like frame 0.
            self.rotation = Animation::new(0.0, -TAU, SPINNER_FRAMES).looping();
        }
        moved
    }

    /// Rotation in radians. Frame `n` sits at `n / SPINNER_FRAMES` of a turn,
    /// so the wrap from the last frame back to 0 never repeats an angle.
    pub fn angle(&self, fudge: f32) -> f32 {
        if !self.rotation.is_animating() {
            return 0.0;
        }
        let frame = self.rotation.current_frame() as f32 + fudge.clamp(0.0, 1.0);
        -TAU * frame / SPINNER_FRAMES as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_boundaries() {
        let mut a = Animation::new(10.0, 20.0, 3);
        a.start();
        assert_eq!(a.value(0.0), 10.0);
        assert_eq!(a.value(0.5), 10.0);

        a.update();
        assert!(close(a.value(0.0), 15.0));
        assert!(close(a.value(0.5), 17.5));

        a.update();
        assert_eq!(a.state(), AnimationState::Stopped);
        assert_eq!(a.value(0.0), 20.0);
        assert_eq!(a.value(0.9), 20.0);
        assert!(!a.update());
    }

    #[test]
    fn test_looping_wraps() {
        let mut a = Animation::new(0.0, 1.0, 3).looping();
        a.start();
        a.update();
        a.update();
        assert_eq!(a.current_frame(), 2);
        a.update();
        assert_eq!(a.current_frame(), 0);
        assert!(a.is_animating());
    }

    #[test]
    fn test_finishing_runs_out() {
        let mut a = Animation::new(0.0, 1.0, 4).looping();
        a.start();
        a.update();
        a.finish();
        assert_eq!(a.state(), AnimationState::Finishing);
        a.update();
        a.update();
        assert_eq!(a.current_frame(), 3);
        assert_eq!(a.state(), AnimationState::Stopped);
    }

    #[test]
    fn test_reverse_preserves_value() {
        let mut a = Animation::new(0.0, 1.0, 5);
        a.start();
        a.update();
        let before = a.value(0.0);
        let r = a.reverse();
        assert!(close(r.value(0.0), before));
        assert_eq!(r.current_frame(), 3);
    }

    #[test]
    fn test_fade_in_reaches_one_after_fps_ticks() {
        let mut f = Fader::one_second();
        f.fade_in();
        assert_eq!(f.value(0.0), 0.0);
        assert_eq!(f.value(0.7), 0.0);
        for tick in 1..=FPS {
            f.update();
            if tick < FPS {
                assert!(f.value(0.0) < 1.0, "tick {tick}");
            }
        }
        assert_eq!(f.state(), FadeState::FullyVisible);
        assert_eq!(f.value(0.0), 1.0);
        for _ in 0..10 {
            f.update();
        }
        assert_eq!(f.value(0.5), 1.0);
    }

    #[test]
    fn test_fade_out_midway_reverses() {
        let mut f = Fader::new(10);
        f.fade_in();
        for _ in 0..4 {
            f.update();
        }
        let shown = f.value(0.0);
        f.fade_out();
        assert!(close(f.value(0.0), shown));
        for _ in 0..10 {
            f.update();
        }
        assert!(f.is_hidden());
    }

    #[test]
    fn test_hidden_fader_skips_render() {
        let f = Fader::new(10);
        let mut list = DrawList::new();
        let mut called = false;
        f.render(&mut list, 0.0, |_| called = true);
        assert!(!called);

        let f = Fader::visible(10);
        f.render(&mut list, 0.0, |l| {
            called = true;
            assert_eq!(l.alpha(), 1.0);
        });
        assert!(called);
    }

    #[test]
    fn test_spinner_completes_revolution() {
        let mut s = Spinner::new();
        s.start();
        for _ in 0..5 {
            s.update();
        }
        s.stop();
        assert!(s.is_animating());
        let mut ticks = 0;
        while s.is_animating() {
            s.update();
            ticks += 1;
            assert!(ticks <= SPINNER_FRAMES);
        }
        assert_eq!(s.angle(0.0), 0.0);
    }

    #[test]
    fn test_spinner_never_repeats_angle_at_wrap() {
        let mut s = Spinner::new();
        s.start();
        let step = TAU / SPINNER_FRAMES as f32;
        let mut prev = s.angle(0.0);
        assert_eq!(prev, 0.0);
        for tick in 1..=2 * SPINNER_FRAMES {
            s.update();
            let angle = s.angle(0.0);
            let moved = (prev - angle).rem_euclid(TAU);
            assert!(close(moved, step), "tick {tick}: {prev} -> {angle}");
            prev = angle;
        }
        assert_eq!(prev, 0.0);
        // Interpolating the last frame lands on the next revolution's start.
        for _ in 1..SPINNER_FRAMES {
            s.update();
        }
        assert!(close(s.angle(1.0), -TAU));
    }
}

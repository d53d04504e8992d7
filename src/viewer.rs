//! Slideshow viewer state machine.
//!
//! All index, timer and playback state lives in [`Viewer`]. The window layer
//! feeds it input and frame time, then drains [`Effect`]s to load slides,
//! animate them and drive the audio.

use std::time::Duration;

use crate::constants::{EMPTY_VIEWER, EXIT_DELAY, LOAD_FAILED, PROGRESS_TICK};
use crate::gesture::Gesture;
use crate::state::{PlaybackState, SlideStatus};
use crate::theme::{Theme, presentation};
use crate::timer::{Delay, Timer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load and render the slide at this index.
    Show(usize),
    /// Start the exit animation of the slide on screen.
    Exit(Direction),
    ResumeAudio,
    PauseAudio,
}

pub struct Viewer {
    len: usize,
    index: usize,
    state: PlaybackState,
    status: SlideStatus,

    slide_timer: Timer,
    progress_timer: Timer,
    swap: Delay,
    pending_steps: isize,

    slide_clock: Duration,
    progress: f32,

    effects: Vec<Effect>,
}

impl Viewer {
    pub fn new(len: usize, theme: Option<Theme>) -> Self {
        Self {
            len,
            index: 0,
            state: PlaybackState::Idle,
            status: SlideStatus::Loading,
            slide_timer: Timer::new(presentation(theme).interval),
            progress_timer: Timer::new(PROGRESS_TICK),
            swap: Delay::default(),
            pending_steps: 0,
            slide_clock: Duration::ZERO,
            progress: 0.0,
            effects: Vec::new(),
        }
    }

    /// Shows the first image and starts playing. An empty list only shows the
    /// empty-state message.
    pub fn start(&mut self) {
        if self.len == 0 {
            tracing::warn!("no images provided to viewer");
            self.status = SlideStatus::Empty;
            return;
        }
        self.show(0);
        self.play();
    }

    pub fn advance(&mut self) {
        self.step(Direction::Forward);
    }

    pub fn retreat(&mut self) {
        self.step(Direction::Backward);
    }

    /// Next control: advance, and restart the timers when playing.
    pub fn next_pressed(&mut self) {
        self.advance();
        if self.is_playing() {
            self.play();
        }
    }

    /// Prev control: retreat, and restart the timers when playing.
    pub fn prev_pressed(&mut self) {
        self.retreat();
        if self.is_playing() {
            self.play();
        }
    }

    pub fn swiped(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Advance => self.advance(),
            Gesture::Retreat => self.retreat(),
        }
    }

    pub fn toggle_playback(&mut self) {
        if self.len == 0 {
            return;
        }
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// The slide at `index` is on screen.
    pub fn slide_loaded(&mut self, index: usize) {
        if index == self.index && self.status == SlideStatus::Loading {
            self.status = SlideStatus::Shown;
        }
    }

    /// The slide at `index` could not be loaded. Its failure message stays on
    /// screen until the next transition.
    pub fn slide_failed(&mut self, index: usize, reason: impl Into<String>) {
        if index == self.index {
            let reason = reason.into();
            tracing::error!(index, %reason, "failed to load slide");
            self.status = SlideStatus::Failed(reason);
        }
    }

    /// Advances both timers and any pending slide swap by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        if self.swap.tick(dt) {
            self.finish_swap();
        }

        if self.is_playing() {
            self.slide_clock += dt;
            for _ in 0..self.slide_timer.tick(dt) {
                self.advance();
            }
        }

        if self.progress_timer.tick(dt) > 0 {
            let interval = self.slide_timer.interval().as_secs_f32();
            self.progress = if interval > 0.0 {
                (self.slide_clock.as_secs_f32() / interval * 100.0).min(100.0)
            } else {
                100.0
            };
            if self.progress >= 100.0 {
                self.progress_timer.cancel();
            }
        }
    }

    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn status(&self) -> &SlideStatus {
        &self.status
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Percentage of the current interval elapsed, 0 to 100.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn counter(&self) -> String {
        if self.len == 0 {
            return String::new();
        }
        format!("{} / {}", self.index + 1, self.len)
    }

    /// Text shown in place of a slide, if any.
    pub fn message(&self) -> Option<&str> {
        match &self.status {
            SlideStatus::Empty => Some(EMPTY_VIEWER),
            SlideStatus::Failed(_) => Some(LOAD_FAILED),
            _ => None,
        }
    }

    fn on_screen(&self) -> bool {
        matches!(self.status, SlideStatus::Loading | SlideStatus::Shown)
    }

    fn step(&mut self, direction: Direction) {
        if self.len == 0 {
            return;
        }
        self.pending_steps += match direction {
            Direction::Forward => 1,
            Direction::Backward => -1,
        };
        if self.swap.is_pending() {
            return;
        }
        if self.on_screen() {
            self.effects.push(Effect::Exit(direction));
            self.swap.schedule(EXIT_DELAY);
        } else {
            self.finish_swap();
        }
    }

    fn finish_swap(&mut self) {
        let len = self.len as isize;
        let next = (self.index as isize + self.pending_steps).rem_euclid(len) as usize;
        self.pending_steps = 0;
        self.show(next);
    }

    fn show(&mut self, index: usize) {
        tracing::debug!(index, "showing slide");
        self.index = index;
        self.status = SlideStatus::Loading;
        self.slide_clock = Duration::ZERO;
        self.progress = 0.0;
        if self.is_playing() {
            self.progress_timer.restart();
        }
        self.effects.push(Effect::Show(index));
    }

    fn play(&mut self) {
        self.slide_timer.restart();
        self.progress_timer.restart();
        self.slide_clock = Duration::ZERO;
        self.progress = 0.0;
        self.state = PlaybackState::Playing;
        self.effects.push(Effect::ResumeAudio);
    }

    fn pause(&mut self) {
        self.slide_timer.cancel();
        self.progress_timer.cancel();
        self.state = PlaybackState::Paused;
        self.effects.push(Effect::PauseAudio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::Swipe;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn paused_viewer(len: usize) -> Viewer {
        let mut v = Viewer::new(len, None);
        v.start();
        v.toggle_playback();
        v.take_effects();
        v
    }

    #[test]
    fn test_start_shows_first_slide() {
        let mut v = Viewer::new(3, Some(Theme::Vibrant));
        v.start();
        assert_eq!(v.index(), 0);
        assert_eq!(v.state(), PlaybackState::Playing);
        assert_eq!(v.counter(), "1 / 3");
        assert_eq!(v.take_effects(), vec![Effect::Show(0), Effect::ResumeAudio]);
    }

    #[test]
    fn test_empty_start_shows_message() {
        let mut v = Viewer::new(0, None);
        v.start();
        v.advance();
        v.retreat();
        v.toggle_playback();
        v.tick(ms(10_000));
        assert_eq!(v.status(), &SlideStatus::Empty);
        assert_eq!(v.message(), Some(EMPTY_VIEWER));
        assert!(v.take_effects().is_empty());
        assert_eq!(v.counter(), "");
    }

    #[test]
    fn test_advances_wrap() {
        for len in 1..6 {
            let mut v = paused_viewer(len);
            for n in 1..=12 {
                v.advance();
                v.tick(EXIT_DELAY);
                assert_eq!(v.index(), n % len, "len {len} after {n} advances");
            }
        }
    }

    #[test]
    fn test_retreats_wrap() {
        for len in 1..6 {
            let mut v = paused_viewer(len);
            for n in 1..=12 {
                v.retreat();
                v.tick(EXIT_DELAY);
                assert_eq!(v.index(), (len - n % len) % len, "len {len} after {n} retreats");
            }
        }
    }

    #[test]
    fn test_swap_waits_for_exit_delay() {
        let mut v = paused_viewer(3);
        v.advance();
        assert_eq!(v.take_effects(), vec![Effect::Exit(Direction::Forward)]);
        v.tick(ms(299));
        assert_eq!(v.index(), 0);
        v.tick(ms(1));
        assert_eq!(v.index(), 1);
        assert_eq!(v.take_effects(), vec![Effect::Show(1)]);
    }

    #[test]
    fn test_steps_during_exit_accumulate() {
        let mut v = paused_viewer(5);
        v.advance();
        v.advance();
        v.retreat();
        v.advance();
        v.tick(EXIT_DELAY);
        assert_eq!(v.index(), 2);
    }

    #[test]
    fn test_toggle_preserves_index() {
        let mut v = Viewer::new(4, None);
        v.start();
        v.advance();
        v.tick(EXIT_DELAY);
        v.take_effects();

        v.toggle_playback();
        assert_eq!(v.state(), PlaybackState::Paused);
        assert_eq!(v.index(), 1);
        v.toggle_playback();
        assert_eq!(v.state(), PlaybackState::Playing);
        assert_eq!(v.index(), 1);
        assert_eq!(v.take_effects(), vec![Effect::PauseAudio, Effect::ResumeAudio]);
    }

    #[test]
    fn test_paused_viewer_does_not_advance() {
        let mut v = paused_viewer(3);
        v.tick(ms(60_000));
        assert_eq!(v.index(), 0);
        assert!(v.take_effects().is_empty());
    }

    #[test]
    fn test_timer_advances_at_theme_interval() {
        let mut v = Viewer::new(3, Some(Theme::Vibrant));
        v.start();
        v.take_effects();
        v.tick(ms(2499));
        assert!(v.take_effects().is_empty());
        v.tick(ms(1));
        assert_eq!(v.take_effects(), vec![Effect::Exit(Direction::Forward)]);
        v.tick(EXIT_DELAY);
        assert_eq!(v.index(), 1);
    }

    #[test]
    fn test_next_pressed_restarts_timer() {
        let mut v = Viewer::new(3, Some(Theme::Cinematic));
        v.start();
        v.tick(ms(3000));
        v.next_pressed();
        v.tick(EXIT_DELAY);
        assert_eq!(v.index(), 1);
        // 300ms since the press; the old schedule would have fired at 3500ms.
        v.tick(ms(3000));
        assert_eq!(v.index(), 1);
        v.take_effects();
        v.tick(ms(200));
        assert_eq!(v.take_effects(), vec![Effect::Exit(Direction::Forward)]);
    }

    #[test]
    fn test_progress_monotonic_and_resets() {
        let mut v = Viewer::new(3, None);
        v.start();
        let mut last = 0.0;
        for _ in 0..59 {
            v.tick(PROGRESS_TICK);
            assert!(v.progress() >= last);
            last = v.progress();
        }
        assert!(last > 90.0 && last < 100.0);

        v.next_pressed();
        v.tick(ms(299));
        v.tick(ms(1));
        assert_eq!(v.index(), 1);
        assert_eq!(v.progress(), 0.0);
        v.tick(PROGRESS_TICK);
        assert!(v.progress() > 0.0);
    }

    #[test]
    fn test_prev_pressed_resets_progress() {
        let mut v = Viewer::new(3, None);
        v.start();
        for _ in 0..20 {
            v.tick(PROGRESS_TICK);
        }
        assert!(v.progress() > 30.0);

        v.prev_pressed();
        v.tick(ms(299));
        v.tick(ms(1));
        assert_eq!(v.index(), 2);
        assert_eq!(v.progress(), 0.0);
        v.tick(PROGRESS_TICK);
        assert!(v.progress() > 0.0 && v.progress() < 5.0);
    }

    #[test]
    fn test_swipe_right_retreats_once() {
        let mut v = paused_viewer(4);
        let mut swipe = Swipe::default();
        swipe.begin(100.0);
        if let Some(gesture) = swipe.end(140.0) {
            v.swiped(gesture);
        }
        assert_eq!(v.take_effects(), vec![Effect::Exit(Direction::Backward)]);
        v.tick(EXIT_DELAY);
        assert_eq!(v.index(), 3);
        assert_eq!(v.take_effects(), vec![Effect::Show(3)]);
    }

    #[test]
    fn test_short_drags_do_not_navigate() {
        let mut v = paused_viewer(4);
        let mut swipe = Swipe::default();
        for end in [120.0, 80.0] {
            swipe.begin(100.0);
            if let Some(gesture) = swipe.end(end) {
                v.swiped(gesture);
            }
        }
        v.tick(EXIT_DELAY);
        assert_eq!(v.index(), 0);
        assert!(v.take_effects().is_empty());
    }

    #[test]
    fn test_swipe_left_advances() {
        let mut v = paused_viewer(4);
        v.swiped(Gesture::Advance);
        v.tick(EXIT_DELAY);
        assert_eq!(v.index(), 1);
    }

    #[test]
    fn test_progress_clamped() {
        let mut v = Viewer::new(2, None);
        v.start();
        v.slide_clock = ms(10_000);
        v.tick(PROGRESS_TICK);
        assert_eq!(v.progress(), 100.0);
    }

    #[test]
    fn test_failed_slide_skips_exit_animation() {
        let mut v = paused_viewer(3);
        v.slide_failed(0, "decode error");
        assert_eq!(v.message(), Some(LOAD_FAILED));
        v.advance();
        assert_eq!(v.index(), 1);
        assert_eq!(v.take_effects(), vec![Effect::Show(1)]);
    }

    #[test]
    fn test_failed_slide_keeps_timer_running() {
        let mut v = Viewer::new(2, None);
        v.start();
        v.slide_failed(0, "missing");
        v.tick(ms(2999));
        assert_eq!(v.index(), 0);
        v.tick(ms(1));
        assert_eq!(v.index(), 1);
    }

    #[test]
    fn test_stale_load_notifications_ignored() {
        let mut v = paused_viewer(3);
        v.advance();
        v.tick(EXIT_DELAY);
        v.slide_failed(0, "late");
        assert_eq!(v.status(), &SlideStatus::Loading);
        v.slide_loaded(1);
        assert_eq!(v.status(), &SlideStatus::Shown);
    }
}

use std::sync::Arc;
use std::time::Duration;
use raylib::prelude::*;

use crate::audio::BackgroundAudio;
use crate::gesture::Swipe;
use crate::loader::SlideLoader;
use crate::screens::{ACCENT_COLOR, Screen, Switch, TEXT_COLOR, draw_button, draw_message, hit};
use crate::slide::Slide;
use crate::state::PlaybackState;
use crate::texture_loader::{RawImage, upload};
use crate::theme::{Look, Theme, presentation};
use crate::viewer::{Effect, Viewer};

const BAR_HEIGHT: f32 = 56.0;
const PROGRESS_HEIGHT: f32 = 4.0;
const BUTTON_WIDTH: f32 = 110.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Prev,
    Toggle,
    Next,
    Fullscreen,
}

const CONTROLS: [Control; 4] = [Control::Prev, Control::Toggle, Control::Next, Control::Fullscreen];

fn stage(sw: f32, sh: f32) -> Rectangle {
    Rectangle::new(24.0, 24.0, sw - 48.0, sh - BAR_HEIGHT - 48.0)
}

fn control_rects(sw: f32, sh: f32) -> Vec<Rectangle> {
    let total = CONTROLS.len() as f32 * (BUTTON_WIDTH + 8.0) - 8.0;
    let x = (sw - total) * 0.5;
    crate::screens::strip_layout(&[BUTTON_WIDTH; 4], x, sh - BAR_HEIGHT + 10.0, BAR_HEIGHT - 20.0, 8.0)
}

pub struct ViewerScreen<'a> {
    viewer: Viewer,
    images: Vec<Arc<RawImage>>,
    loader: SlideLoader,
    look: Look,
    slide: Option<Slide>,
    audio: BackgroundAudio<'a>,
    swipe: Swipe,
}

impl<'a> ViewerScreen<'a> {
    pub fn new(images: Vec<Arc<RawImage>>, theme: Option<Theme>, audio: BackgroundAudio<'a>) -> Self {
        tracing::info!(
            images = images.len(),
            theme = theme.map_or("default", |t| t.name()),
            "starting slideshow"
        );
        let mut viewer = Viewer::new(images.len(), theme);
        viewer.start();
        Self {
            viewer,
            images,
            loader: SlideLoader::new("slide-loader"),
            look: presentation(theme).look,
            slide: None,
            audio,
            swipe: Swipe::default(),
        }
    }

    fn apply_effects(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        for effect in self.viewer.take_effects() {
            match effect {
                Effect::Show(index) => {
                    self.slide = None;
                    if let Some(raw) = self.images.get(index) {
                        self.loader.request(index, Arc::clone(raw), self.look.filter);
                    }
                }
                Effect::Exit(direction) => {
                    if let Some(slide) = &mut self.slide {
                        slide.start_exit(direction);
                    }
                }
                Effect::ResumeAudio => self.audio.resume(),
                Effect::PauseAudio => self.audio.pause(),
            }
        }

        let Some((index, result)) = self.loader.poll() else {
            return;
        };
        match result.and_then(|pixels| upload(rl, thread, &pixels)) {
            Ok(texture) => {
                if index == self.viewer.index() {
                    self.slide = Some(Slide::new(texture, self.look));
                }
                self.viewer.slide_loaded(index);
            }
            Err(e) => self.viewer.slide_failed(index, e.to_string()),
        }
    }

    fn press(&mut self, rl: &mut RaylibHandle, control: Control) {
        match control {
            Control::Prev => self.viewer.prev_pressed(),
            Control::Next => self.viewer.next_pressed(),
            Control::Toggle => self.viewer.toggle_playback(),
            Control::Fullscreen => rl.toggle_fullscreen(),
        }
    }
}

impl Screen for ViewerScreen<'_> {
    fn update(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, dt: f32) -> Switch {
        self.audio.update();

        if rl.is_key_pressed(KeyboardKey::KEY_ESCAPE) {
            self.audio.pause();
            return Switch::BackToIntake;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
            self.press(rl, Control::Next);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
            self.press(rl, Control::Prev);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            self.press(rl, Control::Toggle);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_F) {
            self.press(rl, Control::Fullscreen);
        }

        let sw = rl.get_screen_width() as f32;
        let sh = rl.get_screen_height() as f32;
        let mouse = rl.get_mouse_position();
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            match hit(&control_rects(sw, sh), mouse) {
                Some(i) => self.press(rl, CONTROLS[i]),
                None if stage(sw, sh).check_collision_point_rec(mouse) => self.swipe.begin(mouse.x),
                None => {}
            }
        }
        if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
            if let Some(gesture) = self.swipe.end(mouse.x) {
                self.viewer.swiped(gesture);
            }
        }

        self.viewer.tick(Duration::from_secs_f32(dt));
        self.apply_effects(rl, thread);

        if let Some(slide) = &mut self.slide {
            slide.update(dt);
        }
        Switch::Stay
    }

    fn draw(&self, d: &mut RaylibDrawHandle) {
        let sw = d.get_screen_width() as f32;
        let sh = d.get_screen_height() as f32;
        let area = stage(sw, sh);

        match (self.viewer.message(), &self.slide) {
            (Some(message), _) => draw_message(d, area, message, 24),
            (None, Some(slide)) => slide.draw(d, area),
            (None, None) => {}
        }

        let counter = self.viewer.counter();
        if !counter.is_empty() {
            d.draw_text(&counter, (sw - 110.0) as i32, 4, 18, TEXT_COLOR);
        }

        let track = Rectangle::new(0.0, sh - BAR_HEIGHT - PROGRESS_HEIGHT, sw, PROGRESS_HEIGHT);
        d.draw_rectangle_rec(track, Color::new(50, 50, 50, 255));
        let filled = Rectangle::new(track.x, track.y, track.width * self.viewer.progress() / 100.0, track.height);
        let color = if self.viewer.state() == PlaybackState::Paused { Color::YELLOW } else { ACCENT_COLOR };
        d.draw_rectangle_rec(filled, color);

        let mouse = d.get_mouse_position();
        for (control, rect) in CONTROLS.iter().zip(control_rects(sw, sh)) {
            let label = match control {
                Control::Prev => "< Prev",
                Control::Toggle if self.viewer.is_playing() => "Pause",
                Control::Toggle => "Play",
                Control::Next => "Next >",
                Control::Fullscreen => "Fullscreen",
            };
            draw_button(d, rect, label, rect.check_collision_point_rec(mouse));
        }
    }
}

use std::path::PathBuf;
use std::sync::Arc;
use raylib::prelude::*;

use crate::constants::*;
use crate::intake::{Intake, PreviewPane};
use crate::loader::SlideLoader;
use crate::screens::preview::PreviewSurface;
use crate::screens::{ACCENT_COLOR, PANEL_COLOR, Screen, Switch, TEXT_COLOR, draw_message, hit, strip_layout};
use crate::slide::fit_scale;
use crate::texture_loader::{RawImage, expand_inputs, upload};
use crate::theme::Theme;

/// What to do once the first batch of files has been read.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoStart {
    pub play: bool,
    pub preview: bool,
}

pub struct IntakeScreen {
    intake: Intake<Texture2D>,
    theme: Option<Theme>,
    song: Option<PathBuf>,
    live_loader: SlideLoader,
    live_requested: Option<usize>,
    live: Option<(usize, Texture2D)>,
    live_failed: bool,
    popup: Option<PreviewSurface>,
    auto: AutoStart,
}

impl IntakeScreen {
    pub fn new(files: Vec<PathBuf>, theme: Option<Theme>, song: Option<PathBuf>, auto: AutoStart) -> Self {
        let mut screen = Self {
            intake: Intake::new(),
            theme,
            song,
            live_loader: SlideLoader::new("live-preview"),
            live_requested: None,
            live: None,
            live_failed: false,
            popup: None,
            auto,
        };
        if !files.is_empty() {
            screen.submit(files);
        }
        screen
    }

    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }

    pub fn song(&self) -> Option<&std::path::Path> {
        self.song.as_deref()
    }

    pub fn images(&self) -> Vec<Arc<RawImage>> {
        self.intake.images()
    }

    fn submit(&mut self, inputs: Vec<PathBuf>) {
        let files = expand_inputs(&inputs);
        self.live = None;
        self.live_requested = None;
        self.live_failed = false;
        self.intake.submit(files);
    }

    fn strip_rects(&self, screen_height: f32) -> Vec<Rectangle> {
        let widths: Vec<f32> = self
            .intake
            .entries()
            .iter()
            .map(|e| {
                let w = e.thumb.width() as f32;
                let h = e.thumb.height() as f32;
                if h > 0.0 { w * THUMB_HEIGHT / h } else { THUMB_HEIGHT }
            })
            .collect();
        strip_layout(&widths, THUMB_GAP, screen_height - THUMB_HEIGHT - THUMB_GAP, THUMB_HEIGHT, THUMB_GAP)
    }

    fn sync_live(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        let PreviewPane::Showing(wanted) = self.intake.pane() else {
            self.live = None;
            self.live_requested = None;
            return;
        };
        if self.live_requested != Some(wanted) {
            if let Some(entry) = self.intake.previewed() {
                self.live_loader.request(wanted, Arc::clone(&entry.raw), &[]);
                self.live_requested = Some(wanted);
                self.live_failed = false;
            }
        }
        if let Some((index, result)) = self.live_loader.poll() {
            match result.and_then(|pixels| upload(rl, thread, &pixels)) {
                Ok(texture) => self.live = Some((index, texture)),
                Err(e) => {
                    tracing::warn!("live preview: {}", e);
                    self.live = None;
                    self.live_failed = true;
                }
            }
        }
    }

    fn open_popup(&mut self) {
        self.popup = Some(PreviewSurface::open(self.intake.images(), self.theme, self.song.as_deref()));
    }

    fn close_popup(&mut self) {
        if let Some(popup) = &mut self.popup {
            popup.close();
        }
        self.popup = None;
    }
}

impl Screen for IntakeScreen {
    fn update(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, dt: f32) -> Switch {
        if rl.is_file_dropped() {
            let dropped = rl.load_dropped_files();
            let files: Vec<PathBuf> = dropped.paths().iter().map(PathBuf::from).collect();
            tracing::info!("{} file(s) dropped", files.len());
            self.close_popup();
            self.submit(files);
        }

        let was_settled = self.intake.is_settled();
        self.intake.poll(|pixels| upload(rl, thread, pixels));
        self.sync_live(rl, thread);

        if self.intake.is_settled() && !was_settled && self.intake.failed() > 0 {
            tracing::warn!("{} file(s) could not be read", self.intake.failed());
        }

        if self.intake.is_settled() {
            if std::mem::take(&mut self.auto.preview) {
                self.open_popup();
            }
            if std::mem::take(&mut self.auto.play) {
                self.close_popup();
                return Switch::StartViewer;
            }
        }

        if let Some(popup) = &mut self.popup {
            popup.update(rl, thread, dt);
            if rl.is_key_pressed(KeyboardKey::KEY_ESCAPE) {
                self.close_popup();
            }
            return Switch::Stay;
        }

        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            let rects = self.strip_rects(rl.get_screen_height() as f32);
            if let Some(position) = hit(&rects, rl.get_mouse_position()) {
                self.intake.select(position);
            }
        }

        if rl.is_key_pressed(KeyboardKey::KEY_T) {
            let theme = Theme::cycle(self.theme);
            tracing::info!("theme: {}", theme);
            self.theme = Some(theme);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_P) {
            self.open_popup();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_ENTER) {
            return Switch::StartViewer;
        }
        Switch::Stay
    }

    fn draw(&self, d: &mut RaylibDrawHandle) {
        let sw = d.get_screen_width() as f32;
        let sh = d.get_screen_height() as f32;

        let theme = self.theme.map_or("default", |t| t.name());
        d.draw_text(
            &format!("Drop images here  |  Enter: play  P: preview  T: theme ({theme})"),
            12,
            10,
            18,
            TEXT_COLOR,
        );

        let pane = Rectangle::new(12.0, 40.0, sw - 24.0, sh - THUMB_HEIGHT - 3.0 * THUMB_GAP - 40.0);
        d.draw_rectangle_rec(pane, PANEL_COLOR);
        match (self.intake.pane(), &self.live) {
            (PreviewPane::Empty, _) => draw_message(d, pane, EMPTY_INTAKE, 22),
            (PreviewPane::Showing(wanted), Some((index, texture))) if wanted == *index => {
                let w = texture.width() as f32;
                let h = texture.height() as f32;
                let s = fit_scale(w, h, pane.width, pane.height);
                d.draw_texture_pro(
                    texture,
                    Rectangle::new(0.0, 0.0, w, h),
                    Rectangle::new(pane.x + (pane.width - w * s) * 0.5, pane.y + (pane.height - h * s) * 0.5, w * s, h * s),
                    Vector2::new(0.0, 0.0),
                    0.0,
                    Color::WHITE,
                );
            }
            (PreviewPane::Showing(_), _) if self.live_failed => draw_message(d, pane, LOAD_FAILED, 22),
            _ => draw_message(d, pane, "Preview area", 22),
        }

        let rects = self.strip_rects(sh);
        let selected = match self.intake.pane() {
            PreviewPane::Showing(index) => Some(index),
            _ => None,
        };
        for (entry, rect) in self.intake.entries().iter().zip(&rects) {
            d.draw_texture_pro(
                &entry.thumb,
                Rectangle::new(0.0, 0.0, entry.thumb.width() as f32, entry.thumb.height() as f32),
                *rect,
                Vector2::new(0.0, 0.0),
                0.0,
                Color::WHITE,
            );
            if selected == Some(entry.index) {
                d.draw_rectangle_lines_ex(*rect, 2.0, ACCENT_COLOR);
            }
        }

        if let Some(popup) = &self.popup {
            popup.draw(d, Rectangle::new(0.0, 0.0, sw, sh));
        }
    }
}

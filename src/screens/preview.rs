use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use raylib::prelude::*;

use crate::constants::{EMPTY_VIEWER, LOAD_FAILED};
use crate::loader::SlideLoader;
use crate::preview::Preview;
use crate::screens::draw_message;
use crate::slide::{Fade, fit_scale};
use crate::texture_loader::{RawImage, upload};
use crate::theme::Theme;

/// Popup surface drawn over the intake screen.
pub struct PreviewSurface {
    preview: Preview,
    images: Vec<Arc<RawImage>>,
    loader: SlideLoader,
    texture: Option<Texture2D>,
    failed: bool,
    fade: Fade,
}

impl PreviewSurface {
    pub fn open(images: Vec<Arc<RawImage>>, theme: Option<Theme>, song: Option<&Path>) -> Self {
        let preview = Preview::open(images.len(), theme, song);
        let mut surface = Self {
            preview,
            images,
            loader: SlideLoader::new("preview-loader"),
            texture: None,
            failed: false,
            fade: Fade::visible(),
        };
        surface.request(0);
        surface
    }

    pub fn close(&mut self) {
        self.preview.close();
    }

    fn request(&mut self, index: usize) {
        if let Some(raw) = self.images.get(index) {
            self.texture = None;
            self.failed = false;
            self.loader.request(index, Arc::clone(raw), &[]);
        }
    }

    pub fn update(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, dt: f32) {
        if let Some(index) = self.preview.tick(Duration::from_secs_f32(dt)) {
            self.request(index);
        }
        if let Some((_, result)) = self.loader.poll() {
            match result.and_then(|pixels| upload(rl, thread, &pixels)) {
                Ok(texture) => self.texture = Some(texture),
                Err(e) => {
                    tracing::warn!("preview: {}", e);
                    self.failed = true;
                }
            }
        }
        self.fade.set_visible(self.preview.is_visible());
        self.fade.update(dt);
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle, screen: Rectangle) {
        d.draw_rectangle_rec(screen, Color::new(0, 0, 0, 160));

        // 900x600 window, shrunk to fit
        let scale = fit_scale(900.0, 600.0, screen.width * 0.9, screen.height * 0.9);
        let panel = Rectangle::new(
            screen.x + (screen.width - 900.0 * scale) * 0.5,
            screen.y + (screen.height - 600.0 * scale) * 0.5,
            900.0 * scale,
            600.0 * scale,
        );
        d.draw_rectangle_rec(panel, Color::BLACK);
        d.draw_rectangle_lines_ex(panel, 1.0, Color::new(255, 255, 255, 60));
        d.draw_text("Preview (Esc to close)", panel.x as i32 + 8, panel.y as i32 + 6, 16, Color::GRAY);
        if !self.preview.is_empty() {
            let caption = format!("{} / {}", self.preview.shown() + 1, self.images.len());
            d.draw_text(&caption, (panel.x + panel.width) as i32 - 70, panel.y as i32 + 6, 16, Color::GRAY);
        }

        if self.preview.is_empty() {
            draw_message(d, panel, EMPTY_VIEWER, 20);
            return;
        }
        let Some(texture) = &self.texture else {
            if self.failed {
                draw_message(d, panel, LOAD_FAILED, 20);
            }
            return;
        };

        let tex_width = texture.width() as f32;
        let tex_height = texture.height() as f32;
        let s = fit_scale(tex_width, tex_height, panel.width * 0.9, panel.height * 0.9);
        let dest = Rectangle::new(
            panel.x + (panel.width - tex_width * s) * 0.5,
            panel.y + (panel.height - tex_height * s) * 0.5,
            tex_width * s,
            tex_height * s,
        );
        d.draw_texture_pro(
            texture,
            Rectangle::new(0.0, 0.0, tex_width, tex_height),
            dest,
            Vector2::new(0.0, 0.0),
            0.0,
            Color::new(255, 255, 255, (self.fade.value() * 255.0) as u8),
        );
    }
}

//! Window screens. Each one owns its textures and turns input plus frame
//! time into state changes, then draws itself.

use raylib::prelude::*;

pub mod intake;
pub mod preview;
pub mod viewer;

pub use intake::IntakeScreen;
pub use viewer::ViewerScreen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    Stay,
    StartViewer,
    BackToIntake,
}

pub trait Screen {
    fn update(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, dt: f32) -> Switch;
    fn draw(&self, d: &mut RaylibDrawHandle);
}

pub const TEXT_COLOR: Color = Color::new(255, 255, 255, 128);
pub const PANEL_COLOR: Color = Color::new(255, 255, 255, 13);
pub const ACCENT_COLOR: Color = Color::new(100, 200, 100, 255);

/// Draws `text` centred in `area`.
pub fn draw_message(d: &mut RaylibDrawHandle, area: Rectangle, text: &str, size: i32) {
    let width = measure_text(text, size);
    d.draw_text(
        text,
        (area.x + (area.width - width as f32) * 0.5) as i32,
        (area.y + (area.height - size as f32) * 0.5) as i32,
        size,
        TEXT_COLOR,
    );
}

pub fn draw_button(d: &mut RaylibDrawHandle, rect: Rectangle, label: &str, hovered: bool) {
    let fill = if hovered { Color::new(255, 255, 255, 40) } else { PANEL_COLOR };
    d.draw_rectangle_rec(rect, fill);
    d.draw_rectangle_lines_ex(rect, 1.0, Color::new(255, 255, 255, 60));
    draw_message(d, rect, label, 18);
}

/// Lays out boxes of the given widths left to right in one row.
pub fn strip_layout(widths: &[f32], x: f32, y: f32, height: f32, gap: f32) -> Vec<Rectangle> {
    let mut cursor = x;
    widths
        .iter()
        .map(|w| {
            let rect = Rectangle::new(cursor, y, *w, height);
            cursor += w + gap;
            rect
        })
        .collect()
}

/// Index of the first rectangle containing `point`.
pub fn hit(rects: &[Rectangle], point: Vector2) -> Option<usize> {
    rects.iter().position(|r| r.check_collision_point_rec(point))
}

use raylib::prelude::*;
use crate::constants::*;
use crate::theme::Look;
use crate::viewer::Direction;

/// Scale that fits `tex` inside `area` without upscaling.
pub fn fit_scale(tex_width: f32, tex_height: f32, area_width: f32, area_height: f32) -> f32 {
    if tex_width <= 0.0 || tex_height <= 0.0 {
        return 0.0;
    }
    (area_width / tex_width).min(area_height / tex_height).min(1.0)
}

pub struct Slide {
    image: Texture2D,
    look: Look,

    opacity: f32,
    scale: f32,
    offset: Vector2,

    animation_timer: f32,
    animation_duration: f32,
    is_animating: bool,

    tween_opacity: ease::Tween,
    tween_scale: ease::Tween,
    tween_offset_x: ease::Tween,
    tween_offset_y: ease::Tween,
}

impl Slide {
    /// Starts the entrance animation: fades in, grows from 95% and rises into place.
    pub fn new(image: Texture2D, look: Look) -> Self {
        Self {
            image,
            look,

            opacity: 0.0,
            scale: 0.95,
            offset: Vector2::new(0.0, SLIDE_SHIFT),

            animation_timer: 0.0,
            animation_duration: ENTRANCE_DURATION,
            is_animating: true,

            tween_opacity:  ease::Tween::new(ease::cubic_out, 0.0, 1.0, ENTRANCE_DURATION),
            tween_scale:    ease::Tween::new(ease::cubic_out, 0.95, 1.0, ENTRANCE_DURATION),
            tween_offset_x: ease::Tween::new(ease::linear_none, 0.0, 0.0, ENTRANCE_DURATION),
            tween_offset_y: ease::Tween::new(ease::cubic_out, SLIDE_SHIFT, 0.0, ENTRANCE_DURATION),
        }
    }

    /// Fades out and slides sideways, against the direction of travel.
    pub fn start_exit(&mut self, direction: Direction) {
        let shift = match direction {
            Direction::Forward => -SLIDE_SHIFT,
            Direction::Backward => SLIDE_SHIFT,
        };
        self.tween_opacity  = ease::Tween::new(ease::cubic_out, self.opacity, 0.0, EXIT_DURATION);
        self.tween_scale    = ease::Tween::new(ease::cubic_out, self.scale, 0.95, EXIT_DURATION);
        self.tween_offset_x = ease::Tween::new(ease::cubic_out, self.offset.x, shift, EXIT_DURATION);
        self.tween_offset_y = ease::Tween::new(ease::cubic_out, self.offset.y, 0.0, EXIT_DURATION);
        self.animation_timer = 0.0;
        self.animation_duration = EXIT_DURATION;
        self.is_animating = true;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.is_animating {
            return;
        }

        self.opacity  = self.tween_opacity.apply(dt);
        self.scale    = self.tween_scale.apply(dt);
        self.offset.x = self.tween_offset_x.apply(dt);
        self.offset.y = self.tween_offset_y.apply(dt);

        self.animation_timer += dt;
        if self.animation_timer >= self.animation_duration {
            self.is_animating = false;
        }
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle, area: Rectangle) {
        let tex_width = self.image.width() as f32;
        let tex_height = self.image.height() as f32;

        let scale = fit_scale(tex_width, tex_height, area.width, area.height) * self.look.scale * self.scale;
        let scaled_width = tex_width * scale;
        let scaled_height = tex_height * scale;

        let center = Vector2::new(
            area.x + area.width * 0.5 + self.offset.x,
            area.y + area.height * 0.5 + self.offset.y,
        );
        let dest = Rectangle::new(
            center.x - scaled_width * 0.5,
            center.y - scaled_height * 0.5,
            scaled_width,
            scaled_height,
        );

        let [r, g, b, a] = self.look.shadow;
        let shadow_alpha = (a as f32 * self.opacity) as u8;
        d.draw_rectangle_rec(
            Rectangle::new(dest.x - 6.0, dest.y + 4.0, dest.width + 12.0, dest.height + 18.0),
            Color::new(r, g, b, shadow_alpha),
        );

        d.draw_texture_pro(
            &self.image,
            Rectangle::new(0.0, 0.0, tex_width, tex_height),
            dest,
            Vector2::new(0.0, 0.0),
            0.0,
            Color::new(255, 255, 255, (self.opacity.clamp(0.0, 1.0) * 255.0) as u8),
        );
    }
}

/// Linear opacity transition toward a target, used by the popup preview.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    value: f32,
    target: f32,
}

impl Fade {
    pub fn visible() -> Self {
        Self { value: 1.0, target: 1.0 }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.target = if visible { 1.0 } else { 0.0 };
    }

    pub fn update(&mut self, dt: f32) -> f32 {
        let step = dt / FADE_DURATION;
        if self.value < self.target {
            self.value = (self.value + step).min(self.target);
        } else {
            self.value = (self.value - step).max(self.target);
        }
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

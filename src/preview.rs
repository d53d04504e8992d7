//! Popup preview surface: cycles the image list on the theme's preview
//! interval with a fade between images.

use std::path::Path;
use std::time::Duration;

use crate::constants::PREVIEW_FADE;
use crate::theme::{Theme, presentation};
use crate::timer::{Delay, Timer};

pub struct Preview {
    len: usize,
    shown: usize,
    next: usize,
    visible: bool,
    open: bool,
    cycle: Timer,
    fade: Delay,
}

impl Preview {
    /// Opens the surface on the first image. The song is accepted for parity
    /// with the viewer but the preview plays no audio.
    pub fn open(len: usize, theme: Option<Theme>, _song: Option<&Path>) -> Self {
        let mut cycle = Timer::new(presentation(theme).preview_interval);
        if len > 0 {
            cycle.restart();
        }
        tracing::info!(images = len, interval_ms = cycle.interval().as_millis() as u64, "preview opened");
        Self {
            len,
            shown: 0,
            next: 0,
            visible: true,
            open: true,
            cycle,
            fade: Delay::default(),
        }
    }

    /// Cancels the cycle timer and any pending swap.
    pub fn close(&mut self) {
        self.cycle.cancel();
        self.fade.cancel();
        self.open = false;
        tracing::debug!("preview closed");
    }

    /// Returns the newly displayed index when a swap lands during `dt`.
    pub fn tick(&mut self, dt: Duration) -> Option<usize> {
        if !self.open {
            return None;
        }
        let mut swapped = None;
        if self.fade.tick(dt) {
            self.shown = self.next;
            self.visible = true;
            swapped = Some(self.shown);
        }
        if self.cycle.tick(dt) > 0 {
            self.next = (self.next + 1) % self.len;
            self.visible = false;
            self.fade.schedule(PREVIEW_FADE);
        }
        swapped
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the image currently on the surface.
    pub fn shown(&self) -> usize {
        self.shown
    }

    /// Target opacity: false while fading out before a swap.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

//! Theme presets: slide timing and the visual treatment applied to slides.
//!
//! A theme tag that is not one of the known presets is carried as `None` and
//! gets the default treatment.

use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Vibrant,
    Retro,
    Minimal,
    Cinematic,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Vibrant, Theme::Retro, Theme::Minimal, Theme::Cinematic];

    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(tag: &str) -> Option<Theme> {
        let tag = tag.trim();
        Theme::ALL
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(tag))
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Vibrant => "vibrant",
            Theme::Retro => "retro",
            Theme::Minimal => "minimal",
            Theme::Cinematic => "cinematic",
        }
    }

    /// Next preset in display order, wrapping around. `None` starts at the first.
    pub fn cycle(current: Option<Theme>) -> Theme {
        match current {
            Some(theme) => {
                let pos = Theme::ALL.iter().position(|t| *t == theme).unwrap_or(0);
                Theme::ALL[(pos + 1) % Theme::ALL.len()]
            }
            None => Theme::ALL[0],
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One step of a CSS-style colour filter. Amounts use CSS semantics
/// (1.0 is the identity for brightness, contrast and saturate; 0.0 for sepia).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    Sepia(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Look {
    pub filter: &'static [FilterOp],
    pub scale: f32,
    /// Drop shadow colour as RGBA.
    pub shadow: [u8; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub interval: Duration,
    pub preview_interval: Duration,
    pub look: Look,
}

const fn alpha(a: f32) -> u8 {
    (a * 255.0) as u8
}

const VIBRANT: Presentation = Presentation {
    interval: Duration::from_millis(2500),
    preview_interval: Duration::from_millis(2200),
    look: Look {
        filter: &[FilterOp::Saturate(1.2), FilterOp::Contrast(1.1), FilterOp::Brightness(1.05)],
        scale: 1.02,
        shadow: [255, 0, 150, alpha(0.2)],
    },
};

const RETRO: Presentation = Presentation {
    interval: Duration::from_millis(3000),
    preview_interval: Duration::from_millis(3000),
    look: Look {
        filter: &[
            FilterOp::Sepia(0.15),
            FilterOp::Contrast(0.9),
            FilterOp::Saturate(0.8),
            FilterOp::Brightness(0.95),
        ],
        scale: 1.01,
        shadow: [139, 69, 19, alpha(0.3)],
    },
};

const MINIMAL: Presentation = Presentation {
    interval: Duration::from_millis(3000),
    preview_interval: Duration::from_millis(3000),
    look: Look {
        filter: &[],
        scale: 1.0,
        shadow: [0, 0, 0, alpha(0.2)],
    },
};

const CINEMATIC_LOOK: Look = Look {
    filter: &[FilterOp::Brightness(0.98), FilterOp::Contrast(1.05), FilterOp::Saturate(1.1)],
    scale: 1.01,
    shadow: [0, 0, 0, alpha(0.4)],
};

const CINEMATIC: Presentation = Presentation {
    interval: Duration::from_millis(3500),
    preview_interval: Duration::from_millis(3000),
    look: CINEMATIC_LOOK,
};

// Unrecognized tags: standard timing, cinematic styling.
static FALLBACK: Presentation = Presentation {
    interval: Duration::from_millis(3000),
    preview_interval: Duration::from_millis(3000),
    look: CINEMATIC_LOOK,
};

static PRESETS: [(Theme, Presentation); 4] = [
    (Theme::Vibrant, VIBRANT),
    (Theme::Retro, RETRO),
    (Theme::Minimal, MINIMAL),
    (Theme::Cinematic, CINEMATIC),
];

pub fn presentation(theme: Option<Theme>) -> &'static Presentation {
    theme
        .and_then(|theme| PRESETS.iter().find(|(t, _)| *t == theme))
        .map(|(_, p)| p)
        .unwrap_or(&FALLBACK)
}

/// Applies `ops` in order to tightly packed RGBA8 pixels. Alpha is untouched.
pub fn apply_filter(ops: &[FilterOp], rgba: &mut [u8]) {
    if ops.is_empty() {
        return;
    }
    for px in rgba.chunks_exact_mut(4) {
        let mut c = [
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
        ];
        for op in ops {
            c = apply_op(*op, c);
        }
        for (dst, v) in px.iter_mut().zip(c) {
            *dst = (v * 255.0).round() as u8;
        }
    }
}

fn apply_op(op: FilterOp, [r, g, b]: [f32; 3]) -> [f32; 3] {
    let out = match op {
        FilterOp::Brightness(k) => [r * k, g * k, b * k],
        FilterOp::Contrast(k) => [
            (r - 0.5) * k + 0.5,
            (g - 0.5) * k + 0.5,
            (b - 0.5) * k + 0.5,
        ],
        FilterOp::Saturate(s) => [
            (0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b,
            (0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b,
            (0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b,
        ],
        FilterOp::Sepia(amount) => {
            let k = 1.0 - amount.clamp(0.0, 1.0);
            [
                (0.393 + 0.607 * k) * r + (0.769 - 0.769 * k) * g + (0.189 - 0.189 * k) * b,
                (0.349 - 0.349 * k) * r + (0.686 + 0.314 * k) * g + (0.168 - 0.168 * k) * b,
                (0.272 - 0.272 * k) * r + (0.534 - 0.534 * k) * g + (0.131 + 0.869 * k) * b,
            ]
        }
    };
    out.map(|v| v.clamp(0.0, 1.0))
}

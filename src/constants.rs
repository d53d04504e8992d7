use std::time::Duration;

pub const WINDOW_WIDTH: i32 = 960;            // Initial window width
pub const WINDOW_HEIGHT: i32 = 540;           // Initial window height
pub const FPS: u32 = 60;                      // Frames per second

pub const SWIPE_THRESHOLD: f32 = 30.0;        // Horizontal travel needed for a swipe (pixels)

pub const PROGRESS_TICK: Duration = Duration::from_millis(50);     // Progress bar refresh
pub const EXIT_DELAY: Duration = Duration::from_millis(300);       // Exit animation before swapping slides
pub const PREVIEW_FADE: Duration = Duration::from_millis(500);     // Popup preview fade-out before swap

pub const ENTRANCE_DURATION: f32 = 1.2;       // Slide entrance animation (seconds)
pub const EXIT_DURATION: f32 = 0.3;           // Slide exit animation (seconds)
pub const FADE_DURATION: f32 = 0.8;           // Popup preview opacity transition (seconds)
pub const SLIDE_SHIFT: f32 = 20.0;            // Entrance/exit offset (pixels)

pub const THUMB_HEIGHT: f32 = 80.0;           // Thumbnail strip height (pixels)
pub const THUMB_GAP: f32 = 8.0;               // Space between thumbnails (pixels)
pub const THUMB_BOUNDS: (u32, u32) = (320, 80);     // Largest decoded thumbnail (pixels)
pub const SLIDE_BOUNDS: (u32, u32) = (4096, 4096);  // Largest decoded slide (pixels)

pub const MUSIC_VOLUME: f32 = 0.9;

pub const EMPTY_INTAKE: &str = "No images yet";
pub const EMPTY_VIEWER: &str = "No images to display";
pub const LOAD_FAILED: &str = "Failed to load image";

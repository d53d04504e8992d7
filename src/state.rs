#[derive(Debug, PartialEq, Clone, Copy)]
pub enum PlaybackState {
    Idle,    // Nothing shown yet
    Playing, // Slide timer armed, auto-advancing
    Paused,  // Timers stopped, index held
}

#[derive(Debug, PartialEq, Clone)]
pub enum SlideStatus {
    Empty,          // No images to show
    Loading,        // Current slide requested, not yet on screen
    Shown,          // Current slide on screen
    Failed(String), // Current slide could not be loaded
}

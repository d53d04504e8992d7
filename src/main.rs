use std::path::PathBuf;
use clap::Parser;
use raylib::prelude::*;

mod audio;
mod constants;
mod error;
mod gesture;
mod intake;
mod loader;
mod logging;
mod preview;
mod screens;
mod slide;
mod state;
mod texture_loader;
mod theme;
mod timer;
mod viewer;

use crate::audio::BackgroundAudio;
use crate::constants::*;
use crate::screens::intake::AutoStart;
use crate::screens::{IntakeScreen, Screen, Switch, ViewerScreen};
use crate::theme::Theme;

/// Themed photo slideshow with drag-and-drop intake
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image files or directories to load
    paths: Vec<PathBuf>,

    /// Theme preset: vibrant, retro, minimal or cinematic
    #[arg(short, long, default_value = "cinematic")]
    theme: String,

    /// Background music for the slideshow (mp3, ogg, wav, m4a)
    #[arg(short, long)]
    song: Option<PathBuf>,

    /// Start the slideshow once the images are read
    #[arg(long, default_value_t = false)]
    play: bool,

    /// Open the popup preview once the images are read
    #[arg(long, default_value_t = false)]
    preview: bool,

    /// Log filter, e.g. "debug" (defaults to RUST_LOG, then "info")
    #[arg(long)]
    log: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(args.log.as_deref())?;

    let theme = Theme::parse(&args.theme);
    if theme.is_none() {
        tracing::warn!("unknown theme {:?}, using the default look", args.theme);
    }

    let (mut rl, thread) = raylib::init()
        .size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .title("photoreel")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    rl.set_exit_key(None);

    let audio_device = match RaylibAudio::init_audio_device() {
        Ok(device) => Some(device),
        Err(e) => {
            tracing::warn!("audio device unavailable: {:?}", e);
            None
        }
    };

    let auto = AutoStart { play: args.play, preview: args.preview };
    let mut intake = IntakeScreen::new(args.paths, theme, args.song, auto);
    let mut viewer: Option<ViewerScreen> = None;

    // --- Main Loop ---
    while !rl.window_should_close() {
        let dt = rl.get_frame_time();

        let screen: &mut dyn Screen = match viewer.as_mut() {
            Some(v) => v,
            None => &mut intake,
        };
        match screen.update(&mut rl, &thread, dt) {
            Switch::Stay => {}
            Switch::StartViewer => {
                let audio = BackgroundAudio::load(audio_device.as_ref(), intake.song());
                viewer = Some(ViewerScreen::new(intake.images(), intake.theme(), audio));
            }
            Switch::BackToIntake => viewer = None,
        }

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        match &viewer {
            Some(v) => v.draw(&mut d),
            None => intake.draw(&mut d),
        }
    }

    Ok(())
}

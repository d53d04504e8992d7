use std::path::Path;
use raylib::prelude::*;

use crate::constants::MUSIC_VOLUME;
use crate::error::LoadError;

const AUDIO_EXTENSIONS: [&str; 4] = ["mp3", "ogg", "wav", "m4a"];

pub fn is_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Background music for the viewer. Every failure degrades to silence.
pub struct BackgroundAudio<'a> {
    music: Option<Music<'a>>,
    started: bool,
}

impl<'a> BackgroundAudio<'a> {
    pub fn silent() -> Self {
        Self { music: None, started: false }
    }

    pub fn load(device: Option<&'a RaylibAudio>, song: Option<&Path>) -> Self {
        let Some(song) = song else {
            return Self::silent();
        };
        match Self::open(device, song) {
            Ok(music) => {
                tracing::info!("background audio: {}", song.display());
                Self { music: Some(music), started: false }
            }
            Err(e) => {
                tracing::warn!("playing without sound: {}", e);
                Self::silent()
            }
        }
    }

    fn open(device: Option<&'a RaylibAudio>, song: &Path) -> Result<Music<'a>, LoadError> {
        if !is_audio(song) {
            return Err(LoadError::Unsupported(song.to_path_buf()));
        }
        let device = device.ok_or_else(|| LoadError::Audio("no audio device".to_string()))?;
        let path = song
            .to_str()
            .ok_or_else(|| LoadError::Audio(format!("non UTF-8 path {:?}", song)))?;
        let mut music = device
            .new_music(path)
            .map_err(|e| LoadError::Audio(format!("{:?}", e)))?;
        music.set_volume(MUSIC_VOLUME);
        Ok(music)
    }

    pub fn resume(&mut self) {
        if let Some(music) = &mut self.music {
            if self.started {
                music.resume_stream();
            } else {
                music.play_stream();
                self.started = true;
            }
        }
    }

    pub fn pause(&mut self) {
        if let Some(music) = &mut self.music {
            music.pause_stream();
        }
    }

    /// Refills the stream buffers; call once per frame.
    pub fn update(&mut self) {
        if let Some(music) = &mut self.music {
            music.update_stream();
        }
    }
}

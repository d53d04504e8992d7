use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use ::image::imageops::FilterType;
use ::image::{DynamicImage, ImageReader};
use raylib::prelude::*;
use exif::{Reader, Tag, Value, In};

use crate::error::LoadError;
use crate::theme::{FilterOp, apply_filter};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Encoded image bytes plus what is needed to decode them upright.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub orientation: u16,
}

impl RawImage {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}

pub fn is_image(path: &Path) -> bool {
    IMAGE_EXTENSIONS.contains(&extension_of(path).as_str())
}

// --- Helper: Load and Sort Image Paths ---
pub fn load_sorted_image_paths(dir_path: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut paths = Vec::new();
    let entries = fs::read_dir(dir_path).map_err(|e| LoadError::io(dir_path, e))?;

    for entry in entries {
        let path = entry.map_err(|e| LoadError::io(dir_path, e))?.path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Expands directories to their image files; plain files pass through
/// untouched so intake can report on them.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            match load_sorted_image_paths(input) {
                Ok(paths) => files.extend(paths),
                Err(e) => tracing::warn!("skipping {:?}: {}", input, e),
            }
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// EXIF orientation tag, 1 (upright) when absent or unreadable.
pub fn exif_orientation(bytes: &[u8]) -> u16 {
    match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| match &field.value {
                Value::Short(values) => values.first().copied(),
                _ => None,
            })
            .unwrap_or(1),
        Err(e) => {
            tracing::debug!("no EXIF orientation: {}", e);
            1
        }
    }
}

/// Reads the file and its orientation. Runs on intake worker threads.
pub fn read_raw(path: &Path) -> Result<RawImage, LoadError> {
    if !is_image(path) {
        return Err(LoadError::Unsupported(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|e| LoadError::io(path, e))?;
    let extension = extension_of(path);

    // EXIF is only reliable for JPEG
    let orientation = if extension == "jpg" || extension == "jpeg" {
        exif_orientation(&bytes)
    } else {
        1
    };

    Ok(RawImage {
        path: path.to_path_buf(),
        bytes,
        orientation,
    })
}

/// Decoded RGBA8 pixels, ready for upload on the window thread.
#[derive(Debug, Clone)]
pub struct Pixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

// 3 = 180 deg, 6 = 90 deg clockwise, 8 = 90 deg counter-clockwise.
// Mirrored orientations are drawn as stored.
fn orient(image: DynamicImage, orientation: u16) -> DynamicImage {
    match orientation {
        3 => image.rotate180(),
        6 => image.rotate90(),
        8 => image.rotate270(),
        _ => image,
    }
}

// --- Decode, Apply EXIF Rotation, Shrink and Theme Filter ---
/// CPU-only work; safe to run on any thread.
pub fn decode_pixels(raw: &RawImage, filter: &[FilterOp], bounds: (u32, u32)) -> Result<Pixels, LoadError> {
    let decoded = ImageReader::new(Cursor::new(&raw.bytes))
        .with_guessed_format()
        .map_err(|e| LoadError::io(&raw.path, e))?
        .decode()
        .map_err(|e| LoadError::Decode { path: raw.path.clone(), reason: e.to_string() })?;

    let mut image = orient(decoded, raw.orientation);
    let (max_width, max_height) = bounds;
    if image.width() > max_width || image.height() > max_height {
        image = image.resize(max_width, max_height, FilterType::Triangle);
    }

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgba = rgba.into_raw();
    apply_filter(filter, &mut rgba);

    Ok(Pixels { width, height, rgba })
}

/// Copies decoded pixels into a GPU texture. Must run on the window thread.
pub fn upload(rl: &mut RaylibHandle, thread: &RaylibThread, pixels: &Pixels) -> Result<Texture2D, LoadError> {
    let image = Image::gen_image_color(pixels.width as i32, pixels.height as i32, Color::BLANK);
    // SAFETY: gen_image_color allocates width * height RGBA8 pixels, which is
    // exactly the length of `pixels.rgba`.
    let dst = unsafe { std::slice::from_raw_parts_mut(image.data() as *mut u8, pixels.rgba.len()) };
    dst.copy_from_slice(&pixels.rgba);

    rl.load_texture_from_image(thread, &image)
        .map_err(|e| LoadError::Texture(e.to_string()))
}

//! File intake: turns user-supplied files into thumbnails and a live preview.
//!
//! Files are queued on a small worker pool that reads each one and decodes its
//! thumbnail. Results come back through a channel tagged with the intake
//! generation and the file's input index; results from an older generation
//! are dropped, and thumbnails are kept in input order regardless of
//! completion order.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::constants::THUMB_BOUNDS;
use crate::error::LoadError;
use crate::texture_loader::{Pixels, RawImage, decode_pixels, is_image, read_raw};

/// A file read from disk along with its decoded thumbnail.
pub struct Loaded {
    pub raw: RawImage,
    pub thumb: Pixels,
}

/// Worker result for one file.
pub struct Decoded {
    pub generation: u64,
    pub index: usize,
    pub result: Result<Loaded, LoadError>,
}

struct Job {
    generation: u64,
    index: usize,
    path: PathBuf,
}

pub struct Entry<T> {
    pub index: usize,
    pub raw: Arc<RawImage>,
    pub thumb: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPane {
    /// Waiting for the first image.
    Placeholder,
    /// Nothing image-typed was submitted.
    Empty,
    /// Showing the entry with this input index.
    Showing(usize),
}

/// Leaves headroom for the window thread; clamped for big machines.
fn worker_count() -> usize {
    let logical = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    (logical * 3 / 4).clamp(2, 8)
}

fn load_entry(path: &Path) -> Result<Loaded, LoadError> {
    let raw = read_raw(path)?;
    let thumb = decode_pixels(&raw, &[], THUMB_BOUNDS)?;
    Ok(Loaded { raw, thumb })
}

pub struct Intake<T> {
    generation: u64,
    current: Arc<AtomicU64>,
    expected: usize,
    received: usize,
    failed: usize,
    entries: Vec<Entry<T>>,
    pane: PreviewPane,
    picked: bool,
    jobs: Option<Sender<Job>>,
    workers: usize,
    tx: Sender<Decoded>,
    rx: Receiver<Decoded>,
}

impl<T> Default for Intake<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Intake<T> {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            generation: 0,
            current: Arc::new(AtomicU64::new(0)),
            expected: 0,
            received: 0,
            failed: 0,
            entries: Vec::new(),
            pane: PreviewPane::Placeholder,
            picked: false,
            jobs: None,
            workers: 0,
            tx,
            rx,
        }
    }

    /// Clears the strip and queues every image-typed file. Returns how many
    /// files were accepted.
    pub fn submit(&mut self, files: Vec<PathBuf>) -> usize {
        self.reset();

        let accepted: Vec<PathBuf> = files.into_iter().filter(|p| is_image(p)).collect();
        if accepted.is_empty() {
            tracing::info!("no image files in submission");
            self.pane = PreviewPane::Empty;
            return 0;
        }

        tracing::info!(files = accepted.len(), generation = self.generation, "intake started");
        self.expected = accepted.len();
        let jobs = self.job_sender();
        for (index, path) in accepted.into_iter().enumerate() {
            let job = Job { generation: self.generation, index, path };
            if let Err(e) = jobs.send(job) {
                tracing::error!("no intake worker for {:?}", e.0.path);
                self.received += 1;
                self.failed += 1;
            }
        }
        self.expected
    }

    /// Starts the pool on first use. Workers live as long as the intake and
    /// skip jobs whose generation is no longer current.
    fn job_sender(&mut self) -> Sender<Job> {
        if let Some(jobs) = &self.jobs {
            return jobs.clone();
        }

        let (job_tx, job_rx) = unbounded::<Job>();
        let mut started = 0;
        for id in 0..worker_count() {
            let jobs = job_rx.clone();
            let results = self.tx.clone();
            let current = Arc::clone(&self.current);
            let spawned = std::thread::Builder::new()
                .name(format!("intake-{id}"))
                .spawn(move || {
                    for job in jobs.iter() {
                        if job.generation != current.load(Ordering::Relaxed) {
                            continue;
                        }
                        let result = load_entry(&job.path);
                        // The receiver only goes away with the intake itself.
                        let _ = results.send(Decoded { generation: job.generation, index: job.index, result });
                    }
                });
            match spawned {
                Ok(_) => started += 1,
                Err(e) => tracing::error!("failed to spawn intake worker: {}", e),
            }
        }

        tracing::debug!(workers = started, "intake pool started");
        self.workers = started;
        if started > 0 {
            self.jobs = Some(job_tx.clone());
        }
        job_tx
    }

    /// Drains finished reads, building a thumbnail for each success. Returns
    /// the number of thumbnails added.
    pub fn poll<F>(&mut self, mut make_thumb: F) -> usize
    where
        F: FnMut(&Pixels) -> Result<T, LoadError>,
    {
        let mut added = 0;
        while let Ok(decoded) = self.rx.try_recv() {
            if self.accept(decoded, &mut make_thumb) {
                added += 1;
            }
        }
        added
    }

    pub fn accept<F>(&mut self, decoded: Decoded, make_thumb: &mut F) -> bool
    where
        F: FnMut(&Pixels) -> Result<T, LoadError>,
    {
        if decoded.generation != self.generation {
            tracing::debug!(index = decoded.index, "dropping stale intake result");
            return false;
        }
        self.received += 1;

        let thumb = decoded
            .result
            .and_then(|loaded| make_thumb(&loaded.thumb).map(|thumb| (loaded.raw, thumb)));
        let (raw, thumb) = match thumb {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!("skipping file {}: {}", decoded.index, e);
                self.failed += 1;
                return false;
            }
        };

        let index = decoded.index;
        tracing::debug!(index, name = %raw.name(), "thumbnail ready");
        let position = self.entries.partition_point(|e| e.index < index);
        self.entries.insert(position, Entry { index, raw: Arc::new(raw), thumb });

        if index == 0 && !self.picked {
            self.pane = PreviewPane::Showing(0);
        }
        true
    }

    /// Selects the thumbnail at `position` in the strip for the live preview.
    pub fn select(&mut self, position: usize) -> bool {
        match self.entries.get(position) {
            Some(entry) => {
                self.pane = PreviewPane::Showing(entry.index);
                self.picked = true;
                true
            }
            None => false,
        }
    }

    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub fn pane(&self) -> PreviewPane {
        self.pane
    }

    /// Entry shown in the live preview, if any.
    pub fn previewed(&self) -> Option<&Entry<T>> {
        match self.pane {
            PreviewPane::Showing(index) => self.entries.iter().find(|e| e.index == index),
            _ => None,
        }
    }

    /// Every accepted file has reported back.
    pub fn is_settled(&self) -> bool {
        self.received >= self.expected
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Decoded images in input order, for the viewer and preview.
    pub fn images(&self) -> Vec<Arc<RawImage>> {
        self.entries.iter().map(|e| Arc::clone(&e.raw)).collect()
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.current.store(self.generation, Ordering::Relaxed);
        self.expected = 0;
        self.received = 0;
        self.failed = 0;
        self.entries.clear();
        self.pane = PreviewPane::Placeholder;
        self.picked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, Instant};
    use ::image::{Rgb, RgbImage};

    fn loaded(name: &str) -> Loaded {
        Loaded {
            raw: RawImage { path: PathBuf::from(name), bytes: vec![1, 2, 3], orientation: 1 },
            thumb: Pixels { width: 1, height: 1, rgba: vec![0, 0, 0, 255] },
        }
    }

    fn ok(generation: u64, index: usize, name: &str) -> Decoded {
        Decoded { generation, index, result: Ok(loaded(name)) }
    }

    fn thumb(_: &Pixels) -> Result<(), LoadError> {
        Ok(())
    }

    fn names(intake: &Intake<()>) -> Vec<String> {
        intake.entries().iter().map(|e| e.raw.name()).collect()
    }

    fn settle(intake: &mut Intake<()>) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !intake.is_settled() && Instant::now() < deadline {
            intake.poll(thumb);
            std::thread::sleep(Duration::from_millis(5));
        }
        intake.poll(thumb);
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("photoreel-intake-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_sample(path: &Path) {
        RgbImage::from_pixel(4, 3, Rgb([10, 200, 30])).save(path).unwrap();
    }

    #[test]
    fn test_empty_submission() {
        let mut intake: Intake<()> = Intake::new();
        let accepted = intake.submit(vec![PathBuf::from("a.txt"), PathBuf::from("b.pdf")]);
        assert_eq!(accepted, 0);
        assert_eq!(intake.pane(), PreviewPane::Empty);
        assert!(intake.is_settled());
    }

    #[test]
    fn test_out_of_order_results_keep_input_order() {
        let mut intake: Intake<()> = Intake::new();
        intake.generation = 1;
        intake.expected = 3;
        let mut f = thumb;
        intake.accept(ok(1, 2, "c.png"), &mut f);
        assert_eq!(intake.pane(), PreviewPane::Placeholder);
        intake.accept(ok(1, 0, "a.png"), &mut f);
        assert_eq!(intake.pane(), PreviewPane::Showing(0));
        intake.accept(ok(1, 1, "b.png"), &mut f);
        assert_eq!(names(&intake), vec!["a.png", "b.png", "c.png"]);
        assert!(intake.is_settled());
    }

    #[test]
    fn test_stale_results_dropped() {
        let mut intake: Intake<()> = Intake::new();
        intake.generation = 2;
        intake.expected = 1;
        let mut f = thumb;
        assert!(!intake.accept(ok(1, 0, "old.png"), &mut f));
        assert!(intake.entries().is_empty());
        assert!(!intake.is_settled());
        assert!(intake.accept(ok(2, 0, "new.png"), &mut f));
        assert_eq!(names(&intake), vec!["new.png"]);
    }

    #[test]
    fn test_failures_counted_not_listed() {
        let mut intake: Intake<()> = Intake::new();
        intake.generation = 1;
        intake.expected = 2;
        let mut f = thumb;
        let bad = Decoded {
            generation: 1,
            index: 0,
            result: Err(LoadError::Unsupported(PathBuf::from("x.png"))),
        };
        intake.accept(bad, &mut f);
        let mut failing = |_: &Pixels| -> Result<(), LoadError> { Err(LoadError::Texture("no GPU".into())) };
        intake.accept(ok(1, 1, "y.png"), &mut failing);
        assert_eq!(intake.failed(), 2);
        assert!(intake.entries().is_empty());
        assert_eq!(intake.pane(), PreviewPane::Placeholder);
        assert!(intake.is_settled());
    }

    #[test]
    fn test_select_replaces_preview() {
        let mut intake: Intake<()> = Intake::new();
        intake.generation = 1;
        intake.expected = 2;
        let mut f = thumb;
        intake.accept(ok(1, 1, "b.png"), &mut f);
        assert!(intake.select(0));
        assert_eq!(intake.pane(), PreviewPane::Showing(1));
        // The first file landing later does not override a user pick.
        intake.accept(ok(1, 0, "a.png"), &mut f);
        assert_eq!(intake.pane(), PreviewPane::Showing(1));
        assert_eq!(intake.previewed().map(|e| e.raw.name()), Some("b.png".to_string()));
        assert!(!intake.select(5));
    }

    #[test]
    fn test_submit_decodes_files() {
        let dir = scratch_dir("submit");
        let mut files = Vec::new();
        for name in ["one.png", "skip.txt", "two.jpg", "three.webp", "four.bmp"] {
            let path = dir.join(name);
            if name.ends_with(".txt") {
                fs::write(&path, b"notes").unwrap();
            } else {
                write_sample(&path);
            }
            files.push(path);
        }
        files.push(dir.join("broken.png"));
        fs::write(dir.join("broken.png"), b"not a png").unwrap();

        let mut intake: Intake<()> = Intake::new();
        assert_eq!(intake.submit(files), 5);
        settle(&mut intake);
        assert!(intake.is_settled());
        assert_eq!(names(&intake), vec!["one.png", "two.jpg", "three.webp", "four.bmp"]);
        assert_eq!(intake.failed(), 1);
        assert_eq!(intake.pane(), PreviewPane::Showing(0));

        // Resubmitting clears the strip.
        assert_eq!(intake.submit(vec![]), 0);
        assert!(intake.entries().is_empty());
        assert_eq!(intake.pane(), PreviewPane::Empty);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_large_submission_uses_bounded_pool() {
        let dir = scratch_dir("pool");
        let files: Vec<PathBuf> = (0..64)
            .map(|i| {
                let path = dir.join(format!("{i:03}.png"));
                write_sample(&path);
                path
            })
            .collect();

        let mut intake: Intake<()> = Intake::new();
        assert_eq!(intake.submit(files.clone()), 64);
        assert!(intake.workers >= 2 && intake.workers <= 8);
        let workers = intake.workers;

        // A second submission reuses the same pool.
        intake.submit(files);
        assert_eq!(intake.workers, workers);
        settle(&mut intake);
        assert_eq!(intake.entries().len(), 64);
        assert!(intake.entries().windows(2).all(|w| w[0].index < w[1].index));
        fs::remove_dir_all(&dir).unwrap();
    }
}

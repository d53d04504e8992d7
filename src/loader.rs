//! Background slide decoding.
//!
//! Full-size decode and the theme filter run on a worker thread; the window
//! thread only uploads finished pixels. Each request supersedes the previous
//! one, so a quick run of Next presses never queues a backlog of decodes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::constants::SLIDE_BOUNDS;
use crate::error::LoadError;
use crate::texture_loader::{Pixels, RawImage, decode_pixels};
use crate::theme::FilterOp;

struct Job {
    ticket: u64,
    index: usize,
    raw: Arc<RawImage>,
    filter: &'static [FilterOp],
}

struct Finished {
    ticket: u64,
    index: usize,
    result: Result<Pixels, LoadError>,
}

fn run(job: Job) -> Finished {
    let result = decode_pixels(&job.raw, job.filter, SLIDE_BOUNDS);
    Finished { ticket: job.ticket, index: job.index, result }
}

pub struct SlideLoader {
    jobs: Option<Sender<Job>>,
    finished_tx: Sender<Finished>,
    finished_rx: Receiver<Finished>,
    current: Arc<AtomicU64>,
    ticket: u64,
}

impl SlideLoader {
    /// Spawns the worker. If the thread cannot be started, requests are
    /// decoded inline instead.
    pub fn new(name: &str) -> Self {
        let (finished_tx, finished_rx) = unbounded();
        let (job_tx, job_rx) = unbounded::<Job>();
        let current = Arc::new(AtomicU64::new(0));

        let results = finished_tx.clone();
        let latest = Arc::clone(&current);
        let spawned = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                for job in job_rx.iter() {
                    if job.ticket != latest.load(Ordering::Relaxed) {
                        continue;
                    }
                    if results.send(run(job)).is_err() {
                        break;
                    }
                }
            });

        let jobs = match spawned {
            Ok(_) => Some(job_tx),
            Err(e) => {
                tracing::error!("{} worker unavailable, decoding inline: {}", name, e);
                None
            }
        };

        Self { jobs, finished_tx, finished_rx, current, ticket: 0 }
    }

    pub fn request(&mut self, index: usize, raw: Arc<RawImage>, filter: &'static [FilterOp]) {
        self.ticket += 1;
        self.current.store(self.ticket, Ordering::Relaxed);

        let job = Job { ticket: self.ticket, index, raw, filter };
        let job = match &self.jobs {
            Some(jobs) => match jobs.send(job) {
                Ok(()) => return,
                Err(e) => e.0,
            },
            None => job,
        };
        let _ = self.finished_tx.send(run(job));
    }

    /// Result of the newest request, once it has landed.
    pub fn poll(&mut self) -> Option<(usize, Result<Pixels, LoadError>)> {
        let mut latest = None;
        for finished in self.finished_rx.try_iter() {
            if finished.ticket == self.ticket {
                latest = Some((finished.index, finished.result));
            }
        }
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};
    use ::image::{ImageFormat, Rgb, RgbImage};

    fn png(width: u32, height: u32) -> Arc<RawImage> {
        let mut bytes = Vec::new();
        RgbImage::from_pixel(width, height, Rgb([200, 200, 200]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        Arc::new(RawImage { path: PathBuf::from("slide.png"), bytes, orientation: 1 })
    }

    fn wait(loader: &mut SlideLoader) -> (usize, Result<Pixels, LoadError>) {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(done) = loader.poll() {
                return done;
            }
            assert!(Instant::now() < deadline, "slide never finished");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_decodes_with_filter_off_thread() {
        let mut loader = SlideLoader::new("test-loader");
        loader.request(3, png(8, 6), &[FilterOp::Brightness(0.5)]);
        let (index, result) = wait(&mut loader);
        let pixels = result.unwrap();
        assert_eq!(index, 3);
        assert_eq!((pixels.width, pixels.height), (8, 6));
        assert_eq!(&pixels.rgba[..4], &[100, 100, 100, 255]);
    }

    #[test]
    fn test_newer_request_supersedes() {
        let mut loader = SlideLoader::new("test-loader");
        loader.request(0, png(400, 300), &[]);
        loader.request(1, png(4, 3), &[]);
        let (index, result) = wait(&mut loader);
        assert_eq!(index, 1);
        assert_eq!(result.unwrap().width, 4);
        std::thread::sleep(Duration::from_millis(50));
        assert!(loader.poll().is_none());
    }

    #[test]
    fn test_bad_bytes_report_error() {
        let mut loader = SlideLoader::new("test-loader");
        let raw = Arc::new(RawImage { path: PathBuf::from("bad.png"), bytes: vec![0; 16], orientation: 1 });
        loader.request(0, raw, &[]);
        let (_, result) = wait(&mut loader);
        assert!(matches!(result, Err(LoadError::Decode { .. })));
    }
}

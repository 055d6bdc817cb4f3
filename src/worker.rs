//! Worker thread management
//!
//! Runs independent conversions on dedicated worker threads.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, trace};

use crate::error::ConvertError;
use crate::grid::CharacterGrid;
use crate::pixel_buffer::PixelBuffer;
use crate::render_engines::ascii::{convert, ConversionParams};

/// Messages sent from main thread to workers
#[derive(Debug)]
pub enum WorkerMessage {
    /// Request a conversion; `id` is echoed back in the response
    Convert {
        id: usize,
        image: Arc<PixelBuffer>,
        params: ConversionParams,
    },
    /// Shutdown signal
    Shutdown,
}

/// Responses sent from workers to main thread
#[derive(Debug)]
pub enum WorkerResponse {
    /// Conversion complete
    Complete {
        id: usize,
        grid: CharacterGrid,
        render_time: u64,
    },
    /// Conversion rejected
    Failed { id: usize, error: ConvertError },
}

impl WorkerResponse {
    pub fn id(&self) -> usize {
        match self {
            WorkerResponse::Complete { id, .. } | WorkerResponse::Failed { id, .. } => *id,
        }
    }
}

/// Result of one conversion as delivered by the pool
pub type Outcome = std::result::Result<CharacterGrid, ConvertError>;

/// Handle to worker threads and channels
pub struct WorkerHandle {
    pub request_tx: Sender<WorkerMessage>,
    pub response_rx: Receiver<WorkerResponse>,
    threads: Vec<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Number of running worker threads
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Queue one conversion per image. Ids are assigned in iteration order.
    pub fn submit_all<I>(&self, images: I, params: &ConversionParams) -> Result<usize>
    where
        I: IntoIterator<Item = PixelBuffer>,
    {
        let mut count = 0;
        for (id, image) in images.into_iter().enumerate() {
            self.request_tx
                .send(WorkerMessage::Convert {
                    id,
                    image: Arc::new(image),
                    params: params.clone(),
                })
                .context("Worker pool stopped unexpectedly")?;
            count += 1;
        }
        Ok(count)
    }

    /// Wait for `count` responses and return them indexed by request id.
    ///
    /// Each wait is bounded by `timeout`. Ids outside `0..count` or arriving
    /// twice are reported as errors.
    pub fn collect_ordered(&self, count: usize, timeout: Duration) -> Result<Vec<Outcome>> {
        let mut slots: Vec<Option<Outcome>> = (0..count).map(|_| None).collect();

        for _ in 0..count {
            let response = self
                .response_rx
                .recv_timeout(timeout)
                .context("Timed out waiting for conversion")?;
            let id = response.id();
            let outcome = match response {
                WorkerResponse::Complete {
                    grid, render_time, ..
                } => {
                    debug!("request {} converted in {}ms", id, render_time);
                    Ok(grid)
                }
                WorkerResponse::Failed { error, .. } => Err(error),
            };
            let Some(slot) = slots.get_mut(id) else {
                bail!("response for unknown request {}", id);
            };
            if slot.is_some() {
                bail!("duplicate response for request {}", id);
            }
            *slot = Some(outcome);
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Shutdown all worker threads
    pub fn shutdown(self) {
        // Send shutdown signal to all workers
        for _ in &self.threads {
            let _ = self.request_tx.send(WorkerMessage::Shutdown);
        }

        // Wait for threads to finish
        for handle in self.threads {
            let _ = handle.join();
        }
    }
}

/// Spawn `count` worker threads (at least one)
pub fn spawn_workers(count: usize) -> Result<WorkerHandle> {
    let (request_tx, request_rx) = unbounded::<WorkerMessage>();
    let (response_tx, response_rx) = unbounded::<WorkerResponse>();

    let mut threads = Vec::new();

    for id in 0..count.max(1) {
        let rx = request_rx.clone();
        let tx = response_tx.clone();

        let handle = thread::Builder::new()
            .name(format!("convert-worker-{}", id))
            .spawn(move || {
                worker_loop(rx, tx);
            })
            .context("Failed to spawn worker thread")?;

        threads.push(handle);
    }
    debug!("spawned {} conversion workers", threads.len());

    Ok(WorkerHandle {
        request_tx,
        response_rx,
        threads,
    })
}

/// Default pool size: available CPUs, capped at 4
pub fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(4)
}

/// Main worker loop - processes messages until shutdown
fn worker_loop(rx: Receiver<WorkerMessage>, tx: Sender<WorkerResponse>) {
    while let Ok(msg) = rx.recv() {
        match msg {
            WorkerMessage::Shutdown => break,

            WorkerMessage::Convert { id, image, params } => {
                let start = Instant::now();

                let response = match convert(&image, &params) {
                    Ok(grid) => WorkerResponse::Complete {
                        id,
                        grid,
                        render_time: start.elapsed().as_millis() as u64,
                    },
                    Err(error) => WorkerResponse::Failed { id, error },
                };
                trace!("request {} finished", id);

                let _ = tx.send(response);
            }
        }
    }
}

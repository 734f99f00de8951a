//! Background chunk generation over crossbeam channels.
//!
//! Workers share the `WorldMap`, so a chunk generated in the background
//! lands in the same cache the synchronous path uses and publish-once
//! still holds; the result message only tells the caller the chunk is
//! ready.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::constants::{MAX_PENDING_CHUNKS, RESULT_QUEUE_CAPACITY};
use crate::core::chunk::Chunk;
use crate::world::map::WorldMap;

/// A chunk generation request; lower `priority` values are more urgent.
/// Callers typically pass distance squared from the viewer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ChunkRequest {
    pub cx: i32,
    pub cy: i32,
    pub priority: i32,
}

pub struct ReadyChunk {
    pub cx: i32,
    pub cy: i32,
    pub chunk: Arc<Chunk>,
}

/// Owns the worker threads and tracks which chunks are in flight.
pub struct ChunkLoader {
    request_tx: Sender<ChunkRequest>,
    result_rx: Receiver<ReadyChunk>,
    pending: FxHashSet<(i32, i32)>,
    worker_count: usize,
}

impl ChunkLoader {
    pub fn new(map: Arc<WorldMap>) -> Self {
        Self::with_worker_count(map, num_cpus::get().max(1))
    }

    pub fn with_worker_count(map: Arc<WorldMap>, worker_count: usize) -> Self {
        let (request_tx, request_rx) = bounded::<ChunkRequest>(MAX_PENDING_CHUNKS);
        let (result_tx, result_rx) = bounded::<ReadyChunk>(RESULT_QUEUE_CAPACITY);

        for worker_id in 0..worker_count {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let map = Arc::clone(&map);

            thread::Builder::new()
                .name(format!("chunk-gen-{worker_id}"))
                .spawn(move || {
                    while let Ok(req) = rx.recv() {
                        trace!(cx = req.cx, cy = req.cy, "worker generating chunk");
                        let chunk = map.chunk(req.cx, req.cy);
                        let ready = ReadyChunk {
                            cx: req.cx,
                            cy: req.cy,
                            chunk,
                        };
                        if tx.send(ready).is_err() {
                            break;
                        }
                    }
                })
                .expect("failed to spawn chunk generation worker");
        }

        ChunkLoader {
            request_tx,
            result_rx,
            pending: FxHashSet::default(),
            worker_count,
        }
    }

    /// Queues one chunk. Duplicate requests for an in-flight chunk are
    /// dropped; a full queue drops the request too (the caller re-requests
    /// on the next frame).
    pub fn request(&mut self, cx: i32, cy: i32, priority: i32) {
        if self.pending.contains(&(cx, cy)) {
            return;
        }
        if self
            .request_tx
            .try_send(ChunkRequest { cx, cy, priority })
            .is_ok()
        {
            self.pending.insert((cx, cy));
        }
    }

    /// Queues a batch, most urgent first, bounded by the pending cap.
    pub fn request_batch(&mut self, requests: &[(i32, i32, i32)]) {
        let mut sorted: Vec<_> = requests
            .iter()
            .filter(|(cx, cy, _)| !self.pending.contains(&(*cx, *cy)))
            .collect();
        sorted.sort_by_key(|(_, _, priority)| *priority);

        for &&(cx, cy, priority) in &sorted {
            if self.pending.len() >= MAX_PENDING_CHUNKS {
                break;
            }
            self.request(cx, cy, priority);
        }
    }

    pub fn is_pending(&self, cx: i32, cy: i32) -> bool {
        self.pending.contains(&(cx, cy))
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drains up to `max_results` finished chunks without blocking.
    pub fn poll_ready(&mut self, max_results: usize) -> Vec<ReadyChunk> {
        let mut results = Vec::with_capacity(max_results.min(RESULT_QUEUE_CAPACITY));
        for _ in 0..max_results {
            match self.result_rx.try_recv() {
                Ok(ready) => {
                    self.pending.remove(&(ready.cx, ready.cy));
                    results.push(ready);
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        results
    }

    pub fn poll_all_ready(&mut self) -> Vec<ReadyChunk> {
        self.poll_ready(RESULT_QUEUE_CAPACITY)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }
}

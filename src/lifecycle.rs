//! Camera resource lifecycle: acquire on enable, release on disable/teardown.
//!
//! Acquisition is asynchronous. The host gets a request tagged with the
//! manager's current generation and answers later over a channel. Every
//! enable/disable bumps the generation, so an answer that arrives after the
//! toggle moved on is stale: the stream it carries is stopped, never bound.

use crossbeam_channel::{Receiver, Sender, unbounded};
use image::RgbImage;
use tracing::{debug, info, warn};

use crate::error::Error;

/// A live capture stream bound (or about to be bound) to the camera layer.
pub trait CaptureStream: Send + 'static {
    /// Stop all tracks and give the device back. Called exactly once per stream.
    fn stop(&mut self);

    /// Most recent frame, if a new one arrived since the last call.
    fn latest_frame(&mut self) -> Option<RgbImage>;
}

/// One answer to a capture request.
pub struct Acquired<S> {
    pub generation: u64,
    pub result: Result<S, Error>,
}

pub type Reply<S> = Sender<Acquired<S>>;

/// The host environment's "request video capture resource" capability.
pub trait CaptureHost {
    type Stream: CaptureStream;

    /// Start acquiring a stream. Must return without waiting; the outcome is
    /// handed back through [`deliver`] on `reply`, tagged with `generation`.
    fn request(&mut self, generation: u64, reply: Reply<Self::Stream>);
}

/// Hand an acquisition result back to its manager.
/// If the manager was torn down in the meantime, the stream is stopped here.
pub fn deliver<S: CaptureStream>(reply: &Reply<S>, acquired: Acquired<S>) {
    if let Err(returned) = reply.send(acquired) {
        let Acquired { generation, result } = returned.into_inner();
        if let Ok(mut stream) = result {
            debug!(generation, "camera manager gone; releasing late stream");
            stream.stop();
        }
    }
}

pub struct CameraManager<H: CaptureHost> {
    host: H,
    enabled: bool,
    generation: u64,
    in_flight: usize,
    bound: Option<H::Stream>,
    reply_tx: Reply<H::Stream>,
    reply_rx: Receiver<Acquired<H::Stream>>,
}

impl<H: CaptureHost> CameraManager<H> {
    /// Mount. With `enabled = true` this issues the first request right away.
    pub fn new(host: H, enabled: bool) -> Self {
        let (reply_tx, reply_rx) = unbounded();
        let mut manager = Self {
            host,
            enabled: false,
            generation: 0,
            in_flight: 0,
            bound: None,
            reply_tx,
            reply_rx,
        };
        manager.set_enabled(enabled);
        manager
    }

    /// React to the parent's toggle. Same value twice is a no-op.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;
        self.generation += 1;

        // At most one stream per instance: drop the old one before asking again.
        self.release();

        if enabled {
            info!(generation = self.generation, "requesting camera");
            self.in_flight += 1;
            self.host.request(self.generation, self.reply_tx.clone());
        }
    }

    /// Drain finished acquisitions. Call once per frame on the UI thread.
    pub fn pump(&mut self) {
        while let Ok(Acquired { generation, result }) = self.reply_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            let current = self.enabled && generation == self.generation;

            match (current, result) {
                (true, Ok(stream)) => {
                    self.release();
                    self.bound = Some(stream);
                    info!(generation, "camera bound");
                }
                (true, Err(err)) => {
                    warn!(generation, error = %err, "camera access denied or not available");
                }
                (false, Ok(mut stream)) => {
                    debug!(generation, current = self.generation, "discarding stale camera stream");
                    stream.stop();
                }
                (false, Err(err)) => {
                    debug!(generation, error = %err, "stale camera request failed");
                }
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// True while some request has not been answered yet (stale ones included).
    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }

    pub fn latest_frame(&mut self) -> Option<RgbImage> {
        self.bound.as_mut().and_then(|stream| stream.latest_frame())
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.bound.take() {
            stream.stop();
            info!(generation = self.generation, "camera released");
        }
    }
}

impl<H: CaptureHost> Drop for CameraManager<H> {
    fn drop(&mut self) {
        // Teardown releases regardless of `enabled`. Requests still in flight
        // find the reply channel closed and stop their stream in `deliver`.
        self.release();

        // Answers already queued but never pumped still own a running stream.
        while let Ok(Acquired { generation, result }) = self.reply_rx.try_recv() {
            if let Ok(mut stream) = result {
                stream.stop();
                debug!(generation, "unclaimed camera stopped on teardown");
            }
        }
    }
}

// Opens the camera on a worker thread and streams frames back to the UI.
// Visual expectation: a moment after camera mode turns on, `latest_frame()`
// starts returning RGB images that the button mirrors into its glass body.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, TrySendError, bounded};
use image::RgbImage;
use tracing::{debug, info, warn};

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use crate::error::Error;
use crate::lifecycle::{Acquired, CaptureHost, CaptureStream, Reply, deliver};

/// Which device to open and what size to ask it for.
pub struct NokhwaHost {
    index: u32,
    width: u32,
    height: u32,
}

impl NokhwaHost {
    pub fn new(index: u32, width: u32, height: u32) -> Self {
        Self { index, width, height }
    }
}

impl CaptureHost for NokhwaHost {
    type Stream = LiveFeed;

    fn request(&mut self, generation: u64, reply: Reply<LiveFeed>) {
        let (index, width, height) = (self.index, self.width, self.height);
        let worker_reply = reply.clone();

        let spawned = thread::Builder::new()
            .name(format!("camera-{generation}"))
            .spawn(move || capture_worker(index, width, height, generation, worker_reply));

        if let Err(e) = spawned {
            let result = Err(Error::CameraInit(format!("Spawn capture thread: {e}")));
            deliver(&reply, Acquired { generation, result });
        }
    }
}

/// Handle to a camera running on its own thread.
/// Stopping (or dropping) it raises a flag; the worker closes the device.
pub struct LiveFeed {
    stop: Arc<AtomicBool>,
    frames: Receiver<RgbImage>,
}

impl CaptureStream for LiveFeed {
    fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    fn latest_frame(&mut self) -> Option<RgbImage> {
        // Skip anything older than the newest frame.
        self.frames.try_iter().last()
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

/// Try to open camera `index` at a target resolution (falls back if not exact).
fn open_camera(index: u32, width: u32, height: u32) -> Result<Camera, Error> {
    let fmt = CameraFormat::new(
        Resolution::new(width, height),
        FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
        30,                // target FPS
    );

    // Ask for RGB frames, closest to our request.
    let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

    // This is where permission-denied / no-device / busy surface.
    let mut cam = Camera::new(CameraIndex::Index(index), req)
        .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

    cam.open_stream()
        .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

    Ok(cam)
}

/// Grab one frame (blocks until the camera has one) and decode it to RGB.
fn grab_frame(cam: &mut Camera) -> Result<RgbImage, Error> {
    let frame = cam
        .frame()
        .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

    let decoded = frame
        .decode_image::<RgbFormat>()
        .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

    // Rebuild on our side of the `image` dependency from the raw RGB bytes.
    let (w, h) = (decoded.width(), decoded.height());
    RgbImage::from_raw(w, h, decoded.into_raw())
        .ok_or_else(|| Error::CameraFrame(format!("Decode RGB: short buffer for {w}x{h}")))
}

fn capture_worker(index: u32, width: u32, height: u32, generation: u64, reply: Reply<LiveFeed>) {
    let mut cam = match open_camera(index, width, height) {
        Ok(cam) => cam,
        Err(err) => {
            deliver(&reply, Acquired { generation, result: Err(err) });
            return;
        }
    };

    // The stream might choose a slightly different resolution.
    let actual = cam.resolution();
    info!(
        generation,
        "camera {index} opened at {}x{}",
        actual.width(),
        actual.height()
    );

    let stop = Arc::new(AtomicBool::new(false));
    let (frame_tx, frames) = bounded(1);
    let feed = LiveFeed {
        stop: Arc::clone(&stop),
        frames,
    };

    // If nobody wants the feed any more, `deliver` drops it and the flag goes up.
    deliver(&reply, Acquired { generation, result: Ok(feed) });
    drop(reply);

    let mut frame_count: u64 = 0;
    while !stop.load(Ordering::SeqCst) {
        match grab_frame(&mut cam) {
            Ok(img) => match frame_tx.try_send(img) {
                Ok(()) | Err(TrySendError::Full(_)) => frame_count += 1,
                Err(TrySendError::Disconnected(_)) => break,
            },
            Err(err) => {
                warn!(generation, error = %err, "camera feed ended");
                break;
            }
        }
    }

    if let Err(e) = cam.stop_stream() {
        debug!(generation, "stop stream: {e}");
    }
    info!(generation, frame_count, "camera {index} closed");
}

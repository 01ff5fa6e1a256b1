// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the window failed.
    #[error("Window init error: {0}")]
    WindowInit(String),
    /// Updating the window buffer failed.
    #[error("Window update error: {0}")]
    WindowUpdate(String),
    /// Opening/starting the camera failed (permission denied, no device, busy).
    /// Never fatal: the button just shows its dark fallback.
    #[error("Camera init error: {0}")]
    CameraInit(String),
    /// Grabbing/decoding a frame failed.
    #[error("Camera frame error: {0}")]
    CameraFrame(String),
}

//! A glowing "cosmic" pill button with a live camera mirror, drawn in software.
//!
//! The interesting part is [`lifecycle`]: the camera is acquired on a worker
//! thread when camera mode turns on, and every answer is checked against the
//! current toggle state before it is shown. Everything else is decoration.

pub mod button;
pub mod camera;
pub mod config;
pub mod draw;
pub mod error;
pub mod filter;
pub mod fx;
pub mod lifecycle;
pub mod page;
pub mod pointer;
pub mod types;

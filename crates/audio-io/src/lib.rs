//! # audio-io
//!
//! WAV file persistence for synthesized speech.
//!
//! Writes are atomic: audio is encoded into a temporary file next to the
//! target and renamed into place, so a failed write never leaves a partial
//! file behind.

pub mod wav;

pub use wav::{read_wav, write_wav};

//! # steganowav core
//!
//! Hides and recovers arbitrary byte streams inside uncompressed PCM
//! WAVE audio files using least-significant-bit substitution.
//!
//! A payload is embedded behind a secret sample offset as a 4-byte
//! little-endian length prefix followed by the payload bytes, each byte
//! split into groups of `density` bits carried by the low bits of
//! consecutive samples. An optional seeded keystream XORs the bytes on
//! the way in and out to disguise their patterns; it is obfuscation,
//! not encryption.
//!
//! ## Hide a payload inside a WAV file
//!
//! ```no_run
//! use std::path::Path;
//!
//! use steganowav_core::{commands, HidingParams};
//!
//! let params = HidingParams { density: 0, sample_offset: 5432, seed: 0 };
//! let report = commands::hide(
//!     Path::new("carrier.wav"),
//!     Path::new("secret.txt"),
//!     &params,
//! ).expect("hiding failed");
//!
//! println!("embedded {} bytes", report.payload_bytes);
//! ```
//!
//! ## Recover it again
//!
//! ```no_run
//! use std::path::Path;
//!
//! use steganowav_core::{commands, HidingParams};
//!
//! let params = HidingParams { density: 0, sample_offset: 5432, seed: 0 };
//! let mut recovered = Vec::new();
//! commands::extract(Path::new("carrier.wav"), &params, &mut recovered)
//!     .expect("extraction failed");
//! ```
//!
//! The same offset, density and seed must be used on both sides; they
//! are the caller's secrets.

pub mod codec;
pub mod commands;
pub mod error;
pub mod keystream;
pub mod params;
pub mod result;
pub mod session;
pub mod wave;

pub use codec::LsbCodec;
pub use error::StegError;
pub use keystream::Keystream;
pub use params::{Capacity, HidingParams, AUTO_DENSITY};
pub use result::Result;
pub use session::{human_bytes, HideReport, WaveInfo, WaveSession};
pub use wave::{WaveFormat, WaveHeader, WaveLayout};

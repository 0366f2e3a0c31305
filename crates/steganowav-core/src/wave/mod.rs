//! RIFF/WAVE container parsing.
//!
//! Only the structure needed for steganography is extracted: the format
//! parameters from the `fmt ` chunk and the position and size of the raw
//! PCM samples in the `data` chunk. All other chunks are skipped and left
//! byte-for-byte untouched.

mod parser;

pub use parser::parse_header;

use std::time::Duration;

/// Format parameters of the `fmt ` chunk, fields in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveFormat {
    /// 1 for uncompressed PCM, everything else is rejected
    pub audio_format: u16,
    pub channel_count: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

/// Values derived once when the carrier is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveLayout {
    pub bytes_per_sample: u32,
    /// byte position of the first sample, 44 for a minimal canonical file
    pub first_sample_offset: u64,
    /// length of the `data` chunk in bytes
    pub data_size: u32,
    pub total_samples: u32,
    pub duration: Duration,
    /// false once a `fmt ` extension or a chunk between `fmt ` and `data` was seen
    pub canonical: bool,
}

/// A validated header: format parameters plus the derived layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveHeader {
    pub format: WaveFormat,
    pub layout: WaveLayout,
}

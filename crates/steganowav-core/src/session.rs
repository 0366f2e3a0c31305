//! One hide/extract/info session over a single carrier file.
//!
//! The session owns the carrier file handle for its whole lifetime and
//! releases it on every exit path when it is dropped. The carrier is
//! opened read-only for extract and info and read-write for hide; no
//! locking is done, callers serialize concurrent access themselves.

use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, info};

use crate::codec::LsbCodec;
use crate::error::StegError;
use crate::keystream::Keystream;
use crate::params::{Capacity, HidingParams, LENGTH_PREFIX_BYTES};
use crate::result::Result;
use crate::wave::{parse_header, WaveFormat, WaveLayout};

/// Payload bytes processed per streaming step. Purely a throughput
/// tunable, not part of the on-disk encoding.
const BLOCK_SIZE: usize = 4096;

pub struct WaveSession {
    path: PathBuf,
    file: File,
    file_size: u64,
    format: WaveFormat,
    layout: WaveLayout,
    capacity: Capacity,
    sample_offset: u32,
    keystream: Option<Keystream>,
}

/// What a completed hide run did to the carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HideReport {
    /// payload bytes read and embedded, the length prefix not included
    pub payload_bytes: u64,
    /// sample-region bytes rewritten, the length prefix included
    pub sample_bytes: u64,
}

impl WaveSession {
    /// Opens the carrier read-only, for extract and info.
    pub fn open<P: AsRef<Path>>(path: P, params: &HidingParams) -> Result<Self> {
        Self::open_with(path.as_ref(), params, false)
    }

    /// Opens the carrier read-write, for hide.
    pub fn open_rw<P: AsRef<Path>>(path: P, params: &HidingParams) -> Result<Self> {
        Self::open_with(path.as_ref(), params, true)
    }

    fn open_with(path: &Path, params: &HidingParams, writable: bool) -> Result<Self> {
        let mut file = File::options()
            .read(true)
            .write(writable)
            .open(path)
            .map_err(|source| StegError::ReadError { source })?;
        let file_size = file.metadata()?.len();

        let header = parse_header(&mut file, file_size)?;
        let capacity = Capacity::plan(&header.layout, &header.format, params)?;
        let keystream = (params.seed != 0).then(|| Keystream::new(params.seed));

        debug!(
            "opened {:?}: {} samples of {} bits, density {}, offset {}",
            path,
            header.layout.total_samples,
            header.format.bits_per_sample,
            capacity.density,
            params.sample_offset
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            file_size,
            format: header.format,
            layout: header.layout,
            capacity,
            sample_offset: params.sample_offset,
            keystream,
        })
    }

    pub fn format(&self) -> &WaveFormat {
        &self.format
    }

    pub fn layout(&self) -> &WaveLayout {
        &self.layout
    }

    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }

    /// Embeds exactly `payload_len` bytes from `payload` behind the
    /// configured offset, the little-endian length prefix first. A
    /// stream ending early fails the hide; bytes past `payload_len`
    /// are never read.
    ///
    /// The carrier is modified in place; sample regions already flushed
    /// when a later step fails are not rolled back.
    pub fn hide<R: Read>(&mut self, payload: &mut R, payload_len: u32) -> Result<HideReport> {
        self.capacity.check_payload(u64::from(payload_len))?;

        let codec = self.codec();
        self.seek_to_payload_start()?;

        let mut prefix = [0u8; LENGTH_PREFIX_BYTES as usize];
        LittleEndian::write_u32(&mut prefix, payload_len);
        if let Some(ks) = self.keystream.as_mut() {
            ks.apply(&mut prefix);
        }
        let mut prefix_region = vec![0u8; prefix.len() * codec.sample_cost()];
        self.embed_region(&codec, &prefix, &mut prefix_region)?;

        // the prefix declares payload_len, so the stream must deliver
        // exactly that many bytes, no matter how long it really is
        let mut payload = payload.take(u64::from(payload_len));

        let mut block = [0u8; BLOCK_SIZE];
        let mut region = vec![0u8; BLOCK_SIZE * codec.sample_cost()];
        let mut payload_bytes = 0u64;

        loop {
            let n = read_block(&mut payload, &mut block)?;
            if n == 0 {
                break;
            }

            let chunk = &mut block[..n];
            if let Some(ks) = self.keystream.as_mut() {
                ks.apply(chunk);
            }

            let region = &mut region[..n * codec.sample_cost()];
            self.embed_region(&codec, chunk, region)?;
            payload_bytes += n as u64;
        }

        if payload_bytes != u64::from(payload_len) {
            return Err(StegError::ReadError {
                source: std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("payload ended after {payload_bytes} of {payload_len} bytes"),
                ),
            });
        }

        self.file
            .sync_all()
            .map_err(|source| StegError::WriteError { source })?;

        let sample_bytes =
            self.capacity.samples_for(payload_len) * u64::from(self.layout.bytes_per_sample);
        info!(
            "hid {} payload bytes across {} sample bytes in {:?}",
            payload_bytes, sample_bytes, self.path
        );

        Ok(HideReport {
            payload_bytes,
            sample_bytes,
        })
    }

    /// Recovers a payload hidden behind the configured offset and writes
    /// it to `output`, returning the number of recovered bytes.
    pub fn extract<W: Write>(&mut self, output: &mut W) -> Result<u64> {
        let codec = self.codec();
        self.seek_to_payload_start()?;

        let mut prefix_region = vec![0u8; LENGTH_PREFIX_BYTES as usize * codec.sample_cost()];
        self.file
            .read_exact(&mut prefix_region)
            .map_err(|source| StegError::ReadError { source })?;

        let mut prefix = [0u8; LENGTH_PREFIX_BYTES as usize];
        codec.unpack_block(&prefix_region, &mut prefix);
        if let Some(ks) = self.keystream.as_mut() {
            ks.apply(&mut prefix);
        }

        let declared = LittleEndian::read_u32(&prefix);
        self.capacity.check_declared(declared)?;
        debug!("extracting {} hidden bytes from {:?}", declared, self.path);

        let mut block = [0u8; BLOCK_SIZE];
        let mut region = vec![0u8; BLOCK_SIZE * codec.sample_cost()];
        let mut remaining = u64::from(declared);

        while remaining > 0 {
            let n = remaining.min(BLOCK_SIZE as u64) as usize;

            let region = &mut region[..n * codec.sample_cost()];
            self.file
                .read_exact(region)
                .map_err(|source| StegError::ReadError { source })?;

            let chunk = &mut block[..n];
            codec.unpack_block(region, chunk);
            if let Some(ks) = self.keystream.as_mut() {
                ks.apply(chunk);
            }

            output
                .write_all(chunk)
                .map_err(|source| StegError::WriteError { source })?;
            remaining -= n as u64;
        }

        Ok(u64::from(declared))
    }

    /// Snapshot of the carrier and hiding figures for reporting.
    pub fn info(&self) -> WaveInfo {
        WaveInfo {
            path: self.path.clone(),
            file_size: self.file_size,
            format: self.format,
            layout: self.layout,
            capacity: self.capacity,
            sample_offset: self.sample_offset,
        }
    }

    fn codec(&self) -> LsbCodec {
        LsbCodec::new(self.capacity.density, self.layout.bytes_per_sample as usize)
    }

    fn seek_to_payload_start(&mut self) -> Result<()> {
        let byte_offset = u64::from(self.sample_offset) * u64::from(self.layout.bytes_per_sample);
        self.file
            .seek(SeekFrom::Start(self.layout.first_sample_offset + byte_offset))?;
        Ok(())
    }

    /// Read-modify-write of one sample region at the current position:
    /// read it, pack the payload into it, rewind, write it back. The
    /// cursor ends up right behind the region.
    fn embed_region(&mut self, codec: &LsbCodec, payload: &[u8], region: &mut [u8]) -> Result<()> {
        self.file
            .read_exact(region)
            .map_err(|source| StegError::ReadError { source })?;
        codec.pack_block(payload, region);
        self.file.seek(SeekFrom::Current(-(region.len() as i64)))?;
        self.file
            .write_all(region)
            .map_err(|source| StegError::WriteError { source })?;
        Ok(())
    }
}

/// Reads up to `buf.len()` bytes, retrying short reads until EOF.
fn read_block<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(source) => return Err(StegError::ReadError { source }),
        }
    }
    Ok(filled)
}

/// Carrier and hiding figures of an open session, printable as the
/// two-section info report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveInfo {
    pub path: PathBuf,
    pub file_size: u64,
    pub format: WaveFormat,
    pub layout: WaveLayout,
    pub capacity: Capacity,
    pub sample_offset: u32,
}

impl WaveInfo {
    /// Worst-case sample alteration in percent, relative to 15% of the
    /// sample's dynamic range.
    fn max_alteration(&self) -> f64 {
        let sample_dynamic = 0.15 * 2f64.powi(i32::from(self.format.bits_per_sample));
        let hiding_dynamic = 2f64.powi(i32::from(self.capacity.density));
        100.0 * hiding_dynamic / sample_dynamic
    }

    /// Play time at which the hidden data starts.
    fn offset_time(&self) -> std::time::Duration {
        let offset_bytes =
            u64::from(self.sample_offset) * u64::from(self.layout.bytes_per_sample);
        if self.format.byte_rate > 0 {
            std::time::Duration::from_secs_f64(offset_bytes as f64 / f64::from(self.format.byte_rate))
        } else {
            std::time::Duration::ZERO
        }
    }
}

impl fmt::Display for WaveInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "WAVE Audio file informations")?;
        writeln!(f, "============================")?;
        writeln!(f, "  File path                      : {:?}", self.path)?;
        writeln!(
            f,
            "  File size                      : {} ({} bytes)",
            human_bytes(self.file_size),
            self.file_size
        )?;
        writeln!(f, "  Canonical format               : {}", self.layout.canonical)?;
        writeln!(f, "  Audio format                   : {}", self.format.audio_format)?;
        writeln!(f, "  Number of channels             : {}", self.format.channel_count)?;
        writeln!(f, "  Sampling rate                  : {} Hz", self.format.sample_rate)?;
        writeln!(
            f,
            "  Bytes per second               : {} ({} bytes)",
            human_bytes(u64::from(self.format.byte_rate)),
            self.format.byte_rate
        )?;
        writeln!(
            f,
            "  Sample size                    : {} bits ({} bytes)",
            self.format.bits_per_sample, self.layout.bytes_per_sample
        )?;
        writeln!(f, "  Total samples                  : {}", self.layout.total_samples)?;
        writeln!(
            f,
            "  Sound size                     : {} ({} bytes)",
            human_bytes(u64::from(self.layout.data_size)),
            self.layout.data_size
        )?;
        writeln!(f, "  Sound duration                 : {:?}", self.layout.duration)?;
        writeln!(f)?;
        writeln!(f, "Hiding informations")?;
        writeln!(f, "===================")?;
        writeln!(
            f,
            "  Density                        : {} bits per sample",
            self.capacity.density
        )?;
        writeln!(
            f,
            "    Samples for hide one byte    : {}",
            self.capacity.samples_per_byte
        )?;
        writeln!(
            f,
            "    Sample alteration @15% dyn.  : {:.5}% max.",
            self.max_alteration()
        )?;
        writeln!(
            f,
            "  Max samples offset             : {}",
            self.capacity.max_sample_offset
        )?;
        writeln!(
            f,
            "    User samples offset          : {} ({:?})",
            self.sample_offset,
            self.offset_time()
        )?;
        writeln!(
            f,
            "    Max payload size             : {} ({} bytes)",
            human_bytes(u64::from(self.capacity.max_payload_bytes)),
            self.capacity.max_payload_bytes
        )
    }
}

/// Formats a byte count with a binary suffix, e.g. `1.500 KiB`.
pub fn human_bytes(value: u64) -> String {
    const SUFFIXES: [&str; 4] = ["B", "KiB", "MiB", "GiB"];

    let mut scaled = value as f64;
    let mut order = 0;
    while scaled >= 1024.0 && order < SUFFIXES.len() - 1 {
        scaled /= 1024.0;
        order += 1;
    }

    format!("{:.3} {}", scaled, SUFFIXES[order])
}

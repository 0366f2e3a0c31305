//! Path-level operations, one function per user-facing action.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::StegError;
use crate::params::HidingParams;
use crate::result::Result;
use crate::session::{HideReport, WaveInfo, WaveSession};

/// Hides the payload file inside the carrier at the secret offset.
/// The carrier is modified in place.
pub fn hide(carrier: &Path, payload: &Path, params: &HidingParams) -> Result<HideReport> {
    let mut session = WaveSession::open_rw(carrier, params)?;

    let mut payload_file =
        File::open(payload).map_err(|source| StegError::ReadError { source })?;
    let payload_len = payload_file.metadata()?.len();
    let payload_len = u32::try_from(payload_len).map_err(|_| StegError::PayloadTooLarge {
        needed: payload_len,
        available: u64::from(session.capacity().max_payload_bytes),
    })?;

    session.hide(&mut payload_file, payload_len)
}

/// Recovers a hidden payload from the carrier into `output`.
pub fn extract<W: Write>(carrier: &Path, params: &HidingParams, output: &mut W) -> Result<u64> {
    let mut session = WaveSession::open(carrier, params)?;
    session.extract(output)
}

/// Recovers a hidden payload from the carrier into a new file.
pub fn extract_to_file(carrier: &Path, params: &HidingParams, output: &Path) -> Result<u64> {
    let mut file = File::create(output).map_err(|source| StegError::WriteError { source })?;
    extract(carrier, params, &mut file)
}

/// Reports carrier and hiding figures without touching the file.
pub fn info(carrier: &Path, params: &HidingParams) -> Result<WaveInfo> {
    let session = WaveSession::open(carrier, params)?;
    Ok(session.info())
}

//! Hiding parameters and capacity planning.
//!
//! The planner turns the caller's raw parameters (density, offset, seed)
//! and the parsed carrier layout into validated, derived figures. Every
//! bound includes the 4-byte length prefix that precedes the payload in
//! the sample stream.

use crate::error::StegError;
use crate::result::Result;
use crate::wave::{WaveFormat, WaveLayout};

/// Density value that selects one by sample size at open time.
pub const AUTO_DENSITY: u8 = 0;

/// Bytes of the little-endian payload length embedded before the payload.
pub const LENGTH_PREFIX_BYTES: u32 = 4;

/// Caller-provided hiding parameters, unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HidingParams {
    /// bits per sample used to carry payload: 1, 2, 4 or 8, or
    /// [`AUTO_DENSITY`] to pick one by sample size
    pub density: u8,
    /// starting sample index, one of the caller's secrets
    pub sample_offset: u32,
    /// keystream seed, 0 disables obfuscation
    pub seed: u8,
}

impl HidingParams {
    /// Resolves the density against the carrier format.
    ///
    /// Auto selects 8 for samples of 24 bits and more, 4 for 16 bits and
    /// 1 otherwise. Explicit values must be in {1, 2, 4, 8} and are never
    /// clamped. Any resolved density reaching half the sample's bit depth
    /// is rejected to keep the distortion bounded.
    pub fn resolve_density(&self, format: &WaveFormat) -> Result<u8> {
        let density = match self.density {
            AUTO_DENSITY => match format.bits_per_sample {
                bits if bits >= 24 => 8,
                16 => 4,
                _ => 1,
            },
            d @ (1 | 2 | 4 | 8) => d,
            d => return Err(StegError::InvalidDensity(d)),
        };

        if u16::from(density) >= format.bits_per_sample / 2 {
            return Err(StegError::DensityTooHigh {
                density,
                bits_per_sample: format.bits_per_sample,
            });
        }

        Ok(density)
    }
}

/// Capacity figures derived once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    /// resolved density, never [`AUTO_DENSITY`]
    pub density: u8,
    pub samples_per_byte: u32,
    /// largest sample offset that still leaves room for the length prefix
    pub max_sample_offset: u32,
    /// payload bytes that fit behind the chosen offset, prefix accounted
    pub max_payload_bytes: u32,
}

impl Capacity {
    /// Validates the offset and derives the capacity for this carrier.
    pub fn plan(layout: &WaveLayout, format: &WaveFormat, params: &HidingParams) -> Result<Self> {
        let density = params.resolve_density(format)?;
        let samples_per_byte = 8 / u32::from(density);

        let prefix_samples = LENGTH_PREFIX_BYTES * samples_per_byte;
        let max_sample_offset = layout.total_samples.saturating_sub(prefix_samples);
        if params.sample_offset > max_sample_offset {
            return Err(StegError::OffsetTooLarge {
                offset: params.sample_offset,
                max: max_sample_offset,
            });
        }

        let payload_room = (layout.total_samples - params.sample_offset) / samples_per_byte;
        let max_payload_bytes = payload_room.saturating_sub(LENGTH_PREFIX_BYTES);

        Ok(Self {
            density,
            samples_per_byte,
            max_sample_offset,
            max_payload_bytes,
        })
    }

    /// Samples consumed by `payload_len` bytes plus the length prefix.
    pub fn samples_for(&self, payload_len: u32) -> u64 {
        (u64::from(payload_len) + u64::from(LENGTH_PREFIX_BYTES)) * u64::from(self.samples_per_byte)
    }

    /// Rejects payloads that do not fit behind the offset. Checked before
    /// a single carrier byte is written.
    pub fn check_payload(&self, payload_len: u64) -> Result<()> {
        if payload_len > u64::from(self.max_payload_bytes) {
            return Err(StegError::PayloadTooLarge {
                needed: payload_len,
                available: u64::from(self.max_payload_bytes),
            });
        }
        Ok(())
    }

    /// Bounds the length prefix read back at extract time. An implausible
    /// value signals a wrong offset, seed or density far more often than
    /// a corrupted file.
    pub fn check_declared(&self, declared: u32) -> Result<()> {
        if declared > self.max_payload_bytes {
            return Err(StegError::InconsistentLength {
                declared,
                max: self.max_payload_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn format_with_bits(bits_per_sample: u16) -> WaveFormat {
        WaveFormat {
            audio_format: 1,
            channel_count: 1,
            sample_rate: 44_100,
            byte_rate: 44_100 * u32::from(bits_per_sample / 8),
            block_align: bits_per_sample / 8,
            bits_per_sample,
        }
    }

    fn layout_with_samples(total_samples: u32, bytes_per_sample: u32) -> WaveLayout {
        WaveLayout {
            bytes_per_sample,
            first_sample_offset: 44,
            data_size: total_samples * bytes_per_sample,
            total_samples,
            duration: Duration::ZERO,
            canonical: true,
        }
    }

    fn params(density: u8, sample_offset: u32) -> HidingParams {
        HidingParams {
            density,
            sample_offset,
            seed: 0,
        }
    }

    #[test]
    fn auto_density_tiers_by_sample_size() {
        assert_eq!(params(0, 0).resolve_density(&format_with_bits(24)).unwrap(), 8);
        assert_eq!(params(0, 0).resolve_density(&format_with_bits(32)).unwrap(), 8);
        assert_eq!(params(0, 0).resolve_density(&format_with_bits(16)).unwrap(), 4);
        assert_eq!(params(0, 0).resolve_density(&format_with_bits(8)).unwrap(), 1);
    }

    #[test]
    fn densities_outside_the_accepted_set_are_rejected_not_clamped() {
        for d in [3u8, 5, 6, 7, 9, 255] {
            assert!(matches!(
                params(d, 0).resolve_density(&format_with_bits(16)),
                Err(StegError::InvalidDensity(got)) if got == d
            ));
        }
    }

    #[test]
    fn density_reaching_half_the_bit_depth_is_rejected() {
        assert!(matches!(
            params(8, 0).resolve_density(&format_with_bits(16)),
            Err(StegError::DensityTooHigh {
                density: 8,
                bits_per_sample: 16
            })
        ));
        assert!(matches!(
            params(4, 0).resolve_density(&format_with_bits(8)),
            Err(StegError::DensityTooHigh { .. })
        ));
        // 8 bits at density 2 stays below half the depth
        assert_eq!(params(2, 0).resolve_density(&format_with_bits(8)).unwrap(), 2);
    }

    #[test]
    fn capacity_accounts_for_the_length_prefix() {
        let layout = layout_with_samples(1_000, 2);
        let capacity = Capacity::plan(&layout, &format_with_bits(16), &params(4, 100)).unwrap();

        assert_eq!(capacity.samples_per_byte, 2);
        // (1000 - 100) / 2 - 4
        assert_eq!(capacity.max_payload_bytes, 446);
        // 1000 - 4 * 2
        assert_eq!(capacity.max_sample_offset, 992);
        assert_eq!(capacity.samples_for(446), 900);
    }

    #[test]
    fn offsets_leaving_no_room_for_the_prefix_are_rejected() {
        let layout = layout_with_samples(1_000, 2);

        assert!(matches!(
            Capacity::plan(&layout, &format_with_bits(16), &params(4, 993)),
            Err(StegError::OffsetTooLarge { offset: 993, max: 992 })
        ));
        assert!(Capacity::plan(&layout, &format_with_bits(16), &params(4, 992)).is_ok());
    }

    #[test]
    fn oversized_payloads_are_rejected() {
        let layout = layout_with_samples(1_000, 2);
        let capacity = Capacity::plan(&layout, &format_with_bits(16), &params(4, 100)).unwrap();

        assert!(capacity.check_payload(446).is_ok());
        assert!(matches!(
            capacity.check_payload(447),
            Err(StegError::PayloadTooLarge {
                needed: 447,
                available: 446
            })
        ));
    }

    #[test]
    fn implausible_declared_lengths_are_rejected() {
        let layout = layout_with_samples(1_000, 2);
        let capacity = Capacity::plan(&layout, &format_with_bits(16), &params(4, 100)).unwrap();

        assert!(capacity.check_declared(446).is_ok());
        assert!(matches!(
            capacity.check_declared(100_000),
            Err(StegError::InconsistentLength {
                declared: 100_000,
                max: 446
            })
        ));
    }
}

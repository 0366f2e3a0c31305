//! Density-controlled LSB bit packing over raw PCM sample bytes.
//!
//! A payload byte is split into `8 / density` groups of `density` bits,
//! most-significant group first, and each group replaces the low bits of
//! one sample's first byte. PCM samples are little endian, so the first
//! byte of a sample is its least significant one; the stride between
//! touched bytes is the sample width.

/// The hide/extract primitive, fixed to one density and sample stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsbCodec {
    density: u8,
    bytes_per_sample: usize,
}

impl LsbCodec {
    /// `density` must be one of 1, 2, 4 or 8; callers resolve and
    /// validate it before building a codec.
    pub fn new(density: u8, bytes_per_sample: usize) -> Self {
        debug_assert!(matches!(density, 1 | 2 | 4 | 8));
        debug_assert!(bytes_per_sample > 0);
        Self {
            density,
            bytes_per_sample,
        }
    }

    /// samples needed to carry one payload byte
    pub fn samples_per_byte(&self) -> usize {
        (8 / self.density) as usize
    }

    /// sample-region bytes consumed per payload byte
    pub fn sample_cost(&self) -> usize {
        self.samples_per_byte() * self.bytes_per_sample
    }

    /// Packs one payload byte into the low bits of the next
    /// `samples_per_byte` samples of `samples`, in place.
    ///
    /// The original low bits are overwritten without being read, so a
    /// bit-identical group still counts as a write.
    pub fn pack_byte(&self, byte: u8, samples: &mut [u8]) {
        // u16 detour keeps the shifts defined for density 8
        let keep_mask = (0xFFu16 << self.density) as u8;
        let take_shift = 8 - self.density;
        let mut remaining = byte;
        let mut pos = 0;

        for _ in 0..self.samples_per_byte() {
            let sample = &mut samples[pos];
            *sample = (*sample & keep_mask) | (remaining >> take_shift);
            remaining = ((u16::from(remaining)) << self.density) as u8;
            pos += self.bytes_per_sample;
        }
    }

    /// Inverse of [`pack_byte`](Self::pack_byte): re-assembles one payload
    /// byte from the low bits of the next `samples_per_byte` samples.
    pub fn unpack_byte(&self, samples: &[u8]) -> u8 {
        let low_mask = !((0xFFu16 << self.density) as u8);
        let mut acc = 0u8;
        let mut pos = 0;

        for _ in 0..self.samples_per_byte() {
            acc = ((u16::from(acc) << self.density) as u8) | (samples[pos] & low_mask);
            pos += self.bytes_per_sample;
        }

        acc
    }

    /// Packs a whole payload block; `samples` must hold at least
    /// `payload.len() * sample_cost()` bytes.
    pub fn pack_block(&self, payload: &[u8], samples: &mut [u8]) {
        let cost = self.sample_cost();
        for (i, &byte) in payload.iter().enumerate() {
            self.pack_byte(byte, &mut samples[i * cost..]);
        }
    }

    /// Unpacks `payload.len()` bytes out of `samples`.
    pub fn unpack_block(&self, samples: &[u8], payload: &mut [u8]) {
        let cost = self.sample_cost();
        for (i, byte) in payload.iter_mut().enumerate() {
            *byte = self.unpack_byte(&samples[i * cost..]);
        }
    }
}

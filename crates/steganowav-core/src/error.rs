use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegError {
    /// Represents a carrier whose first four bytes are not the RIFF magic
    #[error("Not a RIFF file")]
    NotRiff,

    /// Represents a truncated or corrupted carrier. The RIFF header declares
    /// the file size minus 8 bytes, which has to match the size on disk.
    #[error("Damaged file: declared RIFF chunk size {declared} + 8 does not match the file size of {actual} bytes")]
    SizeMismatch { declared: u32, actual: u64 },

    /// Represents a RIFF container that does not hold WAVE audio
    #[error("Not a WAVE file")]
    NotWave,

    /// Represents a missing or malformed `fmt ` chunk before the `data` chunk
    #[error("Missing or malformed `fmt ` chunk before the `data` chunk")]
    MissingFormatChunk,

    /// Represents a compressed or otherwise non-PCM audio format
    #[error("Only uncompressed PCM audio is supported, got audio format {0}")]
    UnsupportedCodec(u16),

    /// Represents a sample size the codec cannot address byte-wise
    #[error("Unsupported sample size of {0} bits, must be a non-zero multiple of 8")]
    UnsupportedBitDepth(u16),

    /// Represents a `data` chunk too small to hold a single sample
    #[error("The data chunk contains no samples")]
    NoSamples,

    /// Represents a density outside of the accepted set, it is never clamped
    #[error("Invalid density {0}, must be 1, 2, 4 or 8 (0 selects one by sample size)")]
    InvalidDensity(u8),

    /// Represents a density that would distort more than half of the sample's bit depth
    #[error("Density of {density} is too high for a sample size of {bits_per_sample} bits")]
    DensityTooHigh { density: u8, bits_per_sample: u16 },

    /// Represents a sample offset behind which not even the length prefix fits
    #[error("Sample offset {offset} exceeds the maximum of {max} for this file")]
    OffsetTooLarge { offset: u32, max: u32 },

    /// Represents a payload bigger than the room behind the chosen offset
    #[error("Payload of {needed} bytes does not fit, at most {available} bytes can be hidden behind this offset")]
    PayloadTooLarge { needed: u64, available: u64 },

    /// Represents an implausible hidden length found at extract time,
    /// usually caused by a wrong offset, seed or density
    #[error("Inconsistent length: hidden size of {declared} bytes exceeds the maximum payload of {max} bytes, maybe a wrong offset?")]
    InconsistentLength { declared: u32, max: u32 },

    /// Represents a failure to read from the carrier or the payload file.
    #[error("Read error")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write the carrier or the recovered payload.
    #[error("Write error")]
    WriteError { source: std::io::Error },

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

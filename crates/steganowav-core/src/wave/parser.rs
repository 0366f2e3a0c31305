use std::io::{Read, Seek, SeekFrom};
use std::time::Duration;

use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;

use super::{WaveFormat, WaveHeader, WaveLayout};
use crate::error::StegError;
use crate::result::Result;

const RIFF_MAGIC: &[u8; 4] = b"RIFF";
const WAVE_MAGIC: &[u8; 4] = b"WAVE";
const FMT_CHUNK_ID: &[u8; 4] = b"fmt ";
const DATA_CHUNK_ID: &[u8; 4] = b"data";

/// Canonical length of the `fmt ` chunk, longer ones carry an extension tail.
const FMT_CHUNK_LEN: u32 = 16;

const PCM_FORMAT: u16 = 1;

/// One sub-chunk header as it appears in the stream. The chunk body is
/// left for the consumer: parsed for `Format`, claimed for `Data` and
/// seeked over for `Other`.
#[derive(Debug)]
enum ChunkHeader {
    Format(u32),
    Data(u32),
    Other([u8; 4], u32),
}

fn next_chunk<R: Read>(input: &mut R) -> Result<ChunkHeader> {
    let mut id = [0u8; 4];
    input.read_exact(&mut id)?;
    let len = input.read_u32::<LittleEndian>()?;

    Ok(match &id {
        FMT_CHUNK_ID => ChunkHeader::Format(len),
        DATA_CHUNK_ID => ChunkHeader::Data(len),
        _ => ChunkHeader::Other(id, len),
    })
}

/// Validates the RIFF/WAVE structure of `input` and locates the PCM samples.
///
/// `file_size` is the size of the underlying file on disk; the RIFF header
/// must account for all of it, anything else means truncation or damage.
pub fn parse_header<R: Read + Seek>(input: &mut R, file_size: u64) -> Result<WaveHeader> {
    let mut magic = [0u8; 4];

    input.read_exact(&mut magic)?;
    if &magic != RIFF_MAGIC {
        return Err(StegError::NotRiff);
    }

    let declared = input.read_u32::<LittleEndian>()?;
    if u64::from(declared) + 8 != file_size {
        return Err(StegError::SizeMismatch {
            declared,
            actual: file_size,
        });
    }

    input.read_exact(&mut magic)?;
    if &magic != WAVE_MAGIC {
        return Err(StegError::NotWave);
    }

    let mut format: Option<WaveFormat> = None;
    let mut canonical = true;

    // chunk loop, stops once the samples are located
    let (first_sample_offset, data_size) = loop {
        match next_chunk(input)? {
            ChunkHeader::Format(len) => {
                format = Some(parse_format_chunk(input, len, &mut canonical)?);
            }
            ChunkHeader::Data(len) => {
                break (input.stream_position()?, len);
            }
            ChunkHeader::Other(id, len) => {
                debug!(
                    "skipping chunk {:?} ({} bytes)",
                    String::from_utf8_lossy(&id),
                    len
                );
                canonical = false;
                input.seek(SeekFrom::Current(i64::from(len)))?;
            }
        }
    };

    let format = format.ok_or(StegError::MissingFormatChunk)?;
    if format.audio_format != PCM_FORMAT {
        return Err(StegError::UnsupportedCodec(format.audio_format));
    }
    if format.bits_per_sample == 0 || format.bits_per_sample % 8 != 0 {
        return Err(StegError::UnsupportedBitDepth(format.bits_per_sample));
    }

    let bytes_per_sample = u32::from(format.bits_per_sample) / 8;
    let total_samples = data_size / bytes_per_sample;
    if total_samples == 0 {
        return Err(StegError::NoSamples);
    }

    let duration = if format.byte_rate > 0 {
        Duration::from_secs_f64(f64::from(data_size) / f64::from(format.byte_rate))
    } else {
        Duration::ZERO
    };

    Ok(WaveHeader {
        format,
        layout: WaveLayout {
            bytes_per_sample,
            first_sample_offset,
            data_size,
            total_samples,
            duration,
            canonical,
        },
    })
}

fn parse_format_chunk<R: Read + Seek>(
    input: &mut R,
    len: u32,
    canonical: &mut bool,
) -> Result<WaveFormat> {
    if len < FMT_CHUNK_LEN {
        return Err(StegError::MissingFormatChunk);
    }

    let format = WaveFormat {
        audio_format: input.read_u16::<LittleEndian>()?,
        channel_count: input.read_u16::<LittleEndian>()?,
        sample_rate: input.read_u32::<LittleEndian>()?,
        byte_rate: input.read_u32::<LittleEndian>()?,
        block_align: input.read_u16::<LittleEndian>()?,
        bits_per_sample: input.read_u16::<LittleEndian>()?,
    };

    if len > FMT_CHUNK_LEN {
        // WAVE extensible-format tail, irrelevant for PCM
        *canonical = false;
        input.seek(SeekFrom::Current(i64::from(len - FMT_CHUNK_LEN)))?;
    }

    Ok(format)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use byteorder::WriteBytesExt;

    use super::*;

    /// assembles a WAVE file byte by byte, with full control over every field
    struct WaveBuilder {
        bytes: Vec<u8>,
    }

    impl WaveBuilder {
        fn new() -> Self {
            Self {
                bytes: b"RIFF\0\0\0\0WAVE".to_vec(),
            }
        }

        fn chunk(mut self, id: &[u8; 4], body: &[u8]) -> Self {
            self.bytes.extend_from_slice(id);
            self.bytes
                .write_u32::<LittleEndian>(body.len() as u32)
                .unwrap();
            self.bytes.extend_from_slice(body);
            self
        }

        fn fmt_chunk(self, audio_format: u16, bits_per_sample: u16) -> Self {
            self.fmt_chunk_with_tail(audio_format, bits_per_sample, &[])
        }

        fn fmt_chunk_with_tail(self, audio_format: u16, bits_per_sample: u16, tail: &[u8]) -> Self {
            let channels = 1u16;
            let sample_rate = 44_100u32;
            let bytes_per_sample = bits_per_sample / 8;
            let mut body = Vec::new();
            body.write_u16::<LittleEndian>(audio_format).unwrap();
            body.write_u16::<LittleEndian>(channels).unwrap();
            body.write_u32::<LittleEndian>(sample_rate).unwrap();
            body.write_u32::<LittleEndian>(sample_rate * u32::from(bytes_per_sample))
                .unwrap();
            body.write_u16::<LittleEndian>(bytes_per_sample).unwrap();
            body.write_u16::<LittleEndian>(bits_per_sample).unwrap();
            body.extend_from_slice(tail);
            self.chunk(b"fmt ", &body)
        }

        fn data_chunk(self, samples: &[u8]) -> Self {
            self.chunk(b"data", samples)
        }

        /// patches the RIFF size so it matches the assembled bytes
        fn build(mut self) -> Vec<u8> {
            let riff_size = (self.bytes.len() - 8) as u32;
            self.bytes[4..8].copy_from_slice(&riff_size.to_le_bytes());
            self.bytes
        }
    }

    fn parse(bytes: Vec<u8>) -> Result<WaveHeader> {
        let file_size = bytes.len() as u64;
        parse_header(&mut Cursor::new(bytes), file_size)
    }

    #[test]
    fn parses_a_minimal_canonical_file() {
        let bytes = WaveBuilder::new()
            .fmt_chunk(1, 16)
            .data_chunk(&[0u8; 8])
            .build();

        let header = parse(bytes).expect("canonical file should parse");
        assert_eq!(header.format.bits_per_sample, 16);
        assert_eq!(header.format.channel_count, 1);
        assert_eq!(header.layout.bytes_per_sample, 2);
        assert_eq!(header.layout.first_sample_offset, 44);
        assert_eq!(header.layout.data_size, 8);
        assert_eq!(header.layout.total_samples, 4);
        assert!(header.layout.canonical);
    }

    #[test]
    fn rejects_a_non_riff_file() {
        let mut bytes = WaveBuilder::new()
            .fmt_chunk(1, 16)
            .data_chunk(&[0u8; 8])
            .build();
        bytes[..4].copy_from_slice(b"OGGS");

        assert!(matches!(parse(bytes), Err(StegError::NotRiff)));
    }

    #[test]
    fn rejects_a_truncated_file() {
        let mut bytes = WaveBuilder::new()
            .fmt_chunk(1, 16)
            .data_chunk(&[0u8; 8])
            .build();
        bytes.truncate(bytes.len() - 3);

        assert!(matches!(
            parse(bytes),
            Err(StegError::SizeMismatch { declared: 44, actual: 49 })
        ));
    }

    #[test]
    fn rejects_a_riff_file_that_is_not_wave() {
        let mut bytes = WaveBuilder::new()
            .fmt_chunk(1, 16)
            .data_chunk(&[0u8; 8])
            .build();
        bytes[8..12].copy_from_slice(b"AVI ");

        assert!(matches!(parse(bytes), Err(StegError::NotWave)));
    }

    #[test]
    fn rejects_non_pcm_audio() {
        let bytes = WaveBuilder::new()
            .fmt_chunk(3, 32)
            .data_chunk(&[0u8; 8])
            .build();

        assert!(matches!(parse(bytes), Err(StegError::UnsupportedCodec(3))));
    }

    #[test]
    fn rejects_data_without_a_preceding_fmt_chunk() {
        let bytes = WaveBuilder::new().data_chunk(&[0u8; 8]).build();

        assert!(matches!(parse(bytes), Err(StegError::MissingFormatChunk)));
    }

    #[test]
    fn rejects_sample_sizes_that_are_not_byte_aligned() {
        let bytes = WaveBuilder::new()
            .fmt_chunk(1, 12)
            .data_chunk(&[0u8; 8])
            .build();

        assert!(matches!(
            parse(bytes),
            Err(StegError::UnsupportedBitDepth(12))
        ));
    }

    #[test]
    fn rejects_an_empty_data_chunk() {
        let bytes = WaveBuilder::new().fmt_chunk(1, 16).data_chunk(&[]).build();

        assert!(matches!(parse(bytes), Err(StegError::NoSamples)));
    }

    #[test]
    fn skips_unknown_chunks_before_data() {
        let bytes = WaveBuilder::new()
            .fmt_chunk(1, 16)
            .chunk(b"LIST", b"INFOsome metadata")
            .data_chunk(&[0u8; 8])
            .build();

        let header = parse(bytes).expect("unknown chunks must not abort parsing");
        assert_eq!(header.layout.total_samples, 4);
        // 44 canonical bytes + skipped chunk header and body
        assert_eq!(header.layout.first_sample_offset, 44 + 8 + 17);
        assert!(!header.layout.canonical);
    }

    #[test]
    fn skips_the_fmt_extension_tail() {
        let bytes = WaveBuilder::new()
            .fmt_chunk_with_tail(1, 16, &[0u8; 6])
            .data_chunk(&[0u8; 8])
            .build();

        let header = parse(bytes).expect("extended fmt chunk should parse");
        assert_eq!(header.format.bits_per_sample, 16);
        assert_eq!(header.layout.first_sample_offset, 44 + 6);
        assert!(!header.layout.canonical);
    }

    #[test]
    fn computes_the_duration_from_the_byte_rate() {
        let bytes = WaveBuilder::new()
            .fmt_chunk(1, 16)
            .data_chunk(&vec![0u8; 88_200])
            .build();

        let header = parse(bytes).unwrap();
        assert_eq!(header.layout.duration, Duration::from_secs(1));
    }
}

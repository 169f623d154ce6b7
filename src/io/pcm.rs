//! Canonical 16-bit PCM WAVE container.
//!
//! ```text
//! offset  size  field
//!      0     4  "RIFF"
//!      4     4  file length - 8
//!      8     4  "WAVE"
//!     12     4  "fmt "
//!     16     4  16 (fmt chunk size)
//!     20     2  1 (PCM)
//!     22     2  channel count
//!     24     4  sample rate
//!     28     4  byte rate = rate * channels * 2
//!     32     2  block align = channels * 2
//!     34     2  16 (bits per sample)
//!     36     4  "data"
//!     40     4  data length = frames * channels * 2
//!     44     -  interleaved i16 samples, little endian
//! ```
//!
//! Quantization is deliberately asymmetric: negative samples scale by 32768,
//! non-negative ones by 32767, and the product is truncated toward zero.

use crate::error::{Result, SpatialError};
use crate::io::SampleBuffer;

pub const HEADER_LEN: usize = 44;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = 2;
const FORMAT_PCM: u16 = 1;

/// Bring a sample into [-1, 1]. NaN maps to silence.
#[inline]
pub fn clamp_sample(sample: f32) -> f32 {
    if sample.is_nan() {
        0.0
    } else {
        sample.clamp(-1.0, 1.0)
    }
}

/// Clamp then quantize one sample to 16 bits.
#[inline]
pub fn quantize(sample: f32) -> i16 {
    let s = clamp_sample(sample);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Serializes sample buffers into WAVE bytes.
pub struct PcmEncoder;

impl PcmEncoder {
    /// Encode `buffer` as a complete WAVE file (header + data chunk).
    ///
    /// This is the single place where samples are clamped to [-1, 1].
    pub fn encode(buffer: &SampleBuffer) -> Result<Vec<u8>> {
        let channels = buffer.channel_count();
        let frames = buffer.frames();
        let data_len = frames
            .checked_mul(channels * BYTES_PER_SAMPLE)
            .filter(|&len| len + HEADER_LEN - 8 <= u32::MAX as usize)
            .ok_or_else(|| {
                SpatialError::InvalidBuffer(format!(
                    "{frames} frames x {channels} channels exceeds the WAVE size limit"
                ))
            })?;
        let channel_field = u16::try_from(channels).map_err(|_| {
            SpatialError::InvalidBuffer(format!("{channels} channels exceeds the WAVE limit"))
        })?;
        let block_align = channel_field
            .checked_mul(BYTES_PER_SAMPLE as u16)
            .ok_or_else(|| {
                SpatialError::InvalidBuffer(format!("{channels} channels overflow the block align field"))
            })?;

        let total_len = HEADER_LEN + data_len;
        let mut out = Vec::new();
        out.try_reserve_exact(total_len)
            .map_err(|_| SpatialError::AllocationFailure { samples: total_len })?;

        write_header(&mut out, channel_field, block_align, buffer.sample_rate(), data_len as u32);

        let planes = buffer.channels();
        for i in 0..frames {
            for plane in planes {
                out.extend_from_slice(&quantize(plane[i]).to_le_bytes());
            }
        }

        tracing::debug!(frames, channels, bytes = out.len(), "encoded PCM container");
        Ok(out)
    }
}

fn write_header(out: &mut Vec<u8>, channels: u16, block_align: u16, sample_rate: u32, data_len: u32) {
    let byte_rate = sample_rate.wrapping_mul(block_align as u32);

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(data_len + HEADER_LEN as u32 - 8).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
}

/// Format fields recovered from a canonical header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub frames: usize,
}

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Parse the 44-byte canonical header written by [`PcmEncoder`].
pub fn read_header(bytes: &[u8]) -> Result<PcmHeader> {
    let invalid = |msg: &str| SpatialError::InvalidContainer(msg.to_string());

    if bytes.len() < HEADER_LEN {
        return Err(invalid("shorter than the 44-byte header"));
    }
    if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(invalid("missing RIFF/WAVE tags"));
    }
    if &bytes[12..16] != b"fmt " || u32_at(bytes, 16) != 16 {
        return Err(invalid("expected a 16-byte fmt chunk"));
    }
    if &bytes[36..40] != b"data" {
        return Err(invalid("missing data chunk"));
    }
    if u16_at(bytes, 20) != FORMAT_PCM {
        return Err(invalid("format tag is not integer PCM"));
    }

    let channels = u16_at(bytes, 22);
    let bits_per_sample = u16_at(bytes, 34);
    if channels == 0 || bits_per_sample != BITS_PER_SAMPLE {
        return Err(invalid("only 16-bit PCM with at least one channel is supported"));
    }

    let data_len = u32_at(bytes, 40) as usize;
    if bytes.len() < HEADER_LEN + data_len {
        return Err(invalid("data chunk is truncated"));
    }

    Ok(PcmHeader {
        channels,
        sample_rate: u32_at(bytes, 24),
        bits_per_sample,
        frames: data_len / (channels as usize * BYTES_PER_SAMPLE),
    })
}

/// Decode a container produced by [`PcmEncoder`] back to floating point.
///
/// Samples are rescaled with the same asymmetric factors used for encoding.
pub fn decode_pcm16(bytes: &[u8]) -> Result<SampleBuffer> {
    let header = read_header(bytes)?;
    let channel_count = header.channels as usize;
    let data = &bytes[HEADER_LEN..HEADER_LEN + header.frames * channel_count * BYTES_PER_SAMPLE];

    let samples: Vec<f32> = data
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|pair| {
            let v = i16::from_le_bytes([pair[0], pair[1]]);
            if v < 0 {
                v as f32 / 32768.0
            } else {
                v as f32 / 32767.0
            }
        })
        .collect();

    SampleBuffer::from_interleaved(&samples, channel_count, header.sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_asymmetry() {
        assert_eq!(quantize(1.0), 32767);
        assert_eq!(quantize(-1.0), -32768);
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(0.5), 16383); // 16383.5 truncated
        assert_eq!(quantize(-0.5), -16384);
    }

    #[test]
    fn test_quantize_clamps_and_zeroes_nan() {
        assert_eq!(quantize(3.0), 32767);
        assert_eq!(quantize(-7.5), -32768);
        assert_eq!(quantize(f32::NAN), 0);
        assert_eq!(quantize(f32::INFINITY), 32767);
        assert_eq!(quantize(f32::NEG_INFINITY), -32768);
    }

    #[test]
    fn test_header_layout() {
        let buffer = SampleBuffer::stereo(vec![0.0; 10], vec![0.0; 10], 44_100).unwrap();
        let bytes = PcmEncoder::encode(&buffer).unwrap();

        assert_eq!(bytes.len(), 44 + 10 * 2 * 2);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32_at(&bytes, 4), (bytes.len() - 8) as u32);
        assert_eq!(&bytes[8..16], b"WAVEfmt ");
        assert_eq!(u32_at(&bytes, 16), 16);
        assert_eq!(u16_at(&bytes, 20), 1);
        assert_eq!(u16_at(&bytes, 22), 2);
        assert_eq!(u32_at(&bytes, 24), 44_100);
        assert_eq!(u32_at(&bytes, 28), 44_100 * 4);
        assert_eq!(u16_at(&bytes, 32), 4);
        assert_eq!(u16_at(&bytes, 34), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32_at(&bytes, 40), 40);
    }

    #[test]
    fn test_samples_are_frame_major_little_endian() {
        let buffer = SampleBuffer::stereo(vec![1.0, 0.0], vec![-1.0, 0.5], 8_000).unwrap();
        let bytes = PcmEncoder::encode(&buffer).unwrap();
        let data = &bytes[HEADER_LEN..];

        assert_eq!(&data[0..2], &32767i16.to_le_bytes());
        assert_eq!(&data[2..4], &(-32768i16).to_le_bytes());
        assert_eq!(&data[4..6], &0i16.to_le_bytes());
        assert_eq!(&data[6..8], &16383i16.to_le_bytes());
    }

    #[test]
    fn test_read_back_within_one_step() {
        let left: Vec<f32> = (0..64).map(|i| (i as f32 * 0.3).sin() * 0.9).collect();
        let right: Vec<f32> = left.iter().map(|s| -s * 1.5).collect();
        let buffer = SampleBuffer::stereo(left, right, 22_050).unwrap();

        let bytes = PcmEncoder::encode(&buffer).unwrap();
        let header = read_header(&bytes).unwrap();
        assert_eq!(header.channels, 2);
        assert_eq!(header.sample_rate, 22_050);
        assert_eq!(header.frames, 64);

        let decoded = decode_pcm16(&bytes).unwrap();
        for c in 0..2 {
            for (orig, back) in buffer.channel(c).iter().zip(decoded.channel(c)) {
                let expected = clamp_sample(*orig);
                assert!((expected - back).abs() <= 1.0 / 32767.0 + 1e-6, "{expected} vs {back}");
            }
        }
    }

    #[test]
    fn test_read_header_rejects_garbage() {
        assert!(read_header(b"RIFF").is_err());
        let mut bytes = PcmEncoder::encode(&SampleBuffer::mono(vec![0.0; 4], 8_000).unwrap()).unwrap();
        bytes[8] = b'X';
        assert!(matches!(read_header(&bytes), Err(SpatialError::InvalidContainer(_))));
    }

    #[test]
    fn test_empty_buffer_is_header_only() {
        let buffer = SampleBuffer::silence(2, 0, 48_000).unwrap();
        let bytes = PcmEncoder::encode(&buffer).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN);
        assert_eq!(read_header(&bytes).unwrap().frames, 0);
    }
}

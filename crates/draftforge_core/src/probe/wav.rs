//! Duration from a RIFF/WAVE header.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use super::{DurationProbe, ProbeError, ProbeResult};
use crate::timing::MICROS_PER_SECOND;

/// Reads `fmt ` and `data` chunk sizes from a WAV file.
///
/// Duration is `data_size / byte_rate`. Streams written without a final
/// size (data size `0xFFFFFFFF` or larger than the file) use the bytes
/// actually present.
pub struct WavHeaderProbe;

impl DurationProbe for WavHeaderProbe {
    fn name(&self) -> &str {
        "wav-header"
    }

    fn probe(&self, path: &Path) -> ProbeResult<i64> {
        let is_wav = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
        if !is_wav {
            return Err(ProbeError::Unsupported {
                probe: self.name().to_string(),
                path: path.to_path_buf(),
            });
        }

        let io_err = |source| ProbeError::Io {
            path: path.to_path_buf(),
            source,
        };
        let invalid = |message: &str| ProbeError::InvalidHeader {
            path: path.to_path_buf(),
            message: message.to_string(),
        };

        let mut file = File::open(path).map_err(io_err)?;
        let file_len = file.metadata().map_err(io_err)?.len();

        let mut riff = [0u8; 12];
        file.read_exact(&mut riff).map_err(|_| invalid("file too short"))?;
        if &riff[0..4] != b"RIFF" || &riff[8..12] != b"WAVE" {
            return Err(invalid("missing RIFF/WAVE signature"));
        }

        let mut byte_rate: Option<u32> = None;
        loop {
            let mut header = [0u8; 8];
            if file.read_exact(&mut header).is_err() {
                return Err(invalid("no data chunk"));
            }
            let id = &header[0..4];
            let size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

            match id {
                b"fmt " => {
                    if size < 16 {
                        return Err(invalid("fmt chunk too small"));
                    }
                    // Only the fixed PCM prefix matters; extension bytes are skipped.
                    let mut fmt = [0u8; 16];
                    file.read_exact(&mut fmt)
                        .map_err(|_| invalid("truncated fmt chunk"))?;
                    byte_rate = Some(u32::from_le_bytes([fmt[8], fmt[9], fmt[10], fmt[11]]));
                    let rest = i64::from(size - 16) + i64::from(size % 2);
                    if rest > 0 {
                        file.seek(SeekFrom::Current(rest)).map_err(io_err)?;
                    }
                }
                b"data" => {
                    let rate = byte_rate.ok_or_else(|| invalid("data chunk before fmt"))?;
                    if rate == 0 {
                        return Err(invalid("byte rate is zero"));
                    }
                    let position = file.stream_position().map_err(io_err)?;
                    let available = file_len.saturating_sub(position);
                    let data_size = if size == u32::MAX || u64::from(size) > available {
                        available
                    } else {
                        u64::from(size)
                    };
                    let micros = u128::from(data_size) * MICROS_PER_SECOND as u128
                        / u128::from(rate);
                    return Ok(micros as i64);
                }
                _ => {
                    let skip = i64::from(size) + i64::from(size % 2);
                    file.seek(SeekFrom::Current(skip)).map_err(io_err)?;
                }
            }
        }
    }
}

/// Build a PCM WAV file in memory (test helper shared with other modules).
#[cfg(test)]
pub(crate) fn pcm_wav_bytes(sample_rate: u32, channels: u16, bits: u16, samples: u32) -> Vec<u8> {
    let block_align = channels * bits / 8;
    let byte_rate = sample_rate * u32::from(block_align);
    let data_size = samples * u32::from(block_align);

    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_size).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
    out.resize(out.len() + data_size as usize, 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_pcm_duration() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("voice.wav");
        // 2 seconds of 8kHz mono 16-bit.
        fs::write(&path, pcm_wav_bytes(8_000, 1, 16, 16_000)).unwrap();

        assert_eq!(WavHeaderProbe.probe(&path).unwrap(), 2_000_000);
    }

    #[test]
    fn skips_unknown_chunks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("voice.wav");
        let mut bytes = pcm_wav_bytes(8_000, 1, 8, 4_000);
        // Insert a LIST chunk with an odd size between fmt and data.
        let list: Vec<u8> = [&b"LIST"[..], &3u32.to_le_bytes()[..], &b"abc"[..], &[0u8][..]].concat();
        bytes.splice(36..36, list);
        fs::write(&path, bytes).unwrap();

        assert_eq!(WavHeaderProbe.probe(&path).unwrap(), 500_000);
    }

    #[test]
    fn extended_fmt_chunk_is_skipped_past() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("voice.wav");
        let mut bytes = pcm_wav_bytes(8_000, 1, 16, 8_000);
        // fmt size 18 with a zero cbSize field.
        bytes[16..20].copy_from_slice(&18u32.to_le_bytes());
        bytes.splice(36..36, [0u8, 0u8]);
        fs::write(&path, bytes).unwrap();

        assert_eq!(WavHeaderProbe.probe(&path).unwrap(), 1_000_000);
    }

    #[test]
    fn oversized_fmt_chunk_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("voice.wav");
        let mut bytes = pcm_wav_bytes(8_000, 1, 16, 100);
        bytes[16..20].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());
        fs::write(&path, bytes).unwrap();

        let err = WavHeaderProbe.probe(&path).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidHeader { .. }));
    }

    #[test]
    fn undersized_fmt_chunk_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("voice.wav");
        let mut bytes = pcm_wav_bytes(8_000, 1, 16, 100);
        bytes[16..20].copy_from_slice(&8u32.to_le_bytes());
        fs::write(&path, bytes).unwrap();

        let err = WavHeaderProbe.probe(&path).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidHeader { .. }));
    }

    #[test]
    fn rejects_non_wav_extension() {
        let err = WavHeaderProbe.probe(Path::new("voice.mp3")).unwrap_err();
        assert!(matches!(err, ProbeError::Unsupported { .. }));
    }

    #[test]
    fn rejects_bad_signature() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("voice.wav");
        fs::write(&path, b"not a wave file at all").unwrap();

        let err = WavHeaderProbe.probe(&path).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidHeader { .. }));
    }
}

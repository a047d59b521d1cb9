//! WAV encoding and decoding for PCM audio.

use crate::FormatError;
use binrw::{BinRead, BinReaderExt};
use pg_engine::Frame;
use pg_ir::{RawSample, PCM_MIDPOINT};
use std::io::{Cursor, Write};

// --- Writing ---

/// Write 16-bit stereo PCM from rendered frames.
pub fn write_wav(w: &mut impl Write, frames: &[Frame], sample_rate: u32) -> std::io::Result<()> {
    let num_channels: u16 = 2;
    let bits_per_sample: u16 = 16;
    let block_align = num_channels * (bits_per_sample / 8);
    let data_size = frames.len() as u32 * block_align as u32;

    write_riff_header(w, data_size)?;
    write_fmt_chunk(w, num_channels, sample_rate, block_align, bits_per_sample)?;
    w.write_all(b"data")?;
    w.write_all(&data_size.to_le_bytes())?;
    for frame in frames {
        w.write_all(&frame.left.to_le_bytes())?;
        w.write_all(&frame.right.to_le_bytes())?;
    }
    Ok(())
}

pub fn frames_to_wav(frames: &[Frame], sample_rate: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    write_wav(&mut buf, frames, sample_rate).expect("Vec<u8> write cannot fail");
    buf
}

/// Write a raw sample as 16-bit mono PCM at its own rate.
pub fn write_sample_wav(w: &mut impl Write, sample: &RawSample) -> std::io::Result<()> {
    let bits_per_sample: u16 = 16;
    let block_align = bits_per_sample / 8;
    let data_size = sample.len() as u32 * block_align as u32;

    write_riff_header(w, data_size)?;
    write_fmt_chunk(w, 1, sample.sample_rate, block_align, bits_per_sample)?;
    w.write_all(b"data")?;
    w.write_all(&data_size.to_le_bytes())?;
    for pos in 0..sample.len() {
        w.write_all(&sample.get_signed(pos).to_le_bytes())?;
    }
    Ok(())
}

pub fn sample_to_wav(sample: &RawSample) -> Vec<u8> {
    let mut buf = Vec::new();
    write_sample_wav(&mut buf, sample).expect("Vec<u8> write cannot fail");
    buf
}

fn write_riff_header(w: &mut impl Write, data_size: u32) -> std::io::Result<()> {
    w.write_all(b"RIFF")?;
    w.write_all(&(36 + data_size).to_le_bytes())?;
    w.write_all(b"WAVE")
}

fn write_fmt_chunk(
    w: &mut impl Write,
    num_channels: u16,
    sample_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
) -> std::io::Result<()> {
    w.write_all(b"fmt ")?;
    w.write_all(&16u32.to_le_bytes())?;
    w.write_all(&PCM_FORMAT_TAG.to_le_bytes())?;
    w.write_all(&num_channels.to_le_bytes())?;
    w.write_all(&sample_rate.to_le_bytes())?;
    w.write_all(&(sample_rate * block_align as u32).to_le_bytes())?;
    w.write_all(&block_align.to_le_bytes())?;
    w.write_all(&bits_per_sample.to_le_bytes())
}

// --- Reading ---

const PCM_FORMAT_TAG: u16 = 1;
const RIFF_HEADER_LEN: u64 = 12;
const CHUNK_HEADER_LEN: u64 = 8;
const FMT_CHUNK_LEN: u32 = 16;

#[derive(BinRead)]
#[br(magic = b"RIFF")]
struct RiffHeader {
    _file_size: u32,
    form: [u8; 4],
}

#[derive(BinRead)]
struct ChunkHeader {
    id: [u8; 4],
    size: u32,
}

#[derive(BinRead)]
struct FmtChunk {
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    _byte_rate: u32,
    _block_align: u16,
    bits_per_sample: u16,
}

/// Load a mono PCM WAV file from raw bytes.
///
/// 16-bit signed samples are shifted onto the unsigned range; 8-bit
/// unsigned samples are scaled up by 256.
pub fn load_wav(data: &[u8]) -> Result<RawSample, FormatError> {
    if data.len() < 44 {
        return Err(FormatError::UnexpectedEof);
    }

    let mut cursor = Cursor::new(data);
    let riff: RiffHeader = cursor.read_le()?;
    if &riff.form != b"WAVE" {
        return Err(FormatError::InvalidHeader);
    }

    let (fmt, pcm) = find_chunks(&mut cursor)?;
    let fmt = fmt.ok_or(FormatError::InvalidHeader)?;
    let pcm = pcm.ok_or(FormatError::InvalidHeader)?;

    if fmt.format_tag != PCM_FORMAT_TAG {
        return Err(FormatError::UnsupportedFormat(fmt.format_tag));
    }
    if fmt.channels != 1 {
        return Err(FormatError::UnsupportedChannels(fmt.channels));
    }
    if fmt.sample_rate == 0 {
        return Err(FormatError::ZeroSampleRate);
    }

    let samples = match fmt.bits_per_sample {
        8 => read_8bit_mono(pcm),
        16 => read_16bit_mono(pcm)?,
        bits => return Err(FormatError::UnsupportedBitDepth(bits)),
    };
    Ok(RawSample::new(samples, fmt.sample_rate))
}

/// Walk the RIFF chunk list, returning the `fmt ` chunk and the PCM bytes.
fn find_chunks<'a>(
    cursor: &mut Cursor<&'a [u8]>,
) -> Result<(Option<FmtChunk>, Option<&'a [u8]>), FormatError> {
    let data: &'a [u8] = *cursor.get_ref();
    let len = data.len() as u64;
    let mut pos = RIFF_HEADER_LEN;
    let mut fmt = None;
    let mut pcm = None;

    while pos + CHUNK_HEADER_LEN <= len {
        cursor.set_position(pos);
        let header: ChunkHeader = cursor.read_le()?;
        let body = pos + CHUNK_HEADER_LEN;

        if &header.id == b"fmt " {
            if header.size < FMT_CHUNK_LEN {
                return Err(FormatError::InvalidHeader);
            }
            fmt = Some(cursor.read_le::<FmtChunk>()?);
        } else if &header.id == b"data" {
            let end = body + header.size as u64;
            if end > len {
                return Err(FormatError::UnexpectedEof);
            }
            pcm = Some(&data[body as usize..end as usize]);
        }

        pos = body + header.size as u64;
        if pos % 2 != 0 {
            pos += 1;
        }
    }

    Ok((fmt, pcm))
}

/// 8-bit WAV is unsigned with centre 128.
fn read_8bit_mono(raw: &[u8]) -> Vec<u16> {
    raw.iter().map(|&b| (b as u16) << 8).collect()
}

/// A trailing half sample means the payload was cut short.
fn read_16bit_mono(raw: &[u8]) -> Result<Vec<u16>, FormatError> {
    if raw.len() % 2 != 0 {
        return Err(FormatError::UnexpectedEof);
    }
    Ok(raw
        .chunks_exact(2)
        .map(|c| {
            let signed = i16::from_le_bytes([c[0], c[1]]);
            (signed as i32 + PCM_MIDPOINT as i32) as u16
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a minimal WAV file from raw parameters.
    fn make_wav(format: u16, channels: u16, sample_rate: u32, bits: u16, pcm_data: &[u8]) -> Vec<u8> {
        let block_align = channels * (bits / 8);
        let byte_rate = sample_rate * block_align as u32;
        let data_size = pcm_data.len() as u32;
        let file_size = 36 + data_size;

        let mut buf = Vec::new();
        buf.extend(b"RIFF");
        buf.extend(&file_size.to_le_bytes());
        buf.extend(b"WAVE");
        buf.extend(b"fmt ");
        buf.extend(&16u32.to_le_bytes());
        buf.extend(&format.to_le_bytes());
        buf.extend(&channels.to_le_bytes());
        buf.extend(&sample_rate.to_le_bytes());
        buf.extend(&byte_rate.to_le_bytes());
        buf.extend(&block_align.to_le_bytes());
        buf.extend(&bits.to_le_bytes());
        buf.extend(b"data");
        buf.extend(&data_size.to_le_bytes());
        buf.extend(pcm_data);
        buf
    }

    fn pcm16(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn load_8bit_mono() {
        let wav = make_wav(1, 1, 22050, 8, &[128, 255, 0, 192]);
        let sample = load_wav(&wav).unwrap();
        assert_eq!(sample.sample_rate, 22050);
        assert_eq!(sample.data(), &[32768, 65280, 0, 49152]);
    }

    #[test]
    fn load_16bit_mono() {
        let wav = make_wav(1, 1, 16000, 16, &pcm16(&[0, 1000, -1000, 32767, -32768]));
        let sample = load_wav(&wav).unwrap();
        assert_eq!(sample.sample_rate, 16000);
        assert_eq!(sample.data(), &[32768, 33768, 31768, 65535, 0]);
    }

    #[test]
    fn unknown_chunks_are_skipped() {
        let plain = make_wav(1, 1, 8000, 16, &pcm16(&[5, 6]));
        // Odd-sized LIST chunk (plus pad byte) ahead of "fmt ".
        let mut wav = plain[..12].to_vec();
        wav.extend(b"LIST");
        wav.extend(&3u32.to_le_bytes());
        wav.extend(&[1, 2, 3, 0]);
        wav.extend(&plain[12..]);
        let sample = load_wav(&wav).unwrap();
        assert_eq!(sample.len(), 2);
        assert_eq!(sample.get_signed(1), 6);
    }

    #[test]
    fn stereo_rejected() {
        let wav = make_wav(1, 2, 44100, 16, &pcm16(&[1, 2, 3, 4]));
        assert_eq!(load_wav(&wav), Err(FormatError::UnsupportedChannels(2)));
    }

    #[test]
    fn compressed_rejected() {
        let wav = make_wav(3, 1, 44100, 32, &[0; 8]);
        assert_eq!(load_wav(&wav), Err(FormatError::UnsupportedFormat(3)));
    }

    #[test]
    fn odd_bit_depth_rejected() {
        let wav = make_wav(1, 1, 44100, 24, &[0; 6]);
        assert_eq!(load_wav(&wav), Err(FormatError::UnsupportedBitDepth(24)));
    }

    #[test]
    fn invalid_header_rejected() {
        let mut wav = make_wav(1, 1, 8000, 8, &[128; 8]);
        wav[0..4].copy_from_slice(b"RIFX");
        assert_eq!(load_wav(&wav), Err(FormatError::InvalidHeader));

        let mut wav = make_wav(1, 1, 8000, 8, &[128; 8]);
        wav[8..12].copy_from_slice(b"AVI ");
        assert_eq!(load_wav(&wav), Err(FormatError::InvalidHeader));
    }

    #[test]
    fn missing_data_chunk_rejected() {
        let mut wav = make_wav(1, 1, 8000, 8, &[128; 8]);
        wav[36..40].copy_from_slice(b"junk");
        assert_eq!(load_wav(&wav), Err(FormatError::InvalidHeader));
    }

    #[test]
    fn zero_sample_rate_rejected() {
        let sample = RawSample::new(vec![1000; 32], 8000);
        let mut wav = sample_to_wav(&sample);
        wav[24..28].copy_from_slice(&0u32.to_le_bytes());
        assert_eq!(load_wav(&wav), Err(FormatError::ZeroSampleRate));
    }

    #[test]
    fn data_chunk_past_end_rejected() {
        let mut wav = make_wav(1, 1, 8000, 16, &pcm16(&[1, 2, 3, 4]));
        wav[40..44].copy_from_slice(&64u32.to_le_bytes());
        assert_eq!(load_wav(&wav), Err(FormatError::UnexpectedEof));
    }

    #[test]
    fn odd_16bit_payload_rejected() {
        let wav = make_wav(1, 1, 8000, 16, &[0, 1, 2, 3, 4]);
        assert_eq!(load_wav(&wav), Err(FormatError::UnexpectedEof));
    }

    #[test]
    fn too_short_rejected() {
        assert_eq!(load_wav(&[0; 10]), Err(FormatError::UnexpectedEof));
    }

    #[test]
    fn sample_wav_decodes_to_same_sample() {
        let sample = RawSample::new(vec![0, 32768, 65535, 12345], 11025);
        let decoded = load_wav(&sample_to_wav(&sample)).unwrap();
        assert_eq!(decoded, sample);
    }

    #[test]
    fn frames_wav_has_stereo_header() {
        let wav = frames_to_wav(&[Frame::mono(1), Frame::mono(-1)], 48000);
        assert_eq!(wav.len(), 44 + 8);
        assert_eq!(&wav[22..24], &2u16.to_le_bytes());
        assert_eq!(&wav[24..28], &48000u32.to_le_bytes());
    }
}

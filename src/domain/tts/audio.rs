use super::error::SynthesisError;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use serde::Serialize;
use std::io::Cursor;

/// Codec name for signed linear PCM
pub const CODEC_PCM_SIGNED: &str = "PCM_SIGNED";

/// Container name for RIFF/WAVE audio
pub const CONTAINER_WAVE: &str = "WAVE";

/// Audio encodings the backends can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    /// Uncompressed 16-bit signed little-endian samples in a WAV container
    Linear16,
}

impl AudioEncoding {
    /// Resolve a caller codec into a backend encoding
    pub fn for_codec(codec: &str) -> Result<Self, SynthesisError> {
        if codec.eq_ignore_ascii_case(CODEC_PCM_SIGNED) {
            Ok(AudioEncoding::Linear16)
        } else {
            Err(SynthesisError::UnsupportedCodec(codec.to_string()))
        }
    }

    /// File extension used for cache entries of this encoding
    pub fn extension(&self) -> &'static str {
        match self {
            AudioEncoding::Linear16 => "wav",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    Int,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub channels: u16,
    pub sample_kind: SampleKind,
}

impl AudioFormat {
    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits_per_sample / 8)
    }

    pub fn frame_size(&self) -> usize {
        self.bytes_per_sample() * usize::from(self.channels)
    }

    fn from_spec(spec: WavSpec) -> Result<Self, SynthesisError> {
        let sample_kind = match spec.sample_format {
            SampleFormat::Int => SampleKind::Int,
            SampleFormat::Float => SampleKind::Float,
        };
        let supported = match sample_kind {
            SampleKind::Int => matches!(spec.bits_per_sample, 8 | 16 | 24 | 32),
            SampleKind::Float => spec.bits_per_sample == 32,
        };
        if !supported || spec.channels == 0 {
            return Err(SynthesisError::BackendProtocol(format!(
                "unsupported WAV layout: {} channels, {}-bit {:?}",
                spec.channels, spec.bits_per_sample, sample_kind
            )));
        }

        Ok(Self {
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            channels: spec.channels,
            sample_kind,
        })
    }

    fn to_spec(self) -> WavSpec {
        WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: match self.sample_kind {
                SampleKind::Int => SampleFormat::Int,
                SampleKind::Float => SampleFormat::Float,
            },
        }
    }
}

/// Decoded PCM audio: interleaved little-endian samples plus their format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    format: AudioFormat,
    pcm: Vec<u8>,
}

impl AudioClip {
    pub fn new(format: AudioFormat, pcm: Vec<u8>) -> Result<Self, SynthesisError> {
        if format.frame_size() == 0 || pcm.len() % format.frame_size() != 0 {
            return Err(SynthesisError::FormatMismatch(format!(
                "{} bytes is not a whole number of {}-byte frames",
                pcm.len(),
                format.frame_size()
            )));
        }
        Ok(Self { format, pcm })
    }

    /// Decode a WAV file as returned by a backend
    pub fn from_wav(bytes: &[u8]) -> Result<Self, SynthesisError> {
        let mut reader = WavReader::new(Cursor::new(bytes))
            .map_err(|e| SynthesisError::BackendProtocol(format!("invalid WAV data: {}", e)))?;
        let format = AudioFormat::from_spec(reader.spec())?;
        let width = format.bytes_per_sample();

        // the header's data length is untrusted; decoded PCM never outgrows the input
        let declared = (reader.len() as usize).saturating_mul(width);
        let mut pcm = Vec::with_capacity(declared.min(bytes.len()));
        match format.sample_kind {
            SampleKind::Int => {
                for sample in reader.samples::<i32>() {
                    let sample = sample.map_err(truncated)?;
                    pcm.extend_from_slice(&sample.to_le_bytes()[..width]);
                }
            }
            SampleKind::Float => {
                for sample in reader.samples::<f32>() {
                    let sample = sample.map_err(truncated)?;
                    pcm.extend_from_slice(&sample.to_le_bytes());
                }
            }
        }

        Self::new(format, pcm)
    }

    /// Parse only the WAV header, e.g. to report the format of cached audio
    pub fn probe_wav(bytes: &[u8]) -> Result<(AudioFormat, u64), SynthesisError> {
        let reader = WavReader::new(Cursor::new(bytes))
            .map_err(|e| SynthesisError::BackendProtocol(format!("invalid WAV data: {}", e)))?;
        let format = AudioFormat::from_spec(reader.spec())?;
        Ok((format, u64::from(reader.duration())))
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn pcm(&self) -> &[u8] {
        &self.pcm
    }

    pub fn frames(&self) -> u64 {
        (self.pcm.len() / self.format.frame_size()) as u64
    }

    /// Encode as a single WAV file; the header carries this clip's frame count
    pub fn to_wav(&self) -> Result<Vec<u8>, SynthesisError> {
        let mut cursor = Cursor::new(Vec::with_capacity(44 + self.pcm.len()));
        let mut writer = WavWriter::new(&mut cursor, self.format.to_spec()).map_err(encoding)?;
        let width = self.format.bytes_per_sample();

        for raw in self.pcm.chunks_exact(width) {
            match self.format.sample_kind {
                SampleKind::Int => {
                    // sign-extend the little-endian sample to i32
                    let mut bytes = [0u8; 4];
                    bytes[4 - width..].copy_from_slice(raw);
                    let sample = i32::from_le_bytes(bytes) >> (8 * (4 - width));
                    writer.write_sample(sample).map_err(encoding)?;
                }
                SampleKind::Float => {
                    let sample = f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
                    writer.write_sample(sample).map_err(encoding)?;
                }
            }
        }
        writer.finalize().map_err(encoding)?;

        Ok(cursor.into_inner())
    }
}

fn truncated(err: hound::Error) -> SynthesisError {
    SynthesisError::BackendProtocol(format!("truncated WAV data: {}", err))
}

fn encoding(err: hound::Error) -> SynthesisError {
    SynthesisError::FormatMismatch(format!("could not encode WAV: {}", err))
}

/// Concatenates same-format clips in the given order.
pub struct AudioStitcher;

impl AudioStitcher {
    pub fn stitch(clips: &[AudioClip]) -> Result<AudioClip, SynthesisError> {
        let first = clips.first().ok_or_else(|| {
            SynthesisError::FormatMismatch("no audio clips to stitch".to_string())
        })?;
        let format = first.format();

        for (index, clip) in clips.iter().enumerate().skip(1) {
            if clip.format() != format {
                return Err(SynthesisError::FormatMismatch(format!(
                    "clip {} is {:?}, expected {:?}",
                    index,
                    clip.format(),
                    format
                )));
            }
        }

        let total_len = clips.iter().map(|c| c.pcm.len()).sum();
        let mut pcm = Vec::with_capacity(total_len);
        for clip in clips {
            pcm.extend_from_slice(&clip.pcm);
        }

        let stitched = AudioClip::new(format, pcm)?;
        tracing::debug!(
            clip_count = clips.len(),
            total_frames = stitched.frames(),
            sample_rate = format.sample_rate,
            "Audio clips stitched"
        );

        Ok(stitched)
    }
}

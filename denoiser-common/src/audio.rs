//! WAV decoding and encoding
//!
//! Decoding goes through symphonia and keeps only the first channel of the
//! stream. Encoding writes mono 32-bit float WAV through hound.

use crate::{Error, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Audio buffer decoded from an uploaded file
#[derive(Debug, Clone)]
pub struct DecodedSignal {
    /// First-channel samples (f32, range [-1.0, 1.0])
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count of the source file
    pub channels: usize,
}

/// Audio buffer produced by a denoising engine
#[derive(Debug, Clone, PartialEq)]
pub struct DenoisedSignal {
    /// Mono samples (f32, range [-1.0, 1.0])
    pub samples: Vec<f32>,
    /// Sample rate in Hz, which may differ from the input rate
    pub sample_rate: u32,
}

impl DenoisedSignal {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }
}

/// Decode a WAV file, keeping the first channel only
///
/// # Errors
/// * File I/O errors
/// * Unsupported or corrupt container/codec
pub fn decode_wav(file_path: &Path) -> Result<DecodedSignal> {
    tracing::debug!(path = %file_path.display(), "Decoding audio file");

    let file = std::fs::File::open(file_path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("wav");

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::Decode("No audio track found in file".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::Decode("Sample rate unknown".to_string()))?;
    let channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .ok_or_else(|| Error::Decode("Channels unknown".to_string()))?;

    tracing::debug!(
        path = %file_path.display(),
        sample_rate = sample_rate,
        channels = channels,
        "Audio file info"
    );

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                // End of stream
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet)?;
        let spec = *decoded.spec();
        let frame_channels = spec.channels.count().max(1);

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);

        // Interleaved layout: the first channel sits at every frame_channels-th slot
        samples.extend(buffer.samples().iter().step_by(frame_channels));
    }

    tracing::debug!(
        path = %file_path.display(),
        total_samples = samples.len(),
        "Audio decoding complete"
    );

    Ok(DecodedSignal {
        samples,
        sample_rate,
        channels,
    })
}

/// Write a mono signal as a 32-bit float WAV file
pub fn encode_wav(file_path: &Path, signal: &DenoisedSignal) -> Result<()> {
    if signal.sample_rate == 0 {
        return Err(Error::Encode("Sample rate must be positive".to_string()));
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: signal.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(file_path, spec)?;
    for &sample in &signal.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    tracing::debug!(
        path = %file_path.display(),
        samples = signal.samples.len(),
        sample_rate = signal.sample_rate,
        "Audio encoding complete"
    );

    Ok(())
}

use std::cell::OnceCell;
use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CodecRegistry, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::{Hint, Probe};

use crate::error::AnalysisError;

/// Decoded audio in planar layout: one sample vector per channel, all the
/// same length, values nominally in [-1.0, 1.0].
pub struct WaveformBuffer {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl WaveformBuffer {
    /// Track length in seconds (frames / sample rate).
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.channels
            .first()
            .map_or(0.0, |c| c.len() as f64 / self.sample_rate as f64)
    }

    /// The first channel, which is the one the feature extractor reads.
    pub fn primary_channel(&self) -> &[f32] {
        self.channels.first().map_or(&[], |c| c.as_slice())
    }
}

/// The container probe and codec registry, shared across every decode in a
/// session.
struct DecodeContext {
    probe: &'static Probe,
    codecs: &'static CodecRegistry,
}

/// Gateway to the audio decoder. The decode context is acquired lazily on
/// first use and reused for every subsequent file, so constructing a
/// `Decoder` is free and acquiring the context twice is idempotent.
///
/// Not `Sync`: decoding is strictly sequential, one waveform at a time.
pub struct Decoder {
    context: OnceCell<DecodeContext>,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            context: OnceCell::new(),
        }
    }

    fn context(&self) -> &DecodeContext {
        self.context.get_or_init(|| {
            log::debug!("Acquiring shared decode context");
            DecodeContext {
                probe: symphonia::default::get_probe(),
                codecs: symphonia::default::get_codecs(),
            }
        })
    }

    /// Decode a complete in-memory byte stream into a waveform.
    ///
    /// `ext_hint` is the file extension, if known; it only seeds the format
    /// probe, which still sniffs the real container type. Empty input and
    /// streams that yield no frames are rejected rather than returned as
    /// degenerate buffers.
    pub fn decode(
        &self,
        data: Vec<u8>,
        ext_hint: Option<&str>,
    ) -> Result<WaveformBuffer, AnalysisError> {
        if data.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let ctx = self.context();

        let mss = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = ext_hint {
            hint.with_extension(ext);
        }

        let probed = ctx
            .probe
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| AnalysisError::Decode(e.to_string()))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AnalysisError::Decode("no audio tracks found".into()))?;

        let track_id = track.id;
        let channel_count = track.codec_params.channels.map_or(1, |c| c.count()).max(1);
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| AnalysisError::Decode("unknown sample rate".into()))?;

        let mut decoder = ctx
            .codecs
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AnalysisError::Decode(e.to_string()))?;

        let mut channels: Vec<Vec<f32>> = vec![Vec::new(); channel_count];

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => return Err(AnalysisError::Decode(e.to_string())),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                // A single corrupt packet is not fatal; resync on the next one.
                Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
                Err(e) => return Err(AnalysisError::Decode(e.to_string())),
            };

            let spec = *decoded.spec();
            let num_frames = decoded.frames();

            let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);

            // De-interleave into the planar buffers.
            for frame in sample_buf.samples().chunks(channel_count) {
                for (ch, &sample) in frame.iter().enumerate() {
                    channels[ch].push(sample);
                }
            }
        }

        if channels.first().map_or(true, |c| c.is_empty()) {
            return Err(AnalysisError::Decode("no audio frames decoded".into()));
        }

        let wave = WaveformBuffer {
            channels,
            sample_rate,
        };

        log::debug!(
            "Decoded audio: {} channels, {}Hz, {:.1}s",
            wave.channels.len(),
            wave.sample_rate,
            wave.duration()
        );

        Ok(wave)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

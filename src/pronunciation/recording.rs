use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::pronunciation::scoring::similarity_score;

#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    #[error("cannot decode {path}: {source}")]
    Wav {
        path: String,
        #[source]
        source: hound::Error,
    },
    #[error("{0} contains no samples")]
    Empty(String),
}

/// First channel of a WAV stream, scaled to -1.0..=1.0.
pub fn decode_first_channel<R: Read>(reader: WavReader<R>) -> Result<Vec<f32>, hound::Error> {
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));
    match spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().step_by(channels).collect(),
        SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .into_samples::<i32>()
                .step_by(channels)
                .map(|s| s.map(|v| v as f32 / scale))
                .collect()
        }
    }
}

pub fn read_recording(path: &Path) -> Result<Vec<f32>, RecordingError> {
    let wav_error = |source| RecordingError::Wav {
        path: path.display().to_string(),
        source,
    };
    let reader = WavReader::open(path).map_err(wav_error)?;
    log::debug!("decoding {} ({:?})", path.display(), reader.spec());
    let samples = decode_first_channel(reader).map_err(wav_error)?;
    if samples.is_empty() {
        return Err(RecordingError::Empty(path.display().to_string()));
    }
    Ok(samples)
}

/// Scores the learner's recording at `attempt` against the native clip.
pub fn score_files(native: &Path, attempt: &Path) -> Result<u8, RecordingError> {
    let native = read_recording(native)?;
    let attempt = read_recording(attempt)?;
    Ok(similarity_score(&native, &attempt))
}

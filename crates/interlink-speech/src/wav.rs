//! WAV decoding into mono f32 PCM.

use std::io::Cursor;

use crate::error::SpeechError;

/// Decode WAV bytes into mono samples in [-1.0, 1.0] plus the sample rate.
///
/// Multi-channel audio is downmixed by averaging each frame.
pub fn decode_wav(bytes: &[u8]) -> Result<(Vec<f32>, u32), SpeechError> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let channels = usize::from(spec.channels.max(1));
    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    if samples.is_empty() {
        return Err(SpeechError::InvalidAudio("recording contains no samples".into()));
    }

    tracing::debug!(
        samples = samples.len(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        "WAV decoded"
    );

    Ok((samples, spec.sample_rate))
}

/// Resample mono PCM to `target_rate` by linear interpolation.
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || source_rate == 0 || target_rate == 0 || samples.is_empty() {
        return samples.to_vec();
    }

    let step = f64::from(source_rate) / f64::from(target_rate);
    let last = samples.len() - 1;
    let out_len = (samples.len() as f64 / step).ceil() as usize;

    (0..out_len)
        .map(|n| {
            let pos = n as f64 * step;
            let lo = (pos as usize).min(last);
            let hi = (lo + 1).min(last);
            let weight = (pos - lo as f64) as f32;
            samples[lo] + (samples[hi] - samples[lo]) * weight
        })
        .collect()
}

/// Encode mono 16-bit PCM as WAV bytes.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, SpeechError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for sample in samples {
            writer.write_sample(*sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_mono_16bit() {
        let bytes = encode_wav(&[0, 16384, -16384, i16::MAX], 16_000).unwrap();
        let (samples, rate) = decode_wav(&bytes).unwrap();
        assert_eq!(rate, 16_000);
        assert_eq!(samples.len(), 4);
        assert!((samples[0]).abs() < f32::EPSILON);
        assert!((samples[1] - 0.5).abs() < 1e-4);
        assert!((samples[2] + 0.5).abs() < 1e-4);
        assert!(samples[3] > 0.99);
    }

    #[test]
    fn test_decode_stereo_downmixes() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for s in [16384i16, 0, -16384, -16384] {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        let (samples, rate) = decode_wav(&cursor.into_inner()).unwrap();
        assert_eq!(rate, 8_000);
        assert_eq!(samples.len(), 2);
        assert!((samples[0] - 0.25).abs() < 1e-4);
        assert!((samples[1] + 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_resample_downsamples_constant_signal() {
        let out = resample(&[0.5f32; 48_000], 48_000, 16_000);
        assert_eq!(out.len(), 16_000);
        assert!(out.iter().all(|s| (s - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_resample_interpolates_upwards() {
        let out = resample(&[0.0, 1.0], 8_000, 16_000);
        assert_eq!(out.len(), 4);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert!((out[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_resample_same_rate_is_identity() {
        assert_eq!(resample(&[0.1, 0.2], 16_000, 16_000), vec![0.1, 0.2]);
    }

    #[test]
    fn test_decode_garbage_is_invalid_audio() {
        let result = decode_wav(b"definitely not a wav file");
        assert!(matches!(result, Err(SpeechError::InvalidAudio(_))));
    }

    #[test]
    fn test_decode_empty_recording_is_invalid_audio() {
        let bytes = encode_wav(&[], 16_000).unwrap();
        let result = decode_wav(&bytes);
        assert!(matches!(result, Err(SpeechError::InvalidAudio(_))));
    }
}

//! Simulated video-to-MP3 conversion.
//!
//! No demuxer and no encoder live here. The routine sleeps through a delay
//! proportional to the input size, reports ten progress steps, and hands
//! back the embedded silent MP3 with a size figure derived from the quality
//! tier. Real transcoding would go through something like ffmpeg instead.

use std::sync::Arc;
use std::time::Duration;

use rust_embed::RustEmbed;
use thiserror::Error;

use crate::blob;
use crate::model::{ConversionOptions, ConversionResult, Quality, SourceFile};

/// Static assets compiled into the binary.
#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Asset;

/// Name of the canned audio payload inside `assets/` (one second of silence).
const SILENT_MP3: &str = "silence.mp3";

/// Simulated track duration stamped on every result, in seconds.
const MOCK_DURATION_SECS: u64 = 180;

/// Number of progress steps reported per run.
const TOTAL_STEPS: u32 = 10;

/// Simulated processing cost: 500 ms per MiB of input, capped at 10 s.
const MS_PER_MIB: f64 = 500.0;
const MAX_PROCESSING_MS: f64 = 10_000.0;

/// Faults the simulated pipeline can hit.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("embedded audio payload `{0}` is missing from the binary")]
    MissingAsset(&'static str),
}

/// Runs one simulated conversion.
///
/// Sleeps through ten equal time slices, invoking `on_progress` with
/// 10, 20, …, 100 ahead of each slice, then registers the canned payload
/// and returns its descriptor.
pub async fn convert_video_to_mp3(
    source: &SourceFile,
    options: ConversionOptions,
    mut on_progress: impl FnMut(f32),
) -> Result<ConversionResult, ConvertError> {
    if options.include_video.unwrap_or(false) {
        log::debug!("include_video requested; the simulated pipeline ignores it");
    }

    let step = processing_time(source.size_bytes) / TOTAL_STEPS;

    for i in 1..=TOTAL_STEPS {
        on_progress(i as f32 * (100.0 / TOTAL_STEPS as f32));
        tokio::time::sleep(step).await;
    }

    let payload = Asset::get(SILENT_MP3).ok_or(ConvertError::MissingAsset(SILENT_MP3))?;
    let handle = blob::register(Arc::from(payload.data.as_ref()));

    Ok(ConversionResult {
        handle,
        filename: mp3_filename(&source.name),
        duration_secs: MOCK_DURATION_SECS,
        size_bytes: simulated_size(source.size_bytes, options.quality),
        quality: options.quality,
    })
}

/// Artificial delay proportional to the input size, capped at 10 s.
fn processing_time(size_bytes: u64) -> Duration {
    let ms = (size_bytes as f64 / (1024.0 * 1024.0) * MS_PER_MIB).min(MAX_PROCESSING_MS);
    Duration::from_millis(ms as u64)
}

/// The declared output size: a fixed fraction of the input keyed by quality.
fn simulated_size(input_bytes: u64, quality: Quality) -> u64 {
    (input_bytes as f64 * quality.size_multiplier()) as u64
}

/// Replaces the input's extension with `.mp3`. A name without an extension
/// gets `.mp3` appended; a leading dot alone does not count as one.
fn mp3_filename(input: &str) -> String {
    let stem = match input.rfind('.') {
        Some(i) if i > 0 => &input[..i],
        _ => input,
    };
    format!("{stem}.mp3")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn source(name: &str, size_bytes: u64) -> SourceFile {
        SourceFile {
            name: name.to_string(),
            path: PathBuf::from(name),
            size_bytes,
            media_type: "video/mp4".to_string(),
        }
    }

    fn options(quality: Quality) -> ConversionOptions {
        ConversionOptions {
            quality,
            include_video: None,
        }
    }

    #[test]
    fn filename_replaces_the_extension() {
        assert_eq!(mp3_filename("clip.mov"), "clip.mp3");
        assert_eq!(mp3_filename("archive.tar.gz"), "archive.tar.mp3");
    }

    #[test]
    fn filename_appends_when_there_is_no_extension() {
        assert_eq!(mp3_filename("noext"), "noext.mp3");
        assert_eq!(mp3_filename(".hidden"), ".hidden.mp3");
    }

    #[test]
    fn processing_time_scales_with_size_and_is_capped() {
        assert_eq!(processing_time(0), Duration::ZERO);
        assert_eq!(processing_time(1024 * 1024), Duration::from_millis(500));
        assert_eq!(processing_time(200 * 1024 * 1024), Duration::from_millis(10_000));
    }

    #[tokio::test]
    async fn reports_exactly_ten_increasing_steps() {
        let mut steps = Vec::new();
        let result = convert_video_to_mp3(&source("clip.mp4", 1000), options(Quality::Low), |p| {
            steps.push(p)
        })
        .await
        .unwrap();

        let expected: Vec<f32> = (1..=10).map(|i| i as f32 * 10.0).collect();
        assert_eq!(steps, expected);
        blob::release(&result.handle);
    }

    #[tokio::test]
    async fn output_size_is_a_quality_keyed_fraction() {
        for (quality, expected) in [
            (Quality::Low, 100u64),
            (Quality::Medium, 200),
            (Quality::High, 300),
        ] {
            let result = convert_video_to_mp3(&source("clip.mp4", 1000), options(quality), |_| {})
                .await
                .unwrap();
            assert_eq!(result.size_bytes, expected);
            assert_eq!(result.quality, quality);
            blob::release(&result.handle);
        }
    }

    #[tokio::test]
    async fn result_resolves_to_the_embedded_audio() {
        let result = convert_video_to_mp3(&source("clip.mov", 4096), options(Quality::Medium), |_| {})
            .await
            .unwrap();

        assert_eq!(result.filename, "clip.mp3");
        assert_eq!(result.duration_secs, 180);
        let payload = blob::resolve(&result.handle).expect("payload should be registered");
        // the canned file is a real MP3 with an ID3v2 header
        assert_eq!(&payload[..3], b"ID3");
        blob::release(&result.handle);
    }
}

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::blob::DownloadHandle;

/// Audio quality tier selected by the user.
///
/// The tier is a label: it scales the simulated output size and shows up in
/// the result card, but no encoder runs at any bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    /// Smallest simulated output (advertised as 128 kbps)
    Low,
    /// Middle tier (advertised as 256 kbps)
    #[default]
    Medium,
    /// Largest simulated output (advertised as 320 kbps)
    High,
}

impl Quality {
    /// All tiers in the order the dropdown lists them
    pub const ALL: [Quality; 3] = [Quality::Low, Quality::Medium, Quality::High];

    /// Fraction of the input size the simulated output claims to be
    pub fn size_multiplier(self) -> f64 {
        match self {
            Quality::Low => 0.1,
            Quality::Medium => 0.2,
            Quality::High => 0.3,
        }
    }

    /// Dropdown label with the advertised bitrate
    pub fn label(self) -> &'static str {
        match self {
            Quality::Low => "Low (128 kbps)",
            Quality::Medium => "Medium (256 kbps)",
            Quality::High => "High (320 kbps)",
        }
    }

    /// Bare tier name for the result card
    pub fn name(self) -> &'static str {
        match self {
            Quality::Low => "Low",
            Quality::Medium => "Medium",
            Quality::High => "High",
        }
    }
}

/// Options chosen per conversion request.
#[derive(Debug, Clone, Copy)]
pub struct ConversionOptions {
    /// Quality tier to stamp on the result
    pub quality: Quality,
    /// Carried in the request shape; the simulator ignores it
    pub include_video: Option<bool>,
}

/// A video file the user selected via the picker or drag-and-drop.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name including extension
    pub name: String,
    /// Path the file was selected from
    pub path: PathBuf,
    /// Size in bytes as reported by the filesystem
    pub size_bytes: u64,
    /// Declared media type guessed from the extension
    pub media_type: String,
}

/// Why a picked or dropped file was not accepted as a source.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("`{media_type}` is not a video type")]
    NotVideo { media_type: String },
    #[error("could not read file metadata: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceFile {
    /// Builds a source from a local path.
    ///
    /// Only files whose declared media type starts with `video/` are
    /// accepted; everything else is rejected before any state changes.
    pub fn from_path(path: &Path) -> Result<Self, SelectError> {
        let media_type = media_type_for(path);
        if !media_type.starts_with("video/") {
            return Err(SelectError::NotVideo { media_type });
        }
        let size_bytes = std::fs::metadata(path)?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            path: path.to_path_buf(),
            size_bytes,
            media_type,
        })
    }
}

/// Guesses a media type from the file extension.
pub fn media_type_for(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("mpg") | Some("mpeg") => "video/mpeg",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Descriptor of one completed (simulated) conversion.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Registry handle resolving to the produced MP3 payload
    pub handle: DownloadHandle,
    /// Output file name (input stem + ".mp3")
    pub filename: String,
    /// Simulated track duration in seconds
    pub duration_secs: u64,
    /// Simulated output size in bytes
    pub size_bytes: u64,
    /// Quality tier the result was produced with
    pub quality: Quality,
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One entry in the toast queue shown by the UI.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn media_types_cover_common_video_extensions() {
        assert_eq!(media_type_for(Path::new("a.mp4")), "video/mp4");
        assert_eq!(media_type_for(Path::new("a.MOV")), "video/quicktime");
        assert_eq!(media_type_for(Path::new("a.webm")), "video/webm");
        assert_eq!(media_type_for(Path::new("a.txt")), "text/plain");
        assert_eq!(media_type_for(Path::new("a")), "application/octet-stream");
    }

    #[test]
    fn video_files_are_accepted_with_their_size() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("clip.mp4");
        fs::write(&path, vec![0u8; 2048]).unwrap();

        let source = SourceFile::from_path(&path).unwrap();
        assert_eq!(source.name, "clip.mp4");
        assert_eq!(source.size_bytes, 2048);
        assert_eq!(source.media_type, "video/mp4");
    }

    #[test]
    fn non_video_files_are_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"not a video").unwrap();

        match SourceFile::from_path(&path) {
            Err(SelectError::NotVideo { media_type }) => assert_eq!(media_type, "text/plain"),
            other => panic!("expected NotVideo rejection, got {other:?}"),
        }
    }

    #[test]
    fn missing_files_surface_the_io_error() {
        let result = SourceFile::from_path(Path::new("/definitely/missing/clip.mp4"));
        assert!(matches!(result, Err(SelectError::Io(_))));
    }
}

//! Transcript artifacts on disk.
//!
//! One `.txt` file per ingested video under the transcripts directory,
//! named `<video_id>_<sanitized_title>.txt`. The deterministic name means
//! re-scraping the same video lands on the same path. Files are written
//! once on first successful scrape and never mutated.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::Result;
use crate::scraper::VideoListing;

static STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("static regex"));
static COLLAPSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("static regex"));

/// Maximum sanitized-title length in the filename.
const TITLE_LIMIT: usize = 50;

/// A transcript artifact written to disk.
#[derive(Debug, Clone)]
pub struct TranscriptRecord {
    /// YouTube video id
    pub video_id: String,

    /// Video title
    pub title: String,

    /// Watch URL
    pub url: String,

    /// Where the artifact lives
    pub local_path: PathBuf,
}

/// Directory of transcript artifacts.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    /// Open (creating if needed) the transcript directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Deterministic artifact path for a video.
    pub fn path_for(&self, video_id: &str, title: &str) -> PathBuf {
        self.dir
            .join(format!("{video_id}_{}.txt", sanitize_title(title)))
    }

    /// Write the transcript artifact with its metadata header.
    pub fn save(&self, listing: &VideoListing, transcript: &str) -> Result<TranscriptRecord> {
        let path = self.path_for(&listing.video_id, &listing.title);

        let contents = format!(
            "Video ID: {}\nTitle: {}\nURL: {}\n{}\n\n{}",
            listing.video_id,
            listing.title,
            listing.url,
            "=".repeat(80),
            transcript
        );
        std::fs::write(&path, contents)?;
        debug!(video_id = %listing.video_id, path = %path.display(), "transcript saved");

        Ok(TranscriptRecord {
            video_id: listing.video_id.clone(),
            title: listing.title.clone(),
            url: listing.url.clone(),
            local_path: path,
        })
    }

    /// All saved transcript artifacts, sorted by filename.
    pub fn saved_artifacts(&self) -> Result<Vec<PathBuf>> {
        let mut artifacts = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "txt") {
                artifacts.push(path);
            }
        }
        artifacts.sort();
        Ok(artifacts)
    }

    /// The transcripts directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Sanitize a title for use in a filename: drop everything but word
/// characters, whitespace and dashes, collapse runs to `_`, cap length.
fn sanitize_title(title: &str) -> String {
    let stripped = STRIP_RE.replace_all(title, "");
    let collapsed = COLLAPSE_RE.replace_all(stripped.trim(), "_");
    collapsed.chars().take(TITLE_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn listing(video_id: &str, title: &str) -> VideoListing {
        VideoListing {
            video_id: video_id.to_string(),
            title: title.to_string(),
            url: format!("https://www.youtube.com/watch?v={video_id}"),
        }
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Hello, World!"), "Hello_World");
        assert_eq!(sanitize_title("a  b -- c"), "a_b_c");
        let long = "x".repeat(100);
        assert_eq!(sanitize_title(&long).len(), TITLE_LIMIT);
    }

    #[test]
    fn test_save_writes_header_and_body() {
        let tmp = TempDir::new().unwrap();
        let store = TranscriptStore::new(tmp.path().join("transcripts")).unwrap();

        let record = store
            .save(&listing("vid-1", "Rust: The Video"), "some spoken words")
            .unwrap();

        let contents = std::fs::read_to_string(&record.local_path).unwrap();
        assert!(contents.starts_with("Video ID: vid-1\n"));
        assert!(contents.contains("Title: Rust: The Video\n"));
        assert!(contents.contains("watch?v=vid-1"));
        assert!(contents.ends_with("some spoken words"));
    }

    #[test]
    fn test_deterministic_path_detects_duplicates() {
        let tmp = TempDir::new().unwrap();
        let store = TranscriptStore::new(tmp.path().join("transcripts")).unwrap();

        let first = store.save(&listing("vid-1", "Title"), "one").unwrap();
        let second = store.save(&listing("vid-1", "Title"), "two").unwrap();

        assert_eq!(first.local_path, second.local_path);
        assert_eq!(store.saved_artifacts().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_dir_has_no_artifacts() {
        let tmp = TempDir::new().unwrap();
        let store = TranscriptStore::new(tmp.path().join("transcripts")).unwrap();
        assert!(store.saved_artifacts().unwrap().is_empty());
    }
}

//! Channel scraping.
//!
//! [`ChannelScraper`] is the seam between the coordinator and the outside
//! world: list the most recent videos of a channel, fetch one video's
//! transcript. [`YoutubeScraper`] implements it over plain HTTP: the
//! channel's `/videos` page embeds a `ytInitialData` JSON blob with the
//! listing, and the `timedtext` endpoint serves captions as JSON.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// One video from a channel listing, in listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoListing {
    /// YouTube video id (the `v=` parameter)
    pub video_id: String,

    /// Video title as listed
    pub title: String,

    /// Full watch URL
    pub url: String,
}

/// Source of channel listings and transcripts.
#[async_trait]
pub trait ChannelScraper: Send + Sync {
    /// List up to `max_videos` of the channel's most recent videos, in
    /// the channel's listing order.
    async fn list_videos(&self, channel_url: &str, max_videos: usize) -> Result<Vec<VideoListing>>;

    /// Fetch the transcript text for one video.
    ///
    /// Returns [`IngestError::TranscriptUnavailable`] when the video has
    /// no usable captions.
    async fn fetch_transcript(&self, video_id: &str) -> Result<String>;
}

static INITIAL_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    // The listing page embeds the grid as `var ytInitialData = {...};`
    Regex::new(r"var ytInitialData\s*=\s*(\{.*?\});").expect("static regex")
});

static VIDEO_ID_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:youtube\.com/watch\?v=|youtu\.be/)([\w-]+)",
        r"youtube\.com/embed/([\w-]+)",
        r"youtube\.com/v/([\w-]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex"))
    .collect()
});

/// HTTP-based YouTube scraper.
pub struct YoutubeScraper {
    http: reqwest::Client,
    base_url: String,
}

impl YoutubeScraper {
    /// Create a scraper against youtube.com.
    pub fn new() -> Result<Self> {
        Self::with_base_url("https://www.youtube.com")
    }

    /// Create a scraper against a custom base URL (for tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) tuberag")
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Extract a video id from any of the common watch-URL shapes.
    pub fn extract_video_id(url: &str) -> Option<String> {
        VIDEO_ID_RES
            .iter()
            .find_map(|re| re.captures(url))
            .map(|caps| caps[1].to_string())
    }

    /// Normalize a channel URL to its `/videos` tab.
    fn videos_url(&self, channel_url: &str) -> String {
        // Tests pass a bare path against the mock server; real input is a
        // full channel URL.
        let url = if channel_url.starts_with("http") {
            channel_url.to_string()
        } else {
            format!("{}{}", self.base_url, channel_url)
        };

        if url.contains("/videos") {
            url
        } else if url.ends_with('/') {
            format!("{url}videos")
        } else {
            format!("{url}/videos")
        }
    }

    /// Pull the embedded listing out of the page HTML.
    fn parse_listing(html: &str, max_videos: usize) -> Result<Vec<VideoListing>> {
        let captures = INITIAL_DATA_RE
            .captures(html)
            .ok_or_else(|| IngestError::Scrape("ytInitialData not found in page".to_string()))?;

        let data: Value = serde_json::from_str(&captures[1])
            .map_err(|e| IngestError::Scrape(format!("ytInitialData is not valid JSON: {e}")))?;

        let mut videos = Vec::new();
        collect_video_renderers(&data, max_videos, &mut videos);

        debug!(found = videos.len(), "parsed channel listing");
        Ok(videos)
    }
}

/// Walk the renderer tree in document order collecting `videoRenderer`
/// nodes. The exact nesting shifts with YouTube experiments, so match the
/// node shape rather than a fixed path.
fn collect_video_renderers(value: &Value, max: usize, out: &mut Vec<VideoListing>) {
    if out.len() >= max {
        return;
    }

    match value {
        Value::Object(map) => {
            if let Some(renderer) = map.get("videoRenderer") {
                if let Some(listing) = listing_from_renderer(renderer) {
                    out.push(listing);
                    if out.len() >= max {
                        return;
                    }
                }
            }
            for child in map.values() {
                collect_video_renderers(child, max, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_video_renderers(child, max, out);
            }
        }
        _ => {}
    }
}

fn listing_from_renderer(renderer: &Value) -> Option<VideoListing> {
    let video_id = renderer.get("videoId")?.as_str()?.to_string();
    let title = renderer
        .get("title")?
        .pointer("/runs/0/text")?
        .as_str()?
        .to_string();

    Some(VideoListing {
        url: format!("https://www.youtube.com/watch?v={video_id}"),
        video_id,
        title,
    })
}

#[async_trait]
impl ChannelScraper for YoutubeScraper {
    async fn list_videos(&self, channel_url: &str, max_videos: usize) -> Result<Vec<VideoListing>> {
        let url = self.videos_url(channel_url);
        debug!(%url, max_videos, "fetching channel listing");

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(IngestError::Scrape(format!(
                "channel page returned HTTP {}",
                response.status()
            )));
        }

        let html = response.text().await?;
        Self::parse_listing(&html, max_videos)
    }

    async fn fetch_transcript(&self, video_id: &str) -> Result<String> {
        let url = format!(
            "{}/api/timedtext?v={video_id}&lang=en&fmt=json3",
            self.base_url
        );
        debug!(%url, "fetching transcript");

        let unavailable = |reason: String| IngestError::TranscriptUnavailable {
            video_id: video_id.to_string(),
            reason,
        };

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            // YouTube answers 200 with an empty body when captions are off.
            return Err(unavailable("no caption track".to_string()));
        }

        let data: Value = serde_json::from_str(&body)
            .map_err(|e| unavailable(format!("unparseable captions: {e}")))?;

        let mut segments = Vec::new();
        if let Some(events) = data.get("events").and_then(Value::as_array) {
            for event in events {
                let Some(segs) = event.get("segs").and_then(Value::as_array) else {
                    continue;
                };
                for seg in segs {
                    if let Some(text) = seg.get("utf8").and_then(Value::as_str) {
                        let text = text.trim();
                        if !text.is_empty() {
                            segments.push(text.to_string());
                        }
                    }
                }
            }
        }

        if segments.is_empty() {
            warn!(video_id, "caption track contained no text");
            return Err(unavailable("empty caption track".to_string()));
        }

        Ok(segments.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn listing_page(ids_and_titles: &[(&str, &str)]) -> String {
        let renderers: Vec<String> = ids_and_titles
            .iter()
            .map(|(id, title)| {
                format!(
                    r#"{{"richItemRenderer":{{"content":{{"videoRenderer":{{"videoId":"{id}","title":{{"runs":[{{"text":"{title}"}}]}}}}}}}}}}"#
                )
            })
            .collect();
        format!(
            r#"<html><script>var ytInitialData = {{"contents":[{}]}};</script></html>"#,
            renderers.join(",")
        )
    }

    #[test]
    fn test_extract_video_id_variants() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
        ] {
            assert_eq!(
                YoutubeScraper::extract_video_id(url).as_deref(),
                Some("dQw4w9WgXcQ"),
                "failed for {url}"
            );
        }
        assert!(YoutubeScraper::extract_video_id("https://example.com/").is_none());
    }

    #[test]
    fn test_parse_listing_preserves_order_and_cap() {
        let html = listing_page(&[("vid-1", "First"), ("vid-2", "Second"), ("vid-3", "Third")]);

        let videos = YoutubeScraper::parse_listing(&html, 2).unwrap();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].video_id, "vid-1");
        assert_eq!(videos[0].title, "First");
        assert_eq!(videos[1].video_id, "vid-2");
        assert!(videos[0].url.contains("watch?v=vid-1"));
    }

    #[test]
    fn test_parse_listing_without_initial_data_fails() {
        let err = YoutubeScraper::parse_listing("<html></html>", 5).unwrap_err();
        assert!(matches!(err, IngestError::Scrape(_)));
    }

    #[tokio::test]
    async fn test_list_videos_appends_videos_tab() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/@somechannel/videos"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(listing_page(&[("abc", "Only")])),
            )
            .mount(&mock_server)
            .await;

        let scraper = YoutubeScraper::with_base_url(mock_server.uri()).unwrap();
        let videos = scraper.list_videos("/@somechannel", 5).await.unwrap();

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].video_id, "abc");
    }

    #[tokio::test]
    async fn test_fetch_transcript_joins_segments() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/api/timedtext"))
            .and(matchers::query_param("v", "vid-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "events": [
                    {"segs": [{"utf8": "hello"}, {"utf8": "\n"}]},
                    {"segs": [{"utf8": "world"}]}
                ]
            })))
            .mount(&mock_server)
            .await;

        let scraper = YoutubeScraper::with_base_url(mock_server.uri()).unwrap();
        let transcript = scraper.fetch_transcript("vid-1").await.unwrap();
        assert_eq!(transcript, "hello world");
    }

    #[tokio::test]
    async fn test_missing_captions_is_transcript_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/api/timedtext"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&mock_server)
            .await;

        let scraper = YoutubeScraper::with_base_url(mock_server.uri()).unwrap();
        let err = scraper.fetch_transcript("vid-x").await.unwrap_err();

        assert!(err.is_per_video());
        assert!(matches!(err, IngestError::TranscriptUnavailable { .. }));
    }
}

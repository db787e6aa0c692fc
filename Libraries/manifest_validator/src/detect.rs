use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static DASH_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.mpd(\b|$)").expect("valid pattern"));
static DASH_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<MPD[\s>]").expect("valid pattern"));
static HLS_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.m3u8?(\b|$)").expect("valid pattern"));
static HLS_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#EXTM3U").expect("valid pattern"));
static XML_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*<\?xml|^\s*<\w+").expect("valid pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    Dash,
    Hls,
    Json,
    Plain,
}

/// Guesses what a fetched document is from its URL, body and `Content-Type`.
///
/// Manifest markers in the URL or body win over the content type, since CDNs often serve
/// playlists as `text/plain` or `application/octet-stream`.
pub fn detect_manifest_kind(url: &str, body: &str, content_type: Option<&str>) -> ManifestKind {
    if DASH_URL.is_match(url) || DASH_BODY.is_match(body) {
        return ManifestKind::Dash;
    }
    if HLS_URL.is_match(url) || HLS_BODY.is_match(body) {
        return ManifestKind::Hls;
    }

    let content_type = content_type.unwrap_or("").to_ascii_lowercase();
    if content_type.contains("dash+xml") {
        return ManifestKind::Dash;
    }
    if content_type.contains("mpegurl") {
        return ManifestKind::Hls;
    }

    let trimmed = body.trim_start();
    if content_type.contains("json") || trimmed.starts_with('{') || trimmed.starts_with('[') {
        return ManifestKind::Json;
    }
    if XML_BODY.is_match(body) {
        return ManifestKind::Dash;
    }
    ManifestKind::Plain
}

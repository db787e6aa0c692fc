//! Line-oriented HLS playlist linting.
//!
//! A single pass over the lines tracks one pending directive: `#EXTINF` expects a segment
//! URI and `#EXT-X-STREAM-INF` expects a playlist URI on a following line. Tags seen along the
//! way feed the minimum-version inference. Master playlists then have their children fetched
//! and linted as media playlists.

pub mod attributes;
pub mod version;

use std::collections::HashSet;

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::fetch::PlaylistFetcher;
use crate::result::{plural, ChildPlaylistReport, ValidationResult};
use attributes::AttributeList;
use version::VersionInference;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistType {
    /// Decide from the tags present.
    #[default]
    Auto,
    Master,
    Media,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HlsValidationOptions {
    /// URL the playlist was loaded from; relative child URIs resolve against it.
    pub base_url: Option<String>,
    pub playlist_type: PlaylistType,
}

#[derive(Debug, Clone, Copy)]
enum Pending {
    Segment(usize),
    Variant(usize),
}

impl Pending {
    fn line(self) -> usize {
        match self {
            Pending::Segment(line) | Pending::Variant(line) => line,
        }
    }

    fn unsatisfied(self) -> String {
        let kind = match self {
            Pending::Segment(_) => "segment URI",
            Pending::Variant(_) => "playlist URI",
        };
        format!("Expected {} after directive on line {}.", kind, self.line())
    }
}

#[derive(Debug, Clone)]
struct ChildReference {
    uri: String,
}

/// What one pass over the lines found, before type-specific checks.
#[derive(Default)]
struct LineScan {
    result: ValidationResult,
    media_segments: usize,
    version_seen: bool,
    declared_version: Option<(u32, usize)>,
    stream_infs: usize,
    variants: Vec<ChildReference>,
    renditions: Vec<ChildReference>,
    has_endlist: bool,
    inference: VersionInference,
}

/// Validates an HLS playlist, fetching and validating its children when it is a master
/// playlist and a fetcher is given.
///
/// Each child URL is fetched at most once per call, even when referenced repeatedly. The
/// playlist's own `base_url` counts as visited, so a master listing itself is not refetched.
#[instrument(skip_all, fields(base_url = ?options.base_url))]
pub async fn validate_hls(
    text: &str,
    options: &HlsValidationOptions,
    fetcher: Option<&dyn PlaylistFetcher>,
) -> ValidationResult {
    let mut visited = HashSet::new();
    if let Some(own) = options.base_url.as_deref().map(|base| resolve_uri(base, None)) {
        if !own.is_empty() {
            visited.insert(own);
        }
    }
    validate_playlist(text, options, fetcher, &mut visited).await
}

fn validate_playlist<'a>(
    text: &'a str,
    options: &'a HlsValidationOptions,
    fetcher: Option<&'a dyn PlaylistFetcher>,
    visited: &'a mut HashSet<String>,
) -> BoxFuture<'a, ValidationResult> {
    async move {
        if text.trim().is_empty() {
            return ValidationResult::single_error("Manifest is empty.");
        }

        let scan = scan_lines(text);
        let is_master = match options.playlist_type {
            PlaylistType::Master => true,
            PlaylistType::Media => false,
            PlaylistType::Auto => scan.stream_infs > 0 || !scan.renditions.is_empty(),
        };

        let result = if is_master {
            let (result, children) = check_master(scan);
            match (fetcher, children) {
                (_, None) => result,
                (None, Some(_)) => {
                    let mut result = result;
                    result.warning("Child playlists were not validated (no fetcher provided).", None);
                    result
                }
                (Some(fetcher), Some(children)) => {
                    let mut result = result;
                    validate_children(&mut result, children, options, fetcher, visited).await;
                    result
                }
            }
        } else {
            check_media(scan)
        };

        debug!(errors = result.errors.len(), warnings = result.warnings.len(), master = is_master, "playlist validated");
        result
    }
    .boxed()
}

fn scan_lines(text: &str) -> LineScan {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();

    let mut scan = LineScan::default();
    let first = lines.first().map(|line| line.trim().to_ascii_uppercase()).unwrap_or_default();
    if first != "#EXTM3U" {
        scan.result.error("First line must be #EXTM3U.", Some(1));
    }

    let mut pending: Option<Pending> = None;
    for (index, raw) in lines.iter().enumerate() {
        let line_number = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if !line.starts_with('#') {
            match pending.take() {
                Some(Pending::Segment(_)) => scan.media_segments += 1,
                Some(Pending::Variant(_)) => scan.variants.push(ChildReference { uri: line.to_string() }),
                None => {}
            }
            continue;
        }

        let tag = line.split(':').next().unwrap_or(line);
        let rearms = tag == "#EXTINF" || tag == "#EXT-X-STREAM-INF";
        match pending {
            // a segment URI may follow other per-segment tags
            Some(Pending::Segment(_)) if !rearms => {}
            Some(directive) => {
                scan.result.error(directive.unsatisfied(), Some(directive.line()));
                pending = None;
            }
            None => {}
        }

        if line.eq_ignore_ascii_case("#EXT-X-ENDLIST") {
            scan.has_endlist = true;
        }

        match tag {
            "#EXTINF" => {
                pending = Some(Pending::Segment(line_number));
                check_extinf(&mut scan, line, line_number);
            }
            "#EXT-X-STREAM-INF" => {
                scan.stream_infs += 1;
                pending = Some(Pending::Variant(line_number));
                let attrs = AttributeList::parse(line);
                if !attrs.has("BANDWIDTH") {
                    scan.result.warning("#EXT-X-STREAM-INF is missing the BANDWIDTH attribute.", Some(line_number));
                }
                scan.inference.observe_stream_inf(&attrs);
            }
            "#EXT-X-I-FRAME-STREAM-INF" => {
                scan.stream_infs += 1;
                let attrs = AttributeList::parse(line);
                if let Some(uri) = attrs.get("URI").filter(|uri| !uri.is_empty()) {
                    scan.variants.push(ChildReference { uri: uri.to_string() });
                }
                if !attrs.has("BANDWIDTH") {
                    scan.result
                        .warning("#EXT-X-I-FRAME-STREAM-INF is missing the BANDWIDTH attribute.", Some(line_number));
                }
                scan.inference.observe_stream_inf(&attrs);
            }
            "#EXT-X-MEDIA" => {
                let attrs = AttributeList::parse(line);
                if let Some(uri) = attrs.get("URI").filter(|uri| !uri.is_empty()) {
                    scan.renditions.push(ChildReference { uri: uri.to_string() });
                }
                scan.inference.observe_media(&attrs);
            }
            "#EXT-X-VERSION" => {
                scan.version_seen = true;
                match positive_integer(line) {
                    Some(version) => {
                        if scan.declared_version.is_none() {
                            scan.declared_version = Some((version, line_number));
                        }
                    }
                    None => scan.result.error("#EXT-X-VERSION must be a positive integer.", Some(line_number)),
                }
            }
            "#EXT-X-TARGETDURATION" => {
                if positive_integer(line).is_none() {
                    scan.result.error("#EXT-X-TARGETDURATION must be a positive integer.", Some(line_number));
                }
            }
            _ => {}
        }
        scan.inference.observe_tag(tag);
    }

    if let Some(directive) = pending {
        scan.result.error(directive.unsatisfied(), Some(directive.line()));
    }
    if !scan.version_seen {
        scan.result.warning("Manifest is missing #EXT-X-VERSION tag.", None);
    }
    scan
}

fn check_extinf(scan: &mut LineScan, line: &str, line_number: usize) {
    let Some(comma) = line.find(',') else {
        scan.result.warning("#EXTINF should include a comma separating duration and title.", Some(line_number));
        return;
    };
    let duration = line["#EXTINF".len()..comma].trim_start_matches(':').trim();
    match duration.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => scan.inference.observe_extinf(duration),
        _ => scan.result.warning("#EXTINF duration is not a valid number.", Some(line_number)),
    }
}

fn positive_integer(line: &str) -> Option<u32> {
    let value = line.split(':').nth(1)?.trim();
    value.parse::<u32>().ok().filter(|&v| v > 0)
}

fn check_media(scan: LineScan) -> ValidationResult {
    let LineScan { mut result, media_segments, has_endlist, declared_version, version_seen, inference, .. } = scan;
    if !has_endlist {
        result.warning("Media playlist does not include #EXT-X-ENDLIST (likely a live playlist).", None);
    }
    if media_segments == 0 {
        result.error("Media playlist is missing #EXTINF segments.", None);
    }
    result.note(format!("Media segments: {}", media_segments));
    check_version(&mut result, declared_version, version_seen, &inference);
    result
}

/// Runs the master checks. Returns the child references to follow, or `None` when there are
/// none.
fn check_master(scan: LineScan) -> (ValidationResult, Option<Vec<ChildReference>>) {
    let LineScan { mut result, variants, renditions, declared_version, version_seen, inference, .. } = scan;
    let children: Vec<ChildReference> = variants.into_iter().chain(renditions).collect();

    if children.is_empty() {
        result.error("Master playlist does not reference any child playlists.", None);
    } else {
        let noun = if children.len() == 1 { "playlist" } else { "playlists" };
        result.note(format!("Detected {} referenced child {}.", children.len(), noun));
    }
    check_version(&mut result, declared_version, version_seen, &inference);

    let children = (!children.is_empty()).then_some(children);
    (result, children)
}

/// Compares the declared version with the inferred minimum. A missing tag counts as version 1;
/// an unparseable one was already reported and is not compared.
fn check_version(
    result: &mut ValidationResult,
    declared: Option<(u32, usize)>,
    version_seen: bool,
    inference: &VersionInference,
) {
    let (version, line) = match declared {
        Some((version, line)) => (version, Some(line)),
        None if version_seen => return,
        None => (1, None),
    };

    let minimum = inference.minimum();
    if version < minimum {
        result.error(
            format!(
                "Playlist requires at least version {} ({}) but declares #EXT-X-VERSION:{}.",
                minimum,
                inference.features_above(version).join(", "),
                version
            ),
            line,
        );
    } else if declared.is_some() {
        result.note(format!("#EXT-X-VERSION:{} satisfies the inferred minimum version {}.", version, minimum));
    }
}

async fn validate_children(
    result: &mut ValidationResult,
    children: Vec<ChildReference>,
    options: &HlsValidationOptions,
    fetcher: &dyn PlaylistFetcher,
    visited: &mut HashSet<String>,
) {
    let base = options.base_url.as_deref();
    let mut targets: Vec<String> = Vec::new();
    for child in children {
        let resolved = resolve_uri(&child.uri, base);
        if !resolved.is_empty() && !targets.contains(&resolved) {
            targets.push(resolved);
        }
    }

    for target in targets {
        if !visited.insert(target.clone()) {
            result.note(format!("Skipped already validated playlist {}.", target));
            continue;
        }

        debug!(url = %target, "fetching child playlist");
        let text = match fetcher.fetch_playlist(&target).await {
            Ok(text) => text,
            Err(err) => {
                warn!(url = %target, error = %err, "child playlist fetch failed");
                result.error(format!("Failed to fetch child playlist {}: {}", target, err), None);
                continue;
            }
        };
        if text.trim().is_empty() {
            result.error(format!("Playlist {} returned empty content.", target), None);
            continue;
        }

        let child_options = HlsValidationOptions {
            base_url: Some(target.clone()),
            playlist_type: PlaylistType::Media,
        };
        let child = validate_playlist(&text, &child_options, Some(fetcher), visited).await;
        if !child.errors.is_empty() {
            result.error(format!("Child playlist {} has {}.", target, plural(child.errors.len(), "error")), None);
        }
        if !child.warnings.is_empty() {
            result.warning(format!("Child playlist {} has {}.", target, plural(child.warnings.len(), "warning")), None);
        }
        result.media_playlists.push(ChildPlaylistReport { uri: target, result: child });
    }
}

/// Resolves a child URI against the playlist URL. Unresolvable input is kept verbatim.
fn resolve_uri(uri: &str, base: Option<&str>) -> String {
    if uri.is_empty() {
        return String::new();
    }
    let resolved = match base.and_then(|base| Url::parse(base).ok()) {
        Some(base) => base.join(uri),
        None => Url::parse(uri),
    };
    resolved.map(String::from).unwrap_or_else(|_| uri.to_string())
}

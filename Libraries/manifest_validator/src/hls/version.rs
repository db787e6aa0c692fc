use super::attributes::AttributeList;

/// Running minimum `#EXT-X-VERSION` implied by the tags and attributes seen so far.
///
/// Every requirement remembers the feature that raised it, so a too-low declaration can be
/// reported with its causes.
#[derive(Debug, Clone, Default)]
pub struct VersionInference {
    requirements: Vec<(u32, String)>,
}

impl VersionInference {
    pub fn require(&mut self, version: u32, feature: impl Into<String>) {
        let feature = feature.into();
        if !self.requirements.iter().any(|(_, seen)| *seen == feature) {
            self.requirements.push((version, feature));
        }
    }

    /// The inferred minimum; 1 when nothing newer was used.
    pub fn minimum(&self) -> u32 {
        self.requirements.iter().map(|(version, _)| *version).max().unwrap_or(1)
    }

    /// Features that need more than `declared`, in the order they first appeared.
    pub fn features_above(&self, declared: u32) -> Vec<&str> {
        self.requirements
            .iter()
            .filter(|(version, _)| *version > declared)
            .map(|(_, feature)| feature.as_str())
            .collect()
    }

    /// `#EXTINF` durations with a fractional part need version 3.
    pub fn observe_extinf(&mut self, duration: &str) {
        if duration.contains('.') {
            self.require(3, "floating-point EXTINF duration");
        }
    }

    /// Tags that need a minimum version just by being present.
    pub fn observe_tag(&mut self, tag: &str) {
        let version = match tag {
            "#EXT-X-BYTERANGE" | "#EXT-X-I-FRAME-STREAM-INF" | "#EXT-X-I-FRAMES-ONLY" => 4,
            "#EXT-X-MAP" => 5,
            "#EXT-X-DATERANGE" | "#EXT-X-INDEPENDENT-SEGMENTS" => 7,
            "#EXT-X-CONTENT-STEERING" => 9,
            _ => return,
        };
        self.require(version, tag.trim_start_matches('#'));
    }

    pub fn observe_stream_inf(&mut self, attrs: &AttributeList) {
        for (name, version) in [
            ("AUDIO", 4),
            ("VIDEO", 4),
            ("SUBTITLES", 5),
            ("CLOSED-CAPTIONS", 6),
            ("AVERAGE-BANDWIDTH", 7),
            ("FRAME-RATE", 7),
            ("STABLE-VARIANT-ID", 7),
            ("VIDEO-RANGE", 8),
        ] {
            if attrs.get(name).is_some() {
                self.require(version, format!("{} attribute", name));
            }
        }
    }

    pub fn observe_media(&mut self, attrs: &AttributeList) {
        match attrs.get("TYPE").map(str::to_ascii_uppercase).as_deref() {
            Some("SUBTITLES") => self.require(5, "SUBTITLES media type"),
            Some("CLOSED-CAPTIONS") => self.require(6, "CLOSED-CAPTIONS media type"),
            _ => {}
        }
        for name in ["CHANNELS", "STABLE-RENDITION-ID"] {
            if attrs.get(name).is_some() {
                self.require(7, format!("{} attribute", name));
            }
        }
    }
}

use once_cell::sync::Lazy;
use regex::Regex;

// NAME=value or NAME="quoted value"; a bare value runs to the next comma.
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)([A-Z0-9-]+)=("([^"]*)"|[^",\s][^,]*)"#).expect("attribute pattern is valid")
});

/// The attribute list of an HLS tag, in declaration order. Names are upper-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList(Vec<(String, String)>);

impl AttributeList {
    /// Parses everything after the first `:` of a tag line.
    pub fn parse(line: &str) -> Self {
        let Some((_, raw)) = line.split_once(':') else {
            return AttributeList::default();
        };
        let attributes = ATTRIBUTE
            .captures_iter(raw)
            .map(|caps| {
                let value = caps.get(3).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
                (caps[1].to_ascii_uppercase(), value.trim().to_string())
            })
            .collect();
        AttributeList(attributes)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Present with a non-empty value.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some_and(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_values_keep_commas() {
        let attrs = AttributeList::parse(r#"#EXT-X-STREAM-INF:BANDWIDTH=1280000,CODECS="avc1.4d401f,mp4a.40.2",RESOLUTION=1280x720"#);
        assert_eq!(attrs.get("BANDWIDTH"), Some("1280000"));
        assert_eq!(attrs.get("CODECS"), Some("avc1.4d401f,mp4a.40.2"));
        assert_eq!(attrs.get("RESOLUTION"), Some("1280x720"));
    }

    #[test]
    fn average_bandwidth_is_not_bandwidth() {
        let attrs = AttributeList::parse("#EXT-X-STREAM-INF:AVERAGE-BANDWIDTH=900000");
        assert!(!attrs.has("BANDWIDTH"));
        assert!(attrs.has("AVERAGE-BANDWIDTH"));
    }

    #[test]
    fn tag_without_attributes() {
        assert_eq!(AttributeList::parse("#EXT-X-ENDLIST"), AttributeList::default());
    }
}

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::xml::XmlElement;

// `$Identifier$` or `$Identifier%0Nd$`, plus the `$$` escape.
static TEMPLATE_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:(RepresentationID|Bandwidth|Number|Time)(?:%0(\d+)d)?)?\$")
        .expect("template identifier pattern is valid")
});

/// Widest zero padding honoured in a `%0Nd` format tag.
const MAX_PAD_WIDTH: usize = 32;

/// Values substituted into `@media` and `@initialization` templates. Identifiers whose value
/// is unknown are left in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateValues<'a> {
    pub representation_id: &'a str,
    pub bandwidth: Option<u64>,
    pub number: Option<u64>,
    pub time: Option<u64>,
}

/// Expands the template identifiers of a SegmentTemplate URL.
pub fn substitute(template: &str, values: &TemplateValues<'_>) -> String {
    TEMPLATE_IDENTIFIER
        .replace_all(template, |caps: &Captures| {
            let Some(identifier) = caps.get(1) else {
                return "$".to_string();
            };
            let numeric = match identifier.as_str() {
                "RepresentationID" => return values.representation_id.to_string(),
                "Bandwidth" => values.bandwidth,
                "Number" => values.number,
                _ => values.time,
            };
            match numeric {
                Some(value) => pad(value, caps.get(2).map(|width| width.as_str())),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn pad(value: u64, width: Option<&str>) -> String {
    match width.and_then(|w| w.parse::<usize>().ok()) {
        Some(width) => format!("{:0width$}", value, width = width.min(MAX_PAD_WIDTH)),
        None => value.to_string(),
    }
}

/// SegmentTemplate attributes after inheritance. A Representation-level template overrides
/// an AdaptationSet-level one attribute by attribute, which in turn overrides the Period.
#[derive(Debug, Clone, Default)]
pub struct InheritedTemplate<'a> {
    pub media: Option<&'a str>,
    pub initialization: Option<&'a str>,
    pub start_number: Option<u64>,
    pub timescale: Option<u64>,
    pub duration: Option<u64>,
    pub presentation_time_offset: Option<u64>,
    pub timeline: Option<&'a XmlElement>,
    pub base_url: Option<&'a str>,
}

impl<'a> InheritedTemplate<'a> {
    /// Merges `templates`, nearest scope first.
    pub fn merge(templates: &[&'a XmlElement]) -> Self {
        let text = |name: &str| templates.iter().find_map(|t| t.attr(name));
        let number = |name: &str| templates.iter().find_map(|t| t.attr(name)).and_then(|v| v.trim().parse::<u64>().ok());

        InheritedTemplate {
            media: text("media"),
            initialization: text("initialization"),
            start_number: number("startNumber"),
            timescale: number("timescale"),
            duration: number("duration"),
            presentation_time_offset: number("presentationTimeOffset"),
            timeline: templates.iter().find_map(|t| t.first_child("SegmentTimeline")),
            base_url: templates
                .iter()
                .find_map(|t| t.first_child("BaseURL"))
                .map(XmlElement::trimmed_text)
                .filter(|url| !url.is_empty()),
        }
    }

    pub fn start_number(&self) -> u64 {
        self.start_number.unwrap_or(1)
    }

    /// Timescale in ticks per second; absent or zero means 1.
    pub fn timescale(&self) -> u64 {
        self.timescale.filter(|&ts| ts > 0).unwrap_or(1)
    }

    /// Fixed segment duration, when one is declared and non-zero.
    pub fn duration(&self) -> Option<u64> {
        self.duration.filter(|&d| d > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(number: u64, time: u64) -> TemplateValues<'static> {
        TemplateValues { representation_id: "video-1080", bandwidth: Some(4_500_000), number: Some(number), time: Some(time) }
    }

    #[test]
    fn substitutes_every_identifier() {
        let url = substitute("$RepresentationID$/$Bandwidth$/seg-$Number$-$Time$.m4s", &values(7, 14000));
        assert_eq!(url, "video-1080/4500000/seg-7-14000.m4s");
    }

    #[test]
    fn honours_zero_padding() {
        assert_eq!(substitute("chunk-$Number%05d$.m4s", &values(42, 0)), "chunk-00042.m4s");
        assert_eq!(substitute("t$Time%03d$", &values(1, 123456)), "t123456");
    }

    #[test]
    fn escaped_dollar_and_unknown_identifiers() {
        assert_eq!(substitute("a$$b", &values(1, 0)), "a$b");
        assert_eq!(substitute("$Foo$-$Number$", &values(3, 0)), "$Foo$-3");
    }

    #[test]
    fn missing_values_stay_verbatim() {
        let init = TemplateValues { representation_id: "a1", ..Default::default() };
        assert_eq!(substitute("$RepresentationID$/init-$Bandwidth$.mp4", &init), "a1/init-$Bandwidth$.mp4");
    }

    #[test]
    fn attributes_inherit_per_attribute() {
        let mut period = XmlElement::new("SegmentTemplate");
        period.attributes.push(("timescale".into(), "90000".into()));
        period.attributes.push(("media".into(), "period-$Number$.m4s".into()));
        let mut rep = XmlElement::new("SegmentTemplate");
        rep.attributes.push(("media".into(), "rep-$Number$.m4s".into()));
        rep.attributes.push(("startNumber".into(), "0".into()));

        let merged = InheritedTemplate::merge(&[&rep, &period]);
        assert_eq!(merged.media, Some("rep-$Number$.m4s"));
        assert_eq!(merged.timescale(), 90000);
        assert_eq!(merged.start_number(), 0);
        assert_eq!(merged.duration(), None);
    }
}

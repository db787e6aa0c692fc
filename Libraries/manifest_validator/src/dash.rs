//! Structural checks for MPEG-DASH manifests.

use dash_mpd::{MpdTreeParser, XmlElement};
use tracing::{debug, instrument};

use crate::result::ValidationResult;

/// Segment addressing found for a Representation, nearest scope first.
enum SegmentInfo<'a> {
    Template(&'a XmlElement),
    List(&'a XmlElement),
    Base,
}

/// Validates the Period / AdaptationSet / Representation structure of an MPD and the segment
/// addressing each Representation resolves to.
///
/// Passing `None` for `parser` reports that XML cannot be parsed here instead of failing.
#[instrument(skip_all, fields(len = text.len()))]
pub fn validate_dash(text: &str, parser: Option<&dyn MpdTreeParser>) -> ValidationResult {
    if text.trim().is_empty() {
        return ValidationResult::single_error("Manifest is empty.");
    }
    let Some(parser) = parser else {
        return ValidationResult::single_error("XML parser is unavailable in this environment.");
    };
    let mpd = match parser.parse(text) {
        Ok(root) => root,
        Err(err) => {
            debug!(error = %err, "manifest is not well-formed");
            return ValidationResult::single_error("Manifest contains XML syntax errors.");
        }
    };

    let mut result = ValidationResult::default();
    if mpd.name != "MPD" {
        result.error("Root element must be <MPD>.", None);
        return result;
    }

    let periods = mpd.descendants_named("Period");
    if periods.is_empty() {
        result.error("MPD must contain at least one <Period>.", None);
    }

    let mut adaptation_count = 0;
    let mut representation_count = 0;
    let mut timelines = 0;

    for (period_index, period) in periods.iter().enumerate() {
        let adaptations = period.descendants_named("AdaptationSet");
        adaptation_count += adaptations.len();
        if adaptations.is_empty() {
            result.error(format!("Period {} has no AdaptationSet elements.", period_index + 1), None);
        }

        for (adaptation_index, adaptation) in adaptations.iter().enumerate() {
            let representations = adaptation.descendants_named("Representation");
            if representations.is_empty() {
                result.error(
                    format!(
                        "AdaptationSet {} has no Representation elements.",
                        describe_adaptation(adaptation, adaptation_index)
                    ),
                    None,
                );
            }

            for (representation_index, representation) in representations.iter().enumerate() {
                representation_count += 1;
                let label = match representation.attr("id").filter(|id| !id.is_empty()) {
                    Some(id) => id.to_string(),
                    None => format!("{}:{}:{}", period_index + 1, adaptation_index + 1, representation_index + 1),
                };

                let scopes = [*representation, *adaptation, *period, &mpd];
                match find_segment_info(&scopes) {
                    None => result.error(
                        format!("Representation {} is missing SegmentTemplate/SegmentList/SegmentBase.", label),
                        None,
                    ),
                    Some(SegmentInfo::Template(template)) => {
                        if check_template(&mut result, template, &label) {
                            timelines += 1;
                        }
                    }
                    Some(SegmentInfo::List(list)) => {
                        if list.descendants_named("SegmentURL").is_empty() {
                            result.error(
                                format!(
                                    "SegmentList for representation {} does not contain any SegmentURL entries.",
                                    label
                                ),
                                None,
                            );
                        }
                    }
                    Some(SegmentInfo::Base) => {}
                }
            }
        }
    }

    if representation_count == 0 {
        result.error("MPD must contain at least one Representation.", None);
    }

    let presentation = mpd.attr("type").unwrap_or("static").to_ascii_lowercase();
    if presentation == "static" && !mpd.has_attr("mediaPresentationDuration") && !mpd.has_attr("duration") {
        result.warning("Static MPD is missing @mediaPresentationDuration.", None);
    }

    result.note(format!(
        "Periods: {}, AdaptationSets: {}, Representations: {}",
        periods.len(),
        adaptation_count,
        representation_count
    ));
    result.note(format!("SegmentTemplate timelines: {}", timelines));
    result
}

/// Checks the nearest SegmentTemplate. Returns whether it carries a SegmentTimeline.
fn check_template(result: &mut ValidationResult, template: &XmlElement, label: &str) -> bool {
    if template.attr("media").map_or(true, str::is_empty) {
        result.error(format!("SegmentTemplate for representation {} requires a @media attribute.", label), None);
    }

    match template.first_child("SegmentTimeline") {
        Some(timeline) => {
            if timeline.descendants_named("S").is_empty() {
                result.error(
                    format!("SegmentTemplate for representation {} has an empty SegmentTimeline.", label),
                    None,
                );
            }
            true
        }
        None => {
            if !template.has_attr("duration") {
                result.warning(
                    format!(
                        "SegmentTemplate for representation {} should define @duration when SegmentTimeline is absent.",
                        label
                    ),
                    None,
                );
            }
            false
        }
    }
}

/// Walks the scopes from the Representation outwards. Within one scope a template wins over a
/// list, which wins over a base.
fn find_segment_info<'a>(scopes: &[&'a XmlElement]) -> Option<SegmentInfo<'a>> {
    scopes.iter().find_map(|scope| {
        if let Some(template) = scope.first_child("SegmentTemplate") {
            Some(SegmentInfo::Template(template))
        } else if let Some(list) = scope.first_child("SegmentList") {
            Some(SegmentInfo::List(list))
        } else {
            scope.first_child("SegmentBase").map(|_| SegmentInfo::Base)
        }
    })
}

/// `video · video/mp4 · lang=en · #2`
fn describe_adaptation(adaptation: &XmlElement, index: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(content_type) = adaptation.attr("contentType").filter(|v| !v.is_empty()) {
        parts.push(content_type.to_string());
    }
    if let Some(mime) = adaptation.attr("mimeType").filter(|v| !v.is_empty()) {
        if !parts.iter().any(|part| part == mime) {
            parts.push(mime.to_string());
        }
    }
    if let Some(lang) = adaptation.attr("lang").filter(|v| !v.is_empty()) {
        parts.push(format!("lang={}", lang));
    }
    parts.push(format!("#{}", index + 1));
    parts.join(" · ")
}

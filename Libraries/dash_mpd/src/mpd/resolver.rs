use tracing::{debug, instrument, warn};

use super::base_url::{base_options, first_base_url};
use super::template::InheritedTemplate;
use super::timeline::{expand_timeline, preview_segments};
use super::{DashExpansion, DashSegmentContext, SegmentSource, UnsupportedRepresentation};
use crate::config::ResolverConfig;
use crate::xml::XmlElement;

/// How a Representation addresses its segments, decided by the nearest scope that declares
/// any addressing element.
enum Addressing<'a> {
    /// SegmentTemplates from the deciding scope outwards, nearest first.
    Template(Vec<&'a XmlElement>),
    List,
    Base,
    Missing,
}

/// The scopes a Representation inherits from: itself, its AdaptationSet and its Period.
#[derive(Clone, Copy)]
struct Scopes<'a> {
    period: &'a XmlElement,
    adaptation: &'a XmlElement,
    representation: &'a XmlElement,
}

impl<'a> Scopes<'a> {
    fn nearest_first(&self) -> [&'a XmlElement; 3] {
        [self.representation, self.adaptation, self.period]
    }

    fn addressing(&self) -> Addressing<'a> {
        let scopes = self.nearest_first();
        for (depth, scope) in scopes.iter().enumerate() {
            if scope.first_child("SegmentTemplate").is_some() {
                let templates = scopes[depth..].iter().filter_map(|s| s.first_child("SegmentTemplate")).collect();
                return Addressing::Template(templates);
            }
            if scope.first_child("SegmentList").is_some() {
                return Addressing::List;
            }
            if scope.first_child("SegmentBase").is_some() {
                return Addressing::Base;
            }
        }
        Addressing::Missing
    }
}

/// Resolves every Representation of `mpd` into a segment context, or records why it could
/// not be expanded.
///
/// `manifest_url` seeds relative BaseURL resolution. The MPD-level BaseURLs become
/// [`DashExpansion::base_options`]; lower scopes are kept per context as `base_parts`.
#[instrument(skip_all, fields(manifest_url = %manifest_url))]
pub fn resolve_segments(mpd: &XmlElement, manifest_url: &str, config: &ResolverConfig) -> DashExpansion {
    let mut expansion = DashExpansion { base_options: base_options(mpd, manifest_url), ..Default::default() };
    let mut ordinal = 0usize;

    for (period_index, period) in mpd.children_named("Period").enumerate() {
        for adaptation in period.children_named("AdaptationSet") {
            for representation in adaptation.children_named("Representation") {
                let representation_id = representation
                    .attr("id")
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("rep-{}-{}", period_index, ordinal));
                ordinal += 1;

                let scopes = Scopes { period, adaptation, representation };
                let outcome = match scopes.addressing() {
                    Addressing::Template(templates) => {
                        build_context(&representation_id, period_index, scopes, &templates, config)
                    }
                    Addressing::List => Err("uses SegmentList addressing".to_string()),
                    Addressing::Base => Err("uses SegmentBase addressing".to_string()),
                    Addressing::Missing => Err("has no SegmentTemplate, SegmentList or SegmentBase".to_string()),
                };

                match outcome {
                    Ok(context) => expansion.contexts.push(context),
                    Err(reason) => {
                        debug!(representation = %representation_id, %reason, "representation not expandable");
                        expansion.unsupported.push(UnsupportedRepresentation {
                            representation_id,
                            period_index,
                            reason,
                        });
                    }
                }
            }
        }
    }

    debug!(
        contexts = expansion.contexts.len(),
        unsupported = expansion.unsupported.len(),
        base_options = expansion.base_options.len(),
        "resolved segment plan"
    );
    expansion
}

fn build_context(
    representation_id: &str,
    period_index: usize,
    scopes: Scopes<'_>,
    templates: &[&XmlElement],
    config: &ResolverConfig,
) -> Result<DashSegmentContext, String> {
    let template = InheritedTemplate::merge(templates);
    let media = template
        .media
        .filter(|media| !media.is_empty())
        .ok_or_else(|| "SegmentTemplate has no @media attribute".to_string())?;
    let start_number = template.start_number();

    let (source, groups, truncated) = match (template.timeline, template.duration()) {
        (Some(timeline), _) => {
            let expanded = expand_timeline(timeline, start_number, config.max_timeline_segments);
            if expanded.segment_count() == 0 {
                return Err("SegmentTimeline has no S entries".to_string());
            }
            if expanded.truncated {
                warn!(
                    representation = %representation_id,
                    limit = config.max_timeline_segments,
                    "timeline expansion stopped at the segment cap"
                );
            }
            (SegmentSource::Timeline, expanded.groups, expanded.truncated)
        }
        (None, Some(duration)) => {
            let count = config.preview_segment_count.min(config.max_timeline_segments);
            (SegmentSource::FixedDuration, vec![preview_segments(start_number, duration, count)], false)
        }
        (None, None) => return Err("SegmentTemplate has neither SegmentTimeline nor @duration".to_string()),
    };

    let mut base_parts: Vec<String> = [scopes.period, scopes.adaptation, scopes.representation]
        .into_iter()
        .filter_map(first_base_url)
        .map(str::to_string)
        .collect();
    if let Some(url) = template.base_url {
        base_parts.push(url.to_string());
    }

    let representation = scopes.representation;
    let bandwidth = representation.attr("bandwidth").and_then(|b| b.trim().parse::<u64>().ok());

    Ok(DashSegmentContext {
        label: track_label(scopes, representation_id, bandwidth),
        representation_id: representation_id.to_string(),
        period_index,
        bandwidth,
        media_template: media.to_string(),
        init_template: template.initialization.filter(|init| !init.is_empty()).map(str::to_string),
        start_number,
        timescale: template.timescale(),
        base_parts,
        source,
        groups,
        truncated,
    })
}

/// `1920x1080 • 4500000bps • avc1.640028`, leaving out whatever is not declared. Falls back
/// to the Representation id.
fn track_label(scopes: Scopes<'_>, representation_id: &str, bandwidth: Option<u64>) -> String {
    let representation = scopes.representation;
    let mut parts = Vec::new();
    if let (Some(width), Some(height)) = (representation.attr("width"), representation.attr("height")) {
        parts.push(format!("{}x{}", width, height));
    }
    if let Some(bandwidth) = bandwidth {
        parts.push(format!("{}bps", bandwidth));
    }
    if let Some(codecs) = representation.attr("codecs").or_else(|| scopes.adaptation.attr("codecs")) {
        if !codecs.is_empty() {
            parts.push(codecs.to_string());
        }
    }

    if parts.is_empty() {
        representation_id.to_string()
    } else {
        parts.join(" • ")
    }
}

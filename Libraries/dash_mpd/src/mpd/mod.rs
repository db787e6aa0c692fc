//! Segment plan of an MPD: which Representations can be expanded, their inherited templates
//! and base URLs, and the concrete segment numbers and times.

pub mod base_url;
pub mod resolver;
pub mod template;
pub mod timeline;

use serde::Serialize;
use url::Url;

use crate::error::DashError;
pub use base_url::BaseOption;
use template::{substitute, TemplateValues};

/// One segment address, in timescale units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SegmentDescriptor {
    pub number: u64,
    pub time: u64,
    pub duration: u64,
}

/// A run of segments without a timing gap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimelineGroup {
    pub segments: Vec<SegmentDescriptor>,
}

/// Where the segments of a context came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentSource {
    /// Expanded from a SegmentTimeline.
    Timeline,
    /// A preview run synthesized from `@duration`.
    FixedDuration,
}

/// Everything needed to address the segments of one Representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashSegmentContext {
    pub label: String,
    pub representation_id: String,
    pub period_index: usize,
    pub bandwidth: Option<u64>,
    pub media_template: String,
    pub init_template: Option<String>,
    pub start_number: u64,
    pub timescale: u64,
    /// BaseURL texts below the MPD level (Period, AdaptationSet, Representation,
    /// SegmentTemplate), applied in order on top of the selected [`BaseOption`].
    pub base_parts: Vec<String>,
    pub source: SegmentSource,
    pub groups: Vec<TimelineGroup>,
    /// The timeline held more segments than the configured cap.
    pub truncated: bool,
}

/// A segment with its resolved URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSegment {
    pub number: u64,
    pub time: u64,
    pub duration: u64,
    pub url: String,
}

impl DashSegmentContext {
    pub fn segments(&self) -> impl Iterator<Item = &SegmentDescriptor> {
        self.groups.iter().flat_map(|group| group.segments.iter())
    }

    pub fn segment_count(&self) -> usize {
        self.groups.iter().map(|group| group.segments.len()).sum()
    }

    /// Seconds covered by the expanded segments.
    pub fn duration_seconds(&self) -> f64 {
        let ticks: u64 = self.segments().map(|s| s.duration).sum();
        ticks as f64 / self.timescale as f64
    }

    /// The base URL of this Representation under `option`.
    pub fn base_url(&self, option: &BaseOption) -> Result<Url, DashError> {
        base_url::compose(&option.url, &self.base_parts)
    }

    /// The initialization segment URL, when the template declares one.
    pub fn init_url(&self, option: &BaseOption) -> Result<Option<Url>, DashError> {
        let Some(template) = self.init_template.as_deref() else {
            return Ok(None);
        };
        let values = TemplateValues {
            representation_id: &self.representation_id,
            bandwidth: self.bandwidth,
            ..Default::default()
        };
        self.join(option, &substitute(template, &values)).map(Some)
    }

    /// Every expanded segment with its URL under `option`.
    pub fn segment_urls(&self, option: &BaseOption) -> Result<Vec<ResolvedSegment>, DashError> {
        let base = self.base_url(option)?;
        self.segments()
            .map(|segment| {
                let values = TemplateValues {
                    representation_id: &self.representation_id,
                    bandwidth: self.bandwidth,
                    number: Some(segment.number),
                    time: Some(segment.time),
                };
                let relative = substitute(&self.media_template, &values);
                let url = base
                    .join(&relative)
                    .map_err(|source| DashError::InvalidUrl { url: relative.clone(), source })?;
                Ok(ResolvedSegment {
                    number: segment.number,
                    time: segment.time,
                    duration: segment.duration,
                    url: url.into(),
                })
            })
            .collect()
    }

    fn join(&self, option: &BaseOption, relative: &str) -> Result<Url, DashError> {
        self.base_url(option)?
            .join(relative)
            .map_err(|source| DashError::InvalidUrl { url: relative.to_string(), source })
    }
}

/// A Representation the resolver cannot expand, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsupportedRepresentation {
    pub representation_id: String,
    pub period_index: usize,
    pub reason: String,
}

/// Output of [`resolver::resolve_segments`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashExpansion {
    pub contexts: Vec<DashSegmentContext>,
    pub base_options: Vec<BaseOption>,
    pub unsupported: Vec<UnsupportedRepresentation>,
}

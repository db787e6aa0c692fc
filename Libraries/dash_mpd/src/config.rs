use serde::{Deserialize, Serialize};

use crate::xml::DEFAULT_MAX_XML_DEPTH;

/// Limits applied while expanding segment templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Segments synthesized for a template that has `@duration` but no SegmentTimeline.
    pub preview_segment_count: usize,
    /// Upper bound on segments emitted from one SegmentTimeline. Hitting it marks the
    /// context as truncated.
    pub max_timeline_segments: usize,
    /// Element nesting accepted when [`crate::resolve_manifest`] parses the document.
    pub max_xml_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            preview_segment_count: 10,
            max_timeline_segments: 100_000,
            max_xml_depth: DEFAULT_MAX_XML_DEPTH,
        }
    }
}

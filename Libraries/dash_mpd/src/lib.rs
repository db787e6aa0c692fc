//! # DASH Segment Resolution
//!
//! An MPEG-DASH manifest (MPD) rarely lists its segment URLs. Instead each Representation
//! inherits a `SegmentTemplate` (from itself, its AdaptationSet or its Period) whose `@media`
//! pattern is filled in with `$Number$`, `$Time$`, `$RepresentationID$` and `$Bandwidth$`,
//! and a chain of `BaseURL` elements that the resulting relative URL is resolved against.
//!
//! This library turns an MPD into that concrete plan:
//! - The `xml` module builds an owned element tree behind the [`MpdTreeParser`] trait.
//! - The `mpd` module resolves templates, BaseURL chains and SegmentTimelines into a
//!   [`DashExpansion`], one [`DashSegmentContext`] per expandable Representation.
//!
//! Representations using `SegmentList` or `SegmentBase` are listed as unsupported rather
//! than expanded.

pub mod config;
pub mod error;
pub mod mpd;
pub mod xml;

pub use config::ResolverConfig;
pub use error::DashError;
pub use mpd::resolver::resolve_segments;
pub use mpd::{
    BaseOption, DashExpansion, DashSegmentContext, ResolvedSegment, SegmentDescriptor, SegmentSource,
    TimelineGroup, UnsupportedRepresentation,
};
pub use xml::{MpdTreeParser, QuickXmlParser, XmlElement, DEFAULT_MAX_XML_DEPTH};

/// Parses `text` with quick-xml, nested at most `config.max_xml_depth` deep, and resolves its
/// segment plan.
pub fn resolve_manifest(text: &str, manifest_url: &str, config: &ResolverConfig) -> Result<DashExpansion, DashError> {
    let root = QuickXmlParser::with_max_depth(config.max_xml_depth).parse(text)?;
    if root.name != "MPD" {
        return Err(DashError::UnexpectedRoot(root.name));
    }
    Ok(resolve_segments(&root, manifest_url, config))
}

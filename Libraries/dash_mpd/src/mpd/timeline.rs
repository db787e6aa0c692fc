use tracing::debug;

use super::{SegmentDescriptor, TimelineGroup};
use crate::xml::XmlElement;

/// Segments expanded from one SegmentTimeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineExpansion {
    pub groups: Vec<TimelineGroup>,
    /// Set when `limit` stopped the expansion before the timeline was exhausted.
    pub truncated: bool,
}

impl TimelineExpansion {
    pub fn segment_count(&self) -> usize {
        self.groups.iter().map(|group| group.segments.len()).sum()
    }
}

/// Expands the `S` entries of a SegmentTimeline.
///
/// Each entry repeats `r + 1` times (a negative `r` counts as a single occurrence). Numbers
/// run on from `start_number`; times run on from the previous entry unless `t` restarts
/// them. An explicit `t` that disagrees with the running time opens a new group.
pub fn expand_timeline(timeline: &XmlElement, start_number: u64, limit: usize) -> TimelineExpansion {
    let mut expansion = TimelineExpansion::default();
    let mut current = TimelineGroup::default();
    let mut running_time = 0u64;
    let mut running_number = start_number;
    let mut emitted = 0usize;

    'entries: for entry in timeline.children_named("S") {
        let duration = parse_u64(entry.attr("d")).unwrap_or(0);
        let repeat = entry.attr("r").and_then(|r| r.trim().parse::<i64>().ok()).unwrap_or(0);
        let occurrences = if repeat >= 0 { repeat as u64 + 1 } else { 1 };

        let start = match parse_u64(entry.attr("t")) {
            Some(t) => {
                if t != running_time && !current.segments.is_empty() {
                    debug!(expected = running_time, found = t, "timeline discontinuity");
                    expansion.groups.push(std::mem::take(&mut current));
                }
                t
            }
            None => running_time,
        };

        for i in 0..occurrences {
            if emitted >= limit {
                expansion.truncated = true;
                break 'entries;
            }
            current.segments.push(SegmentDescriptor {
                number: running_number.saturating_add(i),
                time: start.saturating_add(i.saturating_mul(duration)),
                duration,
            });
            emitted += 1;
        }

        running_time = start.saturating_add(occurrences.saturating_mul(duration));
        running_number = running_number.saturating_add(occurrences);
    }

    if !current.segments.is_empty() {
        expansion.groups.push(current);
    }
    expansion
}

/// A fixed-duration preview run: `count` segments from `start_number`, segment `i` starting at
/// `(start_number + i - 1) * duration`.
pub fn preview_segments(start_number: u64, duration: u64, count: usize) -> TimelineGroup {
    let segments = (0..count as u64)
        .map(|i| {
            let number = start_number.saturating_add(i);
            SegmentDescriptor {
                number,
                time: number.saturating_sub(1).saturating_mul(duration),
                duration,
            }
        })
        .collect();
    TimelineGroup { segments }
}

fn parse_u64(value: Option<&str>) -> Option<u64> {
    value.and_then(|v| v.trim().parse::<u64>().ok())
}

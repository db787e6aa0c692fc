use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::boxes::{decode_fields, meta, stsd};
use crate::field::{BoxField, FieldValue};
use crate::{format_fourcc, format_uuid};

/// Box types whose payload is itself a sequence of boxes.
pub const CONTAINER_TYPES: &[&[u8; 4]] = &[
    b"moov", b"trak", b"mdia", b"minf", b"stbl", b"stsd", b"edts", b"mvex", b"moof", b"traf",
    b"mfra", b"udta", b"meta", b"ilst", b"dinf", b"tref", b"sinf", b"schi", b"ipro", b"meco",
    b"mere", b"strk", b"strd", b"stri", b"dref",
];

const BASIC_HEADER: u64 = 8;
const LARGE_HEADER: u64 = 16;
const USERTYPE_LEN: u64 = 16;

/// One box in the parsed tree.
///
/// `start` and `end` are absolute offsets into the walked buffer and always satisfy
/// `start + size == end`. A box whose declared size overran its enclosing range reports the
/// clamped size.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mp4Box {
    #[serde(rename = "type")]
    pub box_type: String,
    pub start: u64,
    pub size: u64,
    pub end: u64,
    pub header_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub children: Vec<Mp4Box>,
    pub details: Vec<BoxField>,
}

impl Mp4Box {
    pub fn detail(&self, name: &str) -> Option<&FieldValue> {
        self.details.iter().find(|field| field.name == name).map(|field| &field.value)
    }

    pub fn child(&self, box_type: &str) -> Option<&Mp4Box> {
        self.children.iter().find(|child| child.box_type == box_type)
    }

    /// Payload size, i.e. the box size without its header.
    pub fn payload_size(&self) -> u64 {
        self.size - self.header_size
    }
}

/// Result of a walk: the top-level boxes in document order plus every structural problem
/// that was recovered from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoxTree {
    pub boxes: Vec<Mp4Box>,
    pub warnings: Vec<String>,
}

impl BoxTree {
    /// Depth-first, document-order search for the first box of `box_type`.
    pub fn find_first(&self, box_type: &str) -> Option<&Mp4Box> {
        let mut stack: Vec<&Mp4Box> = self.boxes.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.box_type == box_type {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Deepest nesting level whose children are still scanned. Top-level boxes are level 0.
    pub max_depth: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        WalkerConfig { max_depth: 64 }
    }
}

/// A byte range still to be scanned for sibling boxes.
struct Frame {
    start: u64,
    end: u64,
    parent: Option<usize>,
    parent_type: Option<[u8; 4]>,
    depth: usize,
}

/// Framing of one box header.
struct Header {
    box_type: [u8; 4],
    size: u64,
    header_size: u64,
    uuid: Option<String>,
}

/// Walks `data` with the default configuration.
pub fn walk_boxes(data: &[u8]) -> BoxTree {
    walk_boxes_with(data, &WalkerConfig::default())
}

/// Scans `data` into a tree of boxes.
///
/// Nesting is handled with an explicit work stack rather than recursion, so deeply nested or
/// hostile input cannot exhaust the call stack. Records are kept in a flat arena while
/// scanning and assembled into the owned tree at the end.
#[instrument(skip_all, fields(len = data.len()))]
pub fn walk_boxes_with(data: &[u8], config: &WalkerConfig) -> BoxTree {
    let mut records: Vec<Option<Mp4Box>> = Vec::new();
    let mut child_ids: Vec<Vec<usize>> = Vec::new();
    let mut root_ids: Vec<usize> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let mut stack = vec![Frame { start: 0, end: data.len() as u64, parent: None, parent_type: None, depth: 0 }];

    while let Some(frame) = stack.pop() {
        let mut pending = Vec::new();
        let mut offset = frame.start;

        while offset < frame.end {
            let header = match read_header(data, offset, frame.end) {
                Ok(header) => header,
                Err(message) => {
                    warnings.push(message);
                    break;
                }
            };

            let fourcc = format_fourcc(&header.box_type);
            let remaining = frame.end - offset;
            let mut size = header.size;
            if size > remaining {
                warnings.push(format!(
                    "Box '{}' at offset {} declares {} bytes but only {} remain; truncated to {}.",
                    fourcc, offset, size, remaining, remaining
                ));
                size = remaining;
            }

            let payload_start = offset + header.header_size;
            let end = offset + size;
            let payload = &data[payload_start as usize..end as usize];

            let id = records.len();
            records.push(Some(Mp4Box {
                box_type: fourcc.clone(),
                start: offset,
                size,
                end,
                header_size: header.header_size,
                uuid: header.uuid,
                children: Vec::new(),
                details: decode_fields(&header.box_type, frame.parent_type.as_ref(), payload),
            }));
            child_ids.push(Vec::new());
            match frame.parent {
                Some(parent) => child_ids[parent].push(id),
                None => root_ids.push(id),
            }

            if let Some(skip) = children_offset(&header.box_type, frame.parent_type.as_ref(), payload) {
                if frame.depth >= config.max_depth {
                    warnings.push(format!(
                        "Box '{}' at offset {} exceeds the maximum nesting depth of {}; children not scanned.",
                        fourcc, offset, config.max_depth
                    ));
                } else if payload_start + skip < end {
                    pending.push(Frame {
                        start: payload_start + skip,
                        end,
                        parent: Some(id),
                        parent_type: Some(header.box_type),
                        depth: frame.depth + 1,
                    });
                }
            }

            offset = end;
        }

        // first child range on top, so warnings come out in document order
        stack.extend(pending.into_iter().rev());
    }

    let boxes = assemble(records, child_ids, root_ids);
    debug!(boxes = boxes.len(), warnings = warnings.len(), "walked box tree");
    BoxTree { boxes, warnings }
}

/// Reads the header at `offset`, or describes why scanning of this level has to stop.
fn read_header(data: &[u8], offset: u64, end: u64) -> Result<Header, String> {
    let remaining = end - offset;
    if remaining < BASIC_HEADER {
        return Err(format!(
            "Trailing {} bytes at offset {} are too small for a box header; ignored.",
            remaining, offset
        ));
    }

    let at = offset as usize;
    let size32 = u32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);
    let box_type = [data[at + 4], data[at + 5], data[at + 6], data[at + 7]];
    let fourcc = format_fourcc(&box_type);

    let (size, mut header_size) = match size32 {
        0 => (remaining, BASIC_HEADER),
        1 => {
            if remaining < LARGE_HEADER {
                return Err(format!(
                    "Box '{}' at offset {} has a truncated 64-bit size field; stopping scan at this level.",
                    fourcc, offset
                ));
            }
            let mut large = [0u8; 8];
            large.copy_from_slice(&data[at + 8..at + 16]);
            (u64::from_be_bytes(large), LARGE_HEADER)
        }
        n => (u64::from(n), BASIC_HEADER),
    };

    let mut uuid = None;
    if &box_type == b"uuid" {
        if remaining < header_size + USERTYPE_LEN {
            return Err(format!(
                "Box 'uuid' at offset {} has a truncated extended type; stopping scan at this level.",
                offset
            ));
        }
        let from = at + header_size as usize;
        let mut usertype = [0u8; 16];
        usertype.copy_from_slice(&data[from..from + 16]);
        uuid = Some(format_uuid(&usertype));
        header_size += USERTYPE_LEN;
    }

    // a size-0 box runs to the end of the range, so it can only be too small via its header
    if size < header_size {
        return Err(format!(
            "Invalid size {} for box '{}' at offset {} (header is {} bytes); stopping scan at this level.",
            size, fourcc, offset, header_size
        ));
    }

    Ok(Header { box_type, size, header_size, uuid })
}

/// Where the child boxes start inside `payload`, or `None` for leaf boxes.
fn children_offset(box_type: &[u8; 4], parent: Option<&[u8; 4]>, payload: &[u8]) -> Option<u64> {
    if parent == Some(b"stsd") {
        return Some(stsd::sample_entry_header_len(box_type, payload) as u64);
    }
    if !CONTAINER_TYPES.contains(&box_type) {
        return None;
    }
    let skip = match box_type {
        b"stsd" | b"dref" => 8,
        b"meta" => meta::child_offset(payload),
        _ => 0,
    };
    Some(skip as u64)
}

/// Builds the owned tree. Children always have larger arena ids than their parent, so a
/// reverse pass sees every subtree complete before its parent takes it.
fn assemble(mut records: Vec<Option<Mp4Box>>, child_ids: Vec<Vec<usize>>, root_ids: Vec<usize>) -> Vec<Mp4Box> {
    for (id, children) in child_ids.iter().enumerate().rev() {
        let built: Vec<Mp4Box> = children.iter().filter_map(|&child| records[child].take()).collect();
        if let Some(record) = records[id].as_mut() {
            record.children = built;
        }
    }
    root_ids.into_iter().filter_map(|id| records[id].take()).collect()
}

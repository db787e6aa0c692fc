//! # ISO-BMFF Inspection
//!
//! MP4, CMAF and fragmented MP4 files are built from a hierarchy of **boxes** (also called
//! atoms). Every box starts with a small header followed by a payload that holds either raw
//! data, typed fields, or more boxes.
//!
//! ## Box Header Layout
//! - **size** (4 bytes, big-endian): total size of the box including the header.
//!   - `1` means a 64-bit *largesize* follows the type, giving a 16-byte header.
//!   - `0` means the box extends to the end of its enclosing range.
//! - **type** (4 bytes): a four-character code such as `ftyp`, `moov` or `mdat`.
//! - **usertype** (16 bytes): only present when the type is `uuid`.
//!
//! Some boxes are *FullBoxes*: their payload starts with a 1-byte version and 3 bytes of flags.
//! The version usually selects between 32-bit and 64-bit time fields.
//!
//! ## What This Library Does
//! This library does not play, mux or rewrite media. It turns an arbitrary byte buffer into a
//! tree of [`Mp4Box`] records, each with named [`BoxField`]s, and reports every structural
//! problem it recovers from as a warning instead of failing.
//! - The `reader` module walks box headers and builds the tree (see [`walk_boxes`]).
//! - The `boxes` module holds the per-type field decoders and the registry that maps a
//!   four-character code to its decoder.
//! - The `field` module defines decoded values and the bounds-checked payload reader.
//!
//! ```
//! let mut data = Vec::new();
//! data.extend_from_slice(&16u32.to_be_bytes());
//! data.extend_from_slice(b"free");
//! data.extend_from_slice(&[0u8; 8]);
//!
//! let tree = mp4_box::walk_boxes(&data);
//! assert_eq!(tree.boxes.len(), 1);
//! assert_eq!(tree.boxes[0].box_type, "free");
//! assert!(tree.warnings.is_empty());
//! ```

pub mod boxes;
pub mod field;
pub mod reader;

pub use field::{BoxField, FieldValue};
pub use reader::{walk_boxes, walk_boxes_with, BoxTree, Mp4Box, WalkerConfig};

/// Renders a four-character code. Bytes outside the printable Latin-1 range become `?`,
/// so codes like `©too` inside `ilst` keep their marker.
pub fn format_fourcc(fourcc: &[u8; 4]) -> String {
    fourcc
        .iter()
        .map(|&b| if b >= 0x20 && b != 0x7f && !(0x80..0xa0).contains(&b) { b as char } else { '?' })
        .collect()
}

/// Formats 16 raw bytes as a hyphenated lowercase hex identifier (8-4-4-4-12).
pub fn format_uuid(bytes: &[u8; 16]) -> String {
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}-{}-{}-{}-{}", &hex[0..8], &hex[8..12], &hex[12..16], &hex[16..20], &hex[20..32])
}

pub fn format_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_keeps_latin1_markers() {
        assert_eq!(format_fourcc(b"moov"), "moov");
        assert_eq!(format_fourcc(&[0xa9, b't', b'o', b'o']), "©too");
        assert_eq!(format_fourcc(&[0, b'a', b'b', b'c']), "?abc");
    }

    #[test]
    fn uuid_is_hyphenated() {
        let id = [
            0xed, 0xef, 0x8b, 0xa9, 0x79, 0xd6, 0x4a, 0xce, 0xa3, 0xc8, 0x27, 0xdc, 0xd5, 0x1d,
            0x21, 0xed,
        ];
        let text = format_uuid(&id);
        assert_eq!(text, "edef8ba9-79d6-4ace-a3c8-27dcd51d21ed");
        assert_eq!(text.len(), 36);
    }
}

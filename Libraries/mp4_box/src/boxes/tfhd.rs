use super::FullBoxHeader;
use crate::field::{Details, FieldReader};

pub const BASE_DATA_OFFSET_PRESENT: u32 = 0x000001;
pub const SAMPLE_DESCRIPTION_INDEX_PRESENT: u32 = 0x000002;
pub const DEFAULT_SAMPLE_DURATION_PRESENT: u32 = 0x000008;
pub const DEFAULT_SAMPLE_SIZE_PRESENT: u32 = 0x000010;
pub const DEFAULT_SAMPLE_FLAGS_PRESENT: u32 = 0x000020;
pub const DURATION_IS_EMPTY: u32 = 0x010000;
pub const DEFAULT_BASE_IS_MOOF: u32 = 0x020000;

// Track Fragment Header Box (`tfhd`).
//
// Every field after `track_id` is optional and present only when its flag bit is set
// (ISO/IEC 14496-12, 8.8.7). Reading a field whose bit is clear would misalign everything
// after it, so each read is gated.
pub(super) fn decode(header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("track_id", reader.u32()?);

    if header.has(BASE_DATA_OFFSET_PRESENT) {
        out.push("base_data_offset", reader.u64()?);
    }
    if header.has(SAMPLE_DESCRIPTION_INDEX_PRESENT) {
        out.push("sample_description_index", reader.u32()?);
    }
    if header.has(DEFAULT_SAMPLE_DURATION_PRESENT) {
        out.push("default_sample_duration", reader.u32()?);
    }
    if header.has(DEFAULT_SAMPLE_SIZE_PRESENT) {
        out.push("default_sample_size", reader.u32()?);
    }
    if header.has(DEFAULT_SAMPLE_FLAGS_PRESENT) {
        out.push("default_sample_flags", format!("0x{:08x}", reader.u32()?));
    }
    if header.has(DURATION_IS_EMPTY) {
        out.push("duration_is_empty", true);
    }
    if header.has(DEFAULT_BASE_IS_MOOF) {
        out.push("default_base_is_moof", true);
    }
    Some(())
}

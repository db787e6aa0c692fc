use super::FullBoxHeader;
use crate::field::{Details, FieldReader};

// Movie Extends Header Box (`mehd`): the overall duration of a fragmented movie, 64-bit in
// version 1.
pub(super) fn decode_mehd(header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("fragment_duration", reader.sized(header.is_wide())?);
    Some(())
}

// Track Extends Box (`trex`): per-track defaults used by movie fragments.
pub(super) fn decode_trex(_header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("track_id", reader.u32()?);
    out.push("default_sample_description_index", reader.u32()?);
    out.push("default_sample_duration", reader.u32()?);
    out.push("default_sample_size", reader.u32()?);
    out.push("default_sample_flags", format!("0x{:08x}", reader.u32()?));
    Some(())
}

use super::FullBoxHeader;
use crate::field::{Details, FieldReader};

/// Number of edit list entries listed individually.
const LISTED_ENTRIES: u32 = 4;

// The Edit List Box (`elst`) maps media time onto the presentation timeline. Entry fields
// are 64-bit in version 1; a media_time of -1 marks an empty edit.
pub(super) fn decode(header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    let count = reader.u32()?;
    out.push("entry_count", count);

    let wide = header.is_wide();
    for index in 0..count.min(LISTED_ENTRIES) {
        let segment_duration = reader.sized(wide)?;
        let media_time = if wide { reader.i64()? } else { i64::from(reader.i32()?) };
        let rate = reader.i16()?;
        reader.skip(2)?; // media_rate_fraction
        out.push(
            format!("entry[{}]", index),
            format!("segment_duration={} media_time={} rate={}", segment_duration, media_time, rate),
        );
    }
    Some(())
}

use super::FullBoxHeader;
use crate::field::{Details, FieldReader};

// Sample table boxes. Tables can hold millions of entries, so only counts, totals and the
// first entry are reported.

// Decoding Time to Sample Box (`stts`): run-length (sample_count, sample_delta) pairs.
pub(super) fn decode_stts(_header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    let count = reader.u32()?;
    out.push("entry_count", count);

    let mut samples = 0u64;
    let mut duration = 0u64;
    let mut read = 0u32;
    while read < count {
        let (Some(sample_count), Some(delta)) = (reader.u32(), reader.u32()) else {
            break;
        };
        samples += u64::from(sample_count);
        duration = duration.saturating_add(u64::from(sample_count) * u64::from(delta));
        read += 1;
    }
    out.push("total_samples", samples);
    out.push("total_duration", duration);
    Some(())
}

// `stsc` and `stss`: only the entry count is of interest.
pub(super) fn decode_entry_count(_header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("entry_count", reader.u32()?);
    Some(())
}

// Sample Size Box (`stsz`): a constant size, or zero followed by one size per sample.
pub(super) fn decode_stsz(_header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    let sample_size = reader.u32()?;
    out.push("sample_size", sample_size);
    out.push("sample_count", reader.u32()?);
    if sample_size == 0 {
        out.push("first_sample_size", reader.u32()?);
    }
    Some(())
}

// Chunk Offset Box (`stco`), 32-bit offsets.
pub(super) fn decode_stco(_header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    let count = reader.u32()?;
    out.push("entry_count", count);
    if count > 0 {
        out.push("first_chunk_offset", reader.u32()?);
    }
    Some(())
}

// Chunk Large Offset Box (`co64`), 64-bit offsets.
pub(super) fn decode_co64(_header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    let count = reader.u32()?;
    out.push("entry_count", count);
    if count > 0 {
        out.push("first_chunk_offset", reader.u64()?);
    }
    Some(())
}

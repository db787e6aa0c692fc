use super::FullBoxHeader;
use crate::field::{Details, FieldReader};

pub const DATA_OFFSET_PRESENT: u32 = 0x000001;
pub const FIRST_SAMPLE_FLAGS_PRESENT: u32 = 0x000004;
pub const SAMPLE_DURATION_PRESENT: u32 = 0x000100;
pub const SAMPLE_SIZE_PRESENT: u32 = 0x000200;
pub const SAMPLE_FLAGS_PRESENT: u32 = 0x000400;
pub const SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT: u32 = 0x000800;

/// Number of samples listed individually; the rest only count towards the totals.
const LISTED_SAMPLES: u64 = 3;

#[derive(Debug, Default)]
struct Sample {
    duration: Option<u32>,
    size: Option<u32>,
    flags: Option<u32>,
    composition_offset: Option<i64>,
}

// Track Fragment Run Box (`trun`).
//
// `data_offset` and `first_sample_flags` are gated by flag bits, and so is each of the four
// per-sample fields. The sample loop stops at the end of the payload even when
// `sample_count` claims more.
pub(super) fn decode(header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    let sample_count = reader.u32()?;
    out.push("sample_count", sample_count);

    if header.has(DATA_OFFSET_PRESENT) {
        out.push("data_offset", reader.i32()?);
    }
    if header.has(FIRST_SAMPLE_FLAGS_PRESENT) {
        out.push("first_sample_flags", format!("0x{:08x}", reader.u32()?));
    }

    let per_sample = [
        SAMPLE_DURATION_PRESENT,
        SAMPLE_SIZE_PRESENT,
        SAMPLE_FLAGS_PRESENT,
        SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT,
    ]
    .iter()
    .filter(|&&flag| header.has(flag))
    .count();
    if per_sample == 0 {
        return Some(());
    }

    let mut decoded = 0u64;
    let mut total_duration = 0u64;
    let mut total_size = 0u64;
    while decoded < u64::from(sample_count) {
        let Some(sample) = read_sample(header, reader) else {
            break;
        };
        total_duration += u64::from(sample.duration.unwrap_or(0));
        total_size += u64::from(sample.size.unwrap_or(0));
        if decoded < LISTED_SAMPLES {
            out.push(format!("sample[{}]", decoded), describe(&sample));
        }
        decoded += 1;
    }

    if decoded < u64::from(sample_count) {
        out.push("samples_decoded", decoded);
    }
    if header.has(SAMPLE_DURATION_PRESENT) {
        out.push("total_sample_duration", total_duration);
    }
    if header.has(SAMPLE_SIZE_PRESENT) {
        out.push("total_sample_size", total_size);
    }
    Some(())
}

fn read_sample(header: &FullBoxHeader, reader: &mut FieldReader) -> Option<Sample> {
    let mut sample = Sample::default();
    if header.has(SAMPLE_DURATION_PRESENT) {
        sample.duration = Some(reader.u32()?);
    }
    if header.has(SAMPLE_SIZE_PRESENT) {
        sample.size = Some(reader.u32()?);
    }
    if header.has(SAMPLE_FLAGS_PRESENT) {
        sample.flags = Some(reader.u32()?);
    }
    if header.has(SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT) {
        // unsigned in version 0, signed from version 1 on
        sample.composition_offset = Some(if header.version == 0 {
            i64::from(reader.u32()?)
        } else {
            i64::from(reader.i32()?)
        });
    }
    Some(sample)
}

fn describe(sample: &Sample) -> String {
    let mut parts = Vec::new();
    if let Some(duration) = sample.duration {
        parts.push(format!("duration={}", duration));
    }
    if let Some(size) = sample.size {
        parts.push(format!("size={}", size));
    }
    if let Some(flags) = sample.flags {
        parts.push(format!("flags=0x{:08x}", flags));
    }
    if let Some(offset) = sample.composition_offset {
        parts.push(format!("cts_offset={}", offset));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use crate::boxes::decode_fields;
    use crate::FieldValue;

    fn get(fields: &[crate::BoxField], name: &str) -> Option<FieldValue> {
        fields.iter().find(|f| f.name == name).map(|f| f.value.clone())
    }

    #[test]
    fn gated_fields_and_totals() {
        // version 1, flags: data-offset + duration + size + composition offset
        let mut payload = vec![1, 0x00, 0x0b, 0x01];
        payload.extend_from_slice(&2u32.to_be_bytes());
        payload.extend_from_slice(&(-8i32).to_be_bytes());
        for (duration, size, cts) in [(1001u32, 500u32, -1001i32), (1001, 300, 0)] {
            payload.extend_from_slice(&duration.to_be_bytes());
            payload.extend_from_slice(&size.to_be_bytes());
            payload.extend_from_slice(&cts.to_be_bytes());
        }

        let fields = decode_fields(b"trun", None, &payload);
        assert_eq!(get(&fields, "sample_count"), Some(FieldValue::Unsigned(2)));
        assert_eq!(get(&fields, "data_offset"), Some(FieldValue::Signed(-8)));
        assert_eq!(get(&fields, "first_sample_flags"), None);
        assert_eq!(
            get(&fields, "sample[0]"),
            Some(FieldValue::Text("duration=1001 size=500 cts_offset=-1001".into()))
        );
        assert_eq!(get(&fields, "total_sample_duration"), Some(FieldValue::Unsigned(2002)));
        assert_eq!(get(&fields, "total_sample_size"), Some(FieldValue::Unsigned(800)));
        assert_eq!(get(&fields, "samples_decoded"), None);
    }

    #[test]
    fn overstated_sample_count_stops_at_payload_end() {
        let mut payload = vec![0, 0x00, 0x02, 0x00]; // sample size only
        payload.extend_from_slice(&u32::MAX.to_be_bytes());
        payload.extend_from_slice(&100u32.to_be_bytes());
        payload.extend_from_slice(&[0, 0]); // half a sample

        let fields = decode_fields(b"trun", None, &payload);
        assert_eq!(get(&fields, "samples_decoded"), Some(FieldValue::Unsigned(1)));
        assert_eq!(get(&fields, "total_sample_size"), Some(FieldValue::Unsigned(100)));
    }
}

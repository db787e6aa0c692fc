use super::{seconds, FullBoxHeader};
use crate::field::{Details, FieldReader};

/// Number of references listed individually.
const LISTED_REFERENCES: u16 = 3;

// Segment Index Box (`sidx`).
//
// earliest_presentation_time and first_offset are 64-bit in version 1. Each reference is 12
// bytes: a type bit with a 31-bit referenced size, the subsegment duration, and SAP info.
pub(super) fn decode(header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("reference_id", reader.u32()?);
    let timescale = reader.u32()?;
    out.push("timescale", timescale);

    let wide = header.is_wide();
    out.push("earliest_presentation_time", reader.sized(wide)?);
    out.push("first_offset", reader.sized(wide)?);
    reader.skip(2)?;

    let count = reader.u16()?;
    out.push("reference_count", count);

    let mut total_size = 0u64;
    let mut total_duration = 0u64;
    let mut decoded = 0u16;
    while decoded < count {
        let (Some(word), Some(duration), Some(sap)) = (reader.u32(), reader.u32(), reader.u32()) else {
            break;
        };
        let referenced_size = word & 0x7fff_ffff;
        total_size += u64::from(referenced_size);
        total_duration += u64::from(duration);
        if decoded < LISTED_REFERENCES {
            let kind = if word >> 31 == 1 { "index" } else { "media" };
            out.push(
                format!("reference[{}]", decoded),
                format!(
                    "type={} size={} duration={} starts_with_sap={}",
                    kind,
                    referenced_size,
                    duration,
                    sap >> 31 == 1
                ),
            );
        }
        decoded += 1;
    }

    if decoded < count {
        out.push("references_decoded", decoded);
    }
    out.push("total_referenced_size", total_size);
    out.push("total_subsegment_duration", total_duration);
    if let Some(secs) = seconds(total_duration, timescale) {
        out.push("total_duration_seconds", secs);
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use crate::boxes::decode_fields;
    use crate::FieldValue;

    #[test]
    fn references_are_summed() {
        let mut payload = vec![0, 0, 0, 0];
        payload.extend_from_slice(&1u32.to_be_bytes());
        payload.extend_from_slice(&1000u32.to_be_bytes());
        payload.extend_from_slice(&0u32.to_be_bytes());
        payload.extend_from_slice(&0u32.to_be_bytes());
        payload.extend_from_slice(&[0, 0]);
        payload.extend_from_slice(&2u16.to_be_bytes());
        for size in [1000u32, 2000] {
            payload.extend_from_slice(&size.to_be_bytes());
            payload.extend_from_slice(&2000u32.to_be_bytes());
            payload.extend_from_slice(&0x9000_0000u32.to_be_bytes());
        }

        let fields = decode_fields(b"sidx", None, &payload);
        let get = |name: &str| fields.iter().find(|f| f.name == name).map(|f| f.value.clone());
        assert_eq!(get("reference_count"), Some(FieldValue::Unsigned(2)));
        assert_eq!(get("total_referenced_size"), Some(FieldValue::Unsigned(3000)));
        assert_eq!(get("total_duration_seconds"), Some(FieldValue::Float(4.0)));
        assert_eq!(
            get("reference[0]"),
            Some(FieldValue::Text("type=media size=1000 duration=2000 starts_with_sap=true".into()))
        );
    }
}

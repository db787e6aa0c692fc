use super::{epoch_value, fixed_16_16, fixed_8_8, seconds, FullBoxHeader};
use crate::field::{Details, FieldReader};

// The Movie Header Box (`mvhd`) carries global information about the presentation.
//
// Fields:
// - `creation_time` / `modification_time`: seconds since 1904-01-01, 32-bit in version 0 and
//   64-bit in version 1. Rendered as ISO-8601 when representable.
// - `timescale`: time units per second for the movie.
// - `duration`: presentation length in `timescale` units, 32/64-bit like the times.
// - `rate`: 16.16 fixed-point playback rate (1.0 is normal speed).
// - `volume`: 8.8 fixed-point volume (1.0 is full volume).
// - `next_track_id`: the next free track identifier.
pub(super) fn decode(header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    let wide = header.is_wide();
    out.push("creation_time", epoch_value(reader.sized(wide)?));
    out.push("modification_time", epoch_value(reader.sized(wide)?));

    let timescale = reader.u32()?;
    out.push("timescale", timescale);
    let duration = reader.sized(wide)?;
    out.push("duration", duration);
    if let Some(secs) = seconds(duration, timescale) {
        out.push("duration_seconds", secs);
    }

    out.push("rate", fixed_16_16(reader.i32()?));
    out.push("volume", fixed_8_8(reader.i16()?));

    // reserved (10) + matrix (36) + pre_defined (24)
    reader.skip(10 + 36 + 24)?;
    out.push("next_track_id", reader.u32()?);
    Some(())
}

#[cfg(test)]
mod tests {
    use crate::boxes::{decode_fields, MAC_EPOCH_DELTA};
    use crate::FieldValue;

    fn field<'a>(fields: &'a [crate::BoxField], name: &str) -> Option<&'a FieldValue> {
        fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    fn mvhd_v1(duration: u64) -> Vec<u8> {
        let mut payload = vec![1, 0, 0, 0];
        payload.extend_from_slice(&(MAC_EPOCH_DELTA as u64).to_be_bytes());
        payload.extend_from_slice(&u64::MAX.to_be_bytes());
        payload.extend_from_slice(&90_000u32.to_be_bytes());
        payload.extend_from_slice(&duration.to_be_bytes());
        payload.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        payload.extend_from_slice(&0x0100u16.to_be_bytes());
        payload.extend_from_slice(&[0u8; 70]);
        payload.extend_from_slice(&3u32.to_be_bytes());
        payload
    }

    #[test]
    fn version_one_keeps_full_64_bit_duration() {
        let duration = (1u64 << 53) + 1;
        let fields = decode_fields(b"mvhd", None, &mvhd_v1(duration));

        assert_eq!(field(&fields, "version"), Some(&FieldValue::Unsigned(1)));
        assert_eq!(field(&fields, "duration"), Some(&FieldValue::Unsigned(duration)));
        assert_eq!(field(&fields, "creation_time"), Some(&FieldValue::Text("1970-01-01T00:00:00.000Z".into())));
        assert_eq!(field(&fields, "modification_time"), Some(&FieldValue::Unsigned(u64::MAX)));
        assert_eq!(field(&fields, "rate"), Some(&FieldValue::Float(1.0)));
        assert_eq!(field(&fields, "volume"), Some(&FieldValue::Float(1.0)));
        assert_eq!(field(&fields, "next_track_id"), Some(&FieldValue::Unsigned(3)));
    }

    #[test]
    fn version_zero_uses_32_bit_fields() {
        let mut payload = vec![0, 0, 0, 0];
        payload.extend_from_slice(&0u32.to_be_bytes());
        payload.extend_from_slice(&0u32.to_be_bytes());
        payload.extend_from_slice(&1000u32.to_be_bytes());
        payload.extend_from_slice(&5000u32.to_be_bytes());
        let fields = decode_fields(b"mvhd", None, &payload);

        assert_eq!(field(&fields, "creation_time"), Some(&FieldValue::Text("1904-01-01T00:00:00.000Z".into())));
        assert_eq!(field(&fields, "duration"), Some(&FieldValue::Unsigned(5000)));
        assert_eq!(field(&fields, "duration_seconds"), Some(&FieldValue::Float(5.0)));
        // rate and the rest are missing: decoding stops without panicking
        assert_eq!(field(&fields, "rate"), None);
    }
}

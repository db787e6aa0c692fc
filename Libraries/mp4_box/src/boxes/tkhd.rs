use super::{epoch_value, fixed_16_16, fixed_8_8, FullBoxHeader};
use crate::field::{Details, FieldReader};

const TRACK_ENABLED: u32 = 0x000001;
const TRACK_IN_MOVIE: u32 = 0x000002;
const TRACK_IN_PREVIEW: u32 = 0x000004;

// The Track Header Box (`tkhd`) describes one track: identity, timing, layering and the
// presentation size. Width and height are 16.16 fixed-point values.
pub(super) fn decode(header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("enabled", header.has(TRACK_ENABLED));
    out.push("in_movie", header.has(TRACK_IN_MOVIE));
    out.push("in_preview", header.has(TRACK_IN_PREVIEW));

    let wide = header.is_wide();
    out.push("creation_time", epoch_value(reader.sized(wide)?));
    out.push("modification_time", epoch_value(reader.sized(wide)?));
    out.push("track_id", reader.u32()?);
    reader.skip(4)?;
    out.push("duration", reader.sized(wide)?);

    reader.skip(8)?;
    out.push("layer", reader.i16()?);
    out.push("alternate_group", reader.i16()?);
    out.push("volume", fixed_8_8(reader.i16()?));
    reader.skip(2 + 36)?;
    out.push("width", fixed_16_16(reader.u32()? as i32));
    out.push("height", fixed_16_16(reader.u32()? as i32));
    Some(())
}

#[cfg(test)]
mod tests {
    use crate::boxes::decode_fields;
    use crate::FieldValue;

    #[test]
    fn presentation_size_is_fixed_point() {
        let mut payload = vec![0, 0, 0, 3];
        payload.extend_from_slice(&[0u8; 8]); // times
        payload.extend_from_slice(&1u32.to_be_bytes());
        payload.extend_from_slice(&[0u8; 4]);
        payload.extend_from_slice(&10_000u32.to_be_bytes());
        payload.extend_from_slice(&[0u8; 8]);
        payload.extend_from_slice(&[0u8; 6]); // layer, alternate_group, volume
        payload.extend_from_slice(&[0u8; 2 + 36]);
        payload.extend_from_slice(&(1920u32 << 16).to_be_bytes());
        payload.extend_from_slice(&(1080u32 << 16).to_be_bytes());

        let fields = decode_fields(b"tkhd", None, &payload);
        let get = |name: &str| fields.iter().find(|f| f.name == name).map(|f| f.value.clone());
        assert_eq!(get("enabled"), Some(FieldValue::Flag(true)));
        assert_eq!(get("in_preview"), Some(FieldValue::Flag(false)));
        assert_eq!(get("track_id"), Some(FieldValue::Unsigned(1)));
        assert_eq!(get("duration"), Some(FieldValue::Unsigned(10_000)));
        assert_eq!(get("width"), Some(FieldValue::Float(1920.0)));
        assert_eq!(get("height"), Some(FieldValue::Float(1080.0)));
    }
}

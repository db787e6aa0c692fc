use crate::field::{Details, FieldReader};
use crate::format_fourcc;

// File Type Box (`ftyp`) and Segment Type Box (`styp`).
// Both carry a major brand, a minor version and a list of compatible brands filling the
// rest of the payload.
pub(super) fn decode(reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("major_brand", format_fourcc(&reader.fourcc()?));
    out.push("minor_version", reader.u32()?);

    let mut brands = Vec::new();
    while let Some(brand) = reader.fourcc() {
        brands.push(format_fourcc(&brand));
    }
    out.push("compatible_brands", brands.join(", "));
    Some(())
}

#[cfg(test)]
mod tests {
    use crate::boxes::decode_fields;
    use crate::FieldValue;

    #[test]
    fn brands_are_listed() {
        let mut payload = Vec::new();
        payload.extend_from_slice(b"isom");
        payload.extend_from_slice(&512u32.to_be_bytes());
        payload.extend_from_slice(b"isomiso2avc1mp41");
        let fields = decode_fields(b"ftyp", None, &payload);
        assert_eq!(fields[0].value, FieldValue::Text("isom".into()));
        assert_eq!(fields[1].value, FieldValue::Unsigned(512));
        assert_eq!(fields[2].value, FieldValue::Text("isom, iso2, avc1, mp41".into()));
    }
}

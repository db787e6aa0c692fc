use super::{epoch_value, seconds, FullBoxHeader};
use crate::field::{Details, FieldReader};

// The Media Header Box (`mdhd`) holds the media timescale, duration and language of a track.
// The language is three 5-bit letters packed into 15 bits, each offset by 0x60.
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

    out.push("language", unpack_language(reader.u16()?));
    Some(())
}

fn unpack_language(packed: u16) -> String {
    [10u16, 5, 0]
        .iter()
        .map(|shift| (((packed >> shift) & 0x1f) as u8 + 0x60) as char)
        .collect()
}

use super::FullBoxHeader;
use crate::field::{Details, FieldReader};
use crate::format_fourcc;

// The Handler Reference Box (`hdlr`) declares the media type of a track (or the format of a
// `meta` box) followed by a human-readable name.
pub(super) fn decode(_header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    reader.skip(4)?; // pre_defined
    let handler = reader.fourcc()?;
    out.push("handler_type", format_fourcc(&handler));
    if let Some(kind) = describe_handler(&handler) {
        out.push("handler_kind", kind);
    }
    reader.skip(12)?;
    out.push("name", reader.c_string()?);
    Some(())
}

fn describe_handler(handler: &[u8; 4]) -> Option<&'static str> {
    match handler {
        b"vide" => Some("video"),
        b"soun" => Some("audio"),
        b"subt" | b"sbtl" | b"text" | b"clcp" => Some("subtitles"),
        b"meta" | b"mdir" => Some("metadata"),
        b"hint" => Some("hint"),
        _ => None,
    }
}

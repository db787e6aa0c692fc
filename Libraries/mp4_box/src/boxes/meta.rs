use crate::field::{Details, FieldReader};

// Meta Box (`meta`). In the ISO form the payload opens with version and flags; QuickTime
// writes the same box without them, so the children start right at the payload. The form is
// told apart the same way `child_offset` does it.
pub(super) fn decode(reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    let first = reader.u32()?;
    // an ISO meta may end right after version and flags
    if reader.fourcc().as_ref() == Some(b"hdlr") {
        out.push("form", "quicktime");
    } else {
        out.push("form", "iso");
        out.push("version", (first >> 24) as u8);
        out.push("flags", format!("0x{:06x}", first & 0x00ff_ffff));
    }
    Some(())
}

/// Offset of the first child box inside a `meta` payload.
///
/// A QuickTime `meta` has its `hdlr` child immediately, so the size word is followed by the
/// `hdlr` code at bytes 4..8. Anything else is treated as the ISO FullBox form.
pub fn child_offset(payload: &[u8]) -> usize {
    match payload.get(4..8) {
        Some(code) if code == b"hdlr" => 0,
        _ => 4,
    }
}

use super::FullBoxHeader;
use crate::field::{Details, FieldReader};

// Track Fragment Decode Time Box (`tfdt`). Live streams quickly outgrow 32 bits, which is why
// version 1 carries a 64-bit baseMediaDecodeTime; it is kept as an integer end to end.
pub(super) fn decode(header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("base_media_decode_time", reader.sized(header.is_wide())?);
    Some(())
}

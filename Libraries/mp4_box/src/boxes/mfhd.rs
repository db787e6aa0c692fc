use super::FullBoxHeader;
use crate::field::{Details, FieldReader};

// Movie Fragment Header Box (`mfhd`): the fragment sequence number.
pub(super) fn decode(_header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("sequence_number", reader.u32()?);
    Some(())
}

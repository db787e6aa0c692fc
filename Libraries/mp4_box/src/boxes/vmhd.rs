use super::{fixed_8_8, FullBoxHeader};
use crate::field::{Details, FieldReader};

// Video Media Header Box (`vmhd`): composition mode and the RGB opcolor.
pub(super) fn decode_vmhd(_header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("graphics_mode", reader.u16()?);
    let opcolor = [reader.u16()?, reader.u16()?, reader.u16()?];
    out.push("opcolor", format!("{}, {}, {}", opcolor[0], opcolor[1], opcolor[2]));
    Some(())
}

// Sound Media Header Box (`smhd`): 8.8 fixed-point stereo balance.
pub(super) fn decode_smhd(_header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("balance", fixed_8_8(reader.i16()?));
    Some(())
}

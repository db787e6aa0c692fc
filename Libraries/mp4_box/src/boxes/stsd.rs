use super::{fixed_16_16, FullBoxHeader};
use crate::field::{Details, FieldReader};
use crate::format_fourcc;

/// Bytes between a visual sample entry header and its first child box.
pub const VISUAL_ENTRY_LEN: usize = 78;
/// Bytes between an ISO audio sample entry header and its first child box.
pub const AUDIO_ENTRY_LEN: usize = 28;
/// Reserved bytes plus `data_reference_index`, shared by every sample entry.
pub const GENERIC_ENTRY_LEN: usize = 8;

/// Broad class of a sample entry, decided from its four-character code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleEntryKind {
    Visual,
    Audio,
    Other,
}

impl SampleEntryKind {
    pub fn of(box_type: &[u8; 4]) -> Self {
        match box_type {
            b"avc1" | b"avc2" | b"avc3" | b"avc4" | b"hvc1" | b"hev1" | b"dvh1" | b"dvhe"
            | b"dva1" | b"dvav" | b"vp08" | b"vp09" | b"av01" | b"mp4v" | b"encv" | b"s263"
            | b"mjp2" | b"jpeg" | b"vvc1" | b"vvi1" => SampleEntryKind::Visual,
            b"mp4a" | b"enca" | b"ac-3" | b"ec-3" | b"ac-4" | b"Opus" | b"fLaC" | b"alac"
            | b"mha1" | b"mhm1" | b"samr" | b"sawb" | b"dtsc" | b"dtse" | b"dtsh" | b"dtsl"
            | b"ipcm" | b"fpcm" | b".mp3" => SampleEntryKind::Audio,
            _ => SampleEntryKind::Other,
        }
    }
}

/// Length of the fixed part of a sample entry, i.e. where its child boxes start.
///
/// QuickTime sound descriptions reuse the ISO reserved words as a version number: version 1
/// appends 16 bytes and version 2 appends 36.
pub fn sample_entry_header_len(box_type: &[u8; 4], payload: &[u8]) -> usize {
    match SampleEntryKind::of(box_type) {
        SampleEntryKind::Visual => VISUAL_ENTRY_LEN,
        SampleEntryKind::Audio => {
            let version = payload.get(8..10).map(|b| u16::from_be_bytes([b[0], b[1]])).unwrap_or(0);
            match version {
                1 => AUDIO_ENTRY_LEN + 16,
                2 => AUDIO_ENTRY_LEN + 36,
                _ => AUDIO_ENTRY_LEN,
            }
        }
        SampleEntryKind::Other => GENERIC_ENTRY_LEN,
    }
}

// Sample Description Box (`stsd`): an entry count followed by the sample entries, which the
// walker decodes as children.
pub(super) fn decode(_header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("entry_count", reader.u32()?);
    Some(())
}

// One entry of the `stsd` table.
//
// All entries open with 6 reserved bytes and a data_reference_index. Visual entries then carry
// dimensions, resolution, frame count and a Pascal-style compressor name; audio entries carry
// channel count, sample size and a 16.16 sample rate.
pub(super) fn decode_sample_entry(box_type: &[u8; 4], reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("format", format_fourcc(box_type));
    reader.skip(6)?;
    out.push("data_reference_index", reader.u16()?);

    match SampleEntryKind::of(box_type) {
        SampleEntryKind::Visual => decode_visual(reader, out),
        SampleEntryKind::Audio => decode_audio(reader, out),
        SampleEntryKind::Other => Some(()),
    }
}

fn decode_visual(reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    reader.skip(16)?; // pre_defined, reserved, pre_defined[3]
    out.push("width", reader.u16()?);
    out.push("height", reader.u16()?);
    out.push("horizontal_resolution", fixed_16_16(reader.i32()?));
    out.push("vertical_resolution", fixed_16_16(reader.i32()?));
    reader.skip(4)?;
    out.push("frame_count", reader.u16()?);

    let name = reader.bytes(32)?;
    let len = usize::from(name[0]).min(31);
    let compressor = String::from_utf8_lossy(&name[1..1 + len]).trim_end_matches('\0').to_string();
    if !compressor.is_empty() {
        out.push("compressor_name", compressor);
    }

    out.push("depth", reader.u16()?);
    Some(())
}

fn decode_audio(reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    let version = reader.u16()?;
    if version > 0 {
        out.push("sound_version", version);
    }
    reader.skip(6)?;
    out.push("channel_count", reader.u16()?);
    out.push("sample_size", reader.u16()?);
    reader.skip(4)?;
    // 16.16 fixed point; the integer part is the rate for all common streams
    out.push("sample_rate", reader.u32()? >> 16);
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::decode_fields;
    use crate::FieldValue;

    fn visual_entry(width: u16, height: u16) -> Vec<u8> {
        let mut payload = vec![0u8; 6];
        payload.extend_from_slice(&1u16.to_be_bytes());
        payload.extend_from_slice(&[0u8; 16]);
        payload.extend_from_slice(&width.to_be_bytes());
        payload.extend_from_slice(&height.to_be_bytes());
        payload.extend_from_slice(&0x0048_0000u32.to_be_bytes());
        payload.extend_from_slice(&0x0048_0000u32.to_be_bytes());
        payload.extend_from_slice(&[0u8; 4]);
        payload.extend_from_slice(&1u16.to_be_bytes());
        let mut name = [0u8; 32];
        name[0] = 4;
        name[1..5].copy_from_slice(b"x264");
        payload.extend_from_slice(&name);
        payload.extend_from_slice(&0x0018u16.to_be_bytes());
        payload.extend_from_slice(&(-1i16).to_be_bytes());
        payload
    }

    #[test]
    fn visual_entry_fields() {
        let payload = visual_entry(1920, 1080);
        assert_eq!(payload.len(), VISUAL_ENTRY_LEN);

        let fields = decode_fields(b"avc1", Some(b"stsd"), &payload);
        let get = |name: &str| fields.iter().find(|f| f.name == name).map(|f| f.value.clone());
        assert_eq!(get("format"), Some(FieldValue::Text("avc1".into())));
        assert_eq!(get("width"), Some(FieldValue::Unsigned(1920)));
        assert_eq!(get("height"), Some(FieldValue::Unsigned(1080)));
        assert_eq!(get("horizontal_resolution"), Some(FieldValue::Float(72.0)));
        assert_eq!(get("compressor_name"), Some(FieldValue::Text("x264".into())));
        assert_eq!(get("depth"), Some(FieldValue::Unsigned(24)));
    }

    #[test]
    fn audio_entry_fields() {
        let mut payload = vec![0u8; 6];
        payload.extend_from_slice(&1u16.to_be_bytes());
        payload.extend_from_slice(&[0u8; 8]);
        payload.extend_from_slice(&2u16.to_be_bytes());
        payload.extend_from_slice(&16u16.to_be_bytes());
        payload.extend_from_slice(&[0u8; 4]);
        payload.extend_from_slice(&(48_000u32 << 16).to_be_bytes());
        assert_eq!(payload.len(), AUDIO_ENTRY_LEN);

        let fields = decode_fields(b"mp4a", Some(b"stsd"), &payload);
        let get = |name: &str| fields.iter().find(|f| f.name == name).map(|f| f.value.clone());
        assert_eq!(get("channel_count"), Some(FieldValue::Unsigned(2)));
        assert_eq!(get("sample_rate"), Some(FieldValue::Unsigned(48_000)));
        assert_eq!(get("sound_version"), None);
    }

    #[test]
    fn header_lengths_follow_entry_kind() {
        assert_eq!(sample_entry_header_len(b"hvc1", &[]), 78);
        assert_eq!(sample_entry_header_len(b"mp4a", &[0; 28]), 28);
        let mut quicktime_v1 = [0u8; 44];
        quicktime_v1[9] = 1;
        assert_eq!(sample_entry_header_len(b"mp4a", &quicktime_v1), 44);
        assert_eq!(sample_entry_header_len(b"wvtt", &[]), 8);
    }
}

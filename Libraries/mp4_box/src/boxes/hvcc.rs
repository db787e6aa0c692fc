use crate::field::{Details, FieldReader};

/// Arrays whose units are listed by type and length; the rest are only counted.
const LISTED_ARRAYS: u8 = 8;

fn nal_type_name(nal_type: u8) -> Option<&'static str> {
    match nal_type {
        32 => Some("VPS"),
        33 => Some("SPS"),
        34 => Some("PPS"),
        39 => Some("SEI_PREFIX"),
        40 => Some("SEI_SUFFIX"),
        _ => None,
    }
}

// HEVC Decoder Configuration Record (`hvcC`, ISO/IEC 14496-15 8.3.3.1).
//
// A fixed 23-byte prefix (profile space/tier/idc, 32 compatibility flags, 48 constraint bits,
// level, segmentation, parallelism, chroma, bit depths, frame rate, length size) is followed by
// `numOfArrays` arrays of length-prefixed NAL units. Array walking is bounded by the payload:
// a unit that would run past the end ends the walk without an error.
pub(super) fn decode(reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("configuration_version", reader.u8()?);

    let profile = reader.u8()?;
    out.push("general_profile_space", profile >> 6);
    out.push("general_tier_flag", (profile >> 5) & 0x01 == 1);
    out.push("general_profile_idc", profile & 0x1f);
    out.push("general_profile_compatibility_flags", format!("0x{:08x}", reader.u32()?));

    let constraints = reader.bytes(6)?;
    out.push("general_constraint_indicator_flags", crate::format_hex(constraints));
    out.push("general_level_idc", reader.u8()?);
    out.push("min_spatial_segmentation_idc", reader.u16()? & 0x0fff);
    out.push("parallelism_type", reader.u8()? & 0x03);
    out.push("chroma_format_idc", reader.u8()? & 0x03);
    out.push("bit_depth_luma", (reader.u8()? & 0x07) + 8);
    out.push("bit_depth_chroma", (reader.u8()? & 0x07) + 8);
    out.push("avg_frame_rate", reader.u16()?);

    let packed = reader.u8()?;
    out.push("constant_frame_rate", packed >> 6);
    out.push("num_temporal_layers", (packed >> 3) & 0x07);
    out.push("temporal_id_nested", (packed >> 2) & 0x01 == 1);
    out.push("nal_length_size", (packed & 0x03) + 1);

    let array_count = reader.u8()?;
    out.push("num_of_arrays", array_count);

    let mut total_units = 0u32;
    for index in 0..array_count {
        let Some(header) = reader.u8() else { break };
        let Some(unit_count) = reader.u16() else { break };
        let nal_type = header & 0x3f;
        let lengths = super::avcc::read_parameter_sets(reader, unit_count);
        total_units += lengths.len() as u32;

        if index < LISTED_ARRAYS {
            let name = match nal_type_name(nal_type) {
                Some(name) => format!("{} ({})", name, nal_type),
                None => nal_type.to_string(),
            };
            out.push(
                format!("array[{}]", index),
                format!("type={} count={} lengths={}", name, lengths.len(), super::avcc::join(&lengths)),
            );
        }
        if lengths.len() < usize::from(unit_count) {
            break;
        }
    }
    out.push("nal_unit_count", total_units);
    Some(())
}

use crate::field::{Details, FieldReader};

// AVC Decoder Configuration Record (`avcC`, ISO/IEC 14496-15 5.3.3.1).
//
// configurationVersion, profile, profile compatibility and level come first; together the
// last three form the RFC 6381 codec suffix (`avc1.64001f`). The parameter sets follow as
// 16-bit length-prefixed NAL units.
pub(super) fn decode(reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("configuration_version", reader.u8()?);
    let profile = reader.u8()?;
    let compatibility = reader.u8()?;
    let level = reader.u8()?;
    out.push("profile", profile);
    out.push("profile_compatibility", compatibility);
    out.push("level", level);
    out.push("codec", format!("avc1.{:02x}{:02x}{:02x}", profile, compatibility, level));
    out.push("nal_length_size", (reader.u8()? & 0x03) + 1);

    let sps_count = reader.u8()? & 0x1f;
    out.push("sps_count", sps_count);
    let sps = read_parameter_sets(reader, u16::from(sps_count));
    if !sps.is_empty() {
        out.push("sps_lengths", join(&sps));
    }

    let pps_count = reader.u8()?;
    out.push("pps_count", pps_count);
    let pps = read_parameter_sets(reader, u16::from(pps_count));
    if !pps.is_empty() {
        out.push("pps_lengths", join(&pps));
    }
    Some(())
}

/// Reads up to `count` length-prefixed units, returning the lengths of those that fit.
pub(crate) fn read_parameter_sets(reader: &mut FieldReader, count: u16) -> Vec<u16> {
    let mut lengths = Vec::new();
    for _ in 0..count {
        let Some(len) = reader.u16() else { break };
        if reader.skip(usize::from(len)).is_none() {
            break;
        }
        lengths.push(len);
    }
    lengths
}

pub(crate) fn join(lengths: &[u16]) -> String {
    lengths.iter().map(u16::to_string).collect::<Vec<_>>().join(", ")
}

use super::FullBoxHeader;
use crate::field::{Details, FieldReader};
use crate::{format_fourcc, format_hex, format_uuid};

/// DRM systems recognised by their `pssh` SystemID.
const KNOWN_SYSTEMS: &[(&str, &str)] = &[
    ("edef8ba9-79d6-4ace-a3c8-27dcd51d21ed", "Widevine"),
    ("9a04f079-9840-4286-ab92-e65be0885f95", "PlayReady"),
    ("94ce86fb-07ff-4f43-adb8-93d2fa968ca2", "FairPlay"),
    ("1077efec-c0b2-4d02-ace3-3c1e52e2fb4b", "ClearKey"),
    ("e2719d58-a985-b3c9-781a-b030af78d30e", "ClearKey (DASH-IF)"),
];

pub fn system_name(system_id: &str) -> Option<&'static str> {
    KNOWN_SYSTEMS.iter().find(|(id, _)| *id == system_id).map(|(_, name)| *name)
}

// Protection System Specific Header Box (`pssh`).
// - system_id: 16 bytes.
// - version 1 adds a KID list (count + 16 bytes each).
// - data: opaque, length-prefixed; only the size is reported.
pub(super) fn decode_pssh(header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    let system_id = format_uuid(&reader.array16()?);
    if let Some(name) = system_name(&system_id) {
        out.push("system", name);
    }
    out.push("system_id", system_id);

    if header.version > 0 {
        let kid_count = reader.u32()?;
        out.push("kid_count", kid_count);
        for index in 0..kid_count {
            let kid = format_uuid(&reader.array16()?);
            out.push(format!("kid[{}]", index), kid);
        }
    }

    out.push("data_size", reader.u32()?);
    Some(())
}

// Scheme Type Box (`schm`): the protection scheme (cenc, cbcs, ...) and its version, with an
// optional URI when flag 0x01 is set.
pub(super) fn decode_schm(header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("scheme_type", format_fourcc(&reader.fourcc()?));
    let version = reader.u32()?;
    out.push("scheme_version", format!("{}.{}", version >> 16, version & 0xffff));
    if header.has(0x000001) {
        out.push("scheme_uri", reader.c_string()?);
    }
    Some(())
}

// Track Encryption Box (`tenc`).
//
// Version 0 leaves two bytes reserved; version 1 packs the pattern encryption block counts
// (cbcs) into the second one. A protected track with a zero per-sample IV size carries a
// constant IV after the default KID.
pub(super) fn decode_tenc(header: &FullBoxHeader, reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    reader.skip(1)?;
    let pattern = reader.u8()?;
    if header.version > 0 {
        out.push("default_crypt_byte_block", pattern >> 4);
        out.push("default_skip_byte_block", pattern & 0x0f);
    }

    let protected = reader.u8()?;
    out.push("default_is_protected", protected == 1);
    let iv_size = reader.u8()?;
    out.push("default_per_sample_iv_size", iv_size);
    out.push("default_kid", format_uuid(&reader.array16()?));

    if protected == 1 && iv_size == 0 {
        let len = reader.u8()?;
        out.push("default_constant_iv", format_hex(reader.bytes(usize::from(len))?));
    }
    Some(())
}

// Original Format Box (`frma`): the codec the encrypted sample entry wraps.
pub(super) fn decode_frma(reader: &mut FieldReader, out: &mut Details) -> Option<()> {
    out.push("data_format", format_fourcc(&reader.fourcc()?));
    Some(())
}

// Per-type field decoders for ISO-BMFF boxes.
//
// The walker in `reader` only understands headers. Once a box has been framed, its payload
// window is handed to `decode_fields`, which looks the four-character code up in the registry
// below and runs the matching strategy:
//
// - `Decoder::FullBox`: the payload starts with version + flags. These are read uniformly and
//   emitted as the first two fields, then the type-specific function decodes the rest.
// - `Decoder::SampleEntry`: the box is an entry of an `stsd` table (avc1, mp4a, ...).
// - `Decoder::Plain`: a box with typed fields but no FullBox header (ftyp, hvcC, ...).
// - `Decoder::Opaque`: everything else, reported as a payload byte count.
//
// Adding a box type means adding one module and one match arm.
//
// The submodules are:
//
// - `ftyp`: File Type and Segment Type boxes (brands).
// - `mvhd`: Movie Header Box.
// - `tkhd`: Track Header Box.
// - `mdhd`: Media Header Box, including the packed ISO-639-2 language.
// - `hdlr`: Handler Reference Box.
// - `vmhd`: Video and Sound Media Header boxes.
// - `elst`: Edit List Box.
// - `stbl`: Sample table boxes (stts, stsc, stsz, stco, co64, stss).
// - `stsd`: Sample Description Box and its visual/audio sample entries.
// - `avcc`: AVC decoder configuration record.
// - `hvcc`: HEVC decoder configuration record.
// - `mvex`: Movie Extends Header and Track Extends boxes (mehd, trex).
// - `mfhd`: Movie Fragment Header Box.
// - `tfhd`: Track Fragment Header Box.
// - `tfdt`: Track Fragment Decode Time Box.
// - `trun`: Track Fragment Run Box.
// - `sidx`: Segment Index Box.
// - `protection`: Common Encryption boxes (pssh, schm, tenc, frma).
// - `meta`: Meta Box, in both its ISO (FullBox) and QuickTime forms.

pub mod avcc;
pub mod elst;
pub mod ftyp;
pub mod hdlr;
pub mod hvcc;
pub mod mdhd;
pub mod meta;
pub mod mfhd;
pub mod mvex;
pub mod mvhd;
pub mod protection;
pub mod sidx;
pub mod stbl;
pub mod stsd;
pub mod tfdt;
pub mod tfhd;
pub mod tkhd;
pub mod trun;
pub mod vmhd;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::trace;

use crate::field::{BoxField, Details, FieldReader, FieldValue};
use crate::format_fourcc;

pub type FullBoxFn = fn(&FullBoxHeader, &mut FieldReader, &mut Details) -> Option<()>;
pub type SampleEntryFn = fn(&[u8; 4], &mut FieldReader, &mut Details) -> Option<()>;
pub type PlainFn = fn(&mut FieldReader, &mut Details) -> Option<()>;

/// Decoding strategy for one box type.
#[derive(Clone, Copy)]
pub enum Decoder {
    FullBox(FullBoxFn),
    SampleEntry(SampleEntryFn),
    Plain(PlainFn),
    Opaque,
}

/// The version and flags that open every FullBox payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullBoxHeader {
    pub version: u8,
    pub flags: u32,
}

impl FullBoxHeader {
    pub fn read(reader: &mut FieldReader) -> Option<Self> {
        let version = reader.u8()?;
        let flags = reader.u24()?;
        Some(FullBoxHeader { version, flags })
    }

    /// Whether 64-bit time fields are in use.
    pub fn is_wide(&self) -> bool {
        self.version == 1
    }

    pub fn has(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

/// Looks up the decoder for `box_type`. Entries of a sample description table are decoded
/// as sample entries regardless of their code.
pub fn decoder_for(box_type: &[u8; 4], parent: Option<&[u8; 4]>) -> Decoder {
    if parent == Some(b"stsd") {
        return Decoder::SampleEntry(stsd::decode_sample_entry);
    }

    match box_type {
        b"ftyp" | b"styp" => Decoder::Plain(ftyp::decode),
        b"mvhd" => Decoder::FullBox(mvhd::decode),
        b"tkhd" => Decoder::FullBox(tkhd::decode),
        b"mdhd" => Decoder::FullBox(mdhd::decode),
        b"hdlr" => Decoder::FullBox(hdlr::decode),
        b"vmhd" => Decoder::FullBox(vmhd::decode_vmhd),
        b"smhd" => Decoder::FullBox(vmhd::decode_smhd),
        b"elst" => Decoder::FullBox(elst::decode),
        b"stsd" => Decoder::FullBox(stsd::decode),
        b"stts" => Decoder::FullBox(stbl::decode_stts),
        b"stsc" | b"stss" => Decoder::FullBox(stbl::decode_entry_count),
        b"stsz" => Decoder::FullBox(stbl::decode_stsz),
        b"stco" => Decoder::FullBox(stbl::decode_stco),
        b"co64" => Decoder::FullBox(stbl::decode_co64),
        b"avcC" => Decoder::Plain(avcc::decode),
        b"hvcC" => Decoder::Plain(hvcc::decode),
        b"mehd" => Decoder::FullBox(mvex::decode_mehd),
        b"trex" => Decoder::FullBox(mvex::decode_trex),
        b"mfhd" => Decoder::FullBox(mfhd::decode),
        b"tfhd" => Decoder::FullBox(tfhd::decode),
        b"tfdt" => Decoder::FullBox(tfdt::decode),
        b"trun" => Decoder::FullBox(trun::decode),
        b"sidx" => Decoder::FullBox(sidx::decode),
        b"pssh" => Decoder::FullBox(protection::decode_pssh),
        b"schm" => Decoder::FullBox(protection::decode_schm),
        b"tenc" => Decoder::FullBox(protection::decode_tenc),
        b"frma" => Decoder::Plain(protection::decode_frma),
        b"meta" => Decoder::Plain(meta::decode),
        _ => Decoder::Opaque,
    }
}

/// Decodes the payload window of one box into ordered fields.
///
/// Never panics: a decoder that runs out of payload stops where it is and the fields emitted
/// so far are kept.
pub fn decode_fields(box_type: &[u8; 4], parent: Option<&[u8; 4]>, payload: &[u8]) -> Vec<BoxField> {
    let mut details = Details::default();
    let mut reader = FieldReader::new(payload);

    let complete = match decoder_for(box_type, parent) {
        Decoder::FullBox(decode) => FullBoxHeader::read(&mut reader).and_then(|header| {
            details.push("version", header.version);
            details.push("flags", format!("0x{:06x}", header.flags));
            decode(&header, &mut reader, &mut details)
        }),
        Decoder::SampleEntry(decode) => decode(box_type, &mut reader, &mut details),
        Decoder::Plain(decode) => decode(&mut reader, &mut details),
        Decoder::Opaque => {
            details.push("payload_size", payload.len() as u64);
            Some(())
        }
    };

    if complete.is_none() {
        trace!(box_type = %format_fourcc(box_type), decoded = details.len(), "payload ended before all fields were decoded");
    }

    details.into_inner()
}

/// Seconds between 1904-01-01 (the ISO-BMFF epoch) and 1970-01-01.
pub const MAC_EPOCH_DELTA: i64 = 2_082_844_800;

/// Largest integer a double can represent exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: i128 = 9_007_199_254_740_991;

/// Converts a 1904-based timestamp to ISO-8601. Values whose millisecond form does not fit in
/// the safe-integer range are reported raw.
pub fn epoch_value(raw: u64) -> FieldValue {
    let unix_seconds = raw as i128 - MAC_EPOCH_DELTA as i128;
    if (unix_seconds * 1000).abs() > MAX_SAFE_INTEGER {
        return FieldValue::Unsigned(raw);
    }

    match DateTime::<Utc>::from_timestamp(unix_seconds as i64, 0) {
        Some(date) => FieldValue::Text(date.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => FieldValue::Unsigned(raw),
    }
}

/// Converts a duration in timescale units to seconds, when the timescale is usable.
pub fn seconds(duration: u64, timescale: u32) -> Option<f64> {
    (timescale > 0).then(|| duration as f64 / timescale as f64)
}

pub fn fixed_16_16(value: i32) -> f64 {
    value as f64 / 65536.0
}

pub fn fixed_8_8(value: i16) -> f64 {
    value as f64 / 256.0
}

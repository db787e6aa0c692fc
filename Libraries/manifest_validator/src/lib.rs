//! # Streaming Manifest Validation
//!
//! Lints HLS playlists and MPEG-DASH manifests and reports what it finds as errors, warnings
//! and informational notes, most of them tied to a manifest line.
//!
//! - [`validate_hls`] checks one playlist line by line, infers the minimum `#EXT-X-VERSION`
//!   its tags need, and for master playlists fetches each child through a
//!   [`PlaylistFetcher`] and validates it as a media playlist.
//! - [`validate_dash`] checks the Period / AdaptationSet / Representation structure and the
//!   segment addressing of an MPD parsed through [`dash_mpd::MpdTreeParser`].
//! - [`detect_manifest_kind`] guesses which of the two a URL and body are.
//!
//! Validation never fails: malformed input shows up as diagnostics in the
//! [`ValidationResult`].

pub mod dash;
pub mod detect;
pub mod fetch;
pub mod hls;
pub mod result;

pub use dash::validate_dash;
pub use detect::{detect_manifest_kind, ManifestKind};
pub use fetch::{FetchError, HttpPlaylistFetcher, PlaylistFetcher};
pub use hls::{validate_hls, HlsValidationOptions, PlaylistType};
pub use result::{ChildPlaylistReport, Diagnostic, ValidationResult};

//! Data models for trackgate-gw

pub mod track;

pub use track::{ResolvedTrack, TrackRecord, DEFAULT_RELEASE_YEAR};

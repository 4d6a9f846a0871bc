//! Services composed by the track resolver
//!
//! - `catalog`: external catalog seam and its data types
//! - `yandex_client`: Yandex Music implementation of the catalog
//! - `blob_store`: on-disk audio files
//! - `track_resolver`: the cache-aside flow

pub mod blob_store;
pub mod catalog;
pub mod track_resolver;
pub mod yandex_client;

pub use blob_store::{BlobError, BlobStore};
pub use catalog::{CatalogClient, CatalogError, CatalogTrack, DOWNLOAD_FORMAT};
pub use track_resolver::{ResolveError, TrackResolver};
pub use yandex_client::{YandexConfig, YandexMusicClient};

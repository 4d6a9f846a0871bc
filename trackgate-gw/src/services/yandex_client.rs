//! Yandex Music API client
//!
//! Track lookup goes through `GET /tracks/{id}`. Audio takes three hops:
//! 1. `GET /tracks/{id}/download-info` lists the available encodings
//! 2. the chosen entry's `downloadInfoUrl` yields storage host, path and salt
//! 3. the signed storage URL serves the audio itself

use async_trait::async_trait;
use md5::{Digest, Md5};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

use super::catalog::{AudioFormat, CatalogClient, CatalogError, CatalogTrack};

pub const YANDEX_API_BASE_URL: &str = "https://api.music.yandex.net";
const USER_AGENT: &str = concat!("trackgate/", env!("CARGO_PKG_VERSION"));
const SIGN_SALT: &str = "XGRlBW9FXlekgbPrRHuSiA";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Yandex Music client configuration
#[derive(Debug, Clone)]
pub struct YandexConfig {
    /// OAuth token; anonymous access when absent
    pub token: Option<String>,
    /// API root, e.g. `https://api.music.yandex.net`
    pub api_base: String,
    /// Scheme used for the signed storage link
    pub storage_scheme: String,
    pub timeout: Duration,
}

impl Default for YandexConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: YANDEX_API_BASE_URL.to_string(),
            storage_scheme: "https".to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Every API response wraps its payload in `result`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: T,
}

/// One entry of `/tracks/{id}/download-info`
#[derive(Debug, Clone, Deserialize)]
struct DownloadVariant {
    codec: String,
    #[serde(rename = "bitrateInKbps")]
    bitrate_in_kbps: u32,
    #[serde(rename = "downloadInfoUrl")]
    download_info_url: String,
}

/// Storage location returned by a `downloadInfoUrl`
#[derive(Debug, Clone, Deserialize)]
struct DownloadLocation {
    host: String,
    path: String,
    ts: String,
    s: String,
}

/// Yandex Music implementation of [`CatalogClient`]
pub struct YandexMusicClient {
    http_client: reqwest::Client,
    cfg: YandexConfig,
}

impl YandexMusicClient {
    pub fn new(cfg: YandexConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &cfg.token {
            let value = HeaderValue::from_str(&format!("OAuth {}", token))
                .map_err(|e| CatalogError::Config(format!("invalid token: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        Ok(Self { http_client, cfg })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = Url::parse(&self.cfg.api_base)
            .map_err(|e| CatalogError::Config(format!("invalid API base {}: {}", self.cfg.api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| CatalogError::Config(format!("API base cannot be a base: {}", self.cfg.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET returning `Ok(None)` on 404
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, CatalogError> {
        tracing::debug!(url = %url, "Querying Yandex Music");

        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map(Some)
            .map_err(|e| CatalogError::ParseError(e.to_string()))
    }

    async fn select_variant(
        &self,
        track_id: &str,
        format: AudioFormat,
    ) -> Result<DownloadVariant, CatalogError> {
        let url = self.endpoint(&["tracks", track_id, "download-info"])?;
        let variants = self
            .get_json::<Envelope<Vec<DownloadVariant>>>(url, &[])
            .await?
            .map(|envelope| envelope.result)
            .unwrap_or_default();

        pick_variant(&variants, format).cloned().ok_or_else(|| {
            CatalogError::NoMatchingVariant {
                track_id: track_id.to_string(),
                codec: format.codec.to_string(),
                bitrate_kbps: format.bitrate_kbps,
            }
        })
    }

    async fn locate(&self, variant: &DownloadVariant) -> Result<DownloadLocation, CatalogError> {
        let url = Url::parse(&variant.download_info_url)
            .map_err(|e| CatalogError::ParseError(format!("downloadInfoUrl: {}", e)))?;
        self.get_json(url, &[("format", "json")])
            .await?
            .ok_or_else(|| CatalogError::ApiError(404, variant.download_info_url.clone()))
    }
}

fn pick_variant(variants: &[DownloadVariant], format: AudioFormat) -> Option<&DownloadVariant> {
    variants
        .iter()
        .find(|v| v.codec == format.codec && v.bitrate_in_kbps == format.bitrate_kbps)
}

/// Hex MD5 signature the storage host expects for `path`
///
/// `s` is the per-download secret from the download-info response.
pub fn sign_path(path: &str, s: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(SIGN_SALT.as_bytes());
    hasher.update(path.strip_prefix('/').unwrap_or(path).as_bytes());
    hasher.update(s.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn direct_link(scheme: &str, location: &DownloadLocation) -> String {
    format!(
        "{}://{}/get-mp3/{}/{}{}",
        scheme,
        location.host,
        sign_path(&location.path, &location.s),
        location.ts,
        location.path
    )
}

#[async_trait]
impl CatalogClient for YandexMusicClient {
    async fn fetch_track(&self, track_id: &str) -> Result<Option<CatalogTrack>, CatalogError> {
        let url = self.endpoint(&["tracks", track_id])?;
        let tracks = match self.get_json::<Envelope<Vec<CatalogTrack>>>(url, &[]).await? {
            Some(envelope) => envelope.result,
            None => return Ok(None),
        };

        let track = tracks.into_iter().next();
        if let Some(track) = &track {
            tracing::info!(
                track_id = %track_id,
                title = %track.title,
                artist = %track.artist_names().first().copied().unwrap_or("Unknown"),
                "Retrieved track from Yandex Music"
            );
        }
        Ok(track)
    }

    async fn download(
        &self,
        track_id: &str,
        format: AudioFormat,
        dest: &Path,
    ) -> Result<(), CatalogError> {
        let variant = self.select_variant(track_id, format).await?;
        let location = self.locate(&variant).await?;
        let link = direct_link(&self.cfg.storage_scheme, &location);

        let mut response = self
            .http_client
            .get(&link)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError(status.as_u16(), error_text));
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0usize;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;

        tracing::debug!(
            track_id = %track_id,
            bytes = written,
            dest = %dest.display(),
            "Audio downloaded"
        );
        Ok(())
    }
}

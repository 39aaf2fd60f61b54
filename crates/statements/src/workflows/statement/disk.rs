use super::extract::{normalize_value, FieldMap};
use crate::config::DiskConfig;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Debug;
use std::time::Duration;
use tokio::runtime::Runtime;

#[derive(Debug, thiserror::Error)]
pub enum DiskError {
    #[error("disk request failed: {0}")]
    Backend(String),
    #[error("disk service returned status {status}")]
    Status { status: u16 },
    #[error("disk response could not be decoded: {0}")]
    Decode(String),
    #[error("disk did not return a download link")]
    MissingHref,
    #[error("disk runtime unavailable: {0}")]
    Runtime(String),
}

/// One row of an archived form export: `[question, answer]` pairs in
/// submission order.
pub type ExportRow = Vec<(String, Value)>;

/// Read side of the cloud-disk archive: resolve a stored export path to a
/// short-lived download link, then fetch the JSON rows behind it.
pub trait DiskGateway: Debug + Send + Sync {
    fn fetch_export(&self, export_path: &str) -> Result<Vec<ExportRow>, DiskError>;
}

/// Normalizes an export row into the same field map the live extraction
/// pipeline produces, so both sources feed one generation path.
pub fn row_fields(row: &ExportRow) -> FieldMap {
    row.iter()
        .map(|(key, value)| (key.clone(), normalize_value(Some(value))))
        .collect()
}

#[derive(Debug, Deserialize)]
struct DownloadLink {
    #[serde(default)]
    href: Option<String>,
}

pub struct YandexDiskClient {
    http: reqwest::Client,
    config: DiskConfig,
    runtime: Runtime,
}

impl YandexDiskClient {
    pub fn new(config: DiskConfig) -> Result<Self, DiskError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|err| DiskError::Backend(err.to_string()))?;
        let runtime = Runtime::new().map_err(|err| DiskError::Runtime(err.to_string()))?;
        Ok(Self {
            http,
            config,
            runtime,
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, DiskError> {
        let response = self
            .runtime
            .block_on(request.send())
            .map_err(|err| DiskError::Backend(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiskError::Status {
                status: status.as_u16(),
            });
        }

        self.runtime
            .block_on(response.json::<T>())
            .map_err(|err| DiskError::Decode(err.to_string()))
    }
}

impl Debug for YandexDiskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YandexDiskClient").finish_non_exhaustive()
    }
}

impl DiskGateway for YandexDiskClient {
    fn fetch_export(&self, export_path: &str) -> Result<Vec<ExportRow>, DiskError> {
        let url = format!(
            "{}/resources/download",
            self.config.api_base_url.trim_end_matches('/')
        );

        let link: DownloadLink = self.get_json(
            self.http
                .get(&url)
                .header(
                    reqwest::header::AUTHORIZATION,
                    self.config.oauth_token.clone(),
                )
                .query(&[("path", export_path)]),
        )?;
        let href = link.href.ok_or(DiskError::MissingHref)?;

        // The resolved link is pre-signed; no auth header on the second hop.
        self.get_json(self.http.get(&href))
    }
}

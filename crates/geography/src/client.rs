//! HTTP client for the IBGE `localidades` service.
//!
//! | Method | Path | Decoded field |
//! |--------|------|---------------|
//! | GET    | `/localidades/estados` | `sigla` |
//! | GET    | `/localidades/estados/{uf}/municipios` | `nome` |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::GeographyError;
use crate::types::{DivisionName, DivisionRecord, RegionCode, RegionRecord};
use crate::GeographySource;

pub const DEFAULT_BASE_URL: &str = "https://servicodados.ibge.gov.br/api/v1";

/// Connection settings for [`GeographyClient`].
#[derive(Debug, Clone)]
pub struct GeographyConfig {
    pub base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl Default for GeographyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeographyClient {
    http: Client,
    base_url: Url,
}

impl GeographyClient {
    pub fn new(config: &GeographyConfig) -> Result<Self, GeographyError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| GeographyError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GeographyError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "url cannot be used as a base".into(),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| GeographyError::Http {
            endpoint: "client_init".into(),
            source,
        })?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /localidades/estados`, returning each `sigla` in response order.
    pub async fn list_regions(&self) -> Result<Vec<RegionCode>, GeographyError> {
        let endpoint = "GET /localidades/estados";
        let url = self.endpoint_url(&["localidades", "estados"])?;
        let records: Vec<RegionRecord> = self.get_json(endpoint, url).await?;
        Ok(records
            .into_iter()
            .map(|r| RegionCode::new(r.sigla))
            .collect())
    }

    /// `GET /localidades/estados/{region}/municipios`, returning each `nome`
    /// in response order.
    pub async fn list_divisions(
        &self,
        region: &RegionCode,
    ) -> Result<Vec<DivisionName>, GeographyError> {
        let endpoint = format!("GET /localidades/estados/{region}/municipios");
        let url = self.endpoint_url(&["localidades", "estados", region.as_str(), "municipios"])?;
        let records: Vec<DivisionRecord> = self.get_json(&endpoint, url).await?;
        Ok(records
            .into_iter()
            .map(|r| DivisionName::new(r.nome))
            .collect())
    }

    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, GeographyError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| GeographyError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: "url cannot be used as a base".into(),
                })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        url: Url,
    ) -> Result<T, GeographyError> {
        debug!(%url, "{endpoint}");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| GeographyError::Http {
                endpoint: endpoint.to_string(),
                source,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(GeographyError::Status {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(|source| GeographyError::Http {
            endpoint: endpoint.to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| GeographyError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[async_trait]
impl GeographySource for GeographyClient {
    async fn list_regions(&self) -> Result<Vec<RegionCode>, GeographyError> {
        GeographyClient::list_regions(self).await
    }

    async fn list_divisions(
        &self,
        region: &RegionCode,
    ) -> Result<Vec<DivisionName>, GeographyError> {
        GeographyClient::list_divisions(self, region).await
    }
}

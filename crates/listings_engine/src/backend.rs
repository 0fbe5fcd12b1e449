use std::time::Duration;

use futures_util::StreamExt;
use listings_logging::{listings_debug, listings_warn};
use url::Url;

use crate::decode::{decode_ack, decode_page};
use crate::{ActionAck, ActionKind, BackendError, FailureKind, FetchedPage, PageQuery};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Server endpoints the console talks to.
#[async_trait::async_trait]
pub trait ListingsBackend: Send + Sync {
    async fn fetch_page(&self, query: &PageQuery) -> Result<FetchedPage, BackendError>;

    async fn run_action(&self, company: &str, kind: ActionKind) -> Result<ActionAck, BackendError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(BackendError::new(
                FailureKind::InvalidUrl,
                format!("{base} cannot be used as a base url"),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    /// `{base}/companies/{company}/jobs[/{suffix}]`, segments percent-encoded.
    fn jobs_url(&self, company: &str, suffix: Option<&str>) -> Result<Url, BackendError> {
        if company.trim().is_empty() {
            return Err(BackendError::new(FailureKind::InvalidUrl, "empty company"));
        }
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                BackendError::new(FailureKind::InvalidUrl, "base url cannot have segments")
            })?;
            segments.pop_if_empty().extend(["companies", company, "jobs"]);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    fn page_url(&self, query: &PageQuery) -> Result<Url, BackendError> {
        let mut url = self.jobs_url(&query.company, None)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("page", &query.page_index.to_string())
                .append_pair("page_size", &query.page_size.to_string());
            for (name, value) in &query.filters {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl ListingsBackend for ReqwestBackend {
    async fn fetch_page(&self, query: &PageQuery) -> Result<FetchedPage, BackendError> {
        let url = self.page_url(query)?;
        listings_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let bytes = self.read_body(response).await?;

        decode_page(&bytes, query.page_index, query.page_size)
            .map_err(|err| BackendError::new(FailureKind::MalformedBody, err.to_string()))
    }

    async fn run_action(&self, company: &str, kind: ActionKind) -> Result<ActionAck, BackendError> {
        let request = match kind {
            ActionKind::Clear => self.client.delete(self.jobs_url(company, None)?),
            ActionKind::Sync => self.client.post(self.jobs_url(company, Some("sync"))?),
            ActionKind::Publish => self.client.post(self.jobs_url(company, Some("publish"))?),
        };

        let response = request.send().await.map_err(map_reqwest_error)?;
        let bytes = self.read_body(response).await?;
        let ack = decode_ack(&bytes);
        if !ack.succeeded {
            listings_warn!(
                "Backend reported {} for {} as not succeeded: {:?}",
                kind,
                company,
                ack.message
            );
        }
        Ok(ack)
    }
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> BackendError {
    BackendError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}

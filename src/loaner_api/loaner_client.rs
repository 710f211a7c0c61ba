use crate::loaner_api::models::device::Device;
use crate::loaner_api::models::request::loan_request::{BorrowRequest, LoanRequest};
use anyhow::{Context, bail};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub const CONNECTIVITY_MESSAGE: &str = "Unable to connect to the server. This may be due to network issues or CORS policy restrictions.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {status} - {status_text}")]
    RequestFailed { status: u16, status_text: String },

    /// No response was obtained at all. `source` keeps the transport cause.
    #[error("{message}")]
    Connectivity {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("decode: {0}")]
    Decode(String),

    #[error("transport: {0}")]
    Transport(reqwest::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_request() {
            warn!("No response from the server: {:?}", e);
            ApiError::Connectivity {
                message: CONNECTIVITY_MESSAGE.to_string(),
                source: e,
            }
        } else {
            ApiError::Transport(e)
        }
    }
}

/// HTTP access to the loaner endpoint. Every call is a single attempt with the
/// transport's default timeouts.
#[derive(Clone)]
pub struct LoanerClient {
    client: reqwest::Client,
    base_url: Url,
}

impl LoanerClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            bail!("api.base_url is empty; set it to the loaner endpoint");
        }
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid api.base_url \"{}\"", base_url))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Self {
            client: reqwest::Client::builder()
                .default_headers(headers)
                .build()
                .context("Unable to build HTTP client")?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn ensure_success(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        Ok(response)
    }

    fn decode<R: DeserializeOwned>(contents: &str) -> Result<R, ApiError> {
        serde_json::from_str(contents).map_err(|e| {
            ApiError::Decode(format!(
                "Unable to deserialize response ({}). Body was: \"{}\"",
                e, contents
            ))
        })
    }

    async fn parse<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
        let contents = Self::ensure_success(response)?.text().await?;
        Self::decode(&contents)
    }

    async fn post(&self, payload: &LoanRequest) -> Result<Response, ApiError> {
        Ok(self
            .client
            .post(self.base_url.clone())
            .json(payload)
            .send()
            .await?)
    }
}

impl LoanerApiTrait for LoanerClient {
    async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        let result: Result<Vec<Device>, ApiError> = async {
            let response = self.client.get(self.base_url.clone()).send().await?;
            Self::parse::<Vec<Device>>(response).await
        }
        .await;

        match &result {
            Ok(devices) => debug!("Fetched {} devices", devices.len()),
            Err(e) => error!("Error fetching devices: {}", e),
        }
        result
    }

    async fn submit_borrow(&self, request: &BorrowRequest) -> Result<Device, ApiError> {
        let payload = LoanRequest::borrow(request);
        let result: Result<Device, ApiError> = async {
            let response = Self::ensure_success(self.post(&payload).await?)?;
            let contents = response.text().await?;
            // A 2xx means the loan is recorded even when the body is unreadable.
            Ok(Self::decode::<Device>(&contents).unwrap_or_else(|e| {
                warn!("Borrow of {} accepted but {}", payload.asset_id, e);
                Device::from(&payload)
            }))
        }
        .await;

        if let Err(e) = &result {
            error!("Error borrowing device {}: {}", payload.asset_id, e);
        }
        result
    }

    async fn submit_return(&self, asset_id: &str) -> Result<(), ApiError> {
        let result: Result<(), ApiError> = async {
            Self::ensure_success(self.post(&LoanRequest::release(asset_id)).await?)?;
            Ok(())
        }
        .await;

        if let Err(e) = &result {
            error!("Error returning device {}: {}", asset_id, e);
        }
        result
    }
}

pub trait LoanerApiTrait {
    fn list_devices(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Device>, ApiError>> + Send;
    fn submit_borrow(
        &self,
        request: &BorrowRequest,
    ) -> impl std::future::Future<Output = Result<Device, ApiError>> + Send;
    fn submit_return(
        &self,
        asset_id: &str,
    ) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;
}

impl<T> LoanerApiTrait for Arc<T>
where
    T: LoanerApiTrait + Send + Sync,
{
    async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        self.as_ref().list_devices().await
    }

    async fn submit_borrow(&self, request: &BorrowRequest) -> Result<Device, ApiError> {
        self.as_ref().submit_borrow(request).await
    }

    async fn submit_return(&self, asset_id: &str) -> Result<(), ApiError> {
        self.as_ref().submit_return(asset_id).await
    }
}

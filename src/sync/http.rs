//! [`Backend`] over HTTP/JSON using `reqwest`.
//!
//! On wasm32 `reqwest` rides on the browser's `fetch`, so the same code
//! serves the browser binding and the native CLI.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::protocol::{
    BatchEditRequest, BatchEditResponse, EditRequest, EditResponse, SheetRequest, SheetResponse,
};
use super::Backend;
use crate::config::BackendConfig;
use crate::error::{Result, XlgridError};

const EDIT_PATH: &str = "/api/cells/update";
const BATCH_EDIT_PATH: &str = "/api/cells/batch-update";
const FETCH_SHEET_PATH: &str = "/api/sheets/fetch";

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    api_base: String,
}

impl HttpBackend {
    /// # Errors
    /// Returns an error if the config is invalid or the client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        config.validate()?;
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .user_agent(concat!("xlgrid/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_millis(config.timeout_ms));
        Ok(Self {
            client: builder.build()?,
            api_base: config.api_base().to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.api_base, path);
        log::debug!("POST {url}");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            log::warn!("POST {url} failed with {status}");
            return Err(XlgridError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl Backend for HttpBackend {
    async fn submit_edit(&self, request: &EditRequest) -> Result<EditResponse> {
        self.post(EDIT_PATH, request).await
    }

    async fn submit_batch(&self, request: &BatchEditRequest) -> Result<BatchEditResponse> {
        self.post(BATCH_EDIT_PATH, request).await
    }

    async fn fetch_sheet(&self, request: &SheetRequest) -> Result<SheetResponse> {
        self.post(FETCH_SHEET_PATH, request).await
    }
}

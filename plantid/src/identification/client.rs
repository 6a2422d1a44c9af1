//! HTTP client for the plant.id `identify` endpoint.

use crate::config::IdentificationConfig;
use crate::errors::{Error, Result};
use crate::identification::models::{IdentificationResult, IdentifyRequest};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::{Client, StatusCode};
use std::path::Path;
use tracing::{debug, instrument};
use url::Url;

const API_KEY_HEADER: &str = "Api-Key";

/// Sends stored images to the identification service.
///
/// One POST per call: no retries, no backoff. The request only times out if
/// `identification.timeout` is configured.
#[derive(Clone)]
pub struct IdentificationClient {
    client: Client,
    url: Url,
    organs: Vec<String>,
}

impl IdentificationClient {
    pub fn new(config: &IdentificationConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url: config.url.clone(),
            organs: config.organs.clone(),
        })
    }

    /// Identify the plant pictured in the file at `image_path`.
    ///
    /// The file is read fully into memory and sent base64-encoded. See [`interpret_response`] for
    /// how the upstream answer maps onto the result.
    #[instrument(skip(self, api_key), fields(path = %image_path.display()))]
    pub async fn identify(&self, image_path: &Path, api_key: &str) -> Result<IdentificationResult> {
        let bytes = tokio::fs::read(image_path).await.map_err(|source| Error::Storage {
            path: image_path.to_path_buf(),
            source,
        })?;

        let payload = IdentifyRequest {
            images: vec![STANDARD.encode(&bytes)],
            organs: self.organs.clone(),
        };

        debug!(image_bytes = bytes.len(), "Sending identification request to {}", self.url);

        let response = self
            .client
            .post(self.url.clone())
            .header(API_KEY_HEADER, api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), body_len = body.len(), "Identification service responded");

        interpret_response(status, body)
    }
}

/// Map an upstream status and raw body onto an identification result.
///
/// - 429: the key has run out of credits
/// - any other non-200: error carrying the status code and raw body
/// - 200 with a body that is not an identification result: error carrying the raw body
pub fn interpret_response(status: StatusCode, body: String) -> Result<IdentificationResult> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::InsufficientCredits);
    }

    if status != StatusCode::OK {
        return Err(Error::UnexpectedStatus {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|source| Error::InvalidResponse { body, source })
}

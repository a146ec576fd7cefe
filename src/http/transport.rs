use super::common::{Endpoint, authorize, construct_endpoint_url};
use super::error_helpers::{check_response, deserialize_with_context};
use super::retry::{RetryPolicy, send_with_retry};
use crate::errors::{Operation, TransportError};
use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Shared, retry-aware HTTP transport owned by one gateway.
///
/// Holds no per-call state; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http_client: ReqwestClient,
    base_url: String,
    access_token: String,
    retry_policy: RetryPolicy,
    timeout: Duration,
    connect_timeout: Duration,
}

impl Transport {
    pub(crate) fn new(
        http_client: ReqwestClient,
        base_url: String,
        access_token: String,
        retry_policy: RetryPolicy,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            http_client,
            base_url,
            access_token,
            retry_policy,
            timeout,
            connect_timeout,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// GETs `endpoint` and decodes the JSON body, retrying transient failures.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        endpoint: &Endpoint<'_>,
    ) -> Result<T, TransportError> {
        let url = construct_endpoint_url(&self.base_url, endpoint);
        debug!(operation = %operation, url = %url, "sending upstream request");

        let authorized = authorize(&url, &self.access_token);
        let authorized = authorized.as_str();

        send_with_retry(&self.retry_policy, operation, || {
            self.get_once(operation, authorized)
        })
        .await
    }

    /// One exchange: no retries.
    async fn get_once<T: DeserializeOwned>(
        &self,
        operation: Operation,
        url: &str,
    ) -> Result<T, TransportError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        debug!(operation = %operation, status = response.status().as_u16(), "upstream responded");

        let response = check_response(response).await?;
        let body = response.text().await.map_err(|e| self.classify(e))?;

        deserialize_with_context(&body, operation.as_str())
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.elapsed_deadline(err.is_connect()))
        } else {
            // The URL carries the access token
            TransportError::Http(err.without_url())
        }
    }

    /// The deadline that fired: connecting, or the whole exchange.
    fn elapsed_deadline(&self, while_connecting: bool) -> Duration {
        if while_connecting {
            self.connect_timeout
        } else {
            self.timeout
        }
    }
}

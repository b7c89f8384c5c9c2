//! Where builder histories come from.

use std::future::Future;

use crate::config::FetchOptions;
use crate::decode::decode_results;
use crate::error::DashboardError;
use crate::ingest::RawHistoryPayload;
use crate::model::Builder;

/// Produces a decoded history payload for a builder.
///
/// Implementations own transport concerns such as timeouts; the
/// [`Dashboard`](crate::dashboard::Dashboard) only awaits the result.
pub trait HistorySource {
    fn fetch_history(
        &self,
        builder: &Builder,
    ) -> impl Future<Output = Result<RawHistoryPayload, DashboardError>> + Send;
}

/// Fetches each builder's results file over HTTP from [`Builder::url`].
pub struct HttpHistorySource {
    client: reqwest::Client,
    jsonp_callback: Option<String>,
}

impl HttpHistorySource {
    pub fn new(options: &FetchOptions) -> Self {
        // Falls back to a default client rather than failing if the TLS
        // backend cannot be configured.
        let client = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout())
            .timeout(options.request_timeout())
            .build()
            .unwrap_or_default();

        HttpHistorySource {
            client,
            jsonp_callback: options.jsonp_callback.clone(),
        }
    }

    /// Use a preconfigured client, e.g. one with custom proxy settings.
    pub fn with_client(client: reqwest::Client, jsonp_callback: Option<String>) -> Self {
        HttpHistorySource {
            client,
            jsonp_callback,
        }
    }

    /// GET the results file for `builder` and decode it.
    ///
    /// # Returns
    /// - `Err(DashboardError::Config)` — the builder has no URL.
    /// - `Err(DashboardError::Connect)` — the request or body read failed.
    /// - `Err(DashboardError::Http)` — a non-2xx response.
    /// - `Err(DashboardError::Decode)` — the body is not a results file.
    pub async fn fetch(&self, builder: &Builder) -> Result<RawHistoryPayload, DashboardError> {
        let url = builder.url.as_deref().ok_or_else(|| DashboardError::Config {
            path: format!("builders.{}", builder.name),
            detail: "builder has no url".into(),
        })?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DashboardError::Connect {
                url: url.to_string(),
                detail: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(DashboardError::Http {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await.map_err(|e| DashboardError::Connect {
            url: url.to_string(),
            detail: e.to_string(),
        })?;

        decode_results(&body, &builder.name, self.jsonp_callback.as_deref())
    }
}

impl HistorySource for HttpHistorySource {
    fn fetch_history(
        &self,
        builder: &Builder,
    ) -> impl Future<Output = Result<RawHistoryPayload, DashboardError>> + Send {
        self.fetch(builder)
    }
}

use crate::config::ApiConfig;
use crate::error::{ChatError, ChatResult};
use crate::providers::MovieApi;
use crate::types::{ApiSelector, Params};
use async_trait::async_trait;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

/// JSON-over-HTTP client with a fixed key merged into every query string
pub struct HttpApi {
    api: ApiSelector,
    base_url: String,
    auth_param: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(
        api: ApiSelector,
        base_url: String,
        auth_param: String,
        api_key: String,
        timeout: Option<Duration>,
    ) -> ChatResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            api,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_param,
            api_key,
            client: builder.build()?,
        })
    }

    pub fn from_config(api: ApiSelector, config: &ApiConfig) -> ChatResult<Self> {
        Self::new(
            api,
            config.base_url.clone(),
            config.auth_param.clone(),
            config.api_key.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl MovieApi for HttpApi {
    async fn get(&self, path: &str, params: &Params) -> ChatResult<Value> {
        let url = self.url(path);
        let start = Instant::now();

        let mut query: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        query.push((self.auth_param.as_str(), self.api_key.as_str()));

        debug!("GET {} ({} params)", url, params.len());

        let result = self.client.get(&url).query(&query).send().await;

        crate::metrics::METRICS
            .upstream_duration_seconds
            .with_label_values(&[self.api.as_str()])
            .observe(start.elapsed().as_secs_f64());

        let res = match result {
            Ok(res) => res,
            Err(e) => {
                crate::metrics::METRICS
                    .upstream_requests_total
                    .with_label_values(&[self.api.as_str(), "error"])
                    .inc();
                return Err(e.into());
            }
        };

        let status = res.status();
        crate::metrics::METRICS
            .upstream_requests_total
            .with_label_values(&[self.api.as_str(), status.as_str()])
            .inc();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                api: self.api.as_str(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = res.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| ChatError::Decode {
            context: self.api.as_str(),
            source,
        })
    }
}

pub mod http;
pub mod omdb;
pub mod tmdb;

use crate::error::ChatResult;
use crate::types::Params;
use async_trait::async_trait;
use serde_json::Value;

pub use http::HttpApi;

/// Upstream movie-metadata API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// GET `path` with `params` and return the decoded JSON body
    async fn get(&self, path: &str, params: &Params) -> ChatResult<Value>;
}

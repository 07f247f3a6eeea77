/// OMDb ratings API: lookup by IMDb id
use crate::config::ApiConfig;
use crate::error::ChatResult;
use crate::providers::HttpApi;
use crate::types::{ApiSelector, Params, params};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com";
pub const AUTH_PARAM: &str = "apikey";

pub const LOOKUP_PATH: &str = "/";

pub fn from_config(config: &ApiConfig) -> ChatResult<HttpApi> {
    HttpApi::from_config(ApiSelector::Ratings, config)
}

pub fn lookup(imdb_id: &str) -> Params {
    params([("i", imdb_id)])
}

/// Director, cast and plot for one title
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RatingsDetails {
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    /// "True" or "False"; OMDb answers 200 even for unknown ids
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RatingsDetails {
    pub fn is_found(&self) -> bool {
        !self
            .response
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("false"))
    }
}

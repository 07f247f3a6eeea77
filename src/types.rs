use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Query parameters for an upstream call. Ordered so identical parameter
/// sets always encode identically.
pub type Params = BTreeMap<String, String>;

/// Who wrote a message in the thread
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Bot,
    User,
}

/// A single message in the chat thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub text: String,
    pub origin: Origin,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Origin::Bot)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Origin::User)
    }

    fn new(text: impl Into<String>, origin: Origin) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            origin,
            created_at: Utc::now(),
        }
    }

    pub fn is_bot(&self) -> bool {
        self.origin == Origin::Bot
    }
}

/// Upstream API a call is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiSelector {
    /// Primary movie catalog (TMDB)
    Catalog,
    /// Ratings, plot and cast (OMDb)
    Ratings,
}

impl ApiSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiSelector::Catalog => "catalog",
            ApiSelector::Ratings => "ratings",
        }
    }
}

/// Build a parameter map from string pairs
pub fn params<const N: usize>(pairs: [(&str, &str); N]) -> Params {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// TMDB catalog API: endpoints and wire types
use crate::config::ApiConfig;
use crate::error::ChatResult;
use crate::providers::HttpApi;
use crate::types::{ApiSelector, Params, params};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const AUTH_PARAM: &str = "api_key";

pub const DISCOVER_PATH: &str = "/discover/movie";
pub const POPULAR_PATH: &str = "/movie/popular";
pub const GENRE_LIST_PATH: &str = "/genre/movie/list";
pub const SEARCH_PATH: &str = "/search/movie";

const SORT_BY_POPULARITY: &str = "popularity.desc";

pub fn from_config(config: &ApiConfig) -> ChatResult<HttpApi> {
    HttpApi::from_config(ApiSelector::Catalog, config)
}

pub fn movie_path(id: u64) -> String {
    format!("/movie/{}", id)
}

pub fn discover_by_language(code: &str) -> Params {
    params([
        ("with_original_language", code),
        ("sort_by", SORT_BY_POPULARITY),
    ])
}

pub fn discover_by_genre(genre_id: u64) -> Params {
    let id = genre_id.to_string();
    params([("with_genres", id.as_str()), ("sort_by", SORT_BY_POPULARITY)])
}

pub fn search(query: &str) -> Params {
    params([("query", query)])
}

/// A movie as returned by list, discover and search endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieList {
    pub results: Vec<Movie>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl GenreList {
    /// First genre whose name contains `word`, ignoring case
    pub fn resolve(&self, word: &str) -> Option<u64> {
        let word = word.to_lowercase();
        self.genres
            .iter()
            .find(|g| g.name.to_lowercase().contains(&word))
            .map(|g| g.id)
    }
}

/// The subset of `/movie/{id}` used for cross-referencing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(default)]
    pub imdb_id: Option<String>,
}

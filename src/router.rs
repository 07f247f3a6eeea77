use crate::error::{ChatError, ChatResult};
use crate::format;
use crate::gateway::Gateway;
use crate::intent::{self, Intent};
use crate::providers::omdb::{self, RatingsDetails};
use crate::providers::tmdb::{self, GenreList, MovieDetails, MovieList};
use crate::types::{ApiSelector, Params};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Turns free text into a reply by running the first intent that answers
pub struct Router {
    gateway: Arc<Gateway>,
}

impl Router {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Reply for `input`. Never fails: errors become chat text.
    pub async fn respond(&self, input: &str) -> String {
        match self.route(input).await {
            Ok((intent, reply)) => {
                crate::metrics::METRICS
                    .intents_total
                    .with_label_values(&[intent.as_str()])
                    .inc();
                crate::metrics::METRICS
                    .chat_requests_total
                    .with_label_values(&["reply"])
                    .inc();
                reply
            }
            Err(e) if e.is_rate_limited() => {
                crate::metrics::METRICS
                    .chat_requests_total
                    .with_label_values(&["rate_limited"])
                    .inc();
                e.to_string()
            }
            Err(e) => {
                error!("Failed to answer {:?}: {}", input, e);
                crate::metrics::METRICS
                    .chat_requests_total
                    .with_label_values(&["error"])
                    .inc();
                format::GENERIC_ERROR.to_string()
            }
        }
    }

    /// First candidate intent that produces a reply, with that reply
    pub async fn route(&self, input: &str) -> ChatResult<(Intent, String)> {
        for intent in intent::candidates(input) {
            if let Some(reply) = self.execute(&intent).await? {
                debug!("Routed to {}", intent.as_str());
                return Ok((intent, reply));
            }
            debug!("Intent {} declined, trying next", intent.as_str());
        }

        Ok((Intent::Fallback, format::FALLBACK.to_string()))
    }

    /// Run one intent. `None` means it declined and later rules should be tried.
    pub async fn execute(&self, intent: &Intent) -> ChatResult<Option<String>> {
        let reply = match intent {
            Intent::Greeting => Some(format::GREETING.to_string()),
            Intent::Help => Some(format::HELP.to_string()),
            Intent::Language { name, code } => {
                let list = self
                    .movies(tmdb::DISCOVER_PATH, tmdb::discover_by_language(code))
                    .await?;
                Some(format::movie_list(
                    &format!("Here are some popular {} movies:", name),
                    &list.results,
                ))
            }
            Intent::Popular => {
                let list = self.movies(tmdb::POPULAR_PATH, Params::new()).await?;
                Some(format::movie_list(
                    "Here are some popular movies right now:",
                    &list.results,
                ))
            }
            Intent::Genre { name } => self.genre(name).await?,
            Intent::Search { query } => self.search(query).await?,
            Intent::Fallback => Some(format::FALLBACK.to_string()),
        };

        Ok(reply)
    }

    async fn movies(&self, endpoint: &str, params: Params) -> ChatResult<MovieList> {
        self.gateway
            .fetch_as(ApiSelector::Catalog, endpoint, params)
            .await
    }

    async fn genre(&self, name: &str) -> ChatResult<Option<String>> {
        let genres: GenreList = self
            .gateway
            .fetch_as(ApiSelector::Catalog, tmdb::GENRE_LIST_PATH, Params::new())
            .await?;

        let Some(genre_id) = genres.resolve(name) else {
            debug!("No catalog genre matches {:?}", name);
            return Ok(None);
        };

        let list = self
            .movies(tmdb::DISCOVER_PATH, tmdb::discover_by_genre(genre_id))
            .await?;

        Ok(Some(format::movie_list(
            &format!("Here are some popular {} movies:", name),
            &list.results,
        )))
    }

    async fn search(&self, query: &str) -> ChatResult<Option<String>> {
        if query.is_empty() {
            return Ok(None);
        }

        let list = self.movies(tmdb::SEARCH_PATH, tmdb::search(query)).await?;
        if list.results.is_empty() {
            return Ok(Some(format::no_matches(query)));
        }

        let mut entries = Vec::new();
        for movie in list.results.iter().take(format::SEARCH_LIMIT) {
            let details = match self.details(movie.id).await {
                Ok(details) => details,
                Err(e) => {
                    warn!("Error fetching movie details for {}: {}", movie.id, e);
                    None
                }
            };
            entries.push(format::search_entry(movie, details.as_ref()));
        }

        Ok(Some(format::search_results(query, &entries)))
    }

    /// Ratings-API details via the catalog's IMDb cross-reference
    async fn details(&self, movie_id: u64) -> ChatResult<Option<RatingsDetails>> {
        let movie: MovieDetails = self
            .gateway
            .fetch_as(ApiSelector::Catalog, &tmdb::movie_path(movie_id), Params::new())
            .await?;

        let Some(imdb_id) = movie.imdb_id.filter(|id| !id.is_empty()) else {
            return Err(ChatError::MissingField("imdb_id"));
        };

        let details: RatingsDetails = self
            .gateway
            .fetch_as(ApiSelector::Ratings, omdb::LOOKUP_PATH, omdb::lookup(&imdb_id))
            .await?;

        if !details.is_found() {
            debug!(
                "Ratings API has no entry for {}: {}",
                imdb_id,
                details.error.as_deref().unwrap_or("unknown error")
            );
            return Ok(None);
        }

        Ok(Some(details))
    }
}

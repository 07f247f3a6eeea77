// End-to-end routing tests against in-memory fake APIs.
// Time is driven by a ManualClock so window and ttl expiry are deterministic.

use async_trait::async_trait;
use reelchat::cache::ResponseCache;
use reelchat::clock::{ManualClock, SharedClock};
use reelchat::format;
use reelchat::gateway::Gateway;
use reelchat::intent::{self, Intent};
use reelchat::providers::MovieApi;
use reelchat::rate_limit::RateLimiter;
use reelchat::router::Router;
use reelchat::{ApiSelector, ChatError, ChatResult, Params};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned responses keyed by path, recording every call
#[derive(Default)]
struct FakeApi {
    responses: Mutex<Vec<(String, Value)>>,
    calls: Mutex<Vec<(String, Params)>>,
    fail: bool,
}

impl FakeApi {
    fn with(responses: &[(&str, Value)]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(
                responses
                    .iter()
                    .map(|(path, body)| (path.to_string(), body.clone()))
                    .collect(),
            ),
            ..Default::default()
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    fn calls(&self) -> Vec<(String, Params)> {
        self.calls.lock().unwrap().clone()
    }

    fn call_count(&self, path: &str) -> usize {
        self.calls().iter().filter(|(p, _)| p == path).count()
    }
}

#[async_trait]
impl MovieApi for FakeApi {
    async fn get(&self, path: &str, params: &Params) -> ChatResult<Value> {
        self.calls.lock().unwrap().push((path.to_string(), params.clone()));

        if self.fail {
            return Err(ChatError::Api {
                api: "fake",
                status: 503,
                body: "unavailable".to_string(),
            });
        }

        self.responses
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, body)| body.clone())
            .ok_or(ChatError::Api {
                api: "fake",
                status: 404,
                body: path.to_string(),
            })
    }
}

struct Harness {
    router: Router,
    clock: ManualClock,
    catalog: Arc<FakeApi>,
    ratings: Arc<FakeApi>,
}

fn harness(catalog: Arc<FakeApi>, ratings: Arc<FakeApi>, max_requests: u32) -> Harness {
    let clock = ManualClock::new(1_700_000_000_000);
    let shared: SharedClock = Arc::new(clock.clone());
    let gateway = Gateway::new(
        catalog.clone(),
        ratings.clone(),
        ResponseCache::new(Duration::from_secs(300), shared.clone()),
        RateLimiter::new(max_requests, Duration::from_secs(10), shared),
    );

    Harness {
        router: Router::new(Arc::new(gateway)),
        clock,
        catalog,
        ratings,
    }
}

fn movie_list(count: usize) -> Value {
    let results: Vec<Value> = (1..=count)
        .map(|i| {
            json!({
                "id": i,
                "title": format!("Movie {}", i),
                "release_date": format!("20{:02}-01-01", i),
                "vote_average": 7.5,
            })
        })
        .collect();
    json!({ "page": 1, "results": results })
}

fn genres() -> Value {
    json!({ "genres": [
        {"id": 28, "name": "Action"},
        {"id": 35, "name": "Comedy"},
        {"id": 18, "name": "Drama"},
        {"id": 878, "name": "Science Fiction"},
    ]})
}

#[tokio::test]
async fn test_greeting_precedes_help() {
    let h = harness(FakeApi::with(&[]), FakeApi::with(&[]), 30);

    assert_eq!(intent::classify("hello, show me help"), Intent::Greeting);
    assert_eq!(h.router.respond("hello, show me help").await, format::GREETING);
    assert!(h.catalog.calls().is_empty());
}

#[tokio::test]
async fn test_help_independent_of_network() {
    let h = harness(FakeApi::failing(), FakeApi::failing(), 30);
    let reply = h.router.respond("help").await;

    for n in 1..=5 {
        assert!(reply.contains(&format!("{}. ", n)));
    }
    for name in [
        "English", "Hindi", "Spanish", "French", "German", "Italian", "Japanese", "Korean",
        "Chinese", "Russian",
    ] {
        assert!(reply.contains(name), "missing {}", name);
    }
    assert!(h.catalog.calls().is_empty());
}

#[tokio::test]
async fn test_language_rule_beats_genre_rule() {
    let h = harness(
        FakeApi::with(&[("/discover/movie", movie_list(2)), ("/genre/movie/list", genres())]),
        FakeApi::with(&[]),
        30,
    );

    let reply = h.router.respond("show italian action movies").await;

    assert!(reply.starts_with("Here are some popular italian movies:"));
    let calls = h.catalog.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.get("with_original_language").map(String::as_str), Some("it"));
    assert_eq!(calls[0].1.get("sort_by").map(String::as_str), Some("popularity.desc"));
    assert_eq!(h.catalog.call_count("/genre/movie/list"), 0);
}

#[tokio::test]
async fn test_popular_top_five() {
    let h = harness(FakeApi::with(&[("/movie/popular", movie_list(8))]), FakeApi::with(&[]), 30);

    let reply = h.router.respond("What's popular?").await;
    let lines: Vec<&str> = reply.lines().collect();

    assert_eq!(lines[0], "Here are some popular movies right now:");
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[1], "• Movie 1 (2001) - Rating: 7.5/10");
}

#[tokio::test]
async fn test_genre_discovery_resolves_id() {
    let h = harness(
        FakeApi::with(&[("/genre/movie/list", genres()), ("/discover/movie", movie_list(3))]),
        FakeApi::with(&[]),
        30,
    );

    let reply = h.router.respond("some comedy please").await;

    assert!(reply.starts_with("Here are some popular comedy movies:"));
    let discover = h
        .catalog
        .calls()
        .into_iter()
        .find(|(p, _)| p == "/discover/movie")
        .unwrap();
    assert_eq!(discover.1.get("with_genres").map(String::as_str), Some("35"));
}

#[tokio::test]
async fn test_unresolved_genre_tries_next_genre() {
    // "sci-fi" never matches "Science Fiction" and the table has no thriller
    let h = harness(
        FakeApi::with(&[("/genre/movie/list", genres()), ("/discover/movie", movie_list(1))]),
        FakeApi::with(&[]),
        30,
    );

    assert_eq!(h.router.respond("sci-fi thriller").await, format::FALLBACK);
    // Genre table is fetched once, the second lookup is a cache hit
    assert_eq!(h.catalog.call_count("/genre/movie/list"), 1);
    assert_eq!(h.catalog.call_count("/discover/movie"), 0);
}

#[tokio::test]
async fn test_unresolved_genre_falls_through_to_search() {
    let h = harness(
        FakeApi::with(&[("/genre/movie/list", genres()), ("/search/movie", json!({"results": []}))]),
        FakeApi::with(&[]),
        30,
    );

    assert_eq!(
        h.router.respond("search sci-fi").await,
        "Sorry, I couldn't find any movies matching \"sci-fi\"."
    );
}

#[tokio::test]
async fn test_empty_search_falls_back() {
    let h = harness(FakeApi::with(&[]), FakeApi::with(&[]), 30);

    assert_eq!(h.router.respond("search ").await, format::FALLBACK);
    assert!(h.catalog.calls().is_empty());
}

#[tokio::test]
async fn test_search_with_enrichment() {
    let h = harness(
        FakeApi::with(&[
            (
                "/search/movie",
                json!({"results": [
                    {"id": 27205, "title": "Inception", "release_date": "2010-07-15", "vote_average": 8.369},
                    {"id": 2, "title": "Inception: The Cobol Job", "release_date": "", "vote_average": 7.2},
                    {"id": 3, "title": "Third", "release_date": "2011-01-01", "vote_average": 6},
                    {"id": 4, "title": "Fourth", "release_date": "2012-01-01", "vote_average": 5}
                ]}),
            ),
            ("/movie/27205", json!({"id": 27205, "imdb_id": "tt1375666"})),
            ("/movie/2", json!({"id": 2, "imdb_id": null})),
            ("/movie/3", json!({"id": 3, "imdb_id": "tt0000003"})),
        ]),
        FakeApi::with(&[(
            "/",
            json!({
                "Director": "Christopher Nolan",
                "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt",
                "Plot": "A thief who steals corporate secrets through dream-sharing.",
                "Response": "True"
            }),
        )]),
        30,
    );

    let reply = h.router.respond("Search Inception").await;

    assert_eq!(
        reply,
        "Here's what I found for \"Inception\":\n\n\
         • Inception (2010)\n  Rating: 8.369/10\n  Director: Christopher Nolan\n  \
         Cast: Leonardo DiCaprio, Joseph Gordon-Levitt\n  \
         Plot: A thief who steals corporate secrets through dream-sharing.\n\n\
         • Inception: The Cobol Job (N/A)\n  Rating: 7.2/10\n\n\
         • Third (2011)\n  Rating: 6/10\n  Director: Christopher Nolan\n  \
         Cast: Leonardo DiCaprio, Joseph Gordon-Levitt\n  \
         Plot: A thief who steals corporate secrets through dream-sharing."
    );

    // Only the top three are enriched
    assert_eq!(h.catalog.call_count("/movie/4"), 0);
    let ratings_calls = h.ratings.calls();
    assert_eq!(ratings_calls.len(), 2);
    assert_eq!(ratings_calls[0].1.get("i").map(String::as_str), Some("tt1375666"));
}

#[tokio::test]
async fn test_search_enrichment_failure_degrades() {
    let h = harness(
        FakeApi::with(&[
            ("/search/movie", json!({"results": [{"id": 1, "title": "Solo", "release_date": "2018-05-10", "vote_average": 6.6}]})),
            ("/movie/1", json!({"id": 1, "imdb_id": "tt3778644"})),
        ]),
        FakeApi::failing(),
        30,
    );

    assert_eq!(
        h.router.respond("search solo").await,
        "Here's what I found for \"solo\":\n\n• Solo (2018)\n  Rating: 6.6/10"
    );
}

#[tokio::test]
async fn test_search_no_results() {
    let h = harness(
        FakeApi::with(&[("/search/movie", json!({"results": []}))]),
        FakeApi::with(&[]),
        30,
    );

    assert_eq!(
        h.router.respond("search qwertyuiop").await,
        "Sorry, I couldn't find any movies matching \"qwertyuiop\"."
    );
}

#[tokio::test]
async fn test_network_failure_generic_reply() {
    let h = harness(FakeApi::failing(), FakeApi::failing(), 30);

    assert_eq!(h.router.respond("popular").await, format::GENERIC_ERROR);
}

#[tokio::test]
async fn test_list_without_results_is_generic_error() {
    let h = harness(
        FakeApi::with(&[("/movie/popular", json!({"page": 1}))]),
        FakeApi::with(&[]),
        30,
    );

    assert_eq!(h.router.respond("popular").await, format::GENERIC_ERROR);
}

#[tokio::test]
async fn test_rate_limit_surfaced_verbatim() {
    let h = harness(
        FakeApi::with(&[("/movie/popular", movie_list(1)), ("/discover/movie", movie_list(1))]),
        FakeApi::with(&[]),
        1,
    );

    h.router.respond("popular").await;
    h.clock.advance(Duration::from_millis(2_500));

    assert_eq!(
        h.router.respond("german films").await,
        "Rate limit exceeded. Please wait 8 seconds."
    );
}

#[tokio::test]
async fn test_cache_hits_do_not_consume_quota() {
    let h = harness(FakeApi::with(&[("/movie/popular", movie_list(5))]), FakeApi::with(&[]), 2);

    let first = h.router.respond("popular").await;
    for _ in 0..10 {
        assert_eq!(h.router.respond("popular").await, first);
    }

    assert_eq!(h.catalog.call_count("/movie/popular"), 1);
    assert_eq!(h.router.gateway().limiter().remaining(), 1);
}

#[tokio::test]
async fn test_cache_expires_after_ttl() {
    let h = harness(FakeApi::with(&[("/movie/popular", movie_list(5))]), FakeApi::with(&[]), 30);
    let gateway = h.router.gateway();

    let a = gateway.fetch(ApiSelector::Catalog, "/movie/popular", Params::new()).await.unwrap();
    let b = gateway.fetch(ApiSelector::Catalog, "/movie/popular", Params::new()).await.unwrap();
    assert_eq!(serde_json::to_vec(&a).unwrap(), serde_json::to_vec(&b).unwrap());
    assert_eq!(h.catalog.call_count("/movie/popular"), 1);

    h.clock.advance(Duration::from_secs(300));
    gateway.fetch(ApiSelector::Catalog, "/movie/popular", Params::new()).await.unwrap();
    assert_eq!(h.catalog.call_count("/movie/popular"), 2);
}

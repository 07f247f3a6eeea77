/// Reply text and movie formatting
use crate::providers::omdb::RatingsDetails;
use crate::providers::tmdb::Movie;

pub const WELCOME: &str = "Hi! I'm your movie recommendation bot. How can I help you today? You can ask about movies in different languages, genres, or search for specific titles!";

pub const GREETING: &str = "Hello! I'm here to help you discover great movies! You can ask about:\n\
1. Movies in specific languages (e.g., 'Show Hindi movies')\n\
2. Movie recommendations by genre\n\
3. Search for specific movies\n\
4. Get detailed movie information\n\
5. Find popular movies";

pub const HELP: &str = "I can help you with:\n\
1. Language-specific movies (e.g., 'Show Korean movies')\n\
2. Genre recommendations (e.g., 'Show action movies')\n\
3. Movie search (e.g., 'Search Inception')\n\
4. Popular movies (e.g., 'Show popular movies')\n\
5. Detailed movie information\n\n\
Supported languages: English, Hindi, Spanish, French, German, Italian, Japanese, Korean, Chinese, Russian";

pub const FALLBACK: &str = "I'm not sure what you're looking for. Try asking for movie recommendations by language (e.g., 'Show Hindi movies'), genre, or search for specific movies. Type 'help' to see all options!";

pub const GENERIC_ERROR: &str = "Sorry, I encountered an error. Please try again later.";

/// Movies shown for list-style answers
pub const LIST_LIMIT: usize = 5;
/// Movies enriched for search answers
pub const SEARCH_LIMIT: usize = 3;

/// Year part of a `YYYY-MM-DD` release date, or `N/A`
pub fn release_year(release_date: Option<&str>) -> &str {
    release_date
        .and_then(|date| date.split('-').next())
        .filter(|year| !year.is_empty())
        .unwrap_or("N/A")
}

/// `• Title (Year) - Rating: X/10`
pub fn movie_line(movie: &Movie) -> String {
    format!(
        "• {} ({}) - Rating: {}/10",
        movie.title,
        release_year(movie.release_date.as_deref()),
        movie.vote_average
    )
}

/// Heading followed by one bullet line per movie (at most [`LIST_LIMIT`])
pub fn movie_list(heading: &str, movies: &[Movie]) -> String {
    let lines: Vec<String> = movies.iter().take(LIST_LIMIT).map(movie_line).collect();
    format!("{}\n{}", heading, lines.join("\n"))
}

/// One search hit, with director, cast and plot when enrichment succeeded
pub fn search_entry(movie: &Movie, details: Option<&RatingsDetails>) -> String {
    let mut entry = format!(
        "• {} ({})\n  Rating: {}/10\n",
        movie.title,
        release_year(movie.release_date.as_deref()),
        movie.vote_average
    );

    if let Some(details) = details {
        entry.push_str(&format!(
            "  Director: {}\n  Cast: {}\n  Plot: {}\n",
            field(&details.director),
            field(&details.actors),
            field(&details.plot)
        ));
    }

    entry.push('\n');
    entry
}

pub fn search_results(query: &str, entries: &[String]) -> String {
    let mut reply = format!("Here's what I found for \"{}\":\n\n", query);
    for entry in entries {
        reply.push_str(entry);
    }
    reply.trim().to_string()
}

pub fn no_matches(query: &str) -> String {
    format!("Sorry, I couldn't find any movies matching \"{}\".", query)
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

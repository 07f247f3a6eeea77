//! Rule-based intent classification.
//!
//! Rules are evaluated in a fixed order against the lowercased input and the
//! first matching rule wins. Genre and search rules may decline at execution
//! time (unknown genre, empty search query), in which case the router moves
//! on to the next candidate; [`candidates`] yields them in order.

/// Supported languages and their ISO 639-1 codes, in matching order
pub const LANGUAGES: [(&str, &str); 10] = [
    ("hindi", "hi"),
    ("english", "en"),
    ("spanish", "es"),
    ("french", "fr"),
    ("german", "de"),
    ("italian", "it"),
    ("japanese", "ja"),
    ("korean", "ko"),
    ("chinese", "zh"),
    ("russian", "ru"),
];

/// Genre keywords, in matching order
pub const GENRES: [&str; 7] = [
    "action", "comedy", "drama", "horror", "sci-fi", "romance", "thriller",
];

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Help,
    Language { name: &'static str, code: &'static str },
    Popular,
    Genre { name: &'static str },
    Search { query: String },
    Fallback,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Help => "help",
            Intent::Language { .. } => "language",
            Intent::Popular => "popular",
            Intent::Genre { .. } => "genre",
            Intent::Search { .. } => "search",
            Intent::Fallback => "fallback",
        }
    }
}

/// The first matching intent for `input`
pub fn classify(input: &str) -> Intent {
    candidates(input)
        .into_iter()
        .next()
        .unwrap_or(Intent::Fallback)
}

/// Every matching intent in rule order, always ending with `Fallback`.
///
/// Greeting, help, language and popular never decline, so nothing after the
/// first of them is listed.
pub fn candidates(input: &str) -> Vec<Intent> {
    let lower = input.to_lowercase();
    let mut out = Vec::new();

    if lower.contains("hi") || lower.contains("hello") {
        out.push(Intent::Greeting);
        return out;
    }

    if lower.contains("help") {
        out.push(Intent::Help);
        return out;
    }

    if let Some(&(name, code)) = LANGUAGES.iter().find(|(name, _)| lower.contains(name)) {
        out.push(Intent::Language { name, code });
        return out;
    }

    if lower.contains("popular") {
        out.push(Intent::Popular);
        return out;
    }

    out.extend(
        GENRES
            .iter()
            .filter(|genre| lower.contains(*genre))
            .map(|&name| Intent::Genre { name }),
    );

    if lower.contains("search") {
        out.push(Intent::Search {
            query: strip_search_keyword(input),
        });
    }

    out.push(Intent::Fallback);
    out
}

/// Remove the first "search" (any case) from `input` and trim
pub fn strip_search_keyword(input: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `input`
    let lower = input.to_ascii_lowercase();
    match lower.find("search") {
        Some(start) => {
            let mut out = String::with_capacity(input.len());
            out.push_str(&input[..start]);
            out.push_str(&input[start + "search".len()..]);
            out.trim().to_string()
        }
        None => input.trim().to_string(),
    }
}

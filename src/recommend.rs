//! Catalog recommendations.
//!
//! Two modes: a filter over genre and price sorted by rating, and a keyword
//! ranking that scores each book against a free-text preference.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::info;

use crate::catalog::Catalog;
use crate::models::{
    is_present, ApiResponse, Book, KeywordRecommendRequest, PriceRange, RecommendRequest,
    Recommendations,
};

pub const DEFAULT_LIMIT: usize = 5;
pub const KEYWORD_LIMIT: usize = 5;

const GENRE_WEIGHT: f64 = 3.0;
const TITLE_WEIGHT: f64 = 2.0;
const AUTHOR_WEIGHT: f64 = 2.0;

pub const MSG_USER_ID_REQUIRED: &str = "User ID is required";
pub const MSG_USER_ID_AND_PREFERENCE_REQUIRED: &str = "User ID and preference are required";
pub const MSG_RECOMMEND_OK: &str = "Recommendations generated successfully";
pub const MSG_KEYWORD_OK: &str = "AI recommendations generated based on your preference";

pub type RecommendResponse = ApiResponse<Recommendations>;

/// Books matching `genre` (case-insensitive) and `price_range`, best rated
/// first, at most `limit` of them. Equal ratings keep catalog order.
pub fn filter_books(
    catalog: &Catalog,
    genre: Option<&str>,
    price_range: Option<&PriceRange>,
    limit: usize,
) -> Vec<Book> {
    let genre = genre.filter(|g| !g.is_empty()).map(str::to_lowercase);

    let mut books: Vec<Book> = catalog
        .books()
        .iter()
        .filter(|b| genre.as_ref().map_or(true, |g| b.genre.to_lowercase() == *g))
        .filter(|b| price_range.map_or(true, |r| r.contains(b.price)))
        .cloned()
        .collect();

    books.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    books.truncate(limit);
    books
}

/// Lowercased whitespace-separated keywords.
pub fn tokenize(preference: &str) -> Vec<String> {
    preference
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// Weighted keyword hits on genre, title and author. Books with at least one
/// hit also get their rating added on top.
pub fn score(book: &Book, keywords: &[String]) -> f64 {
    let genre = book.genre.to_lowercase();
    let title = book.title.to_lowercase();
    let author = book.author.to_lowercase();

    let hits: f64 = keywords
        .iter()
        .map(|k| {
            let mut s = 0.0;
            if genre.contains(k.as_str()) {
                s += GENRE_WEIGHT;
            }
            if title.contains(k.as_str()) {
                s += TITLE_WEIGHT;
            }
            if author.contains(k.as_str()) {
                s += AUTHOR_WEIGHT;
            }
            s
        })
        .sum();

    if hits > 0.0 {
        hits + book.rating
    } else {
        0.0
    }
}

pub fn rank_books(catalog: &Catalog, preference: &str, limit: usize) -> Vec<Book> {
    let keywords = tokenize(preference);

    let mut scored: Vec<(f64, &Book)> = catalog
        .books()
        .iter()
        .map(|b| (score(b, &keywords), b))
        .filter(|(s, _)| *s > 0.0)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, b)| b.clone()).collect()
}

pub fn filter_recommend(catalog: &Catalog, request: RecommendRequest) -> RecommendResponse {
    if !is_present(&request.user_id) {
        return ApiResponse::fail(MSG_USER_ID_REQUIRED);
    }

    let books = filter_books(
        catalog,
        request.genre.as_deref(),
        request.price_range.as_ref(),
        request.limit.unwrap_or(DEFAULT_LIMIT),
    );

    info!(
        "Recommendations generated for user {}: {} books",
        display_id(&request.user_id),
        books.len()
    );

    ApiResponse::ok(MSG_RECOMMEND_OK).with_data(Recommendations {
        user_id: request.user_id,
        user_preference: None,
        count: books.len(),
        recommended_books: books,
        timestamp: now_iso(),
    })
}

pub fn keyword_recommend(
    catalog: &Catalog,
    request: KeywordRecommendRequest,
) -> RecommendResponse {
    let preference = match request.preference {
        Some(p) if !p.is_empty() && is_present(&request.user_id) => p,
        _ => return ApiResponse::fail(MSG_USER_ID_AND_PREFERENCE_REQUIRED),
    };

    let books = rank_books(catalog, &preference, KEYWORD_LIMIT);

    info!(
        "Keyword recommendations for user {}: {preference:?} -> {} books",
        display_id(&request.user_id),
        books.len()
    );

    ApiResponse::ok(MSG_KEYWORD_OK).with_data(Recommendations {
        user_id: request.user_id,
        count: books.len(),
        user_preference: Some(preference),
        recommended_books: books,
        timestamp: now_iso(),
    })
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn display_id(user_id: &Value) -> String {
    match user_id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn titles(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.title.as_str()).collect()
    }

    #[test]
    fn genre_filter_is_case_insensitive_and_rating_sorted() {
        let catalog = Catalog::builtin();
        let books = filter_books(&catalog, Some("romance"), None, DEFAULT_LIMIT);
        assert_eq!(titles(&books), vec!["Jane Eyre", "Pride and Prejudice"]);
    }

    #[test]
    fn price_range_is_inclusive() {
        let catalog = Catalog::builtin();
        let range = PriceRange {
            min: Some(14.0),
            max: Some(17.0),
        };
        let books = filter_books(&catalog, None, Some(&range), DEFAULT_LIMIT);
        assert_eq!(
            titles(&books),
            vec!["To Kill a Mockingbird", "1984", "Moby Dick"]
        );

        let exact = PriceRange {
            min: Some(12.99),
            max: Some(12.99),
        };
        let books = filter_books(&catalog, None, Some(&exact), DEFAULT_LIMIT);
        assert_eq!(titles(&books), vec!["The Raven"]);
    }

    #[test]
    fn unfiltered_keeps_catalog_order_on_ties() {
        let catalog = Catalog::builtin();
        let books = filter_books(&catalog, None, None, DEFAULT_LIMIT);
        // 1984 and Jane Eyre share 4.7; 1984 comes first in the catalog.
        assert_eq!(
            titles(&books),
            vec![
                "To Kill a Mockingbird",
                "1984",
                "Jane Eyre",
                "Pride and Prejudice",
                "The Raven"
            ]
        );
        assert!(filter_books(&catalog, None, None, 0).is_empty());
        assert!(filter_books(&catalog, Some("Horror"), None, 5).is_empty());
    }

    #[test]
    fn scoring_weights() {
        let catalog = Catalog::builtin();
        let nineteen_84 = &catalog.books()[1];
        let keywords = tokenize("Dystopian   ORWELL");
        assert_eq!(keywords, vec!["dystopian", "orwell"]);
        assert!((score(nineteen_84, &keywords) - (3.0 + 2.0 + 4.7)).abs() < 1e-9);

        let raven = &catalog.books()[0];
        assert_eq!(score(raven, &keywords), 0.0);
    }

    #[test]
    fn keyword_ranking_puts_best_match_first() {
        let catalog = Catalog::builtin();
        let books = rank_books(&catalog, "dystopian orwell", KEYWORD_LIMIT);
        assert_eq!(titles(&books), vec!["1984"]);

        let books = rank_books(&catalog, "jane romance", KEYWORD_LIMIT);
        // Jane Eyre: genre 3 + title 2 + 4.7; Pride and Prejudice: genre 3 + author 2 + 4.6.
        assert_eq!(titles(&books), vec!["Jane Eyre", "Pride and Prejudice"]);
    }

    #[test]
    fn keyword_ranking_truncates_to_five() {
        let catalog = Catalog::builtin();
        // Every book has an "e" somewhere in its genre, title or author.
        let books = rank_books(&catalog, "e", KEYWORD_LIMIT);
        assert_eq!(books.len(), 5);
    }

    #[test]
    fn no_match_is_empty_success() {
        let catalog = Catalog::builtin();
        let response = keyword_recommend(
            &catalog,
            KeywordRecommendRequest {
                user_id: json!(42),
                preference: Some("quantum chromodynamics".into()),
            },
        );
        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data.count, 0);
        assert!(data.recommended_books.is_empty());
        assert_eq!(data.user_preference.as_deref(), Some("quantum chromodynamics"));
    }

    #[test]
    fn missing_inputs_fail() {
        let catalog = Catalog::builtin();

        let response = filter_recommend(&catalog, RecommendRequest::default());
        assert!(!response.success);
        assert_eq!(response.message, MSG_USER_ID_REQUIRED);

        let response = keyword_recommend(
            &catalog,
            KeywordRecommendRequest {
                user_id: json!(7),
                preference: Some(String::new()),
            },
        );
        assert!(!response.success);
        assert_eq!(response.message, MSG_USER_ID_AND_PREFERENCE_REQUIRED);
    }

    #[test]
    fn filter_recommend_echoes_user_id() {
        let catalog = Catalog::builtin();
        let response = filter_recommend(
            &catalog,
            RecommendRequest {
                user_id: json!("u-1"),
                limit: Some(2),
                ..Default::default()
            },
        );
        let data = response.data.unwrap();
        assert_eq!(data.user_id, json!("u-1"));
        assert_eq!(data.count, 2);
        assert!(data.user_preference.is_none());
    }
}

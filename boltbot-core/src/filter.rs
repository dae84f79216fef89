//! Relevance and freshness gates applied to fetched articles.

use crate::Article;
use chrono::{DateTime, Duration, Utc};

/// Returns true if any keyword occurs, case-insensitively, in the article's
/// title or summary. An empty keyword list matches nothing.
pub fn matches<S: AsRef<str>>(article: &Article, keywords: &[S]) -> bool {
    let title = article.title.to_lowercase();
    let summary = article.summary.to_lowercase();

    keywords
        .iter()
        .map(|keyword| keyword.as_ref().trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .any(|keyword| title.contains(&keyword) || summary.contains(&keyword))
}

/// Articles without a publish date are treated as recent.
pub fn is_recent(article: &Article, now: DateTime<Utc>, max_age: Duration) -> bool {
    match article.published_at {
        Some(published_at) => now.signed_duration_since(published_at) <= max_age,
        None => true,
    }
}

/// Sorts articles newest first; undated articles go last.
pub fn newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article(title: &str, summary: &str) -> Article {
        Article {
            title: title.to_string(),
            link: "http://x/1".to_string(),
            summary: summary.to_string(),
            published_at: None,
            source_name: "ESPN".to_string(),
        }
    }

    #[test]
    fn test_keyword_in_title_matches() {
        let keywords = ["Chargers", "Justin Herbert"];
        assert!(matches(&article("Chargers sign new LB", ""), &keywords));
        assert!(!matches(&article("Lakers win", ""), &keywords));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let keywords = ["CHARGERS"];
        assert!(matches(&article("the chargers are back", ""), &keywords));
    }

    #[test]
    fn test_keyword_in_summary_matches() {
        let keywords = ["herbert"];
        assert!(matches(
            &article("QB update", "Justin Herbert threw for 300 yards"),
            &keywords
        ));
    }

    #[test]
    fn test_empty_keywords_match_nothing() {
        let keywords: [&str; 0] = [];
        assert!(!matches(&article("Chargers sign new LB", ""), &keywords));

        let blank = ["", "   "];
        assert!(!matches(&article("Chargers sign new LB", ""), &blank));
    }

    #[test]
    fn test_recency_window() {
        let now = Utc.with_ymd_and_hms(2024, 9, 8, 12, 0, 0).unwrap();
        let mut fresh = article("Chargers", "");
        fresh.published_at = Some(now - Duration::hours(3));
        assert!(is_recent(&fresh, now, Duration::hours(24)));

        let mut stale = article("Chargers", "");
        stale.published_at = Some(now - Duration::hours(30));
        assert!(!is_recent(&stale, now, Duration::hours(24)));

        assert!(is_recent(&article("Chargers", ""), now, Duration::hours(24)));
    }

    #[test]
    fn test_newest_first_puts_undated_last() {
        let now = Utc.with_ymd_and_hms(2024, 9, 8, 12, 0, 0).unwrap();
        let mut old = article("old", "");
        old.published_at = Some(now - Duration::hours(10));
        let mut new = article("new", "");
        new.published_at = Some(now - Duration::hours(1));
        let undated = article("undated", "");

        let mut articles = vec![undated, old, new];
        newest_first(&mut articles);

        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "old", "undated"]);
    }
}

//! Post composition under the platform's character limit.

use crate::Article;
use regex::Regex;
use std::sync::OnceLock;

/// Maximum characters in a single post.
pub const POST_CHAR_LIMIT: usize = 280;

/// Room kept free next to the link for the separator and ellipsis.
const LINK_ALLOWANCE: usize = 10;

const ELLIPSIS: &str = "...";

fn html_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]+>").expect("static pattern is valid"))
}

pub fn strip_html(text: &str) -> String {
    html_tag_pattern().replace_all(text, "").trim().to_string()
}

/// Composes `"<title>\n\n<link>"`, shortening the title so the whole post fits
/// in [`POST_CHAR_LIMIT`]. The link is never shortened; when no part of the
/// title fits, the post is the link alone.
pub fn format_post(article: &Article) -> String {
    let link = article.link.trim();
    let title = strip_html(&article.title);

    let max_title_chars = POST_CHAR_LIMIT.saturating_sub(link.chars().count() + LINK_ALLOWANCE);
    let title = truncate_chars(&title, max_title_chars);

    if title.is_empty() {
        link.to_string()
    } else {
        format!("{}\n\n{}", title, link)
    }
}

/// Cuts `text` to at most `limit` characters, ending in `"..."` when shortened.
/// Returns an empty string if not even one character fits before the ellipsis.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    if limit <= ELLIPSIS.len() {
        return String::new();
    }

    let kept: String = text.chars().take(limit - ELLIPSIS.len()).collect();
    let kept = kept.trim_end();
    if kept.is_empty() {
        return String::new();
    }
    format!("{}{}", kept, ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, link: &str) -> Article {
        Article {
            title: title.to_string(),
            link: link.to_string(),
            summary: String::new(),
            published_at: None,
            source_name: "ESPN".to_string(),
        }
    }

    #[test]
    fn test_short_title_is_kept_whole() {
        let post = format_post(&article("Chargers sign new LB", "http://x/1"));
        assert_eq!(post, "Chargers sign new LB\n\nhttp://x/1");
    }

    #[test]
    fn test_html_is_removed_from_title() {
        let post = format_post(&article("<b>Chargers</b> win <i>big</i>", "http://x/1"));
        assert_eq!(post, "Chargers win big\n\nhttp://x/1");
    }

    #[test]
    fn test_long_title_is_truncated_and_link_preserved() {
        let link = "https://www.espn.com/nfl/story/_/id/12345678/chargers-news";
        let title = "Chargers ".repeat(60);
        let post = format_post(&article(&title, link));

        assert!(post.chars().count() <= POST_CHAR_LIMIT);
        assert!(post.ends_with(link));
        assert!(post.contains("...\n\n"));
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let a = article(&"Herbert throws long ".repeat(20), "http://x/2");
        assert_eq!(format_post(&a), format_post(&a));
    }

    #[test]
    fn test_length_invariant_across_link_sizes() {
        let title = "Justin Herbert ".repeat(30);
        for link_len in [1usize, 23, 100, 250, 270, 275, 280] {
            let link = format!("h{}", "x".repeat(link_len - 1));
            let post = format_post(&article(&title, &link));
            assert!(post.chars().count() <= POST_CHAR_LIMIT, "link_len {}", link_len);
            assert!(post.ends_with(&link));
        }
    }

    #[test]
    fn test_link_alone_when_nothing_fits() {
        let link = format!("https://{}", "x".repeat(268));
        let post = format_post(&article("Chargers sign new LB", &link));
        assert_eq!(post, link);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "é".repeat(20);
        let cut = truncate_chars(&text, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with("..."));
    }
}

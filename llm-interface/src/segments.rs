use boltbot_core::format::{truncate_chars, POST_CHAR_LIMIT};
use regex::Regex;
use std::sync::OnceLock;

fn delimiter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*-{3,}\s*$").expect("static pattern is valid"))
}

// "Post 3:", "Tweet 4 -"
fn labelled_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?i:post|tweet)\s*\d{1,2}\s*[:.)-]\s*").expect("static pattern is valid")
    })
}

// "2. " or "4) ", but not "1.5"
fn list_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{1,2}[.)]\s+").expect("static pattern is valid"))
}

// Leading "1/10 "
fn leading_fraction_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{1,2}\s*/\s*(\d{1,2})\s+").expect("static pattern is valid")
    })
}

// Trailing "(3/10)"
fn trailing_marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\s*\(\d{1,2}\s*/\s*\d{1,2}\)$").expect("static pattern is valid")
    })
}

// Trailing bare " 3/10"
fn trailing_fraction_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\s+\d{1,2}\s*/\s*(\d{1,2})$").expect("static pattern is valid")
    })
}

/// Splits provider output into post bodies.
///
/// Posts are separated by lines made only of dashes. Numbering the model adds
/// despite being asked not to is removed, blank segments are dropped and each
/// body is cut to the post limit. A bare `N/M` only counts as numbering when
/// `M` is the number of posts, so stats like `33/53` survive.
pub fn split_segments(text: &str) -> Vec<String> {
    let mut raw = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if delimiter_pattern().is_match(line) {
            push_raw(&mut raw, &current);
            current.clear();
        } else {
            current.push(line);
        }
    }
    push_raw(&mut raw, &current);

    let total = raw.len();
    raw.iter()
        .map(|body| strip_numbering(body, total))
        .filter(|body| !body.is_empty())
        .map(|body| truncate_chars(&body, POST_CHAR_LIMIT))
        .collect()
}

fn push_raw(raw: &mut Vec<String>, lines: &[&str]) {
    let joined = lines.join("\n");
    let body = joined.trim();
    if !body.is_empty() {
        raw.push(body.to_string());
    }
}

fn counts_posts(captures: &regex::Captures<'_>, total: usize) -> bool {
    captures
        .get(1)
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .is_some_and(|denominator| denominator == total)
}

fn strip_numbering(body: &str, total: usize) -> String {
    let start = if let Some(found) = labelled_number_pattern().find(body) {
        found.end()
    } else if let Some(found) = list_number_pattern().find(body) {
        found.end()
    } else {
        leading_fraction_pattern()
            .captures(body)
            .filter(|captures| counts_posts(captures, total))
            .and_then(|captures| captures.get(0))
            .map_or(0, |m| m.end())
    };
    let body = &body[start..];

    let end = if let Some(found) = trailing_marker_pattern().find(body) {
        found.start()
    } else {
        trailing_fraction_pattern()
            .captures(body)
            .filter(|captures| counts_posts(captures, total))
            .and_then(|captures| captures.get(0))
            .map_or(body.len(), |m| m.start())
    };

    body[..end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_delimiter_lines() {
        let text = "First post.\n---\nSecond post\nwith two lines.\n---\nThird post.";
        assert_eq!(
            split_segments(text),
            vec!["First post.", "Second post\nwith two lines.", "Third post."]
        );
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let text = "---\nOne\n---\n\n   \n---\nTwo\n---\n";
        assert_eq!(split_segments(text), vec!["One", "Two"]);
    }

    #[test]
    fn test_numbering_is_stripped() {
        let text = "1/4 It was January 2, 1982.\n---\n2. The heat in Miami was brutal.\n---\nPost 3: Kellen Winslow blocked the kick. (3/10)\n---\n4) Overtime. 4/4";
        assert_eq!(
            split_segments(text),
            vec![
                "It was January 2, 1982.",
                "The heat in Miami was brutal.",
                "Kellen Winslow blocked the kick.",
                "Overtime."
            ]
        );
    }

    #[test]
    fn test_years_are_not_numbering() {
        assert_eq!(
            split_segments("1982 was the year.\n---\n41-38 final."),
            vec!["1982 was the year.", "41-38 final."]
        );
    }

    #[test]
    fn test_stats_and_decimals_are_not_numbering() {
        assert_eq!(
            split_segments("Dan Fouts finished 33/53\n---\n1.5 million fans watched the game."),
            vec!["Dan Fouts finished 33/53", "1.5 million fans watched the game."]
        );
    }

    #[test]
    fn test_fraction_matching_post_count_is_numbering() {
        assert_eq!(
            split_segments("Fouts threw for 433 yards. 1/2\n---\n2/2 Winslow caught 13 passes."),
            vec!["Fouts threw for 433 yards.", "Winslow caught 13 passes."]
        );
        assert_eq!(
            split_segments("3/4 of the crowd stayed\n---\nuntil the end."),
            vec!["3/4 of the crowd stayed", "until the end."]
        );
    }

    #[test]
    fn test_long_segments_are_truncated() {
        let text = format!("{}\n---\nshort", "a".repeat(400));
        let segments = split_segments(&text);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].chars().count(), POST_CHAR_LIMIT);
        assert!(segments[0].ends_with("..."));
    }

    #[test]
    fn test_no_delimiter_is_one_segment() {
        assert_eq!(split_segments("just one block of text"), vec!["just one block of text"]);
    }
}

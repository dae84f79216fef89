use boltbot_core::{Article, CoreError, FetchError};
use feed_rs::model::Entry;
use feed_rs::parser;

/// Parse an RSS or Atom document into articles attributed to `source_name`.
///
/// Entries without any usable link are dropped since the link is what the bot
/// deduplicates on.
pub fn parse_feed(xml: &[u8], source_name: &str) -> Result<Vec<Article>, CoreError> {
    let feed = parser::parse(xml).map_err(|e| FetchError::Parse {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    })?;

    let articles = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let link = select_entry_link(&entry);
            if link.is_empty() {
                return None;
            }

            Some(Article {
                title: entry
                    .title
                    .map(|t| t.content.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "No title".to_string()),
                link,
                summary: entry.summary.map(|s| s.content).unwrap_or_default(),
                published_at: entry.published.or(entry.updated),
                source_name: source_name.to_string(),
            })
        })
        .collect();

    Ok(articles)
}

fn select_entry_link(entry: &Entry) -> String {
    for link in &entry.links {
        let href = link.href.trim();
        if href.is_empty() {
            continue;
        }
        let rel = link.rel.as_deref().unwrap_or("");
        if rel.is_empty() || rel.eq_ignore_ascii_case("alternate") {
            return href.to_string();
        }
    }
    if let Some(link) = entry.links.iter().find(|l| !l.href.trim().is_empty()) {
        return link.href.trim().to_string();
    }
    let id = entry.id.trim();
    if id.starts_with("http://") || id.starts_with("https://") {
        return id.to_string();
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>ESPN NFL</title>
    <link>https://www.espn.com</link>
    <description>NFL news</description>
    <item>
      <title>Chargers sign new LB</title>
      <link>https://www.espn.com/nfl/story/1</link>
      <description>The Chargers added depth at linebacker.</description>
      <pubDate>Sun, 08 Sep 2024 12:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Lakers win</title>
      <link>https://www.espn.com/nba/story/2</link>
    </item>
    <item>
      <title>No link here</title>
      <description>Dropped</description>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Bolts</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <updated>2024-09-08T18:30:02Z</updated>
  <entry>
    <title>Herbert ankle update</title>
    <link rel="alternate" href="https://example.com/herbert"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <updated>2024-09-08T18:30:02Z</updated>
    <summary>Justin Herbert is expected to play.</summary>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss_items() {
        let articles = parse_feed(RSS.as_bytes(), "ESPN").unwrap();
        assert_eq!(articles.len(), 2);

        let first = &articles[0];
        assert_eq!(first.title, "Chargers sign new LB");
        assert_eq!(first.link, "https://www.espn.com/nfl/story/1");
        assert!(first.summary.contains("linebacker"));
        assert_eq!(first.source_name, "ESPN");
        assert_eq!(
            first.published_at,
            Some(Utc.with_ymd_and_hms(2024, 9, 8, 12, 0, 0).unwrap())
        );

        assert!(articles[1].summary.is_empty());
        assert!(articles[1].published_at.is_none());
    }

    #[test]
    fn test_parse_atom_entries_use_updated_date() {
        let articles = parse_feed(ATOM.as_bytes(), "Bolts").unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].link, "https://example.com/herbert");
        assert_eq!(
            articles[0].published_at,
            Some(Utc.with_ymd_and_hms(2024, 9, 8, 18, 30, 2).unwrap())
        );
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let result = parse_feed(b"this is not xml", "Broken");
        assert!(matches!(
            result,
            Err(CoreError::Fetch(FetchError::Parse { .. }))
        ));
    }
}

//! Support for creating an Atom feed from the published posts.

use crate::post::BlogPostEntry;
use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person};
use chrono::{DateTime, FixedOffset, NaiveDate};
use std::fmt;
use std::io::Write;
use url::{ParseError, Url};

/// Bundled configuration for creating a feed.
pub struct FeedConfig<'a> {
    pub title: &'a str,
    pub author: &'a str,

    /// The deployed site's base URL; the feed id and post links derive from
    /// it.
    pub site_url: &'a Url,
}

/// Creates a feed from the published posts (most recent first) and writes
/// it to `w`.
pub fn write_feed<W: Write>(config: &FeedConfig, published: &[&BlogPostEntry], w: W) -> Result<()> {
    feed(config, published)?.write_to(w)?;
    Ok(())
}

fn feed(config: &FeedConfig, published: &[&BlogPostEntry]) -> Result<Feed> {
    let entries = published
        .iter()
        .map(|post| feed_entry(config, post))
        .collect::<Result<Vec<Entry>>>()?;

    // Derive `updated` from the newest post rather than the clock so that
    // unchanged inputs produce a byte-identical feed.
    let updated = published
        .iter()
        .filter_map(|p| p.date)
        .max()
        .map(midnight_utc)
        .unwrap_or_default();

    Ok(Feed {
        title: config.title.into(),
        id: config.site_url.to_string(),
        updated,
        authors: vec![person(config.author)],
        links: vec![alternate(config.site_url.to_string())],
        entries,
        ..Default::default()
    })
}

fn feed_entry(config: &FeedConfig, post: &BlogPostEntry) -> Result<Entry> {
    let url = match post.href {
        Some(href) => Url::parse(href)?,
        None => config.site_url.join(post.path().trim_start_matches('/'))?,
    };
    let date = post.date.map(midnight_utc).unwrap_or_default();
    Ok(Entry {
        id: url.to_string(),
        title: post.title.into(),
        updated: date,
        published: Some(date),
        authors: vec![person(config.author)],
        links: vec![alternate(url.to_string())],
        ..Default::default()
    })
}

fn midnight_utc(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(chrono::NaiveTime::MIN).and_utc().fixed_offset()
}

fn person(name: &str) -> Person {
    Person {
        name: name.to_owned(),
        ..Default::default()
    }
}

fn alternate(href: String) -> Link {
    Link {
        href,
        rel: "alternate".to_owned(),
        ..Default::default()
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include Atom and URL
/// issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when a post's link can't be formed.
    UrlParse(ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Atom(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Atom(err) => Some(err),
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator when forming post links.
    fn from(err: ParseError) -> Error {
        Error::UrlParse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::published;

    fn render(posts: &[BlogPostEntry]) -> String {
        let site_url = Url::parse("https://example.org/").unwrap();
        let config = FeedConfig {
            title: "Example",
            author: "Someone",
            site_url: &site_url,
        };
        let mut out = Vec::new();
        write_feed(&config, &published(posts), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_feed_entries() {
        let posts = vec![
            BlogPostEntry::new("older", "Older").dated(2024, 5, 10),
            BlogPostEntry::new("draft", "Draft"),
            BlogPostEntry::new("newer", "Newer").dated(2025, 6, 23),
        ];
        let xml = render(&posts);
        assert!(xml.contains("<id>https://example.org/blog/newer/</id>"));
        assert!(xml.contains("<id>https://example.org/blog/older/</id>"));
        assert!(!xml.contains("draft"));
        assert!(xml.contains("<updated>2025-06-23T00:00:00+00:00</updated>"));
        assert!(xml.find("blog/newer").unwrap() < xml.find("blog/older").unwrap());
    }

    #[test]
    fn test_feed_is_deterministic() {
        let posts = crate::post::posts();
        assert_eq!(render(&posts), render(&posts));
    }
}

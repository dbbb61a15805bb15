//! Defines the [`BlogPostEntry`] type and the static table of blog posts.
//!
//! A post with no date is unpublished: it is left out of the home page index
//! and the feed, but its page is still built so it can be previewed.

use chrono::NaiveDate;
use std::cmp::Reverse;

/// The metadata for a single blog post. The post's markdown source lives in
/// `{source_directory}/blog/{id}/index.md`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlogPostEntry {
    /// Stable key naming the post's source and output directories.
    pub id: &'static str,

    pub title: &'static str,

    /// Publication date; `None` means unpublished.
    pub date: Option<NaiveDate>,

    /// An external location for the post, when it is hosted elsewhere.
    pub href: Option<&'static str>,
}

impl BlogPostEntry {
    pub const fn new(id: &'static str, title: &'static str) -> Self {
        BlogPostEntry {
            id,
            title,
            date: None,
            href: None,
        }
    }

    /// Sets the publication date. Panics on an invalid calendar date, which
    /// can only come from a typo in the static table.
    pub fn dated(mut self, year: i32, month: u32, day: u32) -> Self {
        self.date = Some(NaiveDate::from_ymd_opt(year, month, day).expect("valid post date"));
        self
    }

    pub fn with_href(mut self, href: &'static str) -> Self {
        self.href = Some(href);
        self
    }

    pub fn is_published(&self) -> bool {
        self.date.is_some()
    }

    /// The date as displayed in bylines and indexes.
    pub fn display_date(&self) -> String {
        match self.date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => String::from("unpublished"),
        }
    }

    /// The site-relative URL of the post's page.
    pub fn path(&self) -> String {
        format!("/blog/{}/", self.id)
    }
}

/// The blog posts in table order.
pub fn posts() -> Vec<BlogPostEntry> {
    vec![
        BlogPostEntry::new("autodiff", "Differentiable Programming in General"),
        BlogPostEntry::new(
            "incremental-parsing",
            "How much faster is incremental parsing, really?",
        ),
        BlogPostEntry::new("linked-lists", "How much slower are linked lists, really?"),
        BlogPostEntry::new("random-access", "How much slower is random access, really?")
            .dated(2025, 6, 23),
        BlogPostEntry::new("typst-impressions", "First impressions with Typst").dated(2025, 3, 27),
        BlogPostEntry::new("random-integers", "How can computers roll dice?").dated(2024, 10, 20),
        BlogPostEntry::new("parallelizing-nvcc", "Parallelizing nvcc").dated(2021, 2, 20),
    ]
}

/// Looks up a post by id.
pub fn find<'a>(posts: &'a [BlogPostEntry], id: &str) -> Option<&'a BlogPostEntry> {
    posts.iter().find(|p| p.id == id)
}

/// Returns the published posts, most recent first. Posts sharing a date keep
/// their table order.
pub fn published(posts: &[BlogPostEntry]) -> Vec<&BlogPostEntry> {
    let mut published: Vec<&BlogPostEntry> = posts.iter().filter(|p| p.is_published()).collect();
    published.sort_by_key(|p| Reverse(p.date));
    published
}

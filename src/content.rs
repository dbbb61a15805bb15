//! Resolves the dynamic fragments a post's markdown can reference with
//! `{{key}}` placeholder lines.
//!
//! Posts opt in by registering a [`Provider`] in a [`Registry`]. A provider
//! returns page-description trees keyed by placeholder name; the resolver
//! serializes them into trusted [`Markup`] so the markdown assembler can
//! splice them in before markdown conversion.

use crate::html::{Markup, Node};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// The fragments a provider produces, keyed by placeholder name.
pub type Fragments = BTreeMap<String, Node>;

/// Placeholder name to pre-rendered markup, for one post.
pub type PlaceholderMap = BTreeMap<String, Markup>;

/// Produces a post's dynamic fragments.
pub type Provider = fn() -> anyhow::Result<Fragments>;

/// Maps post ids to their providers. Posts without an entry have no dynamic
/// content.
#[derive(Clone, Default)]
pub struct Registry {
    providers: HashMap<&'static str, Provider>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// The registry populated with the site's own providers.
    pub fn builtin() -> Registry {
        let mut registry = Registry::new();
        crate::providers::register(&mut registry);
        registry
    }

    /// Registers `provider` for `post`, replacing any earlier registration.
    pub fn register(&mut self, post: &'static str, provider: Provider) -> &mut Self {
        self.providers.insert(post, provider);
        self
    }

    pub fn get(&self, post: &str) -> Option<Provider> {
        self.providers.get(post).copied()
    }

    /// Builds the [`PlaceholderMap`] for `post`. A post with no provider gets
    /// an empty map.
    pub fn resolve_content(&self, post: &str) -> Result<PlaceholderMap> {
        let provider = match self.get(post) {
            None => return Ok(PlaceholderMap::new()),
            Some(provider) => provider,
        };
        let fragments = provider().map_err(|source| Error::Provider {
            post: post.to_owned(),
            source,
        })?;
        Ok(fragments
            .into_iter()
            .map(|(key, node)| (key, node.render()))
            .collect())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure to produce a post's dynamic content.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post's provider fails.
    Provider { post: String, source: anyhow::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Provider { post, source } => {
                write!(f, "loading content for post `{}`: {:#}", post, source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Provider { source, .. } => Some(&**source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::el;

    fn greeting() -> anyhow::Result<Fragments> {
        let mut fragments = Fragments::new();
        fragments.insert("hello".to_owned(), el("b").text("hi & bye").into());
        Ok(fragments)
    }

    fn broken() -> anyhow::Result<Fragments> {
        Err(anyhow::anyhow!("out of dice"))
    }

    #[test]
    fn test_missing_provider_yields_empty_map() -> Result<()> {
        assert!(Registry::new().resolve_content("anything")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_fragments_are_serialized() -> Result<()> {
        let mut registry = Registry::new();
        registry.register("post", greeting);
        let map = registry.resolve_content("post")?;
        assert_eq!(Some(&Markup::trusted("<b>hi &amp; bye</b>")), map.get("hello"));
        Ok(())
    }

    #[test]
    fn test_provider_failure_names_post() {
        let mut registry = Registry::new();
        registry.register("post", broken);
        match registry.resolve_content("post") {
            Err(e) => assert_eq!("loading content for post `post`: out of dice", e.to_string()),
            Ok(_) => panic!("wanted provider error"),
        }
    }
}

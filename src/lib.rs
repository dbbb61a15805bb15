//! The library code for the `homepage` static site generator. A build runs in
//! three steps:
//!
//! 1. Composing the home page from the typed component tree in
//!    [`crate::templates`], with the publication list ([`crate::publications`])
//!    and blog index ([`crate::post`]) rendered as fragments.
//! 2. Assembling each blog post: resolving the post's dynamic content
//!    ([`crate::content`]), substituting it into the markdown source, and
//!    converting the result to HTML ([`crate::markdown`]).
//! 3. Writing everything into a staging directory and swapping it into the
//!    published location ([`crate::build`]).
//!
//! Pages are never built by string concatenation. Every page is a
//! [`crate::html::Node`] tree that escapes text when serialized; only the
//! rendered markdown body and provider fragments enter as trusted
//! [`crate::html::Markup`].

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod content;
pub mod feed;
pub mod html;
pub mod logger;
pub mod logo;
pub mod markdown;
pub mod post;
pub mod preview;
pub mod providers;
pub mod publications;
pub mod templates;
pub mod util;
pub mod write;

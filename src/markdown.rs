//! Assembles a post body: substitutes `{{key}}` placeholder lines with the
//! post's dynamic fragments, then converts the markdown to HTML with syntax
//! highlighting and math rendering.
//!
//! Substitution happens on the markdown text, before conversion, so fragments
//! may be arbitrary raw HTML. Keep that order.

use crate::content::{self, PlaceholderMap, Registry};
use crate::html::Markup;
use crate::log;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use quick_xml::escape::escape;
use regex::Regex;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// A line consisting of exactly `{{key}}`. Both `\n` and `\r\n` end a line.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^\{\{([0-9A-Za-z_]+)\}\}$").unwrap());

const THEME: &str = "base16-ocean.dark";

/// Builds post bodies from `{source_directory}/blog/{id}/index.md`.
pub struct Assembler<'a> {
    /// The site source directory (the parent of `blog/`).
    pub source_directory: &'a Path,

    /// Supplies each post's placeholder fragments.
    pub registry: &'a Registry,

    pub renderer: &'a Renderer,
}

impl Assembler<'_> {
    /// The markdown source path for `post`.
    pub fn source_path(&self, post: &str) -> PathBuf {
        self.source_directory.join("blog").join(post).join("index.md")
    }

    /// Resolves the post's placeholders, reads and substitutes its markdown,
    /// and converts the result to HTML.
    pub fn build_body(&self, post: &str) -> Result<Markup> {
        let replacements = self.registry.resolve_content(post)?;
        let path = self.source_path(post);
        let markdown = match std::fs::read_to_string(&path) {
            Ok(markdown) => markdown,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::SourceNotFound { path });
            }
            Err(err) => return Err(Error::Io { path, err }),
        };
        let markdown = substitute(post, &path, &markdown, &replacements)?;
        Ok(self.renderer.to_html(&markdown))
    }
}

/// Replaces every `{{key}}` line in `markdown` with its fragment from
/// `replacements`. An unknown key is an authoring error.
pub fn substitute(
    post: &str,
    path: &Path,
    markdown: &str,
    replacements: &PlaceholderMap,
) -> Result<String> {
    let mut out = String::with_capacity(markdown.len());
    let mut last = 0;
    for captures in PLACEHOLDER.captures_iter(markdown) {
        // Group 0 always participates in a match.
        let (whole, key) = match (captures.get(0), captures.get(1)) {
            (Some(whole), Some(key)) => (whole, key.as_str()),
            _ => continue,
        };
        let fragment = replacements
            .get(key)
            .ok_or_else(|| Error::UnknownPlaceholder {
                post: post.to_owned(),
                path: path.to_owned(),
                key: key.to_owned(),
            })?;
        out.push_str(&markdown[last..whole.start()]);
        out.push_str(fragment.as_str());
        last = whole.end();
    }
    out.push_str(&markdown[last..]);
    Ok(out)
}

/// Converts markdown to HTML. Raw HTML passes through; fenced code is
/// highlighted by language tag; `$..$` and `$$..$$` are rendered with KaTeX.
pub struct Renderer {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}

impl Renderer {
    pub fn new() -> Renderer {
        Renderer {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            // to obtain an owned `Theme` we remove it from the set
            theme: ThemeSet::load_defaults().themes.remove(THEME).unwrap_or_default(),
        }
    }

    pub fn to_html(&self, markdown: &str) -> Markup {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_MATH);

        let mut converter = EventConverter {
            renderer: self,
            code_block: None,
        };
        let mut html = String::with_capacity(markdown.len() * 2);
        pulldown_cmark::html::push_html(
            &mut html,
            Parser::new_ext(markdown, options).filter_map(|ev| converter.convert(ev)),
        );
        Markup::trusted(html)
    }

    /// Highlights `code` as `lang`. Returns `None` when the language is
    /// unknown or highlighting fails.
    fn highlight(&self, code: &str, lang: &str) -> Option<String> {
        let syntax = self.syntaxes.find_syntax_by_token(lang)?;
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut out = String::with_capacity(code.len() * 4);
        for line in LinesWithEndings::from(code) {
            let highlighted = highlighter
                .highlight_line(line, &self.syntaxes)
                .and_then(|regions| styled_line_to_highlighted_html(&regions, IncludeBackground::No));
            match highlighted {
                Ok(html) => out.push_str(&html),
                Err(e) => {
                    log!("markdown"; "highlighting `{}` block failed: {}", lang, e);
                    return None;
                }
            }
        }
        Some(out)
    }

    /// The theme's background as an inline `style` for `<pre>`. Highlighted
    /// spans only carry foreground colors.
    fn background_style(&self) -> String {
        match self.theme.settings.background {
            Some(c) => format!(
                r#" style="background-color:#{:02x}{:02x}{:02x};""#,
                c.r, c.g, c.b
            ),
            None => String::new(),
        }
    }

    fn code_block(&self, lang: &str, code: &str) -> String {
        let highlighted = match lang.is_empty() {
            true => None,
            false => self.highlight(code, lang),
        };
        let (style, body) = match highlighted {
            Some(body) => (self.background_style(), body),
            None => (String::new(), escape(code).into_owned()),
        };
        let class = match lang.is_empty() {
            true => String::new(),
            false => format!(r#" class="language-{}""#, escape(lang)),
        };
        format!("<pre{}><code{}>{}</code></pre>\n", style, class, body)
    }

    fn math(&self, tex: &str, display: bool) -> String {
        let rendered = katex::Opts::builder()
            .display_mode(display)
            .build()
            .map_err(|e| e.to_string())
            .and_then(|opts| katex::render_with_opts(tex, &opts).map_err(|e| e.to_string()));
        match rendered {
            Ok(html) => html,
            Err(e) => {
                log!("markdown"; "rendering math `{}` failed: {}", tex, e);
                format!(r#"<code class="math-error">{}</code>"#, escape(tex))
            }
        }
    }
}

/// A fenced or indented code block being collected.
struct CodeBlock {
    lang: String,
    code: String,
}

struct EventConverter<'a> {
    renderer: &'a Renderer,
    code_block: Option<CodeBlock>,
}

impl<'a> EventConverter<'a> {
    /// Rewrites code blocks and math into HTML events. Returns `None` for
    /// events swallowed into a pending code block.
    fn convert<'b>(&mut self, ev: Event<'b>) -> Option<Event<'b>> {
        match ev {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or_default().to_owned()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                self.code_block = Some(CodeBlock {
                    lang,
                    code: String::new(),
                });
                None
            }
            Event::End(TagEnd::CodeBlock) => self.code_block.take().map(|block| {
                Event::Html(CowStr::from(self.renderer.code_block(&block.lang, &block.code)))
            }),
            Event::Text(text) => match &mut self.code_block {
                Some(block) => {
                    block.code.push_str(&text);
                    None
                }
                None => Some(Event::Text(text)),
            },
            Event::InlineMath(tex) => Some(Event::InlineHtml(CowStr::from(
                self.renderer.math(&tex, false),
            ))),
            Event::DisplayMath(tex) => Some(Event::InlineHtml(CowStr::from(
                self.renderer.math(&tex, true),
            ))),
            _ => Some(ev),
        }
    }
}

/// The result of an assembly operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure to assemble a post body.
#[derive(Debug)]
pub enum Error {
    /// Returned when the post has no `index.md`.
    SourceNotFound { path: PathBuf },

    /// Returned when a `{{key}}` line names a key the post's provider doesn't
    /// supply.
    UnknownPlaceholder {
        post: String,
        path: PathBuf,
        key: String,
    },

    /// Returned when the post's dynamic content can't be produced.
    Content(content::Error),

    /// Returned for other I/O errors reading the source.
    Io { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::SourceNotFound { path } => write!(f, "{} not found", path.display()),
            Error::UnknownPlaceholder { path, key, .. } => {
                write!(f, "{} unknown key: {}", path.display(), key)
            }
            Error::Content(err) => err.fmt(f),
            Error::Io { path, err } => write!(f, "reading {}: {}", path.display(), err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::SourceNotFound { .. } => None,
            Error::UnknownPlaceholder { .. } => None,
            Error::Content(err) => Some(err),
            Error::Io { err, .. } => Some(err),
        }
    }
}

impl From<content::Error> for Error {
    /// Converts a [`content::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator when resolving placeholders.
    fn from(err: content::Error) -> Error {
        Error::Content(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Fragments;
    use crate::html::el;
    use std::fs;

    fn replacements(pairs: &[(&str, &str)]) -> PlaceholderMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Markup::trusted(*v)))
            .collect()
    }

    #[test]
    fn test_substitute_whole_lines_only() -> Result<()> {
        let markdown = "intro\n{{chart}}\ninline {{chart}} stays\n{{ chart }}\n";
        let out = substitute(
            "p",
            Path::new("p/index.md"),
            markdown,
            &replacements(&[("chart", "<svg></svg>")]),
        )?;
        assert_eq!("intro\n<svg></svg>\ninline {{chart}} stays\n{{ chart }}\n", out);
        Ok(())
    }

    #[test]
    fn test_substitute_is_case_sensitive() {
        let result = substitute(
            "p",
            Path::new("p/index.md"),
            "{{Chart}}",
            &replacements(&[("chart", "x")]),
        );
        match result {
            Err(Error::UnknownPlaceholder { post, key, .. }) => {
                assert_eq!("p", post);
                assert_eq!("Chart", key);
            }
            other => panic!("wanted unknown placeholder, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_placeholder_message() {
        let err = substitute("p", Path::new("src/blog/p/index.md"), "{{missing}}", &PlaceholderMap::new())
            .unwrap_err();
        assert_eq!("src/blog/p/index.md unknown key: missing", err.to_string());
    }

    #[test]
    fn test_substitute_crlf_source() -> Result<()> {
        let out = substitute(
            "p",
            Path::new("p/index.md"),
            "intro\r\n{{chart}}\r\nend\r\n",
            &replacements(&[("chart", "<svg></svg>")]),
        )?;
        assert_eq!("intro\r\n<svg></svg>\r\nend\r\n", out);

        let result = substitute("p", Path::new("p/index.md"), "{{missing}}\r\n", &PlaceholderMap::new());
        assert!(matches!(result, Err(Error::UnknownPlaceholder { key, .. }) if key == "missing"));
        Ok(())
    }

    #[test]
    fn test_raw_html_passes_through() {
        let renderer = Renderer::new();
        let html = renderer.to_html("<div class=\"x\">hi</div>\n\n*em*\n");
        assert!(html.as_str().contains("<div class=\"x\">hi</div>"));
        assert!(html.as_str().contains("<p><em>em</em></p>"));
    }

    #[test]
    fn test_known_language_is_highlighted() {
        let renderer = Renderer::new();
        let html = renderer.to_html("```rust\nfn main() {}\n```\n");
        assert!(html
            .as_str()
            .starts_with("<pre style=\"background-color:#2b303b;\"><code class=\"language-rust\">"));
        assert!(html.as_str().contains("<span style="));
        assert!(html.as_str().contains("main"));
    }

    #[test]
    fn test_unknown_language_is_escaped() {
        let renderer = Renderer::new();
        let html = renderer.to_html("```klingon\na < b\n```\n");
        assert_eq!(
            "<pre><code class=\"language-klingon\">a &lt; b\n</code></pre>\n",
            html.as_str()
        );
    }

    #[test]
    fn test_bad_math_falls_back_to_escaped_tex() {
        let renderer = Renderer::new();
        let html = renderer.to_html("$$\\badcommand{a<b&c}$$\n");
        assert_eq!(
            "<p><code class=\"math-error\">\\badcommand{a&lt;b&amp;c}</code></p>",
            html.as_str().trim_end()
        );
    }

    #[test]
    fn test_inline_math_is_rendered() {
        let renderer = Renderer::new();
        let html = renderer.to_html("Let $x^2$ be.\n");
        assert!(html.as_str().contains("katex"));
        assert!(!html.as_str().contains("$x^2$"));
    }

    fn chart() -> anyhow::Result<Fragments> {
        let mut fragments = Fragments::new();
        fragments.insert("chart".to_owned(), el("figure").text("bars").into());
        Ok(fragments)
    }

    fn write_post(root: &Path, id: &str, markdown: &str) -> io::Result<()> {
        let dir = root.join("blog").join(id);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("index.md"), markdown)
    }

    #[test]
    fn test_build_body_is_deterministic() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        write_post(root.path(), "post", "# Title\n\n{{chart}}\n\n```python\nprint(1)\n```\n")?;
        let mut registry = Registry::new();
        registry.register("post", chart);
        let renderer = Renderer::new();
        let assembler = Assembler {
            source_directory: root.path(),
            registry: &registry,
            renderer: &renderer,
        };

        let first = assembler.build_body("post")?;
        assert!(first.as_str().contains("<figure>bars</figure>"));
        assert!(first.as_str().contains("<h1>Title</h1>"));
        assert_eq!(first, assembler.build_body("post")?);
        Ok(())
    }

    #[test]
    fn test_build_body_unknown_placeholder() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        write_post(root.path(), "post", "{{nope}}\n")?;
        let registry = Registry::new();
        let renderer = Renderer::new();
        let assembler = Assembler {
            source_directory: root.path(),
            registry: &registry,
            renderer: &renderer,
        };
        match assembler.build_body("post") {
            Err(Error::UnknownPlaceholder { post, key, path }) => {
                assert_eq!("post", post);
                assert_eq!("nope", key);
                assert_eq!(assembler.source_path("post"), path);
            }
            other => panic!("wanted unknown placeholder, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_build_body_missing_source() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let registry = Registry::new();
        let renderer = Renderer::new();
        let assembler = Assembler {
            source_directory: root.path(),
            registry: &registry,
            renderer: &renderer,
        };
        assert!(matches!(
            assembler.build_body("ghost"),
            Err(Error::SourceNotFound { .. })
        ));
        Ok(())
    }
}

//! Exports [`build_site`], which stitches together the steps of building the
//! site: clearing the staging directory, copying static assets, writing the
//! logo, home page, feed, and every blog post page into staging, and finally
//! swapping the staging directory into the published location.
//!
//! Failures are recovered at the smallest scope that can continue. A missing
//! static file or a broken post is logged and skipped; anything touching the
//! staging or published directory structure aborts the build.

use crate::config::Config;
use crate::content::Registry;
use crate::feed::{write_feed, Error as FeedError, FeedConfig};
use crate::log;
use crate::logo::{logo, rasterize};
use crate::markdown::{Assembler, Error as MarkdownError, Renderer};
use crate::post::{posts, published, BlogPostEntry};
use crate::publications::{self, publications, Publication};
use crate::templates::{blog_index, compose_blog_post, compose_home, BlogPost};
use crate::util::{copy_dir, copy_file, remove_dir_if_exists};
use crate::write::{Error as WriteError, Writer};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

const SITE_TITLE: &str = "Daniel Prol";

/// Builds the site from a [`Config`] using the built-in post table,
/// publications, and content providers.
pub fn build_site(config: &Config) -> Result<BuildReport> {
    Site::builtin().build(config)
}

/// The data a build renders.
pub struct Site {
    pub posts: Vec<BlogPostEntry>,
    pub publications: Vec<Publication>,
    pub registry: Registry,
}

/// What happened to each post during a build.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Ids of posts whose pages were written, in table order.
    pub generated: Vec<String>,

    /// Posts that were skipped, with the reason.
    pub skipped: Vec<(String, String)>,
}

impl Site {
    pub fn builtin() -> Site {
        Site {
            posts: posts(),
            publications: publications(),
            registry: Registry::builtin(),
        }
    }

    /// Runs the whole pipeline and publishes the result.
    pub fn build(&self, config: &Config) -> Result<BuildReport> {
        let staging = config.staging_directory.as_path();
        remove_dir_if_exists(staging).map_err(|err| Error::Clean {
            path: staging.to_owned(),
            err,
        })?;
        std::fs::create_dir_all(staging).map_err(|err| Error::Clean {
            path: staging.to_owned(),
            err,
        })?;

        let writer = Writer {
            output_directory: staging,
        };
        copy_static_files(config);
        self.write_logo(config, &writer)?;

        let published = published(&self.posts);
        let home = compose_home(
            publications::render(&self.publications)?,
            blog_index(&published),
        );
        writer.write_page("index.html", &home)?;

        if config.feed {
            write_feed(
                &FeedConfig {
                    title: SITE_TITLE,
                    author: SITE_TITLE,
                    site_url: &config.site_url,
                },
                &published,
                writer.create("feed.atom")?,
            )?;
        }

        let report = self.write_posts(config, &writer);
        publish(config)?;
        log!(
            "build";
            "published {} posts to {} ({} skipped)",
            report.generated.len(),
            config.publish_directory.display(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn write_logo(&self, config: &Config, writer: &Writer) -> Result<()> {
        let svg = logo().render();
        writer.write_file("logo.svg", svg.as_str())?;
        if config.icon_width == 0 {
            return Ok(());
        }
        match rasterize(svg.as_str(), config.icon_width) {
            Ok(png) => {
                writer.write_file("icon.png", png)?;
            }
            Err(e) => log!("warn"; "skipping icon.png: {}", e),
        }
        Ok(())
    }

    /// Writes every post's page, strictly one after another. A post that
    /// fails is logged and skipped; it never stops the others.
    fn write_posts(&self, config: &Config, writer: &Writer) -> BuildReport {
        let renderer = Renderer::new();
        let assembler = Assembler {
            source_directory: &config.source_directory,
            registry: &self.registry,
            renderer: &renderer,
        };

        let mut report = BuildReport::default();
        for post in &self.posts {
            let source = assembler.source_path(post.id);
            if !source.is_file() {
                log!(
                    "warn";
                    "{} not found, skipping post \"{}\"",
                    source.display(),
                    post.title
                );
                report
                    .skipped
                    .push((post.id.to_owned(), format!("{} not found", source.display())));
                continue;
            }

            match write_post(config, writer, &assembler, post) {
                Ok(()) => {
                    log!("build"; "generated blog post: {}", post.id);
                    report.generated.push(post.id.to_owned());
                }
                Err(e) => {
                    log!("error"; "generating blog post \"{}\": {}", post.id, e);
                    // A failed post leaves nothing behind in staging.
                    let partial = writer.output_directory.join("blog").join(post.id);
                    if let Err(err) = remove_dir_if_exists(&partial) {
                        log!("warn"; "removing {}: {}", partial.display(), err);
                    }
                    report.skipped.push((post.id.to_owned(), e.to_string()));
                }
            }
        }
        report
    }
}

/// Builds one post's body, copies its assets and stylesheet, and writes its
/// page.
fn write_post(config: &Config, writer: &Writer, assembler: &Assembler, post: &BlogPostEntry) -> Result<()> {
    let body = assembler.build_body(post.id)?;

    let source = config.post_source_directory(post.id);
    let output = Path::new("blog").join(post.id);

    let style = source.join("style.css");
    let has_style_override = style.is_file();
    if has_style_override {
        let target = writer.output_directory.join(&output).join("style.css");
        copy_file(&style, &target).map_err(|err| Error::Io { path: target, err })?;
    }

    let assets = source.join("assets");
    if assets.is_dir() {
        if let Err(e) = copy_dir(&assets, &writer.output_directory.join(&output).join("assets")) {
            log!("warn"; "copying assets for \"{}\": {}", post.id, e);
        }
    }

    let page = compose_blog_post(BlogPost {
        title: post.title,
        date: post.date.map(|_| post.display_date()),
        has_style_override,
        body,
    });
    writer.write_page(output.join("index.html"), &page)?;
    Ok(())
}

/// Copies the configured static files into staging. Missing or unreadable
/// files are skipped with a warning.
fn copy_static_files(config: &Config) {
    for file in &config.static_files {
        let src = config.source_directory.join(file);
        if !src.is_file() {
            log!("warn"; "{} not found, skipping", src.display());
            continue;
        }
        if let Err(e) = copy_file(&src, &config.staging_directory.join(file)) {
            log!("warn"; "could not copy {}: {}", src.display(), e);
        }
    }
}

/// Swaps the staging directory into the published location: the old tree
/// moves to the holding name, staging takes its place, and the old tree is
/// removed.
///
/// The two renames are separate operations, so the published location is
/// briefly absent between them.
fn publish(config: &Config) -> Result<()> {
    let holding = config.holding_directory.as_path();
    let live = config.publish_directory.as_path();

    // A holding directory left behind by an interrupted build would make the
    // first rename fail.
    remove_dir_if_exists(holding).map_err(|err| Error::Clean {
        path: holding.to_owned(),
        err,
    })?;

    if let Err(e) = std::fs::rename(live, holding) {
        if e.kind() != io::ErrorKind::NotFound {
            log!("warn"; "could not move {} aside: {}", live.display(), e);
        }
    }
    std::fs::rename(&config.staging_directory, live).map_err(|err| Error::Publish {
        from: config.staging_directory.clone(),
        to: live.to_owned(),
        err,
    })?;
    remove_dir_if_exists(holding).map_err(|err| Error::Clean {
        path: holding.to_owned(),
        err,
    })
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while clearing or creating a build
    /// directory.
    Clean { path: PathBuf, err: io::Error },

    /// Returned when the staging directory can't be renamed into place.
    Publish {
        from: PathBuf,
        to: PathBuf,
        err: io::Error,
    },

    /// Returned for errors writing output files.
    Write(WriteError),

    /// Returned for malformed publications.
    Publications(publications::Error),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for errors assembling a post body.
    Markdown(MarkdownError),

    /// Returned for other I/O errors.
    Io { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::Publish { from, to, err } => write!(
                f,
                "Publishing '{}' to '{}': {}",
                from.display(),
                to.display(),
                err
            ),
            Error::Write(err) => err.fmt(f),
            Error::Publications(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Markdown(err) => err.fmt(f),
            Error::Io { path, err } => write!(f, "{}: {}", path.display(), err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Clean { err, .. } => Some(err),
            Error::Publish { err, .. } => Some(err),
            Error::Write(err) => Some(err),
            Error::Publications(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Markdown(err) => Some(err),
            Error::Io { err, .. } => Some(err),
        }
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<publications::Error> for Error {
    /// Converts [`publications::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: publications::Error) -> Error {
        Error::Publications(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<MarkdownError> for Error {
    /// Converts [`MarkdownError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: MarkdownError) -> Error {
        Error::Markdown(err)
    }
}

//! Opens a single post in the platform's default browser.
//!
//! Posts with an external `href` open that link; everything else opens the
//! published page from the local output directory, so a build has to have
//! run first.

use crate::config::Config;
use crate::log;
use crate::post::{find, BlogPostEntry};
use anyhow::{anyhow, bail, Context, Result};
use std::process::Command;
use url::Url;

/// The URL the launcher opens for `entry`.
pub fn target_url(entry: &BlogPostEntry, config: &Config) -> Result<Url> {
    if let Some(href) = entry.href {
        return Url::parse(href).with_context(|| format!("Invalid href for post `{}`", entry.id));
    }
    let page = config
        .publish_directory
        .join("blog")
        .join(entry.id)
        .join("index.html");
    let page = std::path::absolute(&page)
        .with_context(|| format!("Resolving `{}`", page.display()))?;
    Url::from_file_path(&page).map_err(|()| anyhow!("`{}` has no file URL", page.display()))
}

/// Every known post with its title and the URL it would open.
pub fn listing(posts: &[BlogPostEntry], config: &Config) -> String {
    let mut out = String::from("Available posts:\n");
    for post in posts {
        out.push_str(&format!("  {}: {}\n", post.id, post.title));
        match target_url(post, config) {
            Ok(url) => out.push_str(&format!("    → {}\n", url)),
            Err(e) => out.push_str(&format!("    → ({:#})\n", e)),
        }
    }
    out
}

/// Looks up `post` and opens it. A missing or unknown id prints the listing
/// and fails.
pub fn preview(posts: &[BlogPostEntry], config: &Config, post: Option<&str>) -> Result<()> {
    let id = match post {
        Some(id) => id,
        None => {
            print!("{}", listing(posts, config));
            bail!("No post given; pass --post=<id>");
        }
    };
    let entry = match find(posts, id) {
        Some(entry) => entry,
        None => {
            print!("{}", listing(posts, config));
            bail!("Unknown post `{}`", id);
        }
    };

    let url = target_url(entry, config)?;
    log!("preview"; "opening {}", url);
    open_in_browser(&url)
}

fn open_in_browser(url: &Url) -> Result<()> {
    let mut command = browser_command(url);
    let status = command
        .status()
        .with_context(|| format!("Failed to launch browser for {}", url))?;
    if !status.success() {
        bail!("Browser exited with {}", status);
    }
    Ok(())
}

#[cfg(target_os = "macos")]
fn browser_command(url: &Url) -> Command {
    let mut command = Command::new("open");
    command.arg(url.as_str());
    command
}

#[cfg(target_os = "windows")]
fn browser_command(url: &Url) -> Command {
    use std::os::windows::process::CommandExt;
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).raw_arg(cmd_quoted(url));
    command
}

/// Quotes `url` for `cmd`, so `&` and `^` in a query string stay part of
/// the argument. A serialized URL never contains a bare `"`.
#[cfg(any(target_os = "windows", test))]
fn cmd_quoted(url: &Url) -> String {
    format!("\"{}\"", url.as_str())
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn browser_command(url: &Url) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url.as_str());
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posts() -> Vec<BlogPostEntry> {
        vec![
            BlogPostEntry::new("dice", "Dice").dated(2024, 5, 10),
            BlogPostEntry::new("away", "Away").with_href("https://example.org/away"),
        ]
    }

    #[test]
    fn test_target_url_prefers_href() -> Result<()> {
        let root = tempfile::tempdir()?;
        let config = Config::default_for(root.path());
        let url = target_url(&posts()[1], &config)?;
        assert_eq!("https://example.org/away", url.as_str());
        Ok(())
    }

    #[test]
    fn test_target_url_local_page() -> Result<()> {
        let root = tempfile::tempdir()?;
        let config = Config::default_for(root.path());
        let url = target_url(&posts()[0], &config)?;
        assert_eq!("file", url.scheme());
        assert!(url.path().ends_with("/dist/blog/dice/index.html"));
        Ok(())
    }

    #[test]
    fn test_cmd_quoting_keeps_query() -> Result<()> {
        let url = Url::parse("https://example.org/p?a=1&b=\"2\"")?;
        assert_eq!("\"https://example.org/p?a=1&b=%222%22\"", cmd_quoted(&url));
        Ok(())
    }

    #[test]
    fn test_listing() -> Result<()> {
        let root = tempfile::tempdir()?;
        let config = Config::default_for(root.path());
        let listing = listing(&posts(), &config);
        assert!(listing.contains("  dice: Dice\n"));
        assert!(listing.contains("  away: Away\n    → https://example.org/away\n"));
        Ok(())
    }

    #[test]
    fn test_preview_requires_known_post() -> Result<()> {
        let root = tempfile::tempdir()?;
        let config = Config::default_for(root.path());
        assert!(preview(&posts(), &config, None).is_err());
        let err = preview(&posts(), &config, Some("nope")).unwrap_err();
        assert_eq!("Unknown post `nope`", err.to_string());
        Ok(())
    }
}

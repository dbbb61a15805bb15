//! Loads the site configuration from an optional `site.yaml` project file.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "site.yaml";

const DEFAULT_SITE_URL: &str = "https://dprol.github.io/";

#[derive(Deserialize)]
struct IconWidth(u32);
impl Default for IconWidth {
    fn default() -> Self {
        IconWidth(192)
    }
}

#[derive(Deserialize)]
struct Feed(bool);
impl Default for Feed {
    fn default() -> Self {
        Feed(true)
    }
}

/// The on-disk shape of `site.yaml`. Every field is optional.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct Project {
    source_directory: Option<PathBuf>,
    staging_directory: Option<PathBuf>,
    publish_directory: Option<PathBuf>,
    holding_directory: Option<PathBuf>,
    static_files: Option<Vec<String>>,
    site_url: Option<Url>,

    #[serde(default)]
    icon_width: IconWidth,

    #[serde(default)]
    feed: Feed,
}

/// Resolved configuration. All directories are absolute or relative to the
/// process's working directory (never to the project file).
#[derive(Clone, Debug)]
pub struct Config {
    /// Holds the static assets and the `blog/<id>/` post sources.
    pub source_directory: PathBuf,

    /// Scratch output, fully populated before it is published.
    pub staging_directory: PathBuf,

    /// The live output location.
    pub publish_directory: PathBuf,

    /// Temporary name for the previously published tree during the swap.
    pub holding_directory: PathBuf,

    /// Files copied from `source_directory` into the staging root. Missing
    /// files are skipped with a warning.
    pub static_files: Vec<String>,

    /// Width of the rasterized `icon.png`; `0` disables rasterization.
    pub icon_width: u32,

    /// Base URL of the deployed site.
    pub site_url: Url,

    /// Whether to write `feed.atom`.
    pub feed: bool,
}

impl Config {
    /// The default configuration with every directory relative to `root`.
    pub fn default_for(root: &Path) -> Config {
        Config::from_project(root, Project::default())
    }

    /// Searches `dir` and its ancestors for [`PROJECT_FILE`]. Falls back to
    /// [`Config::default_for`] rooted at `dir` when no project file exists.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let mut current = Some(dir);
        while let Some(candidate) = current {
            let path = candidate.join(PROJECT_FILE);
            if path.is_file() {
                return Config::from_project_file(&path)
                    .map_err(|e| anyhow!("Loading configuration `{}`: {:#}", path.display(), e));
            }
            current = candidate.parent();
        }
        Ok(Config::default_for(dir))
    }

    /// Loads a specific project file. Relative paths resolve against the
    /// file's parent directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        use crate::util::open;
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Ok(Config::from_project(project_root, project)),
        }
    }

    fn from_project(root: &Path, project: Project) -> Config {
        let dir = |p: Option<PathBuf>, default: &str| root.join(p.unwrap_or_else(|| default.into()));
        Config {
            source_directory: dir(project.source_directory, "src"),
            staging_directory: dir(project.staging_directory, "out"),
            publish_directory: dir(project.publish_directory, "dist"),
            holding_directory: dir(project.holding_directory, "tmp"),
            static_files: project.static_files.unwrap_or_else(|| {
                ["all.css", "blog.css", "index.css", "photo.jpg"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            }),
            icon_width: project.icon_width.0,
            site_url: project
                .site_url
                .unwrap_or_else(|| Url::parse(DEFAULT_SITE_URL).expect("default site url is valid")),
            feed: project.feed.0,
        }
    }

    /// The source directory for a single post.
    pub fn post_source_directory(&self, id: &str) -> PathBuf {
        self.source_directory.join("blog").join(id)
    }
}

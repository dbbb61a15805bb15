use anyhow::Result;
use clap::{Parser, Subcommand};
use homepage::build::build_site;
use homepage::config::Config;
use homepage::log;
use homepage::post::posts;
use homepage::preview::preview;
use std::process::ExitCode;

/// Builds and previews the homepage.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Builds the site and publishes it over the previous output
    Build,

    /// Opens a post in the default browser, or lists the posts
    Preview {
        /// The id of the post to open
        #[arg(long)]
        post: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_directory(&std::env::current_dir()?)?;

    match &cli.command {
        Commands::Build => match build_site(&config) {
            Ok(_) => Ok(ExitCode::SUCCESS),
            Err(e) => {
                log!("error"; "build failed: {}", e);
                Ok(ExitCode::FAILURE)
            }
        },
        Commands::Preview { post } => match preview(&posts(), &config, post.as_deref()) {
            Ok(()) => Ok(ExitCode::SUCCESS),
            Err(e) => {
                log!("error"; "{:#}", e);
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

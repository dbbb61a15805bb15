//! Terminal logging with colored module prefixes.
//!
//! ```ignore
//! log!("build"; "copying {} static files", count);
//! ```
//!
//! prints `[build] copying 4 static files` with the prefix in bold color.

use colored::{ColoredString, Colorize};
use std::io::{stdout, Write};

/// Log a message with a colored module prefix.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Writes `[module] message` to stdout. Write failures are ignored; a closed
/// terminal must never abort a build.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "error" => prefix.bright_red().bold(),
        "warn" => prefix.bright_magenta().bold(),
        "build" => prefix.bright_green().bold(),
        "preview" => prefix.bright_blue().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_wraps_module_name() {
        colored::control::set_override(false);
        assert_eq!("[markdown]", colorize_prefix("markdown").to_string());
        assert_eq!("[ERROR]", colorize_prefix("ERROR").to_string());
    }
}

//! The site logo, as an SVG tree and as a rasterized PNG icon.

use crate::html::{el, Node};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use std::fmt;

/// The logo: a rounded square holding a stylized opening brace and cursor.
/// Shapes only, so rasterizing needs no fonts.
pub fn logo() -> Node {
    el("svg")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("width", "64")
        .attr("height", "64")
        .attr("viewBox", "0 0 64 64")
        .child(
            el("rect")
                .attr("width", "64")
                .attr("height", "64")
                .attr("rx", "12")
                .attr("fill", "#1e2a3a"),
        )
        .child(
            el("path")
                .attr("d", "M28 14c-6 0-8 3-8 8v4c0 3-2 5-5 6 3 1 5 3 5 6v4c0 5 2 8 8 8")
                .attr("fill", "none")
                .attr("stroke", "#f5c542")
                .attr("stroke-width", "4")
                .attr("stroke-linecap", "round"),
        )
        .child(
            el("rect")
                .attr("x", "36")
                .attr("y", "40")
                .attr("width", "14")
                .attr("height", "4")
                .attr("rx", "2")
                .attr("fill", "#f5c542"),
        )
        .into()
}

/// Renders `svg` to a PNG `width` pixels wide, preserving aspect ratio.
pub fn rasterize(svg: &str, width: u32) -> Result<Vec<u8>> {
    let tree = Tree::from_str(svg, &Options::default()).map_err(|e| Error::Parse(e.to_string()))?;
    let size = tree.size();
    if width == 0 || size.width() <= 0.0 {
        return Err(Error::EmptyImage);
    }
    let scale = width as f32 / size.width();
    let height = (size.height() * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(Error::EmptyImage)?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    pixmap.encode_png().map_err(|e| Error::Encode(e.to_string()))
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure to rasterize the logo.
#[derive(Debug)]
pub enum Error {
    /// Returned when the SVG can't be parsed.
    Parse(String),

    /// Returned when the requested raster has no pixels.
    EmptyImage,

    /// Returned when PNG encoding fails.
    Encode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "parsing svg: {}", err),
            Error::EmptyImage => write!(f, "raster image would be empty"),
            Error::Encode(err) => write!(f, "encoding png: {}", err),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_rasterize_logo() -> Result<()> {
        let svg = logo().render();
        let png = rasterize(svg.as_str(), 192)?;
        assert!(png.starts_with(PNG_SIGNATURE));
        assert_eq!(png, rasterize(svg.as_str(), 192)?);
        Ok(())
    }

    #[test]
    fn test_rasterize_rejects_garbage() {
        assert!(matches!(rasterize("not svg", 192), Err(Error::Parse(_))));
    }

    #[test]
    fn test_rasterize_rejects_zero_width() {
        let svg = logo().render();
        assert!(matches!(rasterize(svg.as_str(), 0), Err(Error::EmptyImage)));
    }
}

//! Mapping from page geometry to IIIF/Web Annotation selector values.

use crate::page::{LineBox, Point};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Render a polygon as an SVG document for an `SvgSelector`.
///
/// The outline is closed by repeating the first point, and every coordinate
/// is truncated to an integer. The polygon itself is passed through as is.
pub fn svg_polygon(points: &[Point]) -> String {
    let closed = points.iter().chain(points.first());
    let rendered: Vec<String> = closed
        .map(|point| format!("{},{}", point.x as i64, point.y as i64))
        .collect();

    format!(
        "<svg xmlns=\"{SVG_NAMESPACE}\"><polygon points=\"{}\"/></svg>",
        rendered.join(" ")
    )
}

/// Clamp a line box to the page and render it as `x,y,w,h`.
///
/// The origin is pulled into `[0, page]` and the extent is cut so the box
/// never reaches past the page edge.
pub fn xywh_fragment(line: LineBox, page_width: i64, page_height: i64) -> String {
    let (x, w) = clamp_span(line.x, line.w, page_width);
    let (y, h) = clamp_span(line.y, line.h, page_height);
    format!("{x},{y},{w},{h}")
}

/// Target string addressing a region of a canvas, `{canvas}#xywh={fragment}`.
pub fn canvas_fragment_target(canvas_id: &str, fragment: &str) -> String {
    format!("{canvas_id}#xywh={fragment}")
}

fn clamp_span(start: i64, extent: i64, limit: i64) -> (i64, i64) {
    let limit = limit.max(0);
    let start = start.clamp(0, limit);
    let extent = extent.clamp(0, limit - start);
    (start, extent)
}

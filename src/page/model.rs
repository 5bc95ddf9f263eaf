//! Source document model for a single transcribed page.
//!
//! These types mirror the parts of a PAGE XML document that the annotation
//! passes consume. Construction is permissive: lines without text, regions
//! without a type, and tag offsets that run past the line text are all
//! representable, and are defaulted or clamped where they are read.

use serde::{Deserialize, Serialize};

/// Region type markers that every text region carries and that never count
/// as its structural label.
pub const GENERIC_REGION_TYPES: &[&str] = &["physical_structure_doc", "pagexml_doc", "text_region"];

/// Label used for regions whose type list holds only generic markers.
pub const UNKNOWN_REGION_TYPE: &str = "unknown";

/// A point in page pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box in XYWH form, relative to the page origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBox {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl LineBox {
    pub fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { x, y, w, h }
    }

    /// Bounding box of a polygon; the empty polygon maps to the zero box.
    pub fn from_points(points: &[Point]) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for point in points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        let (x, y) = (min_x as i64, min_y as i64);
        Self {
            x,
            y,
            w: (max_x as i64).saturating_sub(x),
            h: (max_y as i64).saturating_sub(y),
        }
    }
}

/// One parsed page.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Page {
    /// Image file name the page transcribes (e.g. `NL-AsdSAA_0001.jpg`).
    pub image_filename: String,

    /// Page width in pixels.
    pub width: i64,

    /// Page height in pixels.
    pub height: i64,

    /// Text regions in document order.
    pub regions: Vec<TextRegion>,
}

/// A block of text with an outline polygon.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TextRegion {
    pub id: String,

    /// Type labels in a fixed order: the generic markers first, then the
    /// region's `@type`, then any `structure` type from its custom attribute.
    pub types: Vec<String>,

    pub coords: Vec<Point>,

    pub lines: Vec<TextLine>,
}

impl TextRegion {
    /// First type label that is not a generic marker, or `"unknown"`.
    pub fn label(&self) -> &str {
        self.types
            .iter()
            .map(String::as_str)
            .find(|kind| !GENERIC_REGION_TYPES.contains(kind))
            .unwrap_or(UNKNOWN_REGION_TYPE)
    }
}

/// A single transcribed line.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TextLine {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    pub coords: Vec<Point>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<CustomTag>,
}

impl TextLine {
    /// Line text, or the empty string when the line has none.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn bounding_box(&self) -> LineBox {
        LineBox::from_points(&self.coords)
    }
}

/// A classification of a character span within a line.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTag {
    /// Tag name, e.g. `person` or `place`.
    pub kind: String,

    /// Start of the span, in characters.
    pub offset: usize,

    /// Span length, in characters.
    pub length: usize,

    /// Wikidata item id (`Q…`), when the tag is linked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikidata: Option<String>,

    /// ISO date value carried by date tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Set when the span continues on the next line.
    #[serde(default)]
    pub continued: bool,
}

/// A tag resolved against its line: the textual value plus where it lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaggedSpan {
    pub kind: String,
    pub value: String,
    pub region_id: String,
    pub line_id: String,
    pub offset: usize,
    pub length: usize,
    pub wikidata: Option<String>,
    pub date: Option<String>,
}

/// Slice `text` at `[offset, offset + length)` counted in characters.
///
/// Spans past the end of the text are clamped.
pub fn slice_chars(text: &str, offset: usize, length: usize) -> String {
    text.chars().skip(offset).take(length).collect()
}

impl Page {
    /// Every tag on the page, region by region, line by line, in tag order.
    pub fn tagged_spans(&self) -> Vec<TaggedSpan> {
        let mut spans = Vec::new();

        for region in &self.regions {
            for line in &region.lines {
                for tag in &line.tags {
                    spans.push(TaggedSpan {
                        kind: tag.kind.clone(),
                        value: slice_chars(line.text_or_empty(), tag.offset, tag.length),
                        region_id: region.id.clone(),
                        line_id: line.id.clone(),
                        offset: tag.offset,
                        length: tag.length,
                        wikidata: tag.wikidata.clone(),
                        date: tag.date.clone(),
                    });
                }
            }
        }

        spans
    }

    /// Total number of lines across all regions.
    pub fn line_count(&self) -> usize {
        self.regions.iter().map(|region| region.lines.len()).sum()
    }
}

//! PAGE XML reader.
//!
//! Reads the subset of the PRImA PAGE format that Transkribus exports: the
//! `Page` element with its image size, `TextRegion`s with outline polygons,
//! and `TextLine`s with their text and `custom` tag metadata. Both the
//! `points="x,y x,y"` attribute form and the older `<Point x y/>` children
//! form of `Coords` are accepted.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use super::custom::{entity_tags, parse_custom_attr, structure_type, CustomEntry, DEFAULT_ENTITY_TAGS};
use super::model::{Page, Point, TextLine, TextRegion, GENERIC_REGION_TYPES};
use crate::error::ConvertError;

/// Settings for reading PAGE XML.
#[derive(Clone, Debug)]
pub struct PageXmlOptions {
    /// Custom tag names kept as entity tags.
    pub entity_tags: Vec<String>,
}

impl Default for PageXmlOptions {
    fn default() -> Self {
        Self {
            entity_tags: DEFAULT_ENTITY_TAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Read a PAGE XML file.
///
/// When the `Page` element has no `imageFilename`, the XML file name is used.
pub fn read_page_xml(path: &Path, options: &PageXmlOptions) -> Result<Page, ConvertError> {
    let xml = fs::read_to_string(path).map_err(ConvertError::Io)?;
    parse_page_xml_str(&xml, path, options)
}

/// Parse PAGE XML from a UTF-8 string.
pub fn from_page_xml_str(xml: &str, options: &PageXmlOptions) -> Result<Page, ConvertError> {
    parse_page_xml_str(xml, Path::new("<memory>"), options)
}

/// Parse PAGE XML from bytes.
///
/// The input must be valid UTF-8.
pub fn from_page_xml_slice(bytes: &[u8]) -> Result<Page, ConvertError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| ConvertError::PageXmlParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    from_page_xml_str(xml, &PageXmlOptions::default())
}

fn parse_page_xml_str(
    xml: &str,
    path: &Path,
    options: &PageXmlOptions,
) -> Result<Page, ConvertError> {
    let document = Document::parse(xml).map_err(|source| ConvertError::PageXmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;

    let root = document.root_element();
    if root.tag_name().name() != "PcGts" {
        return Err(parse_error(path, "missing <PcGts> root element"));
    }

    let page_node = child_element(root, "Page")
        .ok_or_else(|| parse_error(path, "missing <Page> in <PcGts>"))?;

    let image_filename = page_node
        .attribute("imageFilename")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToOwned::to_owned)
        .or_else(|| {
            path.file_name()
                .map(|name| name.to_string_lossy().to_string())
        })
        .unwrap_or_default();

    let width = parse_required_dimension(page_node, "imageWidth", path)?;
    let height = parse_required_dimension(page_node, "imageHeight", path)?;

    let mut regions = Vec::new();
    for region_node in page_node
        .descendants()
        .filter(|node| is_element_named(*node, "TextRegion"))
    {
        regions.push(parse_region(region_node, path, options)?);
    }

    Ok(Page {
        image_filename,
        width,
        height,
        regions,
    })
}

fn parse_region(
    node: Node<'_, '_>,
    path: &Path,
    options: &PageXmlOptions,
) -> Result<TextRegion, ConvertError> {
    let id = required_attribute(node, "id", path, "<TextRegion>")?;
    let custom = custom_entries(node, path);

    let mut types: Vec<String> = GENERIC_REGION_TYPES.iter().map(|s| s.to_string()).collect();
    if let Some(kind) = node.attribute("type").filter(|t| !t.is_empty()) {
        types.push(kind.to_string());
    }
    if let Some(kind) = structure_type(&custom) {
        if !types.contains(&kind) {
            types.push(kind);
        }
    }

    let coords = parse_coords(node, path)?;

    let mut lines = Vec::new();
    for line_node in node
        .children()
        .filter(|child| is_element_named(*child, "TextLine"))
    {
        lines.push(parse_line(line_node, path, options)?);
    }

    Ok(TextRegion {
        id,
        types,
        coords,
        lines,
    })
}

fn parse_line(
    node: Node<'_, '_>,
    path: &Path,
    options: &PageXmlOptions,
) -> Result<TextLine, ConvertError> {
    let id = required_attribute(node, "id", path, "<TextLine>")?;
    let coords = parse_coords(node, path)?;
    let text = child_element(node, "TextEquiv")
        .and_then(|equiv| child_element(equiv, "Unicode"))
        .and_then(|unicode| unicode.text())
        .map(ToOwned::to_owned);

    let custom = custom_entries(node, path);
    let tags = entity_tags(&custom, &options.entity_tags);

    Ok(TextLine {
        id,
        text,
        coords,
        tags,
    })
}

fn custom_entries(node: Node<'_, '_>, path: &Path) -> Vec<CustomEntry> {
    let Some(raw) = node.attribute("custom") else {
        return Vec::new();
    };

    match parse_custom_attr(raw) {
        Ok(entries) => entries,
        Err(message) => {
            log::warn!(
                "{}: ignoring malformed custom attribute on '{}': {}",
                path.display(),
                node.attribute("id").unwrap_or("?"),
                message
            );
            Vec::new()
        }
    }
}

fn parse_coords(node: Node<'_, '_>, path: &Path) -> Result<Vec<Point>, ConvertError> {
    let Some(coords) = child_element(node, "Coords") else {
        return Ok(Vec::new());
    };

    if let Some(points) = coords.attribute("points") {
        return parse_points_attr(points, path);
    }

    coords
        .children()
        .filter(|child| is_element_named(*child, "Point"))
        .map(|point| -> Result<Point, ConvertError> {
            let x = parse_number_attr(point, "x", path)?;
            let y = parse_number_attr(point, "y", path)?;
            Ok(Point::new(x, y))
        })
        .collect()
}

fn parse_points_attr(raw: &str, path: &Path) -> Result<Vec<Point>, ConvertError> {
    raw.split_whitespace()
        .map(|pair| {
            let parsed = pair
                .split_once(',')
                .and_then(|(x, y)| Some((x.parse::<f64>().ok()?, y.parse::<f64>().ok()?)));
            parsed
                .map(|(x, y)| Point::new(x, y))
                .ok_or_else(|| parse_error(path, &format!("invalid point '{pair}' in Coords/@points")))
        })
        .collect()
}

fn parse_number_attr(node: Node<'_, '_>, name: &str, path: &Path) -> Result<f64, ConvertError> {
    let raw = required_attribute(node, name, path, "<Point>")?;
    raw.parse::<f64>().map_err(|_| {
        parse_error(
            path,
            &format!("invalid @{name} value '{raw}' in <Point>; expected number"),
        )
    })
}

fn parse_required_dimension(
    node: Node<'_, '_>,
    name: &str,
    path: &Path,
) -> Result<i64, ConvertError> {
    let raw = required_attribute(node, name, path, "<Page>")?;
    raw.parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().map(|value| value as i64))
        .ok_or_else(|| {
            parse_error(
                path,
                &format!("invalid @{name} value '{raw}' in <Page>; expected integer"),
            )
        })
}

fn required_attribute(
    node: Node<'_, '_>,
    name: &str,
    path: &Path,
    context: &str,
) -> Result<String, ConvertError> {
    node.attribute(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| parse_error(path, &format!("missing @{name} in {context}")))
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| is_element_named(*child, tag))
}

fn is_element_named(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && node.tag_name().name() == tag
}

fn parse_error(path: &Path, message: &str) -> ConvertError {
    ConvertError::PageXmlParse {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PcGts xmlns="http://schema.primaresearch.org/PAGE/gts/pagecontent/2013-07-15">
  <Metadata><Creator>prov=READ-COOP</Creator></Metadata>
  <Page imageFilename="NL-AsdSAA_0001.jpg" imageWidth="2000" imageHeight="3000">
    <TextRegion id="r1" type="paragraph" custom="readingOrder {index:0;}">
      <Coords points="100,100 900,100 900,400 100,400"/>
      <TextLine id="r1l1" custom="readingOrder {index:0;} place {offset:15; length:9; wikiData:Q727;}">
        <Coords points="110,110 880,110 880,160 110,160"/>
        <Baseline points="110,150 880,150"/>
        <TextEquiv><Unicode>Jan loopt naar Amsterdam</Unicode></TextEquiv>
      </TextLine>
      <TextLine id="r1l2">
        <Coords points="110,170 500,170 500,220 110,220"/>
        <TextEquiv><Unicode/></TextEquiv>
      </TextLine>
      <TextEquiv><Unicode>Jan loopt naar Amsterdam</Unicode></TextEquiv>
    </TextRegion>
    <TextRegion id="r2" custom="structure {type:heading;}">
      <Coords points="100,20 600,20 600,80"/>
    </TextRegion>
  </Page>
</PcGts>"#;

    #[test]
    fn parses_page_regions_and_lines() {
        let page = from_page_xml_str(SAMPLE, &PageXmlOptions::default()).expect("parse");

        assert_eq!(page.image_filename, "NL-AsdSAA_0001.jpg");
        assert_eq!((page.width, page.height), (2000, 3000));
        assert_eq!(page.regions.len(), 2);

        let region = &page.regions[0];
        assert_eq!(region.label(), "paragraph");
        assert_eq!(region.coords.len(), 4);
        assert_eq!(region.lines.len(), 2);

        let line = &region.lines[0];
        assert_eq!(line.text.as_deref(), Some("Jan loopt naar Amsterdam"));
        assert_eq!(line.tags.len(), 1);
        assert_eq!(line.tags[0].wikidata.as_deref(), Some("Q727"));
        assert_eq!(region.lines[1].text, None);

        assert_eq!(page.regions[1].label(), "heading");
        assert!(page.regions[1].lines.is_empty());
    }

    #[test]
    fn accepts_point_children() {
        let xml = r#"<PcGts><Page imageFilename="a.jpg" imageWidth="10" imageHeight="10">
  <TextRegion id="r1"><Coords><Point x="1" y="2"/><Point x="3" y="4"/></Coords></TextRegion>
</Page></PcGts>"#;
        let page = from_page_xml_str(xml, &PageXmlOptions::default()).expect("parse");
        assert_eq!(page.regions[0].coords, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
        assert_eq!(page.regions[0].label(), "unknown");
    }

    #[test]
    fn missing_dimensions_are_errors() {
        let xml = r#"<PcGts><Page imageFilename="a.jpg" imageWidth="10"/></PcGts>"#;
        let err = from_page_xml_str(xml, &PageXmlOptions::default()).expect_err("should fail");
        match err {
            ConvertError::PageXmlParse { message, .. } => {
                assert!(message.contains("imageHeight"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_points_are_errors() {
        let xml = r#"<PcGts><Page imageWidth="10" imageHeight="10">
  <TextRegion id="r1"><Coords points="1,2 three,4"/></TextRegion>
</Page></PcGts>"#;
        let err = from_page_xml_str(xml, &PageXmlOptions::default()).expect_err("should fail");
        assert!(err.to_string().contains("three,4"));
    }

    #[test]
    fn malformed_custom_attribute_is_ignored() {
        let xml = r#"<PcGts><Page imageWidth="10" imageHeight="10">
  <TextRegion id="r1"><TextLine id="l1" custom="person {offset:0;"/></TextRegion>
</Page></PcGts>"#;
        let page = from_page_xml_str(xml, &PageXmlOptions::default()).expect("parse");
        assert!(page.regions[0].lines[0].tags.is_empty());
    }

    #[test]
    fn image_filename_falls_back_to_xml_name() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("0007.xml");
        fs::write(&path, r#"<PcGts><Page imageWidth="10" imageHeight="10"/></PcGts>"#)
            .expect("write xml");

        let page = read_page_xml(&path, &PageXmlOptions::default()).expect("read");
        assert_eq!(page.image_filename, "0007.xml");
    }

    #[test]
    fn rejects_non_page_documents() {
        let err = from_page_xml_slice(b"<annotation/>").expect_err("should fail");
        assert!(err.to_string().contains("PcGts"));
        assert!(from_page_xml_slice(&[0xff, 0xfe]).is_err());
    }
}

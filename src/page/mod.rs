//! Source document model and PAGE XML reader.
//!
//! A [`Page`] holds everything the annotation passes read from one
//! transcription file: the page size, its text regions with outline
//! polygons, and each region's lines with text and entity tags.
//!
//! # Example
//!
//! ```
//! use transkribus_iiif::page::io_page_xml::{from_page_xml_str, PageXmlOptions};
//!
//! let xml = r#"<PcGts><Page imageFilename="0001.jpg" imageWidth="100" imageHeight="50">
//!   <TextRegion id="r1" type="paragraph">
//!     <Coords points="0,0 100,0 100,50 0,50"/>
//!     <TextLine id="l1" custom="place {offset:0; length:9;}">
//!       <Coords points="5,5 95,5 95,20 5,20"/>
//!       <TextEquiv><Unicode>Amsterdam</Unicode></TextEquiv>
//!     </TextLine>
//!   </TextRegion>
//! </Page></PcGts>"#;
//!
//! let page = from_page_xml_str(xml, &PageXmlOptions::default()).unwrap();
//! assert_eq!(page.tagged_spans()[0].value, "Amsterdam");
//! ```

pub mod custom;
pub mod io_page_xml;
mod model;

pub use custom::DEFAULT_ENTITY_TAGS;

pub use model::{
    slice_chars, CustomTag, LineBox, Page, Point, TaggedSpan, TextLine, TextRegion,
    GENERIC_REGION_TYPES, UNKNOWN_REGION_TYPE,
};

//! Fuzz target for PAGE XML parsing.
//!
//! Parsed pages are also run through the selector and slicing code that the
//! annotation passes apply to them.

#![no_main]

use libfuzzer_sys::fuzz_target;
use transkribus_iiif::iiif::selector::{svg_polygon, xywh_fragment};
use transkribus_iiif::page::io_page_xml::from_page_xml_slice;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(page) = from_page_xml_slice(data) {
        for region in &page.regions {
            let _ = svg_polygon(&region.coords);
            for line in &region.lines {
                let _ = xywh_fragment(line.bounding_box(), page.width, page.height);
            }
        }
        let _ = page.tagged_spans();
    }
});

//! Region layout tags.

use super::{write_annotation_page, Category, OutputLayout};
use crate::error::ConvertError;
use crate::iiif::annotation::{
    Annotation, AnnotationPage, Body, Reference, Selector, SpecificTarget, Target,
    ANNOTATION_CONTEXT, TEXT_GRANULARITY_CONTEXT,
};
use crate::iiif::selector::svg_polygon;
use crate::page::Page;

/// Build the layout page: one tagging annotation per text region.
pub fn build_layout(page: &Page, canvas_id: &str) -> AnnotationPage {
    let mut collection = AnnotationPage::new(Category::Layout.page_id(canvas_id));

    for region in &page.regions {
        let target = SpecificTarget::new(canvas_id, Selector::svg(svg_polygon(&region.coords)));

        let annotation = Annotation::new(&[ANNOTATION_CONTEXT, TEXT_GRANULARITY_CONTEXT])
            .with_id(format!("{}/{}", collection.id, region.id))
            .with_granularity("block")
            .with_motivation("tagging")
            .with_body(Body::text(region.label()))
            .with_target(Some(Target::Resource(target)));

        collection.items.push(annotation);
    }

    collection
}

/// Build, persist and reference the layout page.
pub fn write_layout(
    page: &Page,
    canvas_id: &str,
    layout: &OutputLayout,
) -> Result<(Reference, usize), ConvertError> {
    let collection = build_layout(page, canvas_id);
    let reference = write_annotation_page(&collection, Category::Layout, layout)?;
    Ok((reference, collection.items.len()))
}

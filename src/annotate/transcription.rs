//! Line transcriptions.

use super::{write_annotation_page, Category, LineTargets, OutputLayout};
use crate::error::ConvertError;
use crate::iiif::annotation::{
    Annotation, AnnotationPage, Body, Reference, Target, ANNOTATION_CONTEXT,
    TEXT_GRANULARITY_CONTEXT,
};
use crate::iiif::selector::{canvas_fragment_target, xywh_fragment};
use crate::page::Page;

/// Build the transcription page for `page` and record each line's target.
pub fn build_transcriptions(
    page: &Page,
    canvas_id: &str,
    line_targets: &mut LineTargets,
) -> AnnotationPage {
    let mut collection = AnnotationPage::new(Category::Transcriptions.page_id(canvas_id));

    for region in &page.regions {
        for line in &region.lines {
            let fragment = xywh_fragment(line.bounding_box(), page.width, page.height);
            let target = canvas_fragment_target(canvas_id, &fragment);

            let annotation = Annotation::new(&[ANNOTATION_CONTEXT, TEXT_GRANULARITY_CONTEXT])
                .with_id(format!("{}/{}", collection.id, line.id))
                .with_granularity("line")
                .with_motivation("supplementing")
                .with_body(Body::text(line.text_or_empty()))
                .with_target(Some(Target::Iri(target.clone())));

            line_targets.record(canvas_id, &line.id, target);
            collection.items.push(annotation);
        }
    }

    collection
}

/// Build, persist and reference the transcription page.
pub fn write_transcriptions(
    page: &Page,
    canvas_id: &str,
    line_targets: &mut LineTargets,
    layout: &OutputLayout,
) -> Result<(Reference, usize), ConvertError> {
    let collection = build_transcriptions(page, canvas_id, line_targets);
    let reference = write_annotation_page(&collection, Category::Transcriptions, layout)?;
    Ok((reference, collection.items.len()))
}

//! Entity annotations from custom tags, linked to Wikidata where tagged.

use super::{write_annotation_page, Category, LineTargets, OutputLayout};
use crate::error::ConvertError;
use crate::iiif::annotation::{
    Annotation, AnnotationPage, Body, LinkedResource, Reference, Target, ANNOTATION_CONTEXT,
};
use crate::page::{Page, TaggedSpan};
use crate::resolve::{wikidata_uri, EntityInfo, EntityLookup, EntityResolver};

/// Counters for one entity pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntityPassStats {
    pub annotations: usize,
    /// Linked entities that fell back to the placeholder.
    pub unresolved: usize,
    /// Annotations without a line target.
    pub untargeted: usize,
}

/// Build the entity page for `page`.
///
/// Targets come from `line_targets`, so the transcription pass for the same
/// canvas must already have run.
pub fn build_entities<L: EntityLookup>(
    page: &Page,
    canvas_id: &str,
    line_targets: &LineTargets,
    resolver: &mut EntityResolver<L>,
) -> (AnnotationPage, EntityPassStats) {
    let mut collection = AnnotationPage::new(Category::Entities.page_id(canvas_id));
    let mut stats = EntityPassStats::default();

    for span in page.tagged_spans() {
        let target = line_targets
            .get(canvas_id, &span.line_id)
            .map(|target| Target::Iri(target.to_string()));
        if target.is_none() {
            stats.untargeted += 1;
        }

        let mut summary = format!("<b>{}</b>: {}", title_case(&span.kind), span.value);
        let mut annotation = Annotation::new(&[ANNOTATION_CONTEXT]).with_target(target);

        if let Some(item_id) = span.wikidata.as_deref().filter(|id| !id.is_empty()) {
            let uri = wikidata_uri(item_id);
            let info = resolve_or_placeholder(resolver, &uri, &span, &mut stats);

            // A missing description renders as empty text.
            summary.push_str(&entity_summary(&uri, &info));
            annotation.body.push(classifying_body(summary));
            annotation.body.push(Body::SpecificResource {
                source: LinkedResource {
                    id: uri,
                    label: info.label,
                    comments: info.description,
                },
                purpose: "identifying".to_string(),
            });
        } else {
            annotation.body.push(classifying_body(summary));
        }

        collection.items.push(annotation);
        stats.annotations += 1;
    }

    (collection, stats)
}

/// Build, persist and reference the entity page.
pub fn write_entities<L: EntityLookup>(
    page: &Page,
    canvas_id: &str,
    line_targets: &LineTargets,
    resolver: &mut EntityResolver<L>,
    layout: &OutputLayout,
) -> Result<(Reference, EntityPassStats), ConvertError> {
    let (collection, stats) = build_entities(page, canvas_id, line_targets, resolver);
    let reference = write_annotation_page(&collection, Category::Entities, layout)?;
    Ok((reference, stats))
}

fn resolve_or_placeholder<L: EntityLookup>(
    resolver: &mut EntityResolver<L>,
    uri: &str,
    span: &TaggedSpan,
    stats: &mut EntityPassStats,
) -> EntityInfo {
    match resolver.resolve(uri) {
        Ok(info) => info,
        Err(err) => {
            log::warn!(
                "could not resolve '{}' on line {}: {}",
                span.value,
                span.line_id,
                err
            );
            stats.unresolved += 1;
            EntityInfo::unknown()
        }
    }
}

fn classifying_body(value: String) -> Body {
    Body::TextualBody {
        value,
        purpose: Some("classifying".to_string()),
        format: Some("text/html".to_string()),
    }
}

fn entity_summary(uri: &str, info: &EntityInfo) -> String {
    format!(
        "<br><br><b>Name</b>: {}<br><b>Description</b>: {}<br><b>URI</b>: <a href='{uri}'>{uri}</a>",
        info.label,
        info.description.as_deref().unwrap_or("")
    )
}

/// Capitalize the first letter of every alphabetic run, lowercase the rest.
///
/// `place` becomes `Place`, `atm_food` becomes `Atm_Food`.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;

    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::transcription::build_transcriptions;
    use crate::page::{CustomTag, Point, TextLine, TextRegion};
    use crate::resolve::LookupError;
    use std::cell::Cell;

    const CANVAS: &str = "https://example.org/d1/0001";

    struct Fixed {
        answer: Option<EntityInfo>,
        calls: Cell<usize>,
    }

    impl Fixed {
        fn resolving(info: EntityInfo) -> Self {
            Self {
                answer: Some(info),
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                answer: None,
                calls: Cell::new(0),
            }
        }
    }

    impl EntityLookup for Fixed {
        fn lookup(&self, uri: &str) -> Result<EntityInfo, LookupError> {
            self.calls.set(self.calls.get() + 1);
            self.answer.clone().ok_or_else(|| LookupError::Http {
                uri: uri.to_string(),
                message: "service unavailable".to_string(),
            })
        }
    }

    fn page(wikidata: Option<&str>) -> Page {
        Page {
            image_filename: "0001.jpg".into(),
            width: 1000,
            height: 1000,
            regions: vec![TextRegion {
                id: "r1".into(),
                types: vec!["paragraph".into()],
                coords: vec![],
                lines: vec![TextLine {
                    id: "l1".into(),
                    text: Some("Jan loopt naar Amsterdam".into()),
                    coords: vec![Point::new(10.0, 10.0), Point::new(400.0, 40.0)],
                    tags: vec![
                        CustomTag {
                            kind: "person".into(),
                            offset: 0,
                            length: 3,
                            ..Default::default()
                        },
                        CustomTag {
                            kind: "place".into(),
                            offset: 15,
                            length: 9,
                            wikidata: wikidata.map(str::to_string),
                            ..Default::default()
                        },
                    ],
                }],
            }],
        }
    }

    fn amsterdam() -> EntityInfo {
        EntityInfo::new("Amsterdam", Some("capital of the Netherlands".into()))
    }

    #[test]
    fn title_case_matches_word_starts() {
        assert_eq!(title_case("place"), "Place");
        assert_eq!(title_case("atm_food"), "Atm_Food");
        assert_eq!(title_case("ORGANIZATION"), "Organization");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn plain_tags_get_one_classifying_body() {
        let mut targets = LineTargets::new();
        build_transcriptions(&page(None), CANVAS, &mut targets);
        let mut resolver = EntityResolver::new(Fixed::failing());

        let (collection, stats) = build_entities(&page(None), CANVAS, &targets, &mut resolver);

        assert_eq!(collection.id, format!("{CANVAS}_entities.json"));
        assert_eq!(stats, EntityPassStats { annotations: 2, unresolved: 0, untargeted: 0 });
        assert_eq!(collection.items[0].body[0].value(), Some("<b>Person</b>: Jan"));
        assert_eq!(collection.items[1].body[0].value(), Some("<b>Place</b>: Amsterdam"));
        assert_eq!(collection.items[1].body.len(), 1);
        assert!(collection.items[1].id.is_none());
        assert_eq!(
            collection.items[1].target.as_ref().and_then(Target::as_iri),
            targets.get(CANVAS, "l1")
        );
        assert_eq!(resolver.lookup().calls.get(), 0);
    }

    #[test]
    fn linked_tag_gets_identifying_body() {
        let mut targets = LineTargets::new();
        build_transcriptions(&page(Some("Q727")), CANVAS, &mut targets);
        let mut resolver = EntityResolver::new(Fixed::resolving(amsterdam()));

        let (collection, stats) = build_entities(&page(Some("Q727")), CANVAS, &targets, &mut resolver);
        assert_eq!(stats.unresolved, 0);

        let place = &collection.items[1];
        assert_eq!(place.body.len(), 2);
        assert_eq!(
            place.body[1],
            Body::SpecificResource {
                source: LinkedResource {
                    id: "http://www.wikidata.org/entity/Q727".into(),
                    label: "Amsterdam".into(),
                    comments: Some("capital of the Netherlands".into()),
                },
                purpose: "identifying".into(),
            }
        );
        let html = place.body[0].value().expect("textual body");
        assert!(html.starts_with("<b>Place</b>: Amsterdam<br><br>"));
        assert!(html.ends_with(
            "<b>Name</b>: Amsterdam<br><b>Description</b>: capital of the Netherlands<br><b>URI</b>: <a href='http://www.wikidata.org/entity/Q727'>http://www.wikidata.org/entity/Q727</a>"
        ));
    }

    #[test]
    fn missing_description_leaves_summary_blank() {
        let mut targets = LineTargets::new();
        build_transcriptions(&page(Some("Q727")), CANVAS, &mut targets);
        let info = EntityInfo::new("Amsterdam", None);
        let mut resolver = EntityResolver::new(Fixed::resolving(info));

        let (collection, _) = build_entities(&page(Some("Q727")), CANVAS, &targets, &mut resolver);

        let place = &collection.items[1];
        let html = place.body[0].value().expect("textual body");
        assert!(html.contains("<b>Description</b>: <br><b>URI</b>"));
        assert!(!html.contains("None"));
        let json = serde_json::to_value(&place.body[1]).expect("serialize");
        assert_eq!(json["source"]["comments"], serde_json::Value::Null);
    }

    #[test]
    fn failed_lookup_uses_placeholder() {
        let mut targets = LineTargets::new();
        build_transcriptions(&page(Some("Q727")), CANVAS, &mut targets);
        let mut resolver = EntityResolver::new(Fixed::failing());

        let (collection, stats) = build_entities(&page(Some("Q727")), CANVAS, &targets, &mut resolver);

        assert_eq!(stats.unresolved, 1);
        match &collection.items[1].body[1] {
            Body::SpecificResource { source, .. } => {
                assert_eq!(source.label, "Unknown");
                assert_eq!(source.comments.as_deref(), Some("Unknown"));
            }
            other => panic!("unexpected body: {other:?}"),
        }
        assert_eq!(resolver.cached(), 0);
    }

    #[test]
    fn entities_before_transcriptions_have_no_target() {
        let targets = LineTargets::new();
        let mut resolver = EntityResolver::new(Fixed::failing());

        let (collection, stats) = build_entities(&page(None), CANVAS, &targets, &mut resolver);

        assert_eq!(stats.untargeted, 2);
        assert!(collection.items.iter().all(|item| item.target.is_none()));
        let json = serde_json::to_value(&collection).expect("serialize");
        assert_eq!(json["items"][0]["target"], serde_json::Value::Null);
    }
}

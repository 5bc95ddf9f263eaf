//! W3C Web Annotation types used for the per-page annotation collections.

use serde::{Deserialize, Serialize};

use super::LanguageMap;

pub const ANNOTATION_CONTEXT: &str = "http://www.w3.org/ns/anno.jsonld";
pub const TEXT_GRANULARITY_CONTEXT: &str =
    "http://iiif.io/api/extension/text-granularity/context.json";
pub const SVG_CONFORMS_TO: &str = "http://www.w3.org/TR/SVG/";

/// An ordered collection of annotations, persisted as one JSON document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPage {
    #[serde(rename = "@context")]
    pub context: String,

    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub items: Vec<Annotation>,
}

impl AnnotationPage {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            context: ANNOTATION_CONTEXT.to_string(),
            id: id.into(),
            kind: "AnnotationPage".to_string(),
            items: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(
        rename = "textGranularity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub text_granularity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,

    pub body: Vec<Body>,

    /// Serialized as `null` when absent, which viewers show as unanchored.
    pub target: Option<Target>,
}

impl Annotation {
    /// An empty annotation with the given JSON-LD contexts.
    pub fn new(context: &[&str]) -> Self {
        Self {
            context: context.iter().map(|c| c.to_string()).collect(),
            id: None,
            kind: "Annotation".to_string(),
            text_granularity: None,
            motivation: None,
            body: Vec::new(),
            target: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_granularity(mut self, granularity: &str) -> Self {
        self.text_granularity = Some(granularity.to_string());
        self
    }

    pub fn with_motivation(mut self, motivation: &str) -> Self {
        self.motivation = Some(motivation.to_string());
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body.push(body);
        self
    }

    pub fn with_target(mut self, target: Option<Target>) -> Self {
        self.target = target;
        self
    }
}

/// Annotation body, discriminated by its `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Body {
    TextualBody {
        value: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        purpose: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    SpecificResource {
        source: LinkedResource,
        purpose: String,
    },
}

impl Body {
    /// Plain textual body without purpose or format.
    pub fn text(value: impl Into<String>) -> Self {
        Body::TextualBody {
            value: value.into(),
            purpose: None,
            format: None,
        }
    }

    /// Text value of a textual body.
    pub fn value(&self) -> Option<&str> {
        match self {
            Body::TextualBody { value, .. } => Some(value),
            Body::SpecificResource { .. } => None,
        }
    }
}

/// External resource an identifying body points at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkedResource {
    pub id: String,
    pub label: String,
    pub comments: Option<String>,
}

/// Annotation target: a bare IRI (with fragment) or a selector on a source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Iri(String),
    Resource(SpecificTarget),
}

impl Target {
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Target::Iri(iri) => Some(iri),
            Target::Resource(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecificTarget {
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub selector: Vec<Selector>,
}

impl SpecificTarget {
    pub fn new(source: impl Into<String>, selector: Selector) -> Self {
        Self {
            kind: "SpecificResource".to_string(),
            source: source.into(),
            selector: vec![selector],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Selector {
    SvgSelector {
        value: String,
        #[serde(rename = "conformsTo")]
        conforms_to: String,
    },
}

impl Selector {
    pub fn svg(value: impl Into<String>) -> Self {
        Selector::SvgSelector {
            value: value.into(),
            conforms_to: SVG_CONFORMS_TO.to_string(),
        }
    }
}

/// Lightweight pointer from a manifest canvas to an annotation collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub label: LanguageMap,
}

impl Reference {
    pub fn annotation_page(id: impl Into<String>, label: LanguageMap) -> Self {
        Self {
            id: id.into(),
            kind: "AnnotationPage".to_string(),
            label,
        }
    }
}

//! IIIF Presentation 3 manifest and the assembler that builds one per diary.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::annotation::Reference;
use super::image_info::{ImageInfo, ImageInfoSource, ImageService};
use super::{file_stem, join_url, language_map, LanguageMap};
use crate::error::ConvertError;

pub const PRESENTATION_CONTEXT: &str = "http://iiif.io/api/presentation/3/context.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "@context")]
    pub context: String,

    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub label: LanguageMap,

    pub items: Vec<Canvas>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub label: LanguageMap,

    pub height: u32,

    pub width: u32,

    pub items: Vec<PaintingPage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Reference>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaintingPage {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub items: Vec<PaintingAnnotation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaintingAnnotation {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub motivation: String,

    pub body: ImageBody,

    pub target: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageBody {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub format: String,

    pub height: u32,

    pub width: u32,

    pub service: Vec<ImageService>,
}

impl Manifest {
    pub fn new(id: impl Into<String>, label: LanguageMap) -> Self {
        Self {
            context: PRESENTATION_CONTEXT.to_string(),
            id: id.into(),
            kind: "Manifest".to_string(),
            label,
            items: Vec::new(),
        }
    }

    /// Append `references` to the annotations of the canvas `canvas_id`.
    ///
    /// Only the first canvas with that id is touched. Returns `false`, leaving
    /// the manifest unchanged, when no canvas matches.
    pub fn attach(
        &mut self,
        canvas_id: &str,
        references: impl IntoIterator<Item = Reference>,
    ) -> bool {
        let Some(canvas) = self.items.iter_mut().find(|canvas| canvas.id == canvas_id) else {
            return false;
        };

        canvas
            .annotations
            .get_or_insert_with(Vec::new)
            .extend(references);
        true
    }

    pub fn canvas(&self, canvas_id: &str) -> Option<&Canvas> {
        self.items.iter().find(|canvas| canvas.id == canvas_id)
    }
}

impl Canvas {
    /// Canvas showing one image, with a single painting annotation.
    pub fn from_image(id: impl Into<String>, label: LanguageMap, image: &ImageInfo) -> Self {
        let id = id.into();
        let page_id = format!("{id}/p0/page");
        let annotation_id = format!("{page_id}/anno");

        Self {
            label,
            height: image.height,
            width: image.width,
            items: vec![PaintingPage {
                id: page_id,
                kind: "AnnotationPage".to_string(),
                items: vec![PaintingAnnotation {
                    id: annotation_id,
                    kind: "Annotation".to_string(),
                    motivation: "painting".to_string(),
                    body: ImageBody {
                        id: image.full_image_url(),
                        kind: "Image".to_string(),
                        format: "image/jpeg".to_string(),
                        height: image.height,
                        width: image.width,
                        service: vec![image.service()],
                    },
                    target: id.clone(),
                }],
            }],
            annotations: None,
            kind: "Canvas".to_string(),
            id,
        }
    }
}

/// Identifier of a diary's manifest.
pub fn manifest_id(public_prefix: &str, diary_id: &str) -> String {
    join_url(public_prefix, &format!("{diary_id}/manifest.json"))
}

/// Identifier of the canvas showing the image named `name`.
///
/// `name` may be an image file name or an Image API `info.json` URL; both
/// yield the same canvas.
pub fn canvas_id(public_prefix: &str, diary_id: &str, name: &str) -> String {
    join_url(public_prefix, &format!("{diary_id}/{}", file_stem(name)))
}

/// Build the manifest skeleton for a diary, one canvas per image.
pub fn build_manifest(
    public_prefix: &str,
    diary_id: &str,
    image_urls: &[String],
    language: &str,
    images: &dyn ImageInfoSource,
) -> Result<Manifest, ConvertError> {
    let mut manifest = Manifest::new(
        manifest_id(public_prefix, diary_id),
        language_map(language, ""),
    );

    for url in image_urls {
        let info = images.image_info(url)?;
        let canvas = Canvas::from_image(
            canvas_id(public_prefix, diary_id, url),
            language_map(language, file_stem(url)),
            &info,
        );
        manifest.items.push(canvas);
    }

    Ok(manifest)
}

/// Write a manifest as indented JSON.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), ConvertError> {
    let file = File::create(path).map_err(ConvertError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, manifest).map_err(|source| ConvertError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })
}

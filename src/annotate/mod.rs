//! Per-page annotation collections.
//!
//! Each page gets three annotation pages, built by the sibling modules:
//!
//! - [`transcription`]: one line-level annotation per text line
//! - [`layout`]: one block-level tag per text region
//! - [`entities`]: one classifying annotation per entity tag
//!
//! The transcription pass records every line's target in [`LineTargets`];
//! the entity pass reuses those targets, so for any page the transcription
//! pass has to run first. Entities on lines without a recorded target get a
//! `null` target.

pub mod entities;
pub mod layout;
pub mod transcription;

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::iiif::annotation::{AnnotationPage, Reference};
use crate::iiif::language_map;

/// The three annotation collections produced per page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Layout,
    Transcriptions,
    Entities,
}

impl Category {
    /// Suffix appended to the canvas id to form the collection id.
    pub fn suffix(&self) -> &'static str {
        match self {
            Category::Layout => "_layout.json",
            Category::Transcriptions => "_transcriptions.json",
            Category::Entities => "_entities.json",
        }
    }

    /// Label shown for the collection in viewers.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Layout => "Layout annotations",
            Category::Transcriptions => "Transcriptions",
            Category::Entities => "Entity annotations",
        }
    }

    /// Identifier of this collection for the given canvas.
    pub fn page_id(&self, canvas_id: &str) -> String {
        format!("{canvas_id}{}", self.suffix())
    }
}

/// Targets of transcribed lines, keyed by canvas and line id.
#[derive(Clone, Debug, Default)]
pub struct LineTargets {
    targets: HashMap<(String, String), String>,
}

impl LineTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, canvas_id: &str, line_id: &str, target: impl Into<String>) {
        self.targets
            .insert((canvas_id.to_string(), line_id.to_string()), target.into());
    }

    pub fn get(&self, canvas_id: &str, line_id: &str) -> Option<&str> {
        self.targets
            .get(&(canvas_id.to_string(), line_id.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Maps published identifiers onto the local output tree.
#[derive(Clone, Debug)]
pub struct OutputLayout {
    /// URL prefix under which the output is published.
    pub public_prefix: String,

    /// Local directory corresponding to `public_prefix`.
    pub output_dir: PathBuf,

    /// Language used for labels.
    pub language: String,
}

impl OutputLayout {
    /// Local file for a published identifier.
    pub fn local_path(&self, id: &str) -> Result<PathBuf, ConvertError> {
        let relative = id
            .strip_prefix(self.public_prefix.as_str())
            .ok_or_else(|| ConvertError::OutsidePrefix {
                id: id.to_string(),
                prefix: self.public_prefix.clone(),
            })?;

        Ok(self.output_dir.join(relative.trim_start_matches('/')))
    }
}

/// Persist an annotation page and return the reference a canvas points at.
pub fn write_annotation_page(
    page: &AnnotationPage,
    category: Category,
    layout: &OutputLayout,
) -> Result<Reference, ConvertError> {
    let path = layout.local_path(&page.id)?;
    write_json(&path, page)?;

    Ok(Reference::annotation_page(
        page.id.clone(),
        language_map(&layout.language, category.label()),
    ))
}

fn write_json(path: &Path, page: &AnnotationPage) -> Result<(), ConvertError> {
    let file = File::create(path).map_err(ConvertError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, page).map_err(|source| ConvertError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })
}

//! Batch conversion of diaries.
//!
//! A diary index lists each diary's id and its page images. For every diary
//! the runner builds a manifest skeleton, converts each PAGE XML file in the
//! diary's data directory into three annotation pages, attaches them to the
//! matching canvas, and writes the manifest.

pub mod report;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

pub use report::{BatchSummary, DiarySummary};

use crate::annotate::entities::write_entities;
use crate::annotate::layout::write_layout;
use crate::annotate::transcription::write_transcriptions;
use crate::annotate::{LineTargets, OutputLayout};
use crate::error::ConvertError;
use crate::iiif::image_info::ImageInfoSource;
use crate::iiif::manifest::{build_manifest, canvas_id, write_manifest};
use crate::page::io_page_xml::{read_page_xml, PageXmlOptions};
use crate::resolve::{EntityLookup, EntityResolver};

pub const DEFAULT_DIARIES_FILE: &str = "data/diaries.json";
pub const DEFAULT_DATA_DIR: &str = "data/diaries";
pub const DEFAULT_OUTPUT_DIR: &str = "manifests/diaries";
pub const DEFAULT_PUBLIC_PREFIX: &str =
    "https://amsterdamtimemachine.github.io/datasprint-annoteren-2024/manifests/diaries/";
pub const DEFAULT_LANGUAGE: &str = "nl";
pub const DEFAULT_USER_AGENT: &str = concat!(
    "transkribus-iiif/",
    env!("CARGO_PKG_VERSION"),
    " (https://amsterdamtimemachine.github.io/)"
);

const PAGE_XML_EXTENSION: &str = "xml";

/// One entry of the diary index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diary {
    pub id: String,

    /// Image API `info.json` URLs, in page order.
    pub images: Vec<String>,
}

/// Read the diary index, a JSON array of diaries.
pub fn read_diary_index(path: &Path) -> Result<Vec<Diary>, ConvertError> {
    let file = File::open(path).map_err(ConvertError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| ConvertError::DiaryIndexParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Where to read from and write to.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    pub diaries_file: PathBuf,

    /// Directory holding one subdirectory of PAGE XML files per diary.
    pub data_dir: PathBuf,

    pub output: OutputLayout,

    pub page_options: PageXmlOptions,

    /// Fail when a page matches no canvas instead of skipping it.
    pub strict: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            diaries_file: PathBuf::from(DEFAULT_DIARIES_FILE),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output: OutputLayout {
                public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
                output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
                language: DEFAULT_LANGUAGE.to_string(),
            },
            page_options: PageXmlOptions::default(),
            strict: false,
        }
    }
}

/// Owns the state of one run: the entity memo and the line targets.
pub struct BatchRunner<'a, L> {
    config: &'a BatchConfig,
    images: &'a dyn ImageInfoSource,
    resolver: EntityResolver<L>,
    line_targets: LineTargets,
}

impl<'a, L: EntityLookup> BatchRunner<'a, L> {
    pub fn new(config: &'a BatchConfig, images: &'a dyn ImageInfoSource, lookup: L) -> Self {
        Self {
            config,
            images,
            resolver: EntityResolver::new(lookup),
            line_targets: LineTargets::new(),
        }
    }

    /// Convert every diary in the index.
    pub fn run(&mut self) -> Result<BatchSummary, ConvertError> {
        let diaries = read_diary_index(&self.config.diaries_file)?;
        log::info!(
            "read {} diaries from {}",
            diaries.len(),
            self.config.diaries_file.display()
        );

        let mut summary = BatchSummary::default();
        for diary in &diaries {
            summary.diaries.push(self.convert_diary(diary)?);
        }

        Ok(summary)
    }

    /// Convert one diary and write its manifest.
    pub fn convert_diary(&mut self, diary: &Diary) -> Result<DiarySummary, ConvertError> {
        let output = &self.config.output;
        fs::create_dir_all(output.output_dir.join(&diary.id)).map_err(ConvertError::Io)?;

        let mut manifest = build_manifest(
            &output.public_prefix,
            &diary.id,
            &diary.images,
            &output.language,
            self.images,
        )?;
        log::info!("diary {}: {} canvases", diary.id, manifest.items.len());

        let mut summary = DiarySummary {
            id: diary.id.clone(),
            manifest: manifest.id.clone(),
            canvases: manifest.items.len(),
            ..Default::default()
        };

        for xml_path in list_page_files(&self.config.data_dir.join(&diary.id))? {
            let page = read_page_xml(&xml_path, &self.config.page_options)?;
            let canvas = canvas_id(&output.public_prefix, &diary.id, &page.image_filename);
            log::debug!("{} -> {}", xml_path.display(), canvas);

            let (transcriptions, lines) =
                write_transcriptions(&page, &canvas, &mut self.line_targets, output)?;
            let (layout, regions) = write_layout(&page, &canvas, output)?;
            let (entities, stats) = write_entities(
                &page,
                &canvas,
                &self.line_targets,
                &mut self.resolver,
                output,
            )?;

            summary.pages += 1;
            summary.lines += lines;
            summary.regions += regions;
            summary.entities += stats.annotations;
            summary.unresolved_entities += stats.unresolved;
            summary.untargeted_entities += stats.untargeted;

            if !manifest.attach(&canvas, [transcriptions, layout, entities]) {
                if self.config.strict {
                    return Err(ConvertError::CanvasNotFound {
                        canvas_id: canvas,
                        manifest_id: manifest.id.clone(),
                    });
                }
                log::warn!(
                    "{}: no canvas '{}' in manifest {}; annotations written but not linked",
                    xml_path.display(),
                    canvas,
                    manifest.id
                );
                summary.unmatched_canvases.push(canvas);
            }
        }

        let manifest_path = output.local_path(&manifest.id)?;
        write_manifest(&manifest_path, &manifest)?;
        log::info!("wrote {}", manifest_path.display());

        Ok(summary)
    }

    pub fn resolver(&self) -> &EntityResolver<L> {
        &self.resolver
    }

    pub fn line_targets(&self) -> &LineTargets {
        &self.line_targets
    }
}

/// PAGE XML files directly inside `dir`, sorted by file name.
pub fn list_page_files(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| {
            ConvertError::Io(std::io::Error::other(format!(
                "failed while listing {}: {source}",
                dir.display()
            )))
        })?;

        if entry.file_type().is_file() && has_xml_extension(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(PAGE_XML_EXTENSION))
        .unwrap_or(false)
}

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for conversion runs.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse diary index from {path}: {source}")]
    DiaryIndexParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse PAGE XML from {path}: {message}")]
    PageXmlParse { path: PathBuf, message: String },

    #[error("Failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to load image info from {url}: {message}")]
    ImageInfo { url: String, message: String },

    #[error("Identifier '{id}' does not start with public prefix '{prefix}'")]
    OutsidePrefix { id: String, prefix: String },

    #[error("No canvas '{canvas_id}' in manifest {manifest_id}")]
    CanvasNotFound {
        canvas_id: String,
        manifest_id: String,
    },
}

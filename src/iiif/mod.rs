//! IIIF Presentation 3 and Web Annotation output model.
//!
//! - [`annotation`]: annotation pages, bodies, targets and selectors
//! - [`manifest`]: manifest and canvas types, and the manifest assembler
//! - [`image_info`]: IIIF Image API `info.json` lookup for canvas sizes
//! - [`selector`]: page geometry to selector values

pub mod annotation;
pub mod image_info;
pub mod manifest;
pub mod selector;

use std::collections::BTreeMap;

/// IIIF language map, e.g. `{"nl": ["Transcripties"]}`.
pub type LanguageMap = BTreeMap<String, Vec<String>>;

/// Language map holding a single value.
pub fn language_map(language: &str, value: impl Into<String>) -> LanguageMap {
    BTreeMap::from([(language.to_string(), vec![value.into()])])
}

/// Base file name without extension.
///
/// A `/info.json` suffix is removed first, so an Image API info URL and the
/// image file name it serves map to the same stem.
pub fn file_stem(name: &str) -> String {
    let trimmed = name.replace("/info.json", "");
    let base = trimmed.rsplit('/').next().unwrap_or(trimmed.as_str());
    let stem = match base.rfind('.') {
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    };
    stem.to_string()
}

/// Join a URL prefix and a relative path with exactly one `/` between them.
pub fn join_url(prefix: &str, rest: &str) -> String {
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        rest.trim_start_matches('/')
    )
}

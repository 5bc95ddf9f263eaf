//! IIIF Image API `info.json` lookup.
//!
//! Canvases take their size and image service from the image server, so
//! building a manifest fetches one `info.json` per page image.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ureq::Agent;

use crate::error::ConvertError;

/// Image API version advertised by an `info.json`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageApiVersion {
    V2,
    V3,
}

/// What a canvas needs to know about its image.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageInfo {
    /// Image service base URI (the `info.json` URL without `/info.json`).
    pub service_id: String,
    pub width: u32,
    pub height: u32,
    pub version: ImageApiVersion,
    pub profile: String,
}

impl ImageInfo {
    /// URL of the full-size JPEG rendition.
    pub fn full_image_url(&self) -> String {
        let size = match self.version {
            ImageApiVersion::V2 => "full",
            ImageApiVersion::V3 => "max",
        };
        format!("{}/full/{size}/0/default.jpg", self.service_id)
    }

    pub fn service(&self) -> ImageService {
        match self.version {
            ImageApiVersion::V2 => ImageService::V2 {
                id: self.service_id.clone(),
                kind: "ImageService2".to_string(),
                profile: self.profile.clone(),
            },
            ImageApiVersion::V3 => ImageService::V3 {
                id: self.service_id.clone(),
                kind: "ImageService3".to_string(),
                profile: self.profile.clone(),
            },
        }
    }
}

/// Image service entry of a painting body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageService {
    V3 {
        id: String,
        #[serde(rename = "type")]
        kind: String,
        profile: String,
    },
    V2 {
        #[serde(rename = "@id")]
        id: String,
        #[serde(rename = "@type")]
        kind: String,
        profile: String,
    },
}

/// Source of image information for canvases.
pub trait ImageInfoSource {
    fn image_info(&self, url: &str) -> Result<ImageInfo, ConvertError>;
}

/// Fetches `info.json` documents over HTTP.
pub struct HttpImageInfo {
    agent: Agent,
    user_agent: String,
}

impl HttpImageInfo {
    pub fn new(agent: Agent, user_agent: impl Into<String>) -> Self {
        Self {
            agent,
            user_agent: user_agent.into(),
        }
    }
}

impl ImageInfoSource for HttpImageInfo {
    fn image_info(&self, url: &str) -> Result<ImageInfo, ConvertError> {
        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", "application/ld+json, application/json")
            .call()
            .map_err(|source| ConvertError::ImageInfo {
                url: url.to_string(),
                message: source.to_string(),
            })?;

        let document: Value =
            response
                .body_mut()
                .read_json()
                .map_err(|source| ConvertError::ImageInfo {
                    url: url.to_string(),
                    message: format!("invalid info.json: {source}"),
                })?;

        parse_image_info(url, &document)
    }
}

/// Interpret an `info.json` document fetched from `url`.
pub fn parse_image_info(url: &str, document: &Value) -> Result<ImageInfo, ConvertError> {
    let error = |message: &str| ConvertError::ImageInfo {
        url: url.to_string(),
        message: message.to_string(),
    };

    let service_id = document
        .get("id")
        .or_else(|| document.get("@id"))
        .and_then(Value::as_str)
        .map(|id| id.trim_end_matches('/').to_string())
        .unwrap_or_else(|| url.trim_end_matches("/info.json").to_string());

    let width = dimension(document, "width").ok_or_else(|| error("missing or invalid width"))?;
    let height = dimension(document, "height").ok_or_else(|| error("missing or invalid height"))?;

    let version = if context_mentions(document, "/image/3/") {
        ImageApiVersion::V3
    } else {
        ImageApiVersion::V2
    };

    let profile = match document.get("profile") {
        Some(Value::String(profile)) => profile.clone(),
        Some(Value::Array(entries)) => entries
            .iter()
            .find_map(Value::as_str)
            .unwrap_or("level0")
            .to_string(),
        _ => "level0".to_string(),
    };
    let profile = profile
        .rsplit('/')
        .next()
        .unwrap_or("level0")
        .trim_end_matches(".json")
        .to_string();

    Ok(ImageInfo {
        service_id,
        width,
        height,
        version,
        profile,
    })
}

fn dimension(document: &Value, key: &str) -> Option<u32> {
    document
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|value| u32::try_from(value).ok())
}

fn context_mentions(document: &Value, needle: &str) -> bool {
    match document.get("@context") {
        Some(Value::String(context)) => context.contains(needle),
        Some(Value::Array(contexts)) => contexts
            .iter()
            .filter_map(Value::as_str)
            .any(|context| context.contains(needle)),
        _ => false,
    }
}

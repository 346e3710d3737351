use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// The backend's answer to a crop-photo diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosisResponse {
    /// The diagnosis text.
    pub diagnosis: String,

    /// Language the diagnosis was produced in.
    pub language: String,

    /// Agents that contributed to the diagnosis.
    #[serde(default)]
    pub agents_used: Vec<String>,
}

/// A crop photo to submit for diagnosis.
///
/// Holds the raw bytes plus enough metadata to build both the multipart
/// upload and a `data:` URL for transcript display.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisImage {
    /// The raw image bytes.
    pub data: Vec<u8>,

    /// The media type of the image (jpeg, png, gif, or webp).
    pub media_type: ImageMediaType,

    /// File name sent with the multipart upload.
    pub filename: String,
}

/// Supported image media types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageMediaType {
    #[serde(rename = "image/jpeg")]
    Jpeg,

    #[serde(rename = "image/png")]
    Png,

    #[serde(rename = "image/gif")]
    Gif,

    #[serde(rename = "image/webp")]
    Webp,
}

impl ImageMediaType {
    /// The MIME string for this media type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMediaType::Jpeg => "image/jpeg",
            ImageMediaType::Png => "image/png",
            ImageMediaType::Gif => "image/gif",
            ImageMediaType::Webp => "image/webp",
        }
    }
}

impl DiagnosisImage {
    /// Create a new `DiagnosisImage` from raw bytes.
    pub fn new(data: Vec<u8>, media_type: ImageMediaType) -> Self {
        Self {
            data,
            media_type,
            filename: "image".to_string(),
        }
    }

    /// Create a `DiagnosisImage` from a file path.
    ///
    /// The media type is determined from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let media_type = match path.extension().and_then(|ext| ext.to_str()) {
            Some("jpg") | Some("jpeg") => ImageMediaType::Jpeg,
            Some("png") => ImageMediaType::Png,
            Some("gif") => ImageMediaType::Gif,
            Some("webp") => ImageMediaType::Webp,
            _ => {
                return Err(Error::validation(
                    "unsupported file extension, must be jpeg, png, gif, or webp",
                    Some("path".to_string()),
                ));
            }
        };

        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();

        Ok(Self {
            data,
            media_type,
            filename,
        })
    }

    /// Render this image as a `data:` URL for transcript display.
    pub fn data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.data);
        format!("data:{};base64,{}", self.media_type.as_str(), encoded)
    }
}

use base64::{Engine as _, engine::general_purpose::STANDARD};

use super::{CanvasExport, ExportPayload};
use crate::error::ExportError;

/// Name offered for the downloaded drawing
pub const DOWNLOAD_FILE_NAME: &str = "drawing.png";
pub const PNG_MIME: &str = "image/png";

const DATA_URL_PREFIX: &str = "data:image/png;base64,";
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Encode PNG bytes as a `data:` URL
pub fn encode_data_url(png: &[u8]) -> String {
    format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(png))
}

/// Extract the PNG bytes from a `data:image/png;base64,...` URL
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, ExportError> {
    let payload = url
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or_else(|| ExportError::InvalidDataUrl("expected a base64 PNG data URL".to_owned()))?;

    STANDARD
        .decode(payload.trim())
        .map_err(|err| ExportError::InvalidDataUrl(err.to_string()))
}

/// PNG produced by a canvas export
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingOutput {
    pub png: Vec<u8>,
    pub stroke_count: usize,
}

impl DrawingOutput {
    /// Normalize whatever the canvas returned into PNG bytes.
    ///
    /// `Ok(None)` means the canvas had nothing to offer, which is not an error.
    pub fn from_export(export: CanvasExport) -> Result<Option<Self>, ExportError> {
        let png = match export.payload {
            None => return Ok(None),
            Some(ExportPayload::Png(bytes)) => bytes,
            Some(ExportPayload::DataUrl(url)) => decode_data_url(&url)?,
        };

        if png.is_empty() {
            return Ok(None);
        }
        if !png.starts_with(&PNG_SIGNATURE) {
            return Err(ExportError::Encode("canvas output is not a PNG".to_owned()));
        }

        Ok(Some(Self {
            png,
            stroke_count: export.stroke_count,
        }))
    }
}

/// A file the page offers for download
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDownload {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    pub stroke_count: usize,
}

impl From<DrawingOutput> for PendingDownload {
    fn from(output: DrawingOutput) -> Self {
        Self {
            file_name: DOWNLOAD_FILE_NAME,
            mime: PNG_MIME,
            bytes: output.png,
            stroke_count: output.stroke_count,
        }
    }
}

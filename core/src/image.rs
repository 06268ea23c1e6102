//! Local image file → embeddable data URL.

use crate::error::{LoveError, LoveResult};
use base64::Engine;
use std::path::Path;

/// MIME type for an image path, by extension.
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png"          => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "svg"          => "image/svg+xml",
        "bmp"          => "image/bmp",
        _ => return None,
    };
    Some(mime)
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Read an image from disk and embed it as `data:<mime>;base64,…`.
pub fn data_url_from_file(path: &Path) -> LoveResult<String> {
    let mime = mime_for(path).ok_or_else(|| LoveError::UnsupportedImage {
        path: path.display().to_string(),
    })?;
    let bytes = std::fs::read(path)?;
    log::debug!("embedded {} ({} bytes) as {mime}", path.display(), bytes.len());
    Ok(data_url(mime, &bytes))
}

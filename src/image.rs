//! Image ingress for uploaded photos.
//!
//! Browsers send either a bare base64 string or a data URL
//! (`data:<mime>;base64,<payload>`). The decoded bytes must parse as an image.
//! PNG, JPEG and WebP are forwarded untouched; any other readable format is
//! re-encoded as PNG, since the remote service only takes a few formats inline.

use crate::error::{PetlensError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use tracing::debug;

/// A decoded image ready to be sent as an inline part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBytes {
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

impl ImageBytes {
    /// Base64 form of the raw bytes, as the remote API expects for inline data.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

/// Decode a base64 payload, dropping a data-URL prefix if present.
///
/// Everything up to and including the first comma is discarded. Embedded
/// whitespace (line-wrapped base64) is ignored.
pub fn decode_payload(input: &str) -> Result<Vec<u8>> {
    let payload = match input.split_once(',') {
        Some((_, rest)) => rest,
        None => input,
    };

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| PetlensError::Decode(format!("invalid base64 payload: {}", e)))
}

/// Decode an uploaded image, checking that the bytes really are an image.
pub fn decode_image(input: &str) -> Result<ImageBytes> {
    let data = decode_payload(input)?;

    let format = ImageReader::new(Cursor::new(&data))
        .with_guessed_format()
        .map_err(|e| PetlensError::Decode(e.to_string()))?
        .format()
        .ok_or_else(|| {
            PetlensError::Decode(format!("unrecognised image format ({} bytes)", data.len()))
        })?;

    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP => {
            let image = load(&data, format)?;
            debug!(?format, width = image.width(), height = image.height(), "Image accepted");
            Ok(ImageBytes {
                mime_type: format.to_mime_type(),
                data,
            })
        }
        other => transcode_to_png(&data, other),
    }
}

fn load(data: &[u8], format: ImageFormat) -> Result<image::DynamicImage> {
    image::load_from_memory_with_format(data, format)
        .map_err(|e| PetlensError::Decode(format!("unreadable {:?} image: {}", format, e)))
}

fn transcode_to_png(data: &[u8], format: ImageFormat) -> Result<ImageBytes> {
    let image = load(data, format)?;

    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| PetlensError::Decode(format!("PNG re-encode failed: {}", e)))?;

    debug!(?format, width = image.width(), height = image.height(), "Re-encoded as PNG");
    Ok(ImageBytes {
        mime_type: ImageFormat::Png.to_mime_type(),
        data: png.into_inner(),
    })
}

/// Encode a small solid image in the given format.
#[cfg(test)]
pub(crate) fn encoded_fixture(format: ImageFormat) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 120, 40]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image).write_to(&mut out, format).unwrap();
    out.into_inner()
}

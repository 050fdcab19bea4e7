// src/services/image_processor.rs
use image::{GenericImageView, ImageFormat as ImgFormat};

use crate::errors::InmueblarError;
use crate::models::EncodedImage;

// Upload limit the front-end advertises ("Admite JPG y PNG hasta 10MB").
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const MAX_DIMENSION: u32 = 2048;

pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Validates an uploaded payload and downscales oversized photos before
    /// they are kept in state and shipped to the AI service. Untouched
    /// uploads keep their declared MIME type; resized ones are re-encoded as
    /// JPEG.
    pub fn prepare_upload(
        &self,
        data: &[u8],
        declared_mime: &str,
    ) -> Result<EncodedImage, InmueblarError> {
        if data.is_empty() {
            return Err(InmueblarError::Validation("empty upload".to_string()));
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(InmueblarError::Validation(
                "image exceeds the 10MB limit".to_string(),
            ));
        }

        let img = image::load_from_memory(data)
            .map_err(|e| InmueblarError::Image(format!("invalid image format: {e}")))?;

        let (width, height) = img.dimensions();
        if width <= MAX_DIMENSION && height <= MAX_DIMENSION {
            return Ok(EncodedImage::new(declared_mime, data.to_vec()));
        }

        let ratio = MAX_DIMENSION as f32 / width.max(height) as f32;
        let new_width = ((width as f32 * ratio) as u32).max(1);
        let new_height = ((height as f32 * ratio) as u32).max(1);

        let resized = img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3);

        let mut output = Vec::new();
        resized
            .write_to(&mut std::io::Cursor::new(&mut output), ImgFormat::Jpeg)
            .map_err(|e| {
                InmueblarError::Image(format!("failed to encode resized image: {e}"))
            })?;

        Ok(EncodedImage::new("image/jpeg", output))
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}

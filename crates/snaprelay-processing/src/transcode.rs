use bytes::Bytes;
use image::ImageReader;
use std::io::Cursor;
use thiserror::Error;

/// Policy default: shrinks payload size while keeping the image viable for
/// remote processing.
pub const DEFAULT_JPEG_QUALITY: u8 = 70;

/// Transcode operation errors
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("failed to decode source image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to encode jpeg: {0}")]
    Encode(#[from] std::io::Error),

    #[error("invalid quality {0}, expected 0-100")]
    InvalidQuality(u8),
}

/// Lossy re-encoder for captured frames.
///
/// Deterministic: identical input bytes and quality produce identical
/// output bytes. The output stays a decodable raster image in the same
/// color space family as the input.
pub trait ImageTranscoder: Send + Sync {
    fn transcode(&self, data: &[u8], quality: u8) -> Result<Bytes, TranscodeError>;
}

/// JPEG transcoder: decode with guessed format, re-encode RGB scanlines
/// with mozjpeg (progressive, optimized coding).
pub struct JpegTranscoder;

impl ImageTranscoder for JpegTranscoder {
    fn transcode(&self, data: &[u8], quality: u8) -> Result<Bytes, TranscodeError> {
        if quality > 100 {
            return Err(TranscodeError::InvalidQuality(quality));
        }

        let cursor = Cursor::new(data);
        let reader = ImageReader::new(cursor)
            .with_guessed_format()
            .map_err(image::ImageError::IoError)?;
        let img = reader.decode()?;

        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb_img)?;
        let jpeg_data = comp.finish()?;

        tracing::debug!(
            width = width,
            height = height,
            quality = quality,
            input_bytes = data.len(),
            output_bytes = jpeg_data.len(),
            "Frame transcoded"
        );

        Ok(Bytes::from(jpeg_data))
    }
}

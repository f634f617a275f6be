//! Frame transcoding for transport.
//!
//! Re-encodes a captured frame into a smaller JPEG at a fixed policy
//! quality so the upload payload shrinks without changing the color space
//! family. The pipeline treats transcode failures as advisory and falls
//! back to the raw frame.

pub mod transcode;

pub use transcode::{ImageTranscoder, JpegTranscoder, TranscodeError, DEFAULT_JPEG_QUALITY};

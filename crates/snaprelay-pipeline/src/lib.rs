//! Capture pipeline orchestration.
//!
//! One [`CapturePipeline`](pipeline::CapturePipeline) instance is one run:
//! capture → transcode → upload → report. The instance is consumed by the
//! run and always resolves into exactly one terminal
//! [`UploadOutcome`](snaprelay_core::models::UploadOutcome).

pub mod pipeline;

pub use pipeline::{CapturePipeline, OutcomeSink};

//! Snaprelay Core Library
//!
//! This crate provides the domain models, artifact naming, configuration,
//! and telemetry setup shared across all snaprelay components.

pub mod config;
pub mod models;
pub mod naming;
pub mod telemetry;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use models::{
    CaptureRequest, FailureKind, FrameFormat, RawImage, TranscodedImage, UploadJob, UploadOutcome,
};

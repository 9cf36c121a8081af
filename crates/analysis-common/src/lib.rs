//! Common types for the analysis job service: settings, errors, and utilities

#![deny(missing_docs)]

pub mod error;
pub mod kube_utils;
pub mod settings;
pub mod telemetry;

pub use error::Error;
pub use settings::Settings;

/// Namespace jobs are created in when `JOB_NAMESPACE` is unset
pub const DEFAULT_NAMESPACE: &str = "default";

/// Bucket analysis results are written to when `S3_BUCKET` is unset
pub const DEFAULT_STORAGE_BUCKET: &str = "analysis-results";

/// Key prefix for analysis results when `S3_PREFIX` is unset
pub const DEFAULT_STORAGE_PREFIX: &str = "analysis-results/daily";

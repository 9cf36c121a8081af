//! Job request and status types
//!
//! `JobRequest` is what callers hand to the controller. `JobStatus` is the
//! normalized view handed back. `RawJob` is the orchestrator-neutral reply a
//! session returns, from which statuses are derived.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Container image used when a request does not name one
pub const DEFAULT_IMAGE: &str = "polars-service:latest";

/// Prefix of job names derived from a target date
pub const JOB_NAME_PREFIX: &str = "analysis";

/// A request to run the analysis job for one dataset and date
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobRequest {
    /// Job name; must be a valid Kubernetes resource name
    pub name: String,
    /// Opaque dataset reference passed to the job as `DATASET_URL`
    pub dataset_reference: String,
    /// ISO-8601 date passed to the job as `TARGET_DATE`
    pub target_date: String,
    /// Container image
    pub image: String,
}

impl JobRequest {
    /// Create a request with an explicit name and the default image
    pub fn new(
        name: impl Into<String>,
        dataset_reference: impl Into<String>,
        target_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dataset_reference: dataset_reference.into(),
            target_date: target_date.into(),
            image: DEFAULT_IMAGE.to_string(),
        }
    }

    /// Create a request named `analysis-<target_date>`
    pub fn for_target_date(
        dataset_reference: impl Into<String>,
        target_date: impl Into<String>,
    ) -> Self {
        let target_date = target_date.into();
        Self::new(
            job_name_for_date(&target_date),
            dataset_reference,
            target_date,
        )
    }

    /// Override the container image
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// Derive the job name for a target date.
pub fn job_name_for_date(target_date: &str) -> String {
    format!("{}-{}", JOB_NAME_PREFIX, target_date)
}

/// Normalized job state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Running,
    Completed,
    Failed,
    Unknown,
    NotFound,
    Error,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::Unknown => "unknown",
            JobState::NotFound => "not_found",
            JobState::Error => "error",
        };
        f.write_str(s)
    }
}

/// Read-only view of a job's state as reported by the orchestrator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub job_id: String,
    pub status: JobState,
    pub namespace: String,
    pub creation_timestamp: Option<String>,
    pub completion_time: Option<String>,
    pub succeeded: i32,
    pub failed: i32,
    pub active: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl JobStatus {
    /// A status with no counts or timestamps, used when nothing was read
    pub fn empty(job_id: impl Into<String>, namespace: impl Into<String>, status: JobState) -> Self {
        Self {
            job_id: job_id.into(),
            status,
            namespace: namespace.into(),
            creation_timestamp: None,
            completion_time: None,
            succeeded: 0,
            failed: 0,
            active: 0,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// One entry of a job's `status.conditions`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobCondition {
    pub condition_type: String,
    pub status: String,
}

impl JobCondition {
    pub fn new(condition_type: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            condition_type: condition_type.into(),
            status: status.into(),
        }
    }
}

/// A job as read from the orchestrator, before status derivation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawJob {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    /// RFC 3339, as the API server reports it
    pub creation_timestamp: Option<String>,
    pub completion_time: Option<String>,
    pub succeeded: Option<i32>,
    pub failed: Option<i32>,
    pub active: Option<i32>,
    pub conditions: Vec<JobCondition>,
}

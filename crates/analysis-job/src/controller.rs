//! Analysis job lifecycle controller
//!
//! Submits, inspects, lists and deletes analysis Jobs. Every operation has a
//! total result: orchestrator failures are logged and turned into a benign
//! value, never returned as errors.
//!
//! The session is fixed at construction. A controller without one runs in
//! offline mode for its whole lifetime; build a new controller to retry.

use std::sync::Arc;

use k8s_openapi::api::batch::v1::Job;
use kube::api::PropagationPolicy;
use tracing::{error, info, warn};

use analysis_common::Settings;

use crate::bootstrap;
use crate::error::SessionError;
use crate::manifest::{build_job, APP_LABEL_KEY, APP_LABEL_VALUE};
use crate::session::JobSession;
use crate::status::job_status;
use crate::types::{JobRequest, JobState, JobStatus};

/// Message attached to statuses reported while offline
pub const OFFLINE_MESSAGE: &str = "orchestrator unavailable (offline mode)";

/// Lifecycle controller for analysis jobs
///
/// Cheap to share behind an `Arc`; holds no mutable state.
pub struct JobController {
    settings: Settings,
    session: Option<Arc<dyn JobSession>>,
}

impl JobController {
    /// Create a controller with an explicit session (`None` for offline mode)
    pub fn new(settings: Settings, session: Option<Arc<dyn JobSession>>) -> Self {
        Self { settings, session }
    }

    /// Create a controller by bootstrapping a session from the environment
    pub async fn connect(settings: Settings) -> Self {
        let session = bootstrap::connect(&settings).await;
        Self::new(settings, session)
    }

    /// Create a controller that never contacts the orchestrator
    pub fn offline(settings: Settings) -> Self {
        Self::new(settings, None)
    }

    pub fn is_online(&self) -> bool {
        self.session.is_some()
    }

    pub fn namespace(&self) -> &str {
        &self.settings.namespace
    }

    /// Render the manifest `submit` would send for a request
    pub fn render(&self, request: &JobRequest) -> Job {
        build_job(request, &self.settings)
    }

    /// Submit a job, best effort.
    ///
    /// Returns the orchestrator-confirmed name, or the requested name when
    /// offline or when creation fails.
    pub async fn submit(&self, request: &JobRequest) -> String {
        let job = self.render(request);

        let Some(session) = &self.session else {
            info!(job = %request.name, "offline mode, skipping job submission");
            return request.name.clone();
        };

        match session.create_job(self.namespace(), &job).await {
            Ok(name) => {
                info!(
                    job = %name,
                    namespace = %self.namespace(),
                    target_date = %request.target_date,
                    "analysis job submitted"
                );
                name
            }
            Err(e) => {
                warn!(
                    job = %request.name,
                    namespace = %self.namespace(),
                    error = %e,
                    "job submission failed, returning requested name"
                );
                request.name.clone()
            }
        }
    }

    /// Fetch the current status of one job
    pub async fn get_status(&self, job_id: &str) -> JobStatus {
        let Some(session) = &self.session else {
            return JobStatus::empty(job_id, self.namespace(), JobState::Unknown)
                .with_message(OFFLINE_MESSAGE);
        };

        match session.get_job(self.namespace(), job_id).await {
            Ok(raw) => job_status(raw, self.namespace()),
            Err(SessionError::NotFound) => {
                JobStatus::empty(job_id, self.namespace(), JobState::NotFound)
                    .with_message(format!("job {} not found", job_id))
            }
            Err(e) => {
                warn!(job = %job_id, error = %e, "failed to read job status");
                JobStatus::empty(job_id, self.namespace(), JobState::Error)
                    .with_message(e.reason().to_string())
            }
        }
    }

    /// List this controller's jobs, newest first.
    ///
    /// `label_selector` narrows the server-side query; the `app` label check
    /// is applied locally regardless since other workloads may share the
    /// namespace. Jobs without a creation timestamp sort last.
    pub async fn list_jobs(&self, label_selector: Option<&str>) -> Vec<JobStatus> {
        let Some(session) = &self.session else {
            return Vec::new();
        };

        let jobs = match session
            .list_jobs(self.namespace(), label_selector.map(str::to_string))
            .await
        {
            Ok(jobs) => jobs,
            Err(e) => {
                error!(namespace = %self.namespace(), error = %e, "failed to list jobs");
                return Vec::new();
            }
        };

        let mut statuses: Vec<JobStatus> = jobs
            .into_iter()
            .filter(|job| {
                job.labels.get(APP_LABEL_KEY).map(String::as_str) == Some(APP_LABEL_VALUE)
            })
            .map(|job| job_status(job, self.namespace()))
            .collect();

        statuses.sort_by(|a, b| sort_key(b).cmp(sort_key(a)));
        statuses
    }

    /// Delete a job; children are reaped in the background.
    ///
    /// Deleting a job that does not exist counts as success.
    pub async fn delete_job(&self, job_id: &str) -> bool {
        let Some(session) = &self.session else {
            return false;
        };

        match session
            .delete_job(self.namespace(), job_id, PropagationPolicy::Background)
            .await
        {
            Ok(()) => {
                info!(job = %job_id, namespace = %self.namespace(), "job deleted");
                true
            }
            Err(SessionError::NotFound) => {
                info!(job = %job_id, "job already absent");
                true
            }
            Err(e) => {
                warn!(job = %job_id, error = %e, "failed to delete job");
                false
            }
        }
    }
}

fn sort_key(status: &JobStatus) -> &str {
    status.creation_timestamp.as_deref().unwrap_or("")
}

//! Orchestrator session abstraction
//!
//! `JobSession` is the capability set the controller needs from the cluster.
//! Tests mock it; production uses `KubeSession` over a kube `Client`.

use async_trait::async_trait;
use chrono::SecondsFormat;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::api::{Api, DeleteParams, ListParams, PostParams, PropagationPolicy};
use kube::Client;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::error::SessionError;
use crate::types::{JobCondition, RawJob};

/// Job operations against the orchestrator
///
/// Every method reports an absent job as `SessionError::NotFound` and
/// everything else as `SessionError::Orchestrator`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait JobSession: Send + Sync {
    /// Create a job and return the name the orchestrator confirmed
    async fn create_job(&self, namespace: &str, job: &Job) -> Result<String, SessionError>;

    /// Read a single job
    async fn get_job(&self, namespace: &str, name: &str) -> Result<RawJob, SessionError>;

    /// List jobs, optionally narrowed by a label selector evaluated server-side
    async fn list_jobs(
        &self,
        namespace: &str,
        label_selector: Option<String>,
    ) -> Result<Vec<RawJob>, SessionError>;

    /// Delete a job with the given cascade policy
    async fn delete_job(
        &self,
        namespace: &str,
        name: &str,
        propagation: PropagationPolicy,
    ) -> Result<(), SessionError>;
}

/// Session backed by the Kubernetes API
pub struct KubeSession {
    client: Client,
}

impl KubeSession {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn jobs(&self, namespace: &str) -> Api<Job> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl JobSession for KubeSession {
    async fn create_job(&self, namespace: &str, job: &Job) -> Result<String, SessionError> {
        let created = self
            .jobs(namespace)
            .create(&PostParams::default(), job)
            .await?;
        let name = created
            .metadata
            .name
            .or_else(|| job.metadata.name.clone())
            .unwrap_or_default();
        debug!(job = %name, namespace = %namespace, "job created");
        Ok(name)
    }

    async fn get_job(&self, namespace: &str, name: &str) -> Result<RawJob, SessionError> {
        let job = self.jobs(namespace).get(name).await?;
        Ok(RawJob::from(job))
    }

    async fn list_jobs(
        &self,
        namespace: &str,
        label_selector: Option<String>,
    ) -> Result<Vec<RawJob>, SessionError> {
        let mut params = ListParams::default();
        if let Some(selector) = label_selector.as_deref() {
            params = params.labels(selector);
        }
        let jobs = self.jobs(namespace).list(&params).await?;
        Ok(jobs.items.into_iter().map(RawJob::from).collect())
    }

    async fn delete_job(
        &self,
        namespace: &str,
        name: &str,
        propagation: PropagationPolicy,
    ) -> Result<(), SessionError> {
        let params = DeleteParams {
            propagation_policy: Some(propagation),
            ..Default::default()
        };
        self.jobs(namespace).delete(name, &params).await?;
        debug!(job = %name, namespace = %namespace, "job deletion requested");
        Ok(())
    }
}

impl From<Job> for RawJob {
    fn from(job: Job) -> Self {
        let status = job.status.unwrap_or_default();
        Self {
            name: job.metadata.name.unwrap_or_default(),
            labels: job.metadata.labels.unwrap_or_default(),
            creation_timestamp: job.metadata.creation_timestamp.as_ref().map(rfc3339),
            completion_time: status.completion_time.as_ref().map(rfc3339),
            succeeded: status.succeeded,
            failed: status.failed,
            active: status.active,
            conditions: status
                .conditions
                .unwrap_or_default()
                .into_iter()
                .map(|c| JobCondition::new(c.type_, c.status))
                .collect(),
        }
    }
}

/// Format like the API server does, so string order is time order
fn rfc3339(time: &Time) -> String {
    time.0.to_rfc3339_opts(SecondsFormat::Secs, true)
}

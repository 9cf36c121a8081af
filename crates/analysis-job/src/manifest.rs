//! Analysis Job manifest construction
//!
//! Builds the `batch/v1` Job submitted for a `JobRequest`. The output is a
//! pure function of the request and settings; labels, env and resources use
//! ordered containers so serialization is byte-identical across calls.

use std::collections::BTreeMap;

use k8s_openapi::api::batch::v1::{Job, JobSpec};
use k8s_openapi::api::core::v1::{
    Container, EnvVar, PodSpec, PodTemplateSpec, ResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use analysis_common::Settings;

use crate::types::JobRequest;

/// Label key identifying jobs owned by this controller
pub const APP_LABEL_KEY: &str = "app";
/// Value of the `app` label on every job this controller creates
pub const APP_LABEL_VALUE: &str = "polars-analysis";
/// Label key carrying the job's target date
pub const TARGET_DATE_LABEL_KEY: &str = "target-date";

/// Finished jobs are garbage collected after one day
pub const TTL_SECONDS_AFTER_FINISHED: i32 = 86_400;
/// Pod failures tolerated before the job is marked failed
pub const BACKOFF_LIMIT: i32 = 3;

const CONTAINER_NAME: &str = "analysis";
const ENTRYPOINT_COMMAND: &[&str] = &["python"];
const ENTRYPOINT_ARGS: &[&str] = &["-m", "app.main_job"];

const CPU_REQUEST: &str = "500m";
const MEMORY_REQUEST: &str = "512Mi";
const CPU_LIMIT: &str = "1";
const MEMORY_LIMIT: &str = "1Gi";

/// Environment variable names read by the job entrypoint
pub mod env {
    pub const DATASET_URL: &str = "DATASET_URL";
    pub const TARGET_DATE: &str = "TARGET_DATE";
    pub const S3_BUCKET: &str = "S3_BUCKET";
    pub const S3_PREFIX: &str = "S3_PREFIX";
}

/// Build the Job manifest for a request.
///
/// The job:
/// - Is labelled `app=polars-analysis` and `target-date=<date>` (pod template too)
/// - Runs one `analysis` container with the fixed entrypoint
/// - Gets `DATASET_URL` and `TARGET_DATE`, plus `S3_BUCKET`/`S3_PREFIX` only when set
/// - Never restarts a pod in place; the Job controller retries up to `backoffLimit`
/// - Is deleted `ttlSecondsAfterFinished` after it finishes
pub fn build_job(request: &JobRequest, settings: &Settings) -> Job {
    let labels = job_labels(request);

    let container = Container {
        name: CONTAINER_NAME.to_string(),
        image: Some(request.image.clone()),
        command: Some(to_strings(ENTRYPOINT_COMMAND)),
        args: Some(to_strings(ENTRYPOINT_ARGS)),
        env: Some(job_env(request, settings)),
        resources: Some(job_resources()),
        ..Default::default()
    };

    Job {
        metadata: ObjectMeta {
            name: Some(request.name.clone()),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(JobSpec {
            ttl_seconds_after_finished: Some(TTL_SECONDS_AFTER_FINISHED),
            backoff_limit: Some(BACKOFF_LIMIT),
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    restart_policy: Some("Never".to_string()),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn job_labels(request: &JobRequest) -> BTreeMap<String, String> {
    BTreeMap::from([
        (APP_LABEL_KEY.to_string(), APP_LABEL_VALUE.to_string()),
        (
            TARGET_DATE_LABEL_KEY.to_string(),
            request.target_date.clone(),
        ),
    ])
}

fn job_env(request: &JobRequest, settings: &Settings) -> Vec<EnvVar> {
    let mut vars = vec![
        env_var(env::DATASET_URL, &request.dataset_reference),
        env_var(env::TARGET_DATE, &request.target_date),
    ];
    if let Some(bucket) = settings.storage_bucket() {
        vars.push(env_var(env::S3_BUCKET, bucket));
    }
    if let Some(prefix) = settings.storage_prefix() {
        vars.push(env_var(env::S3_PREFIX, prefix));
    }
    vars
}

fn env_var(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        ..Default::default()
    }
}

fn job_resources() -> ResourceRequirements {
    ResourceRequirements {
        requests: Some(BTreeMap::from([
            ("cpu".to_string(), Quantity(CPU_REQUEST.to_string())),
            ("memory".to_string(), Quantity(MEMORY_REQUEST.to_string())),
        ])),
        limits: Some(BTreeMap::from([
            ("cpu".to_string(), Quantity(CPU_LIMIT.to_string())),
            ("memory".to_string(), Quantity(MEMORY_LIMIT.to_string())),
        ])),
        ..Default::default()
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

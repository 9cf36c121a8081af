//! Status derivation from raw orchestrator replies
//!
//! Pod counts are checked before conditions: they reflect current pod-level
//! state, while conditions may lag behind or be absent on some API versions.

use crate::types::{JobState, JobStatus, RawJob};

/// Derive the normalized state of a job.
///
/// Order: succeeded > 0, failed > 0, active > 0, then the first terminal
/// condition (`Complete`/`Failed` with status `True`), else `Unknown`.
pub fn derive_state(job: &RawJob) -> JobState {
    if job.succeeded.unwrap_or(0) > 0 {
        return JobState::Completed;
    }
    if job.failed.unwrap_or(0) > 0 {
        return JobState::Failed;
    }
    if job.active.unwrap_or(0) > 0 {
        return JobState::Running;
    }

    job.conditions
        .iter()
        .filter(|c| c.status == "True")
        .find_map(|c| match c.condition_type.as_str() {
            "Complete" => Some(JobState::Completed),
            "Failed" => Some(JobState::Failed),
            _ => None,
        })
        .unwrap_or(JobState::Unknown)
}

/// Build the full status view of a job read from `namespace`.
pub fn job_status(job: RawJob, namespace: &str) -> JobStatus {
    let status = derive_state(&job);
    JobStatus {
        job_id: job.name,
        status,
        namespace: namespace.to_string(),
        creation_timestamp: job.creation_timestamp,
        completion_time: job.completion_time,
        succeeded: job.succeeded.unwrap_or(0),
        failed: job.failed.unwrap_or(0),
        active: job.active.unwrap_or(0),
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JobCondition;

    fn counts(succeeded: i32, failed: i32, active: i32) -> RawJob {
        RawJob {
            name: "analysis-2024-01-15".to_string(),
            succeeded: Some(succeeded),
            failed: Some(failed),
            active: Some(active),
            ..Default::default()
        }
    }

    fn with_conditions(conditions: &[(&str, &str)]) -> RawJob {
        RawJob {
            conditions: conditions
                .iter()
                .map(|(t, s)| JobCondition::new(*t, *s))
                .collect(),
            ..counts(0, 0, 0)
        }
    }

    #[test]
    fn succeeded_count_means_completed() {
        assert_eq!(derive_state(&counts(1, 0, 0)), JobState::Completed);
    }

    #[test]
    fn succeeded_count_wins_over_failed_condition() {
        let job = RawJob {
            conditions: vec![JobCondition::new("Failed", "True")],
            ..counts(1, 0, 0)
        };
        assert_eq!(derive_state(&job), JobState::Completed);
    }

    #[test]
    fn succeeded_count_wins_over_failed_count() {
        assert_eq!(derive_state(&counts(1, 3, 0)), JobState::Completed);
    }

    #[test]
    fn failed_count_means_failed() {
        assert_eq!(derive_state(&counts(0, 2, 0)), JobState::Failed);
    }

    #[test]
    fn active_count_means_running() {
        assert_eq!(derive_state(&counts(0, 0, 1)), JobState::Running);
    }

    #[test]
    fn complete_condition_without_counts() {
        let job = with_conditions(&[("Complete", "True")]);
        assert_eq!(derive_state(&job), JobState::Completed);
    }

    #[test]
    fn failed_condition_without_counts() {
        let job = with_conditions(&[("Failed", "True")]);
        assert_eq!(derive_state(&job), JobState::Failed);
    }

    #[test]
    fn first_matching_condition_wins() {
        let job = with_conditions(&[("Failed", "True"), ("Complete", "True")]);
        assert_eq!(derive_state(&job), JobState::Failed);
    }

    #[test]
    fn false_and_unrelated_conditions_are_skipped() {
        let job = with_conditions(&[
            ("Complete", "False"),
            ("Suspended", "True"),
            ("Complete", "True"),
        ]);
        assert_eq!(derive_state(&job), JobState::Completed);
    }

    #[test]
    fn zero_counts_and_no_conditions_is_unknown() {
        assert_eq!(derive_state(&counts(0, 0, 0)), JobState::Unknown);
        assert_eq!(derive_state(&RawJob::default()), JobState::Unknown);
    }

    #[test]
    fn job_status_defaults_missing_fields() {
        let raw = RawJob {
            name: "analysis-2024-01-15".to_string(),
            active: Some(1),
            ..Default::default()
        };
        let status = job_status(raw, "analytics");
        assert_eq!(status.job_id, "analysis-2024-01-15");
        assert_eq!(status.namespace, "analytics");
        assert_eq!(status.status, JobState::Running);
        assert_eq!((status.succeeded, status.failed, status.active), (0, 0, 1));
        assert!(status.creation_timestamp.is_none());
        assert!(status.completion_time.is_none());
        assert!(status.message.is_none());
    }

    #[test]
    fn job_status_copies_timestamps() {
        let raw = RawJob {
            name: "analysis-2024-01-15".to_string(),
            creation_timestamp: Some("2024-01-15T00:00:00Z".to_string()),
            completion_time: Some("2024-01-15T00:05:00Z".to_string()),
            succeeded: Some(1),
            ..Default::default()
        };
        let status = job_status(raw, "default");
        assert_eq!(status.status, JobState::Completed);
        assert_eq!(
            status.creation_timestamp.as_deref(),
            Some("2024-01-15T00:00:00Z")
        );
        assert_eq!(status.completion_time.as_deref(), Some("2024-01-15T00:05:00Z"));
    }
}

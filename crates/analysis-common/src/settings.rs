//! Service settings loaded from the environment
//!
//! Settings are read once at startup and handed to the job controller, which
//! treats them as read-only for its whole lifetime.

use std::path::PathBuf;

use crate::{DEFAULT_NAMESPACE, DEFAULT_STORAGE_BUCKET, DEFAULT_STORAGE_PREFIX};

/// Settings consumed by the job controller
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Namespace all jobs are created, listed and deleted in
    pub namespace: String,
    /// Bucket the job writes results to; `None` omits it from the job environment
    pub storage_bucket: Option<String>,
    /// Key prefix inside the bucket; `None` omits it from the job environment
    pub storage_prefix: Option<String>,
    /// Explicit kubeconfig path for the local-credentials fallback
    pub kubeconfig: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            storage_bucket: Some(DEFAULT_STORAGE_BUCKET.to_string()),
            storage_prefix: Some(DEFAULT_STORAGE_PREFIX.to_string()),
            kubeconfig: None,
        }
    }
}

impl Settings {
    /// Create settings for a namespace with no storage configuration
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            storage_bucket: None,
            storage_prefix: None,
            kubeconfig: None,
        }
    }

    /// Set the storage bucket
    pub fn with_storage_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.storage_bucket = Some(bucket.into());
        self
    }

    /// Set the storage prefix
    pub fn with_storage_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.storage_prefix = Some(prefix.into());
        self
    }

    /// Load settings from process environment variables
    ///
    /// Reads `JOB_NAMESPACE`, `S3_BUCKET`, `S3_PREFIX` and `KUBECONFIG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// Unset keys fall back to defaults. A key explicitly set to an empty
    /// string disables the storage setting instead of using the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let namespace = lookup("JOB_NAMESPACE")
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let storage_bucket = lookup("S3_BUCKET")
            .unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.to_string());
        let storage_prefix = lookup("S3_PREFIX")
            .unwrap_or_else(|| DEFAULT_STORAGE_PREFIX.to_string());

        Self {
            namespace,
            storage_bucket: non_empty(storage_bucket),
            storage_prefix: non_empty(storage_prefix),
            kubeconfig: lookup("KUBECONFIG")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Storage bucket if configured and non-empty
    pub fn storage_bucket(&self) -> Option<&str> {
        self.storage_bucket.as_deref().filter(|b| !b.is_empty())
    }

    /// Storage prefix if configured and non-empty
    pub fn storage_prefix(&self) -> Option<&str> {
        self.storage_prefix.as_deref().filter(|p| !p.is_empty())
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let settings = Settings::from_lookup(lookup_from(&[]));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.storage_bucket(), Some("analysis-results"));
        assert_eq!(settings.storage_prefix(), Some("analysis-results/daily"));
    }

    #[test]
    fn explicit_values_are_used() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("JOB_NAMESPACE", "analytics"),
            ("S3_BUCKET", "my-bucket"),
            ("S3_PREFIX", "daily/v2"),
            ("KUBECONFIG", "/tmp/kubeconfig"),
        ]));
        assert_eq!(settings.namespace, "analytics");
        assert_eq!(settings.storage_bucket(), Some("my-bucket"));
        assert_eq!(settings.storage_prefix(), Some("daily/v2"));
        assert_eq!(settings.kubeconfig, Some(PathBuf::from("/tmp/kubeconfig")));
    }

    #[test]
    fn empty_storage_values_disable_the_setting() {
        let settings =
            Settings::from_lookup(lookup_from(&[("S3_BUCKET", ""), ("S3_PREFIX", "")]));
        assert!(settings.storage_bucket.is_none());
        assert!(settings.storage_prefix.is_none());
    }

    #[test]
    fn empty_namespace_falls_back_to_default() {
        let settings = Settings::from_lookup(lookup_from(&[("JOB_NAMESPACE", "")]));
        assert_eq!(settings.namespace, DEFAULT_NAMESPACE);
    }

    #[test]
    fn accessors_hide_empty_strings_set_directly() {
        let settings = Settings::new("default").with_storage_bucket("");
        assert!(settings.storage_bucket.is_some());
        assert_eq!(settings.storage_bucket(), None);
    }
}

//! Kubernetes client construction using kube-rs
//!
//! Each credential source gets its own constructor so callers can try them in
//! a fixed order and decide what a failure means for them.

use std::path::Path;
use std::time::Duration;

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

use crate::Error;

/// Default connection timeout for kube clients
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default read timeout for kube clients
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Create a client from the pod's service account (in-cluster identity)
pub fn create_incluster_client() -> Result<Client, Error> {
    let config = Config::incluster().map_err(|e| {
        Error::internal_with_context(
            "create_incluster_client",
            format!("in-cluster config unavailable: {}", e),
        )
    })?;
    client_from_config(config, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
}

/// Create a client from a local kubeconfig file.
///
/// With `None`, the standard lookup applies (`$KUBECONFIG`, then `~/.kube/config`).
pub async fn create_kubeconfig_client(kubeconfig: Option<&Path>) -> Result<Client, Error> {
    let config = match kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                Error::config(
                    path.display().to_string(),
                    format!("failed to read kubeconfig: {}", e),
                )
            })?;
            Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .map_err(|e| {
                    Error::config(
                        path.display().to_string(),
                        format!("failed to load kubeconfig: {}", e),
                    )
                })?
        }
        None => Config::from_kubeconfig(&KubeConfigOptions::default())
            .await
            .map_err(|e| Error::config("KUBECONFIG", format!("failed to load kubeconfig: {}", e)))?,
    };
    client_from_config(config, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
}

fn client_from_config(
    mut config: Config,
    connect_timeout: Duration,
    read_timeout: Duration,
) -> Result<Client, Error> {
    config.connect_timeout = Some(connect_timeout);
    config.read_timeout = Some(read_timeout);
    Client::try_from(config).map_err(|e| {
        Error::internal_with_context("create_client", format!("failed to create client: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_kubeconfig_file_is_a_config_error() {
        let path = Path::new("/nonexistent/analysis/kubeconfig");
        let Err(err) = create_kubeconfig_client(Some(path)).await else {
            panic!("reading a missing file should fail");
        };
        match err {
            Error::Config { key, message } => {
                assert_eq!(key, "/nonexistent/analysis/kubeconfig");
                assert!(message.contains("failed to read kubeconfig"));
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn default_timeouts() {
        assert_eq!(DEFAULT_CONNECT_TIMEOUT, Duration::from_secs(5));
        assert_eq!(DEFAULT_READ_TIMEOUT, Duration::from_secs(30));
    }
}

//! Orchestrator connection bootstrap
//!
//! Credential sources are tried in order: the pod's in-cluster identity,
//! then a local kubeconfig. The first one that yields a client becomes the
//! controller's session. When none does, the controller runs offline.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use analysis_common::kube_utils::{create_incluster_client, create_kubeconfig_client};
use analysis_common::Settings;

use crate::session::{JobSession, KubeSession};

/// One way of obtaining orchestrator credentials
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootstrapStrategy {
    /// Service account token mounted into the pod
    InCluster,
    /// Operator kubeconfig; `None` uses `$KUBECONFIG` or `~/.kube/config`
    Kubeconfig(Option<PathBuf>),
}

impl fmt::Display for BootstrapStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapStrategy::InCluster => f.write_str("in-cluster"),
            BootstrapStrategy::Kubeconfig(Some(path)) => {
                write!(f, "kubeconfig ({})", path.display())
            }
            BootstrapStrategy::Kubeconfig(None) => f.write_str("kubeconfig (default)"),
        }
    }
}

impl BootstrapStrategy {
    /// Try this strategy, returning a live session on success
    pub async fn session(&self) -> Option<Arc<dyn JobSession>> {
        let client = match self {
            BootstrapStrategy::InCluster => create_incluster_client(),
            BootstrapStrategy::Kubeconfig(path) => create_kubeconfig_client(path.as_deref()).await,
        };

        match client {
            Ok(client) => {
                info!(strategy = %self, "connected to orchestrator");
                Some(Arc::new(KubeSession::new(client)))
            }
            Err(e) => {
                debug!(strategy = %self, error = %e, "bootstrap strategy failed");
                None
            }
        }
    }
}

/// Strategies to try for the given settings, in order
pub fn strategies(settings: &Settings) -> Vec<BootstrapStrategy> {
    vec![
        BootstrapStrategy::InCluster,
        BootstrapStrategy::Kubeconfig(settings.kubeconfig.clone()),
    ]
}

/// Establish a session, or `None` to run offline.
pub async fn connect(settings: &Settings) -> Option<Arc<dyn JobSession>> {
    for strategy in strategies(settings) {
        if let Some(session) = strategy.session().await {
            return Some(session);
        }
    }
    warn!("no orchestrator credentials available, running in offline mode");
    None
}

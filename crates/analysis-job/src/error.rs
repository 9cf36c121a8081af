//! Orchestrator session error types

/// Outcome of a failed orchestrator call, as seen by the controller
///
/// The controller pattern-matches on this instead of inspecting kube errors,
/// so every session implementation must map "object absent" to `NotFound`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("job not found")]
    NotFound,

    #[error("orchestrator error: {0}")]
    Orchestrator(String),
}

impl SessionError {
    /// Reason text suitable for a status message
    pub fn reason(&self) -> &str {
        match self {
            SessionError::NotFound => "job not found",
            SessionError::Orchestrator(reason) => reason,
        }
    }
}

impl From<kube::Error> for SessionError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(ae) if ae.code == 404 => SessionError::NotFound,
            kube::Error::Api(ae) => {
                SessionError::Orchestrator(format!("{} ({}): {}", ae.reason, ae.code, ae.message))
            }
            other => SessionError::Orchestrator(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::error::ErrorResponse;

    fn api_error(code: u16, reason: &str, message: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: message.to_string(),
            reason: reason.to_string(),
            code,
        })
    }

    #[test]
    fn api_404_maps_to_not_found() {
        let err: SessionError = api_error(404, "NotFound", "jobs \"x\" not found").into();
        assert_eq!(err, SessionError::NotFound);
    }

    #[test]
    fn other_api_errors_keep_reason() {
        let err: SessionError = api_error(403, "Forbidden", "jobs is forbidden").into();
        assert_eq!(
            err,
            SessionError::Orchestrator("Forbidden (403): jobs is forbidden".to_string())
        );
        assert_eq!(err.reason(), "Forbidden (403): jobs is forbidden");
    }
}

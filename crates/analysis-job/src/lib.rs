//! Lifecycle controller for analysis batch jobs
//!
//! Submits, inspects, lists and deletes the Kubernetes Jobs that run the
//! daily dataframe analysis:
//! - `manifest` renders the `batch/v1` Job for a request
//! - `bootstrap` connects to the cluster, or leaves the controller offline
//! - `controller` exposes the lifecycle operations with total results
//! - `status` derives a normalized state from the Job's counts and conditions

pub mod bootstrap;
pub mod controller;
pub mod error;
pub mod manifest;
pub mod session;
pub mod status;
pub mod types;

pub use controller::JobController;
pub use error::SessionError;
pub use session::{JobSession, KubeSession};
pub use types::{JobRequest, JobState, JobStatus, RawJob};

//! CLI command implementations
//!
//! Each command builds a controller from settings and prints the result.
//! Orchestrator failures never surface as errors here; they show up in the
//! printed status, matching the controller's contract.

mod format;

use anyhow::Context;
use clap::{Args, ValueEnum};

use analysis_common::Settings;
use analysis_job::types::DEFAULT_IMAGE;
use analysis_job::{JobController, JobRequest, JobStatus};

use format::{format_age, print_table};

/// Output format
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Columnar table (default)
    #[default]
    Table,
    /// JSON
    Json,
}

/// Job request arguments shared by `submit` and `render`
#[derive(Args, Debug)]
pub struct JobArgs {
    /// Dataset URL passed to the job
    #[arg(long, env = "DATASET_URL")]
    pub dataset: String,

    /// Target date (YYYY-MM-DD)
    #[arg(long, env = "TARGET_DATE")]
    pub date: String,

    /// Job name (default: analysis-<date>)
    #[arg(long)]
    pub name: Option<String>,

    /// Container image
    #[arg(long, default_value = DEFAULT_IMAGE)]
    pub image: String,
}

impl JobArgs {
    pub fn into_request(self) -> JobRequest {
        let request = match self.name {
            Some(name) => JobRequest::new(name, self.dataset, self.date),
            None => JobRequest::for_target_date(self.dataset, self.date),
        };
        request.with_image(self.image)
    }
}

pub fn render(args: JobArgs, settings: Settings) -> anyhow::Result<()> {
    let job = JobController::offline(settings).render(&args.into_request());
    let yaml = serde_yaml::to_string(&job).context("failed to serialize job manifest")?;
    print!("{yaml}");
    Ok(())
}

pub async fn submit(args: JobArgs, settings: Settings) -> anyhow::Result<()> {
    let controller = JobController::connect(settings).await;
    let job_id = controller.submit(&args.into_request()).await;
    if controller.is_online() {
        println!("job {job_id} submitted");
    } else {
        println!("job {job_id} not submitted (offline mode)");
    }
    Ok(())
}

pub async fn get(job_id: &str, settings: Settings, output: &OutputFormat) -> anyhow::Result<()> {
    let controller = JobController::connect(settings).await;
    let status = controller.get_status(job_id).await;
    match output {
        OutputFormat::Table => {
            print_statuses(std::slice::from_ref(&status), output)?;
            if let Some(message) = &status.message {
                println!("\n{message}");
            }
        }
        OutputFormat::Json => println!("{}", status_json(&status)?),
    }
    Ok(())
}

pub async fn list(
    selector: Option<&str>,
    settings: Settings,
    output: &OutputFormat,
) -> anyhow::Result<()> {
    let controller = JobController::connect(settings).await;
    let jobs = controller.list_jobs(selector).await;

    if jobs.is_empty() && matches!(output, OutputFormat::Table) {
        println!("{}", empty_list_note(controller.is_online()));
        return Ok(());
    }
    print_statuses(&jobs, output)
}

pub async fn delete(job_id: &str, settings: Settings) -> anyhow::Result<()> {
    let controller = JobController::connect(settings).await;
    if controller.delete_job(job_id).await {
        println!("job {job_id} deleted");
    } else {
        println!("job {job_id} not deleted");
    }
    Ok(())
}

fn print_statuses(statuses: &[JobStatus], output: &OutputFormat) -> anyhow::Result<()> {
    match output {
        OutputFormat::Table => {
            let headers = &["NAME", "STATUS", "SUCCEEDED", "FAILED", "ACTIVE", "AGE"];
            let rows: Vec<Vec<String>> = statuses.iter().map(status_row).collect();
            print_table(headers, &rows);
        }
        OutputFormat::Json => println!("{}", statuses_json(statuses)?),
    }
    Ok(())
}

fn status_json(status: &JobStatus) -> anyhow::Result<String> {
    serde_json::to_string_pretty(status).context("json serialization failed")
}

/// Always an array, whatever the number of jobs
fn statuses_json(statuses: &[JobStatus]) -> anyhow::Result<String> {
    serde_json::to_string_pretty(statuses).context("json serialization failed")
}

fn empty_list_note(online: bool) -> &'static str {
    if online {
        "No jobs found."
    } else {
        "No jobs listed (offline mode)."
    }
}

fn status_row(status: &JobStatus) -> Vec<String> {
    let age = status
        .creation_timestamp
        .as_deref()
        .and_then(|ts| chrono::DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| format_age(&ts.with_timezone(&chrono::Utc)))
        .unwrap_or_else(|| "-".to_string());

    vec![
        status.job_id.clone(),
        status.status.to_string(),
        status.succeeded.to_string(),
        status.failed.to_string(),
        status.active.to_string(),
        age,
    ]
}

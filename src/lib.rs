//! Analysis job CLI library
//!
//! Operator CLI over the analysis job controller.

pub mod commands;

use clap::{Parser, Subcommand};

use analysis_common::Settings;
use commands::{JobArgs, OutputFormat};

/// analysis - submit and inspect daily analysis jobs
#[derive(Parser, Debug)]
#[command(name = "analysis")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Namespace to operate in (overrides JOB_NAMESPACE)
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit an analysis job for a dataset and target date
    Submit(JobArgs),
    /// Show the status of a job
    Get {
        /// Job name
        job_id: String,
    },
    /// List analysis jobs, newest first
    List {
        /// Additional label selector (e.g. target-date=2024-01-15)
        #[arg(short = 'l', long)]
        selector: Option<String>,
    },
    /// Delete a job and, in the background, its pods
    Delete {
        /// Job name
        job_id: String,
    },
    /// Print the Job manifest that `submit` would send, without contacting the cluster
    Render(JobArgs),
}

impl Cli {
    /// Settings from the environment with command-line overrides applied
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::from_env();
        if let Some(ns) = &self.namespace {
            settings.namespace = ns.clone();
        }
        settings
    }

    /// Run the CLI command
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = self.settings();
        match self.command {
            Commands::Render(args) => commands::render(args, settings),
            Commands::Submit(args) => commands::submit(args, settings).await,
            Commands::Get { job_id } => commands::get(&job_id, settings, &self.output).await,
            Commands::List { selector } => {
                commands::list(selector.as_deref(), settings, &self.output).await
            }
            Commands::Delete { job_id } => commands::delete(&job_id, settings).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_submit_with_defaults() {
        let cli = Cli::try_parse_from([
            "analysis",
            "submit",
            "--dataset",
            "https://data.example.com/d.csv",
            "--date",
            "2024-01-15",
        ])
        .unwrap();
        match cli.command {
            Commands::Submit(args) => {
                let req = args.into_request();
                assert_eq!(req.name, "analysis-2024-01-15");
                assert_eq!(req.image, analysis_job::types::DEFAULT_IMAGE);
            }
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "analysis", "list", "-l", "target-date=2024-01-15", "-o", "json", "-n", "analytics",
        ])
        .unwrap();
        assert!(matches!(cli.output, OutputFormat::Json));
        assert_eq!(cli.namespace.as_deref(), Some("analytics"));
        match cli.command {
            Commands::List { selector } => {
                assert_eq!(selector.as_deref(), Some("target-date=2024-01-15"))
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn namespace_flag_overrides_settings() {
        let cli = Cli::try_parse_from(["analysis", "-n", "override-ns", "get", "job-a"]).unwrap();
        assert_eq!(cli.settings().namespace, "override-ns");
    }
}

// src/cli.rs
use crate::app_log;
use crate::client::{ApiClient, JobsApi};
use crate::core::{is_unique_violation, ConfigManager, Database, JobQuery};
use crate::presentation::{JobCard, ListingView};
use crate::provider::{
    sample_jobs, ClientFilter, FallbackJobs, JobKey, JobOrigin, JobsProvider, ProviderConfig,
    ProviderEntry,
};
use crate::start_web_server;
use crate::types::{CreateJobRequest, Job, JobId, JobType};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "job-board")]
#[command(about = "Job board API server and client tools")]
pub struct JobsCli {
    #[command(subcommand)]
    pub command: Option<JobsCommand>,

    /// Base URL of the API for client commands
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum JobsCommand {
    /// Start the API server
    Serve,
    /// List jobs from a running server
    List {
        #[command(flatten)]
        search: SearchArgs,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
        /// Print the raw response
        #[arg(long)]
        json: bool,
    },
    /// Show a single job
    Show { id: JobId },
    /// Post a new job
    Create(CreateArgs),
    /// Delete a job
    Delete { id: JobId },
    /// Per job type counts and average salary
    Stats {
        #[arg(long)]
        active_only: bool,
    },
    /// Load the listing the way the web UI does, with fallback jobs
    Browse {
        /// TOML file with `[[jobs]]` used instead of the built-in samples
        #[arg(long)]
        fallback: Option<PathBuf>,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Import jobs from a CSV file straight into the database
    Import { csv_file: PathBuf },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub job_type: Option<String>,
    #[arg(long)]
    pub experience: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub min_salary: Option<i64>,
    #[arg(long)]
    pub max_salary: Option<i64>,
}

impl SearchArgs {
    fn to_query(&self, page: u32, limit: Option<u32>) -> JobQuery {
        JobQuery {
            search: self.search.clone(),
            location: self.location.clone(),
            job_type: self.job_type.clone(),
            experience: self.experience.clone(),
            company: self.company.clone(),
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            page: Some(page),
            limit,
        }
    }

    fn to_client_filter(&self) -> ClientFilter {
        ClientFilter {
            text: self.search.clone(),
            location: self.location.clone(),
            job_type: self
                .job_type
                .as_deref()
                .and_then(|raw| raw.parse::<JobType>().ok()),
            min_salary: self.min_salary,
            max_salary: self.max_salary,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub position: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub logo: Option<String>,
    #[arg(long)]
    pub experience: Option<String>,
    #[arg(long)]
    pub location_type: Option<String>,
    #[arg(long)]
    pub salary: Option<String>,
    #[arg(long)]
    pub job_type: Option<String>,
    #[arg(long)]
    pub deadline: Option<String>,
}

impl From<CreateArgs> for CreateJobRequest {
    fn from(args: CreateArgs) -> Self {
        CreateJobRequest {
            company: Some(args.company),
            position: Some(args.position),
            description: args.description,
            logo: args.logo,
            experience: args.experience,
            location_type: args.location_type,
            salary: args.salary,
            job_type: args.job_type,
            application_deadline: args.deadline,
        }
    }
}

fn api_card(job: Job) -> JobCard {
    let entry = ProviderEntry {
        key: JobKey::Saved(job.id),
        origin: JobOrigin::Api,
        job,
    };
    JobCard::from_entry(&entry, Utc::now())
}

pub async fn handle_command(cli: JobsCli, mut config: ConfigManager) -> Result<()> {
    if let Some(api_url) = cli.api_url {
        config.client.api_url = api_url.trim_end_matches('/').to_string();
    }

    match cli.command.unwrap_or(JobsCommand::Serve) {
        JobsCommand::Serve => start_web_server(config.environment).await,
        JobsCommand::Import { csv_file } => import_command(&config, csv_file).await,
        command => {
            let client = ApiClient::new(&config.client)?;
            client_command(command, client).await
        }
    }
}

async fn client_command(command: JobsCommand, client: ApiClient) -> Result<()> {
    match command {
        JobsCommand::List {
            search,
            page,
            limit,
            json,
        } => {
            let response = client.list_jobs(&search.to_query(page, limit)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                app_log!(
                    info,
                    "Page {}/{} ({} jobs in total)",
                    response.page,
                    response.pages,
                    response.total
                );
                for job in response.data {
                    println!("{}\n", api_card(job));
                }
            }
        }

        JobsCommand::Show { id } => match client.get_job(id).await {
            Ok(job) => println!("{}", serde_json::to_string_pretty(&job)?),
            Err(e) => {
                app_log!(error, "Failed to fetch job {}: {:#}", id, e);
                app_log!(info, "❌ Error: {}", e);
            }
        },

        JobsCommand::Create(args) => match client.create_job(&args.into()).await {
            Ok(job) => {
                app_log!(info, "✅ Job created successfully:");
                app_log!(info, "   ID: {}", job.id);
                app_log!(info, "   {} at {}", job.position, job.company);
                app_log!(info, "   Salary: {}", job.salary);
            }
            Err(e) => {
                app_log!(error, "Failed to create job: {:#}", e);
                app_log!(info, "❌ Error: {}", e);
            }
        },

        JobsCommand::Delete { id } => match client.delete_job(id).await {
            Ok(()) => app_log!(info, "✅ Job deleted: {}", id),
            Err(e) => {
                app_log!(error, "Failed to delete job {}: {:#}", id, e);
                app_log!(info, "❌ Error: {}", e);
            }
        },

        JobsCommand::Stats { active_only } => {
            let stats = client.job_stats(active_only).await?;
            if stats.is_empty() {
                app_log!(info, "No jobs found.");
            } else {
                println!("{:<12} {:>6} {:>12}", "Job type", "Count", "Avg (LPA)");
                println!("{}", "-".repeat(32));
                for entry in stats {
                    let average = entry
                        .avg_salary
                        .map(|avg| format!("{:.1}", avg))
                        .unwrap_or_else(|| "-".to_string());
                    println!("{:<12} {:>6} {:>12}", entry.job_type, entry.count, average);
                }
            }
        }

        JobsCommand::Browse { fallback, search } => {
            let fallback_jobs = match fallback {
                Some(path) => FallbackJobs::load(&path)?,
                None => sample_jobs(),
            };

            let mut provider = JobsProvider::new(client, fallback_jobs, ProviderConfig::default());
            if let Err(e) = provider.load().await {
                app_log!(warn, "Showing fallback jobs: {:#}", e);
            }

            let view = ListingView::build(&provider, &search.to_client_filter(), Utc::now());
            println!("{}", view.render());
        }

        JobsCommand::Serve | JobsCommand::Import { .. } => {}
    }

    Ok(())
}

async fn import_command(config: &ConfigManager, csv_file: PathBuf) -> Result<()> {
    if !csv_file.exists() {
        app_log!(info, "❌ CSV file not found: {}", csv_file.display());
        return Ok(());
    }

    let db = Database::new(&config.environment.database_path).await?;
    let file = std::fs::File::open(&csv_file)
        .with_context(|| format!("Failed to open {}", csv_file.display()))?;

    let summary = import_jobs(&db, file).await?;

    app_log!(info, "\nImport completed:");
    app_log!(info, "  ✅ Success: {}", summary.imported);
    app_log!(info, "  ⚠️  Skipped: {}", summary.skipped);
    app_log!(info, "  ❌ Errors:  {}", summary.errors);
    Ok(())
}

/// One CSV row; the header row names the job fields
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvJobRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    logo: Option<String>,
    #[serde(default)]
    experience: Option<String>,
    #[serde(default, alias = "location_type")]
    location_type: Option<String>,
    #[serde(default)]
    salary: Option<String>,
    #[serde(default, alias = "job_type")]
    job_type: Option<String>,
    #[serde(default, alias = "application_deadline")]
    application_deadline: Option<String>,
}

impl From<CsvJobRecord> for CreateJobRequest {
    fn from(record: CsvJobRecord) -> Self {
        CreateJobRequest {
            company: record.company,
            position: record.position,
            description: record.description,
            logo: record.logo,
            experience: record.experience,
            location_type: record.location_type,
            salary: record.salary,
            job_type: record.job_type,
            application_deadline: record.application_deadline,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub errors: usize,
}

pub async fn import_jobs<R: Read>(db: &Database, reader: R) -> Result<ImportSummary> {
    let mut reader = csv::Reader::from_reader(reader);
    let jobs = db.jobs();
    let mut summary = ImportSummary::default();

    for (line, result) in reader.deserialize::<CsvJobRecord>().enumerate() {
        let row = line + 2;
        let mut record = match result {
            Ok(record) => record,
            Err(e) => {
                summary.errors += 1;
                app_log!(info, "❌ CSV parsing error on row {}: {}", row, e);
                continue;
            }
        };

        let id = match record.id.take().filter(|id| !id.trim().is_empty()) {
            Some(raw) => match raw.parse::<JobId>() {
                Ok(id) => Some(id),
                Err(e) => {
                    summary.errors += 1;
                    app_log!(info, "❌ Row {}: invalid id '{}': {}", row, raw, e);
                    continue;
                }
            },
            None => None,
        };

        let new_job = match CreateJobRequest::from(record).validate() {
            Ok(new_job) => new_job,
            Err(e) => {
                summary.errors += 1;
                app_log!(info, "⚠️  Skipping row {}: {}", row, e);
                continue;
            }
        };

        let inserted = match id {
            Some(id) => jobs.insert_with_id(id, new_job).await,
            None => jobs.insert(new_job).await,
        };

        match inserted {
            Ok(job) => {
                summary.imported += 1;
                app_log!(info, "✅ Added: {} at {} ({})", job.position, job.company, job.id);
            }
            Err(e) if is_unique_violation(&e) => {
                summary.skipped += 1;
                app_log!(info, "⚠️  Skipped (already exists): row {}", row);
            }
            Err(e) => {
                summary.errors += 1;
                app_log!(info, "❌ Failed to add row {}: {:#}", row, e);
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{JobFilter, Pagination};

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = JobsCli::try_parse_from(["job-board"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.api_url.is_none());
    }

    #[test]
    fn test_list_arguments() {
        let cli = JobsCli::try_parse_from([
            "job-board",
            "list",
            "--search",
            "rust",
            "--min-salary",
            "10",
            "--page",
            "2",
            "--api-url",
            "http://jobs.local/api",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://jobs.local/api"));
        match cli.command {
            Some(JobsCommand::List {
                search, page, limit, ..
            }) => {
                let query = search.to_query(page, limit);
                assert_eq!(query.search.as_deref(), Some("rust"));
                assert_eq!(query.min_salary, Some(10));
                assert_eq!(query.page, Some(2));
                assert_eq!(query.limit, None);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_show_rejects_malformed_id() {
        assert!(JobsCli::try_parse_from(["job-board", "show", "42"]).is_err());
        assert!(JobsCli::try_parse_from([
            "job-board",
            "show",
            "0b6f3b1e-2f0a-4a57-9d68-2f4f6f0c9a11"
        ])
        .is_ok());
    }

    #[test]
    fn test_create_arguments_become_request() {
        let cli = JobsCli::try_parse_from([
            "job-board",
            "create",
            "--company",
            "Acme",
            "--position",
            "Engineer",
            "--salary",
            "20LPA",
        ])
        .unwrap();

        match cli.command {
            Some(JobsCommand::Create(args)) => {
                let request = CreateJobRequest::from(args);
                assert_eq!(request.company.as_deref(), Some("Acme"));
                assert_eq!(request.salary.as_deref(), Some("20LPA"));
                assert!(request.job_type.is_none());
            }
            _ => panic!("expected create command"),
        }
    }

    #[tokio::test]
    async fn test_import_counts_rows() {
        let db = Database::in_memory().await.unwrap();
        let csv = "\
id,company,position,salary,jobType
,Acme,Engineer,15LPA,Contract
0b6f3b1e-2f0a-4a57-9d68-2f4f6f0c9a11,Globex,Designer,,
0b6f3b1e-2f0a-4a57-9d68-2f4f6f0c9a11,Globex,Designer,,
,,Missing Company,,
not-a-uuid,Initech,Analyst,,
,Hooli,Tester,,Gig
";

        let summary = import_jobs(&db, csv.as_bytes()).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                imported: 2,
                skipped: 1,
                errors: 3,
            }
        );

        let (jobs, total) = db
            .jobs()
            .list(
                &JobFilter::from_query(&JobQuery::default()),
                Pagination::from_query(&JobQuery::default(), 10),
            )
            .await
            .unwrap();
        assert_eq!(total, 2);
        let acme = jobs.iter().find(|job| job.company == "Acme").unwrap();
        assert_eq!(acme.salary_lpa, Some(15));
        assert_eq!(acme.job_type, JobType::Contract);

        let globex = jobs.iter().find(|job| job.company == "Globex").unwrap();
        assert_eq!(globex.salary, "12LPA");
    }
}
